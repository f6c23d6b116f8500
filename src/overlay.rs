//! Tag overlay rendering.
//!
//! Produces the list of markers to draw over the video. Positions are stored
//! as percentages of the visible frame and projected into container pixels
//! on every call, so markers land on the same content after any resize or
//! fullscreen change.

use serde::Serialize;
use ts_rs::TS;

use crate::geometry::{normalized_to_pixel, IntrinsicFrameGeometry, NormalizedPosition};
use crate::player::PlayerMode;
use crate::tags::Tag;

/// Kind of marker, which decides its look and stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub enum MarkerVariant {
    /// Follows the pointer.
    Hover,
    /// A saved tag.
    Placed,
    /// The open draft.
    Draft,
    /// The tag currently being viewed.
    Active,
}

impl MarkerVariant {
    /// Stacking order; draft and active sit above placed tags, hover below.
    pub fn z_index(self) -> u8 {
        match self {
            MarkerVariant::Hover => 0,
            MarkerVariant::Placed => 1,
            MarkerVariant::Draft | MarkerVariant::Active => 2,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MarkerVariant::Hover => "#ffffff",
            MarkerVariant::Placed => "#3b82f6",
            MarkerVariant::Draft => "#ef4444",
            MarkerVariant::Active => "#22c55e",
        }
    }

    pub fn opacity(self, hover_opacity: f32) -> f32 {
        match self {
            MarkerVariant::Hover => hover_opacity,
            _ => 1.0,
        }
    }
}

/// One marker positioned in container pixels.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct Marker {
    /// Stable key for the host's list rendering (tag ID, `draft` or `hover`).
    pub key: String,
    pub variant: MarkerVariant,
    /// Container-space X of the marker center.
    pub x: f64,
    /// Container-space Y of the marker center.
    pub y: f64,
    pub position: NormalizedPosition,
    /// Tag text, when the marker belongs to a tag.
    pub label: Option<String>,
    pub z_index: u8,
    pub color: String,
    pub opacity: f32,
}

/// Opacity applied to the hover marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub hover_opacity: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self { hover_opacity: 0.5 }
    }
}

struct MarkerList<'a> {
    geometry: &'a IntrinsicFrameGeometry,
    style: &'a OverlayStyle,
    markers: Vec<Marker>,
}

impl MarkerList<'_> {
    fn push(
        &mut self,
        key: &str,
        variant: MarkerVariant,
        position: &NormalizedPosition,
        label: Option<&str>,
    ) {
        let Some(point) = normalized_to_pixel(position, self.geometry) else {
            return;
        };
        self.markers.push(Marker {
            key: key.to_string(),
            variant,
            x: point.x,
            y: point.y,
            position: *position,
            label: label.map(str::to_string),
            z_index: variant.z_index(),
            color: variant.color().to_string(),
            opacity: variant.opacity(self.style.hover_opacity),
        });
    }
}

/// Build the markers for the current frame, back to front.
///
/// Every tag is placed; the tag being viewed is drawn once as
/// [`MarkerVariant::Active`]. The hover marker only appears in `Hovering`,
/// the draft marker only in `Selecting`. Returns nothing while geometry is
/// unavailable.
pub fn render_markers(
    tags: &[Tag],
    mode: &PlayerMode,
    geometry: &IntrinsicFrameGeometry,
    style: &OverlayStyle,
) -> Vec<Marker> {
    if let Err(e) = geometry.visible_rect() {
        log::trace!("[OVERLAY] Skipping markers: {}", e);
        return Vec::new();
    }

    let mut list = MarkerList {
        geometry,
        style,
        markers: Vec::with_capacity(tags.len() + 1),
    };

    let active_id = mode.active_tag().map(|t| t.id.as_str());
    for tag in tags.iter().filter(|t| Some(t.id.as_str()) != active_id) {
        list.push(&tag.id, MarkerVariant::Placed, &tag.position, Some(&tag.text));
    }

    match mode {
        PlayerMode::Idle => {}
        PlayerMode::Hovering { position } => {
            list.push("hover", MarkerVariant::Hover, position, None);
        }
        PlayerMode::Selecting { draft } => {
            list.push("draft", MarkerVariant::Draft, &draft.position, None);
        }
        PlayerMode::Viewing { tag } => {
            list.push(&tag.id, MarkerVariant::Active, &tag.position, Some(&tag.text));
        }
    }

    let mut markers = list.markers;
    markers.sort_by_key(|m| m.z_index);
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Draft;
    use crate::tags::Annotator;

    fn tag_at(x: f64, y: f64, text: &str) -> Tag {
        Tag::new(
            "vid-1",
            1.0,
            text,
            &Annotator::new("u-1", "Dana"),
            NormalizedPosition::new(x, y).unwrap(),
        )
    }

    fn square() -> IntrinsicFrameGeometry {
        IntrinsicFrameGeometry::new(1920, 1080, 800.0, 800.0)
    }

    #[test]
    fn test_placed_markers_project_into_visible_frame() {
        let tags = vec![tag_at(50.0, 50.0, "Kelp"), tag_at(0.0, 0.0, "Eel")];
        let markers = render_markers(&tags, &PlayerMode::Idle, &square(), &OverlayStyle::default());

        assert_eq!(markers.len(), 2);
        assert!((markers[0].x - 400.0).abs() < 1e-9);
        assert!((markers[0].y - 400.0).abs() < 1e-9);
        // Top-left of the frame sits below the letterbox bar
        assert!((markers[1].x - 0.0).abs() < 1e-9);
        assert!((markers[1].y - 175.0).abs() < 1e-9);
        assert_eq!(markers[1].label.as_deref(), Some("Eel"));
    }

    #[test]
    fn test_active_tag_drawn_once_on_top() {
        let tags = vec![tag_at(10.0, 10.0, "Kelp"), tag_at(20.0, 20.0, "Eel")];
        let mode = PlayerMode::Viewing {
            tag: tags[0].clone(),
        };
        let markers = render_markers(&tags, &mode, &square(), &OverlayStyle::default());

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].variant, MarkerVariant::Placed);
        assert_eq!(markers[1].variant, MarkerVariant::Active);
        assert_eq!(markers[1].key, tags[0].id);
    }

    #[test]
    fn test_hover_below_placed_and_faded() {
        let tags = vec![tag_at(10.0, 10.0, "Kelp")];
        let mode = PlayerMode::Hovering {
            position: NormalizedPosition::center(),
        };
        let style = OverlayStyle { hover_opacity: 0.3 };
        let markers = render_markers(&tags, &mode, &square(), &style);

        assert_eq!(markers[0].variant, MarkerVariant::Hover);
        assert_eq!(markers[0].opacity, 0.3);
        assert_eq!(markers[1].variant, MarkerVariant::Placed);
        assert_eq!(markers[1].opacity, 1.0);
    }

    #[test]
    fn test_draft_marker_only_while_selecting() {
        let draft = Draft {
            id: 1,
            timestamp: 3.0,
            position: NormalizedPosition::center(),
        };
        let markers = render_markers(
            &[],
            &PlayerMode::Selecting { draft },
            &square(),
            &OverlayStyle::default(),
        );
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].key, "draft");
        assert_eq!(markers[0].z_index, 2);

        let markers = render_markers(&[], &PlayerMode::Idle, &square(), &OverlayStyle::default());
        assert!(markers.is_empty());
    }

    #[test]
    fn test_markers_follow_resize() {
        let tags = vec![tag_at(25.0, 75.0, "Kelp")];
        let small = render_markers(&tags, &PlayerMode::Idle, &square(), &OverlayStyle::default());
        let large = render_markers(
            &tags,
            &PlayerMode::Idle,
            &square().resized(1600.0, 1600.0),
            &OverlayStyle::default(),
        );
        assert!((large[0].x - small[0].x * 2.0).abs() < 1e-9);
        assert!((large[0].y - small[0].y * 2.0).abs() < 1e-9);
        assert_eq!(large[0].position, small[0].position);
    }

    #[test]
    fn test_no_markers_without_geometry() {
        let tags = vec![tag_at(50.0, 50.0, "Kelp")];
        let style = OverlayStyle::default();
        let pending = IntrinsicFrameGeometry::new(0, 0, 800.0, 600.0);
        assert!(render_markers(&tags, &PlayerMode::Idle, &pending, &style).is_empty());

        let collapsed = IntrinsicFrameGeometry::new(1920, 1080, 0.0, 600.0);
        assert!(render_markers(&tags, &PlayerMode::Idle, &collapsed, &style).is_empty());
    }
}
