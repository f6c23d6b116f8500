//! Pointer ↔ frame mapping under `object-fit: contain`.
//!
//! The video keeps its aspect ratio and is centered inside the container, so
//! one axis fills the container and the other has equal bars on both sides.
//! Everything here is recomputed from plain data on every call; nothing is
//! cached, which keeps the overlay correct straight after a resize.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::coord::{ContainerSpace, Coord, FrameSpace, Rect, Size};
use super::position::{NormalizedPosition, PERCENT_MAX};
use crate::error::{ReefTagError, ReefTagResult};

/// Decoded video dimensions plus the container's current box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct IntrinsicFrameGeometry {
    /// Decoded width in pixels (0 until metadata has loaded).
    pub video_width: u32,
    /// Decoded height in pixels (0 until metadata has loaded).
    pub video_height: u32,
    /// Container width in CSS pixels.
    pub container_width: f64,
    /// Container height in CSS pixels.
    pub container_height: f64,
}

impl IntrinsicFrameGeometry {
    pub fn new(
        video_width: u32,
        video_height: u32,
        container_width: f64,
        container_height: f64,
    ) -> Self {
        Self {
            video_width,
            video_height,
            container_width,
            container_height,
        }
    }

    pub fn container_size(&self) -> Size<ContainerSpace> {
        Size::new(self.container_width, self.container_height)
    }

    pub fn video_size(&self) -> Size<FrameSpace> {
        Size::from_u32(self.video_width, self.video_height)
    }

    /// Same video, new container box.
    pub fn resized(&self, container_width: f64, container_height: f64) -> Self {
        Self {
            container_width,
            container_height,
            ..*self
        }
    }

    pub fn visible_rect(&self) -> ReefTagResult<VisibleRect> {
        compute_visible_rect(self)
    }
}

/// The part of the container covered by decoded video pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct VisibleRect {
    pub rendered_width: f64,
    pub rendered_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl VisibleRect {
    pub fn as_rect(&self) -> Rect<ContainerSpace> {
        Rect::from_coords(
            self.offset_x,
            self.offset_y,
            self.rendered_width,
            self.rendered_height,
        )
    }

    /// Bars above and below the frame.
    pub fn is_letterboxed(&self) -> bool {
        self.offset_y > 0.0
    }

    /// Bars left and right of the frame.
    pub fn is_pillarboxed(&self) -> bool {
        self.offset_x > 0.0
    }
}

/// Compute the visible frame rectangle for "contain" scaling.
///
/// Fails with [`ReefTagError::GeometryUnavailable`] while video metadata is
/// missing or the container has no usable size.
pub fn compute_visible_rect(geometry: &IntrinsicFrameGeometry) -> ReefTagResult<VisibleRect> {
    if geometry.video_width == 0 || geometry.video_height == 0 {
        return Err(ReefTagError::geometry_unavailable("video metadata not loaded"));
    }

    let container = geometry.container_size();
    if !container.is_usable() {
        return Err(ReefTagError::geometry_unavailable(format!(
            "container has no usable size ({}x{})",
            container.width, container.height
        )));
    }

    let video_aspect = geometry.video_size().aspect_ratio();
    let container_aspect = container.aspect_ratio();

    let rect = if video_aspect > container_aspect {
        // Video is relatively wider: fit to width, bars top and bottom
        let rendered_height = container.width / video_aspect;
        VisibleRect {
            rendered_width: container.width,
            rendered_height,
            offset_x: 0.0,
            offset_y: (container.height - rendered_height) / 2.0,
        }
    } else {
        // Video is relatively taller (or equal): fit to height, bars left and right
        let rendered_width = container.height * video_aspect;
        VisibleRect {
            rendered_width,
            rendered_height: container.height,
            offset_x: (container.width - rendered_width) / 2.0,
            offset_y: 0.0,
        }
    };

    Ok(rect)
}

/// Map a container-space pointer position to a normalized frame position.
///
/// Returns `None` when geometry is unavailable or the point is not strictly
/// inside the visible frame (it landed on a bar or on the frame edge).
pub fn pixel_to_normalized(
    point: Coord<ContainerSpace>,
    geometry: &IntrinsicFrameGeometry,
) -> Option<NormalizedPosition> {
    if !point.is_finite() {
        return None;
    }
    let visible = compute_visible_rect(geometry).ok()?;
    let local = point.to_frame_space(&visible.as_rect());

    let frame = Rect::<FrameSpace>::from_coords(
        0.0,
        0.0,
        visible.rendered_width,
        visible.rendered_height,
    );
    if !frame.contains_strict(local) {
        return None;
    }

    NormalizedPosition::new(
        local.x / visible.rendered_width * PERCENT_MAX,
        local.y / visible.rendered_height * PERCENT_MAX,
    )
}

/// Map a normalized frame position back to container pixels.
///
/// Inverse of [`pixel_to_normalized`]; `None` only when geometry is unavailable.
pub fn normalized_to_pixel(
    position: &NormalizedPosition,
    geometry: &IntrinsicFrameGeometry,
) -> Option<Coord<ContainerSpace>> {
    let visible = compute_visible_rect(geometry).ok()?;
    let local = Coord::<FrameSpace>::new(
        position.x() / PERCENT_MAX * visible.rendered_width,
        position.y() / PERCENT_MAX * visible.rendered_height,
    );
    Some(local.to_container_space(&visible.as_rect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_letterbox_1080p_in_square() {
        let g = IntrinsicFrameGeometry::new(1920, 1080, 800.0, 800.0);
        let r = compute_visible_rect(&g).unwrap();
        assert!(approx(r.rendered_width, 800.0));
        assert!(approx(r.rendered_height, 450.0));
        assert!(approx(r.offset_x, 0.0));
        assert!(approx(r.offset_y, 175.0));
        assert!(r.is_letterboxed());

        let p = pixel_to_normalized(Coord::new(400.0, 400.0), &g).unwrap();
        assert!(approx(p.x(), 50.0));
        assert!(approx(p.y(), 50.0));
    }

    #[test]
    fn test_narrow_container_takes_width_branch() {
        let g = IntrinsicFrameGeometry::new(1920, 1080, 400.0, 800.0);
        let r = compute_visible_rect(&g).unwrap();
        assert!(approx(r.rendered_width, 400.0));
        assert!(approx(r.rendered_height, 225.0));
        assert!(approx(r.offset_y, 287.5));
        assert!(approx(r.offset_x, 0.0));

        // Top-left corner is in the bar above the frame
        assert!(pixel_to_normalized(Coord::new(0.0, 0.0), &g).is_none());
    }

    #[test]
    fn test_letterbox_vs_pillarbox_selection() {
        // 16:9 video in a 4:3 container: container relatively taller
        let g = IntrinsicFrameGeometry::new(1600, 900, 800.0, 600.0);
        let r = compute_visible_rect(&g).unwrap();
        assert!(r.offset_y > 0.0);
        assert_eq!(r.offset_x, 0.0);

        // 4:3 video in a 16:9 container: container relatively wider
        let g = IntrinsicFrameGeometry::new(640, 480, 1600.0, 900.0);
        let r = compute_visible_rect(&g).unwrap();
        assert!(r.offset_x > 0.0);
        assert_eq!(r.offset_y, 0.0);
        assert!(r.is_pillarboxed());
    }

    #[test]
    fn test_equal_aspect_has_no_bars() {
        let g = IntrinsicFrameGeometry::new(1280, 720, 640.0, 360.0);
        let r = compute_visible_rect(&g).unwrap();
        assert!(approx(r.rendered_width, 640.0));
        assert!(approx(r.rendered_height, 360.0));
        assert!(approx(r.offset_x, 0.0));
        assert!(approx(r.offset_y, 0.0));
    }

    #[test]
    fn test_unavailable_geometry() {
        let no_metadata = IntrinsicFrameGeometry::new(0, 0, 800.0, 600.0);
        assert!(matches!(
            compute_visible_rect(&no_metadata),
            Err(ReefTagError::GeometryUnavailable { .. })
        ));
        assert!(pixel_to_normalized(Coord::new(10.0, 10.0), &no_metadata).is_none());
        assert!(normalized_to_pixel(&NormalizedPosition::center(), &no_metadata).is_none());

        let collapsed = IntrinsicFrameGeometry::new(1920, 1080, 0.0, 600.0);
        assert!(compute_visible_rect(&collapsed).is_err());
        assert!(pixel_to_normalized(Coord::new(0.0, 0.0), &collapsed).is_none());

        let nan = IntrinsicFrameGeometry::new(1920, 1080, f64::NAN, 600.0);
        assert!(compute_visible_rect(&nan).is_err());
    }

    #[test]
    fn test_boundary_rejection() {
        let g = IntrinsicFrameGeometry::new(1920, 1080, 800.0, 800.0);
        // Exactly on the top and bottom letterbox edges
        assert!(pixel_to_normalized(Coord::new(400.0, 175.0), &g).is_none());
        assert!(pixel_to_normalized(Coord::new(400.0, 625.0), &g).is_none());
        // Inside the bars
        assert!(pixel_to_normalized(Coord::new(400.0, 100.0), &g).is_none());
        assert!(pixel_to_normalized(Coord::new(400.0, 700.0), &g).is_none());
        // Outside the container altogether
        assert!(pixel_to_normalized(Coord::new(-5.0, 400.0), &g).is_none());
        assert!(pixel_to_normalized(Coord::new(f64::NAN, 400.0), &g).is_none());
        // Just inside
        assert!(pixel_to_normalized(Coord::new(400.0, 175.5), &g).is_some());
    }

    #[test]
    fn test_center_maps_to_center_for_any_aspect() {
        let cases = [
            (1920, 1080, 800.0, 800.0),
            (1080, 1920, 800.0, 600.0),
            (640, 480, 1600.0, 900.0),
            (3840, 1600, 333.0, 777.0),
            (720, 720, 1024.0, 512.0),
        ];
        for (vw, vh, cw, ch) in cases {
            let g = IntrinsicFrameGeometry::new(vw, vh, cw, ch);
            let p = pixel_to_normalized(Coord::new(cw / 2.0, ch / 2.0), &g).unwrap();
            assert!(approx(p.x(), 50.0), "{:?} -> {:?}", g, p);
            assert!(approx(p.y(), 50.0), "{:?} -> {:?}", g, p);
        }
    }

    #[test]
    fn test_round_trip_inside_visible_rect() {
        let geometries = [
            IntrinsicFrameGeometry::new(1920, 1080, 800.0, 800.0),
            IntrinsicFrameGeometry::new(1080, 1920, 1200.0, 500.0),
            IntrinsicFrameGeometry::new(4000, 3000, 317.25, 911.5),
            IntrinsicFrameGeometry::new(1, 1, 640.0, 480.0),
        ];
        for g in geometries {
            let rect = compute_visible_rect(&g).unwrap();
            for fx in [0.01, 0.25, 0.5, 0.73, 0.99] {
                for fy in [0.02, 0.4, 0.98] {
                    let p = Coord::<ContainerSpace>::new(
                        rect.offset_x + rect.rendered_width * fx,
                        rect.offset_y + rect.rendered_height * fy,
                    );
                    let n = pixel_to_normalized(p, &g).unwrap();
                    let back = normalized_to_pixel(&n, &g).unwrap();
                    assert!(approx(back.x, p.x), "{:?}: {} vs {}", g, back.x, p.x);
                    assert!(approx(back.y, p.y), "{:?}: {} vs {}", g, back.y, p.y);
                }
            }
        }
    }

    #[test]
    fn test_resize_moves_marker_proportionally() {
        let tag = NormalizedPosition::new(25.0, 75.0).unwrap();

        let before = IntrinsicFrameGeometry::new(1920, 1080, 800.0, 800.0);
        let p1 = normalized_to_pixel(&tag, &before).unwrap();
        assert!(approx(p1.x, 200.0));
        assert!(approx(p1.y, 175.0 + 450.0 * 0.75));

        // Shrink and turn into a pillarboxed layout
        let after = before.resized(1000.0, 450.0);
        let rect = compute_visible_rect(&after).unwrap();
        assert!(approx(rect.rendered_width, 800.0));
        assert!(approx(rect.offset_x, 100.0));
        let p2 = normalized_to_pixel(&tag, &after).unwrap();
        assert!(approx(p2.x, 100.0 + 800.0 * 0.25));
        assert!(approx(p2.y, 450.0 * 0.75));

        // Mapping the new pixel back gives the stored position
        let n = pixel_to_normalized(p2, &after).unwrap();
        assert!(approx(n.x(), 25.0));
        assert!(approx(n.y(), 75.0));
    }
}
