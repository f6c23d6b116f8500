//! Player state and event types shared with the host.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::NormalizedPosition;
use crate::tags::Tag;

/// An uncommitted tag location waiting for its label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct Draft {
    /// Monotonic per player; identifies the draft for stale-response checks.
    #[ts(type = "number")]
    pub id: u64,
    /// Media time in seconds when the frame was clicked.
    pub timestamp: f64,
    pub position: NormalizedPosition,
}

/// What the pointer currently means on the player surface.
///
/// Exactly one mode is active; there is no draft without a timestamp and no
/// highlighted tag alongside a draft.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub enum PlayerMode {
    /// No selection, pointer not over the frame.
    #[default]
    Idle,
    /// Pointer is over the visible frame.
    Hovering { position: NormalizedPosition },
    /// A draft tag is open.
    Selecting { draft: Draft },
    /// An existing tag is highlighted.
    Viewing { tag: Tag },
}

impl PlayerMode {
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            PlayerMode::Selecting { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn active_tag(&self) -> Option<&Tag> {
        match self {
            PlayerMode::Viewing { tag } => Some(tag),
            _ => None,
        }
    }

    /// True while a draft or a highlighted tag is shown, which turns the
    /// next click into a cancel.
    pub fn has_selection(&self) -> bool {
        matches!(
            self,
            PlayerMode::Selecting { .. } | PlayerMode::Viewing { .. }
        )
    }
}

/// Result of a click on the player surface.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub enum ClickOutcome {
    /// Geometry unavailable or the click hit a letterbox/pillarbox bar.
    Ignored,
    /// A new draft was opened.
    DraftStarted { draft: Draft },
    /// The open draft or highlighted tag was dismissed.
    Cancelled,
}

/// Notifications for the host, drained after each call.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub enum PlayerEvent {
    DraftStarted {
        draft: Draft,
    },
    DraftCancelled {
        #[serde(rename = "draftId")]
        #[ts(type = "number")]
        draft_id: u64,
    },
    TagAdded {
        tag: Tag,
    },
    TagSelected {
        tag: Tag,
    },
    ViewCleared {
        #[serde(rename = "tagId")]
        tag_id: String,
    },
    PlaybackChanged {
        playing: bool,
    },
    Seeked {
        time: f64,
    },
    /// Playback position advanced.
    TimeUpdated {
        time: f64,
    },
    VolumeChanged {
        volume: f64,
        muted: bool,
    },
}

/// Control-bar state.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct TransportSnapshot {
    pub current_time: f64,
    /// `None` until metadata reports a finite duration.
    pub duration: Option<f64>,
    pub playing: bool,
    /// Slider value; always 0 while muted.
    pub volume: f64,
    pub muted: bool,
    pub current_label: String,
    pub duration_label: String,
}

/// A still frame encoded for the suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct CapturedFrame {
    /// `data:image/jpeg;base64,...`
    pub data_url: String,
    /// Intrinsic decoded width.
    pub width: u32,
    /// Intrinsic decoded height.
    pub height: u32,
    /// Media time of the captured frame in seconds.
    pub timestamp: f64,
}
