//! Tag data shared with the host.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::NormalizedPosition;

/// A species label pinned to a point on a video frame at a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct Tag {
    pub id: String,
    pub video_id: String,
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub text: String,
    pub user_id: String,
    pub username: String,
    pub position: NormalizedPosition,
    /// Set once the tag has been sent for review.
    pub submitted: bool,
}

impl Tag {
    /// Create an unsubmitted tag with a fresh ID.
    pub fn new(
        video_id: impl Into<String>,
        timestamp: f64,
        text: impl Into<String>,
        author: &Annotator,
        position: NormalizedPosition,
    ) -> Self {
        Self {
            id: generate_tag_id(),
            video_id: video_id.into(),
            timestamp: sanitize_timestamp(timestamp),
            text: text.into(),
            user_id: author.user_id.clone(),
            username: author.username.clone(),
            position,
            submitted: false,
        }
    }

    pub fn is_by(&self, author: &Annotator) -> bool {
        self.user_id == author.user_id
    }

    /// Timestamp formatted for lists, e.g. `01:05.3`.
    pub fn timestamp_label(&self) -> String {
        format_timestamp(self.timestamp)
    }
}

/// The signed-in user creating tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct Annotator {
    pub user_id: String,
    pub username: String,
}

impl Annotator {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }
}

/// Generate a unique tag ID.
pub fn generate_tag_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn sanitize_timestamp(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}

/// Format seconds as `MM:SS.d`. NaN and negative values render as `00:00.0`.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00.0".to_string();
    }
    // Round to tenths first so 59.96 becomes 01:00.0 rather than 00:59.10
    let tenths = (seconds * 10.0).round() as u64;
    let minutes = tenths / 600;
    let secs = (tenths % 600) / 10;
    let tenth = tenths % 10;
    format!("{:02}:{:02}.{}", minutes, secs, tenth)
}
