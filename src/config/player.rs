//! Player configuration.
//!
//! Tunables that the host may override (skip length, capture quality,
//! marker opacity). Uses `parking_lot::RwLock` for a global default that
//! each `VideoPlayer` snapshots when it is created.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ResultExt, ReefTagResult};

/// `HTMLMediaElement.HAVE_CURRENT_DATA`.
pub const HAVE_CURRENT_DATA: u16 = 2;

lazy_static! {
    /// Global player configuration.
    pub static ref PLAYER_CONFIG: RwLock<PlayerConfig> = RwLock::new(PlayerConfig::default());
}

/// Player tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct PlayerConfig {
    /// Seconds moved by the rewind / fast-forward buttons.
    pub skip_seconds: f64,
    /// Granularity of the seek slider in seconds.
    pub seek_step: f64,
    /// Volume restored when unmuting from a zero volume.
    pub unmute_volume: f64,
    /// JPEG quality for captured frames (1-100).
    pub capture_quality: u8,
    /// Opacity of the marker that follows the pointer.
    pub hover_opacity: f32,
    /// Minimum `readyState` before a frame may be captured.
    pub min_capture_ready_state: u16,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            skip_seconds: 5.0,
            seek_step: 0.1,
            unmute_volume: 0.5,
            capture_quality: 85,
            hover_opacity: 0.5,
            min_capture_ready_state: HAVE_CURRENT_DATA,
        }
    }
}

impl PlayerConfig {
    /// Clamp every field into its valid range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.skip_seconds.is_finite() || self.skip_seconds <= 0.0 {
            self.skip_seconds = defaults.skip_seconds;
        }
        if !self.seek_step.is_finite() || self.seek_step <= 0.0 {
            self.seek_step = defaults.seek_step;
        }
        self.unmute_volume = if self.unmute_volume.is_finite() && self.unmute_volume > 0.0 {
            self.unmute_volume.min(1.0)
        } else {
            defaults.unmute_volume
        };
        self.capture_quality = self.capture_quality.clamp(1, 100);
        self.hover_opacity = if self.hover_opacity.is_finite() {
            self.hover_opacity.clamp(0.0, 1.0)
        } else {
            defaults.hover_opacity
        };
        self
    }
}

/// Snapshot of the current global configuration.
pub fn player_config() -> PlayerConfig {
    PLAYER_CONFIG.read().clone()
}

/// Replace the global configuration (for host sync).
pub fn set_player_config(config: PlayerConfig) {
    let config = config.sanitized();
    log::debug!("[CONFIG] set_player_config({:?})", config);
    *PLAYER_CONFIG.write() = config;
}

/// Parse a JSON configuration from the host and install it.
///
/// Missing fields keep their defaults.
pub fn load_player_config_json(json: &str) -> ReefTagResult<PlayerConfig> {
    let config: PlayerConfig =
        serde_json::from_str(json).context("failed to parse player config")?;
    let config = config.sanitized();
    set_player_config(config.clone());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.skip_seconds, 5.0);
        assert_eq!(config.unmute_volume, 0.5);
        assert_eq!(config.min_capture_ready_state, HAVE_CURRENT_DATA);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = PlayerConfig {
            skip_seconds: -2.0,
            seek_step: f64::NAN,
            unmute_volume: 3.0,
            capture_quality: 0,
            hover_opacity: 7.0,
            ..PlayerConfig::default()
        }
        .sanitized();

        assert_eq!(config.skip_seconds, 5.0);
        assert_eq!(config.seek_step, 0.1);
        assert_eq!(config.unmute_volume, 1.0);
        assert_eq!(config.capture_quality, 1);
        assert_eq!(config.hover_opacity, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{"skipSeconds": 10}"#).unwrap();
        assert_eq!(config.skip_seconds, 10.0);
        assert_eq!(config.capture_quality, 85);
    }

    #[test]
    fn test_load_json_rejects_garbage() {
        let err = load_player_config_json("{not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse player config"));
    }
}
