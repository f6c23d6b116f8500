//! Configuration shared by every player instance.
//!
//! `PlayerConfig` sits behind a `parking_lot::RwLock` so the host can push a
//! whole configuration in one call; players copy it when they are created.

pub mod player;

pub use player::{
    load_player_config_json, player_config, set_player_config, PlayerConfig, HAVE_CURRENT_DATA,
    PLAYER_CONFIG,
};
