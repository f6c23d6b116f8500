//! Video player interaction core.
//!
//! ## Components
//! - `state`: `VideoPlayer`, the Idle/Hovering/Selecting/Viewing state machine
//! - `media`: `MediaElement`, what the player needs from a `<video>`
//! - `escape`: Scoped Escape listener tied to the draft's lifetime
//! - `capture`: JPEG encoding of captured frames
//! - `types`: Modes, events and snapshots shared with the host

mod capture;
mod escape;
mod media;
mod state;
mod types;


pub use capture::encode_jpeg_data_url;
pub use escape::{EscapeHook, EscapeRegistration, NoEscapeHook};
pub use media::{MediaElement, RgbaFrame};
pub use state::VideoPlayer;
pub use types::{CapturedFrame, ClickOutcome, Draft, PlayerEvent, PlayerMode, TransportSnapshot};
