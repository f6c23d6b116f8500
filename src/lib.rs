//! ReefTag player core.
//!
//! Interaction logic for annotating fish species on reef survey videos:
//! mapping pointer positions onto the visible frame, drawing tag markers,
//! the player's selection state machine, frame capture for label
//! suggestions, and the per-video tag session. Rendering and the DOM live in
//! the host; it talks to this crate through [`player::MediaElement`],
//! [`player::EscapeHook`] and the events drained from
//! [`player::VideoPlayer`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod overlay;
pub mod player;
pub mod suggestion;
pub mod tags;

pub use error::{ReefTagError, ReefTagResult};
pub use geometry::{
    compute_visible_rect, normalized_to_pixel, pixel_to_normalized, IntrinsicFrameGeometry,
    NormalizedPosition, VisibleRect,
};
pub use overlay::{render_markers, Marker, MarkerVariant, OverlayStyle};
pub use player::{
    CapturedFrame, ClickOutcome, Draft, EscapeHook, EscapeRegistration, MediaElement,
    PlayerEvent, PlayerMode, RgbaFrame, TransportSnapshot, VideoPlayer,
};
pub use suggestion::{
    fetch_suggestions, SuggestionGuard, SuggestionResult, SuggestionService, SuggestionTicket,
};
pub use tags::{Annotator, InMemoryTagStore, Tag, TagSession, TagStore};
