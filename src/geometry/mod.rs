//! Coordinate mapping between the player container and the video frame.
//!
//! ## Components
//! - `coord`: Phantom-typed coordinate spaces (`ContainerSpace`, `FrameSpace`)
//! - `position`: `NormalizedPosition`, the stored form of a tag location
//! - `mapper`: Letterbox/pillarbox aware pixel ↔ percent conversion

pub mod coord;
pub mod mapper;
pub mod position;

pub use coord::{ContainerSpace, Coord, FrameSpace, Rect, Size};
pub use mapper::{
    compute_visible_rect, normalized_to_pixel, pixel_to_normalized, IntrinsicFrameGeometry,
    VisibleRect,
};
pub use position::{NormalizedPosition, PERCENT_MAX};
