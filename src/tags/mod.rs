//! Tags, the per-video tag session, and the persistence boundary.

mod session;
mod store;
mod types;

pub use session::TagSession;
pub use store::{InMemoryTagStore, TagStore};
pub use types::{format_timestamp, generate_tag_id, Annotator, Tag};
