//! Tag persistence boundary.
//!
//! The real store lives outside this crate (the web app talks to its own
//! backend). Only the shape of the calls matters here.

use std::collections::BTreeMap;

use super::types::Tag;
use crate::error::{ReefTagError, ReefTagResult};

/// Persistence collaborator for tags.
pub trait TagStore {
    /// All tags recorded for a video.
    fn load_tags(&self, video_id: &str) -> ReefTagResult<Vec<Tag>>;

    /// Persist tags as submitted for review.
    fn save_tags(&mut self, tags: &[Tag]) -> ReefTagResult<()>;

    /// Replace a stored tag.
    fn update_tag(&mut self, tag: &Tag) -> ReefTagResult<()>;

    /// Remove a stored tag.
    fn delete_tag(&mut self, id: &str) -> ReefTagResult<()>;
}

/// Map-backed store for tests and offline demos.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTagStore {
    tags: BTreeMap<String, Tag>,
}

impl InMemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Tag> {
        self.tags.get(id)
    }
}

impl TagStore for InMemoryTagStore {
    fn load_tags(&self, video_id: &str) -> ReefTagResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .tags
            .values()
            .filter(|t| t.video_id == video_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Ok(tags)
    }

    fn save_tags(&mut self, tags: &[Tag]) -> ReefTagResult<()> {
        for tag in tags {
            let mut stored = tag.clone();
            stored.submitted = true;
            self.tags.insert(stored.id.clone(), stored);
        }
        Ok(())
    }

    fn update_tag(&mut self, tag: &Tag) -> ReefTagResult<()> {
        match self.tags.get_mut(&tag.id) {
            Some(existing) => {
                *existing = tag.clone();
                Ok(())
            }
            None => Err(ReefTagError::StoreError(format!(
                "cannot update unknown tag {}",
                tag.id
            ))),
        }
    }

    fn delete_tag(&mut self, id: &str) -> ReefTagResult<()> {
        self.tags.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NormalizedPosition;
    use crate::tags::Annotator;

    fn tag(video: &str, ts: f64) -> Tag {
        Tag::new(
            video,
            ts,
            "Kelp",
            &Annotator::new("u-1", "Dana"),
            NormalizedPosition::center(),
        )
    }

    #[test]
    fn test_save_marks_submitted() {
        let mut store = InMemoryTagStore::new();
        let t = tag("vid-1", 3.0);
        store.save_tags(std::slice::from_ref(&t)).unwrap();

        let stored = store.get(&t.id).unwrap();
        assert!(stored.submitted);
        assert!(!t.submitted);
    }

    #[test]
    fn test_load_filters_and_orders() {
        let mut store = InMemoryTagStore::new();
        store
            .save_tags(&[tag("vid-1", 9.0), tag("vid-2", 1.0), tag("vid-1", 2.0)])
            .unwrap();

        let loaded = store.load_tags("vid-1").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].timestamp, 2.0);
        assert_eq!(loaded[1].timestamp, 9.0);
    }

    #[test]
    fn test_update_unknown_fails() {
        let mut store = InMemoryTagStore::new();
        let err = store.update_tag(&tag("vid-1", 1.0)).unwrap_err();
        assert!(matches!(err, ReefTagError::StoreError(_)));
    }

    #[test]
    fn test_delete() {
        let mut store = InMemoryTagStore::new();
        let t = tag("vid-1", 1.0);
        store.save_tags(std::slice::from_ref(&t)).unwrap();
        store.delete_tag(&t.id).unwrap();
        assert!(store.is_empty());
    }
}
