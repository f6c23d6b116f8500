//! In-memory tag list for the video currently on screen.

use super::store::TagStore;
use super::types::{Annotator, Tag};
use crate::error::{ReefTagError, ReefTagResult};

/// Tags for one video as seen by one annotator.
///
/// Unsubmitted tags live only here until [`TagSession::submit`] writes them
/// to the store. Submitted tags are read-only from this point on.
#[derive(Debug, Clone)]
pub struct TagSession {
    video_id: String,
    annotator: Annotator,
    tags: Vec<Tag>,
}

impl TagSession {
    pub fn new(video_id: impl Into<String>, annotator: Annotator) -> Self {
        Self {
            video_id: video_id.into(),
            annotator,
            tags: Vec::new(),
        }
    }

    /// Start a session from whatever the store already holds for the video.
    pub fn load(
        store: &dyn TagStore,
        video_id: impl Into<String>,
        annotator: Annotator,
    ) -> ReefTagResult<Self> {
        let video_id = video_id.into();
        let tags = store.load_tags(&video_id)?;
        log::debug!("[TAGS] Loaded {} tags for {}", tags.len(), video_id);
        Ok(Self {
            video_id,
            annotator,
            tags,
        })
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, tag: Tag) -> ReefTagResult<()> {
        if tag.video_id != self.video_id {
            return Err(ReefTagError::TagVideoMismatch {
                expected: self.video_id.clone(),
                actual: tag.video_id,
            });
        }
        log::debug!("[TAGS] Added '{}' at {:.2}s", tag.text, tag.timestamp);
        self.tags.push(tag);
        Ok(())
    }

    /// Change a tag's label. Submitted tags are locked.
    pub fn update_text(&mut self, id: &str, text: &str) -> ReefTagResult<&Tag> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReefTagError::EmptyTagText);
        }
        let tag = self.editable_mut(id)?;
        tag.text = text.to_string();
        Ok(tag)
    }

    /// Remove a tag. Submitted tags are locked.
    pub fn delete(&mut self, id: &str) -> ReefTagResult<Tag> {
        self.editable_mut(id)?;
        let index = self
            .tags
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ReefTagError::TagNotFound { id: id.to_string() })?;
        Ok(self.tags.remove(index))
    }

    /// The annotator's tags that still need submitting.
    pub fn pending(&self) -> Vec<&Tag> {
        self.tags
            .iter()
            .filter(|t| t.is_by(&self.annotator) && !t.submitted)
            .collect()
    }

    /// True once the annotator has submitted anything for this video.
    pub fn is_submitted(&self) -> bool {
        self.tags
            .iter()
            .any(|t| t.is_by(&self.annotator) && t.submitted)
    }

    /// Send pending tags to the store and lock them. Returns how many were sent.
    pub fn submit(&mut self, store: &mut dyn TagStore) -> ReefTagResult<usize> {
        let pending: Vec<Tag> = self.pending().into_iter().cloned().collect();
        if pending.is_empty() {
            return Ok(0);
        }

        store.save_tags(&pending)?;

        for tag in self.tags.iter_mut() {
            if pending.iter().any(|p| p.id == tag.id) {
                tag.submitted = true;
            }
        }
        log::info!(
            "[TAGS] Submitted {} tags for {}",
            pending.len(),
            self.video_id
        );
        Ok(pending.len())
    }

    fn editable_mut(&mut self, id: &str) -> ReefTagResult<&mut Tag> {
        let tag = self
            .tags
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ReefTagError::TagNotFound { id: id.to_string() })?;
        if tag.submitted {
            return Err(ReefTagError::TagLocked { id: id.to_string() });
        }
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NormalizedPosition;
    use crate::tags::InMemoryTagStore;

    fn dana() -> Annotator {
        Annotator::new("u-1", "Dana")
    }

    fn session_with(n: usize) -> TagSession {
        let mut session = TagSession::new("vid-1", dana());
        for i in 0..n {
            let tag = Tag::new(
                "vid-1",
                i as f64,
                format!("Fish {}", i),
                &dana(),
                NormalizedPosition::center(),
            );
            session.add(tag).unwrap();
        }
        session
    }

    #[test]
    fn test_add_rejects_other_video() {
        let mut session = TagSession::new("vid-1", dana());
        let tag = Tag::new("vid-2", 1.0, "Kelp", &dana(), NormalizedPosition::center());
        assert!(matches!(
            session.add(tag),
            Err(ReefTagError::TagVideoMismatch { .. })
        ));
        assert!(session.is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let mut session = session_with(2);
        let id = session.tags()[0].id.clone();

        let updated = session.update_text(&id, "  Manta Ray ").unwrap();
        assert_eq!(updated.text, "Manta Ray");

        assert!(matches!(
            session.update_text(&id, "   "),
            Err(ReefTagError::EmptyTagText)
        ));

        let removed = session.delete(&id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(session.len(), 1);
        assert!(matches!(
            session.delete(&id),
            Err(ReefTagError::TagNotFound { .. })
        ));
    }

    #[test]
    fn test_submit_locks_tags() {
        let mut session = session_with(3);
        let mut store = InMemoryTagStore::new();

        assert_eq!(session.pending().len(), 3);
        assert!(!session.is_submitted());

        assert_eq!(session.submit(&mut store).unwrap(), 3);
        assert!(session.pending().is_empty());
        assert!(session.is_submitted());
        assert_eq!(store.len(), 3);

        let id = session.tags()[1].id.clone();
        assert!(matches!(
            session.update_text(&id, "Grouper"),
            Err(ReefTagError::TagLocked { .. })
        ));
        assert!(matches!(
            session.delete(&id),
            Err(ReefTagError::TagLocked { .. })
        ));

        // Nothing left to send
        assert_eq!(session.submit(&mut store).unwrap(), 0);
    }

    #[test]
    fn test_pending_ignores_other_annotators() {
        let mut session = session_with(1);
        let other = Annotator::new("u-2", "Ari");
        session
            .add(Tag::new("vid-1", 4.0, "Eel", &other, NormalizedPosition::center()))
            .unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.pending().len(), 1);
    }

    #[test]
    fn test_load_from_store() {
        let mut store = InMemoryTagStore::new();
        let tag = Tag::new("vid-1", 2.0, "Kelp", &dana(), NormalizedPosition::center());
        store.save_tags(&[tag]).unwrap();

        let session = TagSession::load(&store, "vid-1", dana()).unwrap();
        assert_eq!(session.len(), 1);
        assert!(session.is_submitted());
    }
}
