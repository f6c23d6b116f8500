//! Label suggestions for a draft.
//!
//! The suggestion service is external and slow; by the time it answers the
//! user may have cancelled the draft or opened another one. Every request
//! carries a [`SuggestionTicket`] and [`SuggestionGuard::resolve`] only hands
//! back results whose ticket still matches the open draft.

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ReefTagResult;
use crate::player::CapturedFrame;

/// External service that proposes species labels for a frame.
pub trait SuggestionService {
    fn suggest<'a>(
        &'a self,
        frame: &'a CapturedFrame,
    ) -> LocalBoxFuture<'a, ReefTagResult<Vec<String>>>;
}

/// Outcome shown under the draft form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct SuggestionResult {
    pub suggestions: Vec<String>,
    /// Message for the user when the service failed.
    pub error: Option<String>,
}

impl SuggestionResult {
    /// Trim labels, drop blanks and case-insensitive duplicates, keep order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut suggestions: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            if suggestions.iter().any(|s| s.eq_ignore_ascii_case(label)) {
                continue;
            }
            suggestions.push(label.to_string());
        }
        Self {
            suggestions,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            suggestions: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Ask the service for labels; failures become an error result.
pub async fn fetch_suggestions(
    service: &dyn SuggestionService,
    frame: &CapturedFrame,
) -> SuggestionResult {
    match service.suggest(frame).await {
        Ok(labels) => {
            let result = SuggestionResult::from_labels(labels);
            log::debug!(
                "[SUGGEST] {} suggestions for frame at {:.2}s",
                result.suggestions.len(),
                frame.timestamp
            );
            result
        }
        Err(e) => {
            log::warn!("[SUGGEST] Service failed: {}", e);
            SuggestionResult::failed("Failed to get suggestions")
        }
    }
}

/// Identifies one suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub struct SuggestionTicket {
    #[ts(type = "number")]
    pub generation: u64,
    #[ts(type = "number")]
    pub draft_id: u64,
}

/// Tracks the single request allowed in flight.
#[derive(Debug, Default)]
pub struct SuggestionGuard {
    generation: u64,
    in_flight: Option<SuggestionTicket>,
}

impl SuggestionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `draft_id`; any earlier request becomes stale.
    pub fn begin(&mut self, draft_id: u64) -> SuggestionTicket {
        self.generation += 1;
        let ticket = SuggestionTicket {
            generation: self.generation,
            draft_id,
        };
        if let Some(previous) = self.in_flight.replace(ticket) {
            log::debug!(
                "[SUGGEST] Request {} superseded by {}",
                previous.generation,
                ticket.generation
            );
        }
        ticket
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Forget the request in flight; its response will be discarded.
    pub fn cancel(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            log::debug!("[SUGGEST] Request {} cancelled", ticket.generation);
        }
    }

    /// Accept a response only if its ticket is the latest request and its
    /// draft is still the open one.
    pub fn resolve(
        &mut self,
        ticket: SuggestionTicket,
        current_draft_id: Option<u64>,
        result: SuggestionResult,
    ) -> Option<SuggestionResult> {
        if self.in_flight != Some(ticket) {
            log::debug!("[SUGGEST] Discarding stale response {}", ticket.generation);
            return None;
        }
        self.in_flight = None;

        if current_draft_id != Some(ticket.draft_id) {
            log::debug!(
                "[SUGGEST] Draft {} closed before response {} arrived",
                ticket.draft_id,
                ticket.generation
            );
            return None;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReefTagError;
    use futures::FutureExt;

    struct FixedService(ReefTagResult<Vec<String>>);

    impl SuggestionService for FixedService {
        fn suggest<'a>(
            &'a self,
            _frame: &'a CapturedFrame,
        ) -> LocalBoxFuture<'a, ReefTagResult<Vec<String>>> {
            let result = match &self.0 {
                Ok(labels) => Ok(labels.clone()),
                Err(e) => Err(ReefTagError::SuggestionFailed(e.to_string())),
            };
            async move { result }.boxed_local()
        }
    }

    fn frame() -> CapturedFrame {
        CapturedFrame {
            data_url: "data:image/jpeg;base64,".to_string(),
            width: 4,
            height: 4,
            timestamp: 2.5,
        }
    }

    #[tokio::test]
    async fn test_fetch_normalizes_labels() {
        let service = FixedService(Ok(vec![
            " Manta Ray ".to_string(),
            "".to_string(),
            "manta ray".to_string(),
            "Grouper".to_string(),
        ]));
        let result = fetch_suggestions(&service, &frame()).await;
        assert_eq!(result.suggestions, vec!["Manta Ray", "Grouper"]);
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error() {
        let service = FixedService(Err(ReefTagError::SuggestionFailed("503".into())));
        let result = fetch_suggestions(&service, &frame()).await;
        assert!(result.suggestions.is_empty());
        assert_eq!(result.error.as_deref(), Some("Failed to get suggestions"));
    }

    #[tokio::test]
    async fn test_response_for_cancelled_draft_is_discarded() {
        let service = FixedService(Ok(vec!["Kelp".to_string()]));
        let mut guard = SuggestionGuard::new();

        let ticket = guard.begin(1);
        let result = fetch_suggestions(&service, &frame()).await;

        // Draft 1 was cancelled while the request was pending
        guard.cancel();
        assert!(guard.resolve(ticket, None, result).is_none());
    }

    #[tokio::test]
    async fn test_response_for_replaced_draft_is_discarded() {
        let service = FixedService(Ok(vec!["Kelp".to_string()]));
        let mut guard = SuggestionGuard::new();

        let first = guard.begin(1);
        let second = guard.begin(2);
        let result = fetch_suggestions(&service, &frame()).await;

        assert!(guard.resolve(first, Some(2), result.clone()).is_none());
        assert!(guard.is_in_flight());
        assert_eq!(guard.resolve(second, Some(2), result.clone()), Some(result));
        assert!(!guard.is_in_flight());
    }

    #[test]
    fn test_draft_changed_without_new_request() {
        let mut guard = SuggestionGuard::new();
        let ticket = guard.begin(1);
        let result = SuggestionResult::from_labels(["Eel"]);
        assert!(guard.resolve(ticket, Some(7), result).is_none());
        assert!(!guard.is_in_flight());
    }
}
