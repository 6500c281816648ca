//! AI play suggestions and playbook summaries.
//!
//! The editor talks to a text-completion service through [`PlayAdvisor`]. Inputs are
//! validated locally first, so an empty formation never reaches the service. Calls run
//! on background tasks and can overlap; [`RequestTracker`] keeps only the result of the
//! most recently issued request.

mod http;
pub mod prompts;

pub use http::HttpAdvisor;

use crate::error::{AiServiceError, ValidationError};
use crate::store::SavedPlay;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestPlayRequest {
    pub opponent_formation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestPlayResponse {
    pub suggested_play: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizePlaybookRequest {
    pub playbook_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizePlaybookResponse {
    pub summary: String,
}

/// Thread-safety required of advisors on native targets. Browser futures are not `Send`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

/// A text-completion service that coaches.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PlayAdvisor: MaybeSendSync {
    /// Suggests a play against an opponent formation.
    async fn suggest_play(
        &self,
        request: SuggestPlayRequest,
    ) -> Result<SuggestPlayResponse, AiServiceError>;

    /// Summarizes the plays of a playbook.
    async fn summarize_playbook(
        &self,
        request: SummarizePlaybookRequest,
    ) -> Result<SummarizePlaybookResponse, AiServiceError>;
}

/// Builds a suggestion request, rejecting a blank formation.
pub fn validate_suggest_request(
    opponent_formation: &str,
) -> Result<SuggestPlayRequest, ValidationError> {
    let formation = opponent_formation.trim();
    if formation.is_empty() {
        return Err(ValidationError::EmptyFormation);
    }
    Ok(SuggestPlayRequest {
        opponent_formation: formation.to_string(),
    })
}

/// Builds a summary request from the saved plays, rejecting an empty playbook.
pub fn validate_summarize_request(
    plays: &[SavedPlay],
) -> Result<SummarizePlaybookRequest, ValidationError> {
    if plays.is_empty() {
        return Err(ValidationError::EmptyPlaybook);
    }
    Ok(SummarizePlaybookRequest {
        playbook_content: prompts::describe_playbook(plays),
    })
}

/// Advisor used when no service is configured. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredAdvisor;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PlayAdvisor for UnconfiguredAdvisor {
    async fn suggest_play(
        &self,
        _request: SuggestPlayRequest,
    ) -> Result<SuggestPlayResponse, AiServiceError> {
        Err(AiServiceError::NotConfigured)
    }

    async fn summarize_playbook(
        &self,
        _request: SummarizePlaybookRequest,
    ) -> Result<SummarizePlaybookResponse, AiServiceError> {
        Err(AiServiceError::NotConfigured)
    }
}

/// Monotonic number identifying one issued request.
pub type Generation = u64;

/// Progress of the latest request of one kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

/// Tracks overlapping requests and applies only the newest result.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTracker<T> {
    state: RequestState<T>,
    latest: Generation,
}

impl<T> Default for RequestTracker<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            latest: 0,
        }
    }
}

impl<T> RequestTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a new request as in flight and returns its generation.
    pub fn begin(&mut self) -> Generation {
        self.latest += 1;
        self.state = RequestState::Loading;
        self.latest
    }

    /// Applies the outcome of request `generation`.
    ///
    /// # Returns
    ///
    /// `false` if a newer request has been issued since, in which case the outcome is
    /// dropped.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        generation: Generation,
        outcome: Result<T, E>,
    ) -> bool {
        if generation != self.latest {
            log::debug!(
                "dropping stale advisor result {generation} (latest {})",
                self.latest
            );
            return false;
        }
        self.state = match outcome {
            Ok(value) => RequestState::Ready(value),
            Err(e) => RequestState::Failed(e.to_string()),
        };
        true
    }

    /// Records a failure that happened before any request was issued.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.latest += 1;
        self.state = RequestState::Failed(message.into());
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn latest(&self) -> Generation {
        self.latest
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Advisor double that answers from fixed text and counts calls.
    #[derive(Default)]
    pub(crate) struct ScriptedAdvisor {
        pub calls: AtomicUsize,
    }

    #[cfg_attr(not(target_arch = "wasm32"), async_trait)]
    #[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
    impl PlayAdvisor for ScriptedAdvisor {
        async fn suggest_play(
            &self,
            request: SuggestPlayRequest,
        ) -> Result<SuggestPlayResponse, AiServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SuggestPlayResponse {
                suggested_play: "Four Verticals".to_string(),
                rationale: format!("Stretches {} deep", request.opponent_formation),
            })
        }

        async fn summarize_playbook(
            &self,
            request: SummarizePlaybookRequest,
        ) -> Result<SummarizePlaybookResponse, AiServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SummarizePlaybookResponse {
                summary: format!("{} characters of plays", request.playbook_content.len()),
            })
        }
    }

    /// Validates and then calls, the way the UI does.
    fn suggest(advisor: &dyn PlayAdvisor, formation: &str) -> Result<SuggestPlayResponse, String> {
        let request = validate_suggest_request(formation).map_err(|e| e.to_string())?;
        block_on(advisor.suggest_play(request)).map_err(|e| e.to_string())
    }

    #[test]
    fn empty_formation_never_reaches_advisor() {
        let advisor = ScriptedAdvisor::default();

        let result = suggest(&advisor, "   ");

        assert_eq!(result, Err(ValidationError::EmptyFormation.to_string()));
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn valid_formation_is_trimmed_and_sent() {
        let advisor = ScriptedAdvisor::default();

        let response = suggest(&advisor, "  Cover 2 ").unwrap();

        assert_eq!(response.rationale, "Stretches Cover 2 deep");
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_playbook_is_rejected() {
        assert_eq!(
            validate_summarize_request(&[]),
            Err(ValidationError::EmptyPlaybook)
        );
    }

    #[test]
    fn unconfigured_advisor_fails() {
        let result = block_on(UnconfiguredAdvisor.suggest_play(SuggestPlayRequest {
            opponent_formation: "Nickel".to_string(),
        }));
        assert_eq!(result, Err(AiServiceError::NotConfigured));
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json = serde_json::to_value(SuggestPlayResponse {
            suggested_play: "Slant".into(),
            rationale: "Quick".into(),
        })
        .unwrap();
        assert_eq!(json["suggestedPlay"], "Slant");

        let request = serde_json::to_value(SuggestPlayRequest {
            opponent_formation: "3-4".into(),
        })
        .unwrap();
        assert_eq!(request["opponentFormation"], "3-4");
    }

    #[test]
    fn tracker_keeps_only_latest_result() {
        let mut tracker: RequestTracker<String> = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(tracker.complete::<AiServiceError>(second, Ok("new".into())));
        assert!(!tracker.complete::<AiServiceError>(first, Ok("old".into())));

        assert_eq!(tracker.state(), &RequestState::Ready("new".to_string()));
    }

    #[test]
    fn tracker_records_failures() {
        let mut tracker: RequestTracker<String> = RequestTracker::new();
        let generation = tracker.begin();
        assert!(tracker.is_loading());

        tracker.complete(generation, Err(AiServiceError::Transport("offline".into())));

        assert_eq!(
            tracker.state(),
            &RequestState::Failed("AI service request failed: offline".to_string())
        );
    }

    #[test]
    fn validation_failure_supersedes_in_flight_request() {
        let mut tracker: RequestTracker<String> = RequestTracker::new();
        let generation = tracker.begin();
        tracker.fail(ValidationError::EmptyFormation.to_string());

        let accepted = tracker.complete::<AiServiceError>(generation, Ok("late".into()));
        assert!(!accepted);
        assert!(matches!(tracker.state(), RequestState::Failed(_)));
    }
}
