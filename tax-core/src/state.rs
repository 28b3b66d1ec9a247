//! Application state for the tax calculator client.
//!
//! Every change to [`AppState`] after construction goes through
//! [`AppState::apply`], one [`AppEvent`] at a time. A completed request is
//! therefore always applied as a single step: `loading` is cleared in the
//! same transition that stores the result or the error.

use std::fmt;

use tracing::warn;

use crate::models::{CalculationResult, HISTORY_LIMIT, HealthStatus, HistoryEntry};

/// Identifies one submission. Strictly increasing within a session.
pub type Generation = u64;

/// Everything that can happen to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A validated request is about to be sent.
    SubmitStarted { generation: Generation },
    SubmitSucceeded {
        generation: Generation,
        result: CalculationResult,
    },
    SubmitFailed {
        generation: Generation,
        message: String,
    },
    HistoryLoaded(Vec<HistoryEntry>),
    /// History could not be fetched; the displayed list is kept.
    HistoryUnavailable { reason: String },
    HealthLoaded(HealthStatus),
    /// Health could not be fetched; nothing is shown.
    HealthUnavailable { reason: String },
}

/// What [`AppState::apply`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed.
    Applied,
    /// The event belongs to a superseded submission and was dropped.
    Stale,
    /// The event carries no state change (a logged failure).
    Unchanged,
}

/// Single aggregate state owned by a client session.
#[derive(Clone, Default)]
pub struct AppState {
    income_input: String,
    national_insurance_input: String,
    result: Option<CalculationResult>,
    history: Vec<HistoryEntry>,
    loading: bool,
    error: Option<String>,
    health: Option<HealthStatus>,
    generation: Generation,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn income_input(&self) -> &str {
        &self.income_input
    }

    pub fn set_income_input(
        &mut self,
        value: impl Into<String>,
    ) {
        self.income_input = value.into();
    }

    pub fn national_insurance_input(&self) -> &str {
        &self.national_insurance_input
    }

    pub fn set_national_insurance_input(
        &mut self,
        value: impl Into<String>,
    ) {
        self.national_insurance_input = value.into();
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        self.result.as_ref()
    }

    /// Newest first, exactly as the service returned it.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    /// Generation of the most recent submission, `0` before the first.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Generation to use for the next [`AppEvent::SubmitStarted`].
    pub fn next_generation(&self) -> Generation {
        self.generation + 1
    }

    /// Applies one event.
    pub fn apply(
        &mut self,
        event: AppEvent,
    ) -> Transition {
        match event {
            AppEvent::SubmitStarted { generation } => {
                if generation <= self.generation {
                    return Transition::Stale;
                }
                self.generation = generation;
                self.loading = true;
                self.error = None;
                self.result = None;
                Transition::Applied
            }
            AppEvent::SubmitSucceeded { generation, result } => {
                if !self.is_current(generation) {
                    return Transition::Stale;
                }
                self.result = Some(result);
                self.error = None;
                self.loading = false;
                Transition::Applied
            }
            AppEvent::SubmitFailed {
                generation,
                message,
            } => {
                if !self.is_current(generation) {
                    return Transition::Stale;
                }
                self.error = Some(message);
                self.loading = false;
                Transition::Applied
            }
            AppEvent::HistoryLoaded(mut entries) => {
                if entries.len() > HISTORY_LIMIT {
                    warn!(
                        received = entries.len(),
                        limit = HISTORY_LIMIT,
                        "history longer than limit, truncating"
                    );
                    entries.truncate(HISTORY_LIMIT);
                }
                self.history = entries;
                Transition::Applied
            }
            AppEvent::HealthLoaded(health) => {
                self.health = Some(health);
                Transition::Applied
            }
            AppEvent::HistoryUnavailable { .. } | AppEvent::HealthUnavailable { .. } => {
                Transition::Unchanged
            }
        }
    }

    fn is_current(
        &self,
        generation: Generation,
    ) -> bool {
        self.loading && generation == self.generation
    }
}

impl fmt::Debug for AppState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("AppState")
            .field("income_input", &self.income_input)
            .field("national_insurance_input", &"<redacted>")
            .field("result", &self.result)
            .field("history_len", &self.history.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("health", &self.health)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::OverallStatus;

    fn sample_result(id: &str) -> CalculationResult {
        CalculationResult {
            id: id.to_string(),
            income: dec!(50000),
            income_tax: dec!(7500),
            national_insurance_contribution: dec!(4500),
            take_home: dec!(38000),
            effective_rate: dec!(24.0),
            masked_national_insurance: "vault:v1:abc".to_string(),
            timestamp: None,
        }
    }

    fn sample_entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            timestamp: "2025-01-01T00:00:00Z".to_string(),
            income: dec!(30000),
            income_tax: dec!(3486),
            national_insurance_contribution: dec!(2091.60),
            take_home: dec!(24422.40),
            effective_rate: None,
            masked_national_insurance: "vault:v1:abcdefghijk...".to_string(),
        }
    }

    fn started(state: &mut AppState) -> Generation {
        let generation = state.next_generation();
        assert_eq!(
            state.apply(AppEvent::SubmitStarted { generation }),
            Transition::Applied
        );
        generation
    }

    // =========================================================================
    // submission lifecycle
    // =========================================================================

    #[test]
    fn new_state_is_idle_and_empty() {
        let state = AppState::new();

        assert!(!state.is_loading());
        assert!(state.result().is_none());
        assert!(state.error().is_none());
        assert!(state.health().is_none());
        assert!(state.history().is_empty());
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn successful_submission_toggles_loading_once_and_never_errors() {
        let mut state = AppState::new();

        let generation = started(&mut state);
        assert!(state.is_loading());
        assert!(state.error().is_none());

        let t = state.apply(AppEvent::SubmitSucceeded {
            generation,
            result: sample_result("abc123"),
        });

        assert_eq!(t, Transition::Applied);
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert_eq!(state.result().unwrap().id, "abc123");
    }

    #[test]
    fn failed_submission_sets_error_and_leaves_result_unset() {
        let mut state = AppState::new();
        let generation = started(&mut state);

        state.apply(AppEvent::SubmitFailed {
            generation,
            message: "Calculation failed".to_string(),
        });

        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("Calculation failed"));
        assert!(state.result().is_none());
    }

    #[test]
    fn starting_a_submission_clears_previous_result_and_error() {
        let mut state = AppState::new();
        let first = started(&mut state);
        state.apply(AppEvent::SubmitFailed {
            generation: first,
            message: "Calculation failed".to_string(),
        });
        let second = started(&mut state);
        state.apply(AppEvent::SubmitSucceeded {
            generation: second,
            result: sample_result("one"),
        });

        started(&mut state);

        assert!(state.error().is_none());
        assert!(state.result().is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn new_success_replaces_previous_result() {
        let mut state = AppState::new();
        let first = started(&mut state);
        state.apply(AppEvent::SubmitSucceeded {
            generation: first,
            result: sample_result("one"),
        });
        let second = started(&mut state);
        state.apply(AppEvent::SubmitSucceeded {
            generation: second,
            result: sample_result("two"),
        });

        assert_eq!(state.result().unwrap().id, "two");
    }

    // =========================================================================
    // overlapping submissions
    // =========================================================================

    #[test]
    fn stale_success_cannot_overwrite_newer_submission() {
        let mut state = AppState::new();
        let old = started(&mut state);
        let new = started(&mut state);

        let t = state.apply(AppEvent::SubmitSucceeded {
            generation: old,
            result: sample_result("old"),
        });

        assert_eq!(t, Transition::Stale);
        assert!(state.result().is_none());
        assert!(state.is_loading(), "newer submission still in flight");

        state.apply(AppEvent::SubmitSucceeded {
            generation: new,
            result: sample_result("new"),
        });
        assert_eq!(state.result().unwrap().id, "new");
        assert!(!state.is_loading());
    }

    #[test]
    fn late_stale_response_after_newer_completes_is_ignored() {
        let mut state = AppState::new();
        let old = started(&mut state);
        let new = started(&mut state);
        state.apply(AppEvent::SubmitSucceeded {
            generation: new,
            result: sample_result("new"),
        });

        let t = state.apply(AppEvent::SubmitFailed {
            generation: old,
            message: "Calculation failed".to_string(),
        });

        assert_eq!(t, Transition::Stale);
        assert!(state.error().is_none());
        assert_eq!(state.result().unwrap().id, "new");
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let mut state = AppState::new();
        let generation = started(&mut state);
        state.apply(AppEvent::SubmitSucceeded {
            generation,
            result: sample_result("first"),
        });

        let t = state.apply(AppEvent::SubmitFailed {
            generation,
            message: "Calculation failed".to_string(),
        });

        assert_eq!(t, Transition::Stale);
        assert!(state.error().is_none());
    }

    #[test]
    fn reused_start_generation_is_stale() {
        let mut state = AppState::new();
        let generation = started(&mut state);

        assert_eq!(
            state.apply(AppEvent::SubmitStarted { generation }),
            Transition::Stale
        );
    }

    // =========================================================================
    // history and health
    // =========================================================================

    #[test]
    fn history_is_replaced_wholesale_in_server_order() {
        let mut state = AppState::new();
        state.apply(AppEvent::HistoryLoaded(vec![sample_entry("x")]));

        state.apply(AppEvent::HistoryLoaded(vec![
            sample_entry("c"),
            sample_entry("a"),
            sample_entry("b"),
        ]));

        let ids: Vec<_> = state.history().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn history_is_capped_at_limit() {
        let mut state = AppState::new();
        let entries: Vec<_> = (0..60).map(|i| sample_entry(&i.to_string())).collect();

        state.apply(AppEvent::HistoryLoaded(entries));

        assert_eq!(state.history().len(), HISTORY_LIMIT);
        assert_eq!(state.history()[0].id, "0");
        assert_eq!(state.history()[49].id, "49");
    }

    #[test]
    fn empty_history_replaces_existing() {
        let mut state = AppState::new();
        state.apply(AppEvent::HistoryLoaded(vec![sample_entry("x")]));

        state.apply(AppEvent::HistoryLoaded(Vec::new()));

        assert!(state.history().is_empty());
    }

    #[test]
    fn history_failure_keeps_existing_entries() {
        let mut state = AppState::new();
        state.apply(AppEvent::HistoryLoaded(vec![sample_entry("x")]));

        let t = state.apply(AppEvent::HistoryUnavailable {
            reason: "connection refused".to_string(),
        });

        assert_eq!(t, Transition::Unchanged);
        assert_eq!(state.history().len(), 1);
        assert!(state.error().is_none());
    }

    #[test]
    fn health_loaded_and_failure_does_not_surface_error() {
        let mut state = AppState::new();

        state.apply(AppEvent::HealthUnavailable {
            reason: "timeout".to_string(),
        });
        assert!(state.health().is_none());
        assert!(state.error().is_none());

        state.apply(AppEvent::HealthLoaded(HealthStatus {
            status: OverallStatus::Healthy,
            vault: "healthy".to_string(),
            database: "healthy".to_string(),
            timestamp: None,
        }));
        assert!(state.health().unwrap().status.is_healthy());
    }

    #[test]
    fn history_and_health_do_not_touch_submission_state() {
        let mut state = AppState::new();
        started(&mut state);

        state.apply(AppEvent::HistoryLoaded(vec![sample_entry("x")]));

        assert!(state.is_loading());
        assert!(state.result().is_none());
    }

    #[test]
    fn debug_output_redacts_national_insurance_input() {
        let mut state = AppState::new();
        state.set_national_insurance_input("AB123456C");

        assert!(!format!("{state:?}").contains("AB123456C"));
        assert_eq!(state.national_insurance_input(), "AB123456C");
    }
}
