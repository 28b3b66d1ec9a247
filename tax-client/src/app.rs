//! Client session: runs the health probe, history sync and calculation
//! submissions against a [`CalculatorApi`] and folds their outcomes into
//! one [`AppState`].
//!
//! Requests run as spawned tasks. Each task reports back with exactly one
//! [`AppEvent`] over a channel, and the session applies events one at a
//! time, so the state is only ever touched from [`Session::next_event`].
//! If the session has been dropped by the time a task finishes, the event
//! is discarded.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use tax_core::{
    AppEvent, AppState, CalculatorApi, Generation, Transition, ValidationError, validate_form,
};

/// One page session against the calculation service.
pub struct Session {
    api: Arc<dyn CalculatorApi>,
    tax_year: String,
    state: AppState,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    in_flight: usize,
}

impl Session {
    pub fn new(
        api: Arc<dyn CalculatorApi>,
        tax_year: impl Into<String>,
    ) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            api,
            tax_year: tax_year.into(),
            state: AppState::new(),
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn set_income_input(
        &mut self,
        value: impl Into<String>,
    ) {
        self.state.set_income_input(value);
    }

    pub fn set_national_insurance_input(
        &mut self,
        value: impl Into<String>,
    ) {
        self.state.set_national_insurance_input(value);
    }

    /// Number of requests whose outcome has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Startup: health probe and history sync, issued independently.
    pub fn mount(&mut self) {
        info!("mounting session");
        self.probe_health();
        self.sync_history();
    }

    /// Fetch `/health` once. Failure is logged and leaves health unset.
    pub fn probe_health(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            match api.health().await {
                Ok(health) => AppEvent::HealthLoaded(health),
                Err(error) => {
                    warn!(%error, "health check failed");
                    AppEvent::HealthUnavailable {
                        reason: error.to_string(),
                    }
                }
            }
        });
    }

    /// Fetch recent calculations once. Failure is logged and keeps the
    /// current history. Overlapping syncs are not deduplicated; the last
    /// one to complete wins.
    pub fn sync_history(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            match api.history().await {
                Ok(entries) => {
                    debug!(count = entries.len(), "history fetched");
                    AppEvent::HistoryLoaded(entries)
                }
                Err(error) => {
                    warn!(%error, "failed to fetch history");
                    AppEvent::HistoryUnavailable {
                        reason: error.to_string(),
                    }
                }
            }
        });
    }

    /// Validate the form and send it.
    ///
    /// On a validation error nothing is sent and the state is unchanged.
    /// Otherwise the submission is marked as started (clearing the previous
    /// result and error) and its generation is returned. A submission made
    /// while another is in flight supersedes it.
    pub fn submit(&mut self) -> Result<Generation, ValidationError> {
        let request = validate_form(
            self.state.income_input(),
            self.state.national_insurance_input(),
            &self.tax_year,
        )?;

        let generation = self.state.next_generation();
        self.state.apply(AppEvent::SubmitStarted { generation });
        info!(generation, income = %request.income, "submitting calculation");

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            match api.calculate(&request).await {
                Ok(result) => AppEvent::SubmitSucceeded { generation, result },
                Err(error) => {
                    warn!(generation, %error, "calculation failed");
                    AppEvent::SubmitFailed {
                        generation,
                        message: error.user_message(),
                    }
                }
            }
        });

        Ok(generation)
    }

    /// Wait for the next request to complete and apply its outcome.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<Transition> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.in_flight -= 1;
        Some(self.handle(event))
    }

    /// Apply outcomes until no request is in flight, including the history
    /// syncs triggered by successful submissions.
    pub async fn settle(&mut self) {
        while self.next_event().await.is_some() {}
    }

    fn handle(
        &mut self,
        event: AppEvent,
    ) -> Transition {
        let succeeded = matches!(event, AppEvent::SubmitSucceeded { .. });
        if let AppEvent::SubmitSucceeded { generation, result } = &event {
            info!(generation, id = %result.id, "calculation completed");
        }

        let transition = self.state.apply(event);
        if transition == Transition::Stale {
            debug!(current = self.state.generation(), "dropped superseded response");
        }

        // The service stored the record either way, so even a superseded
        // success refreshes the list.
        if succeeded {
            self.sync_history();
        }
        transition
    }

    fn spawn<F>(
        &mut self,
        request: F,
    ) where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = request.await;
            if tx.send(event).is_err() {
                debug!("session closed, dropping late response");
            }
        });
    }
}

/// Mount a session and wait until the startup requests have resolved.
pub async fn load_dashboard(
    api: Arc<dyn CalculatorApi>,
    tax_year: &str,
) -> AppState {
    let mut session = Session::new(api, tax_year);
    session.mount();
    session.settle().await;
    session.state
}

/// Mount a session, submit one calculation and wait until every request,
/// including the follow-up history sync, has resolved.
///
/// Invalid input is reported before any request is made.
pub async fn calculate_once(
    api: Arc<dyn CalculatorApi>,
    tax_year: &str,
    income: &str,
    national_insurance: &str,
) -> Result<AppState, ValidationError> {
    validate_form(income, national_insurance, tax_year)?;

    let mut session = Session::new(api, tax_year);
    session.set_income_input(income);
    session.set_national_insurance_input(national_insurance);
    session.mount();
    session.submit()?;
    session.settle().await;
    Ok(session.state)
}
