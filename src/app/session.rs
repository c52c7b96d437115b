//! Review and feedback submission
//!
//! `ReviewSession` owns the state shared between the frame loop and the
//! request tasks. The frame loop only reads snapshots and calls the submit
//! methods; tasks write outcomes back and request a repaint.

use crate::constants::*;
use crate::error::{ServiceError, ValidationError};
use crate::service::SentimentService;
use crate::types::*;
use chrono::{DateTime, Local};
use eframe::egui;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Warning,
    Error,
    Success,
}

/// A message the user has to dismiss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub mode: ViewMode,
    /// Last successful analysis. Only displayed while `mode` is `Results`.
    pub result: Option<AnalysisResult>,
    pub analyzed_at: Option<DateTime<Local>>,
    pub feedback_visible: bool,
    pub pending_rating: Option<FeedbackRating>,
    pub alerts: VecDeque<Alert>,
}

impl SessionState {
    fn begin_analysis(&mut self) {
        self.mode = ViewMode::Loading;
        self.feedback_visible = false;
    }

    fn show_results(&mut self, result: AnalysisResult) {
        self.mode = ViewMode::Results;
        self.result = Some(result);
        self.analyzed_at = Some(Local::now());
        self.feedback_visible = true;
    }

    fn show_failure(&mut self) {
        self.mode = ViewMode::Idle;
        self.feedback_visible = false;
        self.alerts.push_back(Alert::new(AlertKind::Error, MSG_ANALYZE_FAILED));
    }

    /// Result to render, if the results block is visible
    pub fn visible_result(&self) -> Option<&AnalysisResult> {
        match self.mode {
            ViewMode::Results => self.result.as_ref(),
            _ => None,
        }
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct ReviewSession {
    state: Arc<Mutex<SessionState>>,
    service: Arc<dyn SentimentService>,
    runtime: tokio::runtime::Handle,
    ctx: egui::Context,
}

impl ReviewSession {
    pub fn new(
        service: Arc<dyn SentimentService>,
        runtime: tokio::runtime::Handle,
        ctx: egui::Context,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            service,
            runtime,
            ctx,
        }
    }

    /// Swap the backing service (e.g. after the service URL changed).
    /// Requests already in flight finish against the old one.
    pub fn set_service(&mut self, service: Arc<dyn SentimentService>) {
        self.service = service;
    }

    pub fn snapshot(&self) -> SessionState {
        lock(&self.state).clone()
    }

    pub fn current_alert(&self) -> Option<Alert> {
        lock(&self.state).alerts.front().cloned()
    }

    pub fn dismiss_alert(&self) {
        lock(&self.state).alerts.pop_front();
    }

    /// Validate the editor text and start one `/analyze` request.
    ///
    /// Blank input raises a warning alert and sends nothing.
    pub fn submit_review(&self, raw: &str) -> Result<JoinHandle<()>, ValidationError> {
        let input = match ReviewInput::parse(raw) {
            Ok(input) => input,
            Err(e) => {
                self.push_validation_alert(e);
                return Err(e);
            }
        };

        info!(chars = input.as_str().len(), "Submitting review for analysis");
        lock(&self.state).begin_analysis();
        self.ctx.request_repaint();

        let state = self.state.clone();
        let service = self.service.clone();
        let ctx = self.ctx.clone();

        Ok(self.runtime.spawn(async move {
            let outcome = service.analyze(input).await;
            {
                let mut s = lock(&state);
                match outcome {
                    Ok(result) => {
                        info!(
                            findings = result.analysis.len(),
                            overall = %result.overall_sentiment,
                            "Analysis complete"
                        );
                        s.show_results(result);
                    }
                    Err(e) => {
                        error!(error = %e, "Error analyzing review");
                        s.show_failure();
                    }
                }
            }
            ctx.request_repaint();
        }))
    }

    /// Replace the pending star selection
    pub fn select_rating(&self, rating: FeedbackRating) {
        lock(&self.state).pending_rating = Some(rating);
    }

    /// Send the pending rating to `/feedback`. Without a selection this
    /// raises a warning alert and sends nothing.
    pub fn submit_feedback(&self) -> Result<JoinHandle<()>, ValidationError> {
        let pending = lock(&self.state).pending_rating;
        let Some(rating) = pending else {
            self.push_validation_alert(ValidationError::NoRating);
            return Err(ValidationError::NoRating);
        };

        info!(rating = rating.stars(), "Submitting feedback");

        let state = self.state.clone();
        let service = self.service.clone();
        let ctx = self.ctx.clone();

        Ok(self.runtime.spawn(async move {
            let outcome = service.submit_feedback(rating).await;
            {
                let mut s = lock(&state);
                match outcome {
                    Ok(()) => {
                        info!(rating = rating.stars(), "Feedback accepted");
                        if s.pending_rating == Some(rating) {
                            s.pending_rating = None;
                        }
                        s.alerts.push_back(Alert::new(AlertKind::Success, MSG_FEEDBACK_SENT));
                    }
                    Err(e) => {
                        error!(error = %e, "Error submitting feedback");
                        s.alerts.push_back(Alert::new(AlertKind::Error, feedback_failure_message(&e)));
                    }
                }
            }
            ctx.request_repaint();
        }))
    }

    fn push_validation_alert(&self, e: ValidationError) {
        warn!(reason = %e, "Submission blocked");
        lock(&self.state)
            .alerts
            .push_back(Alert::new(AlertKind::Warning, e.user_message()));
        self.ctx.request_repaint();
    }
}

fn feedback_failure_message(e: &ServiceError) -> String {
    e.server_message().unwrap_or(MSG_FEEDBACK_FAILED).to_string()
}
