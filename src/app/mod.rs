//! App module - contains the main application state and logic

mod session;
mod views;

pub use session::{AlertKind, ReviewSession, SessionState};

use crate::constants::DEFAULT_SERVICE_URL;
use crate::service::{HttpSentimentService, SentimentService};
use crate::settings::Settings;
use crate::theme;
use crate::ui::components::TableColumns;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub type AppError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) session: ReviewSession,
    pub(crate) review_text: String,
    pub(crate) settings: Settings,
    /// Origin the current service client talks to
    pub(crate) service_url: String,
    // Settings window
    pub(crate) show_settings: bool,
    pub(crate) service_url_input: String,
    pub(crate) settings_error: Option<String>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
    // Request tasks run here; dropped last
    _runtime: tokio::runtime::Runtime,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Result<Self, AppError> {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Phosphor icons alongside the default fonts
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new()?;
        let timeout = settings.request_timeout();
        let requested = settings.effective_service_url();
        let (service, settings_error) = match HttpSentimentService::new(&requested, timeout) {
            Ok(service) => (service, None),
            Err(e) => {
                warn!(error = %e, url = %requested, "Unusable service URL, using default");
                (HttpSentimentService::new(DEFAULT_SERVICE_URL, timeout)?, Some(e.to_string()))
            }
        };
        let service_url = service.base_url().to_string();
        info!(url = %service_url, timeout = ?timeout, "Sentiment service configured");

        let mut app = Self::with_service(
            &cc.egui_ctx,
            settings,
            data_dir,
            runtime,
            Arc::new(service),
            service_url,
        );
        app.settings_error = settings_error;
        Ok(app)
    }

    /// Assemble the app around an already-built service client
    pub(crate) fn with_service(
        ctx: &egui::Context,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
        service: Arc<dyn SentimentService>,
        service_url: String,
    ) -> Self {
        let session = ReviewSession::new(service, runtime.handle().clone(), ctx.clone());

        Self {
            session,
            review_text: String::new(),
            service_url_input: service_url.clone(),
            service_url,
            settings,
            show_settings: false,
            settings_error: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
            _runtime: runtime,
        }
    }

    pub fn table_columns(&self) -> TableColumns {
        TableColumns {
            sentiment_words: self.settings.show_sentiment_words,
        }
    }

    /// Point the session at a new service origin. On failure the old client
    /// stays in place and the error is shown in the settings window.
    pub fn apply_service_url(&mut self) {
        let url = self.service_url_input.trim().to_string();
        if url.is_empty() {
            self.settings_error = Some("Service URL cannot be empty".into());
            return;
        }

        match HttpSentimentService::new(&url, self.settings.request_timeout()) {
            Ok(service) => {
                info!(url = %service.base_url(), "Service URL changed");
                self.service_url = service.base_url().to_string();
                self.settings.service_url = self.service_url.clone();
                self.session.set_service(Arc::new(service));
                self.settings_error = None;
            }
            Err(e) => {
                warn!(error = %e, url = %url, "Failed to build service client");
                self.settings_error = Some(e.to_string());
            }
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::types::{AnalysisResult, FeedbackRating, ReviewInput};
    use futures::future::BoxFuture;

    /// Service for frame-level tests; any request is a test failure
    pub(crate) struct Unreachable;

    impl SentimentService for Unreachable {
        fn analyze(&self, _: ReviewInput) -> BoxFuture<'_, Result<AnalysisResult, ServiceError>> {
            panic!("analyze should not be called")
        }

        fn submit_feedback(&self, _: FeedbackRating) -> BoxFuture<'_, Result<(), ServiceError>> {
            panic!("submit_feedback should not be called")
        }
    }

    pub(crate) fn test_app(ctx: &egui::Context, data_dir: PathBuf) -> App {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        App::with_service(
            ctx,
            Settings::default(),
            data_dir,
            runtime,
            Arc::new(Unreachable),
            DEFAULT_SERVICE_URL.to_string(),
        )
    }

    #[test]
    fn bad_service_url_keeps_current_client() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&egui::Context::default(), dir.path().to_path_buf());

        for bad in ["not a url", "ftp://sentiment.example.com"] {
            app.service_url_input = bad.to_string();
            app.apply_service_url();

            let err = app.settings_error.clone().unwrap_or_default();
            assert!(err.starts_with("invalid service URL"), "{bad:?}: {err:?}");
            assert_eq!(app.service_url, DEFAULT_SERVICE_URL);
            assert_eq!(app.settings.service_url, Settings::default().service_url);
        }
    }

    #[test]
    fn good_service_url_is_applied_and_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&egui::Context::default(), dir.path().to_path_buf());
        app.settings_error = Some("stale".into());

        app.service_url_input = " https://sentiment.example.com/ ".to_string();
        app.apply_service_url();

        assert_eq!(app.settings_error, None);
        assert_eq!(app.service_url, "https://sentiment.example.com");
        assert_eq!(app.settings.service_url, "https://sentiment.example.com");
    }
}
