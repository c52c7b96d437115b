//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_SERVICE_URL, SERVICE_URL_ENV};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Service
    pub service_url: String,
    pub request_timeout_secs: Option<u64>,

    // Results layout
    pub show_sentiment_words: bool,
    pub show_gauge: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout_secs: None,
            show_sentiment_words: true,
            show_gauge: true,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Service origin: env override, then the saved value, then the default
    pub fn effective_service_url(&self) -> String {
        Self::resolve_service_url(std::env::var(SERVICE_URL_ENV).ok(), &self.service_url)
    }

    fn resolve_service_url(env_value: Option<String>, saved: &str) -> String {
        env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| Some(saved.to_string()).filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|&s| s > 0)
            .map(Duration::from_secs)
    }
}
