//! Editor configuration
//!
//! TOML-based configuration for tool defaults, zoom bounds, and the page
//! analysis service. Every section is optional; missing values fall back to
//! the editor's built-in defaults.

use crate::annotation::ToolSettings;
use crate::error::EditorError;
use crate::geometry::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE, SCALE_STEP};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Default style seeded into newly created annotations
    #[serde(default)]
    pub tools: ToolSettings,
    /// Zoom bounds and initial scale
    #[serde(default)]
    pub zoom: ZoomConfig,
    /// Remote page analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl EditorConfig {
    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the zoom bounds are
    /// inconsistent.
    ///
    /// # Example
    ///
    /// ```
    /// use zenith_core::config::EditorConfig;
    ///
    /// let config = EditorConfig::from_toml_str(r##"
    ///     [tools]
    ///     color = "#ff0000"
    ///
    ///     [zoom]
    ///     initial = 1.0
    /// "##).unwrap();
    /// assert_eq!(config.tools.color, "#ff0000");
    /// assert_eq!(config.tools.font_size, 16.0);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, EditorError> {
        let config: Self = toml::from_str(s).map_err(|e| EditorError::ConfigError(e.to_string()))?;
        config.zoom.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoomConfig {
    #[serde(default = "default_initial_scale")]
    pub initial: f64,
    #[serde(default = "default_min_scale")]
    pub min: f64,
    #[serde(default = "default_max_scale")]
    pub max: f64,
    #[serde(default = "default_scale_step")]
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            initial: DEFAULT_SCALE,
            min: MIN_SCALE,
            max: MAX_SCALE,
            step: SCALE_STEP,
        }
    }
}

impl ZoomConfig {
    pub fn validate(&self) -> Result<(), EditorError> {
        let finite = [self.initial, self.min, self.max, self.step]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(EditorError::ConfigError("zoom values must be finite".into()));
        }
        if self.min <= 0.0 {
            return Err(EditorError::ConfigError(format!(
                "zoom min must be positive, got {}",
                self.min
            )));
        }
        if self.min > self.max {
            return Err(EditorError::ConfigError(format!(
                "zoom min {} > max {}",
                self.min, self.max
            )));
        }
        if self.step <= 0.0 {
            return Err(EditorError::ConfigError(format!(
                "zoom step must be positive, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

fn default_initial_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_min_scale() -> f64 {
    MIN_SCALE
}

fn default_max_scale() -> f64 {
    MAX_SCALE
}

fn default_scale_step() -> f64 {
    SCALE_STEP
}

pub const DEFAULT_ANALYSIS_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MAX_KEY_POINTS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_max_key_points")]
    pub max_key_points: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_key_points: default_max_key_points(),
        }
    }
}

impl AnalysisConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

fn default_base_url() -> String {
    DEFAULT_ANALYSIS_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_ANALYSIS_MODEL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_key_points() -> usize {
    DEFAULT_MAX_KEY_POINTS
}
