//! Page analysis collaborator
//!
//! A remote multimodal model summarizes a rendered page image. Nothing here
//! is allowed to fail the editor: `analyze_page` and `suggest_edit` turn
//! every transport or parse problem into a fixed fallback value.

use crate::config::AnalysisConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

const FALLBACK_SUMMARY: &str = "Failed to analyze the document using AI.";

/// Longest summary handed to the page shell, in characters.
pub const MAX_SUMMARY_CHARS: usize = 600;

const ANALYZE_PROMPT: &str = "Analyze this document page image. Provide a concise summary of the \
main content (max 3 sentences) and a list of up to 5 key points or important features found on \
the page (e.g. dates, names, figures, contractual obligations).";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    #[error("API request failed: {0}")]
    ApiRequest(String),

    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    #[error("API response parse failed: {0}")]
    ApiParse(String),

    #[error("API returned no text")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "keyPoints", default)]
    pub key_points: Vec<String>,
}

impl PageAnalysis {
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            key_points: Vec::new(),
        }
    }
}

/// A rendered page, base64-encoded PNG without any data-URI header.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    base64: String,
}

impl PageImage {
    pub fn from_data_uri(uri: &str) -> Self {
        let payload = uri.split_once(',').map(|(_, data)| data).unwrap_or(uri);
        Self {
            base64: payload.trim().to_string(),
        }
    }

    pub fn from_png(png: &[u8]) -> Self {
        Self {
            base64: STANDARD.encode(png),
        }
    }

    pub fn base64(&self) -> &str {
        &self.base64
    }
}

/// Remote model used for page summaries and text rewrites.
#[async_trait(?Send)]
pub trait AnalysisBackend {
    async fn analyze(&self, image: &PageImage) -> Result<PageAnalysis, AnalysisError>;

    async fn rewrite(&self, text: &str) -> Result<String, AnalysisError>;
}

/// Summarize a page. Never fails; problems are logged and replaced by
/// [`PageAnalysis::fallback`].
pub async fn analyze_page<B>(backend: &B, image: &PageImage, max_points: usize) -> PageAnalysis
where
    B: AnalysisBackend + ?Sized,
{
    match backend.analyze(image).await {
        Ok(mut analysis) => {
            analysis.summary = clip_summary(&analysis.summary);
            analysis.key_points.truncate(max_points);
            analysis
        }
        Err(e) => {
            tracing::warn!(error = %e, "page analysis failed");
            PageAnalysis::fallback()
        }
    }
}

/// Cut an overlong summary back to a word boundary within
/// [`MAX_SUMMARY_CHARS`], marking the cut with an ellipsis.
fn clip_summary(summary: &str) -> String {
    let summary = summary.trim();
    let Some((cut, _)) = summary.char_indices().nth(MAX_SUMMARY_CHARS) else {
        return summary.to_string();
    };
    let head = &summary[..cut];
    let head = head
        .rfind(char::is_whitespace)
        .map_or(head, |space| &head[..space])
        .trim_end();
    format!("{}\u{2026}", head)
}

/// Ask for a more professional rewrite of `text`, or give `text` back.
pub async fn suggest_edit<B>(backend: &B, text: &str) -> String
where
    B: AnalysisBackend + ?Sized,
{
    match backend.rewrite(text).await {
        Ok(rewritten) if !rewritten.trim().is_empty() => rewritten,
        Ok(_) => text.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "edit suggestion failed");
            text.to_string()
        }
    }
}

// =============================================================================
// GEMINI
// =============================================================================

pub struct GeminiBackend {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiBackend {
    pub fn new(api_key: String, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs));
        let http = builder
            .build()
            .map_err(|e| AnalysisError::HttpClientBuild(e.to_string()))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        Ok(Self {
            http,
            api_key,
            endpoint,
        })
    }

    /// Build a backend with the key from `config.api_key_env`.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let api_key = config
            .api_key_from_env()
            .ok_or_else(|| AnalysisError::MissingApiKey {
                var: config.api_key_env.clone(),
            })?;
        Self::new(api_key, config)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn generate(&self, body: &GenerateRequest<'_>) -> Result<String, AnalysisError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AnalysisError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(AnalysisError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

#[async_trait(?Send)]
impl AnalysisBackend for GeminiBackend {
    async fn analyze(&self, image: &PageImage) -> Result<PageAnalysis, AnalysisError> {
        let text = self.generate(&analyze_request(image)).await?;
        serde_json::from_str(&text).map_err(|e| AnalysisError::ApiParse(e.to_string()))
    }

    async fn rewrite(&self, text: &str) -> Result<String, AnalysisError> {
        let prompt = rewrite_prompt(text);
        self.generate(&GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![Part::Text { text: &prompt }],
            }],
            generation_config: None,
        })
        .await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn analyze_request(image: &PageImage) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: "image/png",
                        data: image.base64(),
                    },
                },
                Part::Text {
                    text: ANALYZE_PROMPT,
                },
            ],
        }],
        generation_config: Some(serde_json::json!({
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "summary": { "type": "STRING" },
                    "keyPoints": { "type": "ARRAY", "items": { "type": "STRING" } }
                }
            }
        })),
    }
}

fn rewrite_prompt(text: &str) -> String {
    format!(
        "Rewrite the following text to be more professional and concise: \"{}\"",
        text
    )
}

// =============================================================================
// PARSING
// =============================================================================

/// Concatenated text parts of the first candidate.
fn parse_response(json: &str) -> Result<String, AnalysisError> {
    let api: GenerateResponse =
        serde_json::from_str(json).map_err(|e| AnalysisError::ApiParse(e.to_string()))?;

    let text: String = api
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(text)
}
