//! Wire types shared between the ToS Sentinel frontend and its analysis
//! backend.
//!
//! The backend streams newline-delimited JSON events over a long-lived
//! `/analyze` response. Each line decodes to one [`StreamEvent`]; the stream
//! ends with a terminal `result` or `error` event. The types here mirror the
//! backend's snake_case JSON field names exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model used when the backend's model listing is unavailable.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Severity assigned to a single risk finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    /// CSS class used by the HTML report renderer.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Low => "badge-low",
            Self::Medium => "badge-medium",
            Self::High => "badge-high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(name)
    }
}

fn default_source_name() -> String {
    "Main ToS".to_string()
}

/// One claimed finding from the analysis model.
///
/// `quote` is what the model says it extracted verbatim from the source
/// document. It frequently diverges from the scraped text in whitespace,
/// punctuation, and line wrapping; anchoring it back is the job of
/// `sentinel-anchor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskItem {
    #[serde(default)]
    pub point: String,
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_source_name")]
    pub source_name: String,
}

impl RiskItem {
    /// Whether this finding came from the main document rather than a
    /// linked policy page.
    pub fn from_main_document(&self) -> bool {
        self.source_name.contains("Main")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub total_token: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub knowledge_base: Vec<String>,
    #[serde(default)]
    pub retrieved_sources: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub risks: Vec<RiskItem>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub overview: String,
    /// Subjective 0-100 assessment from the model.
    #[serde(default)]
    pub risk_score: f64,
}

/// Payload of the terminal `result` event.
///
/// Every field is defaulted so a backend that omits sections (no debug
/// info, no token accounting) still produces a renderable report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultPayload {
    #[serde(default)]
    pub result: AnalysisResult,
    #[serde(default)]
    pub token_usage: TokenUsage,
    /// Full scraped text of the analyzed document set.
    #[serde(default)]
    pub scraped_content: String,
    #[serde(default)]
    pub debug_info: DebugInfo,
}

/// One line of the streamed analysis response.
///
/// Closed union: a line whose `type` tag is not one of these three is a
/// protocol violation, not something to skip silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Log { msg: String },
    Error { msg: String },
    Result { data: ResultPayload },
}

/// Request body for `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    pub intent: Option<String>,
    pub model_name: String,
    pub enable_rag: bool,
}

/// Response body of `GET /models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}
