// Gemini API client for the translation and writing-assistant tasks
// Uses the public generativelanguage endpoint with a caller-supplied API key

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::proxy::{ProviderError, TextGenerator};

const GEMINI_API_VERSION: &str = "v1beta";

// Finish reasons that withhold candidate text. Any other reason keeps whatever
// parts the candidate carries.
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, GEMINI_API_VERSION, model
        )
    }

    /// Raw `generateContent` call. The key travels in `x-goog-api-key`, never in the URL.
    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.generate_url(model);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        let raw_text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Upstream(upstream_error_message(
                &url, status, &raw_text,
            )));
        }

        serde_json::from_str(&raw_text).map_err(|e| {
            ProviderError::Other(format!("Failed to decode Gemini response: {}", e))
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<Option<String>, ProviderError> {
        let response = self.generate_content(api_key, model, prompt).await?;
        extract_text(&response)
    }
}

/// Text of the first candidate, concatenated across parts.
pub fn extract_text(response: &GenerateContentResponse) -> Result<Option<String>, ProviderError> {
    let Some(candidate) = response.candidates.first() else {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(ProviderError::Blocked(format!(
                "Text not available. Response was blocked due to {}",
                reason
            )));
        }
        return Ok(None);
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKED_FINISH_REASONS.contains(&reason) {
            return Err(ProviderError::Blocked(format!(
                "Candidate was blocked due to {}",
                reason
            )));
        }
    }

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

fn upstream_error_message(url: &str, status: StatusCode, raw_body: &str) -> String {
    let detail = serde_json::from_str::<GeminiErrorEnvelope>(raw_body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| raw_body.trim().to_string());
    format!("Error fetching from {}: [{}] {}", url, status, detail)
}
