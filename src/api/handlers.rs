// API request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::{classify_provider_error, GatewayError, TaskFailure};
use super::validation::{validate_request, RequiredFields};
use super::AppState;
use crate::prompts::{
    build_enhance_prompt, build_translation_prompt, EnhancePromptParams, TaskType,
    TranslationPromptParams, DEFAULT_ENHANCE_DIRECTIVE,
};

const DEFAULT_SOURCE_LANGUAGE: &str = "English";
const DEFAULT_TARGET_LANGUAGE: &str = "Korean";
const DEFAULT_ENHANCE_LANGUAGE: &str = "English";

/// Body of `POST /api/sendmessage`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "addinst")]
    pub additional_instruction: Option<String>,
    #[serde(default, rename = "start")]
    pub source_language: Option<String>,
    #[serde(default, rename = "destination")]
    pub target_language: Option<String>,
    #[serde(default, rename = "msg")]
    pub text: Option<String>,
}

/// Body of `POST /api/enhance`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub directive: Option<String>,
    #[serde(default, rename = "msg")]
    pub text: Option<String>,
}

impl TranslationRequest {
    fn required_fields(&self) -> RequiredFields<'_> {
        RequiredFields {
            api_key: self.api_key.as_deref(),
            provider: self.provider.as_deref(),
            text: self.text.as_deref(),
        }
    }
}

impl EnhanceRequest {
    fn required_fields(&self) -> RequiredFields<'_> {
        RequiredFields {
            api_key: self.api_key.as_deref(),
            provider: self.provider.as_deref(),
            text: self.text.as_deref(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

fn request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body too large.";

/// A body without a JSON content type reads as an empty request, so the
/// validator still reports the first missing field.
fn parse_body<T: Default>(task: TaskType, body: Result<Json<T>, JsonRejection>) -> Result<T, TaskFailure> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => {
            tracing::debug!(task = %task, "Request without JSON content type, treating body as empty");
            Ok(T::default())
        }
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(task = %task, "Rejected request body: {}", rejection.body_text());
            Err(GatewayError::PayloadTooLarge(PAYLOAD_TOO_LARGE_MESSAGE.to_string()).for_task(task))
        }
        Err(rejection) => {
            tracing::warn!(task = %task, "Rejected request body: {}", rejection.body_text());
            Err(GatewayError::ValidationFailed(format!("Invalid JSON body: {}", rejection.body_text()))
                .for_task(task))
        }
    }
}

fn check_fields(state: &AppState, task: TaskType, fields: &RequiredFields<'_>) -> Result<(), TaskFailure> {
    validate_request(&state.config.ai, fields).map_err(|err| {
        tracing::warn!(
            task = %task,
            provider = fields.provider.unwrap_or_default(),
            "Request validation failed: {}",
            err
        );
        err.for_task(task)
    })?;

    tracing::debug!(
        task = %task,
        provider = fields.provider.unwrap_or_default(),
        message_length = fields.text.map(str::len).unwrap_or_default(),
        "Request validation passed"
    );
    Ok(())
}

/// Sends a built prompt to the named provider and classifies any failure.
async fn run_prompt(
    state: &AppState,
    task: TaskType,
    request_id: &str,
    provider: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, TaskFailure> {
    let generator = state.providers.get(provider).ok_or_else(|| {
        tracing::error!(request_id, provider, "No adapter registered for provider");
        GatewayError::UpstreamFailure(format!("No adapter registered for provider '{}'", provider))
            .for_task(task)
    })?;

    tracing::debug!(request_id, prompt_length = prompt.len(), "Generated prompt for {}", task);

    state
        .adapter
        .complete(generator.as_ref(), api_key, model, prompt)
        .await
        .map_err(|err| {
            tracing::error!(request_id, task = %task, "Provider call failed: {}", err);
            classify_provider_error(&err).for_task(task)
        })
}

pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, TaskFailure> {
    let task = TaskType::Translation;
    let request = parse_body(task, body)?;
    check_fields(&state, task, &request.required_fields())?;

    let api_key = request.api_key.as_deref().unwrap_or_default();
    let provider = request.provider.as_deref().unwrap_or_default();
    let text = request.text.as_deref().unwrap_or_default();
    let model = request
        .model
        .as_deref()
        .unwrap_or(state.config.ai.default_model.as_str());
    let params = TranslationPromptParams {
        additional_instruction: request.additional_instruction.as_deref().unwrap_or_default(),
        source_language: request.source_language.as_deref().unwrap_or(DEFAULT_SOURCE_LANGUAGE),
        target_language: request.target_language.as_deref().unwrap_or(DEFAULT_TARGET_LANGUAGE),
        text,
    };

    let request_id = request_id();
    tracing::info!(
        request_id = %request_id,
        model,
        source_language = params.source_language,
        target_language = params.target_language,
        message_length = text.len(),
        has_additional_instruction = !params.additional_instruction.is_empty(),
        "Processing translation request"
    );

    let template = state.templates.get(task).map_err(|err| {
        GatewayError::UpstreamFailure(err.to_string()).for_task(task)
    })?;
    let prompt = build_translation_prompt(template, &params);

    let output = run_prompt(&state, task, &request_id, provider, api_key, model, &prompt).await?;

    tracing::info!(
        request_id = %request_id,
        output_length = output.len(),
        "Translation completed successfully"
    );
    Ok(Json(MessageResponse { message: output }))
}

pub async fn enhance(
    State(state): State<AppState>,
    body: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, TaskFailure> {
    let task = TaskType::Enhancement;
    let request = parse_body(task, body)?;
    check_fields(&state, task, &request.required_fields())?;

    let api_key = request.api_key.as_deref().unwrap_or_default();
    let provider = request.provider.as_deref().unwrap_or_default();
    let text = request.text.as_deref().unwrap_or_default();
    let model = request
        .model
        .as_deref()
        .unwrap_or(state.config.ai.default_model.as_str());
    let params = EnhancePromptParams {
        text,
        language: request.language.as_deref().unwrap_or(DEFAULT_ENHANCE_LANGUAGE),
        directive: request.directive.as_deref().unwrap_or(DEFAULT_ENHANCE_DIRECTIVE),
        prior_output: "",
    };

    let request_id = request_id();
    tracing::info!(
        request_id = %request_id,
        model,
        language = params.language,
        message_length = text.len(),
        has_directive = !params.directive.is_empty(),
        "Processing enhancement request"
    );

    let template = state.templates.get(task).map_err(|err| {
        GatewayError::UpstreamFailure(err.to_string()).for_task(task)
    })?;
    let prompt = build_enhance_prompt(template, &params);

    let output = run_prompt(&state, task, &request_id, provider, api_key, model, &prompt).await?;

    tracing::info!(
        request_id = %request_id,
        output_length = output.len(),
        "Enhancement completed successfully"
    );
    Ok(Json(MessageResponse { message: output }))
}

// Health probe, independent of provider state
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
        .into_response()
}
