//! Chat entry point
//!
//! Builds an immutable request context from the incoming message and
//! the adapter's resolved settings, then dispatches it through the
//! adapter's provider handles. The context is built once; a concurrent
//! reload cannot tear the request's view.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use orbit_domain::error::{Error, Result};
use orbit_domain::value_objects::{AdapterState, ChatMessage, RequestContext};
use orbit_infrastructure::AdapterManager;

use orbit_application::use_cases::ContextParams;

use crate::error::error_response;
use crate::state::AppState;

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user message
    pub message: String,
    /// Adapter to address
    pub adapter: String,
    /// Prior conversation messages
    #[serde(default)]
    pub context_messages: Vec<ChatMessage>,
    /// Opaque system prompt identifier
    #[serde(default)]
    pub system_prompt_id: Option<String>,
    /// Caller user id
    #[serde(default)]
    pub user_id: Option<String>,
    /// Caller session id
    #[serde(default)]
    pub session_id: Option<String>,
    /// Attached file ids
    #[serde(default)]
    pub file_ids: Option<Vec<String>>,
    /// Base64 audio input
    #[serde(default)]
    pub audio_input: Option<String>,
    /// Audio container format hint
    #[serde(default)]
    pub audio_format: Option<String>,
    /// Spoken language hint
    #[serde(default)]
    pub language: Option<String>,
    /// Whether the caller wants an audio response
    #[serde(default)]
    pub return_audio: bool,
    /// Voice to synthesize the response with
    #[serde(default)]
    pub tts_voice: Option<String>,
    /// Translation source language
    #[serde(default)]
    pub source_language: Option<String>,
    /// Translation target language
    #[serde(default)]
    pub target_language: Option<String>,
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Generated response text
    pub response: String,
    /// Adapter that served the request
    pub adapter: String,
    /// Server-assigned request id
    pub request_id: String,
}

/// `POST /v1/chat`
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    let api_key = None; // populated by the auth layer when enabled

    let params = ContextParams {
        message: request.message,
        adapter_name: request.adapter,
        context_messages: request.context_messages,
        system_prompt_id: request.system_prompt_id,
        user_id: request.user_id,
        session_id: request.session_id,
        api_key,
        file_ids: request.file_ids,
        audio_input: request.audio_input,
        audio_format: request.audio_format,
        language: request.language,
        return_audio: request.return_audio,
        tts_voice: request.tts_voice,
        source_language: request.source_language,
        target_language: request.target_language,
    };

    let context = match state.context_builder.build(params) {
        Ok(context) => context,
        Err(e) => return error_response(&e),
    };

    match dispatch(&state.manager, &context).await {
        Ok(response) => Json(ChatResponse {
            response,
            adapter: context.adapter_name,
            request_id: Uuid::new_v4().to_string(),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Invoke the adapter's pipeline with the resolved provider handles.
///
/// The live adapter is read once; its handles stay valid for the whole
/// request even if a reload swaps the catalog entry mid-flight.
pub async fn dispatch(manager: &AdapterManager, context: &RequestContext) -> Result<String> {
    let adapter = manager.get(&context.adapter_name)?;
    if adapter.state() != AdapterState::Active {
        return Err(Error::adapter_disabled(&context.adapter_name));
    }
    let resources = adapter
        .resources()
        .ok_or_else(|| Error::internal(format!("adapter '{}' has no resources", context.adapter_name)))?;

    resources
        .inference
        .generate(&context.message, &context.context_messages)
        .await
}
