//! Request context builder
//!
//! Turns an incoming message, an adapter name, and caller metadata into
//! an immutable `RequestContext`. The builder is pure: no I/O, no side
//! effects, no mutation of the adapter. The adapter view is read once,
//! so a concurrent reload cannot tear a request's snapshot.

use std::sync::Arc;

use orbit_domain::error::{Error, Result};
use orbit_domain::value_objects::{AdapterState, ChatMessage, RequestContext};

use crate::ports::AdapterQuery;

/// Inputs for building one request context
#[derive(Debug, Clone, Default)]
pub struct ContextParams {
    /// The incoming user message
    pub message: String,
    /// Adapter addressed by the request
    pub adapter_name: String,
    /// Prior conversation messages
    pub context_messages: Vec<ChatMessage>,
    /// Opaque system prompt identifier
    pub system_prompt_id: Option<String>,
    /// Caller user id
    pub user_id: Option<String>,
    /// Caller session id
    pub session_id: Option<String>,
    /// Caller API key
    pub api_key: Option<String>,
    /// Attached file ids
    pub file_ids: Option<Vec<String>>,
    /// Base64 audio input
    pub audio_input: Option<String>,
    /// Audio container format hint
    pub audio_format: Option<String>,
    /// Spoken language hint
    pub language: Option<String>,
    /// Whether the caller wants an audio response
    pub return_audio: bool,
    /// Voice to synthesize the response with
    pub tts_voice: Option<String>,
    /// Translation source language
    pub source_language: Option<String>,
    /// Translation target language
    pub target_language: Option<String>,
}

/// Builds immutable request contexts against the live catalog
pub struct RequestContextBuilder {
    catalog: Arc<dyn AdapterQuery>,
    default_inference_provider: Option<String>,
    default_timezone: Option<String>,
}

impl RequestContextBuilder {
    /// Create a builder over the given catalog view with process-level
    /// defaults from the `general` config section
    pub fn new(
        catalog: Arc<dyn AdapterQuery>,
        default_inference_provider: Option<String>,
        default_timezone: Option<String>,
    ) -> Self {
        Self {
            catalog,
            default_inference_provider,
            default_timezone,
        }
    }

    /// Build a context, resolving the adapter's settings at call time
    pub fn build(&self, params: ContextParams) -> Result<RequestContext> {
        match self.catalog.adapter_state(&params.adapter_name) {
            None => return Err(Error::unknown_adapter(&params.adapter_name)),
            Some(AdapterState::Active) => {}
            Some(AdapterState::Disabled) | Some(AdapterState::Draining) => {
                return Err(Error::adapter_disabled(&params.adapter_name));
            }
        }

        let inference_provider = self
            .catalog
            .inference_provider(&params.adapter_name)
            .or_else(|| self.default_inference_provider.clone());
        let timezone = self
            .catalog
            .timezone(&params.adapter_name)
            .or_else(|| self.default_timezone.clone());

        Ok(RequestContext {
            message: params.message,
            adapter_name: params.adapter_name,
            context_messages: params.context_messages,
            system_prompt_id: params.system_prompt_id,
            inference_provider,
            timezone,
            user_id: params.user_id,
            session_id: params.session_id,
            api_key: params.api_key,
            file_ids: params.file_ids.unwrap_or_default(),
            audio_input: params.audio_input,
            audio_format: params.audio_format,
            language: params.language,
            return_audio: params.return_audio,
            tts_voice: params.tts_voice,
            source_language: params.source_language,
            target_language: params.target_language,
        })
    }
}
