//! Immutable per-request context
//!
//! A `RequestContext` is a snapshot built once per request from the
//! incoming message, the adapter's resolved settings, and caller
//! metadata. Every field the pipeline needs is resolved at build time,
//! so a concurrent adapter reload cannot tear a request's view. Once
//! built it is never mutated.

use serde::{Deserialize, Serialize};

/// One prior message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role (`user`, `assistant`, `system`)
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role and content
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Immutable snapshot passed down the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The incoming user message
    pub message: String,
    /// Adapter addressed by the request
    pub adapter_name: String,
    /// Prior conversation messages, ordered
    pub context_messages: Vec<ChatMessage>,
    /// Opaque system prompt identifier, stringified
    pub system_prompt_id: Option<String>,
    /// Inference provider resolved from the adapter (process default
    /// when the adapter does not override)
    pub inference_provider: Option<String>,
    /// Timezone resolved from the adapter config
    pub timezone: Option<String>,
    /// Caller user id
    pub user_id: Option<String>,
    /// Caller session id
    pub session_id: Option<String>,
    /// Caller API key
    pub api_key: Option<String>,
    /// Attached file ids; possibly empty, never null
    pub file_ids: Vec<String>,
    /// Base64 audio input, when the request carries audio
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
