//! Shared constants for provider and datasource implementations

/// JSON content type header value
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Default request timeout for HTTP backends, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Error message prefix for request timeouts
pub const ERROR_MSG_REQUEST_TIMEOUT: &str = "Request timed out after";

/// Default Ollama server URL
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default OpenAI API base URL
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Default Cohere API base URL
pub const DEFAULT_COHERE_URL: &str = "https://api.cohere.com";

/// Default Elasticsearch node URL
pub const DEFAULT_ELASTICSEARCH_NODE: &str = "http://localhost:9200";

/// Default Qdrant server URL
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6333";

/// Default Chroma host
pub const DEFAULT_CHROMA_HOST: &str = "localhost";

/// Default Chroma port
pub const DEFAULT_CHROMA_PORT: u16 = 8000;

/// Default embedding dimensions for the null embedding provider
pub const NULL_EMBEDDING_DIMENSIONS: usize = 384;
