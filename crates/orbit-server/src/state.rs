//! Shared handler state

use std::sync::Arc;

use orbit_application::use_cases::RequestContextBuilder;
use orbit_infrastructure::config::AuthConfig;
use orbit_infrastructure::AdapterManager;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// The live adapter catalog and reload engine
    pub manager: Arc<AdapterManager>,
    /// Pure request-context builder over the catalog
    pub context_builder: Arc<RequestContextBuilder>,
    /// Admin bearer-auth settings
    pub auth: AuthConfig,
}
