//! Null reranker provider

use std::sync::Arc;

use async_trait::async_trait;

use orbit_application::ports::registry::{
    ProviderSettings, RerankerProviderEntry, RERANKER_PROVIDERS,
};
use orbit_domain::error::Result;
use orbit_domain::ports::RerankerProvider;

/// Reranker that preserves input order with decaying scores
pub struct NullRerankerProvider;

#[async_trait]
impl RerankerProvider for NullRerankerProvider {
    fn provider_name(&self) -> &str {
        "null"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn rerank(&self, _query: &str, documents: &[String]) -> Result<Vec<(usize, f32)>> {
        Ok(documents
            .iter()
            .enumerate()
            .map(|(i, _)| (i, 1.0 / (i as f32 + 1.0)))
            .collect())
    }

    async fn close(&self) {}
}

fn null_factory(_settings: &ProviderSettings) -> Result<Arc<dyn RerankerProvider>> {
    Ok(Arc::new(NullRerankerProvider))
}

#[linkme::distributed_slice(RERANKER_PROVIDERS)]
static NULL_PROVIDER: RerankerProviderEntry = RerankerProviderEntry {
    name: "null",
    description: "Order-preserving reranker for tests",
    factory: null_factory,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preserves_order_with_decaying_scores() {
        let ranked = NullRerankerProvider
            .rerank("q", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(ranked[0].0, 0);
        assert!(ranked[0].1 > ranked[1].1);
    }
}
