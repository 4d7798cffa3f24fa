//! Concrete datasource and provider implementations.
//!
//! Every implementation registers itself in the application-layer
//! registries via linkme distributed slices; linking this crate is what
//! populates them. HTTP-speaking integrations go through `reqwest` with
//! explicit timeouts; construction never dials the network, only
//! `initialize` does.

pub mod constants;
pub mod datasources;
pub mod embedding;
pub mod inference;
pub mod reranker;
pub mod utils;
pub mod vision;
