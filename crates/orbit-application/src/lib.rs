//! Application layer for the ORBIT control plane.
//!
//! Holds the registration surfaces that datasource and provider
//! implementations plug into (linkme distributed slices), the catalog
//! query port exposed to pipelines, and the pure request-context use
//! case.

pub mod ports;
pub mod use_cases;
