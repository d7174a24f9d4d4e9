//! Shared types and domain logic for the Harvest Insights Platform
//!
//! This crate contains the harvest models, the metric calculator and the
//! insight rules shared between the backend and the browser (via WASM).

pub mod insights;
pub mod metrics;
pub mod models;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use insights::*;
pub use metrics::*;
pub use models::*;
pub use types::*;
pub use validation::*;
