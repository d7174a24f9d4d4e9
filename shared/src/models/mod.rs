//! Domain models for the Harvest Insights Platform

mod harvest;
mod record;

pub use harvest::*;
pub use record::*;
