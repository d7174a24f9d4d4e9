//! Business logic services for the Harvest Insights Platform

pub mod harvest;

pub use harvest::{HarvestPipeline, SubmissionReceipt, SubmissionStage};
