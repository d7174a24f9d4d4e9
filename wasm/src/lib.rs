//! WebAssembly module for the Harvest Insights Platform
//!
//! Lets the field entry form preview what the server will compute:
//! - Derived harvest metrics
//! - Alerts and recommendations
//! - Offline validation of a draft submission
//!
//! Payloads cross the boundary as JSON strings in the same shape the HTTP API
//! accepts.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

use shared::{calculate_metrics, DerivedMetrics, HarvestEvent, InsightEngine, InsightResult};

/// Metrics and insights for one draft harvest
#[derive(Debug, Serialize)]
struct HarvestPreview {
    #[serde(flatten)]
    metrics: DerivedMetrics,
    #[serde(flatten)]
    insights: InsightResult,
}

fn parse_event(event_json: &str) -> Result<HarvestEvent, String> {
    serde_json::from_str::<HarvestEvent>(event_json)
        .map(HarvestEvent::normalized)
        .map_err(|e| format!("Invalid harvest JSON: {}", e))
}

fn metrics_json(event_json: &str) -> Result<String, String> {
    let event = parse_event(event_json)?;
    serde_json::to_string(&calculate_metrics(&event)).map_err(|e| e.to_string())
}

fn preview_json(event_json: &str) -> Result<String, String> {
    let event = parse_event(event_json)?;
    let metrics = calculate_metrics(&event);
    let insights = InsightEngine::default().evaluate(&event, &metrics);
    serde_json::to_string(&HarvestPreview { metrics, insights }).map_err(|e| e.to_string())
}

fn validation_json(event_json: &str, today: &str) -> Result<String, String> {
    let event = parse_event(event_json)?;
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", today, e))?;

    let fields = match validate_harvest_event(&event, today) {
        Ok(()) => Default::default(),
        Err(errors) => describe_validation_errors(&errors),
    };
    serde_json::to_string(&fields).map_err(|e| e.to_string())
}

/// Compute lost tonnage, net production and productivity for a harvest
#[wasm_bindgen]
pub fn calculate_harvest_metrics(event_json: &str) -> Result<String, JsValue> {
    metrics_json(event_json).map_err(|e| JsValue::from_str(&e))
}

/// Compute metrics plus the alert and recommendation text for a harvest
#[wasm_bindgen]
pub fn evaluate_harvest_insights(event_json: &str) -> Result<String, JsValue> {
    preview_json(event_json).map_err(|e| JsValue::from_str(&e))
}

/// Validate a draft harvest; returns a JSON object of field messages, empty when valid
#[wasm_bindgen]
pub fn validate_harvest(event_json: &str, today: &str) -> Result<String, JsValue> {
    validation_json(event_json, today).map_err(|e| JsValue::from_str(&e))
}
