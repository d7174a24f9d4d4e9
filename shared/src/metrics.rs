//! Harvest efficiency metrics

use serde::{Deserialize, Serialize};

use crate::models::HarvestEvent;

/// KPIs derived from a single harvest event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Tons lost during harvest
    pub lost_tonnage: f64,
    /// Tons harvested after losses
    pub net_production: f64,
    /// Net tons per hour of work
    pub productivity_per_hour: f64,
    /// Net tons per hectare
    pub productivity_per_hectare: f64,
}

/// Derive the harvest KPIs.
///
/// Expects a validated event: `area` and `duration_hours` are strictly
/// positive, so the divisions are always defined. Values are not rounded.
pub fn calculate_metrics(event: &HarvestEvent) -> DerivedMetrics {
    let lost_tonnage = event.production * (event.loss_percentage / 100.0);
    let net_production = event.production - lost_tonnage;

    DerivedMetrics {
        lost_tonnage,
        net_production,
        productivity_per_hour: net_production / event.duration_hours,
        productivity_per_hectare: net_production / event.area,
    }
}
