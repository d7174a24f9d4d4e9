use serde::{Deserialize, Serialize};

use super::config::InsightThresholds;
use crate::metrics::DerivedMetrics;
use crate::models::{HarvestEvent, HarvestMethod};

/// Identifies one entry of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightRuleKind {
    HarvestLoss,
    MechanicalMoisture,
    LowBrix,
    LowProductivity,
    SpoilageRisk,
    OperatorLoss,
}

impl InsightRuleKind {
    pub fn label(&self) -> &'static str {
        match self {
            InsightRuleKind::HarvestLoss => "harvest_loss",
            InsightRuleKind::MechanicalMoisture => "mechanical_moisture",
            InsightRuleKind::LowBrix => "low_brix",
            InsightRuleKind::LowProductivity => "low_productivity",
            InsightRuleKind::SpoilageRisk => "spoilage_risk",
            InsightRuleKind::OperatorLoss => "operator_loss",
        }
    }
}

/// Everything a rule may look at.
pub(crate) struct RuleInput<'a> {
    pub event: &'a HarvestEvent,
    pub metrics: &'a DerivedMetrics,
    pub thresholds: &'a InsightThresholds,
}

/// One predicate with the sentences it contributes when it holds.
pub(crate) struct InsightRule {
    pub kind: InsightRuleKind,
    pub fires: fn(&RuleInput<'_>) -> bool,
    pub alert: fn(&RuleInput<'_>) -> String,
    pub recommendation: fn(&RuleInput<'_>) -> String,
}

/// Rule table in output order. Every rule is evaluated for every event.
pub(crate) const RULES: [InsightRule; 6] = [
    InsightRule {
        kind: InsightRuleKind::HarvestLoss,
        fires: harvest_loss_fires,
        alert: harvest_loss_alert,
        recommendation: harvest_loss_recommendation,
    },
    InsightRule {
        kind: InsightRuleKind::MechanicalMoisture,
        fires: mechanical_moisture_fires,
        alert: mechanical_moisture_alert,
        recommendation: mechanical_moisture_recommendation,
    },
    InsightRule {
        kind: InsightRuleKind::LowBrix,
        fires: low_brix_fires,
        alert: low_brix_alert,
        recommendation: low_brix_recommendation,
    },
    InsightRule {
        kind: InsightRuleKind::LowProductivity,
        fires: low_productivity_fires,
        alert: low_productivity_alert,
        recommendation: low_productivity_recommendation,
    },
    InsightRule {
        kind: InsightRuleKind::SpoilageRisk,
        fires: spoilage_risk_fires,
        alert: spoilage_risk_alert,
        recommendation: spoilage_risk_recommendation,
    },
    InsightRule {
        kind: InsightRuleKind::OperatorLoss,
        fires: operator_loss_fires,
        alert: operator_loss_alert,
        recommendation: operator_loss_recommendation,
    },
];

fn harvest_loss_fires(input: &RuleInput<'_>) -> bool {
    input.event.loss_percentage > input.thresholds.loss_percentage
}

fn harvest_loss_alert(input: &RuleInput<'_>) -> String {
    format!(
        "Losses exceed the expected threshold ({}%).",
        input.thresholds.loss_percentage
    )
}

fn harvest_loss_recommendation(_: &RuleInput<'_>) -> String {
    "Check cutter bar pressure.".to_string()
}

fn mechanical_moisture_fires(input: &RuleInput<'_>) -> bool {
    input.event.harvest_method == HarvestMethod::Mechanical
        && input.event.moisture_percentage > input.thresholds.mechanical_moisture_percentage
}

fn mechanical_moisture_alert(_: &RuleInput<'_>) -> String {
    "High moisture level for mechanical harvesting.".to_string()
}

fn mechanical_moisture_recommendation(_: &RuleInput<'_>) -> String {
    "Consider delaying harvest or using manual harvesting.".to_string()
}

fn low_brix_fires(input: &RuleInput<'_>) -> bool {
    input.event.brix_percentage < input.thresholds.brix_percentage
}

fn low_brix_alert(input: &RuleInput<'_>) -> String {
    format!(
        "Low °Brix ({}): sugar yield may be sub-optimal.",
        input.event.brix_percentage
    )
}

fn low_brix_recommendation(input: &RuleInput<'_>) -> String {
    format!(
        "Consider delaying harvest until Brix ≥ {}.",
        input.thresholds.brix_percentage
    )
}

fn low_productivity_fires(input: &RuleInput<'_>) -> bool {
    input.metrics.productivity_per_hour < input.thresholds.productivity_per_hour
}

fn low_productivity_alert(input: &RuleInput<'_>) -> String {
    format!(
        "Low hourly productivity ({:.2} t/h).",
        input.metrics.productivity_per_hour
    )
}

fn low_productivity_recommendation(_: &RuleInput<'_>) -> String {
    "Review operational efficiency and schedule preventive maintenance on equipment.".to_string()
}

fn spoilage_risk_fires(input: &RuleInput<'_>) -> bool {
    input.event.ambient_temperature > input.thresholds.spoilage_temperature
        && input.event.moisture_percentage > input.thresholds.spoilage_moisture_percentage
}

fn spoilage_risk_alert(_: &RuleInput<'_>) -> String {
    "High temp & moisture: risk of microbial spoilage.".to_string()
}

fn spoilage_risk_recommendation(_: &RuleInput<'_>) -> String {
    "Process cane quickly or lower moisture prior to storage.".to_string()
}

fn operator_loss_fires(input: &RuleInput<'_>) -> bool {
    input.event.loss_percentage > input.thresholds.operator_loss_percentage
}

fn operator_loss_alert(input: &RuleInput<'_>) -> String {
    format!(
        "Operator {} on equipment {} exceeded loss threshold ({}%).",
        input.event.operator_id, input.event.equipment_id, input.event.loss_percentage
    )
}

fn operator_loss_recommendation(_: &RuleInput<'_>) -> String {
    "Recommend equipment maintenance or operator retraining.".to_string()
}
