//! Rule-based alerts and recommendations for harvest events

mod config;
mod rules;

pub use config::InsightThresholds;
pub use rules::InsightRuleKind;

use rules::{RuleInput, RULES};
use serde::{Deserialize, Serialize};

use crate::metrics::DerivedMetrics;
use crate::models::HarvestEvent;

/// Alert and recommendation text produced for one harvest event.
///
/// Each field holds the sentences of the fired rules, in rule order, joined
/// by a single space. Both are empty when no rule fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightResult {
    pub alert: String,
    pub recommendation: String,
}

impl InsightResult {
    pub fn is_empty(&self) -> bool {
        self.alert.is_empty() && self.recommendation.is_empty()
    }
}

/// Stateless evaluator applying the rule table with a fixed set of thresholds.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    thresholds: InsightThresholds,
}

impl InsightEngine {
    pub fn new(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    pub fn evaluate(&self, event: &HarvestEvent, metrics: &DerivedMetrics) -> InsightResult {
        let input = self.input(event, metrics);
        let mut alerts = Vec::new();
        let mut recommendations = Vec::new();

        for rule in RULES.iter().filter(|rule| (rule.fires)(&input)) {
            alerts.push((rule.alert)(&input));
            recommendations.push((rule.recommendation)(&input));
        }

        InsightResult {
            alert: alerts.join(" "),
            recommendation: recommendations.join(" "),
        }
    }

    /// Kinds of the rules that hold for this event, in rule order
    pub fn fired_rules(
        &self,
        event: &HarvestEvent,
        metrics: &DerivedMetrics,
    ) -> Vec<InsightRuleKind> {
        let input = self.input(event, metrics);
        RULES
            .iter()
            .filter(|rule| (rule.fires)(&input))
            .map(|rule| rule.kind)
            .collect()
    }

    /// Whether a single rule holds, independent of every other rule
    pub fn rule_fires(
        &self,
        kind: InsightRuleKind,
        event: &HarvestEvent,
        metrics: &DerivedMetrics,
    ) -> bool {
        let input = self.input(event, metrics);
        RULES
            .iter()
            .find(|rule| rule.kind == kind)
            .map(|rule| (rule.fires)(&input))
            .unwrap_or(false)
    }

    fn input<'a>(&'a self, event: &'a HarvestEvent, metrics: &'a DerivedMetrics) -> RuleInput<'a> {
        RuleInput {
            event,
            metrics,
            thresholds: &self.thresholds,
        }
    }
}
