use serde::{Deserialize, Serialize};

/// Tunable limits used by the insight rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// Loss percentage above which harvest losses are flagged
    pub loss_percentage: f64,
    /// Moisture percentage above which mechanical cutting is discouraged
    pub mechanical_moisture_percentage: f64,
    /// Minimum acceptable °Brix
    pub brix_percentage: f64,
    /// Minimum acceptable net tons per hour
    pub productivity_per_hour: f64,
    /// Ambient °C above which stored cane risks spoilage
    pub spoilage_temperature: f64,
    /// Moisture percentage above which stored cane risks spoilage
    pub spoilage_moisture_percentage: f64,
    /// Loss percentage attributed to operator or equipment
    pub operator_loss_percentage: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            loss_percentage: 10.0,
            mechanical_moisture_percentage: 20.0,
            brix_percentage: 12.0,
            productivity_per_hour: 200.0,
            spoilage_temperature: 35.0,
            spoilage_moisture_percentage: 20.0,
            operator_loss_percentage: 15.0,
        }
    }
}
