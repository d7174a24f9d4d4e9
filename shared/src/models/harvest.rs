//! Harvest event models

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How the cane was cut
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HarvestMethod {
    Manual,
    Mechanical,
}

impl HarvestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarvestMethod::Manual => "manual",
            HarvestMethod::Mechanical => "mechanical",
        }
    }
}

impl fmt::Display for HarvestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored harvest method does not match a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown harvest method: {0}")]
pub struct UnknownHarvestMethod(pub String);

impl FromStr for HarvestMethod {
    type Err = UnknownHarvestMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(HarvestMethod::Manual),
            "mechanical" => Ok(HarvestMethod::Mechanical),
            other => Err(UnknownHarvestMethod(other.to_string())),
        }
    }
}

/// A single harvest event as submitted from the field.
///
/// Range checks that `validator` can express live on the fields; strict
/// positivity, finiteness and the date bound are checked in
/// [`crate::validation::validate_harvest_event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HarvestEvent {
    /// Hectares harvested
    pub area: f64,
    /// Total tons harvested
    #[validate(range(min = 0.0))]
    pub production: f64,
    /// Percentage of the crop lost during harvest
    #[validate(range(min = 0.0, max = 100.0))]
    pub loss_percentage: f64,
    /// Hours spent harvesting
    pub duration_hours: f64,
    pub harvest_method: HarvestMethod,
    /// Moisture content at harvest
    #[validate(range(min = 0.0, max = 100.0))]
    pub moisture_percentage: f64,
    pub harvest_date: NaiveDate,
    #[validate(length(min = 1, max = 64))]
    pub operator_id: String,
    #[validate(length(min = 1, max = 64))]
    pub equipment_id: String,
    /// Cane variety, e.g. RB867515
    #[validate(length(min = 1, max = 64))]
    pub variety: String,
    /// Ambient temperature in °C
    pub ambient_temperature: f64,
    /// Sugar content in °Brix
    #[validate(range(min = 0.0, max = 30.0))]
    pub brix_percentage: f64,
}

impl HarvestEvent {
    /// Strip leading and trailing whitespace from the identifier fields
    pub fn normalized(mut self) -> Self {
        self.operator_id = self.operator_id.trim().to_string();
        self.equipment_id = self.equipment_id.trim().to_string();
        self.variety = self.variety.trim().to_string();
        self
    }
}
