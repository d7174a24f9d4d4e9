//! Fixtures shared by the unit tests of this crate

use chrono::NaiveDate;

use crate::models::{HarvestEvent, HarvestMethod};

/// Mechanical harvest of RB867515 that trips the loss, moisture, Brix and
/// spoilage rules but keeps hourly productivity above 200 t/h.
pub(crate) fn sample_event() -> HarvestEvent {
    HarvestEvent {
        area: 150.0,
        production: 1800.0,
        loss_percentage: 12.0,
        duration_hours: 7.5,
        harvest_method: HarvestMethod::Mechanical,
        moisture_percentage: 25.0,
        harvest_date: NaiveDate::from_ymd_opt(2025, 4, 17).expect("valid date"),
        operator_id: "OP12345".to_string(),
        equipment_id: "EQ67890".to_string(),
        variety: "RB867515".to_string(),
        ambient_temperature: 38.0,
        brix_percentage: 10.0,
    }
}

/// Manual harvest that fires no rule under the default thresholds.
pub(crate) fn quiet_event() -> HarvestEvent {
    HarvestEvent {
        area: 50.0,
        production: 2000.0,
        loss_percentage: 4.0,
        duration_hours: 8.0,
        harvest_method: HarvestMethod::Manual,
        moisture_percentage: 15.0,
        harvest_date: NaiveDate::from_ymd_opt(2025, 4, 17).expect("valid date"),
        operator_id: "OP1".to_string(),
        equipment_id: "EQ1".to_string(),
        variety: "CTC4".to_string(),
        ambient_temperature: 28.0,
        brix_percentage: 19.5,
    }
}
