//! Validation utilities for harvest submissions
//!
//! Field ranges are declared on [`HarvestEvent`] with `validator`; the checks
//! here cover what the derive cannot express and turn the collected errors
//! into readable per-field messages.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::metrics::calculate_metrics;
use crate::models::HarvestEvent;

/// Validate a (normalized) harvest event against its field constraints.
///
/// `today` is the current date in the configured time zone; harvests dated
/// after it are rejected. An event whose fields are individually valid is
/// still rejected when its derived metrics would not be finite numbers.
pub fn validate_harvest_event(
    event: &HarvestEvent,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = match event.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    let numbers = [
        ("area", event.area),
        ("production", event.production),
        ("loss_percentage", event.loss_percentage),
        ("duration_hours", event.duration_hours),
        ("moisture_percentage", event.moisture_percentage),
        ("ambient_temperature", event.ambient_temperature),
        ("brix_percentage", event.brix_percentage),
    ];
    for (field, value) in numbers {
        if !value.is_finite() {
            errors.add(field, field_error("finite", "must be a finite number"));
        }
    }

    check_positive(&mut errors, "area", event.area);
    check_positive(&mut errors, "duration_hours", event.duration_hours);

    if event.harvest_date > today {
        errors.add(
            "harvest_date",
            field_error("future_date", "harvest_date cannot be in the future"),
        );
    }

    if errors.errors().is_empty() {
        check_derived_metrics(&mut errors, event);
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Flatten validation errors into one message per field
pub fn describe_validation_errors(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let message = field_errors
                .iter()
                .map(describe_error)
                .collect::<Vec<_>>()
                .join("; ");
            (field.to_string(), message)
        })
        .collect()
}

fn check_positive(errors: &mut ValidationErrors, field: &'static str, value: f64) {
    // NaN is already reported as non-finite
    if value.is_finite() && value <= 0.0 {
        errors.add(field, field_error("positive", "must be greater than 0"));
    }
}

/// Divisors small enough to overflow the productivity figures are blamed on
/// the field that divides
fn check_derived_metrics(errors: &mut ValidationErrors, event: &HarvestEvent) {
    let metrics = calculate_metrics(event);

    if !metrics.lost_tonnage.is_finite() || !metrics.net_production.is_finite() {
        errors.add(
            "production",
            field_error("derived_finite", "production is too large to evaluate"),
        );
    }
    if !metrics.productivity_per_hour.is_finite() {
        errors.add(
            "duration_hours",
            field_error("derived_finite", "duration_hours is too small for the production"),
        );
    }
    if !metrics.productivity_per_hectare.is_finite() {
        errors.add(
            "area",
            field_error("derived_finite", "area is too small for the production"),
        );
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn describe_error(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let min = error.params.get("min");
    let max = error.params.get("max");
    match (error.code.as_ref(), min, max) {
        ("range", Some(min), Some(max)) => format!("must be between {} and {}", min, max),
        ("range", Some(min), None) => format!("must be at least {}", min),
        ("range", None, Some(max)) => format!("must be at most {}", max),
        ("length", Some(min), Some(max)) => {
            format!("must be between {} and {} characters", min, max)
        }
        (code, _, _) => format!("invalid value ({})", code),
    }
}
