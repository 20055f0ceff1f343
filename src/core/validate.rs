use serde_json::Value;
use thiserror::Error;

use super::types::{RawSimulationInput, SimulationInput};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be a finite number")]
    NotANumber { field: &'static str },
    #[error("time_horizon_months must be >= 1")]
    TimeHorizonTooShort,
    #[error("error_rate_manual must be between 0 and 100")]
    ErrorRateOutOfRange,
    #[error("inputs are too large to produce a finite projection")]
    ResultOverflow,
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::NotANumber { field } => field,
            Self::TimeHorizonTooShort => "time_horizon_months",
            Self::ErrorRateOutOfRange => "error_rate_manual",
            Self::ResultOverflow => "monthly_savings",
        }
    }
}

fn finite_number(field: &'static str, value: &Value) -> Result<f64, ValidationError> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::NotANumber { field })
}

fn required(field: &'static str, value: Option<&Value>) -> Result<f64, ValidationError> {
    match value {
        Some(value) => finite_number(field, value),
        None => Err(ValidationError::Missing { field }),
    }
}

/// Checks a raw input record and resolves it into typed inputs.
///
/// Type checks run in field order, then range checks; the first violation
/// wins. An absent implementation cost resolves to 0.
pub fn validate(raw: &RawSimulationInput) -> Result<SimulationInput, ValidationError> {
    let monthly_invoice_volume = required(
        "monthly_invoice_volume",
        raw.monthly_invoice_volume.as_ref(),
    )?;
    let num_ap_staff = required("num_ap_staff", raw.num_ap_staff.as_ref())?;
    let avg_hours_per_invoice =
        required("avg_hours_per_invoice", raw.avg_hours_per_invoice.as_ref())?;
    let hourly_wage = required("hourly_wage", raw.hourly_wage.as_ref())?;
    let error_rate_manual = required("error_rate_manual", raw.error_rate_manual.as_ref())?;
    let error_cost = required("error_cost", raw.error_cost.as_ref())?;
    let time_horizon_months = required("time_horizon_months", raw.time_horizon_months.as_ref())?;

    if time_horizon_months < 1.0 {
        return Err(ValidationError::TimeHorizonTooShort);
    }

    if !(0.0..=100.0).contains(&error_rate_manual) {
        return Err(ValidationError::ErrorRateOutOfRange);
    }

    let one_time_implementation_cost = match raw.one_time_implementation_cost.as_ref() {
        Some(value) => finite_number("one_time_implementation_cost", value)?,
        None => 0.0,
    };

    Ok(SimulationInput {
        monthly_invoice_volume,
        num_ap_staff,
        avg_hours_per_invoice,
        hourly_wage,
        error_rate_manual,
        error_cost,
        time_horizon_months,
        one_time_implementation_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use serde_json::json;

    fn sample_raw() -> RawSimulationInput {
        serde_json::from_value(json!({
            "monthly_invoice_volume": 2000,
            "num_ap_staff": 3,
            "avg_hours_per_invoice": 0.17,
            "hourly_wage": 30,
            "error_rate_manual": 0.5,
            "error_cost": 100,
            "time_horizon_months": 36,
            "one_time_implementation_cost": 5000
        }))
        .expect("sample payload should deserialize")
    }

    #[test]
    fn validate_accepts_complete_input() {
        let input = validate(&sample_raw()).expect("valid inputs");
        assert_eq!(input.monthly_invoice_volume, 2000.0);
        assert_eq!(input.avg_hours_per_invoice, 0.17);
        assert_eq!(input.time_horizon_months, 36.0);
        assert_eq!(input.one_time_implementation_cost, 5000.0);
    }

    #[test]
    fn validate_defaults_missing_implementation_cost_to_zero() {
        let mut raw = sample_raw();
        raw.one_time_implementation_cost = None;
        let input = validate(&raw).expect("valid inputs");
        assert_eq!(input.one_time_implementation_cost, 0.0);
    }

    #[test]
    fn validate_treats_null_implementation_cost_as_absent() {
        let raw: RawSimulationInput = serde_json::from_value(json!({
            "monthly_invoice_volume": 10,
            "num_ap_staff": 1,
            "avg_hours_per_invoice": 1,
            "hourly_wage": 20,
            "error_rate_manual": 1,
            "error_cost": 5,
            "time_horizon_months": 12,
            "one_time_implementation_cost": null
        }))
        .expect("payload should deserialize");
        let input = validate(&raw).expect("valid inputs");
        assert_eq!(input.one_time_implementation_cost, 0.0);
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut raw = sample_raw();
        raw.hourly_wage = None;
        raw.error_cost = None;
        let err = validate(&raw).expect_err("must reject missing field");
        assert_eq!(err, ValidationError::Missing { field: "hourly_wage" });
        assert_eq!(err.to_string(), "hourly_wage is required");
    }

    #[test]
    fn validate_rejects_numeric_strings() {
        let mut raw = sample_raw();
        raw.num_ap_staff = Some(json!("3"));
        let err = validate(&raw).expect_err("must reject string");
        assert_eq!(err, ValidationError::NotANumber { field: "num_ap_staff" });
        assert!(err.to_string().contains("num_ap_staff"));
    }

    #[test]
    fn validate_rejects_non_numeric_implementation_cost() {
        let mut raw = sample_raw();
        raw.one_time_implementation_cost = Some(json!("free"));
        let err = validate(&raw).expect_err("must reject string cost");
        assert_eq!(err.field(), "one_time_implementation_cost");
    }

    #[test]
    fn validate_type_errors_take_precedence_over_range_errors() {
        let mut raw = sample_raw();
        raw.error_rate_manual = Some(json!(250));
        raw.time_horizon_months = Some(json!(true));
        let err = validate(&raw).expect_err("must reject");
        assert_eq!(
            err,
            ValidationError::NotANumber {
                field: "time_horizon_months"
            }
        );
    }

    #[test]
    fn validate_time_horizon_boundary() {
        let mut raw = sample_raw();
        raw.time_horizon_months = Some(json!(0));
        assert_eq!(validate(&raw), Err(ValidationError::TimeHorizonTooShort));

        raw.time_horizon_months = Some(json!(1));
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn validate_error_rate_boundaries() {
        let mut raw = sample_raw();
        for rejected in [100.1, -0.1] {
            raw.error_rate_manual = Some(json!(rejected));
            assert_eq!(validate(&raw), Err(ValidationError::ErrorRateOutOfRange));
        }
        for accepted in [0.0, 100.0] {
            raw.error_rate_manual = Some(json!(accepted));
            assert!(validate(&raw).is_ok(), "{accepted} should be accepted");
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_validate_error_rate_range(rate in -500.0f64..600.0) {
            let mut raw = sample_raw();
            raw.error_rate_manual = Some(json!(rate));
            let result = validate(&raw);
            if (0.0..=100.0).contains(&rate) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(ValidationError::ErrorRateOutOfRange));
            }
        }

        #[test]
        fn prop_validate_time_horizon_below_one_is_rejected(months in -1000.0f64..1.0) {
            let mut raw = sample_raw();
            raw.time_horizon_months = Some(json!(months));
            prop_assert_eq!(validate(&raw), Err(ValidationError::TimeHorizonTooShort));
        }
    }
}
