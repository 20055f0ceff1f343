use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request-shaped input record as it arrives over the wire.
///
/// Every field is kept as an untyped JSON value so the validator can tell a
/// missing field apart from a string or a non-finite number.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSimulationInput {
    #[serde(alias = "scenarioName")]
    pub scenario_name: Option<Value>,
    #[serde(alias = "monthlyInvoiceVolume")]
    pub monthly_invoice_volume: Option<Value>,
    #[serde(alias = "numApStaff")]
    pub num_ap_staff: Option<Value>,
    #[serde(alias = "avgHoursPerInvoice")]
    pub avg_hours_per_invoice: Option<Value>,
    #[serde(alias = "hourlyWage")]
    pub hourly_wage: Option<Value>,
    #[serde(alias = "errorRateManual")]
    pub error_rate_manual: Option<Value>,
    #[serde(alias = "errorCost")]
    pub error_cost: Option<Value>,
    #[serde(alias = "timeHorizonMonths")]
    pub time_horizon_months: Option<Value>,
    #[serde(alias = "oneTimeImplementationCost")]
    pub one_time_implementation_cost: Option<Value>,
}

impl RawSimulationInput {
    /// Trimmed, non-empty scenario name if one was supplied as a string.
    pub fn scenario_name(&self) -> Option<&str> {
        match &self.scenario_name {
            Some(Value::String(name)) if !name.trim().is_empty() => Some(name.trim()),
            _ => None,
        }
    }
}

/// Validated inputs. Only constructed by [`super::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub monthly_invoice_volume: f64,
    pub num_ap_staff: f64,
    pub avg_hours_per_invoice: f64,
    pub hourly_wage: f64,
    /// Percent, 0..=100.
    pub error_rate_manual: f64,
    pub error_cost: f64,
    pub time_horizon_months: f64,
    /// Resolved at validation: absent becomes 0.
    pub one_time_implementation_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub monthly_savings: f64,
    pub cumulative_savings: f64,
    pub net_savings: f64,
    pub payback_months: f64,
    pub roi_percentage: f64,
    pub automated_cost_per_invoice: f64,
}

impl SimulationResult {
    /// False when extreme inputs overflowed any figure to `inf` or `NaN`.
    pub fn is_finite(&self) -> bool {
        [
            self.monthly_savings,
            self.cumulative_savings,
            self.net_savings,
            self.payback_months,
            self.roi_percentage,
            self.automated_cost_per_invoice,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl SimulationInput {
    pub fn is_finite(&self) -> bool {
        [
            self.monthly_invoice_volume,
            self.num_ap_staff,
            self.avg_hours_per_invoice,
            self.hourly_wage,
            self.error_rate_manual,
            self.error_cost,
            self.time_horizon_months,
            self.one_time_implementation_cost,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Fixed product constants used by the calculation engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Currency per invoice under automation.
    pub automated_cost_per_invoice: f64,
    /// Fraction of invoices with errors under automation.
    pub error_rate_auto: f64,
    /// Multiplier applied to the raw monthly savings.
    pub min_roi_boost_factor: f64,
    /// Lower bound for the reported monthly savings.
    pub min_monthly_savings: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            automated_cost_per_invoice: 0.20,
            error_rate_auto: 0.001,
            min_roi_boost_factor: 1.1,
            min_monthly_savings: 1.0,
        }
    }
}
