use super::types::{EngineConfig, RawSimulationInput, SimulationInput, SimulationResult};
use super::validate::{ValidationError, validate};

/// Stateless ROI calculator bound to one set of product constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn simulate(&self, input: &SimulationInput) -> SimulationResult {
        let cfg = &self.config;
        let volume = input.monthly_invoice_volume;

        let labor_cost_manual =
            input.num_ap_staff * input.hourly_wage * input.avg_hours_per_invoice * volume;
        let auto_cost = volume * cfg.automated_cost_per_invoice;
        let error_savings =
            (input.error_rate_manual / 100.0 - cfg.error_rate_auto) * volume * input.error_cost;

        let monthly_savings_raw = labor_cost_manual + error_savings - auto_cost;
        let monthly_savings =
            (monthly_savings_raw * cfg.min_roi_boost_factor).max(cfg.min_monthly_savings);

        let cumulative_savings = monthly_savings * input.time_horizon_months;
        let implementation_cost = input.one_time_implementation_cost;
        let net_savings = cumulative_savings - implementation_cost;

        let (payback_months, roi_percentage) = if implementation_cost > 0.0 {
            (
                implementation_cost / monthly_savings,
                (net_savings / implementation_cost) * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        SimulationResult {
            monthly_savings,
            cumulative_savings,
            net_savings,
            payback_months,
            roi_percentage,
            automated_cost_per_invoice: cfg.automated_cost_per_invoice,
        }
    }

    /// Validates `raw`, runs the calculation and refuses results that
    /// overflowed. Every caller-facing path goes through here.
    pub fn project(
        &self,
        raw: &RawSimulationInput,
    ) -> Result<(SimulationInput, SimulationResult), ValidationError> {
        let inputs = validate(raw)?;
        let results = self.simulate(&inputs);
        if !results.is_finite() {
            return Err(ValidationError::ResultOverflow);
        }
        Ok((inputs, results))
    }
}

/// Runs the calculation with the default product constants.
pub fn simulate(input: &SimulationInput) -> SimulationResult {
    Engine::default().simulate(input)
}
