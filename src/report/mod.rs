//! Downloadable summary documents for a computed projection.

mod pdf;

use thiserror::Error;

use crate::core::{SimulationInput, SimulationResult};

pub use pdf::PdfReportRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("report rendering failed: {0}")]
    Render(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
}

pub trait ReportRenderer: Send + Sync {
    fn render(
        &self,
        email: &str,
        inputs: &SimulationInput,
        results: &SimulationResult,
    ) -> Result<RenderedReport, RenderError>;
}

/// Labelled input rows in display order.
pub fn input_rows(inputs: &SimulationInput) -> [(&'static str, String); 8] {
    [
        (
            "Monthly invoice volume",
            format_number(inputs.monthly_invoice_volume),
        ),
        ("AP staff", format_number(inputs.num_ap_staff)),
        (
            "Avg hours per invoice",
            format_number(inputs.avg_hours_per_invoice),
        ),
        ("Hourly wage", format_money(inputs.hourly_wage)),
        (
            "Manual error rate (%)",
            format_number(inputs.error_rate_manual),
        ),
        ("Cost per error", format_money(inputs.error_cost)),
        (
            "Time horizon (months)",
            format_number(inputs.time_horizon_months),
        ),
        (
            "One-time implementation cost",
            format_money(inputs.one_time_implementation_cost),
        ),
    ]
}

/// Headline result rows in display order.
pub fn result_rows(results: &SimulationResult) -> [(&'static str, String); 5] {
    [
        ("Monthly savings", format_money(results.monthly_savings)),
        ("Cumulative savings", format_money(results.cumulative_savings)),
        ("Net savings", format_money(results.net_savings)),
        ("Payback (months)", format!("{:.2}", results.payback_months)),
        ("ROI", format!("{:.2}%", results.roi_percentage)),
    ]
}

fn format_money(value: f64) -> String {
    format!("{value:.2}")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
