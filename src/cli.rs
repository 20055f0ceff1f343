use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::api::ServerConfig;
use crate::core::{Engine, RawSimulationInput, SimulationResult, ValidationError};
use crate::telemetry::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "invoice-roi",
    about = "ROI projection for moving accounts-payable invoice processing from manual to automated"
)]
pub struct Cli {
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Compute one projection and print it as JSON.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "ROI_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(
        long,
        env = "ROI_DATA_FILE",
        help = "JSON file used to persist scenarios; kept in memory when omitted"
    )]
    pub data_file: Option<PathBuf>,
}

impl From<ServeArgs> for ServerConfig {
    fn from(value: ServeArgs) -> Self {
        ServerConfig {
            bind: value.bind,
            port: value.port,
            data_file: value.data_file,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(long, value_parser = finite_f64)]
    pub monthly_invoice_volume: f64,
    #[arg(long, value_parser = finite_f64)]
    pub num_ap_staff: f64,
    #[arg(long, value_parser = finite_f64)]
    pub avg_hours_per_invoice: f64,
    #[arg(long, value_parser = finite_f64)]
    pub hourly_wage: f64,
    #[arg(
        long,
        value_parser = finite_f64,
        help = "Share of manually processed invoices with errors, in percent"
    )]
    pub error_rate_manual: f64,
    #[arg(long, value_parser = finite_f64, help = "Cost of handling one erroneous invoice")]
    pub error_cost: f64,
    #[arg(long, value_parser = finite_f64)]
    pub time_horizon_months: f64,
    #[arg(long, value_parser = finite_f64)]
    pub one_time_implementation_cost: Option<f64>,
}

impl From<&SimulateArgs> for RawSimulationInput {
    fn from(args: &SimulateArgs) -> Self {
        RawSimulationInput {
            scenario_name: None,
            monthly_invoice_volume: Some(args.monthly_invoice_volume.into()),
            num_ap_staff: Some(args.num_ap_staff.into()),
            avg_hours_per_invoice: Some(args.avg_hours_per_invoice.into()),
            hourly_wage: Some(args.hourly_wage.into()),
            error_rate_manual: Some(args.error_rate_manual.into()),
            error_cost: Some(args.error_cost.into()),
            time_horizon_months: Some(args.time_horizon_months.into()),
            one_time_implementation_cost: args.one_time_implementation_cost.map(Into::into),
        }
    }
}

fn finite_f64(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|e| format!("`{raw}` is not a number: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("`{raw}` must be finite"))
    }
}

pub fn run_simulate(args: &SimulateArgs) -> Result<SimulationResult, ValidationError> {
    let (_, results) = Engine::default().project(&RawSimulationInput::from(args))?;
    Ok(results)
}
