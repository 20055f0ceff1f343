use clap::Parser;
use invoice_roi::cli::{Cli, Command, run_simulate};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    invoice_roi::telemetry::init(cli.log_format);

    match cli.command {
        Command::Serve(args) => {
            if let Err(e) = invoice_roi::api::run_http_server(args.into()).await {
                tracing::error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        Command::Simulate(args) => match run_simulate(&args) {
            Ok(result) => match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("failed to encode result: {e}");
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Invalid input: {e}");
                std::process::exit(2);
            }
        },
    }
}
