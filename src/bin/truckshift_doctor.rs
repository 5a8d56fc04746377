//! Truckshift Deployment Doctor
//!
//! Checks the environment the server would start with and prints the
//! troubleshooting verdict for each symptom.
//!
//! Usage:
//!   cargo run --bin truckshift_doctor
//!   cargo run --bin truckshift_doctor -- --json

use clap::Parser;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use truckshift::utils::constants::APP_NAME;
use truckshift::{diagnostics, AppConfig, CheckStatus};

#[derive(Parser, Debug)]
#[command(name = "truckshift_doctor", version, about = "Check a Truckshift deployment")]
struct Cli {
    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env();
    let report = diagnostics::run(config.as_ref().map_err(|e| e.to_string()));

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{} deployment check", APP_NAME);
        println!();
        for check in &report.checks {
            println!("  {}", check);
        }
        println!();
        println!("Overall: {}", report.overall().label());
    }

    let failed = match report.overall() {
        CheckStatus::Fail => true,
        CheckStatus::Warn => cli.strict,
        CheckStatus::Pass => false,
    };
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
