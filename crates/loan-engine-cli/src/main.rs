mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::amortization::{EmiArgs, ScheduleArgs};
use commands::eligibility::EligibilityArgs;

/// Loan EMI and eligibility calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan EMI, amortization schedule and eligibility calculations",
    long_about = "A CLI for loan calculations with decimal precision. Computes the \
                  equated monthly installment and amortization schedule of a loan, \
                  and sizes the largest loan an applicant can service along with \
                  illustrative lender offers for their credit tier."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter (e.g. "debug", "loan_engine_core=trace"); falls back to RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the EMI and totals for a loan
    Emi(EmiArgs),
    /// Print the month-by-month (or yearly) amortization schedule
    Schedule(ScheduleArgs),
    /// Size the maximum loan for an applicant and list matching offers
    Eligibility(EligibilityArgs),
    /// Print the default eligibility policy as JSON
    Policy,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::amortization::run_emi(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Eligibility(args) => commands::eligibility::run_eligibility(args),
        Commands::Policy => commands::eligibility::run_policy(),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
