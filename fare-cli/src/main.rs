use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fare_core::{FareConfig, FareField, FareForm, Flexibility};
use tracing::{debug, info};

use fare_cli::csv_rows::{self, TaxRowRecord};
use fare_cli::{config_file, logging, report, session};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Fare difference calculator for ticket changes.
///
/// Computes the base fare difference, the tax difference (only increases
/// count) and the total to collect, adding the airline penalty and service
/// fee when the fare is not flexible.
#[derive(Debug, Parser)]
#[command(name = "fare-calc", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum number of tax rows (overrides the config file).
    #[arg(long, global = true)]
    max_tax_rows: Option<usize>,

    /// Recompute delay in milliseconds (overrides the config file).
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Log level or filter directive, e.g. `debug` or `warn,fare_core=trace`.
    /// Defaults to `RUST_LOG`, then `warn`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the fare difference once and print the summary.
    Compute(ComputeArgs),

    /// Edit the form interactively from standard input.
    Session,
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// Old base fare.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    base_old: String,

    /// New base fare.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    base_new: String,

    /// Tax row as `[CODE=]OLD:NEW`; repeat for more rows.
    #[arg(long = "tax", value_name = "[CODE=]OLD:NEW")]
    taxes: Vec<TaxRowRecord>,

    /// CSV file of tax rows (`tax_code,old_fare,new_fare`), added after `--tax` rows.
    #[arg(long)]
    taxes_csv: Option<PathBuf>,

    /// Whether the fare is flexible: yes, no or unset.
    #[arg(long, default_value = "unset", value_parser = parse_flexibility)]
    flexible: Flexibility,

    /// Airline change penalty; applies only when the fare is not flexible.
    #[arg(long, default_value = "0")]
    penalty: String,

    /// Service fee; applies only when the fare is not flexible.
    #[arg(long, default_value = "0")]
    service_fee: String,
}

fn parse_flexibility(s: &str) -> Result<Flexibility, String> {
    Flexibility::try_from(s)
}

// ─── commands ────────────────────────────────────────────────────────────────

fn compute(
    config: &FareConfig,
    args: ComputeArgs,
) -> Result<()> {
    let mut form = FareForm::new(config);
    form.set_field(FareField::BaseOldFare, &args.base_old);
    form.set_field(FareField::BaseNewFare, &args.base_new);
    form.set_field(FareField::AirlinePenalty, &args.penalty);
    form.set_field(FareField::ServiceFee, &args.service_fee);
    form.set_flexibility(args.flexible);

    let mut records = args.taxes;
    if let Some(path) = &args.taxes_csv {
        let loaded = csv_rows::load_from_file(path)
            .with_context(|| format!("Failed to import tax rows: {}", path.display()))?;
        debug!(rows = loaded.len(), path = %path.display(), "tax rows read from CSV");
        records.extend(loaded);
    }

    let summary = csv_rows::apply_records(&mut form, &records);
    if summary.rejected > 0 {
        eprintln!(
            "{} ({} tax rows not added)",
            report::max_rows_alert(config.max_tax_rows),
            summary.rejected
        );
    }

    form.recompute();
    print!("{}", report::render(&form));
    Ok(())
}

async fn run_session(config: &FareConfig) -> Result<()> {
    let mut form = FareForm::new(config);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    session::run_session(&mut form, config.debounce_delay(), stdin, &mut stdout).await?;
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref())?;

    let config = config_file::load_config(cli.config.as_deref())?;
    let config = config_file::apply_overrides(config, cli.max_tax_rows, cli.debounce_ms)
        .context("Invalid configuration")?;
    info!(
        max_tax_rows = config.max_tax_rows,
        debounce_delay_ms = config.debounce_delay_ms,
        "configuration ready"
    );

    match cli.command {
        Command::Compute(args) => compute(&config, args),
        Command::Session => run_session(&config).await,
    }
}
