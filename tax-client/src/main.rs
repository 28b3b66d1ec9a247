use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use tax_client::{ClientConfig, Overrides, app, logging, view};
use tax_core::{ApiError, CalculatorApi};
use tax_http::HttpCalculatorApi;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// UK income tax calculator client.
///
/// Talks to the tax calculation service: checks its health, lists recent
/// calculations and submits new ones.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service origin, e.g. `http://localhost:8080`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Tax year label sent with calculations.
    #[arg(long, global = true)]
    tax_year: Option<String>,

    /// Log filter (`info`, `debug`, or an `EnvFilter` directive).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file as well.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show service health and recent calculations (default).
    Dashboard,

    /// Submit one calculation and show the result with refreshed history.
    Calculate {
        /// Gross annual income in pounds, e.g. `50000` or `42000.50`.
        #[arg(long)]
        income: String,

        /// National Insurance number, e.g. `AB123456C`.
        #[arg(long = "ni")]
        national_insurance: String,
    },

    /// Show one stored calculation by id.
    Show {
        id: String,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();

    let config = ClientConfig::resolve(
        cli.config.as_deref(),
        Overrides {
            base_url: cli.base_url,
            tax_year: cli.tax_year,
            log_level: cli.log_level,
            log_file: cli.log_file,
        },
    )?;

    if let Some(level) = &config.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }

    debug!(base_url = %config.api.base_url, "using calculation service");
    let api: Arc<dyn CalculatorApi> = Arc::new(
        HttpCalculatorApi::new(config.api.clone()).context("invalid service configuration")?,
    );
    let tax_year = config.api.tax_year.as_str();

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => {
            let state = app::load_dashboard(api, tax_year).await;
            print!("{}", view::render(&state));
        }
        Command::Calculate {
            income,
            national_insurance,
        } => {
            let state = app::calculate_once(api, tax_year, &income, &national_insurance)
                .await
                .context("invalid input")?;
            print!("{}", view::render(&state));
            if let Some(error) = state.error() {
                anyhow::bail!("{error}");
            }
        }
        Command::Show { id } => match api.get_calculation(&id).await {
            Ok(record) => print!("{}", view::render_record(&record)),
            Err(ApiError::NotFound) => anyhow::bail!("calculation '{id}' not found"),
            Err(error) => return Err(error).context("failed to fetch calculation"),
        },
    }

    debug!("done");
    Ok(())
}
