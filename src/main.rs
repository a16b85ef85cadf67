use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxr::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxr::AppCommand {
    fn from(cmd: Commands) -> fxr::AppCommand {
        match cmd {
            Commands::Rate {
                source,
                target,
                date,
            } => fxr::AppCommand::Rate {
                source,
                target,
                date,
            },
            Commands::Convert {
                source,
                target,
                amount,
            } => fxr::AppCommand::Convert {
                source,
                target,
                amount,
            },
            Commands::Series {
                source,
                target,
                start,
                end,
            } => fxr::AppCommand::Series {
                source,
                target,
                start,
                end,
            },
            Commands::Twr {
                source,
                target,
                amount,
                start,
                flows,
            } => fxr::AppCommand::Twr {
                source,
                target,
                amount,
                start,
                flows,
            },
            Commands::Currencies => fxr::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the exchange rate for a currency pair
    Rate {
        /// Source currency code, e.g. EUR
        source: String,
        /// Target currency code, e.g. USD
        target: String,
        /// Valuation date (YYYY-MM-DD); defaults to the latest rate
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Convert an amount at the latest exchange rate
    Convert {
        /// Source currency code, e.g. EUR
        source: String,
        /// Target currency code, e.g. USD
        target: String,
        /// Amount to convert
        amount: String,
    },
    /// Display a day-by-day rate series for a currency pair
    Series {
        /// Source currency code, e.g. EUR
        source: String,
        /// Target currency code, e.g. USD
        target: String,
        /// First day of the series (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,
        /// Last day of the series (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Compute the time-weighted return over a rate series
    Twr {
        /// Source currency code, e.g. EUR
        source: String,
        /// Target currency code, e.g. USD
        target: String,
        /// Starting amount
        #[arg(short, long)]
        amount: String,
        /// First day of the series (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,
        /// Cash flow as DATE:AMOUNT, repeatable
        #[arg(short = 'f', long = "flow")]
        flows: Vec<String>,
    },
    /// List the configured currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxr::cli::setup::setup(),
        Some(cmd) => fxr::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
