use anyhow::{Context, Result};
use cashplot_core::{Config, NET_ACCOUNT, NormalizedTransaction, Period};
use cashplot_finance::{ChartData, accumulate_balances, aggregate, categorize};
use cashplot_ingest::{IngCsv, Source};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod report;

#[derive(Parser, Debug)]
#[command(
    name = "cashplot",
    version,
    about = "Categorize a bank export and compute balances and income/expenses over time"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ConfigArg {
    /// Path to the configuration file (JSON, or TOML by extension)
    #[arg(long, default_value_os_t = config::default_config_path())]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct Input {
    /// Path to the ING CSV transactions export
    transactions: PathBuf,

    #[command(flatten)]
    config: ConfigArg,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the configuration
    CheckConfig {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Print every transaction with its category
    Categorize {
        #[command(flatten)]
        input: Input,
    },

    /// Print running balances per account after each transaction
    Balances {
        #[command(flatten)]
        input: Input,
    },

    /// Print income and expenses per category for each period
    Totals {
        #[command(flatten)]
        input: Input,

        /// Period used for totals
        #[arg(long, default_value_t = Period::Month)]
        period: Period,
    },

    /// Write balances and period totals as JSON for a chart renderer
    Export {
        #[command(flatten)]
        input: Input,

        #[arg(long, default_value_t = Period::Month)]
        period: Period,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::CheckConfig { config } => {
            let cfg = config::load_config(&config.config)?;
            println!("Configuration {} is valid", config.config.display());
            println!("  savings accounts: {}", cfg.savings_accounts().join(", "));
            let ignored: Vec<_> = cfg.net_ignore_accounts().iter().cloned().collect();
            println!("  ignored for net:  {}", ignored.join(", "));
            for (name, amount) in cfg.starting_balances() {
                println!("  start {name}: {amount:.2}");
            }
            println!("  match rules:      {}", cfg.match_rules().len());
        }

        Command::Categorize { input } => {
            let (txns, cfg) = load_input(&input)?;
            let categorized = categorize(&txns, &cfg)?;
            print!("{}", report::categorized_table(&categorized));
        }

        Command::Balances { input } => {
            let (txns, cfg) = load_input(&input)?;
            let snapshots = accumulate_balances(&categorize(&txns, &cfg)?, &cfg);
            let mut accounts = cfg.account_names();
            accounts.push(NET_ACCOUNT);
            print!("{}", report::balances_table(&snapshots, &accounts));
        }

        Command::Totals { input, period } => {
            let (txns, cfg) = load_input(&input)?;
            let snapshots = cashplot_finance::process(&txns, &cfg)?;
            print!("{}", report::totals_table(&aggregate(&snapshots, period)));
        }

        Command::Export {
            input,
            period,
            output,
        } => {
            let (txns, cfg) = load_input(&input)?;
            let chart = ChartData::build(cashplot_finance::process(&txns, &cfg)?, period);
            let json = serde_json::to_string_pretty(&chart).context("serialize chart data")?;
            match output {
                Some(path) => write_output(&path, &json)?,
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

fn load_input(input: &Input) -> Result<(Vec<NormalizedTransaction>, Config)> {
    let cfg = config::load_config(&input.config.config)?;
    let txns = IngCsv.load(&input.transactions)?;
    Ok((txns, cfg))
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
