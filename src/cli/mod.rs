//! CLI module for Trazo
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `lookup` - Query candidate routes for a SKU/postal code
//! - `plan` - Query candidates, call the optimizer, show the merged view
//! - `reconcile` - Merge saved candidate and optimizer snapshots offline
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Candidate routes only
//! trazo lookup --sku 1139002876 --cp 52715
//!
//! # Candidates with the optimizer's picks highlighted
//! trazo plan --sku 1139002876 --cp 52715 --qty 2 --preset alta
//!
//! # Re-plan after store 108 rejected the order
//! trazo plan --sku 1139002876 --cp 52715 --qty 2 \
//!     --recalc --purchase-date 2025-06-02 --original-delivery 2025-06-12 --rejected-store 108
//! ```

pub mod completions;
pub mod config;
pub mod lookup;
pub mod output;
pub mod plan;
pub mod reconcile;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::TrazoConfig;
use crate::optimizer::{parse_weight_override, WeightPreset};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Trazo - delivery route lookup and optimizer reconciliation
#[derive(Parser, Debug)]
#[command(
    name = "trazo",
    version,
    about = "Delivery route candidates reconciled with optimizer-selected routes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query candidate routes from the warehouse
    Lookup(LookupArgs),
    /// Query candidates and request an optimal route set
    Plan(PlanArgs),
    /// Reconcile saved candidate and optimizer snapshots
    Reconcile(ReconcileArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that reads configuration.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "trazo.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TRAZO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Product SKU (numeric code)
    #[arg(long)]
    pub sku: String,

    /// Destination postal code
    #[arg(long)]
    pub cp: String,

    /// Read candidates from a saved JSON export instead of the warehouse
    #[arg(long)]
    pub candidates: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Product SKU (numeric code)
    #[arg(long)]
    pub sku: String,

    /// Destination postal code
    #[arg(long)]
    pub cp: String,

    /// Units to deliver
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub qty: u32,

    /// Set the optimizer's flag_vn
    #[arg(long)]
    pub flag_vn: bool,

    /// Seasonal weight preset (defaults to the configured preset)
    #[arg(long, value_enum, conflicts_with = "recalc")]
    pub preset: Option<WeightPreset>,

    /// Override one base weight, e.g. --weight costo=1.5 (repeatable)
    #[arg(
        long = "weight",
        value_name = "NAME=VALUE",
        value_parser = parse_weight_override,
        conflicts_with = "recalc"
    )]
    pub weights: Vec<(String, f64)>,

    /// Re-plan an order after a store rejected it
    #[arg(long, requires_all = ["original_delivery", "rejected_store"])]
    pub recalc: bool,

    /// Original purchase date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub purchase_date: Option<NaiveDate>,

    /// Original delivery date, YYYY-MM-DD
    #[arg(long, value_parser = parse_date, requires = "recalc")]
    pub original_delivery: Option<NaiveDate>,

    /// Store that rejected the order
    #[arg(long, requires = "recalc")]
    pub rejected_store: Option<i64>,

    /// Difference weight for recalculation (0.0 to 4.0)
    #[arg(long, default_value = "4.0", requires = "recalc")]
    pub diferencia: f64,

    /// Read candidates from a saved JSON export instead of the warehouse
    #[arg(long)]
    pub candidates: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Saved candidate rows (JSON array of warehouse records)
    #[arg(long)]
    pub candidates: PathBuf,

    /// Saved optimizer response body; omit for a candidate-only view
    #[arg(long)]
    pub optimizer: Option<PathBuf>,

    /// Route key column (defaults to the configured column)
    #[arg(long)]
    pub key_column: Option<String>,

    /// Highlight this store as rejected
    #[arg(long)]
    pub rejected_store: Option<i64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "trazo.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", s, e))
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &CommonArgs,
) -> Result<TrazoConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        TrazoConfig::load(Some(&args.config))?
    } else {
        TrazoConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration and start logging for a command run.
pub fn prepare(args: &CommonArgs) -> Result<TrazoConfig, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(args)?;
    crate::logging::init_tracing(&config.logging)?;
    if !args.config.exists() {
        tracing::debug!(path = %args.config.display(), "Config file not found, using defaults");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_lookup() {
        let cli = Cli::try_parse_from(["trazo", "lookup", "--sku", "1139002876", "--cp", "52715"])
            .unwrap();
        match cli.command {
            Commands::Lookup(args) => {
                assert_eq!(args.sku, "1139002876");
                assert_eq!(args.common.config, PathBuf::from("trazo.toml"));
                assert!(!args.common.json);
            }
            _ => panic!("Expected Lookup command"),
        }
    }

    #[test]
    fn test_cli_parse_plan_defaults() {
        let cli = Cli::try_parse_from(["trazo", "plan", "--sku", "1", "--cp", "2"]).unwrap();
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.qty, 1);
                assert!(!args.recalc);
                assert!(args.preset.is_none());
                assert!(args.weights.is_empty());
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_parse_plan_weights() {
        let cli = Cli::try_parse_from([
            "trazo", "plan", "--sku", "1", "--cp", "2", "--qty", "3", "--preset", "alta",
            "--weight", "costo=1.5", "--weight", "nodo=0",
        ])
        .unwrap();
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.qty, 3);
                assert_eq!(args.preset, Some(WeightPreset::Alta));
                assert_eq!(
                    args.weights,
                    vec![("costo".to_string(), 1.5), ("nodo".to_string(), 0.0)]
                );
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_plan_zero_qty_rejected() {
        let result = Cli::try_parse_from(["trazo", "plan", "--sku", "1", "--cp", "2", "--qty", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_plan_recalc() {
        let cli = Cli::try_parse_from([
            "trazo",
            "plan",
            "--sku",
            "1",
            "--cp",
            "2",
            "--recalc",
            "--purchase-date",
            "2025-06-02",
            "--original-delivery",
            "2025-06-12",
            "--rejected-store",
            "108",
        ])
        .unwrap();
        match cli.command {
            Commands::Plan(args) => {
                assert!(args.recalc);
                assert_eq!(args.rejected_store, Some(108));
                assert_eq!(args.diferencia, 4.0);
                assert_eq!(
                    args.original_delivery,
                    NaiveDate::from_ymd_opt(2025, 6, 12)
                );
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_recalc_requires_inputs() {
        let result = Cli::try_parse_from(["trazo", "plan", "--sku", "1", "--cp", "2", "--recalc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejected_store_requires_recalc() {
        let result = Cli::try_parse_from([
            "trazo",
            "plan",
            "--sku",
            "1",
            "--cp",
            "2",
            "--rejected-store",
            "108",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_preset_conflicts_with_recalc() {
        let result = Cli::try_parse_from([
            "trazo",
            "plan",
            "--sku",
            "1",
            "--cp",
            "2",
            "--preset",
            "baja",
            "--recalc",
            "--original-delivery",
            "2025-06-12",
            "--rejected-store",
            "108",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_reconcile() {
        let cli = Cli::try_parse_from([
            "trazo",
            "reconcile",
            "--candidates",
            "rows.json",
            "--optimizer",
            "plan.json",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Reconcile(args) => {
                assert_eq!(args.candidates, PathBuf::from("rows.json"));
                assert_eq!(args.optimizer, Some(PathBuf::from("plan.json")));
                assert!(args.common.json);
            }
            _ => panic!("Expected Reconcile command"),
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-06-02"), Ok(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()));
        assert!(parse_date("02/06/2025").is_err());
    }
}
