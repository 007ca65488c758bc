//! YNAB register → Monarch CSVs (transactions + balances).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ynab_monarch_export::{export, ExportSummary, Mode};
use ynab_monarch_import::{convert, load_register, CategoryMapper, MappingConfig};

#[derive(Parser, Debug)]
#[command(name = "ynab-monarch")]
#[command(version, about = "YNAB register → Monarch CSVs (transactions + balances)", long_about = None)]
struct Cli {
    /// Path to the YNAB register CSV export (all accounts to migrate)
    #[arg(long)]
    ynab_register: PathBuf,

    /// Path to the JSON (or .toml) file defining YNAB → Monarch category mappings
    #[arg(long)]
    category_mapping: PathBuf,

    /// Directory where output CSVs will be written
    #[arg(long)]
    out_dir: PathBuf,

    /// Validate mappings and splits without writing transaction or balance CSVs
    #[arg(long, visible_alias = "validate-only")]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = MappingConfig::load(&cli.category_mapping).with_context(|| {
        format!(
            "Failed to load category mapping {}",
            cli.category_mapping.display()
        )
    })?;
    let mapper = CategoryMapper::new(&config);
    tracing::info!("Loaded {} mapping rules", config.rules.len());

    let rows = load_register(&cli.ynab_register).with_context(|| {
        format!("Failed to read YNAB register {}", cli.ynab_register.display())
    })?;
    if rows.is_empty() {
        tracing::warn!(
            "{} has no transactions; nothing to convert",
            cli.ynab_register.display()
        );
        return Ok(());
    }

    let conversion = convert(&rows, &mapper);

    let mode = if cli.dry_run {
        Mode::ValidateOnly
    } else {
        Mode::Write
    };
    let summary = export(&cli.out_dir, &conversion, mode)
        .with_context(|| format!("Failed to write output to {}", cli.out_dir.display()))?;

    print_summary(cli, mode, &summary);
    Ok(())
}

fn print_summary(cli: &Cli, mode: Mode, summary: &ExportSummary) {
    match mode {
        Mode::ValidateOnly => {
            println!("DRY RUN: no transaction or balance CSVs written");
            println!("Transactions processed: {}", summary.transactions);
            println!("Split groups detected: {}", summary.split_groups);
            println!("Unmapped categories: {}", summary.unmapped);
        }
        Mode::Write => {
            if summary.unmapped > 0 {
                println!(
                    "{} unmapped categories written to {}",
                    summary.unmapped,
                    ynab_monarch_export::UNMAPPED_FILE
                );
            }
            println!(
                "{} transactions -> {}",
                summary.transactions,
                ynab_monarch_export::TRANSACTIONS_FILE
            );
            println!(
                "{} balances -> {}",
                summary.balances,
                ynab_monarch_export::BALANCES_FILE
            );
            println!(
                "Per-account CSVs for {} accounts in {}/<account_name>/",
                summary.accounts,
                cli.out_dir.display()
            );
        }
    }
}
