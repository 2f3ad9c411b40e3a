use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rust_decimal::Decimal;
use tax_core::{SettingsRepository, k_receipt_cap_in_range, personal_cap_in_range};
use tax_db_sqlite::{SqliteRepository, connection_url};

/// Prepare a deduction settings database.
///
/// Optionally runs migrations and seed files, then overrides the personal
/// and k-receipt caps, and prints the configuration that is stored.
#[derive(Parser, Debug)]
#[command(name = "tax-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Database file or sqlx URL (created if missing)
    #[arg(short, long, default_value = "ktaxes.db")]
    database: String,

    /// Run database migrations before anything else
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,

    /// Personal deduction cap (10000 to 100000)
    #[arg(long)]
    personal: Option<Decimal>,

    /// K-receipt deduction cap (above 0, up to 100000)
    #[arg(long = "k-receipt")]
    k_receipt: Option<Decimal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(amount) = args.personal.filter(|a| !personal_cap_in_range(*a)) {
        bail!("--personal must be between 10000 and 100000, got {amount}");
    }
    if let Some(amount) = args.k_receipt.filter(|a| !k_receipt_cap_in_range(*a)) {
        bail!("--k-receipt must be above 0 and at most 100000, got {amount}");
    }

    let url = connection_url(&args.database);
    let repo = SqliteRepository::new(&url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", url))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    if let Some(amount) = args.personal {
        repo.update_personal_deduction(amount)
            .await
            .context("Failed to update personal deduction")?;
        println!("Personal deduction set to {amount}.");
    }

    if let Some(amount) = args.k_receipt {
        repo.update_k_receipt_deduction(amount)
            .await
            .context("Failed to update k-receipt deduction")?;
        println!("K-receipt deduction set to {amount}.");
    }

    let config = repo
        .get_deduction_config()
        .await
        .context("Failed to read deduction settings")?;

    println!(
        "Deduction settings: personal = {}, k-receipt = {} (updated {})",
        config.personal, config.k_receipt, config.updated_at
    );

    Ok(())
}
