//! Cuotapartes CLI
//!
//! Command-line interface for running entity liquidations

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use cuotapartes::batch::InMemoryAccountStore;
use cuotapartes::pensioner::load_roster;
use cuotapartes::{
    BatchConfig, DuplicatePolicy, GeneratorConfig, LiquidationBatchRunner, RateConfig,
    RateRepository,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Keep existing consecutivos, overwrite totals
    Reuse,
    /// Leave existing records untouched
    Skip,
    /// Assign fresh consecutivos, keep both versions
    Supersede,
}

impl From<PolicyArg> for DuplicatePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reuse => DuplicatePolicy::Reuse,
            PolicyArg::Skip => DuplicatePolicy::Skip,
            PolicyArg::Supersede => DuplicatePolicy::Supersede,
        }
    }
}

/// Run a cuota parte liquidation for one entity
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Entity to liquidate
    #[arg(long)]
    entity: String,

    /// Liquidation cutoff date (YYYY-MM-DD)
    #[arg(long)]
    cutoff: NaiveDate,

    /// Number of months in the billing window
    #[arg(long, default_value_t = 36)]
    window_months: u32,

    /// Handling for accounts already emitted for the same period
    #[arg(long, value_enum, default_value = "skip")]
    duplicate_policy: PolicyArg,

    /// Directory containing monthly_rates.csv and annual_indices.csv
    #[arg(long, default_value = "data/rates")]
    rates_dir: PathBuf,

    /// Pensioner roster CSV
    #[arg(long, default_value = "data/roster.csv")]
    roster: PathBuf,

    /// Output CSV of emitted accounts
    #[arg(long, default_value = "liquidation_output.csv")]
    output: PathBuf,

    /// Optional JSON dump of the full batch
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Cuotapartes v{}", env!("CARGO_PKG_VERSION"));
    println!("=================\n");

    let rates = RateRepository::from_csv_path(&args.rates_dir, RateConfig::default())
        .map_err(|e| anyhow!("failed to load rate tables: {e}"))?;
    let roster =
        load_roster(&args.roster).map_err(|e| anyhow!("failed to load roster: {e}"))?;
    println!("Loaded {} pensioners", roster.len());

    let config = BatchConfig {
        cutoff: args.cutoff,
        window_months: args.window_months,
        duplicate_policy: args.duplicate_policy.into(),
    };

    let runner =
        LiquidationBatchRunner::new(rates, InMemoryAccountStore::new(), GeneratorConfig::default());
    let batch = runner.run(&roster, &args.entity, &config)?;

    println!(
        "\nLiquidation for {} ({}) as of {}",
        batch.entity.name, batch.entity.entity_id, batch.cutoff
    );
    println!(
        "{:<12} {:<24} {:>8} {:>16} {:>16} {:>16}",
        "Pensioner", "Name", "Months", "Capital", "Interest", "Total Due"
    );
    println!("{}", "-".repeat(96));
    for statement in &batch.statements {
        println!(
            "{:<12} {:<24} {:>8} {:>16.2} {:>16.2} {:>16.2}",
            statement.pensioner_id,
            statement.name,
            statement.accounts.len(),
            statement.total_capital,
            statement.total_interest,
            statement.total_due,
        );
    }

    for skipped in &batch.errors {
        println!(
            "SKIPPED {:<12} {:<24} {}",
            skipped.pensioner_id, skipped.name, skipped.reason
        );
    }

    let totals = &batch.totals;
    println!("\nSummary:");
    println!("  Pensioners: {} liquidated, {} skipped, {} settled",
        totals.pensioners_processed, totals.pensioners_skipped, totals.pensioners_settled);
    println!("  Accounts: {} with interest, {} without",
        totals.accounts_with_interest, totals.accounts_without_interest);
    println!("  Dispositions: {} new, {} reused, {} skipped, {} superseded",
        totals.emitted_new, totals.reused, totals.skipped_existing, totals.superseded);
    println!("  Total capital:  ${:.2}", totals.total_capital);
    println!("  Total interest: ${:.2}", totals.total_interest);
    println!("  Total due:      ${:.2}", totals.total_due);

    write_accounts_csv(&args.output, &batch)?;
    println!("\nEmitted accounts written to: {}", args.output.display());

    if let Some(json_path) = &args.json {
        let file = File::create(json_path)?;
        serde_json::to_writer_pretty(file, &batch)?;
        println!("Batch JSON written to: {}", json_path.display());
    }

    Ok(())
}

fn write_accounts_csv(path: &PathBuf, batch: &cuotapartes::LiquidationBatch) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(
        file,
        "Sequence,PensionerId,Period,BaseCapital,Bonus,CapitalTotal,Interest,TotalDue"
    )?;
    for statement in &batch.statements {
        for account in &statement.accounts {
            writeln!(
                file,
                "{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2}",
                account.sequence_number.unwrap_or(0),
                statement.pensioner_id,
                account.period,
                account.base_capital,
                account.bonus_amount,
                account.capital_total,
                account.accrued_interest,
                account.total_due,
            )?;
        }
    }
    Ok(())
}
