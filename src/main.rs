//! Schapkaart CLI
//!
//! Prints a comparison table for a YAML catalog of tracked products, or
//! prices a single bonus mechanism against a shelf price.
//!
//! Use `-c` to render the comparison table for a catalog file
//! Use `-m` together with `-p` to price one mechanism

use std::{io, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use schapkaart::{catalog::Catalog, mechanisms::calculate_bonus_deal, report::write_comparison};

/// Arguments for the comparison report
#[derive(Debug, Parser)]
struct Args {
    /// Path to a YAML catalog of tracked products
    #[clap(short, long)]
    catalog: Option<PathBuf>,

    /// Bonus mechanism to price (requires --price)
    #[clap(short, long)]
    mechanism: Option<String>,

    /// Shelf price to price --mechanism against
    #[clap(short, long)]
    price: Option<f64>,
}

#[expect(clippy::print_stdout, reason = "CLI output")]
fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = args.catalog.as_deref() {
        let catalog = Catalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?;

        let stdout = io::stdout();
        write_comparison(stdout.lock(), &catalog)?;

        return Ok(());
    }

    let (Some(mechanism), Some(price)) = (args.mechanism.as_deref(), args.price) else {
        bail!("supply --catalog, or --mechanism together with --price");
    };

    let Some(deal) = calculate_bonus_deal(mechanism, price) else {
        bail!("unrecognised bonus mechanism: {mechanism:?}");
    };

    println!(
        "{mechanism} at {price:.2}: {} for {:.2} ({:.4} each, {:.1}% off)",
        deal.quantity, deal.total_price, deal.unit_price, deal.savings_percent
    );

    Ok(())
}
