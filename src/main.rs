use std::fmt::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use aggregate::{totals, BlockAggregator};
use balance::last_balance_diff;
use data::{BalanceError, BlockSwaps};
use read::read_swaps_file;
use write::write_swaps;

mod aggregate;
mod balance;
mod data;
mod read;
mod write;

/// Reporting helpers for the MATIC arbitrage bot.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the difference between the last two balances in the wallet log
    BalanceDiff {
        /// Balance log path
        #[arg(default_value = "logs/MATIC.log")]
        log: PathBuf,
    },
    /// Consolidate a swap-activity CSV export into a per-block spreadsheet
    Swaps {
        /// Swap export path
        #[arg(default_value = "SWAP_ACTIVITY.csv")]
        input: PathBuf,
        /// Workbook to write
        #[arg(short, long, default_value = "formatted_swaps.xlsx")]
        output: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::BalanceDiff { log } => balance_diff(&log),
        Commands::Swaps { input, output } => swaps(&input, &output)?,
    }
    Ok(())
}

/// Fail-soft by contract: this runs from cron alongside the bot, and a
/// missing or truncated log must not kill the run. A log with fewer than two
/// entries is the quiet steady state right after rotation, so it prints
/// nothing at all.
fn balance_diff(log: &Path) {
    match last_balance_diff(log) {
        Ok(diff) => println!("Balance difference: {diff:.18} MATIC"),
        Err(BalanceError::TooShort { .. }) => {}
        Err(e) => log::error!("{e}"),
    }
}

fn swaps(input: &Path, output: &Path) -> Result<(), anyhow::Error> {
    let mut aggregator = BlockAggregator::new();
    read_swaps_file(input, &mut aggregator)?;
    let rows = aggregator.into_rows();
    write_swaps(output, &rows)?;

    println!("Conversion complete. New file saved as '{}'", output.display());
    println!("\nSample of converted data:");
    print!("{}", preview(&rows, PREVIEW_ROWS));
    let totals = totals(&rows);
    println!("\nDataset Summary:");
    println!("Total rows: {}", totals.rows);
    println!("Total WPOL in: {:.6}", totals.amount0_in);
    println!("Total WPOL out: {:.6}", totals.amount0_out);
    println!("Total WETH in: {:.6}", totals.amount1_in);
    println!("Total WETH out: {:.6}", totals.amount1_out);
    Ok(())
}

const PREVIEW_ROWS: usize = 5;

/// Plain-text sample of the first `limit` rows, one line per row under a
/// header line, columns in spreadsheet order.
fn preview(rows: &[BlockSwaps], limit: usize) -> String {
    let mut out = String::new();
    let [time, dex, pair, a0_in, a1_in, a0_out, a1_out, block] = BlockSwaps::COLUMNS;
    let _ = writeln!(
        out,
        "{time:<26} {dex:<12} {pair:<10} {a0_in:>14} {a1_in:>14} {a0_out:>14} {a1_out:>14} {block:>10}"
    );
    for row in rows.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:<26} {:<12} {:<10} {:>14.6} {:>14.6} {:>14.6} {:>14.6} {:>10}",
            row.time,
            row.dex,
            row.pair,
            row.amount0_in,
            row.amount1_in,
            row.amount0_out,
            row.amount1_out,
            row.block,
        );
    }
    out
}
