use std::path::PathBuf;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use thiserror::Error;

pub type BlockNumber = u64;

/// Raw amounts come out of the export as wei-style integers (fixed-point,
/// scaled by 10^18); dividing by this yields whole-token amounts.
pub const WEI_PER_TOKEN: Decimal = dec!(1_000_000_000_000_000_000);

/// The export never records which pair it was taken from, so the pair column
/// is pinned to the one pair the bot trades.
pub const PAIR_LABEL: &str = "WPOL/WETH";

/// Columns the swap export must carry. The exporter writes the first data
/// row's timestamp and exchange name into the header row, so the first two
/// "names" are literal values rather than labels. The serde renames on
/// `SwapRecord` must stay in sync with this list.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "2024-12-29T18:46:58.520Z",
    "quickswap",
    "blockNumber",
    "amount0In",
    "amount0Out",
    "amount1Out",
];

/// One row of the swap-activity export. Amount cells are frequently empty
/// (a swap moves value in one direction only), hence the `Option`s; an
/// absent amount means zero. There is no amount1In column in the export at
/// all - see `BlockSwaps::amount1_in`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct SwapRecord {
    #[serde(rename = "2024-12-29T18:46:58.520Z")]
    pub time: String,
    #[serde(rename = "quickswap")]
    pub dex: String,
    #[serde(rename = "blockNumber")]
    pub block: BlockNumber,
    #[serde(rename = "amount0In")]
    pub amount0_in: Option<Decimal>,
    #[serde(rename = "amount0Out")]
    pub amount0_out: Option<Decimal>,
    #[serde(rename = "amount1Out")]
    pub amount1_out: Option<Decimal>,
}

/// All swaps of one block consolidated into a single spreadsheet row:
/// amounts summed (already rescaled to whole tokens), descriptive fields
/// taken from the block's first swap.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockSwaps {
    pub time: String,
    pub dex: String,
    pub pair: String,
    pub amount0_in: Decimal,
    /// No export column maps onto amount1In, so it stays zero for every
    /// block. Kept in the output anyway so the sheet carries all four
    /// directions of the pair.
    pub amount1_in: Decimal,
    pub amount0_out: Decimal,
    pub amount1_out: Decimal,
    pub block: BlockNumber,
}

impl BlockSwaps {
    /// Spreadsheet column order, left to right.
    pub const COLUMNS: [&'static str; 8] = [
        "time",
        "dex",
        "pair",
        "amount0In",
        "amount1In",
        "amount0Out",
        "amount1Out",
        "blockN",
    ];
}

/// Failures of the balance-diff reader. The original tool collapsed all of
/// these into a bare "no result"; they are kept distinct here so callers can
/// branch without re-parsing log messages.
#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("balance log {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("i/o error reading balance log: {0}")]
    Io(#[from] std::io::Error),
    #[error("balance log has {lines} line(s), need at least two")]
    TooShort { lines: usize },
    #[error("line {line}: no balance field (expected at least three tokens)")]
    MissingBalance { line: usize },
    #[error("line {line}: cannot parse balance from {token:?}")]
    Malformed { line: usize, token: String },
}

/// Failures of the swap consolidation pipeline. These all abort the run;
/// the tool is a one-shot converter and a partial spreadsheet is worse than
/// none.
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("swap export {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("i/o error reading swap export {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read the export's header row")]
    Header(#[source] csv::Error),
    #[error("swap export is missing required column {0:?}")]
    MissingColumn(&'static str),
    #[error("row {row}: unreadable swap record")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("failed to write workbook")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
