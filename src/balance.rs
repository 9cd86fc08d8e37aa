use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rust_decimal::Decimal;

use crate::data::BalanceError;

/// Position of the balance within a log line's whitespace-separated tokens.
/// The wallet monitor writes `<date> <time> <balance> ...` per snapshot.
const BALANCE_TOKEN_INDEX: usize = 2;

/// Difference between the last two balances recorded in the log at `path`
/// (most recent minus the one before it).
pub(crate) fn last_balance_diff(path: impl AsRef<Path>) -> Result<Decimal, BalanceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => BalanceError::NotFound { path: path.into() },
        _ => BalanceError::Io(e),
    })?;
    diff_from_lines(BufReader::new(file))
}

/// Core of `last_balance_diff`, split out so tests can feed it byte slices.
pub(crate) fn diff_from_lines<R: BufRead>(reader: R) -> Result<Decimal, BalanceError> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    if lines.len() < 2 {
        return Err(BalanceError::TooShort { lines: lines.len() });
    }
    let previous = parse_balance(&lines[lines.len() - 2], lines.len() - 1)?;
    let last = parse_balance(&lines[lines.len() - 1], lines.len())?;
    Ok(last - previous)
}

fn parse_balance(line: &str, line_no: usize) -> Result<Decimal, BalanceError> {
    let token = line
        .split_whitespace()
        .nth(BALANCE_TOKEN_INDEX)
        .ok_or(BalanceError::MissingBalance { line: line_no })?;
    // The monitor normally writes plain decimals but has been seen emitting
    // scientific notation for dust-sized balances.
    token
        .parse()
        .or_else(|_| Decimal::from_scientific(token))
        .map_err(|_| BalanceError::Malformed {
            line: line_no,
            token: token.to_string(),
        })
}
