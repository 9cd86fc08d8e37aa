use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::data::{BlockSwaps, SwapError};

/// Workbook exporter for consolidated swap rows: one header row, one row per
/// block, no index column.
pub(crate) fn write_swaps(path: &Path, rows: &[BlockSwaps]) -> Result<(), SwapError> {
    let mut workbook = build_workbook(rows)?;
    workbook.save(path)?;
    Ok(())
}

pub(crate) fn build_workbook(rows: &[BlockSwaps]) -> Result<Workbook, SwapError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, name) in BlockSwaps::COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (i, row) in rows.iter().enumerate() {
        write_row(worksheet, (i + 1) as u32, row)?;
    }
    Ok(workbook)
}

fn write_row(worksheet: &mut Worksheet, r: u32, row: &BlockSwaps) -> Result<(), SwapError> {
    worksheet.write_string(r, 0, &row.time)?;
    worksheet.write_string(r, 1, &row.dex)?;
    worksheet.write_string(r, 2, &row.pair)?;
    worksheet.write_number(r, 3, cell_number(row.amount0_in))?;
    worksheet.write_number(r, 4, cell_number(row.amount1_in))?;
    worksheet.write_number(r, 5, cell_number(row.amount0_out))?;
    worksheet.write_number(r, 6, cell_number(row.amount1_out))?;
    worksheet.write_number(r, 7, row.block as f64)?;
    Ok(())
}

// Spreadsheet cells are f64, so 18-decimal amounts lose their tail here the
// same way the pandas export did.
fn cell_number(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}
