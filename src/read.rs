use std::fs::File;
use std::io;
use std::path::Path;

use crate::data::{SwapError, SwapRecord, REQUIRED_COLUMNS};

/// Trait for doing something with a `SwapRecord` read from the CSV export.
/// The per-block aggregator is the real consumer; tests plug in a mock sink
/// to check what a CSV stream parses into.
pub(crate) trait SwapSink {
    fn use_swap(&mut self, swap: SwapRecord);
}

/// Opens the export at `path` and streams its records into `sink`.
pub(crate) fn read_swaps_file<S: SwapSink>(path: &Path, sink: &mut S) -> Result<(), SwapError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SwapError::NotFound { path: path.into() },
        _ => SwapError::Io {
            path: path.into(),
            source,
        },
    })?;
    read_swaps(file, sink)
}

/// CSV importer for `SwapRecord`s. The header is checked up front so a
/// mangled export fails with the name of the missing column instead of a
/// deserialization error on row one.
pub(crate) fn read_swaps<R: io::Read, S: SwapSink>(
    reader: R,
    sink: &mut S,
) -> Result<(), SwapError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(SwapError::Header)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SwapError::MissingColumn(column));
        }
    }
    for (i, result) in rdr.deserialize().enumerate() {
        // Row 1 is the header, so data rows start at 2.
        let swap: SwapRecord = result.map_err(|source| SwapError::Row {
            row: i + 2,
            source,
        })?;
        sink.use_swap(swap);
    }
    Ok(())
}
