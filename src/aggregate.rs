use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::data::{BlockNumber, BlockSwaps, SwapRecord, PAIR_LABEL, WEI_PER_TOKEN};
use crate::read::SwapSink;

/// Consolidates swap records into one row per block. A `BTreeMap` keeps the
/// rows in ascending block order, which is the order the spreadsheet wants.
/// Single-threaded by design, one aggregator per conversion run.
#[derive(Debug, Default)]
pub(crate) struct BlockAggregator {
    blocks: BTreeMap<BlockNumber, BlockSwaps>,
}

impl BlockAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished rows, ordered by block number.
    pub fn into_rows(self) -> Vec<BlockSwaps> {
        self.blocks.into_values().collect()
    }
}

/// Absent amounts mean "nothing moved in that direction", so they count as
/// zero; everything else is rescaled from wei to whole tokens.
fn to_tokens(raw: Option<Decimal>) -> Decimal {
    raw.unwrap_or_default() / WEI_PER_TOKEN
}

impl SwapSink for BlockAggregator {
    fn use_swap(&mut self, swap: SwapRecord) {
        // First swap of a block donates the descriptive fields; amount1_in
        // has no source column and stays at its zero initialization.
        let row = self.blocks.entry(swap.block).or_insert_with(|| BlockSwaps {
            time: swap.time.clone(),
            dex: swap.dex.clone(),
            pair: PAIR_LABEL.to_string(),
            amount0_in: Decimal::ZERO,
            amount1_in: Decimal::ZERO,
            amount0_out: Decimal::ZERO,
            amount1_out: Decimal::ZERO,
            block: swap.block,
        });
        row.amount0_in += to_tokens(swap.amount0_in);
        row.amount0_out += to_tokens(swap.amount0_out);
        row.amount1_out += to_tokens(swap.amount1_out);
    }
}

/// Whole-dataset sums for the console summary.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Totals {
    pub rows: usize,
    pub amount0_in: Decimal,
    pub amount1_in: Decimal,
    pub amount0_out: Decimal,
    pub amount1_out: Decimal,
}

pub(crate) fn totals(rows: &[BlockSwaps]) -> Totals {
    let mut totals = Totals {
        rows: rows.len(),
        ..Totals::default()
    };
    for row in rows {
        totals.amount0_in += row.amount0_in;
        totals.amount1_in += row.amount1_in;
        totals.amount0_out += row.amount0_out;
        totals.amount1_out += row.amount1_out;
    }
    totals
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{totals, BlockAggregator};
    use crate::data::SwapRecord;
    use crate::read::SwapSink;

    fn swap(block: u64, amount0_in: Option<rust_decimal::Decimal>) -> SwapRecord {
        SwapRecord {
            time: format!("2024-12-29T18:47:{:02}.000Z", block % 60),
            dex: "quickswap".into(),
            block,
            amount0_in,
            amount0_out: None,
            amount1_out: None,
        }
    }

    #[test]
    fn amounts_sum_within_a_block() {
        let mut aggregator = BlockAggregator::new();
        aggregator.use_swap(swap(500, Some(dec!(1000000000000000000))));
        aggregator.use_swap(swap(500, Some(dec!(2000000000000000000))));
        let rows = aggregator.into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount0_in, dec!(3.0));
        assert_eq!(rows[0].block, 500);
    }

    #[test]
    fn absent_amounts_count_as_zero() {
        let mut aggregator = BlockAggregator::new();
        aggregator.use_swap(swap(500, None));
        let rows = aggregator.into_rows();
        assert_eq!(rows[0].amount0_in, dec!(0));
        assert_eq!(rows[0].amount0_out, dec!(0));
        assert_eq!(rows[0].amount1_out, dec!(0));
    }

    #[test]
    fn one_row_per_distinct_block_in_ascending_order() {
        let mut aggregator = BlockAggregator::new();
        for block in [72, 18, 72, 44, 18, 72] {
            aggregator.use_swap(swap(block, Some(dec!(1000000000000000000))));
        }
        let rows = aggregator.into_rows();
        assert_eq!(
            rows.iter().map(|r| r.block).collect::<Vec<_>>(),
            [18, 44, 72]
        );
    }

    #[test]
    fn descriptive_fields_come_from_the_first_swap() {
        let mut aggregator = BlockAggregator::new();
        let mut first = swap(500, None);
        first.time = "2024-12-29T18:47:10.003Z".into();
        let mut second = swap(500, None);
        second.time = "2024-12-29T18:47:11.900Z".into();
        aggregator.use_swap(first);
        aggregator.use_swap(second);
        let rows = aggregator.into_rows();
        assert_eq!(rows[0].time, "2024-12-29T18:47:10.003Z");
        assert_eq!(rows[0].dex, "quickswap");
    }

    #[test]
    fn pair_is_pinned_and_amount1_in_stays_zero() {
        let mut aggregator = BlockAggregator::new();
        aggregator.use_swap(swap(1, Some(dec!(5000000000000000000))));
        aggregator.use_swap(swap(2, Some(dec!(7000000000000000000))));
        for row in aggregator.into_rows() {
            assert_eq!(row.pair, "WPOL/WETH");
            assert_eq!(row.amount1_in, dec!(0));
        }
    }

    #[test]
    fn wei_rescaling_keeps_full_precision() {
        let mut aggregator = BlockAggregator::new();
        aggregator.use_swap(swap(9, Some(dec!(448469519389397092))));
        let rows = aggregator.into_rows();
        assert_eq!(rows[0].amount0_in, dec!(0.448469519389397092));
    }

    #[test]
    fn csv_export_aggregates_end_to_end() {
        let export = b"\
2024-12-29T18:46:58.520Z, quickswap, blockNumber, amount0In,           amount0Out,         amount1Out
2024-12-29T18:47:10.003Z, quickswap, 66123001,   1000000000000000000, ,                   250000000000000000
2024-12-29T18:47:10.507Z, quickswap, 66123001,   2000000000000000000, ,
2024-12-29T18:47:12.440Z, quickswap, 66123002,   ,                    500000000000000000,
";
        let mut aggregator = BlockAggregator::new();
        crate::read::read_swaps(&export[..], &mut aggregator).unwrap();
        let rows = aggregator.into_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].block, 66123001);
        assert_eq!(rows[0].time, "2024-12-29T18:47:10.003Z");
        assert_eq!(rows[0].amount0_in, dec!(3.0));
        assert_eq!(rows[0].amount1_out, dec!(0.25));
        assert_eq!(rows[1].block, 66123002);
        assert_eq!(rows[1].amount0_out, dec!(0.5));
    }

    #[test]
    fn totals_sum_across_rows() {
        let mut aggregator = BlockAggregator::new();
        aggregator.use_swap(swap(1, Some(dec!(1500000000000000000))));
        aggregator.use_swap(swap(2, Some(dec!(2500000000000000000))));
        let rows = aggregator.into_rows();
        let totals = totals(&rows);
        assert_eq!(totals.rows, 2);
        assert_eq!(totals.amount0_in, dec!(4.0));
        assert_eq!(totals.amount1_in, dec!(0));
    }
}
