//! Adjustment-window estimation.
//!
//! Pure arithmetic over the captured chain facts. The current block height
//! is inferred from elapsed wall-clock time at the fixed 12 s cadence rather
//! than queried live — an accepted approximation; the rapid-fire loop is the
//! backstop against its drift.

use tracing::warn;

use regsnipe_core::constants::BLOCK_PERIOD_MS;
use regsnipe_core::types::{AdjustmentWindow, ChainFacts};

/// Derive the adjustment window from the facts.
///
/// Deterministic and side-effect free (aside from a clock-skew warning when
/// the local clock reads earlier than the chain timestamp, which is clamped
/// to zero elapsed rather than treated as an error).
pub fn estimate_window(facts: &ChainFacts) -> AdjustmentWindow {
    let elapsed = facts.now_timestamp - facts.last_adjustment_timestamp;
    let elapsed_ms = if elapsed < 0 {
        warn!(
            skew_ms = -elapsed,
            "local clock reads before the last adjustment — clamping elapsed to zero"
        );
        0u64
    } else {
        elapsed as u64
    };

    let gap_blocks = elapsed_ms.div_ceil(BLOCK_PERIOD_MS);
    let sync_delay_millis = BLOCK_PERIOD_MS - (elapsed_ms % BLOCK_PERIOD_MS);
    let next_adjustment_block =
        facts.last_adjustment_block + facts.adjustment_interval_blocks as u64;

    AdjustmentWindow {
        next_adjustment_block,
        estimated_current_block: facts.last_adjustment_block + gap_blocks,
        blocks_until_trigger: next_adjustment_block as i64 - gap_blocks as i64,
        sync_delay_millis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(last_block: u64, interval: u32, last_ts: i64, now: i64) -> ChainFacts {
        ChainFacts {
            last_adjustment_block: last_block,
            last_adjustment_timestamp: last_ts,
            adjustment_interval_blocks: interval,
            now_timestamp: now,
        }
    }

    #[test]
    fn five_seconds_into_a_block() {
        // last adjustment at block 1000, 5 s ago, interval 360.
        let w = estimate_window(&facts(1000, 360, 1_000_000, 1_005_000));
        assert_eq!(w.estimated_current_block, 1001);
        assert_eq!(w.sync_delay_millis, 7_000);
        assert_eq!(w.next_adjustment_block, 1360);
        assert_eq!(w.blocks_until_trigger, 1359);
    }

    #[test]
    fn next_block_is_last_plus_interval() {
        for (b, i) in [(0u64, 1u32), (1000, 360), (4_200_000, 99)] {
            let w = estimate_window(&facts(b, i, 0, 1));
            assert_eq!(w.next_adjustment_block, b + i as u64);
        }
    }

    #[test]
    fn sync_delay_stays_in_half_open_period() {
        for elapsed in [0i64, 1, 5_000, 11_999, 12_000, 12_001, 24_000, 100_000] {
            let w = estimate_window(&facts(10, 5, 0, elapsed));
            assert!(
                w.sync_delay_millis > 0 && w.sync_delay_millis <= 12_000,
                "elapsed {elapsed} gave delay {}",
                w.sync_delay_millis
            );
        }
        // Exactly on a boundary the full period remains.
        assert_eq!(estimate_window(&facts(10, 5, 0, 0)).sync_delay_millis, 12_000);
        assert_eq!(
            estimate_window(&facts(10, 5, 0, 24_000)).sync_delay_millis,
            12_000
        );
    }

    #[test]
    fn gap_blocks_round_up() {
        assert_eq!(estimate_window(&facts(100, 5, 0, 1)).estimated_current_block, 101);
        assert_eq!(
            estimate_window(&facts(100, 5, 0, 12_000)).estimated_current_block,
            101
        );
        assert_eq!(
            estimate_window(&facts(100, 5, 0, 12_001)).estimated_current_block,
            102
        );
        assert_eq!(estimate_window(&facts(100, 5, 0, 0)).estimated_current_block, 100);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let f = facts(1000, 360, 1_000_000, 1_005_000);
        assert_eq!(estimate_window(&f), estimate_window(&f));
    }

    #[test]
    fn negative_elapsed_clamps_to_zero() {
        let skewed = estimate_window(&facts(1000, 360, 1_000_000, 999_000));
        let zero = estimate_window(&facts(1000, 360, 1_000_000, 1_000_000));
        assert_eq!(skewed, zero);
        assert_eq!(skewed.estimated_current_block, 1000);
        assert_eq!(skewed.sync_delay_millis, 12_000);
    }
}
