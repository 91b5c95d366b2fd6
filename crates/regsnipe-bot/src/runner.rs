//! Async driver for the scheduler.
//!
//! Owns the three timers — the one-shot sync delay, the repeating 12 s
//! block-advance timer, and the 100 ms rapid-fire timer — and feeds their
//! firings into the [`TriggerScheduler`]. Each timer is dropped on the
//! transition that supersedes it. Returns a [`RunOutcome`] instead of
//! exiting so the whole pipeline runs under a test runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use regsnipe_chain::rpc::ChainRpc;
use regsnipe_core::constants::{BLOCK_PERIOD_MS, RAPID_FIRE_PERIOD_MS};
use regsnipe_core::types::AdjustmentWindow;
use regsnipe_core::{RunOutcome, SnipeError};
use regsnipe_sched::{Evaluation, TriggerScheduler};
use regsnipe_submit::Submitter;

pub struct RunConfig {
    pub block_period: Duration,
    pub rapid_period: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            block_period: Duration::from_millis(BLOCK_PERIOD_MS),
            rapid_period: Duration::from_millis(RAPID_FIRE_PERIOD_MS),
        }
    }
}

pub async fn run<C: ChainRpc + 'static>(
    submitter: Arc<Submitter<C>>,
    mut verdict_rx: mpsc::Receiver<RunOutcome>,
    window: AdjustmentWindow,
    cfg: RunConfig,
) -> RunOutcome {
    let mut sched = TriggerScheduler::new(&window);

    info!(
        wait_ms = window.sync_delay_millis,
        "waiting to synchronise with the block boundary"
    );
    tokio::time::sleep(sched.start_waiting()).await;
    info!("sync complete — monitoring estimated block height");

    let mut blocks = tokio::time::interval(cfg.block_period);
    blocks.tick().await; // the first tick completes immediately

    let mut eval = sched.begin_monitoring();
    while let Evaluation::Hold {
        estimated_block,
        blocks_remaining,
        projected_wait,
    } = eval
    {
        info!(
            estimated_block,
            blocks_until_trigger = blocks_remaining - 1,
            remaining = %format_remaining(projected_wait),
            "waiting for adjustment window"
        );
        blocks.tick().await;
        eval = sched.on_block_tick();
    }
    drop(blocks); // block-advance timer is superseded

    if let Evaluation::Arm { estimated_block } = eval {
        info!(
            estimated_block,
            trigger_block = sched.trigger_block(),
            period_ms = cfg.rapid_period.as_millis() as u64,
            "trigger block reached — starting rapid-fire submission"
        );
    }

    let mut rapid = tokio::time::interval(cfg.rapid_period);
    let outcome = loop {
        tokio::select! {
            _ = rapid.tick() => submitter.spawn_attempt(),
            verdict = verdict_rx.recv() => {
                break verdict.unwrap_or_else(|| RunOutcome::Failed {
                    error: SnipeError::Submission("verdict channel closed".into()),
                });
            }
        }
    };
    sched.terminate();
    outcome
}

fn format_remaining(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
