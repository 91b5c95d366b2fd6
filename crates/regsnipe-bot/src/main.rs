//! regsnipe — subnet-registration sniper.
//!
//! Startup sequence:
//!   1. Validate configuration (netuid, hotkey, endpoint, MNEMONIC env var)
//!   2. Derive the cold key and open the WebSocket connection
//!   3. Capture chain facts and estimate the next adjustment window
//!   4. Sleep out the sync delay, then count estimated blocks at 12 s
//!   5. At the trigger block, fire submissions every 100 ms until one
//!      finalizes or fails terminally
//!
//! Exit code 0 only on a finalized registration.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use regsnipe_chain::{read_chain_facts, WsChain};
use regsnipe_core::constants::BLOCK_PERIOD_MS;
use regsnipe_core::RunOutcome;
use regsnipe_keys::ColdKey;
use regsnipe_sched::estimate_window;
use regsnipe_submit::Submitter;

mod config;
mod runner;

use config::{Args, BotConfig};
use runner::RunConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let started = Instant::now();
    let args = Args::parse();
    let cfg = BotConfig::from_args(args).context("validating configuration")?;
    let coldkey = Arc::new(ColdKey::from_mnemonic(&cfg.mnemonic).context("deriving cold key")?);

    info!(
        netuid = cfg.netuid,
        hotkey = %cfg.hotkey,
        coldkey = coldkey.address(),
        "regsnipe starting"
    );

    let rpc = Arc::new(
        WsChain::connect(&cfg.endpoint)
            .await
            .context("connecting to node")?,
    );

    // ── Estimate the adjustment window ────────────────────────────────────────
    let facts = read_chain_facts(rpc.as_ref(), cfg.netuid)
        .await
        .context("reading chain facts")?;
    let window = estimate_window(&facts);

    info!(
        last_adjustment_block = facts.last_adjustment_block,
        next_adjustment_block = window.next_adjustment_block,
        trigger_block = window.next_adjustment_block - 1,
        "adjustment window"
    );
    info!(
        estimated_current_block = window.estimated_current_block,
        blocks_until_trigger = window.blocks_until_trigger,
        offset_ms = BLOCK_PERIOD_MS - window.sync_delay_millis,
        sync_wait_ms = window.sync_delay_millis,
        "timing estimate"
    );

    // ── Run to a terminal outcome ─────────────────────────────────────────────
    let (verdict_tx, verdict_rx) = tokio::sync::mpsc::channel(8);
    let submitter = Arc::new(Submitter::new(
        Arc::clone(&rpc),
        cfg.netuid,
        cfg.hotkey.clone(),
        coldkey,
        verdict_tx,
        started,
    ));

    let outcome = runner::run(submitter, verdict_rx, window, RunConfig::default()).await;

    let total_elapsed_secs = started.elapsed().as_secs_f64();
    match &outcome {
        RunOutcome::Registered { block: Some(block) } => {
            info!(block, total_elapsed_secs, "registration complete");
        }
        RunOutcome::Registered { block: None } => {
            info!(total_elapsed_secs, "registration complete (block number unresolved)");
        }
        RunOutcome::Failed { error } => {
            error!(%error, total_elapsed_secs, "registration failed");
        }
    }
    std::process::exit(outcome.exit_code());
}
