//! Startup chain-facts reader.

use chrono::Utc;

use regsnipe_core::types::{ChainFacts, NetUid};
use regsnipe_core::SnipeError;

use crate::rpc::ChainRpc;

/// Capture the facts the estimator needs, in four reads: last adjustment
/// block, its hash, its timestamp, and the adjustment interval.
///
/// Failures here are fatal — an unreachable endpoint at boot is not worth
/// retrying. The burn cost is deliberately not read here; it drifts and is
/// re-read on every submission attempt.
pub async fn read_chain_facts<C: ChainRpc + ?Sized>(
    rpc: &C,
    netuid: NetUid,
) -> Result<ChainFacts, SnipeError> {
    let last_adjustment_block = rpc.last_adjustment_block(netuid).await?;
    let hash = rpc.block_hash(last_adjustment_block).await?;
    let last_adjustment_timestamp = rpc.timestamp_at(&hash).await?;
    let adjustment_interval_blocks = rpc.adjustment_interval(netuid).await?;

    if adjustment_interval_blocks == 0 {
        return Err(SnipeError::RemoteRead(format!(
            "subnet {netuid} reports a zero adjustment interval"
        )));
    }

    Ok(ChainFacts {
        last_adjustment_block,
        last_adjustment_timestamp,
        adjustment_interval_blocks,
        now_timestamp: Utc::now().timestamp_millis(),
    })
}
