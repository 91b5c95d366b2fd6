//! Scriptable in-memory `ChainRpc` for tests.
//!
//! Lets a test pin the chain facts, the economics, and the status events
//! each submission attempt will observe, and records every submission so
//! single-flight behavior can be asserted.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use regsnipe_core::types::{Balance, BlockHash, BlockHeight, NetUid, UnixMillis};
use regsnipe_core::SnipeError;

use crate::op::SignedOperation;
use crate::rpc::ChainRpc;
use crate::status::{ErrorIndex, PalletErrors, StatusEvent};

pub struct ScriptedChain {
    // Startup facts.
    pub last_adjustment_block: BlockHeight,
    pub last_adjustment_timestamp: UnixMillis,
    pub adjustment_interval: u32,
    // Economics, re-read every attempt.
    pub burn_cost: Balance,
    pub balance: Balance,
    pub recycle: bool,
    /// Status events for each successive submission; a submission beyond the
    /// script gets an empty stream.
    pub scripts: Mutex<VecDeque<Vec<StatusEvent>>>,
    /// Delay before the scripted events are delivered, to hold the in-flight
    /// window open.
    pub submit_delay: Duration,
    /// When set, `submit_and_watch` fails with this transport error.
    pub submit_error: Option<String>,
    /// Height reported by `block_number`; `None` makes resolution fail.
    pub resolved_height: Option<BlockHeight>,
    pub error_index: ErrorIndex,
    pub submissions: AtomicUsize,
    pub submitted_ops: Mutex<Vec<SignedOperation>>,
}

impl Default for ScriptedChain {
    fn default() -> Self {
        Self {
            last_adjustment_block: 1000,
            last_adjustment_timestamp: 1_700_000_000_000,
            adjustment_interval: 360,
            burn_cost: 500_000_000,
            balance: 2_000_000_000,
            recycle: true,
            scripts: Mutex::new(VecDeque::new()),
            submit_delay: Duration::ZERO,
            submit_error: None,
            resolved_height: Some(1360),
            error_index: ErrorIndex::default(),
            submissions: AtomicUsize::new(0),
            submitted_ops: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedChain {
    pub fn with_scripts(scripts: Vec<Vec<StatusEvent>>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            ..Self::default()
        }
    }

    pub fn with_errors(mut self, pallets: Vec<PalletErrors>) -> Self {
        self.error_index = ErrorIndex::from_pallets(pallets);
        self
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainRpc for ScriptedChain {
    async fn last_adjustment_block(&self, _: NetUid) -> Result<BlockHeight, SnipeError> {
        Ok(self.last_adjustment_block)
    }

    async fn block_hash(&self, _: BlockHeight) -> Result<BlockHash, SnipeError> {
        Ok(BlockHash([1; 32]))
    }

    async fn timestamp_at(&self, _: &BlockHash) -> Result<UnixMillis, SnipeError> {
        Ok(self.last_adjustment_timestamp)
    }

    async fn adjustment_interval(&self, _: NetUid) -> Result<u32, SnipeError> {
        Ok(self.adjustment_interval)
    }

    async fn burn_cost(&self, _: NetUid) -> Result<Balance, SnipeError> {
        Ok(self.burn_cost)
    }

    async fn account_balance(&self, _: &str) -> Result<Balance, SnipeError> {
        Ok(self.balance)
    }

    fn supports_recycle(&self) -> bool {
        self.recycle
    }

    async fn submit_and_watch(
        &self,
        op: &SignedOperation,
    ) -> Result<mpsc::Receiver<StatusEvent>, SnipeError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.submitted_ops.lock().unwrap().push(op.clone());
        if let Some(msg) = &self.submit_error {
            return Err(SnipeError::Submission(msg.clone()));
        }
        let events = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        let delay = self.submit_delay;
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            for ev in events {
                if tx.send(ev).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }

    async fn block_number(&self, _: &BlockHash) -> Result<BlockHeight, SnipeError> {
        self.resolved_height
            .ok_or_else(|| SnipeError::RemoteRead("header lookup failed".into()))
    }

    fn decode_module_error(&self, index: u8, error: u8) -> Option<(String, String)> {
        self.error_index.decode(index, error)
    }
}
