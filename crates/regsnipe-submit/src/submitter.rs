//! Registration submitter.
//!
//! Invoked on every rapid-fire tick while the scheduler is armed. The
//! [`SubmitGuard`] serializes attempts; each attempt re-reads the burn cost
//! and balance (both drift), signs, submits with a priority tip and an
//! auto-resolved nonce, and watches the status stream until it resolves.
//!
//! Error policy: insufficient balance and dispatch failures are terminal —
//! a verdict is sent and the guard stays held so nothing races the
//! shutdown. Transport failures are transient: the guard is released and
//! the next tick is the retry.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use regsnipe_chain::op::{sign_operation, RegisterCall};
use regsnipe_chain::rpc::ChainRpc;
use regsnipe_chain::status::{DispatchFailure, TxStatus};
use regsnipe_core::constants::{FEE_BUFFER_RAO, RAO_PER_TAO, TIP_RAO};
use regsnipe_core::types::{BlockHash, BlockHeight, NetUid};
use regsnipe_core::{RunOutcome, SnipeError};
use regsnipe_keys::ColdKey;

use crate::guard::SubmitGuard;

pub struct Submitter<C> {
    rpc: Arc<C>,
    netuid: NetUid,
    hotkey: String,
    coldkey: Arc<ColdKey>,
    guard: SubmitGuard,
    verdict_tx: mpsc::Sender<RunOutcome>,
    started: Instant,
}

impl<C: ChainRpc + 'static> Submitter<C> {
    pub fn new(
        rpc: Arc<C>,
        netuid: NetUid,
        hotkey: String,
        coldkey: Arc<ColdKey>,
        verdict_tx: mpsc::Sender<RunOutcome>,
        started: Instant,
    ) -> Self {
        Self {
            rpc,
            netuid,
            hotkey,
            coldkey,
            guard: SubmitGuard::new(),
            verdict_tx,
            started,
        }
    }

    pub fn guard(&self) -> &SubmitGuard {
        &self.guard
    }

    /// One rapid-fire tick. No-op while an attempt is already in flight.
    pub fn spawn_attempt(self: &Arc<Self>) {
        if !self.guard.try_acquire() {
            debug!("registration already in progress — tick dropped");
            return;
        }
        let this = Arc::clone(self);
        tokio::spawn(async move {
            match this.attempt().await {
                // Terminal: deliver the verdict with the guard still held so
                // no tick that fires before shutdown can submit again.
                Ok(outcome) => {
                    let _ = this.verdict_tx.send(outcome).await;
                }
                // Transient: the next 100 ms tick is the retry.
                Err(e) => {
                    warn!(
                        elapsed_secs = this.elapsed_secs(),
                        error = %e,
                        "submission attempt failed — next tick will retry"
                    );
                    this.guard.release();
                }
            }
        });
    }

    /// Run one attempt to a terminal outcome (`Ok`) or a transient failure
    /// (`Err`).
    async fn attempt(&self) -> Result<RunOutcome, SnipeError> {
        let burn = self
            .rpc
            .burn_cost(self.netuid)
            .await
            .map_err(transient)?;
        info!(
            netuid = self.netuid,
            cost_tao = burn as f64 / RAO_PER_TAO as f64,
            coldkey = self.coldkey.address(),
            "current registration cost"
        );

        let have = self
            .rpc
            .account_balance(self.coldkey.address())
            .await
            .map_err(transient)?;
        let need = burn + FEE_BUFFER_RAO;
        if have < need {
            // Fatal: retrying cannot help until the balance changes externally.
            return Ok(RunOutcome::Failed {
                error: SnipeError::InsufficientBalance { need, have },
            });
        }

        let call = if self.rpc.supports_recycle() {
            RegisterCall::RecycleRegister {
                netuid: self.netuid,
                hotkey: self.hotkey.clone(),
            }
        } else {
            RegisterCall::BurnedRegister {
                netuid: self.netuid,
                hotkey: self.hotkey.clone(),
            }
        };
        let op = sign_operation(&self.coldkey, call, TIP_RAO);

        info!(elapsed_secs = self.elapsed_secs(), "submitting registration");
        let mut stream = self.rpc.submit_and_watch(&op).await?;

        while let Some(ev) = stream.recv().await {
            debug!(status = ?ev.status, elapsed_secs = self.elapsed_secs(), "status");

            if let Some(failure) = ev.failure {
                return Ok(RunOutcome::Failed {
                    error: self.classify(failure),
                });
            }

            match ev.status {
                TxStatus::InBlock { hash } => {
                    // Provisional: the stream can still resolve to failure
                    // under equivocation, so keep the guard and keep watching.
                    match self.resolve_block(&hash).await {
                        Some(block) => info!(
                            block,
                            elapsed_secs = self.elapsed_secs(),
                            "registration included in block"
                        ),
                        None => info!(
                            elapsed_secs = self.elapsed_secs(),
                            "registration included in block (number unresolved)"
                        ),
                    }
                }
                TxStatus::Finalized { hash } => {
                    let block = self.resolve_block(&hash).await;
                    info!(
                        block = block.unwrap_or_default(),
                        elapsed_secs = self.elapsed_secs(),
                        "registration finalized"
                    );
                    return Ok(RunOutcome::Registered { block });
                }
                TxStatus::Dropped | TxStatus::Invalid => {
                    return Err(SnipeError::Submission(format!(
                        "operation rejected by the pool: {:?}",
                        ev.status
                    )));
                }
                TxStatus::Validated | TxStatus::Broadcast => {}
            }
        }

        Err(SnipeError::Submission(
            "status stream ended before a terminal status".into(),
        ))
    }

    fn classify(&self, failure: DispatchFailure) -> SnipeError {
        match failure {
            DispatchFailure::Module { index, error } => {
                match self.rpc.decode_module_error(index, error) {
                    Some((section, name)) => SnipeError::DispatchFailed { section, name },
                    // No metadata: report the raw indices instead of failing
                    // the classification itself.
                    None => SnipeError::DispatchFailed {
                        section: format!("pallet {index}"),
                        name: format!("error {error}"),
                    },
                }
            }
            DispatchFailure::Other(raw) => SnipeError::DispatchFailed {
                section: "dispatch".into(),
                name: raw,
            },
        }
    }

    /// Best-effort hash → height resolution; failure degrades the report,
    /// never the outcome.
    async fn resolve_block(&self, hash: &BlockHash) -> Option<BlockHeight> {
        match self.rpc.block_number(hash).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(hash = %hash, error = %e, "could not resolve block number");
                None
            }
        }
    }

    fn elapsed_secs(&self) -> f64 {
        (self.started.elapsed().as_secs_f64() * 100.0).round() / 100.0
    }
}

fn transient(e: SnipeError) -> SnipeError {
    SnipeError::Submission(e.to_string())
}
