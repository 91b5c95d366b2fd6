//! The `ChainRpc` collaborator boundary and its WebSocket implementation.
//!
//! Every remote capability the bot consumes goes through this trait, which
//! keeps the estimation and submission cores testable against in-memory
//! fakes. `WsChain` is the production implementation over a single shared
//! jsonrpsee WebSocket connection — opened once at boot, never reopened.

use async_trait::async_trait;
use jsonrpsee::core::client::{ClientT, Subscription, SubscriptionClientT};
use jsonrpsee::rpc_params;
use jsonrpsee::ws_client::{WsClient, WsClientBuilder};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::warn;

use regsnipe_core::types::{Balance, BlockHash, BlockHeight, NetUid, UnixMillis};
use regsnipe_core::SnipeError;

use crate::op::SignedOperation;
use crate::status::{ErrorIndex, PalletErrors, StatusEvent, WatchEvent};

// ── Trait ────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn last_adjustment_block(&self, netuid: NetUid) -> Result<BlockHeight, SnipeError>;
    async fn block_hash(&self, height: BlockHeight) -> Result<BlockHash, SnipeError>;
    async fn timestamp_at(&self, hash: &BlockHash) -> Result<UnixMillis, SnipeError>;
    async fn adjustment_interval(&self, netuid: NetUid) -> Result<u32, SnipeError>;
    async fn burn_cost(&self, netuid: NetUid) -> Result<Balance, SnipeError>;
    async fn account_balance(&self, address: &str) -> Result<Balance, SnipeError>;

    /// Whether the node supports the recycle form of registration.
    fn supports_recycle(&self) -> bool;

    /// Submit a signed operation and stream its lifecycle. The subscription
    /// is torn down when the returned receiver is dropped.
    async fn submit_and_watch(
        &self,
        op: &SignedOperation,
    ) -> Result<mpsc::Receiver<StatusEvent>, SnipeError>;

    /// Resolve a block hash to its height. Best-effort: callers degrade to a
    /// hash-only report when this fails.
    async fn block_number(&self, hash: &BlockHash) -> Result<BlockHeight, SnipeError>;

    /// Look up a structured dispatch error's human-readable (section, name).
    fn decode_module_error(&self, index: u8, error: u8) -> Option<(String, String)>;
}

// ── WebSocket implementation ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeCapabilities {
    recycle_register: bool,
}

pub struct WsChain {
    client: WsClient,
    caps: NodeCapabilities,
    error_index: ErrorIndex,
}

impl WsChain {
    /// Connect to a `ws://` / `wss://` endpoint and prefetch the node's
    /// capabilities and error metadata. A dead endpoint is fatal here; a
    /// missing metadata surface only degrades error decoding.
    pub async fn connect(url: &str) -> Result<Self, SnipeError> {
        let client = WsClientBuilder::default()
            .build(url)
            .await
            .map_err(|e| SnipeError::RemoteRead(format!("connecting to {url}: {e}")))?;

        let caps: NodeCapabilities = match client
            .request("system_capabilities", rpc_params![])
            .await
        {
            Ok(caps) => caps,
            Err(e) => {
                warn!(error = %e, "capability query failed — assuming burn-only registration");
                NodeCapabilities::default()
            }
        };

        let error_index = match client
            .request::<Vec<PalletErrors>, _>("system_errorIndex", rpc_params![])
            .await
        {
            Ok(pallets) => ErrorIndex::from_pallets(pallets),
            Err(e) => {
                warn!(error = %e, "error metadata unavailable — dispatch errors will be raw");
                ErrorIndex::default()
            }
        };

        Ok(Self {
            client,
            caps,
            error_index,
        })
    }

    async fn request<R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: impl jsonrpsee::core::traits::ToRpcParams + Send,
    ) -> Result<R, SnipeError> {
        self.client
            .request(method, params)
            .await
            .map_err(|e| SnipeError::RemoteRead(format!("{method}: {e}")))
    }

    fn parse_balance(method: &str, raw: &str) -> Result<Balance, SnipeError> {
        raw.parse()
            .map_err(|e| SnipeError::RemoteRead(format!("{method}: bad balance {raw:?}: {e}")))
    }
}

#[async_trait]
impl ChainRpc for WsChain {
    async fn last_adjustment_block(&self, netuid: NetUid) -> Result<BlockHeight, SnipeError> {
        self.request("subnet_lastAdjustmentBlock", rpc_params![netuid])
            .await
    }

    async fn block_hash(&self, height: BlockHeight) -> Result<BlockHash, SnipeError> {
        let raw: Option<String> = self
            .request("chain_getBlockHash", rpc_params![height])
            .await?;
        let raw = raw
            .ok_or_else(|| SnipeError::RemoteRead(format!("no hash for block {height}")))?;
        BlockHash::from_hex(&raw)
            .map_err(|e| SnipeError::RemoteRead(format!("bad block hash {raw:?}: {e}")))
    }

    async fn timestamp_at(&self, hash: &BlockHash) -> Result<UnixMillis, SnipeError> {
        self.request("chain_timestampAt", rpc_params![hash.to_hex()])
            .await
    }

    async fn adjustment_interval(&self, netuid: NetUid) -> Result<u32, SnipeError> {
        self.request("subnet_adjustmentInterval", rpc_params![netuid])
            .await
    }

    async fn burn_cost(&self, netuid: NetUid) -> Result<Balance, SnipeError> {
        // Balances travel as decimal strings; u128 doesn't survive JSON.
        let raw: String = self.request("subnet_burnCost", rpc_params![netuid]).await?;
        Self::parse_balance("subnet_burnCost", &raw)
    }

    async fn account_balance(&self, address: &str) -> Result<Balance, SnipeError> {
        let raw: String = self
            .request("system_accountBalance", rpc_params![address])
            .await?;
        Self::parse_balance("system_accountBalance", &raw)
    }

    fn supports_recycle(&self) -> bool {
        self.caps.recycle_register
    }

    async fn submit_and_watch(
        &self,
        op: &SignedOperation,
    ) -> Result<mpsc::Receiver<StatusEvent>, SnipeError> {
        let mut sub: Subscription<WatchEvent> = self
            .client
            .subscribe(
                "author_submitAndWatchOperation",
                rpc_params![op],
                "author_unwatchOperation",
            )
            .await
            .map_err(|e| SnipeError::Submission(format!("submit: {e}")))?;

        let (tx, rx) = mpsc::channel(16);
        // Dropping the receiver ends this task; dropping the subscription
        // sends the unsubscribe.
        tokio::spawn(async move {
            while let Some(item) = sub.next().await {
                let ev = match item {
                    Ok(ev) => ev,
                    Err(e) => {
                        warn!(error = %e, "status subscription error");
                        break;
                    }
                };
                let Some(decoded) = StatusEvent::from_wire(ev) else {
                    continue;
                };
                if tx.send(decoded).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }

    async fn block_number(&self, hash: &BlockHash) -> Result<BlockHeight, SnipeError> {
        self.request("chain_blockNumber", rpc_params![hash.to_hex()])
            .await
    }

    fn decode_module_error(&self, index: u8, error: u8) -> Option<(String, String)> {
        self.error_index.decode(index, error)
    }
}
