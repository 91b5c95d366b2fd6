use serde::{Deserialize, Serialize};
use std::fmt;

/// Block height on the target ledger.
pub type BlockHeight = u64;

/// Unix timestamp in milliseconds (UTC). Signed so that clock skew between
/// the local host and the chain can be detected rather than wrapping.
pub type UnixMillis = i64;

/// Balance in rao (1 TAO = 1_000_000_000 rao).
pub type Balance = u128;

/// Subnet identifier on the target ledger.
pub type NetUid = u16;

// ── BlockHash ────────────────────────────────────────────────────────────────

/// 32-byte block hash, transported as `0x`-prefixed hex on the wire.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({}…)", &self.to_hex()[..10])
    }
}

// ── ChainFacts ───────────────────────────────────────────────────────────────

/// Remote state captured once at startup and never refreshed.
///
/// Everything the adjustment-window estimator needs: where the last cost
/// adjustment happened, when it happened, and how long the interval is.
/// The burn cost is deliberately absent — it is re-read on every submission
/// attempt because it drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainFacts {
    /// Block at which the last cost adjustment took effect.
    pub last_adjustment_block: BlockHeight,
    /// Chain timestamp of that block, in milliseconds.
    pub last_adjustment_timestamp: UnixMillis,
    /// Adjustment interval for the subnet, in blocks. Always > 0.
    pub adjustment_interval_blocks: u32,
    /// Local wall-clock reading taken when the facts were captured.
    pub now_timestamp: UnixMillis,
}

// ── AdjustmentWindow ─────────────────────────────────────────────────────────

/// Output of the estimator: where the next adjustment boundary falls and how
/// long to wait before the local block clock is in phase with the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentWindow {
    /// `last_adjustment_block + adjustment_interval_blocks`, exactly.
    pub next_adjustment_block: BlockHeight,
    /// Block height estimated from elapsed wall-clock time, not queried live.
    pub estimated_current_block: BlockHeight,
    /// `next_adjustment_block - gap_blocks`; negative once the boundary is past.
    pub blocks_until_trigger: i64,
    /// Milliseconds until the next block boundary; always in (0, BLOCK_PERIOD_MS].
    pub sync_delay_millis: u64,
}
