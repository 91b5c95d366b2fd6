//! Transaction-status wire model and dispatch-error decoding.
//!
//! The submit-and-watch subscription delivers one JSON object per lifecycle
//! event. Statuses are externally tagged (`"validated"`, `{"inBlock": "0x…"}`)
//! and a dispatch error, when present, rides alongside the status that
//! surfaced it — mirroring what the node's event pipeline reports.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

use regsnipe_core::types::BlockHash;

// ── Wire types ───────────────────────────────────────────────────────────────

/// One raw event from the status subscription.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEvent {
    pub status: RawStatus,
    #[serde(default)]
    pub dispatch_error: Option<DispatchFailure>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawStatus {
    Validated,
    Broadcast,
    InBlock(String),
    Finalized(String),
    Dropped,
    Invalid,
}

/// Why a dispatch failed, as reported on the wire.
///
/// `Module` failures are opaque pallet indices until looked up in the
/// [`ErrorIndex`]; `Other` carries the node's raw message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DispatchFailure {
    Module { index: u8, error: u8 },
    Other(String),
}

// ── Decoded form ─────────────────────────────────────────────────────────────

/// Lifecycle status of an in-flight operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Validated,
    Broadcast,
    InBlock { hash: BlockHash },
    Finalized { hash: BlockHash },
    Dropped,
    Invalid,
}

/// A decoded subscription event: the status plus any dispatch failure that
/// arrived with it.
#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub status: TxStatus,
    pub failure: Option<DispatchFailure>,
}

impl StatusEvent {
    /// Decode a wire event. Returns `None` (with a warning) if the node sent
    /// an unparseable block hash — the stream keeps going.
    pub fn from_wire(ev: WatchEvent) -> Option<Self> {
        let status = match ev.status {
            RawStatus::Validated => TxStatus::Validated,
            RawStatus::Broadcast => TxStatus::Broadcast,
            RawStatus::InBlock(h) => TxStatus::InBlock {
                hash: parse_hash(&h)?,
            },
            RawStatus::Finalized(h) => TxStatus::Finalized {
                hash: parse_hash(&h)?,
            },
            RawStatus::Dropped => TxStatus::Dropped,
            RawStatus::Invalid => TxStatus::Invalid,
        };
        Some(Self {
            status,
            failure: ev.dispatch_error,
        })
    }
}

fn parse_hash(raw: &str) -> Option<BlockHash> {
    match BlockHash::from_hex(raw) {
        Ok(h) => Some(h),
        Err(e) => {
            warn!(raw, error = %e, "unparseable block hash in status event");
            None
        }
    }
}

// ── Error index ──────────────────────────────────────────────────────────────

/// One pallet's error names, as served by the node's error metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletErrors {
    pub index: u8,
    pub section: String,
    pub errors: Vec<String>,
}

/// Lookup table from `(pallet index, error index)` to `(section, name)`.
///
/// Built once at connect time. An empty index is valid: decoding then fails
/// soft and the raw indices are reported instead.
#[derive(Debug, Default)]
pub struct ErrorIndex {
    entries: HashMap<(u8, u8), (String, String)>,
}

impl ErrorIndex {
    pub fn from_pallets(pallets: Vec<PalletErrors>) -> Self {
        let mut entries = HashMap::new();
        for pallet in pallets {
            for (i, name) in pallet.errors.into_iter().enumerate() {
                entries.insert((pallet.index, i as u8), (pallet.section.clone(), name));
            }
        }
        Self { entries }
    }

    pub fn decode(&self, index: u8, error: u8) -> Option<(String, String)> {
        self.entries.get(&(index, error)).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unit_and_payload_statuses() {
        let ev: WatchEvent = serde_json::from_str(r#"{"status":"validated"}"#).unwrap();
        assert!(matches!(ev.status, RawStatus::Validated));
        assert!(ev.dispatch_error.is_none());

        let hash = format!("0x{}", "ab".repeat(32));
        let raw = format!(r#"{{"status":{{"inBlock":"{hash}"}}}}"#);
        let ev: WatchEvent = serde_json::from_str(&raw).unwrap();
        let decoded = StatusEvent::from_wire(ev).unwrap();
        assert_eq!(
            decoded.status,
            TxStatus::InBlock {
                hash: BlockHash([0xAB; 32])
            }
        );
    }

    #[test]
    fn parses_module_dispatch_error() {
        let hash = format!("0x{}", "00".repeat(32));
        let raw = format!(
            r#"{{"status":{{"finalized":"{hash}"}},"dispatchError":{{"module":{{"index":7,"error":3}}}}}}"#
        );
        let ev: WatchEvent = serde_json::from_str(&raw).unwrap();
        let decoded = StatusEvent::from_wire(ev).unwrap();
        assert_eq!(
            decoded.failure,
            Some(DispatchFailure::Module { index: 7, error: 3 })
        );
    }

    #[test]
    fn parses_other_dispatch_error() {
        let raw = r#"{"status":"invalid","dispatchError":{"other":"BadProof"}}"#;
        let ev: WatchEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            ev.dispatch_error,
            Some(DispatchFailure::Other("BadProof".into()))
        );
    }

    #[test]
    fn bad_hash_drops_the_event_not_the_stream() {
        let ev: WatchEvent =
            serde_json::from_str(r#"{"status":{"inBlock":"0xnothex"}}"#).unwrap();
        assert!(StatusEvent::from_wire(ev).is_none());
    }

    #[test]
    fn error_index_decodes_known_and_misses_unknown() {
        let idx = ErrorIndex::from_pallets(vec![PalletErrors {
            index: 7,
            section: "subtensorModule".into(),
            errors: vec!["NetworkDoesNotExist".into(), "HotKeyAlreadyRegisteredInSubNet".into()],
        }]);
        assert_eq!(
            idx.decode(7, 1),
            Some((
                "subtensorModule".into(),
                "HotKeyAlreadyRegisteredInSubNet".into()
            ))
        );
        assert!(idx.decode(7, 9).is_none());
        assert!(idx.decode(8, 0).is_none());
        assert!(!idx.is_empty());
    }
}
