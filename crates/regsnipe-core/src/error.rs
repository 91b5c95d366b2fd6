use thiserror::Error;

use crate::types::Balance;

#[derive(Debug, Error)]
pub enum SnipeError {
    // ── Fatal at boot ────────────────────────────────────────────────────────
    #[error("remote read failed: {0}")]
    RemoteRead(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Fatal at precondition ────────────────────────────────────────────────
    #[error("insufficient balance: need {need} rao, have {have} rao")]
    InsufficientBalance { need: Balance, have: Balance },

    // ── Fatal at dispatch ────────────────────────────────────────────────────
    /// The ledger rejected the operation after inclusion. Domain-final
    /// (e.g. already registered) — retrying cannot succeed.
    #[error("dispatch failed: {section}.{name}")]
    DispatchFailed { section: String, name: String },

    // ── Transient ────────────────────────────────────────────────────────────
    /// A single attempt's transport failure. The rapid-fire loop itself is
    /// the retry mechanism; no backoff.
    #[error("submission error: {0}")]
    Submission(String),
}

impl SnipeError {
    /// Whether this error ends the run, as opposed to being retried by the
    /// next rapid-fire tick.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SnipeError::Submission(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_submission_errors_are_transient() {
        assert!(!SnipeError::Submission("ws closed".into()).is_fatal());
        assert!(SnipeError::InsufficientBalance { need: 2, have: 1 }.is_fatal());
        assert!(SnipeError::DispatchFailed {
            section: "subtensorModule".into(),
            name: "HotKeyAlreadyRegisteredInSubNet".into(),
        }
        .is_fatal());
        assert!(SnipeError::RemoteRead("timeout".into()).is_fatal());
    }
}
