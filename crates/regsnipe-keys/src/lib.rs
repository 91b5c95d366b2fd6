//! regsnipe-keys
//!
//! Cold-key credential handling: an sr25519 pair derived from a BIP-39
//! mnemonic, SS58 address derivation, and validation of operator-supplied
//! SS58 addresses. The mnemonic itself never leaves the caller; this crate
//! only sees it long enough to derive the pair.

use sp_core::crypto::Ss58Codec;
use sp_core::{sr25519, Pair as PairT};
use zeroize::Zeroizing;

use regsnipe_core::SnipeError;

/// Expected length of an SS58 address for a 32-byte public key.
const SS58_ADDRESS_LEN: usize = 48;

/// Minimum number of words in an acceptable mnemonic.
const MIN_MNEMONIC_WORDS: usize = 12;

// ── ColdKey ──────────────────────────────────────────────────────────────────

/// The signing credential for registration operations.
pub struct ColdKey {
    pair: sr25519::Pair,
    address: String,
}

impl ColdKey {
    /// Derive the cold key from a mnemonic phrase.
    ///
    /// The phrase is copied into a zeroizing buffer for the duration of the
    /// derivation. At least 12 words are required; anything shorter is
    /// rejected before touching the key derivation at all.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, SnipeError> {
        let phrase = Zeroizing::new(mnemonic.trim().to_string());
        if phrase.split_whitespace().count() < MIN_MNEMONIC_WORDS {
            return Err(SnipeError::InvalidConfig(format!(
                "mnemonic must have at least {MIN_MNEMONIC_WORDS} words"
            )));
        }
        let pair = sr25519::Pair::from_string(&phrase, None)
            .map_err(|e| SnipeError::InvalidConfig(format!("invalid mnemonic: {e:?}")))?;
        let address = pair.public().to_ss58check();
        Ok(Self { pair, address })
    }

    /// SS58 address of the cold key.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign an opaque payload.
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        self.pair.sign(payload).0.to_vec()
    }
}

impl std::fmt::Debug for ColdKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        write!(f, "ColdKey({})", self.address)
    }
}

// ── SS58 validation ──────────────────────────────────────────────────────────

/// Validate an operator-supplied SS58 address (e.g. the hotkey).
///
/// Checks the textual shape first (leading `5`, 48 base-58 characters) and
/// then the embedded checksum via the SS58 decoder.
pub fn validate_ss58(address: &str) -> Result<(), SnipeError> {
    let s = address.trim();
    if !s.starts_with('5') || s.len() != SS58_ADDRESS_LEN {
        return Err(SnipeError::InvalidConfig(format!(
            "not an SS58 address (expected leading '5' and {SS58_ADDRESS_LEN} chars): {s:?}"
        )));
    }
    if bs58::decode(s).into_vec().is_err() {
        return Err(SnipeError::InvalidConfig(format!(
            "address contains non-base58 characters: {s:?}"
        )));
    }
    sr25519::Public::from_ss58check(s)
        .map(|_| ())
        .map_err(|e| SnipeError::InvalidConfig(format!("SS58 checksum failed: {e:?}")))
}
