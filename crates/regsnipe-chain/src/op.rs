//! Registration call construction and signing.
//!
//! Two economically equivalent call variants exist on the ledger: the newer
//! recycle form and the original burn form. The submitter prefers recycle
//! when the node advertises it.

use serde::{Deserialize, Serialize};

use regsnipe_core::types::NetUid;
use regsnipe_keys::ColdKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegisterCall {
    #[serde(rename_all = "camelCase")]
    RecycleRegister { netuid: NetUid, hotkey: String },
    #[serde(rename_all = "camelCase")]
    BurnedRegister { netuid: NetUid, hotkey: String },
}

/// A signed registration ready for submission.
///
/// `nonce: None` asks the node to resolve the account nonce at submission
/// time, so rapid repeated submissions from one account never collide on a
/// stale value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOperation {
    pub call: RegisterCall,
    pub signer: String,
    /// Hex-encoded sr25519 signature over the bincode-serialized (call, tip).
    pub signature: String,
    pub tip: u64,
    pub nonce: Option<u64>,
}

/// Sign `call` with the cold key, attaching the priority tip.
pub fn sign_operation(key: &ColdKey, call: RegisterCall, tip: u64) -> SignedOperation {
    // The signed payload covers the call and the tip; the nonce is resolved
    // node-side and covered by the node's own replay protection.
    let payload = bincode::serialize(&(&call, tip)).expect("serializing register call");
    let signature = hex::encode(key.sign(&payload));
    SignedOperation {
        call,
        signer: key.address().to_string(),
        signature,
        tip,
        nonce: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_PHRASE: &str =
        "bottom drive obey lake curtain smoke basket hold race lonely fit walk";

    fn hotkey() -> String {
        "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".to_string()
    }

    #[test]
    fn signs_with_auto_nonce_and_tip() {
        let key = ColdKey::from_mnemonic(DEV_PHRASE).unwrap();
        let op = sign_operation(
            &key,
            RegisterCall::RecycleRegister {
                netuid: 18,
                hotkey: hotkey(),
            },
            1_000_000,
        );
        assert_eq!(op.signer, key.address());
        assert_eq!(op.tip, 1_000_000);
        assert!(op.nonce.is_none());
        // 64-byte sr25519 signature.
        assert_eq!(hex::decode(&op.signature).unwrap().len(), 64);
    }

    #[test]
    fn call_variants_serialize_distinctly() {
        let recycle = serde_json::to_value(RegisterCall::RecycleRegister {
            netuid: 1,
            hotkey: hotkey(),
        })
        .unwrap();
        let burned = serde_json::to_value(RegisterCall::BurnedRegister {
            netuid: 1,
            hotkey: hotkey(),
        })
        .unwrap();
        assert!(recycle.get("recycleRegister").is_some());
        assert!(burned.get("burnedRegister").is_some());
    }

    #[test]
    fn signature_depends_on_tip() {
        let key = ColdKey::from_mnemonic(DEV_PHRASE).unwrap();
        let call = RegisterCall::BurnedRegister {
            netuid: 1,
            hotkey: hotkey(),
        };
        let a = sign_operation(&key, call.clone(), 1);
        let b = sign_operation(&key, call, 2);
        assert_ne!(a.signature, b.signature);
    }
}
