//! CLI arguments and configuration validation.
//!
//! Everything is checked before the first RPC call: a bad netuid, hotkey,
//! endpoint or mnemonic aborts the process with exit code 1. The mnemonic
//! is only accepted via the `MNEMONIC` environment variable so it never
//! shows up in shell history or a process listing.

use clap::Parser;
use zeroize::Zeroizing;

use regsnipe_core::types::NetUid;
use regsnipe_core::SnipeError;

#[derive(Parser, Debug)]
#[command(
    name = "regsnipe",
    version,
    about = "regsnipe — race a subnet registration in right after the cost adjustment"
)]
pub struct Args {
    /// Target subnet identifier.
    #[arg(long)]
    pub netuid: NetUid,

    /// Hotkey SS58 address to register on the subnet.
    #[arg(long)]
    pub hotkey: String,

    /// Node WebSocket endpoint (ws:// or wss://).
    #[arg(long)]
    pub endpoint: String,
}

pub struct BotConfig {
    pub netuid: NetUid,
    pub hotkey: String,
    pub endpoint: String,
    /// Cold-key mnemonic, zeroized on drop.
    pub mnemonic: Zeroizing<String>,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the mnemonic; Zeroizing forwards Debug to the inner
        // string, so a derive would leak it.
        f.debug_struct("BotConfig")
            .field("netuid", &self.netuid)
            .field("hotkey", &self.hotkey)
            .field("endpoint", &self.endpoint)
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}

impl BotConfig {
    pub fn from_args(args: Args) -> Result<Self, SnipeError> {
        Self::build(args, std::env::var("MNEMONIC").ok())
    }

    fn build(args: Args, mnemonic: Option<String>) -> Result<Self, SnipeError> {
        let mnemonic = mnemonic
            .map(Zeroizing::new)
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| {
                SnipeError::InvalidConfig("MNEMONIC environment variable is not set".into())
            })?;

        regsnipe_keys::validate_ss58(&args.hotkey)?;

        let endpoint = args.endpoint.trim().to_string();
        if !endpoint.starts_with("ws://") && !endpoint.starts_with("wss://") {
            return Err(SnipeError::InvalidConfig(format!(
                "endpoint must be a ws:// or wss:// URL, got {endpoint:?}"
            )));
        }

        Ok(Self {
            netuid: args.netuid,
            hotkey: args.hotkey.trim().to_string(),
            endpoint,
            mnemonic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOTKEY: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const PHRASE: &str =
        "bottom drive obey lake curtain smoke basket hold race lonely fit walk";

    fn args(hotkey: &str, endpoint: &str) -> Args {
        Args {
            netuid: 18,
            hotkey: hotkey.into(),
            endpoint: endpoint.into(),
        }
    }

    #[test]
    fn accepts_a_valid_configuration() {
        let cfg = BotConfig::build(
            args(HOTKEY, "wss://entrypoint.example:443"),
            Some(PHRASE.into()),
        )
        .unwrap();
        assert_eq!(cfg.netuid, 18);
        assert_eq!(cfg.hotkey, HOTKEY);
        assert_eq!(cfg.endpoint, "wss://entrypoint.example:443");
    }

    #[test]
    fn rejects_missing_or_blank_mnemonic() {
        let err = BotConfig::build(args(HOTKEY, "ws://x"), None).unwrap_err();
        assert!(matches!(err, SnipeError::InvalidConfig(_)));
        let err = BotConfig::build(args(HOTKEY, "ws://x"), Some("  ".into())).unwrap_err();
        assert!(matches!(err, SnipeError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_bad_hotkey() {
        let err =
            BotConfig::build(args("not-an-address", "ws://x"), Some(PHRASE.into())).unwrap_err();
        assert!(matches!(err, SnipeError::InvalidConfig(_)));
    }

    #[test]
    fn debug_never_leaks_the_mnemonic() {
        let cfg = BotConfig::build(
            args(HOTKEY, "ws://entrypoint.example"),
            Some(PHRASE.into()),
        )
        .unwrap();
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains(HOTKEY));
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("bottom"));
    }

    #[test]
    fn rejects_non_websocket_endpoint() {
        let err = BotConfig::build(
            args(HOTKEY, "https://entrypoint.example"),
            Some(PHRASE.into()),
        )
        .unwrap_err();
        assert!(matches!(err, SnipeError::InvalidConfig(_)));
    }
}
