/// ─── regsnipe protocol constants ────────────────────────────────────────────
///
/// The target ledger produces one block every 12 seconds and recomputes the
/// registration cost once per adjustment interval. Everything here is
/// denominated in rao (1 TAO = 1_000_000_000 rao).

// ── Timing ───────────────────────────────────────────────────────────────────

/// Fixed block production period of the target ledger, in milliseconds.
/// The whole estimation pipeline assumes this never drifts.
pub const BLOCK_PERIOD_MS: u64 = 12_000;

/// Cadence of the rapid-fire submission loop once the trigger block is
/// reached, in milliseconds.
pub const RAPID_FIRE_PERIOD_MS: u64 = 100;

// ── Economics ────────────────────────────────────────────────────────────────

/// 1 TAO expressed in rao.
pub const RAO_PER_TAO: u128 = 1_000_000_000;

/// Flat buffer added on top of the live burn cost to cover the tip and fee
/// when checking the cold-key balance.
pub const FEE_BUFFER_RAO: u128 = 10_000_000;

/// Priority tip attached to every registration submission.
pub const TIP_RAO: u64 = 1_000_000;
