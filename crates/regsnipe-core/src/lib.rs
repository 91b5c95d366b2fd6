//! regsnipe-core
//!
//! Shared types, constants and the error taxonomy for the regsnipe bot:
//! block heights, balances, the chain facts captured at startup, the derived
//! adjustment window, and the terminal run outcome returned to the caller.

pub mod constants;
pub mod error;
pub mod outcome;
pub mod types;

pub use error::SnipeError;
pub use outcome::RunOutcome;
