//! regsnipe-submit
//!
//! The registration submitter: a single-flight guard, fresh balance and
//! cost preconditions, call signing, and the drive of one in-flight
//! operation through its status stream to a terminal outcome.

pub mod guard;
pub mod submitter;

pub use guard::SubmitGuard;
pub use submitter::Submitter;
