//! regsnipe-sched
//!
//! The timing core: a pure estimator that turns chain facts into an
//! adjustment window, a local block clock that stands in for live height
//! polling, and the trigger-scheduler state machine that decides when to
//! arm the rapid-fire submission loop.

pub mod clock;
pub mod estimator;
pub mod scheduler;

pub use clock::BlockClock;
pub use estimator::estimate_window;
pub use scheduler::{Evaluation, SchedulerState, TriggerScheduler};
