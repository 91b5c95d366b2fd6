//! Trigger-scheduler state machine.
//!
//! Owns the decision of *when* to start hammering submissions. The timers
//! themselves live with the async runner; this type only consumes their
//! firings, which keeps every transition testable without waiting on a
//! wall clock.
//!
//! Lifecycle:
//!
//! ```text
//! Idle ──▶ Waiting ──sync timer──▶ Monitoring ──threshold tick──▶ Armed ──terminal outcome──▶ Terminated
//!                                     │  ▲
//!                                     ╰──╯ 12 s tick, clock += 1
//! ```

use std::time::Duration;

use tracing::debug;

use regsnipe_core::constants::BLOCK_PERIOD_MS;
use regsnipe_core::types::{AdjustmentWindow, BlockHeight};

use crate::clock::BlockClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Waiting,
    Monitoring,
    Armed,
    Terminated,
}

/// Result of one threshold evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Not there yet: keep the 12 s cadence running.
    Hold {
        estimated_block: BlockHeight,
        /// Blocks from the estimate to the adjustment block itself.
        blocks_remaining: u64,
        /// Projected wall-clock wait at the fixed block period.
        projected_wait: Duration,
    },
    /// Threshold crossed: start the rapid-fire loop. Emitted at most once.
    Arm { estimated_block: BlockHeight },
    /// Tick arrived outside `Monitoring`; nothing advanced, nothing to do.
    Ignored,
}

pub struct TriggerScheduler {
    state: SchedulerState,
    clock: BlockClock,
    next_adjustment_block: BlockHeight,
    sync_delay: Duration,
}

impl TriggerScheduler {
    /// Build from an estimated window. The scheduler is born `Idle`; the
    /// caller moves it to `Waiting` with [`Self::start_waiting`], sleeps the
    /// returned delay, then calls [`Self::begin_monitoring`].
    pub fn new(window: &AdjustmentWindow) -> Self {
        Self {
            state: SchedulerState::Idle,
            clock: BlockClock::new(window.estimated_current_block),
            next_adjustment_block: window.next_adjustment_block,
            sync_delay: Duration::from_millis(window.sync_delay_millis),
        }
    }

    /// Arm the one-shot sync timer.
    pub fn start_waiting(&mut self) -> Duration {
        debug_assert_eq!(self.state, SchedulerState::Idle);
        self.state = SchedulerState::Waiting;
        self.sync_delay
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn sync_delay(&self) -> Duration {
        self.sync_delay
    }

    /// Block the registration fires at: one before the adjustment block.
    pub fn trigger_block(&self) -> BlockHeight {
        self.next_adjustment_block - 1
    }

    /// Sync timer expired: evaluate immediately, without advancing the clock.
    pub fn begin_monitoring(&mut self) -> Evaluation {
        debug_assert_eq!(self.state, SchedulerState::Waiting);
        self.state = SchedulerState::Monitoring;
        self.evaluate()
    }

    /// One 12 s tick: advance the clock and re-evaluate. Ticks arriving
    /// outside `Monitoring` leave the clock untouched and are reported as
    /// [`Evaluation::Ignored`] rather than re-claiming a transition.
    pub fn on_block_tick(&mut self) -> Evaluation {
        if self.state != SchedulerState::Monitoring {
            debug!(state = ?self.state, "block tick outside Monitoring ignored");
            return Evaluation::Ignored;
        }
        self.clock.advance();
        self.evaluate()
    }

    /// A terminal submission outcome ends the run.
    pub fn terminate(&mut self) {
        self.state = SchedulerState::Terminated;
    }

    fn evaluate(&mut self) -> Evaluation {
        let estimated_block = self.clock.current();
        if estimated_block >= self.trigger_block() {
            self.state = SchedulerState::Armed;
            return Evaluation::Arm { estimated_block };
        }
        let blocks_remaining = self.next_adjustment_block - estimated_block;
        Evaluation::Hold {
            estimated_block,
            blocks_remaining,
            projected_wait: Duration::from_millis(blocks_remaining * BLOCK_PERIOD_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regsnipe_core::types::AdjustmentWindow;

    fn window(current: u64, next: u64) -> AdjustmentWindow {
        AdjustmentWindow {
            next_adjustment_block: next,
            estimated_current_block: current,
            blocks_until_trigger: next as i64 - current as i64,
            sync_delay_millis: 7_000,
        }
    }

    #[test]
    fn walks_waiting_to_armed() {
        // current 1357, trigger at 1359.
        let mut sched = TriggerScheduler::new(&window(1357, 1360));
        assert_eq!(sched.state(), SchedulerState::Idle);
        assert_eq!(sched.start_waiting(), Duration::from_millis(7_000));
        assert_eq!(sched.state(), SchedulerState::Waiting);

        let eval = sched.begin_monitoring();
        assert_eq!(sched.state(), SchedulerState::Monitoring);
        assert_eq!(
            eval,
            Evaluation::Hold {
                estimated_block: 1357,
                blocks_remaining: 3,
                projected_wait: Duration::from_millis(36_000),
            }
        );

        assert!(matches!(
            sched.on_block_tick(),
            Evaluation::Hold {
                estimated_block: 1358,
                ..
            }
        ));
        assert_eq!(
            sched.on_block_tick(),
            Evaluation::Arm {
                estimated_block: 1359
            }
        );
        assert_eq!(sched.state(), SchedulerState::Armed);

        sched.terminate();
        assert_eq!(sched.state(), SchedulerState::Terminated);
    }

    #[test]
    fn initial_evaluation_does_not_advance_the_clock() {
        let mut sched = TriggerScheduler::new(&window(1000, 1360));
        sched.start_waiting();
        match sched.begin_monitoring() {
            Evaluation::Hold {
                estimated_block, ..
            } => assert_eq!(estimated_block, 1000),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn arms_immediately_when_already_at_threshold() {
        // Estimation can land us on or past the trigger block.
        let mut sched = TriggerScheduler::new(&window(1359, 1360));
        sched.start_waiting();
        assert_eq!(
            sched.begin_monitoring(),
            Evaluation::Arm {
                estimated_block: 1359
            }
        );
        let mut past = TriggerScheduler::new(&window(1400, 1360));
        past.start_waiting();
        assert!(matches!(past.begin_monitoring(), Evaluation::Arm { .. }));
    }

    #[test]
    fn clock_is_monotonic_and_freezes_after_arming() {
        let mut sched = TriggerScheduler::new(&window(10, 14));
        sched.start_waiting();
        sched.begin_monitoring();
        let mut previous = 10;
        loop {
            match sched.on_block_tick() {
                Evaluation::Hold {
                    estimated_block, ..
                } => {
                    assert_eq!(estimated_block, previous + 1);
                    previous = estimated_block;
                }
                Evaluation::Arm {
                    estimated_block,
                } => {
                    assert_eq!(estimated_block, 13);
                    break;
                }
                Evaluation::Ignored => panic!("tick ignored while monitoring"),
            }
        }
        // Stray ticks after arming never move the clock and never report a
        // fresh arming.
        for _ in 0..3 {
            assert_eq!(sched.on_block_tick(), Evaluation::Ignored);
        }
        assert_eq!(sched.state(), SchedulerState::Armed);
    }

    #[test]
    fn ticks_after_termination_are_ignored() {
        let mut sched = TriggerScheduler::new(&window(1359, 1360));
        sched.start_waiting();
        sched.begin_monitoring();
        sched.terminate();
        assert_eq!(sched.on_block_tick(), Evaluation::Ignored);
        assert_eq!(sched.state(), SchedulerState::Terminated);
    }
}
