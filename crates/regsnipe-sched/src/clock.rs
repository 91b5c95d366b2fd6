//! Local block clock.
//!
//! A counter that stands in for live height polling: seeded from the
//! estimator's output and advanced by exactly one per scheduling tick. It
//! assumes block production never stalls or accelerates.

use regsnipe_core::types::BlockHeight;

#[derive(Debug, Clone, Copy)]
pub struct BlockClock {
    estimated_block: BlockHeight,
}

impl BlockClock {
    pub fn new(start: BlockHeight) -> Self {
        Self {
            estimated_block: start,
        }
    }

    /// Advance one block and return the new estimate.
    pub fn advance(&mut self) -> BlockHeight {
        self.estimated_block += 1;
        self.estimated_block
    }

    pub fn current(&self) -> BlockHeight {
        self.estimated_block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_exactly_one() {
        let mut clock = BlockClock::new(1001);
        assert_eq!(clock.current(), 1001);
        assert_eq!(clock.advance(), 1002);
        assert_eq!(clock.advance(), 1003);
        assert_eq!(clock.current(), 1003);
    }
}
