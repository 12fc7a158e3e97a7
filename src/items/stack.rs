use serde::{Deserialize, Serialize};

use crate::power::Tier;

/// Default number of cable pieces one stack can hold.
pub const DEFAULT_MAX_COUNT: u32 = 30;

/// A stack of cable items of one tier, spent by the wire placer and dropped
/// by the cutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableStack {
    pub tier: Tier,
    count: u32,
    max_count: u32,
}

impl CableStack {
    /// Creates a stack holding `count` items, clamped to `max_count`.
    ///
    /// # Panics
    ///
    /// Panics if `max_count` is zero.
    pub fn new(tier: Tier, count: u32, max_count: u32) -> Self {
        assert!(max_count > 0, "max_count must be > 0");
        Self {
            tier,
            count: count.min(max_count),
            max_count,
        }
    }

    /// One-item stack, as dropped when a wire is cut.
    pub fn single(tier: Tier) -> Self {
        Self::new(tier, 1, DEFAULT_MAX_COUNT)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Consumes `amount` items if that many are available.
    ///
    /// Returns `false` and leaves the stack untouched otherwise.
    pub fn use_items(&mut self, amount: u32) -> bool {
        if amount > self.count {
            return false;
        }
        self.count -= amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_items_only_when_enough() {
        let mut stack = CableStack::new(Tier::Medium, 2, 10);
        assert!(stack.use_items(1));
        assert!(!stack.use_items(2));
        assert_eq!(stack.count(), 1);
        assert!(stack.use_items(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn new_clamps_to_capacity() {
        let stack = CableStack::new(Tier::Low, 50, 30);
        assert_eq!(stack.count(), 30);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        CableStack::new(Tier::Low, 0, 0);
    }
}
