//! Resource pool - the colony's shared food store

use serde::{Deserialize, Serialize};

/// Colony food store with an optional ceiling
///
/// The level is unsigned, so it is clamped at zero by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    level: u32,
    ceiling: Option<u32>,
}

impl ResourcePool {
    /// Create a pool; an initial level above the ceiling is clamped down
    pub fn new(level: u32, ceiling: Option<u32>) -> Self {
        let level = ceiling.map_or(level, |c| level.min(c));
        Self { level, ceiling }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn ceiling(&self) -> Option<u32> {
        self.ceiling
    }

    /// At or under the ceiling; always true without one
    pub fn within_ceiling(&self) -> bool {
        self.ceiling.map_or(true, |c| self.level <= c)
    }

    /// Try to remove resources, returns amount actually removed
    pub fn consume(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.level);
        self.level -= removed;
        removed
    }

    /// Try to add resources, returns amount actually added
    pub fn produce(&mut self, amount: u32) -> u32 {
        let target = self.level.saturating_add(amount);
        let target = self.ceiling.map_or(target, |c| target.min(c));
        let added = target.saturating_sub(self.level);
        self.level += added;
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_clamps_at_zero() {
        let mut pool = ResourcePool::new(2, None);
        assert_eq!(pool.consume(1), 1);
        assert_eq!(pool.consume(5), 1);
        assert_eq!(pool.level(), 0);
        assert_eq!(pool.consume(1), 0);
    }

    #[test]
    fn test_produce_respects_ceiling() {
        let mut pool = ResourcePool::new(8, Some(10));
        assert_eq!(pool.produce(5), 2);
        assert_eq!(pool.level(), 10);
        assert_eq!(pool.produce(1), 0);
    }

    #[test]
    fn test_produce_without_ceiling() {
        let mut pool = ResourcePool::new(0, None);
        assert_eq!(pool.produce(100), 100);
        assert_eq!(pool.level(), 100);
        assert!(pool.within_ceiling());
    }

    #[test]
    fn test_initial_level_clamped_to_ceiling() {
        let pool = ResourcePool::new(50, Some(20));
        assert_eq!(pool.level(), 20);
    }
}
