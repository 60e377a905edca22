//! Colony configuration with documented constants
//!
//! Every tunable of the lifecycle engine is collected here. Behaviors that
//! come in several flavors (nurse search scope, guard fragility, spawn
//! occupancy) are named policies on [`BehaviorPolicy`].

use serde::{Deserialize, Serialize};

use crate::core::error::{ColonyError, Result};
use crate::core::types::Topology;

/// Order in which agents are visited during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    /// Fresh shuffle every tick; each agent's effects land before the next agent runs
    #[default]
    Random,
    /// Every agent reads the tick-start state; effects are committed after the traversal
    Simultaneous,
}

/// How worker hormone grows with age each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HormoneGrowth {
    /// `JH += 0.01 * age`
    Immediate,
    /// `JH += 0.01 * (age - onset_age)` once `age > onset_age`, `0.01 * age` before
    Delayed { onset_age: u32 },
}

/// Where a nurse looks for an unmatured larva
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NurseSearch {
    /// Oldest pending larva anywhere in the colony
    ColonyWide,
    /// First unmatured larva in the nurse's Moore neighborhood
    Neighborhood { radius: u32 },
}

/// Whether spawned agents must land on an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnPlacement {
    /// Resample until an unoccupied cell is found (bounded retries)
    RequireEmpty,
    /// Any uniformly random cell, shared occupancy allowed
    AnyCell,
}

/// Per-role behavior knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorPolicy {
    // === HORMONE ===
    pub hormone_growth: HormoneGrowth,

    // === FEEDING ===
    /// Lifecredit restored on every successful feeding
    ///
    /// A bee that goes this many consecutive ticks unfed starves.
    pub lifecredit: u32,

    // === MORTALITY ===
    /// Age above which a worker dies of old age
    pub senescence_age: u32,

    /// Per-tick death chance for every worker while no guards are recorded
    pub collapse_hazard: f64,

    /// Per-tick death chance for a forager before it forages
    pub forage_hazard: f64,

    /// Threat roll above which a guard dies defending the hive
    ///
    /// 0.8 by default, 0.3 under [`BehaviorPolicy::aggressive`].
    pub guard_death_threshold: f64,

    // === FORAGING ===
    /// Smallest forage gain (inclusive)
    pub forage_gain_min: u32,
    /// Largest forage gain (inclusive)
    pub forage_gain_max: u32,

    // === BROOD CARE ===
    pub nurse_search: NurseSearch,

    /// Nurses step to a random empty neighbor cell after their larva search
    pub nurse_wander: bool,

    /// Pool must hold strictly more than this for a nurse to feed a larva
    pub nurse_feed_threshold: u32,

    /// Resource spent maturing one larva
    pub nurse_feed_cost: u32,

    // === PLACEMENT ===
    pub spawn_placement: SpawnPlacement,
}

impl Default for BehaviorPolicy {
    fn default() -> Self {
        Self::colony_wide()
    }
}

impl BehaviorPolicy {
    /// Colony-wide brood list, immediate hormone growth, conservative guards
    pub fn colony_wide() -> Self {
        Self {
            hormone_growth: HormoneGrowth::Immediate,
            lifecredit: 3,
            senescence_age: 35,
            collapse_hazard: 0.1,
            forage_hazard: 0.1,
            guard_death_threshold: 0.8,
            forage_gain_min: 1,
            forage_gain_max: 8,
            nurse_search: NurseSearch::ColonyWide,
            nurse_wander: false,
            nurse_feed_threshold: 2,
            nurse_feed_cost: 3,
            spawn_placement: SpawnPlacement::RequireEmpty,
        }
    }

    /// Nurses only see larvae next to them and wander to find more
    pub fn spatial() -> Self {
        Self {
            nurse_search: NurseSearch::Neighborhood { radius: 1 },
            nurse_wander: true,
            ..Self::colony_wide()
        }
    }

    /// Guards die on most threats and spawns ignore occupancy
    pub fn aggressive() -> Self {
        Self {
            guard_death_threshold: 0.3,
            spawn_placement: SpawnPlacement::AnyCell,
            ..Self::colony_wide()
        }
    }

    pub fn with_hormone_growth(mut self, growth: HormoneGrowth) -> Self {
        self.hormone_growth = growth;
        self
    }
}

/// Initialization parameters for a colony
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyConfig {
    // === POPULATION ===
    /// Number of adult workers created at start (queen not included)
    pub population: u32,

    /// Fraction of `population` starting as foragers
    pub forager_fraction: f64,
    /// Fraction of `population` starting as nurses
    pub nurse_fraction: f64,
    /// Fraction of `population` starting as guards
    pub guard_fraction: f64,

    // === GRID ===
    pub width: u32,
    pub height: u32,
    pub topology: Topology,

    /// Maximum agents per cell; `None` means unbounded shared occupancy
    pub cell_capacity: Option<usize>,

    /// Resample budget for finding an empty cell before a spawn is skipped
    pub placement_attempts: u32,

    // === RESOURCES ===
    pub initial_resources: u32,

    /// Ceiling on the food store; foraging never pushes it past this
    pub max_resources: Option<u32>,

    // === QUEEN ===
    /// Larvae laid per tick while the laying gate is open
    pub laying_rate: u32,

    /// Queen dies once her age exceeds this
    pub queen_max_age: u32,

    // === SCHEDULING ===
    pub activation: Activation,
    pub seed: u64,

    pub policy: BehaviorPolicy,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            population: 150,
            forager_fraction: 0.4,
            nurse_fraction: 0.4,
            guard_fraction: 0.2,
            width: 17,
            height: 17,
            topology: Topology::Toroidal,
            cell_capacity: None,
            placement_attempts: 10_000,
            initial_resources: 450,
            max_resources: Some(450),
            laying_rate: 10,
            queen_max_age: 1000,
            activation: Activation::Random,
            seed: 42,
            policy: BehaviorPolicy::default(),
        }
    }
}

impl ColonyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial head count per role: (foragers, nurses, guards)
    pub fn role_counts(&self) -> (u32, u32, u32) {
        let n = self.population as f64;
        (
            (n * self.forager_fraction).floor() as u32,
            (n * self.nurse_fraction).floor() as u32,
            (n * self.guard_fraction).floor() as u32,
        )
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ColonyError::Configuration(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        for (name, fraction) in [
            ("forager_fraction", self.forager_fraction),
            ("nurse_fraction", self.nurse_fraction),
            ("guard_fraction", self.guard_fraction),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ColonyError::Configuration(format!(
                    "{} ({}) must lie in [0, 1]",
                    name, fraction
                )));
            }
        }

        let total = self.forager_fraction + self.nurse_fraction + self.guard_fraction;
        // Small tolerance so 0.7 + 0.2 + 0.1 is not rejected by rounding
        if total > 1.0 + 1e-6 {
            return Err(ColonyError::Configuration(format!(
                "role fractions sum to {:.3}, exceeding 1.0 (foragers {}, nurses {}, guards {})",
                total, self.forager_fraction, self.nurse_fraction, self.guard_fraction
            )));
        }

        if self.cell_capacity == Some(0) {
            return Err(ColonyError::Configuration("cell_capacity must be positive".into()));
        }

        if self.placement_attempts == 0 {
            return Err(ColonyError::Configuration("placement_attempts must be positive".into()));
        }

        if let Some(max) = self.max_resources {
            if self.initial_resources > max {
                return Err(ColonyError::Configuration(format!(
                    "initial_resources ({}) exceeds max_resources ({})",
                    self.initial_resources, max
                )));
            }
        }

        let policy = &self.policy;
        for (name, p) in [
            ("collapse_hazard", policy.collapse_hazard),
            ("forage_hazard", policy.forage_hazard),
            ("guard_death_threshold", policy.guard_death_threshold),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ColonyError::Configuration(format!(
                    "{} ({}) must lie in [0, 1]",
                    name, p
                )));
            }
        }

        if policy.forage_gain_min == 0 || policy.forage_gain_min > policy.forage_gain_max {
            return Err(ColonyError::Configuration(format!(
                "forage gain range {}..={} is empty or starts at zero",
                policy.forage_gain_min, policy.forage_gain_max
            )));
        }

        if policy.spawn_placement == SpawnPlacement::RequireEmpty {
            let cells = self.width as u64 * self.height as u64;
            let (f, n, g) = self.role_counts();
            let needed = f as u64 + n as u64 + g as u64 + 1;
            if needed > cells {
                return Err(ColonyError::Configuration(format!(
                    "{} agents cannot each take an empty cell on a {}x{} grid",
                    needed, self.width, self.height
                )));
            }
        }

        Ok(())
    }
}
