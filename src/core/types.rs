//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for agents
///
/// Assigned from the colony's monotonically increasing counter and never
/// reused, so ordering by id is ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

/// Simulation step counter
pub type Tick = u64;

/// Integer cell coordinate on the spatial grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Worker task, derived from the juvenile-hormone level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    Nurse,
    Guard,
    Forager,
}

/// JH below this level maps to [`Task::Nurse`]
pub const NURSE_JH_CEILING: f64 = 0.3;

/// JH at or above this level maps to [`Task::Forager`]
pub const FORAGER_JH_FLOOR: f64 = 0.6;

impl Task {
    /// Threshold mapping from hormone level to task
    pub fn from_jh(jh: f64) -> Self {
        if jh < NURSE_JH_CEILING {
            Task::Nurse
        } else if jh < FORAGER_JH_FLOOR {
            Task::Guard
        } else {
            Task::Forager
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Task::Nurse => "Nurse",
            Task::Guard => "Guard",
            Task::Forager => "Forager",
        }
    }
}

/// Agent variant discriminant, used by views and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Larva,
    Worker,
    Queen,
}

/// Grid boundary behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Topology {
    /// Neighborhoods are clipped at the edges
    Bounded,
    /// Edges wrap around
    #[default]
    Toroidal,
}

/// Why an agent left the colony
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Starvation,
    Senescence,
    /// Undefended-hive attrition while no guards were recorded
    Collapse,
    ForagingHazard,
    Defending,
    /// Queen past her terminal age
    QueenExpired,
}
