//! Statistics collection
//!
//! One [`ColonySnapshot`] is appended after every tick (and once at
//! construction). The series is append-only; agents read its last entry as a
//! deliberately one-tick-stale signal.

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;
use crate::simulation::population::RoleCounts;

/// Role counts, resource level and step index at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub step: Tick,
    pub nurses: u32,
    pub guards: u32,
    pub foragers: u32,
    pub larvae: u32,
    pub queen_alive: bool,
    pub resource: u32,
}

impl ColonySnapshot {
    pub fn from_counts(step: Tick, counts: RoleCounts, resource: u32) -> Self {
        Self {
            step,
            nurses: counts.nurses,
            guards: counts.guards,
            foragers: counts.foragers,
            larvae: counts.larvae,
            queen_alive: counts.queens > 0,
            resource,
        }
    }

    /// Adult workers of any task
    pub fn workers(&self) -> u32 {
        self.nurses + self.guards + self.foragers
    }
}

/// Append-only time series of snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsCollector {
    records: Vec<ColonySnapshot>,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, snapshot: ColonySnapshot) {
        self.records.push(snapshot);
    }

    pub fn latest(&self) -> Option<&ColonySnapshot> {
        self.records.last()
    }

    pub fn records(&self) -> &[ColonySnapshot] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.records).unwrap_or_else(|_| "[]".to_string())
    }

    /// Largest worker head count seen so far
    pub fn peak_workers(&self) -> u32 {
        self.records.iter().map(|r| r.workers()).max().unwrap_or(0)
    }
}
