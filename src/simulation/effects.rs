//! Per-agent step inputs and outputs
//!
//! An agent's rule reads the colony through [`StepContext`] and never mutates
//! shared state directly. Everything it wants to change is pushed as a
//! [`ColonyCommand`] through [`Effects`], which the scheduler commits either
//! right away (random activation) or after the whole traversal (simultaneous).

use crate::core::config::BehaviorPolicy;
use crate::core::types::{AgentId, DeathCause, GridPos};
use crate::simulation::population::Population;
use crate::simulation::resource_pool::ResourcePool;
use crate::simulation::stats::ColonySnapshot;
use crate::spatial::grid::SpatialGrid;

/// A structural or shared-state change requested by an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColonyCommand {
    Consume(u32),
    Produce(u32),
    /// Remove from grid, registry and brood list
    Retire { agent: AgentId, cause: DeathCause },
    /// Replace a pending larva with a fresh nurse, paying `cost` from the pool
    Mature { larva: AgentId, cost: u32 },
    /// Spawn one larva on a cell chosen by the spawn placement policy
    LayEgg,
    /// Step onto `to` if it is still empty at commit time
    Move { agent: AgentId, to: GridPos },
}

impl ColonyCommand {
    /// Pure pool transfer with no structural effect
    pub fn is_pool_transfer(&self) -> bool {
        matches!(self, ColonyCommand::Consume(_) | ColonyCommand::Produce(_))
    }
}

/// Units an agent drew from the pool for itself in one batch
pub fn feeding_demand(commands: &[ColonyCommand]) -> u32 {
    commands
        .iter()
        .map(|c| match c {
            ColonyCommand::Consume(n) => *n,
            _ => 0,
        })
        .sum()
}

/// Read-only view of the colony for one agent's step
pub struct StepContext<'a> {
    pub grid: &'a SpatialGrid,
    pub population: &'a Population,
    pub policy: &'a BehaviorPolicy,
    /// Most recent statistics record (one tick stale during a step)
    pub last_record: Option<&'a ColonySnapshot>,
}

impl<'a> StepContext<'a> {
    pub fn recorded_guards(&self) -> u32 {
        self.last_record.map_or(0, |r| r.guards)
    }

    pub fn recorded_nurses(&self) -> u32 {
        self.last_record.map_or(0, |r| r.nurses)
    }

    pub fn position_of(&self, agent: AgentId) -> Option<GridPos> {
        self.grid.position_of(agent)
    }
}

/// Command sink plus a private ledger of the pool
///
/// The ledger starts from the pool as the agent sees it and absorbs the agent's
/// own consumption and production, so later checks in the same step see them.
pub struct Effects<'a> {
    ledger: ResourcePool,
    commands: &'a mut Vec<ColonyCommand>,
}

impl<'a> Effects<'a> {
    pub fn new(pool: ResourcePool, commands: &'a mut Vec<ColonyCommand>) -> Self {
        Self { ledger: pool, commands }
    }

    /// Pool level including this agent's own effects so far
    pub fn level(&self) -> u32 {
        self.ledger.level()
    }

    pub fn within_ceiling(&self) -> bool {
        self.ledger.within_ceiling()
    }

    /// Take up to `amount`; returns what the ledger could supply
    pub fn consume(&mut self, amount: u32) -> u32 {
        let taken = self.ledger.consume(amount);
        if taken > 0 {
            self.commands.push(ColonyCommand::Consume(taken));
        }
        taken
    }

    pub fn produce(&mut self, amount: u32) -> u32 {
        let added = self.ledger.produce(amount);
        if added > 0 {
            self.commands.push(ColonyCommand::Produce(added));
        }
        added
    }

    pub fn retire(&mut self, agent: AgentId, cause: DeathCause) {
        self.commands.push(ColonyCommand::Retire { agent, cause });
    }

    /// Request maturation; the cost is paid at commit only if the larva is still pending
    pub fn mature(&mut self, larva: AgentId, cost: u32) {
        self.ledger.consume(cost);
        self.commands.push(ColonyCommand::Mature { larva, cost });
    }

    pub fn lay_egg(&mut self) {
        self.commands.push(ColonyCommand::LayEgg);
    }

    pub fn move_to(&mut self, agent: AgentId, to: GridPos) {
        self.commands.push(ColonyCommand::Move { agent, to });
    }
}
