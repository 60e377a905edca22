//! Colony agents
//!
//! Every agent is one of three variants carrying its own discriminant, so
//! counting and dispatch are plain pattern matches.

pub mod larva;
pub mod queen;
pub mod worker;

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, GridPos, Task, Variant};

pub use larva::Larva;
pub use queen::QueenBee;
pub use worker::WorkerBee;

/// Variant-specific state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AgentKind {
    Larva(Larva),
    Worker(WorkerBee),
    Queen(QueenBee),
}

/// A registered agent. Its position lives on the spatial grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
}

impl Agent {
    pub fn new(id: AgentId, kind: AgentKind) -> Self {
        Self { id, kind }
    }

    pub fn variant(&self) -> Variant {
        match self.kind {
            AgentKind::Larva(_) => Variant::Larva,
            AgentKind::Worker(_) => Variant::Worker,
            AgentKind::Queen(_) => Variant::Queen,
        }
    }

    /// Current task; only workers have one
    pub fn task(&self) -> Option<Task> {
        match &self.kind {
            AgentKind::Worker(bee) => Some(bee.task()),
            _ => None,
        }
    }

    pub fn age(&self) -> u32 {
        match &self.kind {
            AgentKind::Larva(larva) => larva.age,
            AgentKind::Worker(bee) => bee.age,
            AgentKind::Queen(queen) => queen.age,
        }
    }

    pub fn as_worker(&self) -> Option<&WorkerBee> {
        match &self.kind {
            AgentKind::Worker(bee) => Some(bee),
            _ => None,
        }
    }

    pub fn as_larva(&self) -> Option<&Larva> {
        match &self.kind {
            AgentKind::Larva(larva) => Some(larva),
            _ => None,
        }
    }

    pub fn as_queen(&self) -> Option<&QueenBee> {
        match &self.kind {
            AgentKind::Queen(queen) => Some(queen),
            _ => None,
        }
    }
}

/// Read-only rendering tuple handed to visualization collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub variant: Variant,
    pub task: Option<Task>,
    pub position: Option<GridPos>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_and_task_dispatch() {
        let larva = Agent::new(AgentId(1), AgentKind::Larva(Larva::new()));
        assert_eq!(larva.variant(), Variant::Larva);
        assert_eq!(larva.task(), None);

        let worker = Agent::new(AgentId(2), AgentKind::Worker(WorkerBee::new(0.65, 20, 3)));
        assert_eq!(worker.variant(), Variant::Worker);
        assert_eq!(worker.task(), Some(Task::Forager));
        assert_eq!(worker.age(), 20);

        let queen = Agent::new(AgentId(3), AgentKind::Queen(QueenBee::new(10, 1000)));
        assert_eq!(queen.variant(), Variant::Queen);
        assert!(queen.as_queen().is_some());
        assert!(queen.as_worker().is_none());
    }
}
