//! Population registry
//!
//! Owns every live agent. The brood list records pending larvae in laying
//! order as ids into the registry; [`Population::retire`] is the single
//! removal path and purges both, so the brood list never dangles.

use ahash::AHashMap;

use crate::core::types::{AgentId, Task, Variant};
use crate::entity::{Agent, AgentKind};

/// Head count per role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleCounts {
    pub nurses: u32,
    pub guards: u32,
    pub foragers: u32,
    pub larvae: u32,
    pub queens: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: AHashMap<AgentId, Agent>,
    /// Live ids in ascending (creation) order
    roster: Vec<AgentId>,
    /// Pending larvae, oldest first
    brood: Vec<AgentId>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Snapshot of live ids for a traversal
    pub fn ids(&self) -> Vec<AgentId> {
        self.roster.clone()
    }

    /// Live agents in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.roster.iter().filter_map(|id| self.agents.get(id))
    }

    pub fn brood(&self) -> &[AgentId] {
        &self.brood
    }

    pub fn queen(&self) -> Option<AgentId> {
        self.iter().find(|a| a.variant() == Variant::Queen).map(|a| a.id)
    }

    /// Register an agent, keeping the roster sorted by id
    pub(crate) fn insert(&mut self, agent: Agent) {
        let id = agent.id;
        let is_larva = matches!(agent.kind, AgentKind::Larva(_));
        if self.agents.insert(id, agent).is_some() {
            return;
        }
        // Colony ids are monotonic, so this is almost always a push
        if let Err(idx) = self.roster.binary_search(&id) {
            self.roster.insert(idx, id);
        }
        if is_larva {
            self.brood.push(id);
        }
    }

    /// Remove an agent from the registry and the brood list
    ///
    /// Idempotent: a second call for the same id returns `None` and changes nothing.
    pub fn retire(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        if let Ok(idx) = self.roster.binary_search(&id) {
            self.roster.remove(idx);
        }
        if matches!(agent.kind, AgentKind::Larva(_)) {
            self.brood.retain(|&b| b != id);
        }
        Some(agent)
    }

    /// Count agents by variant and, for workers, by their derived task
    pub fn counts(&self) -> RoleCounts {
        let mut counts = RoleCounts::default();
        for agent in self.agents.values() {
            match &agent.kind {
                AgentKind::Larva(_) => counts.larvae += 1,
                AgentKind::Queen(_) => counts.queens += 1,
                AgentKind::Worker(bee) => match bee.task() {
                    Task::Nurse => counts.nurses += 1,
                    Task::Guard => counts.guards += 1,
                    Task::Forager => counts.foragers += 1,
                },
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Larva, QueenBee, WorkerBee};

    fn larva(id: u64) -> Agent {
        Agent::new(AgentId(id), AgentKind::Larva(Larva::new()))
    }

    fn worker(id: u64, jh: f64) -> Agent {
        Agent::new(AgentId(id), AgentKind::Worker(WorkerBee::new(jh, 10, 3)))
    }

    #[test]
    fn test_insert_tracks_roster_and_brood() {
        let mut pop = Population::new();
        pop.insert(worker(1, 0.1));
        pop.insert(larva(2));
        pop.insert(larva(3));

        assert_eq!(pop.len(), 3);
        assert_eq!(pop.ids(), vec![AgentId(1), AgentId(2), AgentId(3)]);
        assert_eq!(pop.brood(), &[AgentId(2), AgentId(3)]);
    }

    #[test]
    fn test_out_of_order_insert_keeps_roster_sorted() {
        let mut pop = Population::new();
        pop.insert(worker(5, 0.1));
        pop.insert(worker(2, 0.1));
        pop.insert(larva(9));
        pop.insert(worker(3, 0.1));

        assert_eq!(pop.ids(), vec![AgentId(2), AgentId(3), AgentId(5), AgentId(9)]);
        assert!(pop.retire(AgentId(3)).is_some());
        assert_eq!(pop.ids(), vec![AgentId(2), AgentId(5), AgentId(9)]);
        assert!(pop.retire(AgentId(9)).is_some());
        assert!(pop.brood().is_empty());
    }

    #[test]
    fn test_reinserting_live_id_changes_nothing_structural() {
        let mut pop = Population::new();
        pop.insert(larva(1));
        pop.insert(larva(1));
        assert_eq!(pop.ids(), vec![AgentId(1)]);
        assert_eq!(pop.brood(), &[AgentId(1)]);
    }

    #[test]
    fn test_retire_purges_brood_once() {
        let mut pop = Population::new();
        pop.insert(larva(1));
        pop.insert(larva(2));

        assert!(pop.retire(AgentId(1)).is_some());
        assert!(pop.retire(AgentId(1)).is_none());

        assert!(!pop.contains(AgentId(1)));
        assert_eq!(pop.brood(), &[AgentId(2)]);
        assert_eq!(pop.ids(), vec![AgentId(2)]);
    }

    #[test]
    fn test_counts_use_derived_task() {
        let mut pop = Population::new();
        pop.insert(Agent::new(AgentId(1), AgentKind::Queen(QueenBee::new(5, 100))));
        pop.insert(worker(2, 0.1));
        pop.insert(worker(3, 0.45));
        pop.insert(worker(4, 0.7));
        pop.insert(worker(5, 0.9));
        pop.insert(larva(6));

        let counts = pop.counts();
        assert_eq!(counts.queens, 1);
        assert_eq!(counts.nurses, 1);
        assert_eq!(counts.guards, 1);
        assert_eq!(counts.foragers, 2);
        assert_eq!(counts.larvae, 1);
        assert_eq!(pop.queen(), Some(AgentId(1)));
    }
}
