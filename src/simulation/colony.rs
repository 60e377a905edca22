//! Colony - the aggregate root
//!
//! Owns the resource pool, the spatial grid, the population registry, the
//! statistics series, the id counter and the single seeded random source.
//! Agents never hold references back into it; they see it through a
//! [`StepContext`](crate::simulation::effects::StepContext) for the duration
//! of their step.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{ColonyConfig, SpawnPlacement};
use crate::core::error::{ColonyError, Result};
use crate::core::types::{AgentId, GridPos, Task, Tick};
use crate::entity::{Agent, AgentKind, AgentView, Larva, QueenBee, WorkerBee};
use crate::simulation::effects::ColonyCommand;
use crate::simulation::population::Population;
use crate::simulation::resource_pool::ResourcePool;
use crate::simulation::stats::{ColonySnapshot, StatisticsCollector};
use crate::simulation::tick::{run_colony_tick, TickReport};
use crate::spatial::grid::SpatialGrid;

pub struct Colony {
    pub(crate) config: ColonyConfig,
    pub(crate) pool: ResourcePool,
    pub(crate) grid: SpatialGrid,
    pub(crate) population: Population,
    pub(crate) stats: StatisticsCollector,
    pub(crate) rng: ChaCha8Rng,
    next_id: u64,
    pub(crate) step: Tick,
}

impl Colony {
    /// Build a colony with a queen at the grid center and the configured workers
    pub fn new(config: ColonyConfig) -> Result<Self> {
        let mut colony = Self::build(config)?;

        let center = GridPos::new(colony.grid.width() / 2, colony.grid.height() / 2);
        let queen = QueenBee::new(colony.config.laying_rate, colony.config.queen_max_age);
        colony.spawn_at(AgentKind::Queen(queen), center)?;

        let (foragers, nurses, guards) = colony.config.role_counts();
        let lifecredit = colony.config.policy.lifecredit;
        for (task, count) in [(Task::Forager, foragers), (Task::Nurse, nurses), (Task::Guard, guards)] {
            for _ in 0..count {
                let bee = WorkerBee::cohort(task, lifecredit, &mut colony.rng);
                let placed = colony
                    .spawn_cell()
                    .and_then(|pos| colony.spawn_at(AgentKind::Worker(bee), pos));
                if let Err(e) = placed {
                    tracing::warn!(task = task.name(), error = %e, "initial bee not placed");
                }
            }
        }

        colony.record_statistics();
        tracing::debug!(
            agents = colony.population.len(),
            topology = ?colony.grid.topology(),
            resource = colony.pool.level(),
            "colony initialized"
        );
        Ok(colony)
    }

    /// Build a validated colony with no agents, for scripted populations
    pub fn empty(config: ColonyConfig) -> Result<Self> {
        let mut colony = Self::build(config)?;
        colony.record_statistics();
        Ok(colony)
    }

    fn build(config: ColonyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pool: ResourcePool::new(config.initial_resources, config.max_resources),
            grid: SpatialGrid::new(config.width, config.height, config.topology, config.cell_capacity),
            population: Population::new(),
            stats: StatisticsCollector::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_id: 0,
            step: 0,
            config,
        })
    }

    // === QUERIES ===

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// Number of completed ticks
    pub fn step_index(&self) -> Tick {
        self.step
    }

    pub fn resource_level(&self) -> u32 {
        self.pool.level()
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn statistics(&self) -> &StatisticsCollector {
        &self.stats
    }

    pub fn agent(&self, id: AgentId) -> Result<&Agent> {
        self.population.get(id).ok_or(ColonyError::AgentNotFound(id))
    }

    pub fn position_of(&self, id: AgentId) -> Option<GridPos> {
        self.grid.position_of(id)
    }

    pub fn is_extinct(&self) -> bool {
        self.population.is_empty()
    }

    /// Live role counts, resource level and step index
    pub fn snapshot(&self) -> ColonySnapshot {
        ColonySnapshot::from_counts(self.step, self.population.counts(), self.pool.level())
    }

    /// Read-only rendering tuples in creation order
    pub fn agents_view(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.population.iter().map(|agent| AgentView {
            id: agent.id,
            variant: agent.variant(),
            task: agent.task(),
            position: self.grid.position_of(agent.id),
        })
    }

    // === STEPPING ===

    /// Advance one tick
    pub fn step_once(&mut self) -> TickReport {
        run_colony_tick(self)
    }

    /// Advance up to `ticks` ticks, stopping early once no agent is left.
    /// Returns the number of ticks run.
    pub fn run(&mut self, ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < ticks && !self.is_extinct() {
            self.step_once();
            ran += 1;
        }
        ran
    }

    /// Append the current state to the statistics series
    pub fn record_statistics(&mut self) {
        let snapshot = self.snapshot();
        self.stats.record(snapshot);
    }

    // === SCRIPTED SPAWNS ===

    pub fn spawn_worker(&mut self, bee: WorkerBee, pos: GridPos) -> Result<AgentId> {
        self.spawn_at(AgentKind::Worker(bee), pos)
    }

    pub fn spawn_larva(&mut self, pos: GridPos) -> Result<AgentId> {
        self.spawn_at(AgentKind::Larva(Larva::new()), pos)
    }

    pub fn spawn_queen(&mut self, queen: QueenBee, pos: GridPos) -> Result<AgentId> {
        self.spawn_at(AgentKind::Queen(queen), pos)
    }

    // === INTERNALS ===

    fn next_id(&mut self) -> AgentId {
        self.next_id += 1;
        AgentId(self.next_id)
    }

    /// Place then register; a failed placement registers nothing
    fn spawn_at(&mut self, kind: AgentKind, pos: GridPos) -> Result<AgentId> {
        let id = self.next_id();
        self.grid.place(id, pos)?;
        self.population.insert(Agent::new(id, kind));
        Ok(id)
    }

    /// Cell for a new agent under the spawn placement policy
    fn spawn_cell(&mut self) -> Result<GridPos> {
        match self.config.policy.spawn_placement {
            SpawnPlacement::RequireEmpty => {
                self.grid.random_empty_cell(&mut self.rng, self.config.placement_attempts)
            }
            SpawnPlacement::AnyCell => Ok(self.grid.random_cell(&mut self.rng)),
        }
    }

    /// Remove from grid, registry and brood list. Returns false if already gone.
    fn retire(&mut self, id: AgentId) -> bool {
        self.grid.remove(id);
        self.population.retire(id).is_some()
    }

    /// Commit queued commands in order. This is the only place the registry,
    /// brood list, grid and pool change during a tick.
    pub(crate) fn apply(&mut self, commands: Vec<ColonyCommand>, report: &mut TickReport) {
        for command in commands {
            match command {
                ColonyCommand::Consume(n) => {
                    self.pool.consume(n);
                }
                ColonyCommand::Produce(n) => {
                    self.pool.produce(n);
                }
                ColonyCommand::Retire { agent, cause } => {
                    if self.retire(agent) {
                        tracing::debug!(agent = agent.0, ?cause, "agent died");
                        report.deaths.push((agent, cause));
                    }
                }
                ColonyCommand::Mature { larva, cost } => self.mature(larva, cost, report),
                ColonyCommand::LayEgg => self.lay_egg(report),
                ColonyCommand::Move { agent, to } => {
                    if self.population.contains(agent) && !self.grid.is_occupied(to) {
                        if let Err(e) = self.grid.move_agent(agent, to) {
                            tracing::debug!(agent = agent.0, error = %e, "move rejected");
                        }
                    }
                }
            }
        }
    }

    fn mature(&mut self, larva: AgentId, cost: u32, report: &mut TickReport) {
        // Another nurse may have reached this larva first
        let pending = self
            .population
            .get(larva)
            .and_then(|a| a.as_larva())
            .map_or(false, |l| !l.matured);
        if !pending {
            return;
        }
        let Some(pos) = self.grid.position_of(larva) else {
            return;
        };

        // The pool must still cover the feed now, not only when the nurse looked
        let level = self.pool.level();
        if level <= self.config.policy.nurse_feed_threshold || level < cost {
            tracing::debug!(larva = larva.0, pool = level, cost, "maturation unpaid, larva stays pending");
            report.maturations_unpaid += 1;
            return;
        }

        self.pool.consume(cost);
        if let Some(AgentKind::Larva(l)) = self.population.get_mut(larva).map(|a| &mut a.kind) {
            l.matured = true;
        }
        self.retire(larva);

        let bee = WorkerBee::cohort(Task::Nurse, self.config.policy.lifecredit, &mut self.rng);
        match self.spawn_at(AgentKind::Worker(bee), pos) {
            Ok(id) => {
                tracing::debug!(larva = larva.0, bee = id.0, "larva matured");
                report.matured += 1;
            }
            Err(e) => tracing::debug!(larva = larva.0, error = %e, "matured bee not placed"),
        }
    }

    fn lay_egg(&mut self, report: &mut TickReport) {
        let placed = self
            .spawn_cell()
            .and_then(|pos| self.spawn_at(AgentKind::Larva(Larva::new()), pos));
        match placed {
            Ok(_) => report.eggs_laid += 1,
            Err(e) => {
                tracing::debug!(error = %e, "egg skipped");
                report.spawns_skipped += 1;
            }
        }
    }
}
