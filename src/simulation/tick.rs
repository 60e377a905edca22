//! Tick system - one full pass over the colony
//!
//! Under random activation the live ids are shuffled and each agent's commands
//! are committed before the next agent runs. Under simultaneous activation every
//! agent computes against the tick-start state, then the commit runs in two
//! passes: pool transfers agent by agent in roster order, then all structural
//! commands. Either way the statistics record is appended last.

use rand::seq::SliceRandom;

use crate::core::config::Activation;
use crate::core::types::{AgentId, DeathCause, Tick};
use crate::entity::{Agent, AgentKind};
use crate::simulation::colony::Colony;
use crate::simulation::effects::{feeding_demand, ColonyCommand, Effects, StepContext};
use crate::simulation::resource_pool::ResourcePool;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Step index after the tick
    pub step: Tick,
    pub deaths: Vec<(AgentId, DeathCause)>,
    pub matured: u32,
    pub eggs_laid: u32,
    /// Spawns dropped because no free cell was found
    pub spawns_skipped: u32,
    /// Agents whose tick-start meal was gone by their turn at the pool
    pub feeds_refused: u32,
    /// Maturations dropped because the pool could no longer pay
    pub maturations_unpaid: u32,
}

impl TickReport {
    pub fn new(step: Tick) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    pub fn deaths_by(&self, cause: DeathCause) -> usize {
        self.deaths.iter().filter(|(_, c)| *c == cause).count()
    }
}

pub fn run_colony_tick(colony: &mut Colony) -> TickReport {
    let mut report = TickReport::new(colony.step + 1);
    let mut ids = colony.population.ids();

    match colony.config.activation {
        Activation::Random => {
            ids.shuffle(&mut colony.rng);
            for id in ids {
                let Some(agent) = colony.population.get(id).copied() else {
                    continue;
                };
                let pool = colony.pool;
                let mut commands = Vec::new();
                let updated = step_agent(colony, agent, pool, &mut commands);
                write_back(colony, updated);
                colony.apply(commands, &mut report);
            }
        }
        Activation::Simultaneous => run_simultaneous(colony, ids, &mut report),
    }

    colony.step += 1;
    colony.record_statistics();

    if let Some(record) = colony.stats.latest() {
        tracing::trace!(
            step = record.step,
            nurses = record.nurses,
            guards = record.guards,
            foragers = record.foragers,
            larvae = record.larvae,
            resource = record.resource,
            deaths = report.deaths.len(),
            "tick complete"
        );
    }

    report
}

fn run_simultaneous(colony: &mut Colony, ids: Vec<AgentId>, report: &mut TickReport) {
    let tick_start = colony.pool;
    let mut staged = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(agent) = colony.population.get(id).copied() else {
            continue;
        };
        let mut commands = Vec::new();
        let updated = step_agent(colony, agent, tick_start, &mut commands);
        staged.push((agent, updated, commands));
    }

    // Pool pass: a meal is only granted if the live pool still holds it.
    // Structure is untouched here, so a refused agent re-runs against the
    // same tick-start view with nothing to eat.
    let mut structural = Vec::new();
    for (original, mut updated, mut commands) in staged {
        if feeding_demand(&commands) > colony.pool.level() {
            let empty = ResourcePool::new(0, colony.pool.ceiling());
            commands.clear();
            updated = step_agent(colony, original, empty, &mut commands);
            report.feeds_refused += 1;
            tracing::debug!(agent = original.id.0, "feed refused at commit");
        }
        write_back(colony, updated);

        let (transfers, rest): (Vec<_>, Vec<_>) =
            commands.into_iter().partition(ColonyCommand::is_pool_transfer);
        colony.apply(transfers, report);
        structural.extend(rest);
    }

    colony.apply(structural, report);
}

/// Run one agent's rule against the current colony structure and `pool`
///
/// Returns the agent's updated state; the caller decides when it lands.
fn step_agent(
    colony: &mut Colony,
    mut agent: Agent,
    pool: ResourcePool,
    commands: &mut Vec<ColonyCommand>,
) -> Agent {
    let id = agent.id;
    let ctx = StepContext {
        grid: &colony.grid,
        population: &colony.population,
        policy: &colony.config.policy,
        last_record: colony.stats.latest(),
    };
    let mut fx = Effects::new(pool, commands);

    match &mut agent.kind {
        AgentKind::Larva(larva) => larva.step(),
        AgentKind::Worker(bee) => bee.step(id, &ctx, &mut colony.rng, &mut fx),
        AgentKind::Queen(queen) => queen.step(id, &ctx, &mut fx),
    }

    agent
}

fn write_back(colony: &mut Colony, agent: Agent) {
    if let Some(slot) = colony.population.get_mut(agent.id) {
        *slot = agent;
    }
}
