//! Worker bee - hormone-driven task allocation
//!
//! Per tick, in order: feed, grow hormone, derive task, collapse hazard,
//! senescence, then exactly one role behavior. Any death ends the step.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{HormoneGrowth, NurseSearch};
use crate::core::types::{AgentId, DeathCause, GridPos, Task};
use crate::simulation::effects::{Effects, StepContext};

/// Hormone added per tick per unit of age
const JH_GROWTH_RATE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerBee {
    /// Juvenile hormone in [0, 1]; the task is always derived from it
    jh: f64,
    /// Starvation countdown
    pub lifecredit: u32,
    pub age: u32,
}

impl WorkerBee {
    pub fn new(jh: f64, age: u32, lifecredit: u32) -> Self {
        Self {
            jh: jh.clamp(0.0, 1.0),
            lifecredit,
            age,
        }
    }

    /// Random starting attributes typical of a bee doing `task`
    pub fn cohort<R: Rng + ?Sized>(task: Task, lifecredit: u32, rng: &mut R) -> Self {
        let (age, jh) = match task {
            Task::Nurse => (rng.gen_range(1..=7), rng.gen_range(0.0..0.23)),
            Task::Guard => (rng.gen_range(7..=20), rng.gen_range(0.3..0.53)),
            Task::Forager => (rng.gen_range(21..=35), rng.gen_range(0.6..0.8)),
        };
        Self::new(jh, age, lifecredit)
    }

    pub fn jh(&self) -> f64 {
        self.jh
    }

    pub fn task(&self) -> Task {
        Task::from_jh(self.jh)
    }

    fn grow_hormone(&mut self, growth: HormoneGrowth) {
        let effective_age = match growth {
            HormoneGrowth::Immediate => self.age,
            HormoneGrowth::Delayed { onset_age } if self.age > onset_age => self.age - onset_age,
            HormoneGrowth::Delayed { .. } => self.age,
        };
        self.jh = (self.jh + JH_GROWTH_RATE * effective_age as f64).clamp(0.0, 1.0);
    }

    pub fn step<R: Rng + ?Sized>(
        &mut self,
        id: AgentId,
        ctx: &StepContext<'_>,
        rng: &mut R,
        fx: &mut Effects<'_>,
    ) {
        let policy = ctx.policy;
        let pos = ctx.position_of(id);

        if fx.consume(1) == 1 {
            self.age += 1;
            self.lifecredit = policy.lifecredit;
        } else {
            self.lifecredit = self.lifecredit.saturating_sub(1);
            if self.lifecredit == 0 && pos.is_some() {
                tracing::debug!(agent = id.0, "worker starved");
                fx.retire(id, DeathCause::Starvation);
                return;
            }
        }

        self.grow_hormone(policy.hormone_growth);
        let task = self.task();

        let Some(pos) = pos else {
            return;
        };

        if ctx.recorded_guards() == 0 && rng.gen::<f64>() < policy.collapse_hazard {
            fx.retire(id, DeathCause::Collapse);
            return;
        }

        if self.age > policy.senescence_age {
            fx.retire(id, DeathCause::Senescence);
            return;
        }

        match task {
            Task::Forager => self.forage(id, ctx, rng, fx),
            Task::Nurse => self.tend_brood(id, pos, ctx, rng, fx),
            Task::Guard => self.guard_hive(id, ctx, rng, fx),
        }
    }

    fn forage<R: Rng + ?Sized>(
        &self,
        id: AgentId,
        ctx: &StepContext<'_>,
        rng: &mut R,
        fx: &mut Effects<'_>,
    ) {
        let policy = ctx.policy;
        if rng.gen::<f64>() < policy.forage_hazard {
            fx.retire(id, DeathCause::ForagingHazard);
        } else if fx.within_ceiling() {
            let gain = rng.gen_range(policy.forage_gain_min..=policy.forage_gain_max);
            fx.produce(gain);
        }
    }

    fn tend_brood<R: Rng + ?Sized>(
        &self,
        id: AgentId,
        pos: GridPos,
        ctx: &StepContext<'_>,
        rng: &mut R,
        fx: &mut Effects<'_>,
    ) {
        let policy = ctx.policy;

        if let Some(larva) = find_pending_larva(pos, ctx) {
            if fx.level() > policy.nurse_feed_threshold {
                tracing::debug!(nurse = id.0, larva = larva.0, "nurse feeding larva");
                fx.mature(larva, policy.nurse_feed_cost);
            }
        }

        if policy.nurse_wander {
            let steps = ctx.grid.neighborhood(pos, 1, false);
            if let Some(&to) = steps.choose(rng) {
                if !ctx.grid.is_occupied(to) {
                    fx.move_to(id, to);
                }
            }
        }
    }

    fn guard_hive<R: Rng + ?Sized>(
        &self,
        id: AgentId,
        ctx: &StepContext<'_>,
        rng: &mut R,
        fx: &mut Effects<'_>,
    ) {
        let threat: f64 = rng.gen();
        if threat > ctx.policy.guard_death_threshold {
            fx.retire(id, DeathCause::Defending);
        }
    }
}

/// Pick the larva a nurse at `pos` would feed, if any
fn find_pending_larva(pos: GridPos, ctx: &StepContext<'_>) -> Option<AgentId> {
    let is_pending = |id: &AgentId| {
        ctx.population
            .get(*id)
            .and_then(|a| a.as_larva())
            .map_or(false, |larva| !larva.matured)
    };

    match ctx.policy.nurse_search {
        NurseSearch::ColonyWide => ctx.population.brood().iter().copied().find(|id| is_pending(id)),
        NurseSearch::Neighborhood { radius } => ctx
            .grid
            .neighbors(pos, radius, false)
            .into_iter()
            .find(|id| is_pending(id)),
    }
}
