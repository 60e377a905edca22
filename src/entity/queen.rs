//! Queen bee - the colony's only source of brood

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, DeathCause};
use crate::simulation::effects::{Effects, StepContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueenBee {
    /// Larvae laid per tick while the gate is open
    pub laying_rate: u32,
    pub age: u32,
    /// Terminal age; no succession follows her death
    pub max_age: u32,
}

impl QueenBee {
    pub fn new(laying_rate: u32, max_age: u32) -> Self {
        Self {
            laying_rate,
            age: 0,
            max_age,
        }
    }

    /// Laying needs food in the pool and nurses on the latest record
    pub fn laying_gate_open(&self, ctx: &StepContext<'_>, fx: &Effects<'_>) -> bool {
        fx.level() > 0 && ctx.recorded_nurses() > 0
    }

    pub fn step(&mut self, id: AgentId, ctx: &StepContext<'_>, fx: &mut Effects<'_>) {
        // Aging costs food; an unfed queen does not age
        if fx.consume(1) == 1 {
            self.age += 1;
        }

        if self.age > self.max_age {
            tracing::debug!(queen = id.0, age = self.age, "queen reached terminal age");
            fx.retire(id, DeathCause::QueenExpired);
            return;
        }

        if self.laying_gate_open(ctx, fx) {
            for _ in 0..self.laying_rate {
                fx.lay_egg();
            }
        }
    }
}
