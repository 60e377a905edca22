pub mod config;
pub mod error;
pub mod types;

pub use config::{Activation, BehaviorPolicy, ColonyConfig, HormoneGrowth, NurseSearch, SpawnPlacement};
pub use error::{ColonyError, Result};
pub use types::{AgentId, DeathCause, GridPos, Task, Tick, Topology, Variant};
