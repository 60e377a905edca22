//! Beehive Colony - agent-based honeybee lifecycle and task allocation

pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;

pub use crate::core::{ColonyConfig, ColonyError, Result};
pub use crate::simulation::{Colony, ColonySnapshot, TickReport};
