use thiserror::Error;

use crate::core::types::{AgentId, GridPos};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColonyError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Position {0:?} lies outside the grid")]
    OutOfBounds(GridPos),

    #[error("Cell {0:?} is at capacity")]
    Occupancy(GridPos),

    #[error("No empty cell found after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },

    #[error("Agent not found: {0:?}")]
    AgentNotFound(AgentId),
}

pub type Result<T> = std::result::Result<T, ColonyError>;
