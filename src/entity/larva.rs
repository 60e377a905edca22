//! Larva - brood waiting for a nurse

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Larva {
    /// Set once a nurse has fed it; a matured larva is replaced by a worker in the same commit
    pub matured: bool,
    /// Ticks since laid
    pub age: u32,
}

impl Larva {
    pub fn new() -> Self {
        Self::default()
    }

    /// Larvae are passive; they only age while waiting
    pub fn step(&mut self) {
        self.age += 1;
    }
}
