pub mod colony;
pub mod effects;
pub mod population;
pub mod resource_pool;
pub mod stats;
pub mod tick;

pub use colony::Colony;
pub use effects::{ColonyCommand, Effects, StepContext};
pub use population::{Population, RoleCounts};
pub use resource_pool::ResourcePool;
pub use stats::{ColonySnapshot, StatisticsCollector};
pub use tick::{run_colony_tick, TickReport};
