pub mod engine;
pub mod error;
pub mod populate;
pub mod relocation;
pub mod rng;
pub mod satisfaction;
pub mod scenario;
pub mod shared;
pub mod snapshot;
pub mod world;

pub use engine::{
    run_tick, Engine, EngineBuilder, EngineSettings, RunSummary, TickReport, TickSummary,
};
pub use error::ConfigError;
pub use scenario::{Scenario, ScenarioLoader};
pub use world::{CellPosition, Census, Occupant, World};
