mod engine;
mod types;
mod validate;

pub use engine::{Engine, simulate};
pub use types::{EngineConfig, RawSimulationInput, SimulationInput, SimulationResult};
pub use validate::{ValidationError, validate};
