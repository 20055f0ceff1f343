//! Persistence of named scenarios.
//!
//! A scenario is written once on save and never mutated; it can only be
//! deleted. Implementations must make `create`/`delete` atomic per record and
//! return a consistent snapshot from `list`.

mod file;
mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::{SimulationInput, SimulationResult};

pub use file::JsonFileScenarioStore;
pub use memory::InMemoryScenarioStore;

pub type ScenarioId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub scenario_name: String,
    pub inputs: SimulationInput,
    pub results: SimulationResult,
    pub created_at: DateTime<Utc>,
}

impl Scenario {
    /// Non-finite figures would serialize as `null` and could not be read back.
    fn new(
        name: &str,
        inputs: SimulationInput,
        results: SimulationResult,
    ) -> Result<Self, StoreError> {
        if !inputs.is_finite() || !results.is_finite() {
            return Err(StoreError::Persistence(format!(
                "scenario {name:?} has non-finite values"
            )));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            scenario_name: name.to_string(),
            inputs,
            results,
            created_at: Utc::now(),
        })
    }

    pub fn summary(&self) -> ScenarioSummary {
        ScenarioSummary {
            id: self.id,
            scenario_name: self.scenario_name.clone(),
            results: self.results,
            created_at: self.created_at,
        }
    }
}

/// List view of a scenario (inputs omitted).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub scenario_name: String,
    pub results: SimulationResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scenario {0} not found")]
    NotFound(ScenarioId),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

pub trait ScenarioStore: Send + Sync {
    fn create(
        &self,
        name: &str,
        inputs: SimulationInput,
        results: SimulationResult,
    ) -> Result<Scenario, StoreError>;

    /// Newest first.
    fn list(&self) -> Result<Vec<ScenarioSummary>, StoreError>;

    fn get(&self, id: ScenarioId) -> Result<Scenario, StoreError>;

    fn delete(&self, id: ScenarioId) -> Result<(), StoreError>;
}

/// Records are kept in insertion order; ties on `created_at` list the later
/// insert first.
fn newest_first(scenarios: &[Scenario]) -> Vec<ScenarioSummary> {
    let mut summaries: Vec<ScenarioSummary> =
        scenarios.iter().rev().map(Scenario::summary).collect();
    summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    summaries
}

fn lock_poisoned() -> StoreError {
    StoreError::Persistence("lock poisoned".to_string())
}
