use std::sync::RwLock;

use crate::core::{SimulationInput, SimulationResult};

use super::{Scenario, ScenarioId, ScenarioStore, ScenarioSummary, StoreError};

/// Process-local scenario store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryScenarioStore {
    scenarios: RwLock<Vec<Scenario>>,
}

impl InMemoryScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for InMemoryScenarioStore {
    fn create(
        &self,
        name: &str,
        inputs: SimulationInput,
        results: SimulationResult,
    ) -> Result<Scenario, StoreError> {
        let scenario = Scenario::new(name, inputs, results)?;
        let mut scenarios = self.scenarios.write().map_err(|_| super::lock_poisoned())?;
        scenarios.push(scenario.clone());
        Ok(scenario)
    }

    fn list(&self) -> Result<Vec<ScenarioSummary>, StoreError> {
        let scenarios = self.scenarios.read().map_err(|_| super::lock_poisoned())?;
        Ok(super::newest_first(&scenarios))
    }

    fn get(&self, id: ScenarioId) -> Result<Scenario, StoreError> {
        let scenarios = self.scenarios.read().map_err(|_| super::lock_poisoned())?;
        scenarios
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn delete(&self, id: ScenarioId) -> Result<(), StoreError> {
        let mut scenarios = self.scenarios.write().map_err(|_| super::lock_poisoned())?;
        let index = scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;
        scenarios.remove(index);
        Ok(())
    }
}
