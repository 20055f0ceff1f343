use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::core::{SimulationInput, SimulationResult};

use super::{Scenario, ScenarioId, ScenarioStore, ScenarioSummary, StoreError};

/// Scenario store backed by a single JSON document on disk.
///
/// The whole table lives in memory; every create/delete rewrites the file via
/// a temp file + rename while the write lock is held. If the write fails the
/// in-memory change is rolled back.
#[derive(Debug)]
pub struct JsonFileScenarioStore {
    path: PathBuf,
    scenarios: RwLock<Vec<Scenario>>,
}

impl JsonFileScenarioStore {
    /// Opens the store, loading existing records. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let scenarios = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StoreError::Persistence(format!("failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Persistence(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        tracing::info!(path = %path.display(), count = scenarios.len(), "scenario file loaded");
        Ok(Self {
            path,
            scenarios: RwLock::new(scenarios),
        })
    }

    fn persist(&self, scenarios: &[Scenario]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(scenarios)
            .map_err(|e| StoreError::Persistence(format!("failed to encode scenarios: {e}")))?;
        let tmp = temp_path(&self.path);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::Persistence(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&tmp, json).map_err(|e| {
            StoreError::Persistence(format!("failed to write {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            StoreError::Persistence(format!("failed to replace {}: {e}", self.path.display()))
        })
    }
}

/// Sibling of `path` with `.tmp` appended, so it never equals `path` itself.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl ScenarioStore for JsonFileScenarioStore {
    fn create(
        &self,
        name: &str,
        inputs: SimulationInput,
        results: SimulationResult,
    ) -> Result<Scenario, StoreError> {
        let scenario = Scenario::new(name, inputs, results)?;
        let mut scenarios = self.scenarios.write().map_err(|_| super::lock_poisoned())?;
        scenarios.push(scenario.clone());
        if let Err(e) = self.persist(&scenarios) {
            scenarios.pop();
            return Err(e);
        }
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
        let removed = scenarios.remove(index);
        if let Err(e) = self.persist(&scenarios) {
            scenarios.insert(index, removed);
            return Err(e);
        }
        Ok(())
    }
}
