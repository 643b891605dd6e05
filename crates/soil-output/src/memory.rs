//! In-process persistence backend.

use std::collections::BTreeMap;

use soil_core::SimulationId;
use soil_sim::{ExportFormat, PersistenceError, PersistenceGateway, PersistenceResult, SavedSimulation};
use tracing::debug;

/// Keeps saved runs in a map.  Ids are allocated from 1 upward and never
/// reused.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    docs:    BTreeMap<SimulationId, SavedSimulation>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Saved `(id, name)` pairs in id order.
    pub fn list(&self) -> Vec<(SimulationId, String)> {
        self.docs.iter().map(|(id, doc)| (*id, doc.name.clone())).collect()
    }

    pub fn remove(&mut self, id: SimulationId) -> PersistenceResult<SavedSimulation> {
        self.docs.remove(&id).ok_or(PersistenceError::NotFound(id))
    }
}

impl PersistenceGateway for MemoryStore {
    fn save(&mut self, simulation: &SavedSimulation) -> PersistenceResult<SimulationId> {
        self.next_id += 1;
        let id = SimulationId(self.next_id);
        self.docs.insert(id, simulation.clone());
        debug!(%id, name = %simulation.name, "stored simulation in memory");
        Ok(id)
    }

    fn load(&self, id: SimulationId) -> PersistenceResult<SavedSimulation> {
        let doc = self.docs.get(&id).cloned().ok_or(PersistenceError::NotFound(id))?;
        debug!(%id, "loaded simulation from memory");
        Ok(doc)
    }

    fn export(&self, id: SimulationId, format: ExportFormat) -> PersistenceResult<Vec<u8>> {
        let doc = self.docs.get(&id).ok_or(PersistenceError::NotFound(id))?;
        let bytes = crate::encode(doc, format)?;
        debug!(%id, %format, bytes = bytes.len(), "exported simulation");
        Ok(bytes)
    }
}
