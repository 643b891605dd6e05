//! SQLite persistence backend (feature `sqlite`).
//!
//! One table, `simulations(id, name, data)`, where `data` is the saved
//! document as compact JSON.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use soil_core::SimulationId;
use soil_sim::{ExportFormat, PersistenceError, PersistenceGateway, PersistenceResult, SavedSimulation};
use tracing::{debug, info};

use crate::{OutputResult, json};

/// Stores saved runs in an SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        info!(path = %path.display(), "opened simulation store");
        Self::with_connection(conn)
    }

    /// A private in-memory database; contents vanish on drop.
    pub fn open_in_memory() -> OutputResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> OutputResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS simulations (
                 id   INTEGER PRIMARY KEY AUTOINCREMENT,
                 name TEXT    NOT NULL,
                 data TEXT    NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }

    /// Saved `(id, name)` pairs in id order.
    pub fn list(&self) -> OutputResult<Vec<(SimulationId, String)>> {
        let mut stmt = self.conn.prepare_cached("SELECT id, name FROM simulations ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((SimulationId(row.get::<_, i64>(0)? as u64), row.get::<_, String>(1)?))
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn insert(&self, simulation: &SavedSimulation) -> OutputResult<SimulationId> {
        let data = json::to_document(simulation)?;
        self.conn.execute(
            "INSERT INTO simulations (name, data) VALUES (?1, ?2)",
            params![simulation.name, data],
        )?;
        Ok(SimulationId(self.conn.last_insert_rowid() as u64))
    }

    fn fetch(&self, id: SimulationId) -> OutputResult<Option<SavedSimulation>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT name, data FROM simulations WHERE id = ?1",
                params![id.0 as i64],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(name, data)| -> OutputResult<SavedSimulation> {
            let mut doc = json::from_document(&data)?;
            doc.name = name;
            Ok(doc)
        })
        .transpose()
    }
}

impl PersistenceGateway for SqliteStore {
    fn save(&mut self, simulation: &SavedSimulation) -> PersistenceResult<SimulationId> {
        let id = self.insert(simulation)?;
        debug!(%id, name = %simulation.name, "stored simulation in sqlite");
        Ok(id)
    }

    fn load(&self, id: SimulationId) -> PersistenceResult<SavedSimulation> {
        let doc = self.fetch(id)?.ok_or(PersistenceError::NotFound(id))?;
        debug!(%id, "loaded simulation from sqlite");
        Ok(doc)
    }

    fn export(&self, id: SimulationId, format: ExportFormat) -> PersistenceResult<Vec<u8>> {
        let doc = self.load(id)?;
        let bytes = crate::encode(&doc, format)?;
        debug!(%id, %format, bytes = bytes.len(), "exported simulation");
        Ok(bytes)
    }
}
