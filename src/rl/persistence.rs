//! Q-table persistence
//!
//! Tables are loaded once at process start and saved whenever an episode
//! ends. Loading never fails the run: a missing, unreadable or mismatched
//! file simply means that snake starts from a zeroed table.
//!
//! [`FileStore`] writes one JSON document per snake:
//! - `<dir>/snake1_q_table.json`
//! - `<dir>/snake2_q_table.json`

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::q_table::QTable;
use crate::error::PersistenceError;
use crate::game::{GridWorld, SnakeId};

/// Gateway the episode driver persists learned tables through
pub trait QTableStore {
    /// Tables saved by an earlier run, `None` where nothing usable exists
    fn load(&mut self, world: GridWorld) -> [Option<QTable>; 2];

    /// Persist both tables, indexed by [`SnakeId::index`]
    fn save(&mut self, tables: [&QTable; 2]) -> Result<(), PersistenceError>;
}

/// On-disk layout of one table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTableRecord {
    /// Crate version that wrote the file
    pub version: String,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Flat values in `(x, y, heading, action)` row-major order
    pub values: Vec<f64>,
}

impl QTableRecord {
    pub fn from_table(table: &QTable) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            grid_width: table.width(),
            grid_height: table.height(),
            values: table.values().to_vec(),
        }
    }

    pub fn into_table(self) -> Result<QTable, PersistenceError> {
        QTable::from_values(self.grid_width, self.grid_height, self.values)
    }
}

/// JSON files in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: SnakeId) -> PathBuf {
        self.dir
            .join(format!("snake{}_q_table.json", id.index() + 1))
    }

    /// Load one snake's table, `Ok(None)` if no file exists
    pub fn load_table(
        &self,
        id: SnakeId,
        world: GridWorld,
    ) -> Result<Option<QTable>, PersistenceError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| PersistenceError::Read {
            path: path.clone(),
            source: e,
        })?;
        let record: QTableRecord =
            serde_json::from_str(&json).map_err(|e| PersistenceError::Parse {
                path: path.clone(),
                source: e,
            })?;

        if record.grid_width != world.width() || record.grid_height != world.height() {
            return Err(PersistenceError::DimensionMismatch {
                path,
                width: world.width(),
                height: world.height(),
                found_width: record.grid_width,
                found_height: record.grid_height,
            });
        }

        record.into_table().map(Some)
    }

    /// Write one table, going through a temporary file so a crash mid-write
    /// leaves the previous file intact
    pub fn save_table(&self, id: SnakeId, table: &QTable) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::Write {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.path_for(id);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string(&QTableRecord::from_table(table))?;

        fs::write(&tmp_path, json).map_err(|e| PersistenceError::Write {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| PersistenceError::Write {
            path: path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

impl QTableStore for FileStore {
    fn load(&mut self, world: GridWorld) -> [Option<QTable>; 2] {
        SnakeId::ALL.map(|id| match self.load_table(id, world) {
            Ok(Some(table)) => {
                info!(snake = %id, path = ?self.path_for(id), "restored q-table");
                Some(table)
            }
            Ok(None) => {
                debug!(snake = %id, "no saved q-table, starting cold");
                None
            }
            Err(err) => {
                warn!(snake = %id, error = %err, "ignoring unusable q-table, starting cold");
                None
            }
        })
    }

    fn save(&mut self, tables: [&QTable; 2]) -> Result<(), PersistenceError> {
        for id in SnakeId::ALL {
            self.save_table(id, tables[id.index()])?;
        }
        debug!(dir = ?self.dir, "saved q-tables");
        Ok(())
    }
}

/// Keeps tables in memory for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: [Option<QTable>; 2],
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with tables, as if a previous run had saved them
    pub fn with_tables(first: QTable, second: QTable) -> Self {
        Self {
            tables: [Some(first), Some(second)],
            saves: 0,
        }
    }

    /// Number of completed saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl QTableStore for MemoryStore {
    fn load(&mut self, world: GridWorld) -> [Option<QTable>; 2] {
        SnakeId::ALL.map(|id| {
            self.tables[id.index()]
                .as_ref()
                .filter(|table| table.covers(world))
                .cloned()
        })
    }

    fn save(&mut self, tables: [&QTable; 2]) -> Result<(), PersistenceError> {
        self.tables = tables.map(|table| Some(table.clone()));
        self.saves += 1;
        Ok(())
    }
}
