use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Role, RoleAssignment};
use crate::error::Error;

/// On-disk shape of one entry, keyed by stringified user id in the outer map.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    role: Role,
    display_name: String,
}

/// Durable storage for the full role map, overwritten wholesale on every
/// mutation. Injected into `RoleStore` so tests can swap the file out.
pub trait PersistenceBackend: Send + Sync {
    /// `Ok(None)` means no prior state exists; start empty.
    fn load(&self) -> Result<Option<HashMap<u64, RoleAssignment>>, Error>;
    fn save(&self, assignments: &HashMap<u64, RoleAssignment>) -> Result<(), Error>;
}

/// Single JSON file holding `{"<user_id>": {"role": ..., "display_name": ...}}`.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn corrupt(&self, detail: impl Into<String>) -> Error {
        Error::CorruptState {
            path: self.path.display().to_string(),
            detail: detail.into(),
        }
    }
}

impl PersistenceBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<HashMap<u64, RoleAssignment>>, Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Persistence(e)),
        };

        let entries: HashMap<String, StoredEntry> =
            serde_json::from_str(&raw).map_err(|e| self.corrupt(e.to_string()))?;

        let mut assignments = HashMap::with_capacity(entries.len());
        for (key, entry) in entries {
            let user_id: u64 = key
                .parse()
                .map_err(|_| self.corrupt(format!("non-numeric user id '{key}'")))?;
            assignments.insert(
                user_id,
                RoleAssignment {
                    user_id,
                    display_name: entry.display_name,
                    role: entry.role,
                },
            );
        }
        Ok(Some(assignments))
    }

    fn save(&self, assignments: &HashMap<u64, RoleAssignment>) -> Result<(), Error> {
        let entries: HashMap<String, StoredEntry> = assignments
            .iter()
            .map(|(id, a)| {
                (
                    id.to_string(),
                    StoredEntry {
                        role: a.role,
                        display_name: a.display_name.clone(),
                    },
                )
            })
            .collect();

        // Unreachable for a string-keyed map of plain fields.
        let json = serde_json::to_string(&entries)
            .map_err(|e| Error::Persistence(std::io::Error::other(e)))?;
        fs::write(&self.path, json).map_err(Error::Persistence)
    }
}

/// Sole owner of the role map and the only writer of persisted state. Other
/// components query it or submit mutations through its API.
pub struct RoleStore {
    assignments: HashMap<u64, RoleAssignment>,
    backend: Box<dyn PersistenceBackend>,
}

impl std::fmt::Debug for RoleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleStore")
            .field("assignments", &self.assignments)
            .finish_non_exhaustive()
    }
}

impl RoleStore {
    /// Populates the store from durable storage at startup. Malformed stored
    /// data aborts rather than silently dropping assignments.
    pub fn load(backend: Box<dyn PersistenceBackend>) -> Result<Self, Error> {
        let assignments = backend.load()?.unwrap_or_default();
        info!(count = assignments.len(), "loaded role assignments");
        Ok(Self {
            assignments,
            backend,
        })
    }

    pub fn get(&self, user_id: u64) -> Option<&RoleAssignment> {
        self.assignments.get(&user_id)
    }

    pub fn count_by_role(&self, role: Role) -> usize {
        self.assignments.values().filter(|a| a.role == role).count()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterate all assignments in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleAssignment> {
        self.assignments.values()
    }

    /// Inserts or overwrites, then persists the whole map. On a persistence
    /// failure the in-memory change is kept (at-least-once write attempt);
    /// the caller decides what to surface.
    pub fn upsert(&mut self, user_id: u64, display_name: String, role: Role) -> Result<(), Error> {
        self.assignments.insert(
            user_id,
            RoleAssignment {
                user_id,
                display_name,
                role,
            },
        );
        self.backend.save(&self.assignments)
    }

    /// Empties the map and persists the empty state.
    pub fn clear_all(&mut self) -> Result<(), Error> {
        self.assignments.clear();
        self.backend.save(&self.assignments)
    }
}
