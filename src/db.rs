//! File-backed snapshot of the collections the engine reads.
//!
//! The snapshot is a single JSON document holding projects, tasks and time-log
//! entries. It stands in for the external task store when the engine is driven
//! from the command line.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{Project, Task, TaskId, TimeLogEntry};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub time_logs: Vec<TimeLogEntry>,
}

impl Snapshot {
    /// Load from JSON. A missing file is an empty snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no snapshot file, starting empty");
            return Ok(Snapshot::default());
        }
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        let snapshot: Snapshot =
            serde_json::from_str(&buf).map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;
        tracing::debug!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            time_logs = snapshot.time_logs.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Save to JSON via temp file + rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let io_err = |source: std::io::Error| Error::Io { path: path.to_path_buf(), source };
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)
            .map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;
        let mut f = File::create(&tmp).map_err(io_err)?;
        f.write_all(data.as_bytes()).map_err(io_err)?;
        f.flush().map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Resolve a task by id or case-insensitive name. Ambiguous names are an
    /// error listing the candidates.
    pub fn resolve_task(&self, identifier: &str) -> std::result::Result<TaskId, String> {
        if let Ok(id) = identifier.parse::<TaskId>() {
            return match self.get(id) {
                Some(_) => Ok(id),
                None => Err(format!("Task with ID {id} not found")),
            };
        }
        let wanted = identifier.to_lowercase();
        let matches: Vec<&Task> = self.tasks.iter().filter(|t| t.name.to_lowercase() == wanted).collect();
        match matches.as_slice() {
            [] => Err(format!("No task found with name '{identifier}'")),
            [only] => Ok(only.id),
            many => {
                let mut msg = format!("Multiple tasks found with name '{identifier}':\n");
                for t in many {
                    msg.push_str(&format!("  ID {}: {} (project #{})\n", t.id, t.name, t.project_id));
                }
                msg.push_str("Please use the specific ID instead.");
                Err(msg)
            }
        }
    }
}
