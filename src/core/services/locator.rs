//! Step locator - discovers and orders step directories

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::core::models::{StepEntry, StepId};
use crate::error::{Result, StepsError, io_err};

/// List the step directories directly under `root`, in step order
///
/// Only directories whose name starts with a decimal digit are considered.
/// Ordering is lexicographic by name, so `10` sorts before `9` unless the
/// operator zero-pads. A missing root yields an empty list; callers decide
/// whether that is fatal.
pub fn list(root: &Path) -> Result<Vec<StepEntry>> {
    if !root.is_dir() {
        debug!("no step directory at {}", root.display());
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| io_err(root, e))? {
        let entry = entry.map_err(|e| io_err(root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        if let Some(id) = StepId::from_dir_name(&name) {
            entries.push(StepEntry { id, name, path });
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut seen: HashMap<&StepId, &Path> = HashMap::new();
    for entry in &entries {
        if let Some(first) = seen.insert(&entry.id, &entry.path) {
            return Err(StepsError::DuplicateStepId {
                id: entry.id.to_string(),
                first: first.to_path_buf(),
                second: entry.path.clone(),
            });
        }
    }

    debug!("found {} step directories in {}", entries.len(), root.display());
    Ok(entries)
}
