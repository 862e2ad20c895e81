//! Plugin discovery: id validation, path resolution and the directory catalog.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{InvokeError, Result};
use crate::process::Launcher;
use crate::utils;

/// Extensions tried after the bare id, in order.
pub const EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "py", "sh"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub id: String,
    pub path: PathBuf,
    pub launcher: Launcher,
}

impl PluginDescriptor {
    pub fn resolve(dir: &Path, id: &str) -> Result<Self> {
        validate_id(id)?;

        // A bare file only counts when it can be executed directly.
        let bare = Some(dir.join(id)).filter(|p| utils::is_executable(p));
        let path = bare
            .into_iter()
            .chain(
                EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{}.{}", id, ext)))
                    .filter(|p| p.is_file()),
            )
            .next()
            .ok_or_else(|| InvokeError::NotFound {
                id: id.to_string(),
                dir: dir.to_path_buf(),
            })?;

        tracing::debug!(plugin = id, path = %path.display(), "resolved plugin");
        Ok(Self {
            id: id.to_string(),
            launcher: Launcher::for_path(&path),
            path,
        })
    }
}

/// Ids are plain file stems; anything that could walk out of the plugins dir is refused.
pub fn validate_id(id: &str) -> Result<()> {
    let bad = id.trim().is_empty()
        || id.starts_with('.')
        || id.contains("..")
        || id.contains('/')
        || id.contains('\\')
        || id.contains('\0');
    if bad {
        return Err(InvokeError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Sorted, de-duplicated ids of every loadable plugin file in `dir`.
pub fn list_ids(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| InvokeError::Catalog {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut ids: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| match p.extension().and_then(|s| s.to_str()) {
            None => utils::is_executable(p),
            Some(ext) => EXTENSIONS.contains(&ext),
        })
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .filter(|id| validate_id(id).is_ok())
        .collect();
    ids.sort();
    ids.dedup();
    Ok(ids)
}
