//! Utilities (external tool discovery).

use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// External tools handed to plugins when the parameters file leaves them out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: Option<String>,
    pub handbrake: Option<String>,
}

impl ToolPaths {
    /// Look both tools up in `search_path` (a `PATH`-style list).
    pub fn discover(search_path: &OsStr) -> Self {
        Self {
            ffmpeg: find_tool("ffmpeg", search_path),
            handbrake: find_tool("HandBrakeCLI", search_path),
        }
    }
}

pub fn find_tool(name: &str, search_path: &OsStr) -> Option<String> {
    find_in(name, search_path).map(|p| p.to_string_lossy().into_owned())
}

pub fn find_in(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .flat_map(|dir| candidates(&dir, name))
        .find(|p| is_executable(p))
}

fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![dir.join(format!("{}.exe", name)), dir.join(name)]
    } else {
        vec![dir.join(name)]
    }
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
