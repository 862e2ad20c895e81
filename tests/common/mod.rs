#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use plugin_runner::utils::ToolPaths;
use plugin_runner::{InvokerSettings, RuntimeMode};

/// Describe output of the shell fixtures.
pub const SAMPLE_DETAILS: &str = r#"{"id":"sample","Name":"Sample plugin","Inputs":[]}"#;

/// Write `<dir>/<id>.sh` answering `describe` with `details` and `transform` with `transform_body`.
pub fn write_sh_plugin(dir: &Path, id: &str, details: &str, transform_body: &str) -> PathBuf {
    let path = dir.join(format!("{}.sh", id));
    let script = format!(
        "#!/bin/sh\ncase \"$1\" in\n  describe)\n    echo '{}'\n    ;;\n  transform)\n{}\n    ;;\n  *)\n    echo \"unknown capability $1\" >&2\n    exit 64\n    ;;\nesac\n",
        details, transform_body
    );
    fs::write(&path, script).unwrap();
    path
}

/// Plugin whose transform ignores its input and returns `{"ok":true}`.
pub fn write_sample_plugin(dir: &Path) -> PathBuf {
    write_sh_plugin(
        dir,
        "sample",
        SAMPLE_DETAILS,
        "    cat > /dev/null\n    echo '{\"ok\":true}'",
    )
}

/// Plugin whose transform echoes the positional arguments it received.
pub fn write_echo_plugin(dir: &Path) -> PathBuf {
    write_sh_plugin(dir, "echo", r#"{"id":"echo"}"#, "    cat")
}

pub fn write_params(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("p.json");
    fs::write(&path, body).unwrap();
    path
}

pub fn settings(plugins_dir: &Path, user_home: &Path) -> InvokerSettings {
    InvokerSettings {
        runtime_mode: RuntimeMode::Development,
        data_dir_override: None,
        user_home: user_home.to_path_buf(),
        plugins_dir: plugins_dir.to_path_buf(),
        timeout: Some(Duration::from_secs(30)),
        tools: ToolPaths::default(),
    }
}

/// Parameters whose `inputs.blob` is `size` bytes, well past a pipe buffer when large.
pub fn write_large_params(dir: &Path, size: usize) -> PathBuf {
    let body = serde_json::json!({
        "file": "a.mkv",
        "inputs": { "blob": "x".repeat(size) },
    });
    write_params(dir, &body.to_string())
}
