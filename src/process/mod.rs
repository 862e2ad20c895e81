//! Plugin process spawning: one fresh process per capability call.

use std::{path::Path, process::Stdio, time::Duration};

use serde_json::Value;
use tokio::{io::AsyncWriteExt, process::Command, time::timeout};
use tracing::debug;

use crate::error::{InvokeError, Result};
use crate::plugin::PluginDescriptor;

/// How a plugin file gets started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    Node,
    Python,
    Shell,
    /// Executed as-is; must carry its own shebang or be a native binary.
    Direct,
}

impl Launcher {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("js" | "mjs" | "cjs") => Self::Node,
            Some("py") => Self::Python,
            Some("sh") => Self::Shell,
            _ => Self::Direct,
        }
    }

    pub fn interpreter(&self) -> Option<&'static str> {
        match self {
            Self::Node => Some("node"),
            Self::Python if cfg!(windows) => Some("python"),
            Self::Python => Some("python3"),
            Self::Shell => Some("sh"),
            Self::Direct => None,
        }
    }

    fn command(&self, plugin: &Path) -> Command {
        match self.interpreter() {
            Some(program) => {
                let mut cmd = Command::new(program);
                cmd.arg(plugin);
                cmd
            }
            None => Command::new(plugin),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Describe,
    Transform,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Describe => "describe",
            Self::Transform => "transform",
        }
    }
}

/// Run one capability of `plugin`. `payload`, when given, is written to stdin as JSON.
/// The plugin's stdout must be a single JSON document.
pub async fn call(
    plugin: &PluginDescriptor,
    capability: Capability,
    payload: Option<&Value>,
    limit: Option<Duration>,
) -> Result<Value> {
    let mut cmd = plugin.launcher.command(&plugin.path);
    cmd.arg(capability.as_str())
        .stdin(if payload.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(
        plugin = %plugin.id,
        path = %plugin.path.display(),
        capability = capability.as_str(),
        "spawning plugin"
    );

    let mut child = cmd.spawn().map_err(|e| InvokeError::PluginLoad {
        id: plugin.id.clone(),
        reason: format!(
            "failed to spawn {} ({:?}): {}",
            plugin.path.display(),
            plugin.launcher,
            e
        ),
    })?;

    let body = payload.map(|p| serde_json::to_vec(p).unwrap_or_default());
    let stdin = child.stdin.take();
    let feed = async move {
        if let (Some(mut stdin), Some(body)) = (stdin, body) {
            // A plugin that ignores stdin may already have exited; that is not an error.
            stdin.write_all(&body).await.ok();
            stdin.shutdown().await.ok();
        }
    };
    // stdout/stderr are drained while stdin is fed, and the limit covers both.
    let run = async move {
        let ((), out) = tokio::join!(feed, child.wait_with_output());
        out
    };

    let out = match limit {
        Some(after) => timeout(after, run)
            .await
            .map_err(|_| InvokeError::Timeout {
                id: plugin.id.clone(),
                after,
            })?,
        None => run.await,
    }
    .map_err(|e| InvokeError::PluginExecution {
        id: plugin.id.clone(),
        reason: format!("failed to collect output: {}", e),
    })?;

    let stderr = String::from_utf8_lossy(&out.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        debug!(plugin = %plugin.id, stderr = %stderr, "plugin stderr");
    }

    if !out.status.success() {
        let code = out
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".into());
        let mut reason = format!("exit code {}", code);
        if !stderr.is_empty() {
            reason.push_str(": ");
            reason.push_str(stderr);
        }
        return Err(InvokeError::PluginExecution {
            id: plugin.id.clone(),
            reason,
        });
    }
    debug!(plugin = %plugin.id, "plugin exited cleanly");

    let stdout = String::from_utf8_lossy(&out.stdout);
    let stdout = stdout.trim();
    if stdout.is_empty() {
        return Err(InvokeError::PluginExecution {
            id: plugin.id.clone(),
            reason: format!("{} produced no output", capability.as_str()),
        });
    }
    serde_json::from_str(stdout).map_err(|e| InvokeError::PluginExecution {
        id: plugin.id.clone(),
        reason: format!("{} returned invalid JSON: {}", capability.as_str(), e),
    })
}
