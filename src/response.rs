//! The success/errors/data envelope returned by every invoker operation.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvokeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub data: Value,
}

impl FunctionResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            data,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            errors: vec![error.to_string()],
            data: Value::Null,
        }
    }

    pub fn from_result(result: Result<Value, InvokeError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                tracing::warn!(error = %e, "plugin call failed");
                Self::failed(e)
            }
        }
    }

    pub fn to_json(&self, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        // Value/String/bool fields cannot fail to serialize.
        rendered.unwrap_or_default()
    }

    /// Overwrites `path` with the compact JSON form.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let body = serde_json::to_string(self)?;
        fs::write(path, body)
            .with_context(|| format!("writing results file: {}", path.display()))?;
        Ok(())
    }
}
