//! Parameters file parsing and the "other arguments" bundle handed to plugins.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{InvokeError, Result};
use crate::utils::ToolPaths;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionParameters {
    pub file: String,
    #[serde(default = "empty_object")]
    pub library_settings: Value,
    #[serde(default = "empty_object")]
    pub inputs: Value,
    #[serde(default)]
    pub other_arguments: OtherArgumentsInput,
}

/// Caller-provided part of the bundle. Unknown keys are kept and passed through.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherArgumentsInput {
    #[serde(default)]
    pub ffmpeg_path: Option<String>,
    #[serde(default)]
    pub handbrake_path: Option<String>,
    #[serde(default)]
    pub original_library_file: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherArguments {
    pub home_path: String,
    pub ffmpeg_path: Option<String>,
    pub handbrake_path: Option<String>,
    pub original_library_file: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl ExecutionParameters {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| InvokeError::ParameterFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| InvokeError::ParameterFileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Tool paths missing from the parameters file fall back to `tools`.
    pub fn other_arguments(&self, home_path: &Path, tools: &ToolPaths) -> OtherArguments {
        let given = &self.other_arguments;
        OtherArguments {
            home_path: home_path.to_string_lossy().into_owned(),
            ffmpeg_path: given
                .ffmpeg_path
                .clone()
                .or_else(|| tools.ffmpeg.clone()),
            handbrake_path: given
                .handbrake_path
                .clone()
                .or_else(|| tools.handbrake.clone()),
            original_library_file: given.original_library_file.clone(),
            extra: given.extra.clone(),
        }
    }

    /// The four positional transform arguments, in call order.
    pub fn transform_args(&self, home_path: &Path, tools: &ToolPaths) -> Value {
        let other = serde_json::to_value(self.other_arguments(home_path, tools))
            .unwrap_or_else(|_| empty_object());
        Value::Array(vec![
            Value::String(self.file.clone()),
            self.library_settings.clone(),
            self.inputs.clone(),
            other,
        ])
    }
}
