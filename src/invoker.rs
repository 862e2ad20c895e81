//! Describe/execute/list operations. Every plugin failure is folded into a
//! [`FunctionResponse`]; nothing a plugin does escapes as an `Err`.

use std::path::Path;

use serde_json::{Map, Value};

use crate::{
    config::InvokerSettings,
    error::Result,
    params::ExecutionParameters,
    plugin::{self, PluginDescriptor},
    process::{self, Capability},
    response::FunctionResponse,
};

#[derive(Debug, Clone)]
pub struct Invoker {
    settings: InvokerSettings,
}

impl Invoker {
    pub fn new(settings: InvokerSettings) -> Self {
        Self { settings }
    }

    pub fn resolve(&self, id: &str) -> Result<PluginDescriptor> {
        PluginDescriptor::resolve(&self.settings.plugins_dir, id)
    }

    pub async fn describe(&self, id: &str) -> FunctionResponse {
        FunctionResponse::from_result(self.try_describe(id).await)
    }

    async fn try_describe(&self, id: &str) -> Result<Value> {
        let plugin = self.resolve(id)?;
        process::call(&plugin, Capability::Describe, None, self.settings.timeout).await
    }

    pub async fn execute(&self, id: &str, parameters: &Path) -> FunctionResponse {
        FunctionResponse::from_result(self.try_execute(id, parameters).await)
    }

    async fn try_execute(&self, id: &str, parameters: &Path) -> Result<Value> {
        // Parameters first: a bad file must never start the plugin.
        let params = ExecutionParameters::from_file(parameters)?;
        let home = self.settings.home_path();
        let plugin = self.resolve(id)?;
        let args = params.transform_args(&home, &self.settings.tools);
        tracing::debug!(plugin = id, file = %params.file, home = %home.display(), "executing plugin");
        process::call(
            &plugin,
            Capability::Transform,
            Some(&args),
            self.settings.timeout,
        )
        .await
    }

    pub fn list(&self) -> FunctionResponse {
        FunctionResponse::from_result(
            plugin::list_ids(&self.settings.plugins_dir)
                .map(|ids| Value::Array(ids.into_iter().map(Value::String).collect())),
        )
    }

    /// Describe every listed plugin, one process at a time, in id order.
    /// A plugin that fails to describe still appears, as `{"id": ...}` only.
    pub async fn list_details(&self) -> FunctionResponse {
        let ids = match plugin::list_ids(&self.settings.plugins_dir) {
            Ok(ids) => ids,
            Err(e) => return FunctionResponse::from_result(Err(e)),
        };

        let mut details = Vec::with_capacity(ids.len());
        for id in ids {
            let mut entry = match self.try_describe(&id).await {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    tracing::warn!(plugin = %id, data = %other, "plugin details are not an object");
                    Map::new()
                }
                Err(e) => {
                    tracing::warn!(plugin = %id, error = %e, "failed to describe plugin");
                    Map::new()
                }
            };
            entry.insert("id".into(), Value::String(id));
            details.push(Value::Object(entry));
        }
        FunctionResponse::ok(Value::Array(details))
    }
}
