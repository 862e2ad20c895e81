//! Runner configuration: defaults, `.runnerrc` and environment overlay.

use std::{
    collections::HashMap,
    env,
    ffi::OsStr,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

use crate::utils::ToolPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Production,
    Development,
}

impl RuntimeMode {
    pub fn from_flag(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }
}

/// Everything the invoker needs, resolved up front so it never reads the environment.
#[derive(Debug, Clone)]
pub struct InvokerSettings {
    pub runtime_mode: RuntimeMode,
    pub data_dir_override: Option<PathBuf>,
    pub user_home: PathBuf,
    pub plugins_dir: PathBuf,
    pub timeout: Option<Duration>,
    pub tools: ToolPaths,
}

impl InvokerSettings {
    pub fn home_path(&self) -> PathBuf {
        resolve_home_path(
            self.runtime_mode,
            self.data_dir_override.as_deref(),
            &self.user_home,
        )
    }
}

/// Production honours the data directory override; everything else lands in `~/Documents`.
pub fn resolve_home_path(
    mode: RuntimeMode,
    data_dir_override: Option<&Path>,
    user_home: &Path,
) -> PathBuf {
    match (mode, data_dir_override) {
        (RuntimeMode::Production, Some(dir)) => dir.to_path_buf(),
        _ => user_home.join("Documents"),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        let config_path = default_config_path();
        let mut cfg = Self::from_file(&config_path);

        // Environment takes precedence over the rc file
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                cfg.inner.insert(k, v);
            }
        }

        cfg
    }

    /// Defaults overlaid with `path` when it exists. No environment lookup.
    pub fn from_file(path: &Path) -> Self {
        let mut map = default_map();

        if let Ok(file) = fs::File::open(path) {
            let reader = BufReader::new(file);
            for line in reader.lines().map_while(std::io::Result::ok) {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((k, v)) = line.split_once('=') {
                    map.insert(k.trim().to_string(), v.trim().to_string());
                }
            }
        }

        Self { inner: map }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn runtime_mode(&self) -> RuntimeMode {
        self.get("PLUGIN_RUNNER_MODE")
            .map(|v| RuntimeMode::from_flag(&v))
            .unwrap_or(RuntimeMode::Development)
    }

    pub fn data_dir_override(&self) -> Option<PathBuf> {
        self.get("PLUGIN_RUNNER_DATA")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn plugins_path(&self) -> PathBuf {
        self.get("PLUGINS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| config_base().join("plugins").join("Community"))
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.get_u64("PLUGIN_TIMEOUT") {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }

    /// Explicit tool paths from the config win over a search of `PATH`.
    pub fn tool_paths(&self) -> ToolPaths {
        let found = self
            .get("PATH")
            .map(|p| ToolPaths::discover(OsStr::new(&p)))
            .unwrap_or_default();
        ToolPaths {
            ffmpeg: self.get("FFMPEG_PATH").or(found.ffmpeg),
            handbrake: self.get("HANDBRAKE_PATH").or(found.handbrake),
        }
    }

    pub fn invoker_settings(&self) -> Result<InvokerSettings> {
        let user_home = BaseDirs::new().map(|b| b.home_dir().to_path_buf());
        self.settings_for_home(user_home)
    }

    fn settings_for_home(&self, user_home: Option<PathBuf>) -> Result<InvokerSettings> {
        let user_home =
            user_home.ok_or_else(|| anyhow!("Cannot determine user home directory"))?;
        Ok(InvokerSettings {
            runtime_mode: self.runtime_mode(),
            data_dir_override: self.data_dir_override(),
            user_home,
            plugins_dir: self.plugins_path(),
            timeout: self.timeout(),
            tools: self.tool_paths(),
        })
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "PLUGINS_PATH",
        "PLUGIN_TIMEOUT",
        "FFMPEG_PATH",
        "HANDBRAKE_PATH",
        "PATH",
    ];

    KEYS.contains(&k) || k.starts_with("PLUGIN_RUNNER_")
}

fn config_base() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("plugin_runner")
}

fn default_config_path() -> PathBuf {
    config_base().join(".runnerrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert(
        "PLUGINS_PATH".into(),
        config_base()
            .join("plugins")
            .join("Community")
            .to_string_lossy()
            .into_owned(),
    );
    m.insert("PLUGIN_RUNNER_MODE".into(), "development".into());
    m.insert("PLUGIN_TIMEOUT".into(), "0".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn development_ignores_data_override() {
        let home = Path::new("/home/alice");
        let path = resolve_home_path(
            RuntimeMode::Development,
            Some(Path::new("/srv/data")),
            home,
        );
        assert_eq!(path, PathBuf::from("/home/alice/Documents"));
    }

    #[test]
    fn production_uses_data_override() {
        let home = Path::new("/home/alice");
        let path = resolve_home_path(RuntimeMode::Production, Some(Path::new("/srv/data")), home);
        assert_eq!(path, PathBuf::from("/srv/data"));
    }

    #[test]
    fn production_without_override_falls_back_to_documents() {
        let home = Path::new("/home/alice");
        let path = resolve_home_path(RuntimeMode::Production, None, home);
        assert_eq!(path, PathBuf::from("/home/alice/Documents"));
    }

    #[test]
    fn runtime_mode_flag_is_case_insensitive() {
        assert_eq!(RuntimeMode::from_flag("PRODUCTION"), RuntimeMode::Production);
        assert_eq!(RuntimeMode::from_flag("dev"), RuntimeMode::Development);
        assert_eq!(RuntimeMode::from_flag(""), RuntimeMode::Development);
    }

    #[test]
    fn rc_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".runnerrc");
        let mut f = fs::File::create(&rc).unwrap();
        writeln!(f, "# comment").unwrap();
        writeln!(f, "PLUGIN_RUNNER_MODE = production").unwrap();
        writeln!(f, "PLUGIN_RUNNER_DATA=/srv/unmanic").unwrap();
        writeln!(f, "PLUGIN_TIMEOUT=30").unwrap();
        writeln!(f, "PLUGINS_PATH=/opt/plugins").unwrap();

        let cfg = Config::from_file(&rc);
        assert_eq!(cfg.runtime_mode(), RuntimeMode::Production);
        assert_eq!(cfg.data_dir_override(), Some(PathBuf::from("/srv/unmanic")));
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.plugins_path(), PathBuf::from("/opt/plugins"));
    }

    #[test]
    fn missing_rc_file_keeps_defaults() {
        let cfg = Config::from_file(Path::new("/nonexistent/.runnerrc"));
        assert_eq!(cfg.runtime_mode(), RuntimeMode::Development);
        assert_eq!(cfg.data_dir_override(), None);
        assert_eq!(cfg.timeout(), None);
        assert!(cfg.plugins_path().ends_with("Community"));
    }

    #[test]
    fn blank_data_override_is_unset() {
        let mut cfg = Config::from_file(Path::new("/nonexistent/.runnerrc"));
        cfg.set("PLUGIN_RUNNER_DATA", "  ");
        assert_eq!(cfg.data_dir_override(), None);
    }

    #[test]
    fn settings_carry_resolved_values() {
        let mut cfg = Config::from_file(Path::new("/nonexistent/.runnerrc"));
        cfg.set("PLUGIN_RUNNER_MODE", "production");
        cfg.set("PLUGIN_RUNNER_DATA", "/data");
        let settings = cfg.settings_for_home(Some("/home/u".into())).unwrap();
        assert_eq!(settings.home_path(), PathBuf::from("/data"));
    }

    #[test]
    fn missing_user_home_is_an_error() {
        let cfg = Config::from_file(Path::new("/nonexistent/.runnerrc"));
        let err = cfg.settings_for_home(None).unwrap_err();
        assert!(err.to_string().contains("home directory"));
    }

    #[test]
    fn configured_tool_path_beats_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::from_file(Path::new("/nonexistent/.runnerrc"));
        cfg.set("PATH", dir.path().to_string_lossy());
        cfg.set("FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg");

        let tools = cfg.tool_paths();
        assert_eq!(tools.ffmpeg.as_deref(), Some("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(tools.handbrake, None);
    }
}
