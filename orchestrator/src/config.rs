//! Configuration loading (orchestrator.toml)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::agent_config::AgentSpec;
use crate::workflow::Workflow;

/// Default config file name
pub const CONFIG_FILE: &str = "orchestrator.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/maestro/
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("maestro").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Top-level configuration (from orchestrator.toml)
#[derive(Debug, Default, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub orchestrator: EngineSectionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Agents registered at startup
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
    /// Workflows created at startup
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

/// Engine configuration section
#[derive(Debug, Default, Deserialize)]
pub struct EngineSectionConfig {
    /// Bound on a single dispatch; unset or 0 means wait indefinitely
    pub dispatch_timeout_ms: Option<u64>,
    /// Directory of additional workflow files (one workflow per *.toml)
    pub workflows_dir: Option<PathBuf>,
}

/// HTTP server configuration section
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl OrchestratorConfig {
    /// Load config from an explicit path, or search for orchestrator.toml.
    ///
    /// Falls back to defaults when no file is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        if let Some(config_path) = find_config_file(CONFIG_FILE) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Parse from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_agent::AgentKind;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::from_toml("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(config.orchestrator.dispatch_timeout_ms.is_none());
        assert!(config.agents.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = OrchestratorConfig::from_toml(
            r#"
            [orchestrator]
            dispatch_timeout_ms = 1500

            [server]
            port = 9090

            [[agents]]
            kind = "task_automation"
            name = "automation"

            [[agents]]
            kind = "text"

            [[workflows]]
            name = "shout"

            [[workflows.steps]]
            agent = "automation"
            task = "Process data"

            [[workflows.steps]]
            agent = "TextAgent"
            task = "upper"
            use_previous_result = true
            "#,
        )
        .unwrap();

        assert_eq!(config.orchestrator.dispatch_timeout_ms, Some(1500));
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[1].kind, AgentKind::Text);
        assert_eq!(config.workflows[0].steps.len(), 2);
        assert!(config.workflows[0].steps[1].use_previous_result);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\n").unwrap();

        let config = OrchestratorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");

        assert!(OrchestratorConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
