use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "phi3:mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    /// Process-level switch. When false the Reasoner never calls the delegate.
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    /// Upper bound on a single delegate call, transport included.
    #[serde(with = "secs")]
    pub timeout: Duration,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub delegate: DelegateConfig,
    /// Incident audit log.
    pub memory_path: PathBuf,
    /// Actor's action report log.
    pub action_log_path: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            delegate: DelegateConfig::default(),
            memory_path: PathBuf::from("agent_memory.json"),
            action_log_path: PathBuf::from("agent_state.json"),
        }
    }
}

impl AgentConfig {
    /// Resolve from environment on top of defaults. Only the binary calls this; the
    /// library takes the resolved values at construction.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(flag) = lookup("USE_LLM") {
            config.delegate.enabled = flag.trim().eq_ignore_ascii_case("true");
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            config.delegate.base_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            config.delegate.model = model;
        }
        if let Some(raw) = lookup("TRIAGE_DELEGATE_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => config.delegate.timeout = Duration::from_secs(secs),
                Err(e) => warn!(
                    "Ignoring TRIAGE_DELEGATE_TIMEOUT_SECS={:?} ({}); using {:?}",
                    raw, e, config.delegate.timeout
                ),
            }
        }
        if let Some(path) = lookup("TRIAGE_MEMORY_PATH") {
            config.memory_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("TRIAGE_ACTION_LOG_PATH") {
            config.action_log_path = PathBuf::from(path);
        }

        config
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
