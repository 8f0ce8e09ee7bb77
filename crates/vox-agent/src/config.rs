//! Agent configuration, loadable from TOML.

use serde::Deserialize;
use vox_search_tools::SearchConfig;
use vox_system_tools::SystemConfig;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Name the assistant introduces itself with.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    /// Pause between listen cycles, in milliseconds.
    #[serde(default = "default_idle_pause_ms")]
    pub idle_pause_ms: u64,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_assistant_name() -> String {
    "Vox".into()
}

fn default_idle_pause_ms() -> u64 {
    500
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            idle_pause_ms: default_idle_pause_ms(),
            speech: SpeechConfig::default(),
            system: SystemConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Speech I/O settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// How long one `listen` waits for an utterance.
    #[serde(default = "default_listen_timeout_secs")]
    pub listen_timeout_secs: u64,
    /// Program and leading arguments used to voice replies, e.g. `["espeak"]`.
    /// The reply text is appended as the last argument.
    #[serde(default)]
    pub tts_command: Option<Vec<String>>,
    #[serde(default = "default_wake_words")]
    pub wake_words: Vec<String>,
    /// Ignore utterances that do not start with a wake word.
    #[serde(default)]
    pub require_wake_word: bool,
}

fn default_listen_timeout_secs() -> u64 {
    5
}

fn default_wake_words() -> Vec<String> {
    ["hey vox", "ok vox", "vox"].map(String::from).to_vec()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            listen_timeout_secs: default_listen_timeout_secs(),
            tts_command: None,
            wake_words: default_wake_words(),
            require_wake_word: false,
        }
    }
}
