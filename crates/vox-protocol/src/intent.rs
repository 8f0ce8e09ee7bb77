use serde::{Deserialize, Serialize};

/// The classified purpose of an utterance.
///
/// Built-in tags form a closed set. `Custom` carries tags registered at
/// runtime by host extensions; it never collides with a built-in name
/// because `From<String>` maps known names back to their variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Intent {
    WebSearch,
    OpenApp,
    CloseApp,
    SystemInfo,
    Screenshot,
    VolumeControl,
    Time,
    Date,
    Weather,
    Wikipedia,
    SpotifyControl,
    StopListening,
    Help,
    Greeting,
    ListProcesses,
    /// Catch-all when no rule matches.
    GeneralQuery,
    Custom(String),
}

impl Intent {
    /// Every built-in intent, in classifier table order, followed by the fallback.
    pub const BUILTIN: [Intent; 16] = [
        Self::WebSearch,
        Self::OpenApp,
        Self::CloseApp,
        Self::SystemInfo,
        Self::Screenshot,
        Self::VolumeControl,
        Self::Time,
        Self::Date,
        Self::Weather,
        Self::Wikipedia,
        Self::SpotifyControl,
        Self::StopListening,
        Self::Help,
        Self::Greeting,
        Self::ListProcesses,
        Self::GeneralQuery,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::WebSearch => "web_search",
            Self::OpenApp => "open_app",
            Self::CloseApp => "close_app",
            Self::SystemInfo => "system_info",
            Self::Screenshot => "screenshot",
            Self::VolumeControl => "volume_control",
            Self::Time => "time",
            Self::Date => "date",
            Self::Weather => "weather",
            Self::Wikipedia => "wikipedia",
            Self::SpotifyControl => "spotify_control",
            Self::StopListening => "stop_listening",
            Self::Help => "help",
            Self::Greeting => "greeting",
            Self::ListProcesses => "list_processes",
            Self::GeneralQuery => "general_query",
            Self::Custom(name) => name,
        }
    }

    /// Human phrasing of the tag ("open_app" → "open app"), used in prompts.
    pub fn spoken(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl From<&str> for Intent {
    fn from(tag: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|i| i.as_str() == tag)
            .cloned()
            .unwrap_or_else(|| Self::Custom(tag.to_string()))
    }
}

impl From<String> for Intent {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.as_str().to_string()
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
