use serde::{Deserialize, Serialize};

/// Discrete action requested for volume or media control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityAction {
    Up,
    Down,
    Mute,
    Unmute,
    Set,
    Play,
    Pause,
    Next,
    Previous,
    SearchAndPlay,
}

impl EntityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
            Self::Set => "set",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::SearchAndPlay => "search_and_play",
        }
    }
}

impl std::fmt::Display for EntityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters extracted from an utterance.
///
/// Every field is optional; which ones are filled depends on the intent.
/// Handlers treat a missing field as a reason to ask, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    /// Free-text search or lookup subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Application name as spoken ("spotify", "file manager").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<EntityAction>,
    /// Requested volume level. Clamped to 0–100 by the volume handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    /// Weather location, `"current"` when none was spoken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Entities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_app(app_name: impl Into<String>) -> Self {
        Self {
            app_name: Some(app_name.into()),
            ..Self::default()
        }
    }

    pub fn with_action(action: EntityAction) -> Self {
        Self {
            action: Some(action),
            ..Self::default()
        }
    }

    /// Query text, ignoring blank values.
    pub fn query(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    /// Application name, ignoring blank values.
    pub fn app_name(&self) -> Option<&str> {
        non_blank(self.app_name.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
