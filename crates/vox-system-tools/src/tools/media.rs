//! Tool: Spotify / media player control.
//!
//! Linux talks MPRIS over `dbus-send`, macOS drives Spotify with
//! AppleScript, Windows falls back to media keys (nircmd, then PowerShell).

use vox_protocol::{ActionResult, EntityAction};

use crate::error::SystemError;
use crate::host::Host;
use crate::types::{Invocation, OsKind};

const MPRIS_DEST: &str = "org.mpris.MediaPlayer2.spotify";
const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";

/// Player transport commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Play,
    Pause,
    Next,
    Previous,
}

impl Transport {
    pub fn from_action(action: EntityAction) -> Option<Self> {
        match action {
            EntityAction::Play => Some(Self::Play),
            EntityAction::Pause => Some(Self::Pause),
            EntityAction::Next => Some(Self::Next),
            EntityAction::Previous => Some(Self::Previous),
            _ => None,
        }
    }

    fn mpris_method(&self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::Next => "Next",
            Self::Previous => "Previous",
        }
    }

    fn applescript(&self) -> &'static str {
        match self {
            Self::Play => "tell application \"Spotify\" to play",
            Self::Pause => "tell application \"Spotify\" to pause",
            Self::Next => "tell application \"Spotify\" to next track",
            Self::Previous => "tell application \"Spotify\" to previous track",
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::Play => "Playing Spotify.",
            Self::Pause => "Paused Spotify.",
            Self::Next => "Skipped to next track.",
            Self::Previous => "Went to previous track.",
        }
    }
}

/// Candidate command lines for a transport command, in fallback order.
pub fn transport_candidates(os: OsKind, transport: Transport) -> Vec<Invocation> {
    match os {
        OsKind::Linux => vec![Invocation::new(
            "dbus-send",
            [
                "--print-reply".to_string(),
                format!("--dest={MPRIS_DEST}"),
                MPRIS_PATH.to_string(),
                format!("org.mpris.MediaPlayer2.Player.{}", transport.mpris_method()),
            ],
        )],
        OsKind::MacOs => vec![Invocation::new("osascript", ["-e", transport.applescript()])],
        OsKind::Windows => {
            let (key, vk) = match transport {
                // Windows has a single play/pause toggle key.
                Transport::Play | Transport::Pause => ("media_play_pause", "0xB3"),
                Transport::Next => ("media_next", "0xB0"),
                Transport::Previous => ("media_prev", "0xB1"),
            };
            vec![
                Invocation::new("nircmd", ["sendkeypress", key]),
                Invocation::new(
                    "powershell",
                    [
                        "-NoProfile".to_string(),
                        "-Command".to_string(),
                        format!("(New-Object -ComObject WScript.Shell).SendKeys([char]{vk})"),
                    ],
                ),
            ]
        }
        OsKind::Other => Vec::new(),
    }
}

/// Spotify search URI with the query percent-encoded.
pub fn search_uri(query: &str) -> String {
    // Form encoding writes spaces as '+' and a literal '+' as %2B.
    let encoded: String = url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
    format!("spotify:search:{}", encoded.replace('+', "%20"))
}

fn opener(os: OsKind) -> Option<&'static str> {
    match os {
        OsKind::Linux => Some("xdg-open"),
        OsKind::MacOs => Some("open"),
        OsKind::Windows => Some("explorer"),
        OsKind::Other => None,
    }
}

/// Drive the media player. `action` defaults to play.
pub async fn control_media(
    host: &dyn Host,
    action: Option<EntityAction>,
    query: Option<&str>,
) -> ActionResult {
    let os = host.os();
    let action = action.unwrap_or(EntityAction::Play);

    if action == EntityAction::SearchAndPlay {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return ActionResult::clarify("What would you like me to search for on Spotify?");
        };
        let Some(opener) = opener(os) else {
            return unsupported();
        };
        let uri = search_uri(query);
        return match host.spawn_detached(&Invocation::new(opener, [uri.as_str()])).await {
            Ok(()) => ActionResult::success(format!("Searching for '{query}' on Spotify."))
                .with_data(serde_json::json!({ "uri": uri })),
            Err(e) => {
                tracing::warn!(error = %e, "spotify search launch failed");
                ActionResult::failure("I couldn't open Spotify search.", e.to_string())
            }
        };
    }

    let Some(transport) = Transport::from_action(action) else {
        return ActionResult::clarify(format!("Unknown Spotify action: {action}"));
    };
    if os == OsKind::Other {
        return unsupported();
    }

    match host.run_first(&transport_candidates(os, transport)).await {
        Ok(_) => {
            tracing::info!(?transport, "media command sent");
            ActionResult::success(transport.summary())
        }
        Err(e) => {
            tracing::warn!(?transport, error = %e, "media command failed");
            let summary = match os {
                OsKind::Linux => "Spotify is not running or dbus control is not available.",
                OsKind::MacOs => "Spotify is not running or AppleScript control failed.",
                _ => "Could not control Spotify. Make sure it's running.",
            };
            ActionResult::failure(summary, e.to_string())
        }
    }
}

fn unsupported() -> ActionResult {
    ActionResult::failure(
        format!("Spotify control is not supported on {}.", std::env::consts::OS),
        SystemError::Unsupported("spotify control".into()).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHost;

    #[test]
    fn search_uri_encodes_spaces() {
        assert_eq!(search_uri(" some jazz "), "spotify:search:some%20jazz");
    }

    #[test]
    fn search_uri_encodes_reserved_characters() {
        assert_eq!(
            search_uri("AC/DC & friends"),
            "spotify:search:AC%2FDC%20%26%20friends"
        );
        assert_eq!(search_uri("c+c music?"), "spotify:search:c%2Bc%20music%3F");
        assert_eq!(search_uri("café"), "spotify:search:caf%C3%A9");
    }

    #[tokio::test]
    async fn unsupported_platform_is_reported() {
        let host = MockHost::new(OsKind::Other);
        let result = control_media(&host, Some(EntityAction::Next), None).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("spotify control is not supported on this platform")
        );
    }

    #[test]
    fn linux_uses_mpris() {
        let c = transport_candidates(OsKind::Linux, Transport::Next);
        assert_eq!(
            c[0].command_line(),
            "dbus-send --print-reply --dest=org.mpris.MediaPlayer2.spotify /org/mpris/MediaPlayer2 org.mpris.MediaPlayer2.Player.Next"
        );
    }

    #[tokio::test]
    async fn default_action_is_play() {
        let host = MockHost::new(OsKind::MacOs);
        let result = control_media(&host, None, None).await;
        assert!(result.success);
        assert_eq!(result.summary, "Playing Spotify.");
        assert_eq!(
            host.last_invocation().unwrap().args,
            vec!["-e", "tell application \"Spotify\" to play"]
        );
    }

    #[tokio::test]
    async fn search_and_play_opens_uri() {
        let host = MockHost::new(OsKind::Linux);
        let result =
            control_media(&host, Some(EntityAction::SearchAndPlay), Some("some jazz")).await;
        assert!(result.success);
        assert_eq!(result.summary, "Searching for 'some jazz' on Spotify.");
        let inv = host.last_invocation().unwrap();
        assert_eq!(inv.program, "xdg-open");
        assert_eq!(inv.args, vec!["spotify:search:some%20jazz"]);
    }

    #[tokio::test]
    async fn search_without_query_asks() {
        let host = MockHost::new(OsKind::Linux);
        let result = control_media(&host, Some(EntityAction::SearchAndPlay), None).await;
        assert!(!result.success);
        assert_eq!(result.summary, "What would you like me to search for on Spotify?");
        assert!(host.invocations().is_empty());
    }

    #[tokio::test]
    async fn dbus_failure_is_reported() {
        let host = MockHost::new(OsKind::Linux);
        host.fail_program("dbus-send");
        let result = control_media(&host, Some(EntityAction::Pause), None).await;
        assert!(!result.success);
        assert_eq!(
            result.summary,
            "Spotify is not running or dbus control is not available."
        );
    }

    #[tokio::test]
    async fn windows_falls_back_to_powershell() {
        let host = MockHost::new(OsKind::Windows);
        host.fail_program("nircmd");
        let result = control_media(&host, Some(EntityAction::Previous), None).await;
        assert!(result.success);
        assert_eq!(host.programs_run(), vec!["nircmd", "powershell"]);
    }

    #[tokio::test]
    async fn non_media_action_is_rejected() {
        let host = MockHost::new(OsKind::Linux);
        let result = control_media(&host, Some(EntityAction::Mute), None).await;
        assert!(!result.success);
        assert_eq!(result.summary, "Unknown Spotify action: mute");
    }
}
