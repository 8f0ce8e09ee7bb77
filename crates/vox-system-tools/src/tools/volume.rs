//! Tool: master volume control.
//!
//! Linux tries ALSA (`amixer`) and falls back to PulseAudio (`pactl`).
//! macOS uses AppleScript. Windows tries `nircmd` and falls back to
//! PowerShell media-key presses, which cannot set an absolute level.

use vox_protocol::{ActionResult, EntityAction};

use crate::error::SystemError;
use crate::host::Host;
use crate::types::{Invocation, OsKind};

/// Relative step for up/down, in percent.
pub const STEP_PERCENT: u32 = 10;

/// A validated volume request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCommand {
    Up,
    Down,
    Mute,
    Unmute,
    /// Absolute level, already clamped to 0–100.
    Set(u32),
}

impl VolumeCommand {
    /// Build from extracted entities. A level always wins over the action.
    pub fn from_parts(action: Option<EntityAction>, level: Option<u32>) -> Option<Self> {
        if let Some(level) = level {
            return Some(Self::Set(level.min(100)));
        }
        match action? {
            EntityAction::Up => Some(Self::Up),
            EntityAction::Down => Some(Self::Down),
            EntityAction::Mute => Some(Self::Mute),
            EntityAction::Unmute => Some(Self::Unmute),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Up => "Volume increased.".into(),
            Self::Down => "Volume decreased.".into(),
            Self::Mute => "Volume muted.".into(),
            Self::Unmute => "Volume unmuted.".into(),
            Self::Set(level) => format!("Volume set to {level}%."),
        }
    }
}

/// Candidate command lines for `cmd` on `os`, in fallback order.
pub fn candidates(os: OsKind, cmd: VolumeCommand) -> Vec<Invocation> {
    match os {
        OsKind::Linux => {
            let amixer = match cmd {
                VolumeCommand::Up => format!("{STEP_PERCENT}%+"),
                VolumeCommand::Down => format!("{STEP_PERCENT}%-"),
                VolumeCommand::Mute => "mute".into(),
                VolumeCommand::Unmute => "unmute".into(),
                VolumeCommand::Set(level) => format!("{level}%"),
            };
            let (verb, value) = match cmd {
                VolumeCommand::Up => ("set-sink-volume", format!("+{STEP_PERCENT}%")),
                VolumeCommand::Down => ("set-sink-volume", format!("-{STEP_PERCENT}%")),
                VolumeCommand::Mute => ("set-sink-mute", "1".to_string()),
                VolumeCommand::Unmute => ("set-sink-mute", "0".to_string()),
                VolumeCommand::Set(level) => ("set-sink-volume", format!("{level}%")),
            };
            vec![
                Invocation::new("amixer", ["set".to_string(), "Master".to_string(), amixer]),
                Invocation::new("pactl", [verb.to_string(), "@DEFAULT_SINK@".to_string(), value]),
            ]
        }
        OsKind::MacOs => {
            let script = match cmd {
                VolumeCommand::Up => format!(
                    "set volume output volume ((output volume of (get volume settings)) + {STEP_PERCENT})"
                ),
                VolumeCommand::Down => format!(
                    "set volume output volume ((output volume of (get volume settings)) - {STEP_PERCENT})"
                ),
                VolumeCommand::Mute => "set volume output muted true".into(),
                VolumeCommand::Unmute => "set volume output muted false".into(),
                VolumeCommand::Set(level) => format!("set volume output volume {level}"),
            };
            vec![Invocation::new("osascript", ["-e".to_string(), script])]
        }
        OsKind::Windows => {
            // nircmd works in 1/65535 units.
            let nircmd: Vec<String> = match cmd {
                VolumeCommand::Up => vec!["changesysvolume".into(), "6553".into()],
                VolumeCommand::Down => vec!["changesysvolume".into(), "-6553".into()],
                VolumeCommand::Mute => vec!["mutesysvolume".into(), "1".into()],
                VolumeCommand::Unmute => vec!["mutesysvolume".into(), "0".into()],
                VolumeCommand::Set(level) => {
                    vec!["setsysvolume".into(), (level * 65535 / 100).to_string()]
                }
            };
            let mut out = vec![Invocation::new("nircmd", nircmd)];
            // Virtual key codes: 0xAD mute toggle, 0xAE down, 0xAF up.
            let key = match cmd {
                VolumeCommand::Up => Some("0xAF"),
                VolumeCommand::Down => Some("0xAE"),
                VolumeCommand::Mute | VolumeCommand::Unmute => Some("0xAD"),
                VolumeCommand::Set(_) => None,
            };
            if let Some(key) = key {
                out.push(Invocation::new(
                    "powershell",
                    [
                        "-NoProfile".to_string(),
                        "-Command".to_string(),
                        format!(
                            "(New-Object -ComObject WScript.Shell).SendKeys([char]{key})"
                        ),
                    ],
                ));
            }
            out
        }
        OsKind::Other => Vec::new(),
    }
}

/// Apply a volume change requested by `action`/`level`.
pub async fn control_volume(
    host: &dyn Host,
    action: Option<EntityAction>,
    level: Option<u32>,
) -> ActionResult {
    let Some(cmd) = VolumeCommand::from_parts(action, level) else {
        return ActionResult::clarify("How would you like me to control the volume?");
    };

    let os = host.os();
    if os == OsKind::Other {
        return ActionResult::failure(
            format!("Volume control is not supported on {}.", std::env::consts::OS),
            SystemError::Unsupported("volume control".into()).to_string(),
        );
    }

    match host.run_first(&candidates(os, cmd)).await {
        Ok(_) => {
            tracing::info!(command = ?cmd, "volume changed");
            ActionResult::success(cmd.summary())
        }
        Err(e) => {
            tracing::warn!(command = ?cmd, error = %e, "volume control failed");
            let hint = match os {
                OsKind::Windows => "Volume control failed. Make sure nircmd is installed.",
                OsKind::MacOs => "Volume control failed. AppleScript did not respond.",
                _ => "Volume control failed. Make sure alsa-utils or pulseaudio is installed.",
            };
            ActionResult::failure(hint, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHost;

    #[test]
    fn level_is_clamped_and_wins() {
        assert_eq!(
            VolumeCommand::from_parts(Some(EntityAction::Up), Some(250)),
            Some(VolumeCommand::Set(100))
        );
        assert_eq!(
            VolumeCommand::from_parts(None, Some(75)),
            Some(VolumeCommand::Set(75))
        );
    }

    #[test]
    fn non_volume_action_is_rejected() {
        assert_eq!(VolumeCommand::from_parts(Some(EntityAction::Play), None), None);
        assert_eq!(VolumeCommand::from_parts(None, None), None);
    }

    #[test]
    fn linux_candidates_fall_back_to_pactl() {
        let c = candidates(OsKind::Linux, VolumeCommand::Set(75));
        assert_eq!(c[0].command_line(), "amixer set Master 75%");
        assert_eq!(c[1].command_line(), "pactl set-sink-volume @DEFAULT_SINK@ 75%");
    }

    #[test]
    fn windows_set_has_no_key_fallback() {
        let c = candidates(OsKind::Windows, VolumeCommand::Set(50));
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].args, vec!["setsysvolume", "32767"]);
    }

    #[tokio::test]
    async fn set_level_reports_percentage() {
        let host = MockHost::new(OsKind::Linux);
        let result = control_volume(&host, Some(EntityAction::Set), Some(75)).await;
        assert!(result.success);
        assert_eq!(result.summary, "Volume set to 75%.");
        assert_eq!(host.programs_run(), vec!["amixer"]);
    }

    #[tokio::test]
    async fn mute_falls_back_when_amixer_missing() {
        let host = MockHost::new(OsKind::Linux);
        host.fail_program("amixer");
        let result = control_volume(&host, Some(EntityAction::Mute), None).await;
        assert!(result.success);
        assert_eq!(result.summary, "Volume muted.");
        assert_eq!(
            host.last_invocation().unwrap().command_line(),
            "pactl set-sink-mute @DEFAULT_SINK@ 1"
        );
    }

    #[tokio::test]
    async fn all_backends_failing() {
        let host = MockHost::new(OsKind::Linux);
        host.fail_program("amixer");
        host.fail_program("pactl");
        let result = control_volume(&host, Some(EntityAction::Up), None).await;
        assert!(!result.success);
        assert_eq!(
            result.summary,
            "Volume control failed. Make sure alsa-utils or pulseaudio is installed."
        );
    }

    #[tokio::test]
    async fn unsupported_platform_is_reported() {
        let host = MockHost::new(OsKind::Other);
        let result = control_volume(&host, Some(EntityAction::Mute), None).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("volume control is not supported on this platform")
        );
        assert!(host.invocations().is_empty());
    }

    #[tokio::test]
    async fn missing_action_asks() {
        let host = MockHost::default();
        let result = control_volume(&host, None, None).await;
        assert!(!result.success);
        assert_eq!(result.summary, "How would you like me to control the volume?");
        assert!(host.invocations().is_empty());
    }
}
