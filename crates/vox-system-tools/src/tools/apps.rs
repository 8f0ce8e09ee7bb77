//! Tool: launch and close desktop applications.

use std::collections::BTreeSet;

use vox_protocol::ActionResult;

use crate::error::SystemError;
use crate::host::Host;
use crate::types::{Invocation, OsKind};

/// Friendly name → launch command, per platform.
const LAUNCH_TABLE: &[(&str, &str, &str, &str)] = &[
    // (spoken name, linux, macos, windows)
    ("notepad", "gedit", "open -a TextEdit", "notepad.exe"),
    ("calculator", "gnome-calculator", "open -a Calculator", "calc.exe"),
    ("browser", "google-chrome", "open -a 'Google Chrome'", "start chrome"),
    ("chrome", "google-chrome", "open -a 'Google Chrome'", "start chrome"),
    ("firefox", "firefox", "open -a Firefox", "start firefox"),
    ("file manager", "nautilus", "open -a Finder", "explorer"),
    ("terminal", "gnome-terminal", "open -a Terminal", "cmd"),
    ("command prompt", "gnome-terminal", "open -a Terminal", "cmd"),
    ("spotify", "spotify", "open -a Spotify", "start spotify"),
    ("discord", "discord", "open -a Discord", "start discord"),
    ("steam", "steam", "open -a Steam", "start steam"),
    ("word", "libreoffice --writer", "open -a 'Microsoft Word'", "start winword"),
    ("excel", "libreoffice --calc", "open -a 'Microsoft Excel'", "start excel"),
    ("powerpoint", "libreoffice --impress", "open -a 'Microsoft PowerPoint'", "start powerpnt"),
];

/// Friendly name → substring of the process name to look for.
const CLOSE_KEYWORDS: &[(&str, &str)] = &[
    ("spotify", "spotify"),
    ("chrome", "chrome"),
    ("browser", "chrome"),
    ("firefox", "firefox"),
    ("brave", "brave"),
    ("brave browser", "brave"),
    ("edge", "msedge"),
    ("notepad", "notepad"),
    ("calculator", "calc"),
    ("word", "winword"),
    ("excel", "excel"),
    ("powerpoint", "powerpnt"),
    ("discord", "discord"),
    ("steam", "steam"),
    ("vlc", "vlc"),
    ("vs code", "code"),
    ("visual studio code", "code"),
    ("teams", "teams"),
    ("zoom", "zoom"),
];

/// Resolve the command line that launches `app` on `os`.
///
/// Unknown names are launched as-is.
pub fn launch_command(os: OsKind, app: &str) -> String {
    LAUNCH_TABLE
        .iter()
        .find(|(name, ..)| *name == app)
        .map(|(_, linux, macos, windows)| match os {
            OsKind::Windows => *windows,
            OsKind::MacOs => *macos,
            OsKind::Linux | OsKind::Other => *linux,
        })
        .unwrap_or(app)
        .to_string()
}

/// Resolve the process-name keyword used to find `app`.
pub fn close_keyword(app: &str) -> &str {
    CLOSE_KEYWORDS
        .iter()
        .find(|(name, _)| *name == app)
        .map(|(_, keyword)| *keyword)
        .unwrap_or(app)
}

/// Launch an application by friendly name.
pub async fn open_app(host: &dyn Host, app_name: &str) -> ActionResult {
    let app = app_name.trim().to_lowercase();
    let command = launch_command(host.os(), &app);

    // Windows entries rely on `start` and PATH lookup, so they go through cmd.
    let invocation = if host.os() == OsKind::Windows {
        Some(Invocation::new("cmd", ["/C", command.as_str()]))
    } else {
        Invocation::parse(&command)
    };

    let Some(invocation) = invocation else {
        return ActionResult::failure(
            format!("I couldn't open {app}. Make sure it's installed."),
            format!("unparseable command line: {command}"),
        );
    };

    match host.spawn_detached(&invocation).await {
        Ok(()) => {
            tracing::info!(app = %app, command = %invocation, "application launched");
            ActionResult::success(format!("Opening {app}."))
        }
        Err(e) => {
            tracing::warn!(app = %app, error = %e, "application launch failed");
            ActionResult::failure(format!("I couldn't open {app}. Make sure it's installed."), e.to_string())
        }
    }
}

/// Close every process whose name contains the app's keyword.
pub async fn close_app(host: &dyn Host, app_name: &str) -> ActionResult {
    let app = app_name.trim().to_lowercase();
    let keyword = close_keyword(&app);

    let processes = match host.processes().await {
        Ok(p) => p,
        Err(e) => {
            return ActionResult::failure(format!("Error trying to close {app}: {e}"), e.to_string());
        }
    };

    let mut found = 0usize;
    let mut closed = BTreeSet::new();
    for entry in processes
        .iter()
        .filter(|p| p.name.to_lowercase().contains(keyword))
    {
        found += 1;
        match host.terminate(entry.pid).await {
            Ok(true) => {
                closed.insert(entry.name.clone());
            }
            Ok(false) => {
                tracing::debug!(pid = entry.pid, name = %entry.name, "termination refused");
            }
            // Exited between the scan and the signal.
            Err(SystemError::ProcessNotFound { .. }) => {}
            Err(e) => {
                tracing::debug!(pid = entry.pid, error = %e, "termination failed");
            }
        }
    }

    tracing::info!(app = %app, keyword, found, closed = closed.len(), "close application");

    if !closed.is_empty() {
        let names: Vec<&str> = closed.iter().map(String::as_str).collect();
        ActionResult::success(format!("Closed {}.", names.join(", ")))
            .with_data(serde_json::json!({ "closed": names }))
    } else if found > 0 {
        ActionResult::clarify(format!(
            "Found {app} but couldn't close it due to permissions."
        ))
        .with_error("permission denied")
    } else {
        ActionResult::clarify(format!(
            "I couldn't find any running process for '{app}'. Make sure it's running first."
        ))
    }
}
