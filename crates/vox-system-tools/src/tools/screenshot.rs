//! Tool: capture the screen to a timestamped PNG.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use vox_protocol::ActionResult;

use crate::error::SystemError;
use crate::host::Host;
use crate::types::{Invocation, OsKind};

/// `screenshot_YYYYMMDD_HHMMSS.png`
pub fn screenshot_filename(at: NaiveDateTime) -> String {
    format!("screenshot_{}.png", at.format("%Y%m%d_%H%M%S"))
}

/// Capture programs for `os`, in fallback order.
pub fn candidates(os: OsKind, path: &Path) -> Vec<Invocation> {
    let path = path.display().to_string();
    match os {
        OsKind::Linux => vec![
            Invocation::new("gnome-screenshot", ["-f", path.as_str()]),
            Invocation::new("scrot", ["--overwrite", path.as_str()]),
            Invocation::new("import", ["-window", "root", path.as_str()]),
        ],
        OsKind::MacOs => vec![Invocation::new("screencapture", ["-x", path.as_str()])],
        OsKind::Windows => {
            // Single-quoted PowerShell string: a quote is escaped by doubling it.
            let quoted = path.replace('\'', "''");
            let script = format!(
                "Add-Type -AssemblyName System.Windows.Forms,System.Drawing; \
                 $b = [System.Windows.Forms.Screen]::PrimaryScreen.Bounds; \
                 $bmp = New-Object System.Drawing.Bitmap $b.Width, $b.Height; \
                 $g = [System.Drawing.Graphics]::FromImage($bmp); \
                 $g.CopyFromScreen($b.Location, [System.Drawing.Point]::Empty, $b.Size); \
                 $bmp.Save('{quoted}')"
            );
            vec![Invocation::new(
                "powershell",
                ["-NoProfile".to_string(), "-Command".to_string(), script],
            )]
        }
        OsKind::Other => Vec::new(),
    }
}

/// Capture the screen into `dir`, named after `at`.
pub async fn take_screenshot(host: &dyn Host, dir: &Path, at: NaiveDateTime) -> ActionResult {
    const FAILED: &str = "I couldn't take a screenshot.";

    if let Err(e) = host.create_dir_all(dir).await {
        return ActionResult::failure(FAILED, e.to_string());
    }

    let filename = screenshot_filename(at);
    let filepath: PathBuf = dir.join(&filename);

    let candidates = candidates(host.os(), &filepath);
    if candidates.is_empty() {
        return ActionResult::failure(
            FAILED,
            SystemError::Unsupported("screen capture".into()).to_string(),
        );
    }

    match host.run_first(&candidates).await {
        Ok(_) => {
            tracing::info!(path = %filepath.display(), "screenshot saved");
            ActionResult::success(format!("Screenshot saved as {filename}."))
                .with_data(serde_json::json!({ "filepath": filepath.display().to_string() }))
        }
        Err(e) => {
            tracing::warn!(error = %e, "screenshot failed");
            ActionResult::failure(FAILED, e.to_string())
        }
    }
}
