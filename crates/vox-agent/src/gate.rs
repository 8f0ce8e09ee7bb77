//! Confirmation gate: decides whether a classified command must be
//! confirmed by the user before it runs.
//!
//! Pure and deterministic. The same (intent, entities) pair always yields
//! the same verdict.

use vox_protocol::{Entities, Intent};

/// Intent tags that always need confirmation. None of them is built in;
/// they exist for host-registered handlers.
pub const DANGEROUS_INTENTS: [&str; 3] = ["system_shutdown", "delete_file", "format_drive"];

/// Phrases that make any query or app name dangerous.
pub const DANGEROUS_PHRASES: [&str; 5] = [
    "delete system",
    "format drive",
    "shutdown computer",
    "restart computer",
    "delete all",
];

pub fn requires_confirmation(intent: &Intent, entities: &Entities) -> bool {
    if DANGEROUS_INTENTS.contains(&intent.as_str()) {
        return true;
    }

    if entities.query.is_none() && entities.app_name.is_none() {
        return false;
    }

    let text = format!(
        "{} {}",
        entities.query.as_deref().unwrap_or_default(),
        entities.app_name.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    DANGEROUS_PHRASES.iter().any(|phrase| text.contains(phrase))
}
