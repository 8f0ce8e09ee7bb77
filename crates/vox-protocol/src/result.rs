use serde::{Deserialize, Serialize};

use crate::entities::Entities;
use crate::intent::Intent;

/// Outcome of any handler or collaborator call.
///
/// `summary` is what gets spoken back. Failures still carry a summary; the
/// optional `error` holds the underlying cause for logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Domain payload (process list, headlines, file path, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_confirmation: bool,
    /// Raw utterance to replay once the user confirms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_command: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stop_requested: bool,
}

impl ActionResult {
    pub fn success(summary: impl Into<String>) -> Self {
        Self {
            success: true,
            summary: summary.into(),
            error: None,
            data: None,
            requires_confirmation: false,
            original_command: None,
            stop_requested: false,
        }
    }

    pub fn failure(summary: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::success(summary)
        }
    }

    /// A missing-input reply: not a fault, just a question for the user.
    pub fn clarify(question: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(question)
        }
    }

    /// A deferred action waiting for a yes/no from the user.
    pub fn confirmation(intent: &Intent, entities: &Entities, command: impl Into<String>) -> Self {
        let summary = format!(
            "Are you sure you want to {}? Say 'confirm' or 'go ahead' to proceed.",
            intent.spoken()
        );
        Self {
            requires_confirmation: true,
            original_command: Some(command.into()),
            data: Some(serde_json::json!({ "intent": intent, "entities": entities })),
            ..Self::success(summary)
        }
    }

    pub fn stop(summary: impl Into<String>) -> Self {
        Self {
            stop_requested: true,
            ..Self::success(summary)
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
