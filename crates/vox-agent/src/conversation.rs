//! Conversation controller.
//!
//! Two states. In `Normal` every utterance is a new command. When the
//! dispatcher defers a command for confirmation, the raw text is parked in
//! `AwaitingConfirmation` and the next utterance is read as a yes/no answer.
//! The pending command lives inside the state variant, so "awaiting" and
//! "holding a pending action" cannot disagree.
//!
//! A pending action has no expiry; it waits for the next answer.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use vox_protocol::ActionResult;

use crate::dispatcher::Dispatcher;

const AFFIRMATIVE: [&str; 5] = ["confirm", "yes", "go ahead", "proceed", "do it"];
const NEGATIVE: [&str; 5] = ["no", "nope", "cancel", "abort", "nevermind"];

pub const NOTHING_TO_CONFIRM: &str = "I don't have a pending action to confirm.";
pub const CANCELLED: &str = "Okay, I've cancelled that action.";
pub const REPROMPT: &str = "Please say 'confirm' or 'yes' to proceed, or 'no' to cancel.";

/// A command parked until the user confirms or cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub id: Uuid,
    /// Raw utterance, replayed verbatim on confirmation.
    pub command: String,
    pub requested_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            command: command.into(),
            requested_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Normal,
    AwaitingConfirmation(PendingAction),
}

/// How a reply came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// A handler ran and succeeded.
    Completed,
    /// A handler ran (or asked a question) without success.
    Failed,
    ConfirmationRequested,
    Cancelled,
    /// Answer was neither yes nor no; still waiting.
    Reprompt,
    NothingToConfirm,
    /// The user asked the assistant to stop.
    Shutdown,
}

/// What the assistant should say back.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
    /// The handler result behind this reply, when one ran.
    pub result: Option<ActionResult>,
}

impl Reply {
    fn plain(kind: ReplyKind, text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind,
            result: None,
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.kind == ReplyKind::Shutdown
    }
}

/// Per-session state machine wrapped around a `Dispatcher`.
#[derive(Debug, Default)]
pub struct Conversation {
    state: ConversationState,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(self.state, ConversationState::AwaitingConfirmation(_))
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        match &self.state {
            ConversationState::AwaitingConfirmation(pending) => Some(pending),
            ConversationState::Normal => None,
        }
    }

    /// Feed one utterance. Blank input produces no reply.
    pub async fn handle(&mut self, dispatcher: &Dispatcher, text: &str) -> Option<Reply> {
        let command = text.trim();
        if command.is_empty() {
            return None;
        }

        let reply = if self.is_awaiting_confirmation() {
            self.answer(dispatcher, command).await
        } else {
            let result = dispatcher.process_command(command).await;
            self.settle(result, command)
        };
        Some(reply)
    }

    /// Interpret `text` as an answer to a confirmation prompt.
    pub async fn answer(&mut self, dispatcher: &Dispatcher, text: &str) -> Reply {
        let answer = text.trim().to_lowercase();

        if AFFIRMATIVE.iter().any(|t| answer.contains(t)) {
            let ConversationState::AwaitingConfirmation(pending) = std::mem::take(&mut self.state)
            else {
                tracing::warn!("confirmation received with nothing pending");
                return Reply::plain(ReplyKind::NothingToConfirm, NOTHING_TO_CONFIRM);
            };
            tracing::info!(pending_id = %pending.id, command = %pending.command, "action confirmed");
            let result = dispatcher.execute_confirmed(&pending.command).await;
            return self.settle(result, &pending.command);
        }

        if NEGATIVE.iter().any(|t| answer.contains(t)) {
            if let ConversationState::AwaitingConfirmation(pending) =
                std::mem::take(&mut self.state)
            {
                tracing::info!(pending_id = %pending.id, "action cancelled");
            }
            return Reply::plain(ReplyKind::Cancelled, CANCELLED);
        }

        tracing::debug!(answer = %answer, "confirmation answer not understood");
        Reply::plain(ReplyKind::Reprompt, REPROMPT)
    }

    /// Turn a handler result into a reply, parking it if it needs confirming.
    fn settle(&mut self, result: ActionResult, command: &str) -> Reply {
        if result.requires_confirmation {
            let stored = result
                .original_command
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(command);
            let pending = PendingAction::new(stored);
            tracing::info!(pending_id = %pending.id, command = %pending.command, "awaiting confirmation");
            self.state = ConversationState::AwaitingConfirmation(pending);
            return Reply {
                text: result.summary.clone(),
                kind: ReplyKind::ConfirmationRequested,
                result: Some(result),
            };
        }

        let kind = if result.stop_requested {
            ReplyKind::Shutdown
        } else if result.success {
            ReplyKind::Completed
        } else {
            ReplyKind::Failed
        };

        if kind == ReplyKind::Failed {
            tracing::warn!(
                summary = %result.summary,
                error = result.error.as_deref().unwrap_or_default(),
                "action failed"
            );
        }

        Reply {
            text: result.summary.clone(),
            kind,
            result: Some(result),
        }
    }
}
