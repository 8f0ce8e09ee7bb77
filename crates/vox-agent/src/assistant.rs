//! The listen → handle → speak loop.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AgentConfig;
use crate::conversation::{Conversation, ReplyKind};
use crate::dispatcher::Dispatcher;
use crate::speech::{ListenError, SpeechIo, is_wake_word_detected, remove_wake_word};

pub const SHUTDOWN_MESSAGE: &str = "Shutting down. Goodbye!";

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user asked the assistant to stop.
    StopRequested,
    /// The speech input has no more utterances.
    InputClosed,
}

/// Outcome of one listen cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit(ExitReason),
}

pub struct Assistant {
    name: String,
    dispatcher: Dispatcher,
    conversation: Conversation,
    speech: Arc<dyn SpeechIo>,
    idle_pause: Duration,
    /// Set when utterances must start with one of these words.
    wake_words: Option<Vec<String>>,
}

impl Assistant {
    pub fn new(dispatcher: Dispatcher, speech: Arc<dyn SpeechIo>, config: &AgentConfig) -> Self {
        Self {
            name: config.assistant_name.clone(),
            dispatcher,
            conversation: Conversation::new(),
            speech,
            idle_pause: Duration::from_millis(config.idle_pause_ms),
            wake_words: config
                .speech
                .require_wake_word
                .then(|| config.speech.wake_words.clone()),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Greet, then process utterances until the user stops or input ends.
    pub async fn run(&mut self) -> ExitReason {
        self.speech
            .speak(&format!(
                "Hello! {} is now active and ready to assist you.",
                self.name
            ))
            .await;

        let reason = loop {
            match self.step().await {
                Step::Continue => {
                    if !self.idle_pause.is_zero() {
                        tokio::time::sleep(self.idle_pause).await;
                    }
                }
                Step::Exit(reason) => break reason,
            }
        };

        tracing::info!(?reason, "assistant loop finished");
        self.shutdown().await;
        reason
    }

    /// Listen once and act on what was heard.
    pub async fn step(&mut self) -> Step {
        let heard = match self.speech.listen().await {
            Ok(text) => text,
            Err(ListenError::Timeout) => return Step::Continue,
            Err(ListenError::Closed) => return Step::Exit(ExitReason::InputClosed),
            Err(e) => {
                tracing::warn!(error = %e, "listening issue");
                return Step::Continue;
            }
        };

        let command = match &self.wake_words {
            Some(words) if !is_wake_word_detected(&heard, words) => {
                tracing::debug!("no wake word, utterance ignored");
                return Step::Continue;
            }
            Some(words) => remove_wake_word(&heard, words),
            None => heard,
        };

        let Some(reply) = self.conversation.handle(&self.dispatcher, &command).await else {
            return Step::Continue;
        };

        self.speech.speak(&reply.text).await;
        tracing::info!(
            kind = ?reply.kind,
            awaiting_confirmation = self.conversation.is_awaiting_confirmation(),
            "reply spoken"
        );

        if reply.kind == ReplyKind::Shutdown {
            Step::Exit(ExitReason::StopRequested)
        } else {
            Step::Continue
        }
    }

    pub async fn shutdown(&self) {
        self.speech.speak(SHUTDOWN_MESSAGE).await;
    }
}
