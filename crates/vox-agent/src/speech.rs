//! Speech I/O collaborator.
//!
//! The assistant only ever listens for one utterance and speaks one reply
//! at a time through `SpeechIo`. `ConsoleSpeech` reads utterances as lines
//! of text and prints replies (optionally voicing them through an external
//! TTS program). `MockSpeech` scripts both sides for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::SpeechConfig;

#[derive(Debug, thiserror::Error)]
pub enum ListenError {
    #[error("listening timeout")]
    Timeout,
    #[error("could not understand audio")]
    Unintelligible,
    #[error("input closed")]
    Closed,
    #[error("input error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait SpeechIo: Send + Sync {
    /// Wait for one utterance.
    async fn listen(&self) -> Result<String, ListenError>;

    /// Say `text`, returning once it has been delivered.
    async fn speak(&self, text: &str);
}

/// Speak on a detached task. The caller may drop the handle; nothing in the
/// command path waits on it.
pub fn speak_async(speech: Arc<dyn SpeechIo>, text: impl Into<String>) -> JoinHandle<()> {
    let text = text.into();
    tokio::spawn(async move { speech.speak(&text).await })
}

/// True when any wake word occurs in `text`, ignoring case.
pub fn is_wake_word_detected(text: &str, wake_words: &[String]) -> bool {
    let text = text.to_lowercase();
    wake_words.iter().any(|w| text.contains(&w.to_lowercase()))
}

/// Strip a leading wake word. Wake words are tried in order and only
/// match whole words, so "voxel" keeps its prefix.
pub fn remove_wake_word(text: &str, wake_words: &[String]) -> String {
    let text = text.trim();
    for word in wake_words {
        if let Some(prefix) = text.get(..word.len())
            && prefix.eq_ignore_ascii_case(word)
        {
            let rest = &text[word.len()..];
            let at_boundary = rest
                .chars()
                .next()
                .is_none_or(|c| c.is_whitespace() || c.is_ascii_punctuation());
            if at_boundary {
                return rest
                    .trim_start_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
                    .trim_end()
                    .to_string();
            }
        }
    }
    text.to_string()
}

/// Line-oriented console speech: one input line per utterance.
pub struct ConsoleSpeech<R> {
    name: String,
    input: tokio::sync::Mutex<Lines<R>>,
    listen_timeout: Duration,
    tts_command: Option<Vec<String>>,
}

impl ConsoleSpeech<BufReader<Stdin>> {
    /// Console speech over the process's stdin.
    pub fn stdin(assistant_name: &str, config: &SpeechConfig) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), assistant_name, config)
    }
}

impl<R> ConsoleSpeech<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, assistant_name: &str, config: &SpeechConfig) -> Self {
        Self {
            name: assistant_name.to_string(),
            input: tokio::sync::Mutex::new(reader.lines()),
            listen_timeout: Duration::from_secs(config.listen_timeout_secs),
            tts_command: config
                .tts_command
                .clone()
                .filter(|argv| !argv.is_empty()),
        }
    }

    async fn voice(&self, argv: &[String], text: &str) {
        let Some((program, args)) = argv.split_first() else {
            return;
        };
        let status = Command::new(program)
            .args(args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match status {
            Ok(status) if status.success() => {}
            Ok(status) => tracing::warn!(%program, code = ?status.code(), "tts command failed"),
            Err(e) => tracing::warn!(%program, error = %e, "tts command could not start"),
        }
    }
}

#[async_trait]
impl<R> SpeechIo for ConsoleSpeech<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn listen(&self) -> Result<String, ListenError> {
        let mut lines = self.input.lock().await;
        let line = tokio::time::timeout(self.listen_timeout, lines.next_line())
            .await
            .map_err(|_| ListenError::Timeout)??;

        match line {
            None => Err(ListenError::Closed),
            Some(line) if line.trim().is_empty() => Err(ListenError::Unintelligible),
            Some(line) => Ok(line.trim().to_string()),
        }
    }

    async fn speak(&self, text: &str) {
        println!("{}: {text}", self.name);
        if let Some(argv) = &self.tts_command {
            self.voice(argv, text).await;
        }
    }
}

/// Mock speech with scripted utterances and recorded replies.
///
/// Once the script runs out, `listen` reports the input as closed.
pub struct MockSpeech {
    script: Mutex<VecDeque<Result<String, ListenError>>>,
    spoken: Mutex<Vec<String>>,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            spoken: Mutex::new(Vec::new()),
        }
    }

    /// A mock that hears each of `utterances` in order.
    pub fn with_utterances<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for utterance in utterances {
            mock.push_utterance(utterance);
        }
        mock
    }

    pub fn push_utterance(&self, text: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_error(&self, error: ListenError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechIo for MockSpeech {
    async fn listen(&self) -> Result<String, ListenError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ListenError::Closed))
    }

    async fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}
