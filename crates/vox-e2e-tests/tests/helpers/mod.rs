//! Shared test harness for E2E integration tests.
//!
//! Wires the real classifier, registry, dispatcher, and conversation
//! controller to mock collaborators, so every test exercises the same code
//! path the binary runs, minus the operating system and the network.

#![allow(dead_code)]

use std::sync::Arc;

use vox_agent::assistant::Assistant;
use vox_agent::classifier::Classifier;
use vox_agent::config::AgentConfig;
use vox_agent::conversation::{Conversation, Reply};
use vox_agent::dispatcher::Dispatcher;
use vox_agent::registry::ActionRegistry;
use vox_agent::speech::MockSpeech;
use vox_search_tools::{MockSearch, SearchService};
use vox_system_tools::{MockHost, OsKind, ProcessEntry, SystemConfig, SystemController};

/// Dispatcher + conversation over mock desktop and search collaborators.
pub struct TestHarness {
    pub host: Arc<MockHost>,
    pub search: Arc<MockSearch>,
    pub dispatcher: Dispatcher,
    pub conversation: Conversation,
}

impl TestHarness {
    /// Linux desktop with a small process table.
    pub fn new() -> Self {
        Self::for_os(OsKind::Linux)
    }

    pub fn for_os(os: OsKind) -> Self {
        let host = Arc::new(MockHost::with_processes(os, sample_processes()));
        let search = Arc::new(MockSearch::new());
        let dispatcher = build_dispatcher(host.clone(), search.clone(), Classifier::new());
        Self {
            host,
            search,
            dispatcher,
            conversation: Conversation::new(),
        }
    }

    /// Harness whose dispatcher uses `classifier` (e.g. with custom rules).
    pub fn with_classifier(classifier: Classifier) -> Self {
        let host = Arc::new(MockHost::with_processes(OsKind::Linux, sample_processes()));
        let search = Arc::new(MockSearch::new());
        let dispatcher = build_dispatcher(host.clone(), search.clone(), classifier);
        Self {
            host,
            search,
            dispatcher,
            conversation: Conversation::new(),
        }
    }

    /// Send one utterance through the conversation controller.
    pub async fn say(&mut self, text: &str) -> Reply {
        self.conversation
            .handle(&self.dispatcher, text)
            .await
            .unwrap_or_else(|| panic!("no reply for {text:?}"))
    }
}

pub fn build_dispatcher(
    host: Arc<MockHost>,
    search: Arc<dyn SearchService>,
    classifier: Classifier,
) -> Dispatcher {
    let system = SystemController::new(host, SystemConfig::default());
    let registry = ActionRegistry::with_defaults(system, search, "Vox");
    Dispatcher::new(classifier, registry)
}

/// A full assistant that hears `utterances`, in order, then runs out of input.
pub fn scripted_assistant(utterances: &[&str]) -> (Assistant, Arc<MockSpeech>, Arc<MockHost>) {
    let host = Arc::new(MockHost::with_processes(OsKind::Linux, sample_processes()));
    let search = Arc::new(MockSearch::new());
    let dispatcher = build_dispatcher(host.clone(), search, Classifier::new());
    let speech = Arc::new(MockSpeech::with_utterances(utterances.iter().copied()));
    let config = AgentConfig {
        idle_pause_ms: 0,
        ..AgentConfig::default()
    };
    let assistant = Assistant::new(dispatcher, speech.clone(), &config);
    (assistant, speech, host)
}

pub fn sample_processes() -> Vec<ProcessEntry> {
    vec![
        ProcessEntry::new(101, "spotify"),
        ProcessEntry::new(102, "Spotify Helper"),
        ProcessEntry::new(200, "firefox"),
        ProcessEntry::new(300, "code"),
        ProcessEntry::new(1, "systemd"),
    ]
}
