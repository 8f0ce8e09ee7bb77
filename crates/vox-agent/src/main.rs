//! Vox: voice-driven desktop command assistant.
//!
//! Wires the console speech channel, the desktop and search collaborators,
//! and the confirmation-aware conversation loop into one binary.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vox_agent::assistant::{Assistant, ExitReason};
use vox_agent::classifier::Classifier;
use vox_agent::config::AgentConfig;
use vox_agent::dispatcher::Dispatcher;
use vox_agent::registry::ActionRegistry;
use vox_agent::speech::{ConsoleSpeech, SpeechIo};
use vox_search_tools::WebSearcher;
use vox_system_tools::SystemController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the assistant's replies; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "vox-agent starting");

    // ── Load config ─────────────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = AgentConfig::from_file(&path)?;
            tracing::info!(%path, assistant = %config.assistant_name, "config loaded");
            config
        }
        None => {
            tracing::info!("no config path given, using defaults");
            AgentConfig::default()
        }
    };

    // ── Collaborators ───────────────────────────────────────────
    let system = SystemController::native(config.system.clone());
    tracing::info!(os = %system.host().os(), "system controller ready");

    let search = Arc::new(WebSearcher::new(config.search.clone())?);

    // ── Dispatch core ───────────────────────────────────────────
    let registry = ActionRegistry::with_defaults(system, search, &config.assistant_name);
    tracing::info!(handler_count = registry.len(), "action registry initialized");
    let dispatcher = Dispatcher::new(Classifier::new(), registry);

    let speech: Arc<dyn SpeechIo> =
        Arc::new(ConsoleSpeech::stdin(&config.assistant_name, &config.speech));
    let mut assistant = Assistant::new(dispatcher, speech, &config);

    tracing::info!(assistant = %config.assistant_name, "vox-agent ready");

    let interrupted = tokio::select! {
        reason = assistant.run() => {
            if reason == ExitReason::InputClosed {
                tracing::info!("input closed");
            }
            false
        }
        // Graceful shutdown on SIGINT
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            true
        }
    };

    if interrupted {
        assistant.shutdown().await;
        tracing::info!("vox-agent stopped");
        // The stdin reader is parked in a blocking read; don't wait for it.
        std::process::exit(0);
    }

    tracing::info!("vox-agent stopped");
    Ok(())
}
