//! Command dispatcher: classify → gate → handler.
//!
//! Every entry point returns an `ActionResult`; nothing here can fail.

use std::sync::Arc;
use std::time::Instant;

use vox_protocol::{ActionResult, Entities, Intent};

use crate::classifier::Classifier;
use crate::gate::requires_confirmation;
use crate::handlers::ActionHandler;
use crate::registry::ActionRegistry;

pub const UNKNOWN_INTENT: &str =
    "I didn't understand that command. Try saying 'help' to see what I can do.";
pub const REPLAY_FAILED: &str = "I couldn't process that command.";

pub struct Dispatcher {
    classifier: Classifier,
    registry: ActionRegistry,
}

impl Dispatcher {
    pub fn new(classifier: Classifier, registry: ActionRegistry) -> Self {
        Self {
            classifier,
            registry,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Bind a handler at runtime. Returns whatever was bound before.
    pub fn register(
        &mut self,
        intent: Intent,
        handler: Arc<dyn ActionHandler>,
    ) -> Option<Arc<dyn ActionHandler>> {
        self.registry.register(intent, handler)
    }

    /// Run the handler bound to `intent`.
    pub async fn dispatch(&self, intent: &Intent, entities: &Entities) -> ActionResult {
        let Some(handler) = self.registry.lookup(intent) else {
            tracing::warn!(%intent, "no handler registered");
            return ActionResult::failure(UNKNOWN_INTENT, format!("no handler for {intent}"));
        };

        let start = Instant::now();
        let result = handler.handle(entities).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            %intent,
            success = result.success,
            latency_ms,
            "action dispatched"
        );
        result
    }

    /// Handle a fresh utterance. Commands the gate flags come back as a
    /// confirmation request carrying the raw text; nothing runs yet.
    pub async fn process_command(&self, text: &str) -> ActionResult {
        let classification = self.classifier.classify(text);

        if requires_confirmation(&classification.intent, &classification.entities) {
            tracing::info!(intent = %classification.intent, "confirmation required");
            return ActionResult::confirmation(
                &classification.intent,
                &classification.entities,
                text.trim(),
            );
        }

        self.dispatch(&classification.intent, &classification.entities)
            .await
    }

    /// Run a command the user has just confirmed.
    ///
    /// The stored text is classified again from scratch and the gate is not
    /// consulted a second time.
    pub async fn execute_confirmed(&self, text: &str) -> ActionResult {
        let classification = self.classifier.classify(text);
        if !self.registry.contains(&classification.intent) {
            tracing::warn!(intent = %classification.intent, "confirmed command has no handler");
            return ActionResult::failure(
                REPLAY_FAILED,
                format!("no handler for {}", classification.intent),
            );
        }
        self.dispatch(&classification.intent, &classification.entities)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::handler_fn;
    use vox_search_tools::{MockSearch, SearchCall};
    use vox_system_tools::{MockHost, OsKind, SystemConfig, SystemController};

    fn dispatcher() -> (Dispatcher, Arc<MockSearch>, Arc<MockHost>) {
        let search = Arc::new(MockSearch::new());
        let host = Arc::new(MockHost::new(OsKind::Linux));
        let system = SystemController::new(host.clone(), SystemConfig::default());
        let registry = ActionRegistry::with_defaults(system, search.clone(), "Vox");
        (Dispatcher::new(Classifier::new(), registry), search, host)
    }

    #[tokio::test]
    async fn unknown_intent_is_a_failure_result() {
        let (d, _, _) = dispatcher();
        let result = d
            .dispatch(&Intent::from("teleport"), &Entities::none())
            .await;
        assert!(!result.success);
        assert_eq!(result.summary, UNKNOWN_INTENT);
    }

    #[tokio::test]
    async fn dangerous_command_is_deferred() {
        let (d, search, _) = dispatcher();
        let result = d.process_command("Delete all files").await;

        assert!(result.requires_confirmation);
        assert_eq!(result.original_command.as_deref(), Some("Delete all files"));
        assert_eq!(
            result.summary,
            "Are you sure you want to general query? Say 'confirm' or 'go ahead' to proceed."
        );
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn confirmed_replay_skips_gate() {
        let (d, search, _) = dispatcher();
        let result = d.execute_confirmed("Delete all files").await;
        assert!(!result.requires_confirmation);
        assert_eq!(
            search.last_call(),
            Some((SearchCall::Web, "delete all files".to_string()))
        );
    }

    #[tokio::test]
    async fn replay_equals_direct_dispatch() {
        let (d, _, _) = dispatcher();
        let direct = d
            .dispatch(&Intent::GeneralQuery, &Entities::with_query("delete all files"))
            .await;
        let replayed = d.execute_confirmed("delete all files").await;
        assert_eq!(direct, replayed);
    }

    #[tokio::test]
    async fn harmless_command_runs_immediately() {
        let (d, _, host) = dispatcher();
        let result = d.process_command("volume to 75").await;
        assert!(result.success);
        assert!(result.summary.contains("75"));
        assert_eq!(host.programs_run(), vec!["amixer".to_string()]);
    }

    #[tokio::test]
    async fn custom_rule_and_handler() {
        let classifier = Classifier::new()
            .with_rule(Intent::from("delete_file"), &[r"erase (.+)"])
            .unwrap();
        let mut d = Dispatcher::new(classifier, ActionRegistry::new());
        d.register(
            Intent::from("delete_file"),
            handler_fn(|e| ActionResult::success(format!("Erased {}.", e.query().unwrap_or("?")))),
        );

        // Dangerous by tag, so it waits for confirmation first.
        let result = d.process_command("erase notes.txt").await;
        assert!(result.requires_confirmation);

        let result = d.execute_confirmed("erase notes.txt").await;
        assert_eq!(result.summary, "Erased notes.txt.");
    }

    #[tokio::test]
    async fn replay_without_handler() {
        let d = Dispatcher::new(Classifier::new(), ActionRegistry::new());
        let result = d.execute_confirmed("delete all files").await;
        assert!(!result.success);
        assert_eq!(result.summary, REPLAY_FAILED);
    }
}
