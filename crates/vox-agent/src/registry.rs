//! Intent → handler registry.
//!
//! The dispatcher looks handlers up here by intent. Bindings can be added at
//! runtime; registering an intent that is already bound replaces the old
//! handler and hands it back to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use vox_protocol::Intent;
use vox_search_tools::SearchService;
use vox_system_tools::SystemController;

use crate::handlers::{
    ActionHandler, CloseAppHandler, DateHandler, GeneralQueryHandler, GreetingHandler,
    HelpHandler, ListProcessesHandler, MediaHandler, OpenAppHandler, ScreenshotHandler,
    StopHandler, SystemInfoHandler, TimeHandler, VolumeHandler, WeatherHandler, WebSearchHandler,
    WikipediaHandler,
};
use crate::help::help_text;

#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<Intent, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// An empty registry. Every lookup misses until something is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a handler for every built-in intent.
    pub fn with_defaults(
        system: SystemController,
        search: Arc<dyn SearchService>,
        assistant_name: &str,
    ) -> Self {
        let mut registry = Self::new();

        registry.register(Intent::WebSearch, Arc::new(WebSearchHandler::new(search.clone())));
        registry.register(Intent::Wikipedia, Arc::new(WikipediaHandler::new(search.clone())));
        registry.register(Intent::GeneralQuery, Arc::new(GeneralQueryHandler::new(search)));
        registry.register(Intent::OpenApp, Arc::new(OpenAppHandler::new(system.clone())));
        registry.register(Intent::CloseApp, Arc::new(CloseAppHandler::new(system.clone())));
        registry.register(Intent::SystemInfo, Arc::new(SystemInfoHandler::new(system.clone())));
        registry.register(Intent::Screenshot, Arc::new(ScreenshotHandler::new(system.clone())));
        registry.register(Intent::VolumeControl, Arc::new(VolumeHandler::new(system.clone())));
        registry.register(Intent::SpotifyControl, Arc::new(MediaHandler::new(system.clone())));
        registry.register(
            Intent::ListProcesses,
            Arc::new(ListProcessesHandler::new(system.clone())),
        );
        registry.register(Intent::Time, Arc::new(TimeHandler::new(system.clone())));
        registry.register(Intent::Date, Arc::new(DateHandler::new(system)));
        registry.register(Intent::Weather, Arc::new(WeatherHandler));
        registry.register(Intent::Help, Arc::new(HelpHandler::new(help_text(assistant_name))));
        registry.register(Intent::Greeting, Arc::new(GreetingHandler));
        registry.register(Intent::StopListening, Arc::new(StopHandler));

        registry
    }

    /// Bind `intent` to `handler`, returning the handler it displaced.
    pub fn register(
        &mut self,
        intent: Intent,
        handler: Arc<dyn ActionHandler>,
    ) -> Option<Arc<dyn ActionHandler>> {
        let previous = self.handlers.insert(intent.clone(), handler);
        if previous.is_some() {
            tracing::debug!(%intent, "handler replaced");
        }
        previous
    }

    pub fn lookup(&self, intent: &Intent) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(intent).cloned()
    }

    pub fn contains(&self, intent: &Intent) -> bool {
        self.handlers.contains_key(intent)
    }

    /// Registered intents, sorted by tag.
    pub fn intents(&self) -> Vec<Intent> {
        let mut intents: Vec<Intent> = self.handlers.keys().cloned().collect();
        intents.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        intents
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
