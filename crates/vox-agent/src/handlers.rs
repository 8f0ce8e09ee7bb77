//! Built-in intent handlers.
//!
//! Each handler turns extracted entities into a collaborator call. Missing
//! required entities produce a clarifying question instead of a call with
//! empty input. Collaborators already fold their own failures into
//! `ActionResult`, so nothing here returns an error.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::Arc;

use vox_protocol::{ActionResult, Entities};
use vox_search_tools::SearchService;
use vox_search_tools::config::DEFAULT_TOPIC;
use vox_system_tools::SystemController;

/// A side-effecting action bound to an intent.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, entities: &Entities) -> ActionResult;
}

/// Adapter that lets a plain closure serve as a handler.
pub struct FnHandler<F>(F);

#[async_trait]
impl<F> ActionHandler for FnHandler<F>
where
    F: Fn(&Entities) -> ActionResult + Send + Sync,
{
    async fn handle(&self, entities: &Entities) -> ActionResult {
        (self.0)(entities)
    }
}

/// Wrap a closure as a shareable handler.
pub fn handler_fn<F>(f: F) -> Arc<dyn ActionHandler>
where
    F: Fn(&Entities) -> ActionResult + Send + Sync + 'static,
{
    Arc::new(FnHandler(f))
}

// ── Search ──────────────────────────────────────────────────────

/// Words that turn a web search into a headline fetch.
const NEWS_WORDS: [&str; 3] = ["news", "headlines", "latest"];
/// Topics recognised inside a news request, in priority order.
const NEWS_TOPICS: [&str; 4] = ["science", "business", "world", "technology"];

/// The news topic a query asks for, if it asks for news at all.
pub fn news_topic(query: &str) -> Option<&'static str> {
    let query = query.to_lowercase();
    if !NEWS_WORDS.iter().any(|w| query.contains(w)) {
        return None;
    }
    let topic = NEWS_TOPICS
        .iter()
        .copied()
        .find(|t| query.contains(t))
        .unwrap_or(DEFAULT_TOPIC);
    Some(topic)
}

pub struct WebSearchHandler {
    search: Arc<dyn SearchService>,
}

impl WebSearchHandler {
    pub fn new(search: Arc<dyn SearchService>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl ActionHandler for WebSearchHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        let Some(query) = entities.query() else {
            return ActionResult::clarify("What would you like me to search for?");
        };
        match news_topic(query) {
            Some(topic) => self.search.get_news_headlines(topic).await,
            None => self.search.search_web(query).await,
        }
    }
}

pub struct WikipediaHandler {
    search: Arc<dyn SearchService>,
}

impl WikipediaHandler {
    pub fn new(search: Arc<dyn SearchService>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl ActionHandler for WikipediaHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        match entities.query() {
            Some(query) => self.search.search_wikipedia(query).await,
            None => ActionResult::clarify("What would you like me to look up on Wikipedia?"),
        }
    }
}

/// Catch-all: try a web search, admit defeat politely on a miss.
pub struct GeneralQueryHandler {
    search: Arc<dyn SearchService>,
}

impl GeneralQueryHandler {
    pub fn new(search: Arc<dyn SearchService>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl ActionHandler for GeneralQueryHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        let Some(query) = entities.query() else {
            return ActionResult::clarify("I didn't understand that. Could you rephrase?");
        };

        let result = self.search.search_web(query).await;
        if result.success && !result.summary.trim().is_empty() {
            return result;
        }

        let fallback = format!(
            "I'm not sure about that. You could try searching the web for '{query}'."
        );
        match result.error {
            Some(error) => ActionResult::failure(fallback, error),
            None => ActionResult::clarify(fallback),
        }
    }
}

// ── System ──────────────────────────────────────────────────────

pub struct OpenAppHandler {
    system: SystemController,
}

impl OpenAppHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for OpenAppHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        match entities.app_name() {
            Some(app) => self.system.open_app(app).await,
            None => ActionResult::clarify("Which application would you like me to open?"),
        }
    }
}

pub struct CloseAppHandler {
    system: SystemController,
}

impl CloseAppHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for CloseAppHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        match entities.app_name() {
            Some(app) => self.system.close_app(app).await,
            None => ActionResult::clarify("Which application would you like me to close?"),
        }
    }
}

pub struct SystemInfoHandler {
    system: SystemController,
}

impl SystemInfoHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for SystemInfoHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        self.system.system_info().await
    }
}

pub struct ListProcessesHandler {
    system: SystemController,
}

impl ListProcessesHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for ListProcessesHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        self.system.list_processes().await
    }
}

pub struct ScreenshotHandler {
    system: SystemController,
}

impl ScreenshotHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for ScreenshotHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        self.system.take_screenshot().await
    }
}

/// Volume: a spoken level always wins over an up/down/mute keyword.
pub struct VolumeHandler {
    system: SystemController,
}

impl VolumeHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for VolumeHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        self.system
            .control_volume(entities.action, entities.level)
            .await
    }
}

pub struct MediaHandler {
    system: SystemController,
}

impl MediaHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for MediaHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        self.system
            .control_media(entities.action, entities.query())
            .await
    }
}

pub struct TimeHandler {
    system: SystemController,
}

impl TimeHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for TimeHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        self.system.current_time()
    }
}

pub struct DateHandler {
    system: SystemController,
}

impl DateHandler {
    pub fn new(system: SystemController) -> Self {
        Self { system }
    }
}

#[async_trait]
impl ActionHandler for DateHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        self.system.current_date()
    }
}

// ── Conversation ────────────────────────────────────────────────

/// There is no weather backend; every request gets the same apology.
pub struct WeatherHandler;

#[async_trait]
impl ActionHandler for WeatherHandler {
    async fn handle(&self, entities: &Entities) -> ActionResult {
        let location = entities.location.as_deref().unwrap_or("your area");
        ActionResult::failure(
            format!(
                "Weather information for {location} is not available yet. \
                 You can add a weather API key to enable this feature."
            ),
            "no weather provider configured",
        )
    }
}

pub struct HelpHandler {
    text: String,
}

impl HelpHandler {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl ActionHandler for HelpHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        ActionResult::success(self.text.clone())
    }
}

pub const GREETINGS: [&str; 5] = [
    "Hello! How can I assist you today?",
    "Hi there! What can I do for you?",
    "Hey! I'm ready to help.",
    "Good to hear from you! What do you need?",
    "Hello! I'm here and ready to assist.",
];

pub struct GreetingHandler;

#[async_trait]
impl ActionHandler for GreetingHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        let greeting = GREETINGS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(GREETINGS[0]);
        ActionResult::success(greeting)
    }
}

pub struct StopHandler;

#[async_trait]
impl ActionHandler for StopHandler {
    async fn handle(&self, _entities: &Entities) -> ActionResult {
        ActionResult::stop("Goodbye! Have a great day!")
    }
}
