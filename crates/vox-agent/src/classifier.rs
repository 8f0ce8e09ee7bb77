//! Rule-based intent classifier.
//!
//! Utterances are matched against an ordered table of (intent, pattern)
//! rules. The first rule that matches anywhere in the normalized text wins;
//! there is no scoring. Overlapping patterns are therefore resolved by table
//! position alone, and reordering the table changes behavior (for example
//! "stop spotify" lands on `close_app` because `stop (.+)` is declared
//! before any media rule).
//!
//! Anything no rule accepts becomes `general_query` carrying the whole text,
//! so `classify` is total.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use vox_protocol::{Entities, EntityAction, Intent};

/// One compiled row of the rule table.
#[derive(Debug, Clone)]
pub struct Rule {
    pub intent: Intent,
    pub regex: Regex,
}

impl Rule {
    /// Compile a rule. Patterns match case-insensitively, unanchored.
    pub fn new(intent: Intent, pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { intent, regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// The built-in table. Order is load-bearing: intents in declaration order,
/// patterns within an intent in declaration order.
const BUILTIN_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::WebSearch,
        &[
            r"search (?:the web |google |internet )?for (.+)",
            r"look up (.+)",
            r"find (?:information about |info about |)(.+)",
            r"what is (.+)",
            r"who is (.+)",
            r"tell me about (.+)",
            r"google (.+)",
            r"search (.+)",
            r"find (.+)",
        ],
    ),
    (
        Intent::OpenApp,
        &[r"open (.+)", r"launch (.+)", r"start (.+)", r"run (.+)"],
    ),
    (
        Intent::CloseApp,
        &[
            r"close (.+)",
            r"quit (.+)",
            r"exit (.+)",
            r"stop (.+)",
            r"kill (.+)",
            r"end (.+)",
        ],
    ),
    (
        Intent::SystemInfo,
        &[
            r"system info(?:rmation)?",
            r"computer specs?",
            r"hardware info(?:rmation)?",
            r"memory usage",
            r"cpu usage",
            r"system status",
            r"computer status",
        ],
    ),
    (
        Intent::Screenshot,
        &[
            r"take a screenshot",
            r"capture screen",
            r"screenshot",
            r"screen capture",
            r"capture my screen",
        ],
    ),
    (
        Intent::VolumeControl,
        &[
            r"(?:set |change |)volume to (\d+)",
            r"(?:turn |set |)volume (?:up|down)",
            r"(?:increase|raise) (?:the )?volume",
            r"(?:decrease|lower) (?:the )?volume",
            r"mute",
            r"unmute",
            r"volume up",
            r"volume down",
        ],
    ),
    (
        Intent::Time,
        &[
            r"what time is it",
            r"current time",
            r"tell me the time",
            r"what's the time",
            r"time please",
        ],
    ),
    (
        Intent::Date,
        &[
            r"what(?:'s| is) (?:the |today's |)date",
            r"today's date",
            r"what day is it",
            r"what's today",
            r"date please",
        ],
    ),
    (
        Intent::Weather,
        &[
            r"weather(?:\s+in\s+(.+))?",
            r"what's the weather(?:\s+in\s+(.+))?",
            r"temperature(?:\s+in\s+(.+))?",
            r"how's the weather",
        ],
    ),
    (
        Intent::Wikipedia,
        &[
            r"wikipedia (.+)",
            r"wiki (.+)",
            r"summary of (.+)",
            r"wikipedia search (.+)",
        ],
    ),
    (
        Intent::SpotifyControl,
        &[
            r"play spotify",
            r"pause spotify",
            r"stop spotify",
            r"resume spotify",
            r"start spotify",
            r"next song",
            r"skip song",
            r"previous song",
            r"spotify next",
            r"spotify skip",
            r"spotify previous",
            // Lazy so "play some jazz on spotify" keeps "on" out of the query.
            r"(?:play|search) (.+?) (?:on spotify|spotify)",
            r"spotify (?:play|search) (.+)",
            r"play (.+) on spotify",
            r"spotify (.+)",
            r"play music",
        ],
    ),
    (
        Intent::StopListening,
        &[
            r"stop listening",
            r"stop",
            r"exit",
            r"quit",
            r"goodbye",
            r"bye",
            r"shutdown",
            r"turn off",
        ],
    ),
    (
        Intent::Help,
        &[
            r"help",
            r"what can you do",
            r"commands",
            r"capabilities",
            r"what are your commands",
            r"show commands",
            r"list commands",
        ],
    ),
    (
        Intent::Greeting,
        &[
            r"hello",
            r"hi",
            r"hey",
            r"good morning",
            r"good afternoon",
            r"good evening",
            r"howdy",
            r"what's up",
        ],
    ),
    (
        Intent::ListProcesses,
        &[
            r"list processes",
            r"show running processes",
            r"what processes are running",
            r"debug processes",
            r"running programs",
            r"active processes",
        ],
    ),
];

static BUILTIN_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    BUILTIN_TABLE
        .iter()
        .flat_map(|(intent, patterns)| {
            patterns
                .iter()
                .map(move |p| Rule::new(intent.clone(), p).unwrap())
        })
        .collect()
});

/// The built-in rules in evaluation order.
pub fn builtin_rules() -> &'static [Rule] {
    &BUILTIN_RULES
}

/// Result of classifying one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    pub entities: Entities,
    /// Source of the pattern that matched; `None` for the fallback.
    pub rule: Option<String>,
}

impl Classification {
    fn fallback(text: &str) -> Self {
        Self {
            intent: Intent::GeneralQuery,
            entities: Entities::with_query(text),
            rule: None,
        }
    }
}

/// Classify with the built-in table only.
pub fn classify(text: &str) -> Classification {
    evaluate(BUILTIN_RULES.iter(), text)
}

/// Classifier with optional host-defined rules appended after the built-ins.
///
/// Extra rules can only catch what the built-in table lets through; they
/// never shadow a built-in pattern.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    extra: Vec<Rule>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rules for `intent`. Capture group 1, when present, becomes
    /// the `query` entity.
    pub fn with_rule(mut self, intent: Intent, patterns: &[&str]) -> Result<Self, regex::Error> {
        for pattern in patterns {
            self.extra.push(Rule::new(intent.clone(), pattern)?);
        }
        Ok(self)
    }

    pub fn extra_rules(&self) -> &[Rule] {
        &self.extra
    }

    pub fn classify(&self, text: &str) -> Classification {
        evaluate(BUILTIN_RULES.iter().chain(self.extra.iter()), text)
    }
}

fn evaluate<'a>(rules: impl Iterator<Item = &'a Rule>, text: &str) -> Classification {
    let text = text.trim().to_lowercase();

    for rule in rules {
        if let Some(caps) = rule.regex.captures(&text) {
            let group = caps.get(1).map(|m| m.as_str().trim());
            let entities = extract(&rule.intent, &text, group);
            tracing::debug!(intent = %rule.intent, rule = rule.pattern(), "utterance classified");
            return Classification {
                intent: rule.intent.clone(),
                entities,
                rule: Some(rule.pattern().to_string()),
            };
        }
    }

    tracing::debug!(intent = %Intent::GeneralQuery, "no rule matched");
    Classification::fallback(&text)
}

fn extract(intent: &Intent, text: &str, group: Option<&str>) -> Entities {
    match intent {
        Intent::WebSearch | Intent::Wikipedia => Entities {
            query: group.map(str::to_string),
            ..Entities::default()
        },
        Intent::OpenApp | Intent::CloseApp => Entities {
            app_name: group.map(str::to_string),
            ..Entities::default()
        },
        Intent::VolumeControl => volume_entities(text, group),
        Intent::Weather => Entities {
            location: Some(group.filter(|g| !g.is_empty()).unwrap_or("current").to_string()),
            ..Entities::default()
        },
        Intent::SpotifyControl => media_entities(text, group),
        Intent::Custom(_) => Entities {
            query: group.map(str::to_string),
            ..Entities::default()
        },
        _ => Entities::none(),
    }
}

/// Code points of digit zero for the decimal scripts a level is read in.
/// `\d` is Unicode-aware, so the level group can hold any of these.
const DIGIT_ZEROS: [u32; 7] = [
    0x0030, // ASCII
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x0E50, // Thai
    0xFF10, // Fullwidth
];

fn digit_value(c: char) -> Option<u32> {
    let c = c as u32;
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&c))
        .map(|zero| c - zero)
}

/// Decimal value of a run of digits. Overflow saturates; the volume tool
/// clamps to 100 anyway. `None` if any digit is from an unknown script.
fn parse_level(digits: &str) -> Option<u32> {
    digits.chars().try_fold(0u32, |acc, c| {
        Some(acc.saturating_mul(10).saturating_add(digit_value(c)?))
    })
}

fn volume_entities(text: &str, group: Option<&str>) -> Entities {
    if text.contains("volume to")
        && let Some(digits) = group
    {
        // An unreadable level leaves both fields empty so the handler asks.
        return Entities {
            level: parse_level(digits),
            ..Entities::default()
        };
    }

    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
    let action = if has(&["volume up", "increase", "raise"]) {
        EntityAction::Up
    } else if has(&["volume down", "decrease", "lower"]) {
        EntityAction::Down
    } else if text.contains("mute") && !text.contains("unmute") {
        EntityAction::Mute
    } else if text.contains("unmute") {
        EntityAction::Unmute
    } else {
        return Entities::none();
    };
    Entities::with_action(action)
}

fn media_entities(text: &str, group: Option<&str>) -> Entities {
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
    let group = group.filter(|g| !g.is_empty());

    let (action, query) = match text {
        "play spotify" | "start spotify" | "resume spotify" => (EntityAction::Play, None),
        "pause spotify" | "stop spotify" => (EntityAction::Pause, None),
        "play music" => (EntityAction::Play, None),
        _ if has(&["next song", "skip song", "spotify next", "spotify skip"]) => {
            (EntityAction::Next, None)
        }
        _ if has(&["previous song", "spotify previous"]) => (EntityAction::Previous, None),
        _ if has(&["play", "search"]) && text.contains("spotify") => {
            (EntityAction::SearchAndPlay, group)
        }
        _ if text.contains("spotify") && group.is_some() => (EntityAction::SearchAndPlay, group),
        _ => (EntityAction::Play, None),
    };

    let mut entities = Entities::with_action(action);
    entities.query = query.map(str::to_string);
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_of(text: &str) -> Intent {
        classify(text).intent
    }

    #[test]
    fn builtin_table_compiles_in_order() {
        let rules = builtin_rules();
        assert_eq!(rules.first().unwrap().intent, Intent::WebSearch);
        assert_eq!(rules.last().unwrap().intent, Intent::ListProcesses);
        assert_eq!(rules.len(), 102);

        // Intents appear as contiguous blocks in table order.
        let mut seen: Vec<Intent> = Vec::new();
        for rule in rules {
            if seen.last() != Some(&rule.intent) {
                assert!(!seen.contains(&rule.intent), "{} split", rule.intent);
                seen.push(rule.intent.clone());
            }
        }
        assert_eq!(seen, Intent::BUILTIN[..15].to_vec());
    }

    #[test]
    fn web_search_captures_query() {
        let c = classify("Search for Python programming tutorials");
        assert_eq!(c.intent, Intent::WebSearch);
        assert_eq!(c.entities.query(), Some("python programming tutorials"));

        let c = classify("  who is Ada Lovelace ");
        assert_eq!(c.entities.query(), Some("ada lovelace"));
    }

    #[test]
    fn open_and_close_capture_app() {
        let c = classify("Open Chrome");
        assert_eq!(c.intent, Intent::OpenApp);
        assert_eq!(c.entities.app_name(), Some("chrome"));

        let c = classify("kill firefox");
        assert_eq!(c.intent, Intent::CloseApp);
        assert_eq!(c.entities.app_name(), Some("firefox"));
    }

    #[test]
    fn volume_level() {
        let c = classify("volume to 75");
        assert_eq!(c.intent, Intent::VolumeControl);
        assert_eq!(
            c.entities,
            Entities {
                level: Some(75),
                ..Entities::default()
            }
        );
    }

    #[test]
    fn volume_level_overflow_saturates() {
        let c = classify("set volume to 99999999999999");
        assert_eq!(c.entities.level, Some(u32::MAX));
    }

    #[test]
    fn volume_level_in_other_scripts() {
        assert_eq!(classify("volume to ٧٥").entities.level, Some(75));
        assert_eq!(classify("volume to ۴۰").entities.level, Some(40));
        assert_eq!(classify("set volume to ７５").entities.level, Some(75));
        assert_eq!(classify("volume to १००").entities.level, Some(100));
    }

    #[test]
    fn unreadable_volume_level_is_left_empty() {
        // Mongolian digits match `\d` but are not read as a level.
        let c = classify("volume to ᠗᠕");
        assert_eq!(c.intent, Intent::VolumeControl);
        assert_eq!(c.entities, Entities::none());
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("075"), Some(75));
        assert_eq!(parse_level("٧5"), Some(75));
        assert_eq!(parse_level("99999999999999"), Some(u32::MAX));
        assert_eq!(parse_level("᠗"), None);
    }

    #[test]
    fn volume_keywords() {
        assert_eq!(classify("volume up").entities.action, Some(EntityAction::Up));
        assert_eq!(
            classify("raise the volume").entities.action,
            Some(EntityAction::Up)
        );
        assert_eq!(
            classify("lower volume").entities.action,
            Some(EntityAction::Down)
        );
        assert_eq!(classify("mute").entities.action, Some(EntityAction::Mute));
        assert_eq!(
            classify("unmute").entities.action,
            Some(EntityAction::Unmute)
        );
    }

    #[test]
    fn volume_rules_match_inside_words() {
        let c = classify("commute");
        assert_eq!(c.intent, Intent::VolumeControl);
        assert_eq!(c.entities.action, Some(EntityAction::Mute));

        // A level rule without digits does not match at all.
        let c = classify("volume to");
        assert_eq!(c.intent, Intent::GeneralQuery);
    }

    #[test]
    fn time_and_date() {
        assert_eq!(intent_of("What time is it?"), Intent::Time);
        assert_eq!(intent_of("what's the date"), Intent::Date);
        assert_eq!(intent_of("what day is it"), Intent::Date);
        // "what is" belongs to web search and is declared first.
        assert_eq!(intent_of("what is the time"), Intent::WebSearch);
    }

    #[test]
    fn weather_location() {
        let c = classify("weather in paris");
        assert_eq!(c.intent, Intent::Weather);
        assert_eq!(c.entities.location.as_deref(), Some("paris"));

        let c = classify("how's the weather");
        assert_eq!(c.entities.location.as_deref(), Some("current"));
    }

    #[test]
    fn wikipedia_query() {
        let c = classify("Wikipedia artificial intelligence");
        assert_eq!(c.intent, Intent::Wikipedia);
        assert_eq!(c.entities.query(), Some("artificial intelligence"));
    }

    #[test]
    fn spotify_search_and_play() {
        let c = classify("play some jazz on spotify");
        assert_eq!(c.intent, Intent::SpotifyControl);
        assert_eq!(c.entities.action, Some(EntityAction::SearchAndPlay));
        assert_eq!(c.entities.query(), Some("some jazz"));
    }

    #[test]
    fn spotify_cascade() {
        let action = |t: &str| classify(t).entities.action;
        assert_eq!(action("play spotify"), Some(EntityAction::Play));
        assert_eq!(action("pause spotify"), Some(EntityAction::Pause));
        assert_eq!(action("play music"), Some(EntityAction::Play));
        assert_eq!(action("next song"), Some(EntityAction::Next));
        assert_eq!(action("skip song please"), Some(EntityAction::Next));
        assert_eq!(action("previous song"), Some(EntityAction::Previous));

        let c = classify("spotify daft punk");
        assert_eq!(c.entities.action, Some(EntityAction::SearchAndPlay));
        assert_eq!(c.entities.query(), Some("daft punk"));
    }

    #[test]
    fn table_order_shadows_later_intents() {
        let c = classify("stop spotify");
        assert_eq!(c.intent, Intent::CloseApp);
        assert_eq!(c.entities.app_name(), Some("spotify"));

        let c = classify("stop listening");
        assert_eq!(c.intent, Intent::CloseApp);
        assert_eq!(c.entities.app_name(), Some("listening"));

        let c = classify("wikipedia search rust");
        assert_eq!(c.intent, Intent::WebSearch);
        assert_eq!(c.entities.query(), Some("rust"));

        let c = classify("start spotify");
        assert_eq!(c.intent, Intent::OpenApp);
    }

    #[test]
    fn stop_help_greeting_processes() {
        assert_eq!(intent_of("goodbye"), Intent::StopListening);
        assert_eq!(intent_of("stop"), Intent::StopListening);
        assert_eq!(intent_of("help"), Intent::Help);
        assert_eq!(intent_of("what can you do"), Intent::Help);
        assert_eq!(intent_of("hello"), Intent::Greeting);
        assert_eq!(intent_of("good morning"), Intent::Greeting);
        assert_eq!(intent_of("list processes"), Intent::ListProcesses);
        assert_eq!(intent_of("show running processes"), Intent::ListProcesses);
        assert_eq!(intent_of("take a screenshot"), Intent::Screenshot);
        assert_eq!(intent_of("system information"), Intent::SystemInfo);
    }

    #[test]
    fn fallback_keeps_normalized_text() {
        let c = classify("  ASDFGHJKL ");
        assert_eq!(c.intent, Intent::GeneralQuery);
        assert_eq!(c.entities, Entities::with_query("asdfghjkl"));
        assert!(c.rule.is_none());

        let c = classify("delete all files");
        assert_eq!(c.intent, Intent::GeneralQuery);
        assert_eq!(c.entities.query(), Some("delete all files"));
    }

    #[test]
    fn empty_text_falls_back() {
        let c = classify("");
        assert_eq!(c.intent, Intent::GeneralQuery);
        assert_eq!(c.entities.query.as_deref(), Some(""));
    }

    #[test]
    fn classification_is_deterministic() {
        for text in ["stop spotify", "play jazz on spotify", "volume to 10", "xyz"] {
            assert_eq!(classify(text), classify(text));
        }
    }

    #[test]
    fn custom_rules_run_after_builtins() {
        let classifier = Classifier::new()
            .with_rule(Intent::from("translate"), &[r"translate (.+)", r"open sesame"])
            .unwrap();
        assert_eq!(classifier.extra_rules().len(), 2);

        let c = classifier.classify("translate bonjour");
        assert_eq!(c.intent, Intent::Custom("translate".into()));
        assert_eq!(c.entities.query(), Some("bonjour"));

        // A built-in rule still wins on overlap.
        assert_eq!(classifier.classify("open sesame").intent, Intent::OpenApp);
    }

    #[test]
    fn invalid_custom_pattern_is_an_error() {
        assert!(Classifier::new().with_rule(Intent::from("x"), &["("]).is_err());
    }
}
