//! Spoken command catalog for the `help` intent.

/// (heading, entries) in the order they are read out.
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "WEB SEARCH & INFORMATION",
        &[
            "\"Search for [topic]\" - Search the internet",
            "\"What is [something]\" - Get definitions/info",
            "\"Tell me about [topic]\" - General information",
            "\"Look up [term]\" - Find information online",
            "\"Google [query]\" - Web search",
            "\"Search for latest science news\" - News headlines",
        ],
    ),
    (
        "KNOWLEDGE & WIKIPEDIA",
        &[
            "\"Wikipedia [topic]\" - Search Wikipedia",
            "\"Wiki [subject]\" - Wikipedia lookup",
            "\"Summary of [topic]\" - Get topic summary",
        ],
    ),
    (
        "SPOTIFY MUSIC CONTROL",
        &[
            "\"Play Spotify\" - Start Spotify playback",
            "\"Pause Spotify\" - Pause Spotify playback",
            "\"Resume Spotify\" - Resume Spotify playback",
            "\"Play [song/artist] on Spotify\" - Search and play",
            "\"Next song\" - Skip to next track",
            "\"Previous song\" - Go to previous track",
            "\"Play music\" - Start music playback",
        ],
    ),
    (
        "SYSTEM CONTROL",
        &[
            "\"Open [app name]\" - Launch applications",
            "\"Close [app name]\" - Close applications",
            "\"Take a screenshot\" - Capture screen",
            "\"System information\" - Get system specs",
            "\"List processes\" - Show running programs",
        ],
    ),
    (
        "VOLUME CONTROL",
        &[
            "\"Set volume to [0-100]\" - Set specific volume",
            "\"Volume up\" - Increase volume",
            "\"Volume down\" - Decrease volume",
            "\"Mute\" - Mute audio",
            "\"Unmute\" - Unmute audio",
        ],
    ),
    (
        "TIME & DATE",
        &[
            "\"What time is it?\" - Current time",
            "\"What's the date?\" - Current date",
            "\"What day is it?\" - Current day",
        ],
    ),
    (
        "WEATHER (Coming Soon)",
        &[
            "\"Weather\" - Local weather",
            "\"Weather in [city]\" - Weather for location",
        ],
    ),
];

const EXAMPLES: &[&str] = &[
    "Search for Python programming tutorials",
    "Open Chrome",
    "Set volume to 75",
    "Play Spotify",
    "Play some jazz on Spotify",
    "What time is it?",
    "Take a screenshot",
    "Wikipedia artificial intelligence",
    "Close Spotify",
];

const TIPS: &[&str] = &[
    "Speak clearly and naturally",
    "You can use variations of these commands",
    "Say 'confirm' when asked for confirmation",
    "Say 'help' anytime to see this list",
    "Make sure apps are installed before opening them",
];

/// Build the catalog, naming the assistant where the user addresses it.
pub fn help_text(assistant_name: &str) -> String {
    let title = format!("{} ASSISTANT - AVAILABLE COMMANDS", assistant_name.to_uppercase());
    let mut lines = vec![title.clone(), "=".repeat(title.len()), String::new()];

    for (heading, entries) in SECTIONS {
        lines.push(format!("{heading}:"));
        lines.extend(entries.iter().map(|e| format!("- {e}")));
        lines.push(String::new());
    }

    lines.push("BASIC INTERACTIONS:".into());
    lines.push(format!("- \"Hello\" / \"Hi\" - Greet {assistant_name}"));
    lines.push("- \"Help\" - Show this command list".into());
    lines.push("- \"What can you do?\" - Show capabilities".into());
    lines.push(format!("- \"Goodbye\" / \"Stop\" - Exit {assistant_name}"));
    lines.push(String::new());

    lines.push("EXAMPLE COMMANDS:".into());
    lines.extend(EXAMPLES.iter().map(|e| format!("- \"{e}\"")));
    lines.push(String::new());

    lines.push("TIPS:".into());
    lines.extend(TIPS.iter().map(|t| format!("- {t}")));
    lines.push(String::new());

    lines.push("Ready to assist! Just say any command naturally.".into());
    lines.join("\n")
}
