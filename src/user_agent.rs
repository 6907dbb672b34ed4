use std::fmt;

/// Operating system family detected in a User-Agent string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsCategory {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Other,
    Unknown,
}

impl OsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsCategory::Windows => "Windows",
            OsCategory::MacOs => "macOS",
            OsCategory::Linux => "Linux",
            OsCategory::Android => "Android",
            OsCategory::Ios => "iOS",
            OsCategory::Other => "Other",
            OsCategory::Unknown => "Unknown",
        }
    }

    fn detect(lowered: &str) -> Self {
        if lowered.contains("windows") {
            OsCategory::Windows
        } else if lowered.contains("mac os") || lowered.contains("macos") {
            OsCategory::MacOs
        } else if lowered.contains("linux") {
            OsCategory::Linux
        } else if lowered.contains("android") {
            OsCategory::Android
        } else if lowered.contains("ios") {
            OsCategory::Ios
        } else {
            OsCategory::Other
        }
    }
}

impl fmt::Display for OsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser family detected in a User-Agent string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserCategory {
    Edge,
    Firefox,
    Chrome,
    Chromium,
    Safari,
    Opera,
    Other,
    Unknown,
}

impl BrowserCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserCategory::Edge => "Edge",
            BrowserCategory::Firefox => "Firefox",
            BrowserCategory::Chrome => "Chrome",
            BrowserCategory::Chromium => "Chromium",
            BrowserCategory::Safari => "Safari",
            BrowserCategory::Opera => "Opera",
            BrowserCategory::Other => "Other",
            BrowserCategory::Unknown => "Unknown",
        }
    }

    // Edge and Opera ship Chromium tokens as well, so the order of checks matters.
    fn detect(lowered: &str) -> Self {
        if lowered.contains("edg/") || lowered.contains("edge/") {
            BrowserCategory::Edge
        } else if lowered.contains("firefox") || lowered.contains("fxios") {
            BrowserCategory::Firefox
        } else if lowered.contains("chrome") && !lowered.contains("chromium") {
            BrowserCategory::Chrome
        } else if lowered.contains("chromium") {
            BrowserCategory::Chromium
        } else if lowered.contains("safari") && !lowered.contains("chrome") {
            BrowserCategory::Safari
        } else if lowered.contains("opera") || lowered.contains("opr/") {
            BrowserCategory::Opera
        } else {
            BrowserCategory::Other
        }
    }
}

impl fmt::Display for BrowserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a raw User-Agent header.
///
/// Computed once per log line and embedded by value into its [`LogEntry`](crate::log_entry::LogEntry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgent {
    pub os: OsCategory,
    pub browser: BrowserCategory,
    pub is_bot: bool,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            os: OsCategory::Unknown,
            browser: BrowserCategory::Unknown,
            is_bot: false,
        }
    }
}

impl UserAgent {
    /// Classifies a User-Agent string. Never fails: an empty string yields
    /// `Unknown`/`Unknown` and is not considered a bot.
    pub fn classify(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let lowered = raw.to_lowercase();
        Self {
            os: OsCategory::detect(&lowered),
            browser: BrowserCategory::detect(&lowered),
            is_bot: lowered.contains("bot"),
        }
    }

    /// Same as [`UserAgent::classify`] for a header that may be absent altogether.
    pub fn classify_optional(raw: Option<&str>) -> Self {
        raw.map(Self::classify).unwrap_or_default()
    }
}

/// Search engine crawlers tallied separately in the file report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchCrawler {
    Googlebot,
    YandexBot,
}

impl SearchCrawler {
    pub fn from_program(program: &str) -> Option<Self> {
        if program.eq_ignore_ascii_case("googlebot") {
            Some(SearchCrawler::Googlebot)
        } else if program.eq_ignore_ascii_case("yandexbot") {
            Some(SearchCrawler::YandexBot)
        } else {
            None
        }
    }

    /// Detects a crawler from a full User-Agent header
    pub fn detect(user_agent: &str) -> Option<Self> {
        crawler_program(user_agent).and_then(Self::from_program)
    }
}

impl fmt::Display for SearchCrawler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCrawler::Googlebot => f.write_str("Googlebot"),
            SearchCrawler::YandexBot => f.write_str("YandexBot"),
        }
    }
}

/// Extracts the program name a crawler advertises in its first comment,
/// e.g. `Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)` → `Googlebot`.
pub fn crawler_program(user_agent: &str) -> Option<&str> {
    let user_agent = user_agent.trim();
    if user_agent.is_empty() || user_agent == "-" {
        return None;
    }

    let open = user_agent.find('(')?;
    let close = open + user_agent[open..].find(')')?;
    let comment = &user_agent[open + 1..close];

    let fragment = comment.split(';').nth(1)?.trim();
    let program = match fragment.find('/') {
        Some(slash) => fragment[..slash].trim(),
        None => fragment,
    };

    Some(program)
}
