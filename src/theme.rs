//! Team themes — static colour bundles and free-text team resolution.
//!
//! DESIGN
//! ======
//! Providers name teams inconsistently: Jolpica sends `red_bull`, OpenF1 sends
//! `Red Bull Racing`, sponsors come and go (`Kick Sauber`, `Stake F1 Team`).
//! Resolution normalizes the input to lowercase letters only, then tries:
//!
//! 1. a short list of ids that must equal the whole input (`rb`);
//! 2. each theme's alias list, in table order (substring containment);
//! 3. an ordered keyword list, first match wins;
//! 4. the neutral theme.
//!
//! Aliases always beat keywords. Keyword order matters where one keyword is
//! contained in another team's name (`racingbull` must be tried before `bull`).

// =============================================================================
// TEAM KEY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeamKey {
    RedBull,
    Ferrari,
    Mercedes,
    McLaren,
    AstonMartin,
    Alpine,
    Williams,
    Haas,
    RacingBulls,
    Audi,
    Cadillac,
    Neutral,
}

impl TeamKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RedBull => "red_bull",
            Self::Ferrari => "ferrari",
            Self::Mercedes => "mercedes",
            Self::McLaren => "mclaren",
            Self::AstonMartin => "aston_martin",
            Self::Alpine => "alpine",
            Self::Williams => "williams",
            Self::Haas => "haas",
            Self::RacingBulls => "rb",
            Self::Audi => "audi",
            Self::Cadillac => "cadillac",
            Self::Neutral => "neutral",
        }
    }

    #[must_use]
    pub fn theme(self) -> &'static TeamTheme {
        THEMES
            .iter()
            .find(|theme| theme.key == self)
            .unwrap_or(&NEUTRAL)
    }
}

// =============================================================================
// THEME TABLE
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
pub struct TeamTheme {
    pub key: TeamKey,
    pub name: &'static str,
    pub short: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    /// Normalized (lowercase, letters only) identifier fragments.
    pub aliases: &'static [&'static str],
}

const NEUTRAL: TeamTheme = TeamTheme {
    key: TeamKey::Neutral,
    name: "The Undercut",
    short: "F1",
    primary: "#E10600",
    secondary: "#FFD700",
    background: "#08080C",
    surface: "#101016",
    aliases: &[],
};

/// Alias lookup order.
pub static THEMES: [TeamTheme; 12] = [
    TeamTheme {
        key: TeamKey::RedBull,
        name: "Red Bull Racing",
        short: "RBR",
        primary: "#3671C6",
        secondary: "#CC1E4A",
        background: "#080E1C",
        surface: "#0C1628",
        aliases: &["redbull"],
    },
    TeamTheme {
        key: TeamKey::Ferrari,
        name: "Scuderia Ferrari",
        short: "FER",
        primary: "#E8002D",
        secondary: "#FFF200",
        background: "#140407",
        surface: "#220810",
        aliases: &["ferrari"],
    },
    TeamTheme {
        key: TeamKey::Mercedes,
        name: "Mercedes-AMG",
        short: "MER",
        primary: "#27F4D2",
        secondary: "#000000",
        background: "#06120F",
        surface: "#0A1E1A",
        aliases: &["mercedes"],
    },
    TeamTheme {
        key: TeamKey::McLaren,
        name: "McLaren F1 Team",
        short: "MCL",
        primary: "#FF8000",
        secondary: "#47C7FC",
        background: "#140D03",
        surface: "#221806",
        aliases: &["mclaren"],
    },
    TeamTheme {
        key: TeamKey::AstonMartin,
        name: "Aston Martin",
        short: "AMR",
        primary: "#229971",
        secondary: "#CEDC00",
        background: "#061410",
        surface: "#0C221C",
        aliases: &["astonmartin"],
    },
    TeamTheme {
        key: TeamKey::Alpine,
        name: "Alpine F1 Team",
        short: "ALP",
        primary: "#0093CC",
        secondary: "#FF69B4",
        background: "#060F18",
        surface: "#0C1A28",
        aliases: &["alpine"],
    },
    TeamTheme {
        key: TeamKey::Williams,
        name: "Williams Racing",
        short: "WIL",
        primary: "#64C4FF",
        secondary: "#005AFF",
        background: "#060D14",
        surface: "#0C1822",
        aliases: &["williams"],
    },
    TeamTheme {
        key: TeamKey::Haas,
        name: "Haas F1 Team",
        short: "HAS",
        primary: "#B6BABD",
        secondary: "#E10600",
        background: "#0E0E0F",
        surface: "#181818",
        aliases: &["haas"],
    },
    TeamTheme {
        key: TeamKey::RacingBulls,
        name: "Racing Bulls",
        short: "RCB",
        primary: "#6692FF",
        secondary: "#FF4444",
        background: "#080B18",
        surface: "#0E1428",
        aliases: &["racingbulls", "alphatauri", "visacashapp"],
    },
    TeamTheme {
        key: TeamKey::Audi,
        name: "Audi F1 Team",
        short: "AUD",
        primary: "#E10019",
        secondary: "#000000",
        background: "#1A0408",
        surface: "#280810",
        aliases: &["sauber", "alfa", "audi", "kick"],
    },
    TeamTheme {
        key: TeamKey::Cadillac,
        name: "Cadillac F1 Team",
        short: "CAD",
        primary: "#C4A747",
        secondary: "#1A1A1A",
        background: "#121008",
        surface: "#1E1A10",
        aliases: &["cadillac", "andretti", "twg"],
    },
    NEUTRAL,
];

/// Identifiers too short to match as substrings; compared to the whole
/// normalized id and checked before the aliases.
const EXACT_IDS: &[(&str, TeamKey)] = &[("rb", TeamKey::RacingBulls)];

/// Broader keyword heuristics, tried in order after every alias misses.
const KEYWORDS: &[(&[&str], TeamKey)] = &[
    (&["racingbull", "tauri"], TeamKey::RacingBulls),
    (&["bull", "verstappen"], TeamKey::RedBull),
    (&["ferrar"], TeamKey::Ferrari),
    (&["merced"], TeamKey::Mercedes),
    (&["laren"], TeamKey::McLaren),
    (&["aston"], TeamKey::AstonMartin),
    (&["alpin"], TeamKey::Alpine),
    (&["williams"], TeamKey::Williams),
    (&["haas", "tgr"], TeamKey::Haas),
    (&["audi", "sauber", "stake", "alfa", "kick"], TeamKey::Audi),
    (&["cadillac", "andretti", "twg"], TeamKey::Cadillac),
];

// =============================================================================
// RESOLUTION
// =============================================================================

/// Lowercase and keep ASCII letters only: `"Red Bull_Racing 2"` → `"redbullracing"`.
#[must_use]
pub fn normalize_team_id(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolve a free-text constructor/team identifier. Total: absent, empty and
/// unrecognized input all resolve to [`TeamKey::Neutral`].
#[must_use]
pub fn resolve_team(raw: Option<&str>) -> TeamKey {
    let Some(raw) = raw else {
        return TeamKey::Neutral;
    };
    let id = normalize_team_id(raw);
    if id.is_empty() {
        return TeamKey::Neutral;
    }

    if let Some((_, key)) = EXACT_IDS.iter().find(|(exact, _)| id == *exact) {
        return *key;
    }

    if let Some(theme) = THEMES
        .iter()
        .find(|theme| theme.aliases.iter().any(|alias| id.contains(alias)))
    {
        return theme.key;
    }

    KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| id.contains(kw)))
        .map_or(TeamKey::Neutral, |(_, key)| *key)
}

/// [`resolve_team`] followed by the theme lookup.
#[must_use]
pub fn resolve_theme(raw: Option<&str>) -> &'static TeamTheme {
    resolve_team(raw).theme()
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
