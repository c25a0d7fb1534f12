//! Tyre compounds as shown on the timing board.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TyreCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl TyreCompound {
    /// Case-insensitive; anything unrecognized (including `None`) is `Unknown`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("SOFT") => Self::Soft,
            Some("MEDIUM") => Self::Medium,
            Some("HARD") => Self::Hard,
            Some("INTERMEDIATE") => Self::Intermediate,
            Some("WET") => Self::Wet,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Soft => "S",
            Self::Medium => "M",
            Self::Hard => "H",
            Self::Intermediate => "I",
            Self::Wet => "W",
            Self::Unknown => "?",
        }
    }
}
