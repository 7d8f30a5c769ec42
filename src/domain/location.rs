use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// A pickup or drop location as typed by the rider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub const MAX_GRAPHEMES: usize = 256;

    pub fn parse(s: String) -> Result<Self, String> {
        if !Self::is_present(&s) {
            Err("Location is empty.".to_string())
        } else if !Self::fits(&s) {
            Err("Location is too long.".to_string())
        } else {
            Ok(Self(s))
        }
    }

    /// At least one non-whitespace character.
    pub fn is_present(s: &str) -> bool {
        !s.trim().is_empty()
    }

    pub fn fits(s: &str) -> bool {
        s.graphemes(true).count() <= Self::MAX_GRAPHEMES
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
