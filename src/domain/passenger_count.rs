use std::num::NonZeroU16;

use serde::{Serialize, Serializer};

/// How many people ride. Sent over the wire as decimal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PassengerCount(NonZeroU16);

impl PassengerCount {
    pub fn parse(s: &str) -> Result<Self, String> {
        s.trim()
            .parse::<NonZeroU16>()
            .map(Self)
            .map_err(|e| format!("{s:?} is not a passenger count: {e}"))
    }

    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }
}

impl std::fmt::Display for PassengerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for PassengerCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}
