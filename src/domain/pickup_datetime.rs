use chrono::{DateTime, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Wall-clock time the rider wants to be picked up.
///
/// The form carries no time zone, so the value stays naive. An RFC 3339 input
/// keeps the local time it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PickupDateTime(NaiveDateTime);

impl PickupDateTime {
    /// What a `datetime-local` control submits.
    const MINUTES: &'static str = "%Y-%m-%dT%H:%M";
    /// Seconds with an optional fraction; also the wire format.
    const SECONDS: &'static str = "%Y-%m-%dT%H:%M:%S%.f";
    const WIRE: &'static str = "%Y-%m-%dT%H:%M:%S";

    /// Reads `YYYY-MM-DDTHH:MM`, the same with seconds and an optional
    /// fraction, or RFC 3339.
    ///
    /// Only the wall-clock time survives: an RFC 3339 offset is dropped, and
    /// fractional seconds are cut when the value is serialized. Two distinct
    /// instants can therefore share one wire text.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, Self::MINUTES)
            .or_else(|_| NaiveDateTime::parse_from_str(s, Self::SECONDS))
            .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_local()))
            .map(Self)
            .map_err(|e| format!("{s:?} is not a valid point in time: {e}"))
    }

    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    pub fn inner(self) -> NaiveDateTime {
        self.0
    }
}

impl std::fmt::Display for PickupDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl Serialize for PickupDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0.format(Self::WIRE))
    }
}
