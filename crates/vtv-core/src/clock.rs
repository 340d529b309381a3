//! Time and identifier capabilities injected into the store.

use chrono::{DateTime, SecondsFormat, Utc};

/// Source of the current time.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of unique string identifiers.
pub trait IdGenerator {
    /// Returns an identifier not returned before by this generator.
    fn generate(&mut self) -> String;

    /// Notes an identifier already in use so that later ones do not repeat it.
    fn observe(&mut self, _id: &str) {}
}

/// Millisecond-epoch identifiers, bumped so that each one is strictly
/// greater than the last one generated or observed.
///
/// Ids may run ahead of the wall clock after a burst; observing the ids
/// already persisted keeps a new process from handing them out again.
#[derive(Debug, Clone, Default)]
pub struct TimestampIdGenerator {
    last: i64,
}

impl TimestampIdGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn generate(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        self.last.to_string()
    }

    fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<i64>() {
            self.last = self.last.max(n);
        }
    }
}

/// Counter-based identifiers (`prefix-1`, `prefix-2`, ...).
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    /// Creates a generator whose ids start with `prefix`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: String::from(prefix),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Formats `at` like JavaScript `toISOString()` (`2024-01-01T00:00:00.000Z`).
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a timestamp written by [`format_timestamp`] (any RFC 3339 value).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_timestamp_matches_iso_string() {
        // Arrange
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();

        // Act
        let s = format_timestamp(at);

        // Assert
        assert_eq!(s, "2024-03-05T07:08:09.000Z");
        assert_eq!(parse_timestamp(&s), Some(at));
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_timestamp_ids_are_unique_and_increasing() {
        // Arrange
        let mut ids = TimestampIdGenerator::new();

        // Act
        let generated: Vec<i64> = (0..1000)
            .map(|_| ids.generate().parse().unwrap())
            .collect();

        // Assert
        assert!(generated.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(generated.iter().collect::<HashSet<_>>().len(), 1000);
    }

    #[test]
    fn test_timestamp_ids_skip_observed_ids() {
        // Arrange
        let mut ids = TimestampIdGenerator::new();
        let ahead = Utc::now().timestamp_millis().saturating_add(60_000);

        // Act
        ids.observe(&ahead.to_string());
        ids.observe("not-a-number");
        let next: i64 = ids.generate().parse().unwrap();

        // Assert
        assert_eq!(next, ahead.saturating_add(1));
    }

    #[test]
    fn test_sequential_ids() {
        // Arrange
        let mut ids = SequentialIdGenerator::new("ch");

        // Act & Assert
        assert_eq!(ids.generate(), "ch-1");
        assert_eq!(ids.generate(), "ch-2");
    }
}
