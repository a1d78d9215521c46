//! Completion log
//!
//! Maps each local calendar day to the set of habits completed on it.
//! Keys sort chronologically, which the best-streak scan relies on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::id::HabitId;

/// Date format used for log keys and CLI arguments
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` day key
pub fn parse_day(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

/// Formats a day as a `YYYY-MM-DD` key
pub fn day_key(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// One persisted log line: a day and the habits completed on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub habits: BTreeSet<HabitId>,
}

/// Per-day completion sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogBook(BTreeMap<NaiveDate, BTreeSet<HabitId>>);

impl LogBook {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Flips membership of `habit_id` on `day`, returning true if it is now logged
    ///
    /// A day whose set becomes empty stays recorded.
    pub fn toggle(&mut self, habit_id: &HabitId, day: NaiveDate) -> bool {
        let entry = self.0.entry(day).or_default();
        if entry.remove(habit_id) {
            false
        } else {
            entry.insert(habit_id.clone());
            true
        }
    }

    pub fn is_logged(&self, habit_id: &HabitId, day: NaiveDate) -> bool {
        self.0.get(&day).is_some_and(|set| set.contains(habit_id))
    }

    /// Habits completed on `day` (empty when the day has no record)
    pub fn for_day(&self, day: NaiveDate) -> BTreeSet<HabitId> {
        self.0.get(&day).cloned().unwrap_or_default()
    }

    /// Recorded days with their completion sets, ascending
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &BTreeSet<HabitId>)> {
        self.0.iter().map(|(day, set)| (*day, set))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts to persisted line entries, ascending by date
    pub fn to_entries(&self) -> Vec<DayEntry> {
        self.0
            .iter()
            .map(|(date, habits)| DayEntry {
                date: *date,
                habits: habits.clone(),
            })
            .collect()
    }
}

impl FromIterator<DayEntry> for LogBook {
    /// Entries for the same day are merged
    fn from_iter<I: IntoIterator<Item = DayEntry>>(iter: I) -> Self {
        let mut map: BTreeMap<NaiveDate, BTreeSet<HabitId>> = BTreeMap::new();
        for entry in iter {
            map.entry(entry.date).or_default().extend(entry.habits);
        }
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> HabitId {
        s.parse().unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn toggle_flips_membership() {
        let mut logs = LogBook::new();
        let h = id("h1");
        let d = day("2024-01-01");

        assert!(!logs.is_logged(&h, d));
        assert!(logs.toggle(&h, d));
        assert!(logs.is_logged(&h, d));
        assert!(!logs.toggle(&h, d));
        assert!(!logs.is_logged(&h, d));
    }

    #[test]
    fn untoggled_day_stays_recorded() {
        let mut logs = LogBook::new();
        let d = day("2024-01-01");

        logs.toggle(&id("h1"), d);
        logs.toggle(&id("h1"), d);

        assert_eq!(logs.len(), 1);
        assert!(logs.for_day(d).is_empty());
    }

    #[test]
    fn missing_day_is_empty() {
        let logs = LogBook::new();
        assert!(logs.for_day(day("2024-03-01")).is_empty());
        assert!(!logs.is_logged(&id("h1"), day("2024-03-01")));
    }

    #[test]
    fn days_are_chronological() {
        let mut logs = LogBook::new();
        logs.toggle(&id("h1"), day("2024-02-01"));
        logs.toggle(&id("h1"), day("2023-12-31"));
        logs.toggle(&id("h1"), day("2024-01-15"));

        let days: Vec<_> = logs.iter().map(|(d, _)| day_key(d)).collect();
        assert_eq!(days, vec!["2023-12-31", "2024-01-15", "2024-02-01"]);
    }

    #[test]
    fn deserializes_date_keyed_map() {
        let json = r#"{"2024-01-01": ["h1", "h2", "h1"], "2024-01-02": []}"#;
        let logs: LogBook = serde_json::from_str(json).unwrap();

        assert_eq!(logs.len(), 2);
        assert_eq!(logs.for_day(day("2024-01-01")).len(), 2);
        assert!(logs.is_logged(&id("h2"), day("2024-01-01")));
    }

    #[test]
    fn entries_merge_duplicate_days() {
        let entries = vec![
            DayEntry {
                date: day("2024-01-01"),
                habits: [id("h1")].into(),
            },
            DayEntry {
                date: day("2024-01-01"),
                habits: [id("h2")].into(),
            },
        ];

        let logs: LogBook = entries.into_iter().collect();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs.for_day(day("2024-01-01")).len(), 2);
        assert_eq!(logs.to_entries().len(), 1);
    }

    #[test]
    fn parse_day_rejects_bad_input() {
        assert!(parse_day("2024-13-01").is_err());
        assert!(parse_day("yesterday").is_err());
        assert_eq!(day_key(day(" 2024-01-05 ")), "2024-01-05");
    }
}
