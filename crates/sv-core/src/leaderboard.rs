//! Hiscore table
//!
//! Fixed-capacity table of the best runs, sorted by total points, highest
//! first. A cleared table is full of "no one" placeholders that compete
//! like real entries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DEFAULT_HISCORE_CAPACITY;
use crate::campaign::Scoring;

/// Hiscore errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("hiscore index {index} out of range (table has {len} entries)")]
    OutOfRange { index: usize, len: usize },
}

/// A single hiscore entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiScore {
    pub name: String,
    pub total_points: i64,
    pub difficulty_percent: i32,
    pub survival_points: i64,
    pub kill_points: i64,
    pub achievement_points: i64,
    pub turns_survived: i32,
    pub playing_time_secs: u64,
    pub skills_description: String,
    pub death_description: String,
}

impl HiScore {
    /// Placeholder filling a cleared table
    pub fn no_one() -> Self {
        Self {
            name: "no one".to_string(),
            total_points: 0,
            difficulty_percent: 0,
            survival_points: 0,
            kill_points: 0,
            achievement_points: 0,
            turns_survived: 0,
            playing_time_secs: 0,
            skills_description: "no skills".to_string(),
            death_description: "was never born".to_string(),
        }
    }

    /// Build an entry from a finished run
    pub fn from_scoring(name: impl Into<String>, scoring: &Scoring, skills: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_points: scoring.total_points(),
            difficulty_percent: scoring.difficulty_percent(),
            survival_points: scoring.survival_points(),
            kill_points: scoring.kill_points,
            achievement_points: scoring.achievement_points(),
            turns_survived: scoring.turns_survived,
            playing_time_secs: scoring.real_playing_time_secs,
            skills_description: skills.into(),
            death_description: scoring
                .death_reason
                .clone()
                .unwrap_or_else(|| "still alive".to_string()),
        }
    }
}

/// Ranked hiscore table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiScoreTable {
    capacity: usize,
    entries: Vec<HiScore>,
}

impl Default for HiScoreTable {
    fn default() -> Self {
        Self::new(DEFAULT_HISCORE_CAPACITY)
    }
}

impl HiScoreTable {
    /// Create an empty table; capacity is at least one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Create a table already filled with placeholders
    pub fn cleared(capacity: usize) -> Self {
        let mut table = Self::new(capacity);
        table.clear();
        table
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every entry with a placeholder
    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.resize_with(self.capacity, HiScore::no_one);
    }

    /// Index a new entry would be inserted at: after every entry scoring at
    /// least as much.
    fn insertion_index(&self, total_points: i64) -> usize {
        self.entries
            .iter()
            .position(|e| e.total_points < total_points)
            .unwrap_or(self.entries.len())
    }

    /// Insert an entry at its rank.
    ///
    /// Returns the 1-indexed rank if the entry made it into the table, or
    /// `None` (table untouched) if it would fall off the end.
    pub fn register(&mut self, entry: HiScore) -> Option<usize> {
        let pos = self.insertion_index(entry.total_points);
        if pos >= self.capacity {
            return None;
        }

        self.entries.insert(pos, entry);
        self.entries.truncate(self.capacity);
        Some(pos + 1)
    }

    /// Check if a total would make the table
    pub fn would_qualify(&self, total_points: i64) -> bool {
        self.insertion_index(total_points) < self.capacity
    }

    /// Entry at a 0-based index
    pub fn get(&self, index: usize) -> Result<&HiScore, LeaderboardError> {
        self.entries.get(index).ok_or(LeaderboardError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Highest entry
    pub fn highest(&self) -> Option<&HiScore> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HiScore> {
        self.entries.iter()
    }

    /// Restore the capacity bound and ordering after a decode
    pub fn normalize(&mut self) {
        self.capacity = self.capacity.max(1);
        self.entries
            .sort_by(|a, b| b.total_points.cmp(&a.total_points));
        self.entries.truncate(self.capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(name: &str, total: i64) -> HiScore {
        HiScore {
            name: name.to_string(),
            total_points: total,
            ..HiScore::no_one()
        }
    }

    fn totals(table: &HiScoreTable) -> Vec<i64> {
        table.iter().map(|e| e.total_points).collect()
    }

    #[test]
    fn test_ranked_insertion() {
        let mut table = HiScoreTable::new(3);
        table.clear();
        assert_eq!(table.len(), 3);

        assert_eq!(table.register(entry("A", 50)), Some(1));
        assert_eq!(table.register(entry("B", 80)), Some(1));
        assert_eq!(table.register(entry("C", 30)), Some(3));
        assert_eq!(totals(&table), vec![80, 50, 30]);

        let before = table.clone();
        assert_eq!(table.register(entry("D", 10)), None);
        assert_eq!(table, before);

        assert_eq!(table.register(entry("E", 60)), Some(2));
        assert_eq!(totals(&table), vec![80, 60, 50]);
    }

    #[test]
    fn test_placeholders_compete() {
        let mut table = HiScoreTable::cleared(3);
        assert_eq!(table.register(entry("Low", 1)), Some(1));
        assert_eq!(totals(&table), vec![1, 0, 0]);
        // Zero never beats a placeholder
        assert_eq!(table.register(entry("Zero", 0)), None);
    }

    #[test]
    fn test_ties_keep_existing_order() {
        let mut table = HiScoreTable::new(4);
        table.register(entry("first", 100));
        table.register(entry("second", 100));
        table.register(entry("third", 100));
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_table_accepts_until_full() {
        let mut table = HiScoreTable::new(2);
        assert!(table.would_qualify(0));
        assert_eq!(table.register(entry("A", 0)), Some(1));
        assert_eq!(table.register(entry("B", 0)), Some(2));
        assert!(!table.would_qualify(0));
        assert_eq!(table.register(entry("C", 0)), None);
    }

    #[test]
    fn test_get_bounds() {
        let table = HiScoreTable::cleared(3);
        assert_eq!(table.get(2).unwrap().name, "no one");
        assert_eq!(
            table.get(3),
            Err(LeaderboardError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_from_scoring() {
        let mut scoring = Scoring::new();
        scoring.register_kill("zombie", 40);
        scoring.set_death(300, "torn apart by a zombie");
        let score = HiScore::from_scoring("Alice", &scoring, "Agile 2");

        assert_eq!(score.kill_points, 40);
        assert_eq!(score.survival_points, 20);
        assert_eq!(score.total_points, 60);
        assert_eq!(score.death_description, "torn apart by a zombie");
    }

    #[test]
    fn test_normalize() {
        let mut table: HiScoreTable = serde_json::from_str(
            r#"{"capacity":2,"entries":[
                {"name":"a","total_points":1,"difficulty_percent":0,"survival_points":0,"kill_points":0,"achievement_points":0,"turns_survived":0,"playing_time_secs":0,"skills_description":"","death_description":""},
                {"name":"b","total_points":9,"difficulty_percent":0,"survival_points":0,"kill_points":0,"achievement_points":0,"turns_survived":0,"playing_time_secs":0,"skills_description":"","death_description":""},
                {"name":"c","total_points":5,"difficulty_percent":0,"survival_points":0,"kill_points":0,"achievement_points":0,"turns_survived":0,"playing_time_secs":0,"skills_description":"","death_description":""}
            ]}"#,
        )
        .unwrap();
        table.normalize();
        assert_eq!(totals(&table), vec![9, 5]);
    }

    proptest! {
        #[test]
        fn prop_sorted_and_bounded(
            capacity in 1usize..15,
            scores in proptest::collection::vec(0i64..1000, 0..40),
        ) {
            let mut table = HiScoreTable::cleared(capacity);
            for (i, s) in scores.iter().enumerate() {
                table.register(entry(&format!("p{i}"), *s));
                prop_assert!(table.len() <= capacity);
            }
            let t = totals(&table);
            prop_assert!(t.windows(2).all(|w| w[0] >= w[1]));
            prop_assert_eq!(table.len(), capacity);
        }
    }
}
