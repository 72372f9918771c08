//! Scoring accumulator
//!
//! Survival, kill and achievement points, plus the event history shown on
//! the death screen.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use crate::TURNS_PER_HOUR;

/// Which side the player is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum DifficultySide {
    #[default]
    Living,
    Undead,
}

/// One-time achievements
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
)]
pub enum Achievement {
    ReachedDay7,
    ReachedDay14,
    ReachedDay21,
    ReachedDay28,
    KilledTheSewersThing,
    EnteredCharFacility,
    FreedPoliceStationPrisoner,
    ReincarnatedOnce,
}

impl Achievement {
    /// Points awarded when completed
    pub const fn points(self) -> i64 {
        match self {
            Achievement::ReachedDay7 => 1000,
            Achievement::ReachedDay14 => 2000,
            Achievement::ReachedDay21 => 3000,
            Achievement::ReachedDay28 => 4000,
            Achievement::KilledTheSewersThing => 1000,
            Achievement::EnteredCharFacility => 500,
            Achievement::FreedPoliceStationPrisoner => 500,
            Achievement::ReincarnatedOnce => 0,
        }
    }
}

/// Completed achievement with the turn it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub achievement: Achievement,
    pub turn: i32,
}

/// Entry of the event history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub turn: i32,
    pub text: String,
}

/// Survival/kill/achievement accumulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    pub side: DifficultySide,
    /// Score multiplier, 1.0 = normal
    pub difficulty_rating: f32,
    pub reincarnation_number: u32,
    pub turns_survived: i32,
    pub kill_points: i64,
    /// Kills tallied per actor model
    pub kills: BTreeMap<String, u32>,
    /// Actor models seen at least once
    pub sightings: BTreeSet<String>,
    pub achievements: Vec<AchievementRecord>,
    pub events: Vec<GameEvent>,
    pub death_reason: Option<String>,
    pub real_playing_time_secs: u64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            side: DifficultySide::default(),
            difficulty_rating: 1.0,
            reincarnation_number: 0,
            turns_survived: 0,
            kill_points: 0,
            kills: BTreeMap::new(),
            sightings: BTreeSet::new(),
            achievements: Vec::new(),
            events: Vec::new(),
            death_reason: None,
            real_playing_time_secs: 0,
        }
    }
}

impl Scoring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two points per in-game hour survived
    pub fn survival_points(&self) -> i64 {
        2 * i64::from(self.turns_survived) / i64::from(TURNS_PER_HOUR)
    }

    pub fn achievement_points(&self) -> i64 {
        self.achievements.iter().map(|a| a.achievement.points()).sum()
    }

    /// Sum of all points scaled by the difficulty rating
    pub fn total_points(&self) -> i64 {
        let raw = self.survival_points() + self.kill_points + self.achievement_points();
        (raw as f64 * f64::from(self.difficulty_rating)).floor() as i64
    }

    /// Difficulty as a whole percentage
    pub fn difficulty_percent(&self) -> i32 {
        (self.difficulty_rating * 100.0).round() as i32
    }

    pub fn register_kill(&mut self, model: &str, points: i64) {
        *self.kills.entry(model.to_string()).or_insert(0) += 1;
        self.kill_points += points;
    }

    pub fn total_kills(&self) -> u32 {
        self.kills.values().sum()
    }

    /// Returns true the first time a model is seen
    pub fn add_sighting(&mut self, model: &str) -> bool {
        self.sightings.insert(model.to_string())
    }

    pub fn has_completed(&self, achievement: Achievement) -> bool {
        self.achievements.iter().any(|a| a.achievement == achievement)
    }

    /// Complete an achievement; returns false if it was already completed
    pub fn complete_achievement(&mut self, achievement: Achievement, turn: i32) -> bool {
        if self.has_completed(achievement) {
            return false;
        }
        self.achievements.push(AchievementRecord { achievement, turn });
        self.add_event(turn, format!("** {} **", achievement));
        true
    }

    pub fn add_event(&mut self, turn: i32, text: impl Into<String>) {
        self.events.push(GameEvent {
            turn,
            text: text.into(),
        });
    }

    pub fn set_death(&mut self, turn: i32, reason: impl Into<String>) {
        let reason = reason.into();
        self.turns_survived = turn;
        self.add_event(turn, format!("Died: {}", reason));
        self.death_reason = Some(reason);
    }

    pub fn is_dead(&self) -> bool {
        self.death_reason.is_some()
    }
}
