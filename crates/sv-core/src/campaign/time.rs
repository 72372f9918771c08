//! World clock

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{HOURS_PER_DAY, NIGHT_ENDS_HOUR, NIGHT_STARTS_HOUR, TURNS_PER_DAY, TURNS_PER_HOUR};

/// Turn counter with a day/hour calendar on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorldTime {
    turn: i32,
}

impl WorldTime {
    pub const fn new(turn: i32) -> Self {
        Self { turn }
    }

    pub const fn turn(&self) -> i32 {
        self.turn
    }

    /// Day number, starting at 0
    pub const fn day(&self) -> i32 {
        self.turn / TURNS_PER_DAY
    }

    /// Hour of the day, 0..24
    pub const fn hour(&self) -> i32 {
        (self.turn / TURNS_PER_HOUR) % HOURS_PER_DAY
    }

    pub const fn is_night(&self) -> bool {
        let hour = self.hour();
        hour >= NIGHT_STARTS_HOUR || hour < NIGHT_ENDS_HOUR
    }

    /// First turn of a new day
    pub const fn is_strike_of_midnight(&self) -> bool {
        self.turn > 0 && self.turn % TURNS_PER_DAY == 0
    }

    /// Advance by one turn
    pub fn advance(&mut self) {
        self.turn += 1;
    }

    /// Advance by several turns
    pub fn advance_by(&mut self, turns: i32) {
        self.turn += turns.max(0);
    }
}

impl fmt::Display for WorldTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} {:02}:00 (turn {})", self.day(), self.hour(), self.turn)
    }
}
