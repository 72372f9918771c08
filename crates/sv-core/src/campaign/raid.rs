//! Per-district raid timeline
//!
//! Dense `[raid][x][y]` table of the last turn each raid type hit each
//! district. Background district workers may record raids concurrently, so
//! the whole table sits behind one mutex; every accessor takes `&self`.
//! The table is only resized by [`RaidTimeline::reset`], which needs `&mut`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use super::CampaignError;
use crate::world::{DistrictPos, World, WorldError};
use crate::{MAX_CITY_SIZE, RAID_NEVER_HAPPENED};

/// Scripted hostile events
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum RaidType {
    NationalGuard = 0,
    ArmySupplies = 1,
    Bikers = 2,
    Gangsta = 3,
    BlackOps = 4,
    Survivors = 5,
}

/// Persisted form of the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidTimelineRecord {
    pub city_size: usize,
    pub cells: Vec<i32>,
}

/// Last-occurrence turn of every raid type in every district
#[derive(Debug)]
pub struct RaidTimeline {
    city_size: usize,
    cells: Mutex<Vec<i32>>,
}

impl RaidTimeline {
    /// Create a timeline where no raid ever happened.
    ///
    /// # Panics
    ///
    /// Panics if `city_size` is outside `1..=MAX_CITY_SIZE`.
    pub fn new(city_size: usize) -> Self {
        Self {
            city_size,
            cells: Mutex::new(vec![RAID_NEVER_HAPPENED; Self::expect_cell_count(city_size)]),
        }
    }

    fn cell_count(city_size: usize) -> Result<usize, WorldError> {
        World::check_city_size(city_size)?;
        RaidType::COUNT
            .checked_mul(city_size)
            .and_then(|n| n.checked_mul(city_size))
            .ok_or(WorldError::CitySize {
                city_size,
                max: MAX_CITY_SIZE,
            })
    }

    fn expect_cell_count(city_size: usize) -> usize {
        match Self::cell_count(city_size) {
            Ok(count) => count,
            Err(e) => panic!("raid timeline: {}", e),
        }
    }

    pub fn city_size(&self) -> usize {
        self.city_size
    }

    /// Reallocate for a new city size, forgetting every raid
    pub fn reset(&mut self, city_size: usize) {
        let count = Self::expect_cell_count(city_size);
        self.city_size = city_size;
        let cells = self.cells.get_mut().unwrap_or_else(PoisonError::into_inner);
        cells.clear();
        cells.resize(count, RAID_NEVER_HAPPENED);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<i32>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flat index of a cell.
    ///
    /// # Panics
    ///
    /// Panics if the district lies outside the city.
    fn index(&self, raid: RaidType, district: DistrictPos) -> usize {
        assert!(
            district.is_within(self.city_size),
            "district {} outside city of size {}",
            district,
            self.city_size
        );
        let size = self.city_size;
        (raid as usize * size + district.x as usize) * size + district.y as usize
    }

    /// Whether this raid type ever hit the district
    pub fn has_raid_happened(&self, raid: RaidType, district: DistrictPos) -> bool {
        self.last_raid_time(raid, district).is_some()
    }

    /// Turn of the last raid, or `None` if it never happened
    pub fn last_raid_time(&self, raid: RaidType, district: DistrictPos) -> Option<i32> {
        let index = self.index(raid, district);
        let turn = self.lock()[index];
        (turn != RAID_NEVER_HAPPENED).then_some(turn)
    }

    /// Record a raid.
    ///
    /// The stored turn never goes backwards: a turn older than the one
    /// already recorded is ignored.
    pub fn set_last_raid_time(&self, raid: RaidType, district: DistrictPos, turn: i32) {
        let index = self.index(raid, district);
        let mut cells = self.lock();
        if turn < cells[index] {
            debug!(
                "ignoring stale {} raid at turn {} in {} (last was {})",
                raid, turn, district, cells[index]
            );
            return;
        }
        cells[index] = turn;
    }

    /// Raids that hit a district, with their last turn
    pub fn raids_in_district(&self, district: DistrictPos) -> Vec<(RaidType, i32)> {
        RaidType::iter()
            .filter_map(|raid| self.last_raid_time(raid, district).map(|t| (raid, t)))
            .collect()
    }

    /// Number of (raid, district) cells that recorded a raid
    pub fn count_happened(&self) -> usize {
        self.lock()
            .iter()
            .filter(|&&t| t != RAID_NEVER_HAPPENED)
            .count()
    }

    pub fn to_record(&self) -> RaidTimelineRecord {
        RaidTimelineRecord {
            city_size: self.city_size,
            cells: self.lock().clone(),
        }
    }

    pub fn from_record(record: RaidTimelineRecord) -> Result<Self, CampaignError> {
        let expected = Self::cell_count(record.city_size)?;
        if record.cells.len() != expected {
            return Err(CampaignError::TimelineShape {
                expected,
                found: record.cells.len(),
            });
        }
        Ok(Self {
            city_size: record.city_size,
            cells: Mutex::new(record.cells),
        })
    }
}

impl Clone for RaidTimeline {
    fn clone(&self) -> Self {
        Self {
            city_size: self.city_size,
            cells: Mutex::new(self.lock().clone()),
        }
    }
}

impl PartialEq for RaidTimeline {
    fn eq(&self, other: &Self) -> bool {
        self.to_record() == other.to_record()
    }
}
