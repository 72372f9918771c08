//! Campaign state
//!
//! The top-level aggregate of a running game: clock, city, scoring, raid
//! timeline, unique registries, narrative flags and the autosave deadline.
//! Persistence goes through the explicit [`CampaignSnapshot`] schema; the
//! character-generation scratch state is never persisted and is rebuilt by
//! [`CampaignState::from_snapshot`].

mod errors;
mod raid;
mod scoring;
mod snapshot;
mod time;
pub mod unique;

use bitflags::bitflags;
use log::info;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub use errors::CampaignError;
pub use raid::{RaidTimeline, RaidTimelineRecord, RaidType};
pub use scoring::{Achievement, AchievementRecord, DifficultySide, GameEvent, Scoring};
pub use snapshot::{CAMPAIGN_SCHEMA_VERSION, CampaignSnapshot};
pub use time::WorldTime;
pub use unique::{
    UniqueActorKind, UniqueActors, UniqueItemKind, UniqueItems, UniqueMapKind, UniqueMaps,
    UniqueSlot,
};

pub use crate::world::DistrictPos;
use crate::DEFAULT_CITY_SIZE;
use crate::config::SurvivorConfig;
use crate::rng::DiceRoller;
use crate::world::{Actor, Item, Map, MapRef, World, WorldError};

/// Rule set chosen at campaign start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum GameMode {
    #[default]
    Standard,
    CorpsesAndInfection,
    Vintage,
}

impl GameMode {
    pub const fn name(self) -> &'static str {
        match self {
            GameMode::Standard => "STD - Standard Game",
            GameMode::CorpsesAndInfection => "C&I - Corpses & Infection",
            GameMode::Vintage => "VTG - Vintage Zombies",
        }
    }

    pub const fn has_corpses(self) -> bool {
        matches!(self, GameMode::CorpsesAndInfection)
    }

    pub const fn has_infection(self) -> bool {
        matches!(self, GameMode::CorpsesAndInfection)
    }

    pub const fn is_vintage(self) -> bool {
        matches!(self, GameMode::Vintage)
    }
}

/// Stage of a multi-step scripted quest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, Display,
    EnumIter,
)]
pub enum ScriptStage {
    #[default]
    Stage0,
    Stage1,
    Stage2,
    Stage3,
    Stage4,
    Stage5,
}

impl ScriptStage {
    /// Next stage; the last stage stays put
    pub const fn advance(self) -> Self {
        match self {
            ScriptStage::Stage0 => ScriptStage::Stage1,
            ScriptStage::Stage1 => ScriptStage::Stage2,
            ScriptStage::Stage2 => ScriptStage::Stage3,
            ScriptStage::Stage3 => ScriptStage::Stage4,
            ScriptStage::Stage4 | ScriptStage::Stage5 => ScriptStage::Stage5,
        }
    }
}

/// Player's selected fire mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum FireMode {
    #[default]
    Default,
    Rapid,
}

bitflags! {
    /// Location-known and one-shot story flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NarrativeFlags: u32 {
        const PLAYER_KNOWS_CHAR_FACILITY_LOCATION = 0x01;
        const PLAYER_KNOWS_SEWERS_THING_LOCATION = 0x02;
        const CHAR_FACILITY_ACTIVATED = 0x04;
        const POLICE_PRISONER_FREED = 0x08;
        const ARMY_SUPPLIES_DROPPED = 0x10;
    }
}

// Manual serde impl for NarrativeFlags
impl Serialize for NarrativeFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NarrativeFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(NarrativeFlags::from_bits_truncate(bits))
    }
}

/// Character-generation scratch state. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct CharGen {
    pub is_undead: bool,
    pub is_male: bool,
    pub starting_skill: Option<String>,
    pub dice: DiceRoller,
}

impl CharGen {
    pub fn new(seed: u64) -> Self {
        Self {
            is_undead: false,
            is_male: true,
            starting_skill: None,
            dice: DiceRoller::new(seed),
        }
    }

    /// Pick race and gender at random, as for a quick-start character
    pub fn randomize(&mut self) {
        self.is_undead = self.dice.roll_chance(50);
        self.is_male = self.dice.roll_chance(50);
    }
}

/// Seed taken from the wall clock
fn time_seed() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}

/// The running campaign
#[derive(Debug, Clone)]
pub struct CampaignState {
    game_mode: GameMode,
    seed: u64,
    pub world_time: WorldTime,
    pub world: World,
    current_map: Option<MapRef>,
    pub scoring: Scoring,
    raid_timeline: RaidTimeline,
    pub unique_actors: UniqueActors,
    pub unique_items: UniqueItems,
    pub unique_maps: UniqueMaps,
    pub flags: NarrativeFlags,
    pub police_prisoner_stage: ScriptStage,
    pub player_fire_mode: FireMode,
    pub last_charisma_roll: i32,
    next_autosave_deadline: i32,

    char_gen: CharGen,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self::new(GameMode::default(), DEFAULT_CITY_SIZE)
    }
}

impl CampaignState {
    /// Create a freshly reset campaign
    pub fn new(game_mode: GameMode, city_size: usize) -> Self {
        Self::with_seed(game_mode, city_size, time_seed())
    }

    /// Create a freshly reset campaign sized from configuration
    pub fn from_config(config: &SurvivorConfig, game_mode: GameMode) -> Self {
        Self::new(game_mode, config.city_size)
    }

    /// Create a freshly reset campaign with a fixed seed.
    ///
    /// # Panics
    ///
    /// Panics if `city_size` is outside `1..=MAX_CITY_SIZE`.
    pub fn with_seed(game_mode: GameMode, city_size: usize, seed: u64) -> Self {
        if let Err(e) = World::check_city_size(city_size) {
            panic!("campaign: {}", e);
        }
        let mut state = Self {
            game_mode,
            seed,
            world_time: WorldTime::default(),
            world: World::new(city_size),
            current_map: None,
            scoring: Scoring::new(),
            raid_timeline: RaidTimeline::new(city_size),
            unique_actors: UniqueActors::new(),
            unique_items: UniqueItems::new(),
            unique_maps: UniqueMaps::new(),
            flags: NarrativeFlags::empty(),
            police_prisoner_stage: ScriptStage::default(),
            player_fire_mode: FireMode::default(),
            last_charisma_roll: 0,
            next_autosave_deadline: 0,
            char_gen: CharGen::new(seed),
        };
        state.reset_with_seed(seed);
        state
    }

    /// Start over: reseed from the clock and clear every campaign field
    pub fn reset(&mut self) {
        self.reset_with_seed(time_seed());
    }

    /// Start over with a given seed
    pub fn reset_with_seed(&mut self, seed: u64) {
        let city_size = self.world.city_size();
        self.seed = seed;
        self.world_time = WorldTime::default();
        self.world = World::new(city_size);
        self.current_map = None;
        self.scoring = Scoring::new();
        self.raid_timeline.reset(city_size);
        self.unique_actors.reset();
        self.unique_items.reset();
        self.unique_maps.reset();
        self.flags = NarrativeFlags::empty();
        self.police_prisoner_stage = ScriptStage::default();
        self.player_fire_mode = FireMode::default();
        self.last_charisma_roll = 0;
        self.next_autosave_deadline = 0;
        self.char_gen = CharGen::new(seed);
        info!(
            "campaign reset: mode={:?} seed={} city={}x{}",
            self.game_mode, seed, city_size, city_size
        );
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn city_size(&self) -> usize {
        self.world.city_size()
    }

    // --- Clock ---

    /// Advance the clock one turn, counting it as survived
    pub fn advance_turn(&mut self) {
        self.world_time.advance();
        if !self.scoring.is_dead() {
            self.scoring.turns_survived = self.world_time.turn();
        }
    }

    // --- Current map ---

    pub fn current_map_ref(&self) -> Option<MapRef> {
        self.current_map
    }

    pub fn current_map(&self) -> Option<&Map> {
        self.world.map(self.current_map?)
    }

    pub fn current_map_mut(&mut self) -> Option<&mut Map> {
        self.world.map_mut(self.current_map?)
    }

    /// Move the player's point of view to another map
    pub fn set_current_map(&mut self, map: MapRef) -> Result<(), WorldError> {
        if self.world.map(map).is_none() {
            return Err(WorldError::NoSuchMap {
                pos: map.district,
                index: map.index,
            });
        }
        self.current_map = Some(map);
        Ok(())
    }

    // --- Raid timeline ---

    pub fn raid_timeline(&self) -> &RaidTimeline {
        &self.raid_timeline
    }

    pub fn has_raid_happened(&self, raid: RaidType, district: DistrictPos) -> bool {
        self.raid_timeline.has_raid_happened(raid, district)
    }

    pub fn last_raid_time(&self, raid: RaidType, district: DistrictPos) -> Option<i32> {
        self.raid_timeline.last_raid_time(raid, district)
    }

    /// Record a raid. Safe to call from concurrent district workers.
    pub fn set_last_raid_time(&self, raid: RaidType, district: DistrictPos, turn: i32) {
        self.raid_timeline.set_last_raid_time(raid, district, turn);
    }

    // --- Unique entities ---

    /// Slot of a unique actor
    pub fn actor_to_unique_actor(&self, actor: &Actor) -> Result<UniqueActorKind, CampaignError> {
        self.unique_actors
            .find_by_entity(actor.id)
            .ok_or(CampaignError::UniqueActorNotFound(actor.id))
    }

    /// Slot of a unique item
    pub fn item_to_unique_item(&self, item: &Item) -> Result<UniqueItemKind, CampaignError> {
        self.unique_items
            .find_by_entity(item.id)
            .ok_or(CampaignError::UniqueItemNotFound(item.id))
    }

    /// Slot of a unique map
    pub fn map_to_unique_map(&self, map: &Map) -> Result<UniqueMapKind, CampaignError> {
        self.unique_maps
            .find_by_entity(map.id)
            .ok_or(CampaignError::UniqueMapNotFound(map.id))
    }

    // --- Autosave ---

    pub fn next_autosave_deadline(&self) -> i32 {
        self.next_autosave_deadline
    }

    pub fn is_autosave_due(&self) -> bool {
        self.world_time.turn() >= self.next_autosave_deadline
    }

    pub fn schedule_next_autosave(&mut self, interval: i32) {
        self.next_autosave_deadline = self.world_time.turn() + interval.max(1);
    }

    // --- Transient state ---

    pub fn char_gen(&self) -> &CharGen {
        &self.char_gen
    }

    pub fn char_gen_mut(&mut self) -> &mut CharGen {
        &mut self.char_gen
    }

    /// Roll a d20 charisma check and remember it for the trade in progress
    pub fn roll_charisma(&mut self) -> i32 {
        self.last_charisma_roll = self.char_gen.dice.roll(1, 21);
        self.last_charisma_roll
    }

    // --- Persistence hooks ---

    /// Let the world compact itself before a save
    pub fn optimize_before_saving(&mut self) -> Result<(), WorldError> {
        self.world.optimize_before_saving()
    }

    /// Rebuild the derived fields of every map in the city.
    ///
    /// Walks the full grid district by district.
    pub fn reconstruct_auxiliary_fields(&mut self) -> Result<(), CampaignError> {
        let city_size = self.world.city_size() as i32;
        for x in 0..city_size {
            for y in 0..city_size {
                let pos = DistrictPos::new(x, y);
                let district =
                    self.world
                        .district_mut(pos)
                        .ok_or(WorldError::DistrictOutOfRange {
                            pos,
                            city_size: city_size as usize,
                        })?;
                for map in &mut district.maps {
                    map.reconstruct_auxiliary_fields()?;
                }
            }
        }
        Ok(())
    }
}
