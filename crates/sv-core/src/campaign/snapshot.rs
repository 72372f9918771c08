//! Persisted campaign schema
//!
//! [`CampaignSnapshot`] mirrors every persisted field of [`CampaignState`].
//! Transient state has no place here; it is rebuilt by
//! [`CampaignState::from_snapshot`], which every successful load must go
//! through before the campaign is handed out.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    CampaignError, CampaignState, CharGen, FireMode, GameMode, NarrativeFlags, RaidTimeline,
    RaidTimelineRecord, ScriptStage, Scoring, UniqueActors, UniqueItems, UniqueMaps, UniqueSlot,
    WorldTime,
};
use crate::world::{ActorId, ItemId, MapId, MapRef, World, WorldError};

/// Bump whenever the shape of [`CampaignSnapshot`] changes
pub const CAMPAIGN_SCHEMA_VERSION: u32 = 1;

/// Everything a campaign save holds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub game_mode: GameMode,
    pub seed: u64,
    pub world_time: WorldTime,
    pub world: World,
    pub current_map: Option<MapRef>,
    pub scoring: Scoring,
    pub raid_timeline: RaidTimelineRecord,
    pub unique_actors: Vec<UniqueSlot<ActorId>>,
    pub unique_items: Vec<UniqueSlot<ItemId>>,
    pub unique_maps: Vec<UniqueSlot<MapId>>,
    pub flags: NarrativeFlags,
    pub police_prisoner_stage: ScriptStage,
    pub player_fire_mode: FireMode,
    pub last_charisma_roll: i32,
    pub next_autosave_deadline: i32,
}

impl CampaignState {
    /// Capture the persisted part of the campaign
    pub fn to_snapshot(&self) -> CampaignSnapshot {
        CampaignSnapshot {
            game_mode: self.game_mode,
            seed: self.seed,
            world_time: self.world_time,
            world: self.world.clone(),
            current_map: self.current_map,
            scoring: self.scoring.clone(),
            raid_timeline: self.raid_timeline.to_record(),
            unique_actors: self.unique_actors.to_record(),
            unique_items: self.unique_items.to_record(),
            unique_maps: self.unique_maps.to_record(),
            flags: self.flags,
            police_prisoner_stage: self.police_prisoner_stage,
            player_fire_mode: self.player_fire_mode,
            last_charisma_roll: self.last_charisma_roll,
            next_autosave_deadline: self.next_autosave_deadline,
        }
    }

    /// Turn a decoded snapshot back into a usable campaign.
    ///
    /// Validates shapes, rebuilds every map's auxiliary fields over the whole
    /// city grid and reseeds the transient character-generation state.
    pub fn from_snapshot(snapshot: CampaignSnapshot) -> Result<Self, CampaignError> {
        World::check_city_size(snapshot.world.city_size())?;
        snapshot.world.check_shape()?;
        let city_size = snapshot.world.city_size();
        if snapshot.raid_timeline.city_size != city_size {
            return Err(CampaignError::CitySizeMismatch {
                campaign: snapshot.raid_timeline.city_size,
                world: city_size,
            });
        }
        if let Some(map) = snapshot.current_map
            && snapshot.world.map(map).is_none()
        {
            return Err(WorldError::NoSuchMap {
                pos: map.district,
                index: map.index,
            }
            .into());
        }

        let mut state = Self {
            game_mode: snapshot.game_mode,
            seed: snapshot.seed,
            world_time: snapshot.world_time,
            world: snapshot.world,
            current_map: snapshot.current_map,
            scoring: snapshot.scoring,
            raid_timeline: RaidTimeline::from_record(snapshot.raid_timeline)?,
            unique_actors: UniqueActors::from_record(snapshot.unique_actors)?,
            unique_items: UniqueItems::from_record(snapshot.unique_items)?,
            unique_maps: UniqueMaps::from_record(snapshot.unique_maps)?,
            flags: snapshot.flags,
            police_prisoner_stage: snapshot.police_prisoner_stage,
            player_fire_mode: snapshot.player_fire_mode,
            last_charisma_roll: snapshot.last_charisma_roll,
            next_autosave_deadline: snapshot.next_autosave_deadline,
            char_gen: CharGen::new(snapshot.seed),
        };
        state.reconstruct_auxiliary_fields()?;
        debug!(
            "campaign restored: seed={} turn={} maps={}",
            state.seed,
            state.world_time.turn(),
            state.world.maps().count()
        );
        Ok(state)
    }
}
