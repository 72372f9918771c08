//! sv-core: Campaign state core for a zombie survival roguelike
//!
//! This crate holds the authoritative snapshot of a running campaign, the
//! ranked hiscore table and the tutorial hint tracker. It performs no file
//! I/O; persistence lives in `sv-save`.

pub mod campaign;
pub mod config;
pub mod hints;
pub mod leaderboard;
pub mod world;

mod consts;
mod rng;

pub use campaign::{
    CampaignError, CampaignSnapshot, CampaignState, DistrictPos, GameMode, RaidTimeline, RaidType,
    Scoring, WorldTime,
};
pub use config::{ConfigError, SurvivorConfig};
pub use consts::*;
pub use hints::{AdvisorHint, HintsStatus};
pub use leaderboard::{HiScore, HiScoreTable, LeaderboardError};
pub use rng::DiceRoller;
pub use world::{Actor, ActorId, Item, ItemId, Map, MapId, MapRef, World, WorldError};
