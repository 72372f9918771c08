//! Campaign consistency errors

use thiserror::Error;

use crate::world::{ActorId, ItemId, MapId, WorldError};

/// Errors raised by campaign bookkeeping.
///
/// These signal a bug in the caller or inconsistent data, never an I/O
/// problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CampaignError {
    #[error("{0} is not registered as a unique actor")]
    UniqueActorNotFound(ActorId),

    #[error("{0} is not registered as a unique item")]
    UniqueItemNotFound(ItemId),

    #[error("{0} is not registered as a unique map")]
    UniqueMapNotFound(MapId),

    #[error("unique slot index {index} out of range (registry has {len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("entity already registered in unique slot {slot}")]
    AlreadyRegistered { slot: String },

    #[error("unique registry holds {found} slots, expected {expected}")]
    RegistryShape { expected: usize, found: usize },

    #[error("raid timeline holds {found} cells, expected {expected}")]
    TimelineShape { expected: usize, found: usize },

    #[error("campaign city size {campaign} disagrees with world city size {world}")]
    CitySizeMismatch { campaign: usize, world: usize },

    #[error("world reconstruction failed: {0}")]
    World(#[from] WorldError),
}
