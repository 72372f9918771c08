//! Unique entity registries
//!
//! Named one-of-a-kind actors, items and maps each get a fixed slot. A slot
//! records whether the entity was ever spawned and, while it exists, which
//! entity it is. Lookups from an entity back to its slot are linear scans
//! over the fixed slot set.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use super::CampaignError;
use crate::world::{ActorId, ItemId, MapId};

/// A kind enum usable as registry key
pub trait UniqueKind: Copy + Eq + fmt::Display + IntoEnumIterator + EnumCount {
    fn index(self) -> usize;
}

/// Named unique actors
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum UniqueActorKind {
    TheSewersThing = 0,
    BigBear = 1,
    FamuFataru = 2,
    Santaman = 3,
    Roguedjack = 4,
    Duckman = 5,
    HansVonHanz = 6,
    PoliceStationPrisoner = 7,
    JasonMyers = 8,
}

/// Named unique items
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum UniqueItemKind {
    SubwayWorkerBadge = 0,
    BigBearBat = 1,
    FamuFataruKatana = 2,
    SantamanShotgun = 3,
    RoguedjackKeyboard = 4,
    HansVonHanzPistol = 5,
}

/// Named unique maps
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum UniqueMapKind {
    CharUndergroundFacility = 0,
    PoliceStationOffices = 1,
    PoliceStationJails = 2,
    HospitalAdmissions = 3,
    HospitalOffices = 4,
    HospitalPatients = 5,
    HospitalStorage = 6,
    HospitalPower = 7,
}

impl UniqueKind for UniqueActorKind {
    fn index(self) -> usize {
        self as usize
    }
}

impl UniqueKind for UniqueItemKind {
    fn index(self) -> usize {
        self as usize
    }
}

impl UniqueKind for UniqueMapKind {
    fn index(self) -> usize {
        self as usize
    }
}

/// Spawn flag plus the live entity, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueSlot<Id> {
    pub spawned: bool,
    pub entity: Option<Id>,
}

impl<Id> Default for UniqueSlot<Id> {
    fn default() -> Self {
        Self {
            spawned: false,
            entity: None,
        }
    }
}

/// Fixed set of unique slots keyed by `K`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueRegistry<K, Id> {
    slots: Vec<UniqueSlot<Id>>,
    _kind: PhantomData<K>,
}

pub type UniqueActors = UniqueRegistry<UniqueActorKind, ActorId>;
pub type UniqueItems = UniqueRegistry<UniqueItemKind, ItemId>;
pub type UniqueMaps = UniqueRegistry<UniqueMapKind, MapId>;

impl<K: UniqueKind, Id: Copy + Eq> UniqueRegistry<K, Id> {
    /// Every slot "not spawned"
    pub fn new() -> Self {
        Self {
            slots: (0..K::COUNT).map(|_| UniqueSlot::default()).collect(),
            _kind: PhantomData,
        }
    }

    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = UniqueSlot::default());
    }

    pub fn slot(&self, kind: K) -> &UniqueSlot<Id> {
        &self.slots[kind.index()]
    }

    /// Slot by position, bounds-checked
    pub fn slot_at(&self, index: usize) -> Result<(K, &UniqueSlot<Id>), CampaignError> {
        let out_of_range = CampaignError::SlotOutOfRange {
            index,
            len: self.slots.len(),
        };
        let kind = K::iter().nth(index).ok_or(out_of_range.clone())?;
        let slot = self.slots.get(index).ok_or(out_of_range)?;
        Ok((kind, slot))
    }

    pub fn is_spawned(&self, kind: K) -> bool {
        self.slot(kind).spawned
    }

    pub fn entity(&self, kind: K) -> Option<Id> {
        self.slot(kind).entity
    }

    /// Record that the entity for `kind` now exists.
    ///
    /// An entity can only sit in one slot.
    pub fn register(&mut self, kind: K, id: Id) -> Result<(), CampaignError> {
        if let Some(other) = self.find_by_entity(id)
            && other != kind
        {
            return Err(CampaignError::AlreadyRegistered {
                slot: other.to_string(),
            });
        }
        self.slots[kind.index()] = UniqueSlot {
            spawned: true,
            entity: Some(id),
        };
        Ok(())
    }

    /// Drop the entity reference; the spawn flag stays set
    pub fn forget_entity(&mut self, kind: K) -> Option<Id> {
        self.slots[kind.index()].entity.take()
    }

    /// Kind whose slot holds this entity
    pub fn find_by_entity(&self, id: Id) -> Option<K> {
        K::iter().find(|k| self.slots[k.index()].entity == Some(id))
    }

    pub fn spawned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.spawned).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &UniqueSlot<Id>)> {
        K::iter().map(move |k| (k, &self.slots[k.index()]))
    }

    pub fn to_record(&self) -> Vec<UniqueSlot<Id>> {
        self.slots.clone()
    }

    /// Rebuild from persisted slots.
    ///
    /// Fails if the slot count is wrong or one entity sits in two slots.
    pub fn from_record(slots: Vec<UniqueSlot<Id>>) -> Result<Self, CampaignError> {
        if slots.len() != K::COUNT {
            return Err(CampaignError::RegistryShape {
                expected: K::COUNT,
                found: slots.len(),
            });
        }
        let registry = Self {
            slots,
            _kind: PhantomData,
        };
        for (kind, slot) in registry.iter() {
            if let Some(id) = slot.entity
                && let Some(first) = registry.find_by_entity(id)
                && first != kind
            {
                return Err(CampaignError::AlreadyRegistered {
                    slot: first.to_string(),
                });
            }
        }
        Ok(registry)
    }
}

impl<K: UniqueKind, Id: Copy + Eq> Default for UniqueRegistry<K, Id> {
    fn default() -> Self {
        Self::new()
    }
}
