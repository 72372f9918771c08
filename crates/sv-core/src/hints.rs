//! One-time tutorial hints
//!
//! Tracks which advisor hints the player has already been shown. Progress
//! is kept across campaigns.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Every advisor hint the game can show
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum AdvisorHint {
    MoveBasic = 0,
    MouseLook,
    KeysOptions,
    NightTime,
    Rain,
    ActorAttack,
    TurnsAndSpeed,
    Sleep,
    Hunger,
    Stamina,
    ItemPickUp,
    ItemEquip,
    ItemUnequip,
    ItemDrop,
    ItemUse,
    ItemBarricade,
    FireWeapon,
    ReloadWeapon,
    GrabCorpse,
    EatCorpse,
    Infection,
    Barricade,
    BuildFortification,
    LeadFollower,
    TradeOffer,
    CityInformation,
    StairsUp,
    StairsDown,
    ExitMap,
    SafeHouse,
    Sanity,
    PoliceRadio,
}

impl AdvisorHint {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Shown/not-shown flag per hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintsStatus {
    given: Vec<bool>,
}

impl Default for HintsStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl HintsStatus {
    /// Every hint unseen
    pub fn new() -> Self {
        Self {
            given: vec![false; AdvisorHint::COUNT],
        }
    }

    pub fn is_given(&self, hint: AdvisorHint) -> bool {
        self.given.get(hint.index()).copied().unwrap_or(false)
    }

    /// Mark a hint as shown; returns true if it was not shown before
    pub fn mark_given(&mut self, hint: AdvisorHint) -> bool {
        self.normalize();
        let was_given = std::mem::replace(&mut self.given[hint.index()], true);
        !was_given
    }

    pub fn count_given(&self) -> usize {
        AdvisorHint::iter().filter(|h| self.is_given(*h)).count()
    }

    pub fn all_given(&self) -> bool {
        self.count_given() >= AdvisorHint::COUNT
    }

    pub fn reset_all(&mut self) {
        self.given = vec![false; AdvisorHint::COUNT];
    }

    /// First hint not shown yet
    pub fn next_unseen(&self) -> Option<AdvisorHint> {
        AdvisorHint::iter().find(|h| !self.is_given(*h))
    }

    /// Fit a decoded table to the current hint list; new hints start unseen
    pub fn normalize(&mut self) {
        self.given.resize(AdvisorHint::COUNT, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_all_unseen() {
        let hints = HintsStatus::new();
        assert_eq!(hints.count_given(), 0);
        assert!(!hints.all_given());
        assert_eq!(hints.next_unseen(), Some(AdvisorHint::MoveBasic));
    }

    #[test]
    fn test_mark_all() {
        let mut hints = HintsStatus::new();
        for (i, hint) in AdvisorHint::iter().enumerate() {
            assert!(!hints.all_given());
            assert!(hints.mark_given(hint));
            assert_eq!(hints.count_given(), i + 1);
        }
        assert!(hints.all_given());
        assert_eq!(hints.count_given(), AdvisorHint::COUNT);
        assert_eq!(hints.next_unseen(), None);

        hints.reset_all();
        assert_eq!(hints.count_given(), 0);
    }

    #[test]
    fn test_mark_twice() {
        let mut hints = HintsStatus::new();
        assert!(hints.mark_given(AdvisorHint::Rain));
        assert!(!hints.mark_given(AdvisorHint::Rain));
        assert!(hints.is_given(AdvisorHint::Rain));
        assert_eq!(hints.count_given(), 1);
    }

    #[test]
    fn test_short_table_from_older_release() {
        let mut hints: HintsStatus = serde_json::from_str(r#"{"given":[true,true]}"#).unwrap();
        assert_eq!(hints.count_given(), 2);
        assert!(!hints.is_given(AdvisorHint::PoliceRadio));

        hints.normalize();
        assert!(hints.mark_given(AdvisorHint::PoliceRadio));
        assert_eq!(hints.count_given(), 3);
    }
}
