//! Campaign-level behavior across modules

use std::thread;

use sv_core::campaign::{NarrativeFlags, RaidType, UniqueActorKind};
use sv_core::world::Point;
use sv_core::{
    Actor, CampaignError, CampaignState, DistrictPos, GameMode, HiScore, HiScoreTable,
};

#[test]
fn reset_returns_to_a_fresh_campaign() {
    let mut state = CampaignState::with_seed(GameMode::Standard, 3, 42);
    let pos = DistrictPos::new(1, 1);
    state.set_last_raid_time(RaidType::Gangsta, pos, 90);
    state.flags.insert(NarrativeFlags::ARMY_SUPPLIES_DROPPED);
    state.scoring.register_kill("zombie", 10);
    state.schedule_next_autosave(60);

    state.reset_with_seed(43);

    assert_eq!(state.seed(), 43);
    assert!(!state.has_raid_happened(RaidType::Gangsta, pos));
    assert_eq!(state.raid_timeline().count_happened(), 0);
    assert!(state.flags.is_empty());
    assert_eq!(state.scoring.total_points(), 0);
    assert_eq!(state.unique_actors.spawned_count(), 0);
    assert_eq!(state.next_autosave_deadline(), 0);
    assert!(state.is_autosave_due());
}

#[test]
fn raid_sentinel_until_first_write() {
    let state = CampaignState::with_seed(GameMode::Standard, 2, 1);
    let pos = DistrictPos::new(0, 1);
    assert_eq!(state.last_raid_time(RaidType::Survivors, pos), None);

    state.set_last_raid_time(RaidType::Survivors, pos, 0);
    assert!(state.has_raid_happened(RaidType::Survivors, pos));
    assert_eq!(state.last_raid_time(RaidType::Survivors, pos), Some(0));
}

#[test]
fn concurrent_raid_writes_keep_latest_turn() {
    let state = CampaignState::with_seed(GameMode::Standard, 4, 7);
    let pos = DistrictPos::new(3, 2);

    thread::scope(|s| {
        for worker in 0..8 {
            let state = &state;
            s.spawn(move || {
                for turn in 0..200 {
                    state.set_last_raid_time(RaidType::ArmySupplies, pos, turn * 8 + worker);
                }
            });
        }
    });

    assert_eq!(
        state.last_raid_time(RaidType::ArmySupplies, pos),
        Some(199 * 8 + 7)
    );
    assert_eq!(state.raid_timeline().count_happened(), 1);
}

#[test]
fn unique_lookup_of_unregistered_actor_is_an_error() {
    let mut state = CampaignState::with_seed(GameMode::Standard, 2, 1);
    let map_ref = state.world.add_map(DistrictPos::new(0, 0), "Sewers", 20, 20).unwrap();
    let big_bear = state.world.allocate_actor_id();
    let nobody = state.world.allocate_actor_id();
    let map = state.world.map_mut(map_ref).unwrap();
    map.add_actor(Actor::new(big_bear, "biker", "Big Bear", Point::new(1, 1)).unique())
        .unwrap();
    map.add_actor(Actor::new(nobody, "civilian", "Bob", Point::new(2, 2)))
        .unwrap();
    state.unique_actors.register(UniqueActorKind::BigBear, big_bear).unwrap();

    let map = state.world.map(map_ref).unwrap();
    let bear = map.actor(big_bear).unwrap();
    assert_eq!(
        state.actor_to_unique_actor(bear).unwrap(),
        UniqueActorKind::BigBear
    );

    let bob = map.actor(nobody).unwrap();
    assert_eq!(
        state.actor_to_unique_actor(bob),
        Err(CampaignError::UniqueActorNotFound(nobody))
    );
}

#[test]
fn same_entity_cannot_fill_two_slots() {
    let mut state = CampaignState::with_seed(GameMode::Standard, 2, 1);
    let id = state.world.allocate_actor_id();
    state.unique_actors.register(UniqueActorKind::Santaman, id).unwrap();
    assert!(matches!(
        state.unique_actors.register(UniqueActorKind::Duckman, id),
        Err(CampaignError::AlreadyRegistered { .. })
    ));
    assert!(!state.unique_actors.is_spawned(UniqueActorKind::Duckman));
}

#[test]
fn final_score_enters_the_hiscore_table() {
    let mut state = CampaignState::with_seed(GameMode::Standard, 2, 1);
    for _ in 0..90 {
        state.advance_turn();
    }
    state.scoring.register_kill("zombie", 4);
    state.scoring.set_death(state.world_time.turn(), "eaten by a zombie");

    let mut table = HiScoreTable::cleared(3);
    let rank = table.register(HiScore::from_scoring("Rook", &state.scoring, "Firearms"));
    assert_eq!(rank, Some(1));

    let top = table.highest().unwrap();
    assert_eq!(top.name, "Rook");
    assert_eq!(top.total_points, 6 + 4);
    assert_eq!(top.turns_survived, 90);
    assert_eq!(table.len(), 3);
}
