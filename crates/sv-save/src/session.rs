//! Live campaign handle
//!
//! A [`Session`] owns at most one [`CampaignState`]. Loading replaces it;
//! a failed load leaves no campaign at all so callers cannot keep playing
//! on a half-restored world.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use sv_core::{CampaignSnapshot, CampaignState, GameMode, SurvivorConfig};

use crate::SaveError;
use crate::codec;

/// The three save files of one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePaths {
    pub campaign: PathBuf,
    pub hiscores: PathBuf,
    pub hints: PathBuf,
}

impl SavePaths {
    pub fn from_config(config: &SurvivorConfig) -> Self {
        Self {
            campaign: config.campaign_path(),
            hiscores: config.hiscores_path(),
            hints: config.hints_path(),
        }
    }
}

/// Holder of the single live campaign
#[derive(Debug, Default)]
pub struct Session {
    current: Option<CampaignState>,
    config: SurvivorConfig,
}

impl Session {
    pub fn new(config: SurvivorConfig) -> Self {
        Self {
            current: None,
            config,
        }
    }

    pub fn config(&self) -> &SurvivorConfig {
        &self.config
    }

    pub fn paths(&self) -> SavePaths {
        SavePaths::from_config(&self.config)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&CampaignState> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut CampaignState> {
        self.current.as_mut()
    }

    /// The live campaign, creating a default one if there is none
    pub fn get_or_create(&mut self) -> &mut CampaignState {
        let config = &self.config;
        self.current
            .get_or_insert_with(|| CampaignState::from_config(config, GameMode::default()))
    }

    /// Replace the live campaign with a freshly reset one
    pub fn start_new(&mut self, game_mode: GameMode) -> &mut CampaignState {
        info!("starting new {} campaign", game_mode.name());
        self.current
            .insert(CampaignState::from_config(&self.config, game_mode))
    }

    /// Drop the live campaign
    pub fn discard(&mut self) {
        if self.current.take().is_some() {
            info!("campaign discarded");
        }
    }

    /// Save the live campaign.
    ///
    /// The world is compacted first; a compaction error is logged and the
    /// save goes ahead with whatever was compacted.
    pub fn save(&mut self, path: &Path) -> Result<(), SaveError> {
        codec::validate_path(path)?;
        let state = self.current.as_mut().ok_or(SaveError::NoActiveCampaign)?;
        save_campaign(state, path)
    }

    /// Load a campaign into the session.
    ///
    /// The previous campaign is gone whatever the outcome.
    pub fn load(&mut self, path: &Path) -> Result<&mut CampaignState, SaveError> {
        self.current = None;
        let state = load_campaign(path)?;
        Ok(self.current.insert(state))
    }

    /// Load a campaign, reporting only whether one is now available
    pub fn try_load(&mut self, path: &Path) -> bool {
        self.load(path).is_ok()
    }

    /// Save and reschedule if the autosave deadline has passed.
    ///
    /// Returns whether a save happened. No campaign means nothing to do.
    pub fn autosave_if_due(&mut self, path: &Path) -> Result<bool, SaveError> {
        let interval = self.config.autosave_interval_turns;
        let Some(state) = self.current.as_mut() else {
            return Ok(false);
        };
        if !state.is_autosave_due() {
            return Ok(false);
        }

        info!("autosave due at turn {}", state.world_time.turn());
        save_campaign(state, path)?;
        state.schedule_next_autosave(interval);
        Ok(true)
    }
}

/// Compact a campaign and write it to `path`
pub fn save_campaign(state: &mut CampaignState, path: &Path) -> Result<(), SaveError> {
    codec::validate_path(path)?;
    if let Err(e) = state.optimize_before_saving() {
        warn!("world compaction before save failed: {}", e);
    }
    codec::save(&state.to_snapshot(), path)
}

/// Read a campaign from `path` and rebuild its derived state
pub fn load_campaign(path: &Path) -> Result<CampaignState, SaveError> {
    let snapshot: CampaignSnapshot = codec::load(path)?;
    CampaignState::from_snapshot(snapshot).map_err(|e| {
        warn!("campaign from {} failed reconstruction: {}", path.display(), e);
        SaveError::Reconstruction(e)
    })
}

/// Remove a save file. Failures are logged and swallowed.
///
/// Returns whether a file was actually removed.
pub fn delete_save(path: &Path) -> bool {
    info!("deleting save {}", path.display());
    match fs::remove_file(path) {
        Ok(()) => {
            info!("deleted save {}", path.display());
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("no save to delete at {}", path.display());
            false
        }
        Err(e) => {
            warn!("could not delete save {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::campaign::{NarrativeFlags, RaidType};
    use sv_core::DistrictPos;

    fn session_in(dir: &Path) -> Session {
        Session::new(SurvivorConfig {
            save_dir: dir.to_path_buf(),
            city_size: 3,
            ..SurvivorConfig::default()
        })
    }

    #[test]
    fn test_get_or_create_keeps_instance() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        assert!(!session.is_active());

        let seed = session.get_or_create().seed();
        assert!(session.is_active());
        assert_eq!(session.get_or_create().seed(), seed);
        assert_eq!(session.current().unwrap().city_size(), 3);
    }

    #[test]
    fn test_save_without_campaign() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let path = session.paths().campaign;
        assert!(matches!(
            session.save(&path),
            Err(SaveError::NoActiveCampaign)
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let path = session.paths().campaign;

        let state = session.start_new(GameMode::Vintage);
        state.set_last_raid_time(RaidType::Bikers, DistrictPos::new(1, 2), 77);
        state.flags.insert(NarrativeFlags::POLICE_PRISONER_FREED);
        let seed = state.seed();
        session.save(&path).unwrap();

        session.discard();
        assert!(!session.is_active());

        let state = session.load(&path).unwrap();
        assert_eq!(state.seed(), seed);
        assert_eq!(state.game_mode(), GameMode::Vintage);
        assert_eq!(
            state.last_raid_time(RaidType::Bikers, DistrictPos::new(1, 2)),
            Some(77)
        );
        assert!(state.flags.contains(NarrativeFlags::POLICE_PRISONER_FREED));
    }

    #[test]
    fn test_failed_load_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.get_or_create();

        assert!(!session.try_load(&dir.path().join("missing.dat")));
        assert!(!session.is_active());
    }

    #[test]
    fn test_autosave_if_due() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let path = session.paths().campaign;

        assert!(!session.autosave_if_due(&path).unwrap());

        session.start_new(GameMode::Standard);
        assert!(session.autosave_if_due(&path).unwrap());
        assert!(path.exists());

        let interval = session.config().autosave_interval_turns;
        let state = session.current().unwrap();
        assert_eq!(state.next_autosave_deadline(), interval);
        assert!(!session.autosave_if_due(&path).unwrap());
    }

    #[test]
    fn test_delete_missing_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!delete_save(&dir.path().join("never-written.dat")));
    }

    #[test]
    fn test_delete_reports_removal() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let path = session.paths().campaign;
        session.start_new(GameMode::Standard);
        session.save(&path).unwrap();

        assert!(delete_save(&path));
        assert!(!path.exists());
        assert!(!delete_save(&path));
    }

    #[test]
    fn test_delete_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a-directory.dat");
        fs::create_dir(&path).unwrap();
        assert!(!delete_save(&path));
        assert!(path.exists());
    }
}
