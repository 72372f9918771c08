//! Cross-campaign progress files: hiscores and hints

use std::path::Path;

use log::{info, warn};
use sv_core::{HiScoreTable, HintsStatus};

use crate::SaveError;
use crate::codec;

pub fn save_hiscores(table: &HiScoreTable, path: &Path) -> Result<(), SaveError> {
    codec::save(table, path)
}

/// Load the hiscore table; any failure means there is no table
pub fn load_hiscores(path: &Path) -> Option<HiScoreTable> {
    match codec::load::<HiScoreTable>(path) {
        Ok(mut table) => {
            table.normalize();
            Some(table)
        }
        Err(e) => {
            info!("no hiscore table available: {}", e);
            None
        }
    }
}

pub fn save_hints(hints: &HintsStatus, path: &Path) -> Result<(), SaveError> {
    codec::save(hints, path)
}

/// Load hint progress, falling back to every hint unseen
pub fn load_hints_or_default(path: &Path) -> HintsStatus {
    match codec::load::<HintsStatus>(path) {
        Ok(mut hints) => {
            hints.normalize();
            hints
        }
        Err(e) => {
            warn!("hint progress reset: {}", e);
            HintsStatus::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::{AdvisorHint, HiScore};

    #[test]
    fn test_hiscores_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_hiscores(&dir.path().join("hiscores.dat")).is_none());
    }

    #[test]
    fn test_hiscores_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hiscores.dat");

        let mut table = HiScoreTable::new(3);
        table.register(HiScore {
            name: "Zed".to_string(),
            total_points: 120,
            ..HiScore::no_one()
        });
        save_hiscores(&table, &path).unwrap();

        let loaded = load_hiscores(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_hints_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.dat");
        std::fs::write(&path, b"definitely not a save").unwrap();

        let hints = load_hints_or_default(&path);
        assert_eq!(hints.count_given(), 0);
    }

    #[test]
    fn test_hints_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.dat");

        let mut hints = HintsStatus::new();
        hints.mark_given(AdvisorHint::MoveBasic);
        save_hints(&hints, &path).unwrap();

        let loaded = load_hints_or_default(&path);
        assert!(loaded.is_given(AdvisorHint::MoveBasic));
        assert_eq!(loaded.count_given(), 1);
    }

    #[test]
    fn test_hints_file_is_not_a_hiscore_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.dat");
        save_hints(&HintsStatus::new(), &path).unwrap();
        assert!(load_hiscores(&path).is_none());
    }
}
