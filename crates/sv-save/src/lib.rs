//! sv-save: Save/restore for the survival campaign core
//!
//! A small self-describing binary codec plus the session handle that owns
//! the live campaign. Campaign, hiscore and hint files are independent of
//! each other and can each be missing.

mod error;

pub mod codec;
pub mod progress;
pub mod session;

use sv_core::campaign::CAMPAIGN_SCHEMA_VERSION;
use sv_core::{CampaignSnapshot, HiScoreTable, HintsStatus};

pub use codec::{Snapshot, SnapshotHeader, load, peek_header, save};
pub use error::SaveError;
pub use progress::{load_hiscores, load_hints_or_default, save_hiscores, save_hints};
pub use session::{SavePaths, Session, delete_save, load_campaign, save_campaign};

impl Snapshot for CampaignSnapshot {
    const TYPE_TAG: &'static str = "campaign";
    const SCHEMA_VERSION: u32 = CAMPAIGN_SCHEMA_VERSION;
}

impl Snapshot for HiScoreTable {
    const TYPE_TAG: &'static str = "hiscores";
    const SCHEMA_VERSION: u32 = 1;
}

impl Snapshot for HintsStatus {
    const TYPE_TAG: &'static str = "hints";
    const SCHEMA_VERSION: u32 = 1;
}
