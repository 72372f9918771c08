//! Core campaign constants

/// Default width and height of the city grid, in districts
pub const DEFAULT_CITY_SIZE: usize = 5;
/// Largest city grid a campaign may be created with
pub const MAX_CITY_SIZE: usize = 16;

/// Game clock
pub const TURNS_PER_HOUR: i32 = 30;
pub const HOURS_PER_DAY: i32 = 24;
pub const TURNS_PER_DAY: i32 = TURNS_PER_HOUR * HOURS_PER_DAY;

/// Night runs from 18:00 to 05:59
pub const NIGHT_STARTS_HOUR: i32 = 18;
pub const NIGHT_ENDS_HOUR: i32 = 6;

/// Turn number stored for a raid that never happened
pub const RAID_NEVER_HAPPENED: i32 = -1;

/// Default number of entries kept in the hiscore table
pub const DEFAULT_HISCORE_CAPACITY: usize = 12;

/// Default autosave period, in turns
pub const DEFAULT_AUTOSAVE_INTERVAL: i32 = 2 * TURNS_PER_HOUR;

/// Map dimensions used for freshly created district maps
pub const DISTRICT_MAP_WIDTH: i16 = 50;
pub const DISTRICT_MAP_HEIGHT: i16 = 50;
