//! World model errors

use thiserror::Error;

use super::{ActorId, DistrictPos, Point};

/// Errors raised by the world/map model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("district {pos} is outside a city of size {city_size}")]
    DistrictOutOfRange { pos: DistrictPos, city_size: usize },

    #[error("city size {city_size} is outside 1..={max}")]
    CitySize { city_size: usize, max: usize },

    #[error("city grid holds {found} districts, expected {expected}")]
    GridShape { expected: usize, found: usize },

    #[error("district stored at slot {slot} claims position {pos}")]
    DistrictMisplaced { slot: usize, pos: DistrictPos },

    #[error("map '{map}': position {pos} is out of bounds")]
    OutOfBounds { map: String, pos: Point },

    #[error("map '{map}': tile {pos} already holds actor {occupant}")]
    TileOccupied {
        map: String,
        pos: Point,
        occupant: ActorId,
    },

    #[error("map '{map}': no actor {id}")]
    NoSuchActor { map: String, id: ActorId },

    #[error("map index {index} out of range in district {pos}")]
    NoSuchMap { pos: DistrictPos, index: usize },
}
