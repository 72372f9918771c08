//! World model
//!
//! The campaign holds a square grid of districts, each with one or more maps.
//! Generation is done elsewhere; this module only stores the result and
//! exposes the hooks persistence needs: compaction before a save and the
//! per-map rebuild of auxiliary fields after a load.

mod entity;
mod errors;
mod map;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use entity::{Actor, ActorId, Item, ItemId, MapId, Point};
pub use errors::WorldError;
pub use map::{GroundItem, Map};

use crate::{DISTRICT_MAP_HEIGHT, DISTRICT_MAP_WIDTH, MAX_CITY_SIZE};

/// District coordinates on the city grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DistrictPos {
    pub x: i32,
    pub y: i32,
}

impl DistrictPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this position lies inside a city of the given size
    pub const fn is_within(&self, city_size: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < city_size && (self.y as usize) < city_size
    }

    /// Display name, e.g. "B3"
    pub fn name(&self) -> String {
        let column = char::from(b'A' + (self.x.clamp(0, 25) as u8));
        format!("{}{}", column, self.y)
    }
}

impl fmt::Display for DistrictPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reference to a map: district plus index within that district
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapRef {
    pub district: DistrictPos,
    pub index: usize,
}

impl MapRef {
    pub const fn new(district: DistrictPos, index: usize) -> Self {
        Self { district, index }
    }

    /// The district's entry map
    pub const fn entry(district: DistrictPos) -> Self {
        Self::new(district, 0)
    }
}

/// One cell of the city grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
    pub pos: DistrictPos,
    pub maps: Vec<Map>,
}

impl District {
    /// The map the district is entered through
    pub fn entry_map(&self) -> Option<&Map> {
        self.maps.first()
    }
}

/// The whole city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    city_size: usize,
    /// Stored column-major: index = x * city_size + y
    districts: Vec<District>,
    next_map_id: u32,
    next_actor_id: u32,
    next_item_id: u32,
}

impl World {
    /// Create a city grid where every district has one empty entry map
    pub fn new(city_size: usize) -> Self {
        let mut world = Self {
            city_size,
            districts: Vec::with_capacity(city_size * city_size),
            next_map_id: 1,
            next_actor_id: 1,
            next_item_id: 1,
        };
        for x in 0..city_size as i32 {
            for y in 0..city_size as i32 {
                let pos = DistrictPos::new(x, y);
                let map = Map::new(
                    world.allocate_map_id(),
                    format!("District@{}", pos),
                    DISTRICT_MAP_WIDTH,
                    DISTRICT_MAP_HEIGHT,
                );
                world.districts.push(District {
                    pos,
                    maps: vec![map],
                });
            }
        }
        world
    }

    pub fn city_size(&self) -> usize {
        self.city_size
    }

    fn slot(&self, pos: DistrictPos) -> Option<usize> {
        if pos.is_within(self.city_size) {
            Some(pos.x as usize * self.city_size + pos.y as usize)
        } else {
            None
        }
    }

    /// Get district at position
    pub fn district(&self, pos: DistrictPos) -> Option<&District> {
        self.slot(pos).and_then(|i| self.districts.get(i))
    }

    /// Get mutable district at position
    pub fn district_mut(&mut self, pos: DistrictPos) -> Option<&mut District> {
        self.slot(pos).and_then(|i| self.districts.get_mut(i))
    }

    /// All districts
    pub fn districts(&self) -> impl Iterator<Item = &District> {
        self.districts.iter()
    }

    /// All maps of all districts
    pub fn maps(&self) -> impl Iterator<Item = &Map> {
        self.districts.iter().flat_map(|d| d.maps.iter())
    }

    /// Get map by reference
    pub fn map(&self, map: MapRef) -> Option<&Map> {
        self.district(map.district)?.maps.get(map.index)
    }

    /// Get mutable map by reference
    pub fn map_mut(&mut self, map: MapRef) -> Option<&mut Map> {
        self.district_mut(map.district)?.maps.get_mut(map.index)
    }

    /// Add a map to a district, returning its reference
    pub fn add_map(
        &mut self,
        pos: DistrictPos,
        name: impl Into<String>,
        width: i16,
        height: i16,
    ) -> Result<MapRef, WorldError> {
        let city_size = self.city_size;
        let id = self.allocate_map_id();
        let district = self
            .district_mut(pos)
            .ok_or(WorldError::DistrictOutOfRange { pos, city_size })?;
        district.maps.push(Map::new(id, name, width, height));
        Ok(MapRef::new(pos, district.maps.len() - 1))
    }

    /// Reference of the map with the given ID
    pub fn find_map(&self, id: MapId) -> Option<MapRef> {
        self.districts.iter().find_map(|d| {
            d.maps
                .iter()
                .position(|m| m.id == id)
                .map(|index| MapRef::new(d.pos, index))
        })
    }

    /// Locate an actor anywhere in the city
    pub fn find_actor(&self, id: ActorId) -> Option<(MapRef, &Actor)> {
        self.districts.iter().find_map(|d| {
            d.maps.iter().enumerate().find_map(|(index, m)| {
                m.actor(id).map(|a| (MapRef::new(d.pos, index), a))
            })
        })
    }

    pub fn allocate_map_id(&mut self) -> MapId {
        let id = MapId(self.next_map_id);
        self.next_map_id += 1;
        id
    }

    pub fn allocate_actor_id(&mut self) -> ActorId {
        let id = ActorId(self.next_actor_id);
        self.next_actor_id += 1;
        id
    }

    pub fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }

    /// Reject city sizes outside `1..=MAX_CITY_SIZE`
    pub fn check_city_size(city_size: usize) -> Result<(), WorldError> {
        if city_size == 0 || city_size > MAX_CITY_SIZE {
            return Err(WorldError::CitySize {
                city_size,
                max: MAX_CITY_SIZE,
            });
        }
        Ok(())
    }

    /// Check the stored grid matches the declared city size
    pub fn check_shape(&self) -> Result<(), WorldError> {
        Self::check_city_size(self.city_size)?;
        let expected = self
            .city_size
            .checked_mul(self.city_size)
            .ok_or(WorldError::CitySize {
                city_size: self.city_size,
                max: MAX_CITY_SIZE,
            })?;
        if self.districts.len() != expected {
            return Err(WorldError::GridShape {
                expected,
                found: self.districts.len(),
            });
        }
        for (slot, district) in self.districts.iter().enumerate() {
            if self.slot(district.pos) != Some(slot) {
                return Err(WorldError::DistrictMisplaced {
                    slot,
                    pos: district.pos,
                });
            }
        }
        Ok(())
    }

    /// Compact every map before the world is written out.
    ///
    /// Every map is visited even if one fails; the first failure is returned.
    pub fn optimize_before_saving(&mut self) -> Result<(), WorldError> {
        let mut first_error = None;
        for district in &mut self.districts {
            district.maps.shrink_to_fit();
            for map in &mut district.maps {
                if let Err(e) = map.optimize_before_saving() {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_grid() {
        let world = World::new(3);
        assert_eq!(world.districts().count(), 9);
        assert!(world.check_shape().is_ok());
        for x in 0..3 {
            for y in 0..3 {
                let pos = DistrictPos::new(x, y);
                assert_eq!(world.district(pos).unwrap().pos, pos);
            }
        }
        assert!(world.district(DistrictPos::new(3, 0)).is_none());
        assert!(world.district(DistrictPos::new(0, -1)).is_none());
    }

    #[test]
    fn test_map_ids_unique() {
        let mut world = World::new(2);
        let r = world.add_map(DistrictPos::new(1, 1), "Sewers", 20, 20).unwrap();
        let mut ids: Vec<_> = world.maps().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert_eq!(world.map(r).unwrap().name, "Sewers");
        assert_eq!(world.find_map(world.map(r).unwrap().id), Some(r));
    }

    #[test]
    fn test_add_map_out_of_range() {
        let mut world = World::new(2);
        assert!(matches!(
            world.add_map(DistrictPos::new(2, 0), "Nowhere", 5, 5),
            Err(WorldError::DistrictOutOfRange { .. })
        ));
    }

    #[test]
    fn test_find_actor() {
        let mut world = World::new(2);
        let id = world.allocate_actor_id();
        let map = MapRef::entry(DistrictPos::new(1, 0));
        world
            .map_mut(map)
            .unwrap()
            .add_actor(Actor::new(id, "cop", "Officer", Point::new(3, 3)))
            .unwrap();

        let (found, actor) = world.find_actor(id).unwrap();
        assert_eq!(found, map);
        assert_eq!(actor.name, "Officer");
    }

    #[test]
    fn test_city_size_bounds() {
        assert!(World::check_city_size(1).is_ok());
        assert!(World::check_city_size(MAX_CITY_SIZE).is_ok());
        assert!(matches!(
            World::check_city_size(0),
            Err(WorldError::CitySize { city_size: 0, .. })
        ));
        assert!(World::check_city_size(MAX_CITY_SIZE + 1).is_err());
    }

    #[test]
    fn test_decoded_huge_city_rejected() {
        let mut value = serde_json::to_value(World::new(1)).unwrap();
        value["city_size"] = serde_json::json!(1u64 << 32);
        value["districts"] = serde_json::json!([]);
        let world: World = serde_json::from_value(value).unwrap();
        assert!(matches!(
            world.check_shape(),
            Err(WorldError::CitySize { .. })
        ));
    }

    #[test]
    fn test_district_name() {
        assert_eq!(DistrictPos::new(0, 0).name(), "A0");
        assert_eq!(DistrictPos::new(2, 4).name(), "C4");
    }
}
