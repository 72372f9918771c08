//! District maps
//!
//! A map persists its actors and ground items. The per-tile lookup grids are
//! auxiliary: they are skipped on serialization and must be rebuilt with
//! [`Map::reconstruct_auxiliary_fields`] before the map is used again.

use serde::{Deserialize, Serialize};

use super::{Actor, ActorId, Item, ItemId, MapId, Point, WorldError};

/// An item lying on a map tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundItem {
    pub position: Point,
    pub item: Item,
}

/// A single map inside a district
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub id: MapId,
    pub name: String,
    width: i16,
    height: i16,

    /// All actors on this map
    actors: Vec<Actor>,

    /// All items lying on this map
    items: Vec<GroundItem>,

    /// Actor standing on each tile, row-major
    #[serde(skip)]
    actor_grid: Vec<Option<ActorId>>,

    /// Items lying on each tile, row-major
    #[serde(skip)]
    item_grid: Vec<Vec<ItemId>>,
}

impl Map {
    /// Create a new empty map
    pub fn new(id: MapId, name: impl Into<String>, width: i16, height: i16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let tiles = width as usize * height as usize;
        Self {
            id,
            name: name.into(),
            width,
            height,
            actors: Vec::new(),
            items: Vec::new(),
            actor_grid: vec![None; tiles],
            item_grid: vec![Vec::new(); tiles],
        }
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    /// Check if position is on the map
    pub const fn is_in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn tile(&self, pos: Point) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    fn check_bounds(&self, pos: Point) -> Result<(), WorldError> {
        if self.is_in_bounds(pos) {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds {
                map: self.name.clone(),
                pos,
            })
        }
    }

    /// Whether the lookup grids match the persisted data's dimensions
    pub fn is_auxiliary_ready(&self) -> bool {
        let tiles = self.width as usize * self.height as usize;
        self.actor_grid.len() == tiles && self.item_grid.len() == tiles
    }

    /// Rebuild the per-tile lookup grids from the persisted actor and item lists.
    ///
    /// Fails if an entity lies outside the map or two actors share a tile.
    pub fn reconstruct_auxiliary_fields(&mut self) -> Result<(), WorldError> {
        let tiles = self.width as usize * self.height as usize;
        let mut actor_grid = vec![None; tiles];
        let mut item_grid = vec![Vec::new(); tiles];

        for actor in &self.actors {
            self.check_bounds(actor.position)?;
            let tile = self.tile(actor.position);
            if let Some(occupant) = actor_grid[tile] {
                return Err(WorldError::TileOccupied {
                    map: self.name.clone(),
                    pos: actor.position,
                    occupant,
                });
            }
            actor_grid[tile] = Some(actor.id);
        }
        for ground in &self.items {
            self.check_bounds(ground.position)?;
            let tile = self.tile(ground.position);
            item_grid[tile].push(ground.item.id);
        }

        self.actor_grid = actor_grid;
        self.item_grid = item_grid;
        Ok(())
    }

    /// Compact the map before it is written out.
    ///
    /// Dead actors are dropped unless they are unique; vectors are shrunk.
    pub fn optimize_before_saving(&mut self) -> Result<(), WorldError> {
        self.actors.retain(|a| !a.is_dead || a.is_unique);
        self.actors.shrink_to_fit();
        self.items.shrink_to_fit();
        self.reconstruct_auxiliary_fields()
    }

    /// All actors on this map
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// All ground items on this map
    pub fn items(&self) -> &[GroundItem] {
        &self.items
    }

    /// Get actor by ID
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Get mutable actor by ID
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// Get actor at position
    pub fn actor_at(&self, pos: Point) -> Option<&Actor> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        let id = (*self.actor_grid.get(self.tile(pos))?)?;
        self.actor(id)
    }

    /// Add an actor at its own position
    pub fn add_actor(&mut self, actor: Actor) -> Result<ActorId, WorldError> {
        self.check_bounds(actor.position)?;
        let tile = self.tile(actor.position);
        if let Some(occupant) = self.actor_grid[tile] {
            return Err(WorldError::TileOccupied {
                map: self.name.clone(),
                pos: actor.position,
                occupant,
            });
        }
        let id = actor.id;
        self.actor_grid[tile] = Some(id);
        self.actors.push(actor);
        Ok(id)
    }

    /// Remove an actor from the map
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let idx = self.actors.iter().position(|a| a.id == id)?;
        let actor = self.actors.remove(idx);
        let tile = self.tile(actor.position);
        if let Some(slot) = self.actor_grid.get_mut(tile) {
            *slot = None;
        }
        Some(actor)
    }

    /// Move an actor to a new tile
    pub fn move_actor(&mut self, id: ActorId, to: Point) -> Result<(), WorldError> {
        self.check_bounds(to)?;
        let new_tile = self.tile(to);
        if let Some(occupant) = self.actor_grid[new_tile]
            && occupant != id
        {
            return Err(WorldError::TileOccupied {
                map: self.name.clone(),
                pos: to,
                occupant,
            });
        }
        let width = self.width as usize;
        let name = self.name.clone();
        let actor = self
            .actors
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(WorldError::NoSuchActor { map: name, id })?;
        let old_tile = actor.position.y as usize * width + actor.position.x as usize;
        actor.position = to;
        self.actor_grid[old_tile] = None;
        self.actor_grid[new_tile] = Some(id);
        Ok(())
    }

    /// Drop an item on a tile
    pub fn drop_item(&mut self, item: Item, position: Point) -> Result<ItemId, WorldError> {
        self.check_bounds(position)?;
        let id = item.id;
        let tile = self.tile(position);
        self.item_grid[tile].push(id);
        self.items.push(GroundItem { position, item });
        Ok(id)
    }

    /// Get item by ID
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().map(|g| &g.item).find(|i| i.id == id)
    }

    /// Get items at position
    pub fn items_at(&self, pos: Point) -> Vec<&Item> {
        if !self.is_in_bounds(pos) {
            return Vec::new();
        }
        let Some(ids) = self.item_grid.get(self.tile(pos)) else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| self.item(*id)).collect()
    }
}
