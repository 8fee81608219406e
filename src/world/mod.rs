//! World domain: walkability grids, the placed-object store, tile
//! helpers, and placeholder rendering for placed objects.

pub mod objects;
pub mod render;
pub mod tiles;

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::shared::*;

use self::objects::{handle_keepsake_dropped, handle_place_chest, LocationObjects};
use self::render::sync_object_sprites;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LocationObjects>()
            .init_resource::<WorldGrids>()
            .init_resource::<CurrentMapId>()
            .add_systems(
                Update,
                (
                    handle_keepsake_dropped,
                    handle_place_chest,
                    sync_object_sprites,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MAP GRIDS
// ═══════════════════════════════════════════════════════════════════════

/// Which map the camera/player is currently on.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CurrentMapId {
    pub map_id: MapId,
}

impl Default for CurrentMapId {
    fn default() -> Self {
        Self {
            map_id: MapId::FarmHouse,
        }
    }
}

/// Static walkability data for one map: bounds plus solid tiles.
#[derive(Debug, Clone)]
pub struct MapGrid {
    pub width: i32,
    pub height: i32,
    solid: HashSet<(i32, i32)>,
}

impl MapGrid {
    /// An open grid with a solid one-tile border (interior walls of a
    /// room, or the fenced edge of an outdoor map).
    pub fn bordered(width: i32, height: i32) -> Self {
        let mut solid = HashSet::new();
        for x in 0..width {
            solid.insert((x, 0));
            solid.insert((x, height - 1));
        }
        for y in 0..height {
            solid.insert((0, y));
            solid.insert((width - 1, y));
        }
        Self {
            width,
            height,
            solid,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.solid.contains(&(x, y))
    }

    pub fn set_solid(&mut self, x: i32, y: i32, solid: bool) {
        if solid {
            self.solid.insert((x, y));
        } else {
            self.solid.remove(&(x, y));
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.is_solid(x, y)
    }
}

/// Walkability grids for every map, generated once at startup.
#[derive(Resource, Debug, Clone)]
pub struct WorldGrids {
    grids: HashMap<MapId, MapGrid>,
}

impl Default for WorldGrids {
    fn default() -> Self {
        let mut grids = HashMap::new();
        grids.insert(MapId::FarmHouse, MapGrid::bordered(12, 9));
        grids.insert(MapId::Farm, MapGrid::bordered(24, 20));
        grids.insert(MapId::Town, MapGrid::bordered(18, 14));
        Self { grids }
    }
}

impl WorldGrids {
    pub fn grid(&self, map: MapId) -> Option<&MapGrid> {
        self.grids.get(&map)
    }
}
