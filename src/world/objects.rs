//! Placed objects: the tile-keyed object store and placement systems.
//!
//! Every interactable thing sitting on a tile (chests, keepsake bundles,
//! saplings, boulders) lives in [`LocationObjects`], keyed by map and
//! grid position. At most one object occupies a tile.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::*;

use super::tiles::{find_free_tile_near, is_walkable_tile};
use super::WorldGrids;

// ═══════════════════════════════════════════════════════════════════════
// PLACED OBJECT KINDS
// ═══════════════════════════════════════════════════════════════════════

/// A storage chest: an ordered pile of item stacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChestStore {
    pub items: Vec<InventorySlot>,
}

/// A keepsake bundle left behind by an NPC friend: items plus a giver
/// identity, a message, and an unopened-giftbox sprite variant.
///
/// Bundles are live-only — the world save schema has no representation
/// for them (see [`SavedObjectKind`]). The keepsakes domain swaps them
/// for chests before every save and back after every load.
#[derive(Debug, Clone, PartialEq)]
pub struct KeepsakeBag {
    pub given_from: NpcId,
    pub message: String,
    pub giftbox_index: u32,
    pub items: Vec<InventorySlot>,
}

/// Anything that can occupy a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacedObject {
    Chest(ChestStore),
    KeepsakeBag(KeepsakeBag),
    Sapling { growth: u8 },
    Boulder,
}

impl PlacedObject {
    pub fn as_chest(&self) -> Option<&ChestStore> {
        match self {
            PlacedObject::Chest(chest) => Some(chest),
            _ => None,
        }
    }

    pub fn as_keepsake_bag(&self) -> Option<&KeepsakeBag> {
        match self {
            PlacedObject::KeepsakeBag(bag) => Some(bag),
            _ => None,
        }
    }

    pub fn is_keepsake_bag(&self) -> bool {
        matches!(self, PlacedObject::KeepsakeBag(_))
    }

    /// The world-save form of this object, or `None` for kinds the save
    /// schema does not carry (keepsake bundles).
    pub fn to_saved_kind(&self) -> Option<SavedObjectKind> {
        match self {
            PlacedObject::Chest(chest) => Some(SavedObjectKind::Chest {
                items: chest.items.clone(),
            }),
            PlacedObject::KeepsakeBag(_) => None,
            PlacedObject::Sapling { growth } => Some(SavedObjectKind::Sapling { growth: *growth }),
            PlacedObject::Boulder => Some(SavedObjectKind::Boulder),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LOCATION OBJECT STORE
// ═══════════════════════════════════════════════════════════════════════

/// All placed objects across every map, keyed by `(map, (x, y))`.
///
/// Plain data — no engine types — so logic that walks or rewrites the
/// object set can be exercised directly in unit tests.
#[derive(Resource, Debug, Clone, Default)]
pub struct LocationObjects {
    maps: HashMap<MapId, HashMap<(i32, i32), PlacedObject>>,
}

impl LocationObjects {
    pub fn get(&self, map: MapId, pos: (i32, i32)) -> Option<&PlacedObject> {
        self.maps.get(&map).and_then(|objs| objs.get(&pos))
    }

    /// Put an object on a tile, replacing whatever was there.
    pub fn set(&mut self, map: MapId, pos: (i32, i32), object: PlacedObject) {
        self.maps.entry(map).or_default().insert(pos, object);
    }

    pub fn remove(&mut self, map: MapId, pos: (i32, i32)) -> Option<PlacedObject> {
        self.maps.get_mut(&map).and_then(|objs| objs.remove(&pos))
    }

    pub fn is_occupied(&self, map: MapId, pos: (i32, i32)) -> bool {
        self.get(map, pos).is_some()
    }

    pub fn objects_in(
        &self,
        map: MapId,
    ) -> impl Iterator<Item = (&(i32, i32), &PlacedObject)> {
        self.maps.get(&map).into_iter().flatten()
    }

    pub fn count_in(&self, map: MapId) -> usize {
        self.maps.get(&map).map_or(0, |objs| objs.len())
    }

    /// Flatten every object into its world-save form. Objects without a
    /// saved form (keepsake bundles) are dropped with a warning — they
    /// are supposed to have been swapped out before this runs.
    pub fn to_saved(&self) -> Vec<SavedObject> {
        let mut out = Vec::new();
        for (map, objs) in &self.maps {
            for (pos, object) in objs {
                match object.to_saved_kind() {
                    Some(kind) => out.push(SavedObject {
                        map: *map,
                        x: pos.0,
                        y: pos.1,
                        kind,
                    }),
                    None => warn!(
                        "[World] Object at ({}, {}) has no saved form and will be lost",
                        pos.0, pos.1
                    ),
                }
            }
        }
        out
    }

    /// Replace the entire object set from world-save entries.
    pub fn replace_from_saved(&mut self, entries: &[SavedObject]) {
        self.maps.clear();
        for entry in entries {
            self.set(entry.map, (entry.x, entry.y), entry.kind.to_placed());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD-SAVE SCHEMA
// ═══════════════════════════════════════════════════════════════════════

/// The serializable kinds of placed object. Deliberately has no keepsake
/// bundle variant: a bundle's giver, message, and giftbox presentation
/// are live-only state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SavedObjectKind {
    Chest { items: Vec<InventorySlot> },
    Sapling { growth: u8 },
    Boulder,
}

impl SavedObjectKind {
    pub fn to_placed(&self) -> PlacedObject {
        match self {
            SavedObjectKind::Chest { items } => PlacedObject::Chest(ChestStore {
                items: items.clone(),
            }),
            SavedObjectKind::Sapling { growth } => PlacedObject::Sapling { growth: *growth },
            SavedObjectKind::Boulder => PlacedObject::Boulder,
        }
    }
}

/// One flat world-save entry: map, tile, and the object's saved form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedObject {
    pub map: MapId,
    pub x: i32,
    pub y: i32,
    pub kind: SavedObjectKind,
}

// ═══════════════════════════════════════════════════════════════════════
// PLACEMENT SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Resolve a keepsake drop: use the requested tile if free, otherwise the
/// nearest walkable tile within [`KEEPSAKE_DROP_RADIUS`].
pub fn handle_keepsake_dropped(
    mut events: EventReader<KeepsakeDroppedEvent>,
    grids: Res<WorldGrids>,
    mut objects: ResMut<LocationObjects>,
) {
    for ev in events.read() {
        let Some(grid) = grids.grid(ev.map) else {
            warn!("[World] Keepsake drop on unknown map {:?}", ev.map);
            continue;
        };

        let target = if is_walkable_tile(grid, &objects, ev.map, (ev.x, ev.y)) {
            Some((ev.x, ev.y))
        } else {
            find_free_tile_near(grid, &objects, ev.map, (ev.x, ev.y), KEEPSAKE_DROP_RADIUS)
        };

        let Some(pos) = target else {
            warn!(
                "[World] No free tile near ({}, {}) for a keepsake bundle from {}",
                ev.x, ev.y, ev.given_from
            );
            continue;
        };

        let giftbox_index = ev
            .giftbox_index
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..GIFTBOX_VARIANTS));

        objects.set(
            ev.map,
            pos,
            PlacedObject::KeepsakeBag(KeepsakeBag {
                given_from: ev.given_from.clone(),
                message: ev.message.clone(),
                giftbox_index,
                items: ev.items.clone(),
            }),
        );

        info!(
            "[World] {} left a keepsake bundle at ({}, {}) with {} item stack(s)",
            ev.given_from,
            pos.0,
            pos.1,
            ev.items.len()
        );
    }
}

/// Place an empty chest from the player inventory onto a free tile.
pub fn handle_place_chest(
    mut events: EventReader<PlaceChestEvent>,
    mut inventory: ResMut<Inventory>,
    mut objects: ResMut<LocationObjects>,
) {
    for ev in events.read() {
        if objects.is_occupied(ev.map, (ev.x, ev.y)) {
            info!(
                "[World] Cannot place chest — tile ({}, {}) is occupied",
                ev.x, ev.y
            );
            continue;
        }

        let removed = inventory.try_remove("chest", 1);
        if removed == 0 {
            info!("[World] No chest in the inventory to place");
            continue;
        }

        objects.set(ev.map, (ev.x, ev.y), PlacedObject::Chest(ChestStore::default()));
        info!("[World] Placed chest at ({}, {})", ev.x, ev.y);
    }
}
