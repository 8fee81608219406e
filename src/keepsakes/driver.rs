//! The two in-place passes over a location's object set: dump before
//! save, revive after load.

use bevy::prelude::*;

use crate::shared::MapId;
use crate::world::objects::{LocationObjects, PlacedObject};

use super::transform::{bag_from_chest, bag_to_chest};
use super::DumpedKeepsakes;

/// Scan one map for keepsake bundles and convert each into a chest
/// stand-in, recording it in `dumped`.
///
/// The registry is cleared first, so the pass always reflects exactly
/// what is on the map right now; running it twice in a row leaves the
/// registry empty the second time. Records are appended in the store's
/// iteration order.
pub fn dump_keepsake_bags(
    objects: &mut LocationObjects,
    map: MapId,
    dumped: &mut DumpedKeepsakes,
) {
    dumped.clear();

    let bag_positions: Vec<(i32, i32)> = objects
        .objects_in(map)
        .filter(|(_, object)| object.is_keepsake_bag())
        .map(|(pos, _)| *pos)
        .collect();

    for pos in bag_positions {
        let Some(PlacedObject::KeepsakeBag(bag)) = objects.get(map, pos) else {
            continue;
        };
        let (chest, record) = bag_to_chest(bag, pos);
        info!(
            "[Keepsakes] Bundle from {} at ({}, {}) handed to a chest with {} item stack(s)",
            record.given_from,
            pos.0,
            pos.1,
            chest.items.len()
        );
        objects.set(map, pos, PlacedObject::Chest(chest));
        dumped.add(record);
    }

    info!("[Keepsakes] Detected {} bundle(s) to save.", dumped.count());
}

/// Walk the registry and restore each recorded bundle from the chest at
/// its tile. A record whose tile holds no chest is skipped with a
/// warning; one bad record never aborts the pass. The registry itself is
/// left untouched.
pub fn revive_keepsake_bags(objects: &mut LocationObjects, map: MapId, dumped: &DumpedKeepsakes) {
    for record in dumped.records() {
        let pos = record.position();

        let bag = match objects.get(map, pos) {
            Some(PlacedObject::Chest(chest)) => bag_from_chest(chest, record),
            Some(_) => {
                warn!(
                    "[Keepsakes] Bundle at ({}, {}) can't be revived — tile is not holding a chest",
                    pos.0, pos.1
                );
                continue;
            }
            None => {
                warn!(
                    "[Keepsakes] Bundle at ({}, {}) can't be revived — nothing is placed there",
                    pos.0, pos.1
                );
                continue;
            }
        };

        info!(
            "[Keepsakes] Revived bundle from {} at ({}, {}) ({} item stack(s))",
            bag.given_from,
            pos.0,
            pos.1,
            bag.items.len()
        );
        objects.set(map, pos, PlacedObject::KeepsakeBag(bag));
    }

    info!("[Keepsakes] Keepsake bundles revived.");
}
