//! Keepsake persistence: swapping live keepsake bundles for storage
//! chests across the save boundary and back.
//!
//! Bundles carry state the world save schema does not hold (giver,
//! message, giftbox variant). Before every save, [`dump_keepsake_bags`]
//! converts each bundle in place into a chest with the same items and
//! appends a [`KeepsakeRecord`] to the [`DumpedKeepsakes`] registry; the
//! registry is persisted next to the world save. After load,
//! [`revive_keepsake_bags`] matches records back to chests by tile and
//! restores the bundles.

mod driver;
mod records;
mod transform;

pub use driver::{dump_keepsake_bags, revive_keepsake_bags};
pub use records::KeepsakeRecord;
pub use transform::{bag_from_chest, bag_to_chest};

use bevy::prelude::*;

// ═══════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════

/// The bundles dumped in the current save cycle, in scan order.
///
/// Rebuilt from scratch on every dump pass and replaced wholesale on
/// load — it never accumulates across cycles. Records are not deduped by
/// tile: if two bundles ever end up recorded for one tile, revival
/// processes both in order and the second fails its occupant check.
#[derive(Resource, Debug, Clone, Default)]
pub struct DumpedKeepsakes {
    records: Vec<KeepsakeRecord>,
}

impl DumpedKeepsakes {
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn add(&mut self, record: KeepsakeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[KeepsakeRecord] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swap in a freshly loaded record list, discarding whatever was held.
    pub fn replace(&mut self, records: Vec<KeepsakeRecord>) {
        self.records = records;
    }
}
