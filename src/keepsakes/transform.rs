//! The two pure conversions between a keepsake bundle and its chest
//! stand-in. No world access, no side effects.

use crate::world::objects::{ChestStore, KeepsakeBag};

use super::records::KeepsakeRecord;

/// Forward: bundle → (chest stand-in, durable record).
///
/// The chest receives a full copy of the bundle's items, never a shared
/// handle to them.
pub fn bag_to_chest(bag: &KeepsakeBag, pos: (i32, i32)) -> (ChestStore, KeepsakeRecord) {
    let chest = ChestStore {
        items: bag.items.clone(),
    };
    let record = KeepsakeRecord {
        given_from: bag.given_from.clone(),
        giftbox_index: bag.giftbox_index,
        message: bag.message.clone(),
        pos_x: pos.0,
        pos_y: pos.1,
    };
    (chest, record)
}

/// Inverse: (chest at the record's tile, record) → reconstructed bundle.
///
/// Revived bundles always come back with the plain giftbox look; the
/// recorded variant is not restored.
pub fn bag_from_chest(chest: &ChestStore, record: &KeepsakeRecord) -> KeepsakeBag {
    KeepsakeBag {
        given_from: record.given_from.clone(),
        message: record.message.clone(),
        giftbox_index: 0,
        items: chest.items.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::InventorySlot;

    fn sample_bag() -> KeepsakeBag {
        KeepsakeBag {
            given_from: "Maribel".to_string(),
            message: "thanks for the adventure".to_string(),
            giftbox_index: 2,
            items: vec![
                InventorySlot {
                    item_id: "parsnip".to_string(),
                    quantity: 3,
                },
                InventorySlot {
                    item_id: "fiber".to_string(),
                    quantity: 7,
                },
            ],
        }
    }

    #[test]
    fn test_forward_captures_identity_and_position() {
        let bag = sample_bag();
        let (chest, record) = bag_to_chest(&bag, (5, 9));

        assert_eq!(chest.items, bag.items);
        assert_eq!(record.given_from, "Maribel");
        assert_eq!(record.giftbox_index, 2);
        assert_eq!(record.message, "thanks for the adventure");
        assert_eq!(record.position(), (5, 9));
    }

    #[test]
    fn test_forward_copies_items_instead_of_sharing() {
        let mut bag = sample_bag();
        let (chest, _) = bag_to_chest(&bag, (0, 0));

        bag.items[0].quantity = 99;
        assert_eq!(
            chest.items[0].quantity, 3,
            "chest items must be an independent copy"
        );
    }

    #[test]
    fn test_round_trip_restores_bundle_with_plain_giftbox() {
        let bag = sample_bag();
        let (chest, record) = bag_to_chest(&bag, (5, 9));
        let revived = bag_from_chest(&chest, &record);

        assert_eq!(revived.given_from, bag.given_from);
        assert_eq!(revived.message, bag.message);
        assert_eq!(revived.items, bag.items);
        assert_eq!(revived.giftbox_index, 0, "variant is reset on revival");
    }

    #[test]
    fn test_inverse_takes_items_from_chest_not_record() {
        let bag = sample_bag();
        let (mut chest, record) = bag_to_chest(&bag, (1, 1));

        // Someone rearranged the chest between save and load.
        chest.items.push(InventorySlot {
            item_id: "wood".to_string(),
            quantity: 5,
        });

        let revived = bag_from_chest(&chest, &record);
        assert_eq!(revived.items.len(), 3, "revival uses the chest's items");
    }
}
