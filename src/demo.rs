//! Interactive demo shell for the binary: seeds a furnished farmhouse
//! and binds keys so the whole keepsake cycle can be driven by hand.
//!
//! B drops a keepsake bundle near the room center, C places a chest,
//! F5/F9 quicksave/quickload (bound in the save domain).

use bevy::prelude::*;
use rand::seq::SliceRandom;

use crate::shared::*;
use crate::world::objects::{LocationObjects, PlacedObject};
use crate::world::tiles::find_free_tile_near;
use crate::world::{CurrentMapId, WorldGrids};

const DEMO_GIVERS: [&str; 3] = ["Maribel", "Orin", "Tess"];
const DEMO_MESSAGES: [&str; 3] = [
    "Thanks for walking me home.",
    "Something for the road.",
    "Don't open it until spring!",
];

pub struct DemoPlugin;

impl Plugin for DemoPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), seed_farmhouse)
            .add_systems(
                Update,
                demo_keybinds.run_if(in_state(GameState::Playing)),
            );
    }
}

/// Furnish the farmhouse and hand the player some starting items.
fn seed_farmhouse(mut inventory: ResMut<Inventory>, mut objects: ResMut<LocationObjects>) {
    inventory.try_add("chest", 3, 99);
    inventory.try_add("parsnip", 10, 99);
    inventory.try_add("fiber", 6, 99);

    objects.set(MapId::FarmHouse, (2, 2), PlacedObject::Sapling { growth: 0 });
    objects.set(MapId::FarmHouse, (9, 2), PlacedObject::Boulder);

    info!("[Demo] Farmhouse ready. B = drop keepsake bundle, C = place chest, F5/F9 = save/load.");
}

fn demo_keybinds(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_map: Res<CurrentMapId>,
    grids: Res<WorldGrids>,
    objects: Res<LocationObjects>,
    mut keepsake_writer: EventWriter<KeepsakeDroppedEvent>,
    mut chest_writer: EventWriter<PlaceChestEvent>,
) {
    let map = current_map.map_id;
    let Some(grid) = grids.grid(map) else {
        return;
    };
    let center = (grid.width / 2, grid.height / 2);

    if keyboard.just_pressed(KeyCode::KeyB) {
        let mut rng = rand::thread_rng();
        let given_from = DEMO_GIVERS.choose(&mut rng).unwrap().to_string();
        let message = DEMO_MESSAGES.choose(&mut rng).unwrap().to_string();

        keepsake_writer.send(KeepsakeDroppedEvent {
            map,
            x: center.0,
            y: center.1,
            given_from,
            message,
            giftbox_index: None,
            items: vec![
                InventorySlot {
                    item_id: "parsnip".to_string(),
                    quantity: 2,
                },
                InventorySlot {
                    item_id: "old_letter".to_string(),
                    quantity: 1,
                },
            ],
        });
    }

    if keyboard.just_pressed(KeyCode::KeyC) {
        let Some(pos) = find_free_tile_near(grid, &objects, map, center, 4) else {
            info!("[Demo] Nowhere near the center to place a chest");
            return;
        };
        chest_writer.send(PlaceChestEvent {
            map,
            x: pos.0,
            y: pos.1,
        });
    }
}
