//! Headless integration tests for Willowmere.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic systems (skipping all rendering), and verify that the
//! save/load cycle — including the keepsake dump/revive passes — works
//! end to end against a real on-disk save directory.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use willowmere::keepsakes::{DumpedKeepsakes, KeepsakeRecord};
use willowmere::save::{
    handle_load_request, handle_save_request, load_keepsake_records, read_save_data,
    ActiveSaveSlot, LoadCompleteEvent, LoadRequestEvent, SaveCompleteEvent, SaveLifecycle,
    SaveRequestEvent, SaveRoot, WorldSaveFile, KEEPSAKE_DATA_KEY, WORLD_DATA_KEY,
};
use willowmere::shared::*;
use willowmere::world::objects::{
    handle_keepsake_dropped, handle_place_chest, KeepsakeBag, LocationObjects, PlacedObject,
};
use willowmere::world::{CurrentMapId, WorldGrids};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

static TEST_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh save root under the system temp directory, unique per test.
fn temp_save_root() -> PathBuf {
    let n = TEST_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("willowmere_test_{}_{}", std::process::id(), n))
}

/// Builds a minimal Bevy app with all shared resources and events
/// registered but NO rendering, windowing, or asset loading. Systems
/// must be added per-test depending on what's being exercised.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    app.init_state::<GameState>();

    app.init_resource::<Calendar>()
        .init_resource::<Inventory>()
        .init_resource::<ItemRegistry>()
        .init_resource::<LocationObjects>()
        .init_resource::<WorldGrids>()
        .init_resource::<CurrentMapId>()
        .init_resource::<DumpedKeepsakes>()
        .init_resource::<SaveLifecycle>()
        .init_resource::<ActiveSaveSlot>();

    app.insert_resource(SaveRoot(temp_save_root()));

    app.add_event::<KeepsakeDroppedEvent>()
        .add_event::<PlaceChestEvent>()
        .add_event::<SaveRequestEvent>()
        .add_event::<LoadRequestEvent>()
        .add_event::<SaveCompleteEvent>()
        .add_event::<LoadCompleteEvent>();

    app
}

fn slot(item_id: &str, quantity: u8) -> InventorySlot {
    InventorySlot {
        item_id: item_id.to_string(),
        quantity,
    }
}

fn place_bundle(app: &mut App, pos: (i32, i32), given_from: &str, message: &str) {
    app.world_mut()
        .resource_mut::<LocationObjects>()
        .set(
            MapId::FarmHouse,
            pos,
            PlacedObject::KeepsakeBag(KeepsakeBag {
                given_from: given_from.to_string(),
                message: message.to_string(),
                giftbox_index: 2,
                items: vec![slot("parsnip", 2), slot("old_letter", 1)],
            }),
        );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: End-to-end save → revive cycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_end_to_end_save_and_revive_cycle() {
    let mut app = build_test_app();
    app.add_systems(Update, (handle_save_request, handle_load_request));

    place_bundle(&mut app, (5, 9), "Alice", "hello");

    // ── Save ─────────────────────────────────────────────────────────────
    app.world_mut().send_event(SaveRequestEvent { slot: 0 });
    app.update();

    let root = app.world().resource::<SaveRoot>().0.clone();

    // The bundle was swapped for a chest holding the same items
    {
        let objects = app.world().resource::<LocationObjects>();
        let occupant = objects.get(MapId::FarmHouse, (5, 9)).expect("occupant");
        let chest = occupant.as_chest().expect("bundle should now be a chest");
        assert_eq!(chest.items, vec![slot("parsnip", 2), slot("old_letter", 1)]);
    }

    // One record landed in the registry and in durable storage
    {
        let dumped = app.world().resource::<DumpedKeepsakes>();
        assert_eq!(dumped.count(), 1);
        let record = &dumped.records()[0];
        assert_eq!(record.given_from, "Alice");
        assert_eq!(record.message, "hello");
        assert_eq!(record.giftbox_index, 2);
        assert_eq!(record.position(), (5, 9));
    }
    let stored: Vec<KeepsakeRecord> = read_save_data(&root, 0, KEEPSAKE_DATA_KEY)
        .expect("readable")
        .expect("present");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].given_from, "Alice");

    let world_file: WorldSaveFile = read_save_data(&root, 0, WORLD_DATA_KEY)
        .expect("readable")
        .expect("present");
    assert_eq!(world_file.version, 1);
    assert_eq!(world_file.objects.len(), 1, "only the chest is in the world save");

    assert_eq!(
        *app.world().resource::<SaveLifecycle>(),
        SaveLifecycle::Saved
    );

    let completes: Vec<SaveCompleteEvent> = app
        .world_mut()
        .resource_mut::<Events<SaveCompleteEvent>>()
        .drain()
        .collect();
    assert_eq!(completes.len(), 1);
    assert!(completes[0].success);

    // ── Simulate a fresh session, then load ──────────────────────────────
    app.world_mut()
        .insert_resource(LocationObjects::default());
    app.world_mut()
        .resource_mut::<DumpedKeepsakes>()
        .replace(vec![KeepsakeRecord {
            given_from: "Stale".to_string(),
            giftbox_index: 0,
            message: String::new(),
            pos_x: 0,
            pos_y: 0,
        }]);

    app.world_mut().send_event(LoadRequestEvent { slot: 0 });
    app.update();

    // Registry was replaced wholesale by the stored records
    {
        let dumped = app.world().resource::<DumpedKeepsakes>();
        assert_eq!(dumped.count(), 1);
        assert_eq!(dumped.records()[0].given_from, "Alice");
    }

    // The bundle is back, with the plain giftbox variant
    {
        let objects = app.world().resource::<LocationObjects>();
        let occupant = objects.get(MapId::FarmHouse, (5, 9)).expect("occupant");
        let bag = occupant
            .as_keepsake_bag()
            .expect("chest should be a bundle again");
        assert_eq!(bag.given_from, "Alice");
        assert_eq!(bag.message, "hello");
        assert_eq!(bag.giftbox_index, 0, "variant resets on revival");
        assert_eq!(bag.items, vec![slot("parsnip", 2), slot("old_letter", 1)]);
    }

    assert_eq!(*app.world().resource::<SaveLifecycle>(), SaveLifecycle::Idle);

    let completes: Vec<LoadCompleteEvent> = app
        .world_mut()
        .resource_mut::<Events<LoadCompleteEvent>>()
        .drain()
        .collect();
    assert_eq!(completes.len(), 1);
    assert!(completes[0].success);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Registry reset on a second save
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_second_save_with_no_new_bundles_resets_registry() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_save_request);

    place_bundle(&mut app, (4, 4), "Orin", "see you");

    app.world_mut().send_event(SaveRequestEvent { slot: 0 });
    app.update();
    assert_eq!(app.world().resource::<DumpedKeepsakes>().count(), 1);

    // No new bundles between saves: the scan finds only chests now.
    app.world_mut().send_event(SaveRequestEvent { slot: 0 });
    app.update();
    assert_eq!(app.world().resource::<DumpedKeepsakes>().count(), 0);

    // Durable storage reflects the empty pass too.
    let root = app.world().resource::<SaveRoot>().0.clone();
    let stored: Vec<KeepsakeRecord> = read_save_data(&root, 0, KEEPSAKE_DATA_KEY)
        .expect("readable")
        .expect("present");
    assert!(stored.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Loading a slot that was never written
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_load_from_missing_slot_fails_gracefully() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_load_request);

    app.world_mut()
        .resource_mut::<LocationObjects>()
        .set(MapId::FarmHouse, (1, 1), PlacedObject::Boulder);

    app.world_mut().send_event(LoadRequestEvent { slot: 2 });
    app.update();

    let completes: Vec<LoadCompleteEvent> = app
        .world_mut()
        .resource_mut::<Events<LoadCompleteEvent>>()
        .drain()
        .collect();
    assert_eq!(completes.len(), 1);
    assert!(!completes[0].success);

    // World state is untouched by the failed load
    let objects = app.world().resource::<LocationObjects>();
    assert_eq!(
        objects.get(MapId::FarmHouse, (1, 1)),
        Some(&PlacedObject::Boulder)
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Keepsake record gateway defaults
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_keepsake_records_default_to_empty() {
    let root = temp_save_root();
    let records = load_keepsake_records(&root, 1);
    assert!(records.is_empty(), "absent key means nothing was tracked");
}

#[test]
fn test_corrupt_keepsake_records_default_to_empty() {
    let root = temp_save_root();
    let dir = root.join("slot_1");
    std::fs::create_dir_all(&dir).expect("create slot dir");
    std::fs::write(dir.join(format!("{}.json", KEEPSAKE_DATA_KEY)), "{not json")
        .expect("write garbage");

    let records = load_keepsake_records(&root, 1);
    assert!(records.is_empty(), "unreadable key degrades to empty");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Placement systems
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_place_chest_consumes_inventory() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_place_chest);

    app.world_mut()
        .resource_mut::<Inventory>()
        .try_add("chest", 1, 99);

    app.world_mut().send_event(PlaceChestEvent {
        map: MapId::FarmHouse,
        x: 3,
        y: 3,
    });
    app.update();

    // Second placement has no chest item left to consume.
    app.world_mut().send_event(PlaceChestEvent {
        map: MapId::FarmHouse,
        x: 4,
        y: 3,
    });
    app.update();

    let objects = app.world().resource::<LocationObjects>();
    assert_eq!(objects.count_in(MapId::FarmHouse), 1);
    assert!(objects
        .get(MapId::FarmHouse, (3, 3))
        .unwrap()
        .as_chest()
        .is_some());
    assert_eq!(app.world().resource::<Inventory>().count("chest"), 0);
}

#[test]
fn test_keepsake_drop_nudges_off_occupied_tile() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_keepsake_dropped);

    app.world_mut()
        .resource_mut::<LocationObjects>()
        .set(MapId::FarmHouse, (6, 4), PlacedObject::Boulder);

    app.world_mut().send_event(KeepsakeDroppedEvent {
        map: MapId::FarmHouse,
        x: 6,
        y: 4,
        given_from: "Tess".to_string(),
        message: "take care".to_string(),
        giftbox_index: Some(1),
        items: vec![slot("fiber", 3)],
    });
    app.update();

    let objects = app.world().resource::<LocationObjects>();
    let bundles: Vec<(i32, i32)> = objects
        .objects_in(MapId::FarmHouse)
        .filter(|(_, o)| o.is_keepsake_bag())
        .map(|(pos, _)| *pos)
        .collect();

    assert_eq!(bundles.len(), 1);
    let pos = bundles[0];
    assert_ne!(pos, (6, 4), "drop must not replace the boulder");
    assert!(
        (pos.0 - 6).abs() <= KEEPSAKE_DROP_RADIUS && (pos.1 - 4).abs() <= KEEPSAKE_DROP_RADIUS,
        "nudged tile {:?} should stay near the target",
        pos
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: Revival against a rearranged world
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_load_revives_only_records_with_matching_chests() {
    let mut app = build_test_app();
    app.add_systems(Update, (handle_save_request, handle_load_request));

    place_bundle(&mut app, (5, 9), "Alice", "hello");
    place_bundle(&mut app, (2, 7), "Orin", "goodbye");

    app.world_mut().send_event(SaveRequestEvent { slot: 0 });
    app.update();

    // Simulate a world that changed between save and load: drop the
    // chest at (2, 7) from the persisted world file.
    let root = app.world().resource::<SaveRoot>().0.clone();
    let mut world_file: WorldSaveFile = read_save_data(&root, 0, WORLD_DATA_KEY)
        .expect("readable")
        .expect("present");
    world_file.objects.retain(|o| (o.x, o.y) != (2, 7));
    willowmere::save::write_save_data(&root, 0, WORLD_DATA_KEY, &world_file)
        .expect("rewrite world file");

    app.world_mut().send_event(LoadRequestEvent { slot: 0 });
    app.update();

    let objects = app.world().resource::<LocationObjects>();
    assert!(
        objects
            .get(MapId::FarmHouse, (5, 9))
            .unwrap()
            .is_keepsake_bag(),
        "matching record revives"
    );
    assert!(
        objects.get(MapId::FarmHouse, (2, 7)).is_none(),
        "record without an occupant is skipped, tile stays empty"
    );

    // Both records are still in the registry — revival never consumes it.
    assert_eq!(app.world().resource::<DumpedKeepsakes>().count(), 2);
}
