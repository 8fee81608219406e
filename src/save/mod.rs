//! Save/load for Willowmere.
//!
//! Each save slot is a directory of keyed JSON documents:
//! `saves/slot_N/world.json` holds the world save file, and
//! `saves/slot_N/dumped-keepsakes.json` holds the keepsake bundle
//! records sitting next to it. The handlers here are the integration
//! layer for the keepsakes domain: the dump pass runs before the world
//! is written, the revive pass after it is read back.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::keepsakes::{
    dump_keepsake_bags, revive_keepsake_bags, DumpedKeepsakes, KeepsakeRecord,
};
use crate::shared::*;
use crate::world::objects::{LocationObjects, SavedObject};

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;
pub const NUM_SAVE_SLOTS: usize = 3;

/// Logical key of the world save document within a slot.
pub const WORLD_DATA_KEY: &str = "world";
/// Logical key of the keepsake record list within a slot.
pub const KEEPSAKE_DATA_KEY: &str = "dumped-keepsakes";

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by gameplay/UI to trigger a save.
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent {
    pub slot: u8,
}

/// Sent by gameplay/UI to trigger loading a specific slot.
#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent {
    pub slot: u8,
}

/// Sent after a save completes (success or failure).
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Sent after a load completes.
#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Tracks which save slot is currently active.
#[derive(Resource, Debug, Clone)]
pub struct ActiveSaveSlot {
    pub slot: u8,
}

impl Default for ActiveSaveSlot {
    fn default() -> Self {
        Self { slot: 0 }
    }
}

/// Root directory holding the slot directories. Defaults to a `saves`
/// directory next to the executable; tests point it at a temp dir.
#[derive(Resource, Debug, Clone)]
pub struct SaveRoot(pub PathBuf);

impl Default for SaveRoot {
    fn default() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        Self(exe_dir.join("saves"))
    }
}

/// Where the save/load cycle currently stands. The cycle is re-entrant:
/// a new request in any state simply restarts it, which is safe because
/// the dump pass rebuilds the keepsake registry from scratch every time.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveLifecycle {
    #[default]
    Idle,
    Scanning,
    Saved,
    Loaded,
    Reconciling,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveSaveSlot>()
            .init_resource::<SaveRoot>()
            .init_resource::<SaveLifecycle>()
            .init_resource::<DumpedKeepsakes>()
            .add_event::<SaveRequestEvent>()
            .add_event::<LoadRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_event::<LoadCompleteEvent>()
            .add_systems(
                Update,
                (handle_save_request, handle_load_request, quicksave_keybind)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// KEYED SAVE-DATA STORE
// ═══════════════════════════════════════════════════════════════════════

fn slot_dir(root: &Path, slot: u8) -> PathBuf {
    root.join(format!("slot_{}", slot))
}

fn data_path(root: &Path, slot: u8, key: &str) -> PathBuf {
    slot_dir(root, slot).join(format!("{}.json", key))
}

/// Serialize `value` under `key` in the slot directory, overwriting any
/// prior document.
pub fn write_save_data<T: Serialize + ?Sized>(
    root: &Path,
    slot: u8,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let dir = slot_dir(root, slot);
    fs::create_dir_all(&dir)
        .map_err(|e| format!("Could not create save directory {}: {}", dir.display(), e))?;

    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("Serialization failed: {}", e))?;

    let path = data_path(root, slot, key);
    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("Rename failed: {}", e))?;

    Ok(())
}

/// Read the document stored under `key`, or `Ok(None)` when the key was
/// never written. Parse failures are errors; absence is not.
pub fn read_save_data<T: DeserializeOwned>(
    root: &Path,
    slot: u8,
    key: &str,
) -> Result<Option<T>, String> {
    let path = data_path(root, slot, key);
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(&path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    let value =
        serde_json::from_str(&json).map_err(|e| format!("Deserialization failed: {}", e))?;
    Ok(Some(value))
}

// ═══════════════════════════════════════════════════════════════════════
// KEEPSAKE RECORD GATEWAY
// ═══════════════════════════════════════════════════════════════════════

/// Persist the registry under its fixed key. Failures are logged, never
/// propagated — a broken sidecar must not abort the save.
pub fn save_keepsake_records(root: &Path, slot: u8, dumped: &DumpedKeepsakes) {
    match write_save_data(root, slot, KEEPSAKE_DATA_KEY, dumped.records()) {
        Ok(()) => info!(
            "[Keepsakes] {} bundle record(s) written to slot {}.",
            dumped.count(),
            slot
        ),
        Err(e) => error!("[Keepsakes] Could not write bundle records: {}", e),
    }
}

/// Load the registry from its fixed key. A missing or unreadable
/// document degrades to an empty list.
pub fn load_keepsake_records(root: &Path, slot: u8) -> Vec<KeepsakeRecord> {
    match read_save_data::<Vec<KeepsakeRecord>>(root, slot, KEEPSAKE_DATA_KEY) {
        Ok(Some(records)) => {
            info!(
                "[Keepsakes] {} stored bundle record(s) loaded from slot {}.",
                records.len(),
                slot
            );
            records
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("[Keepsakes] Could not read bundle records: {}", e);
            Vec::new()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD SAVE FILE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSaveFile {
    pub version: u32,
    pub slot: u8,
    pub save_timestamp: u64,
    pub calendar: Calendar,
    pub inventory: Inventory,
    pub objects: Vec<SavedObject>,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Full save cycle: dump keepsake bundles, write their records, write
/// the world save file.
pub fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    mut active_slot: ResMut<ActiveSaveSlot>,
    mut lifecycle: ResMut<SaveLifecycle>,
    root: Res<SaveRoot>,
    mut objects: ResMut<LocationObjects>,
    mut dumped: ResMut<DumpedKeepsakes>,
    calendar: Res<Calendar>,
    inventory: Res<Inventory>,
) {
    for ev in save_events.read() {
        let slot = ev.slot;
        active_slot.slot = slot;

        info!(
            "[Save] Saving to slot {} on a {} day...",
            slot,
            calendar.weather.display_name()
        );

        *lifecycle = SaveLifecycle::Scanning;
        dump_keepsake_bags(&mut objects, MapId::FarmHouse, &mut dumped);
        save_keepsake_records(&root.0, slot, &dumped);

        let file = WorldSaveFile {
            version: SAVE_VERSION,
            slot,
            save_timestamp: current_timestamp(),
            calendar: calendar.clone(),
            inventory: inventory.clone(),
            objects: objects.to_saved(),
        };

        match write_save_data(&root.0, slot, WORLD_DATA_KEY, &file) {
            Ok(()) => {
                *lifecycle = SaveLifecycle::Saved;
                info!("[Save] Slot {} written.", slot);
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                *lifecycle = SaveLifecycle::Idle;
                warn!("[Save] Save to slot {} FAILED: {}", slot, e);
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

/// Full load cycle: read the world save, swap all state in, read the
/// keepsake records, revive bundles in place.
pub fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    mut active_slot: ResMut<ActiveSaveSlot>,
    mut lifecycle: ResMut<SaveLifecycle>,
    root: Res<SaveRoot>,
    mut objects: ResMut<LocationObjects>,
    mut dumped: ResMut<DumpedKeepsakes>,
    mut calendar: ResMut<Calendar>,
    mut inventory: ResMut<Inventory>,
) {
    for ev in load_events.read() {
        let slot = ev.slot;
        info!("[Save] Loading from slot {}...", slot);

        let file = match read_save_data::<WorldSaveFile>(&root.0, slot, WORLD_DATA_KEY) {
            Ok(Some(file)) => file,
            Ok(None) => {
                warn!("[Save] Save slot {} does not exist", slot);
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(format!("Save slot {} does not exist", slot)),
                });
                continue;
            }
            Err(e) => {
                warn!("[Save] Load from slot {} FAILED: {}", slot, e);
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
                continue;
            }
        };

        if file.version != SAVE_VERSION {
            warn!(
                "[Save] Slot {} has version {} but current version is {}. Attempting to load anyway.",
                slot, file.version, SAVE_VERSION
            );
        }

        active_slot.slot = slot;
        *calendar = file.calendar;
        *inventory = file.inventory;
        objects.replace_from_saved(&file.objects);

        // The registry is replaced wholesale — stale records from a
        // previously loaded save must not survive.
        dumped.replace(load_keepsake_records(&root.0, slot));
        *lifecycle = SaveLifecycle::Loaded;

        *lifecycle = SaveLifecycle::Reconciling;
        revive_keepsake_bags(&mut objects, MapId::FarmHouse, &dumped);
        *lifecycle = SaveLifecycle::Idle;

        info!("[Save] Load from slot {} succeeded.", slot);
        complete_events.send(LoadCompleteEvent {
            slot,
            success: true,
            error_message: None,
        });
    }
}

/// F5 = quicksave to active slot, F9 = quickload from active slot.
pub fn quicksave_keybind(
    keyboard: Res<ButtonInput<KeyCode>>,
    active_slot: Res<ActiveSaveSlot>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    mut load_writer: EventWriter<LoadRequestEvent>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        info!("[Save] F5 quicksave to slot {}", active_slot.slot);
        save_writer.send(SaveRequestEvent {
            slot: active_slot.slot,
        });
    }
    if keyboard.just_pressed(KeyCode::F9) {
        info!("[Save] F9 quickload from slot {}", active_slot.slot);
        load_writer.send(LoadRequestEvent {
            slot: active_slot.slot,
        });
    }
}
