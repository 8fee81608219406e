//! Data layer — populates the item registry at game startup.
//!
//! Runs in OnEnter(GameState::Loading), fills ItemRegistry from the
//! hard-coded game-design data in submodules, then transitions the game
//! into GameState::Playing.

mod items;

use bevy::prelude::*;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Populates every registry and then transitions to Playing.
fn load_all_data(
    mut item_registry: ResMut<ItemRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    items::populate_items(&mut item_registry);
    info!("  Items loaded: {}", item_registry.items.len());

    info!("DataPlugin: all registries populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}
