//! Placeholder-sprite rendering for placed objects.
//!
//! Each placed object on the current map is drawn as a flat-colored
//! square. Sprites are rebuilt whenever the object store or the current
//! map changes; the store is small enough that a full rebuild is cheaper
//! than diffing.

use bevy::prelude::*;

use crate::shared::*;

use super::objects::{LocationObjects, PlacedObject};
use super::CurrentMapId;

/// Marker for sprite entities mirroring the placed-object store.
#[derive(Component, Debug)]
pub struct PlacedObjectSprite;

pub fn sync_object_sprites(
    objects: Res<LocationObjects>,
    current_map: Res<CurrentMapId>,
    mut commands: Commands,
    existing: Query<Entity, With<PlacedObjectSprite>>,
) {
    if !objects.is_changed() && !current_map.is_changed() {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    for (pos, object) in objects.objects_in(current_map.map_id) {
        let world_x = pos.0 as f32 * TILE_SIZE + TILE_SIZE * 0.5;
        let world_y = pos.1 as f32 * TILE_SIZE + TILE_SIZE * 0.5;

        commands.spawn((
            PlacedObjectSprite,
            Sprite {
                color: object_color(object),
                custom_size: Some(Vec2::new(TILE_SIZE, TILE_SIZE)),
                ..default()
            },
            Transform::from_translation(Vec3::new(world_x, world_y, 5.0)),
        ));
    }
}

fn object_color(object: &PlacedObject) -> Color {
    match object {
        PlacedObject::Chest(_) => Color::srgb(0.55, 0.35, 0.15),
        PlacedObject::KeepsakeBag(_) => Color::srgb(0.82, 0.22, 0.25),
        PlacedObject::Sapling { .. } => Color::srgb(0.30, 0.60, 0.25),
        PlacedObject::Boulder => Color::srgb(0.50, 0.50, 0.52),
    }
}
