//! Tile geometry helpers: neighborhoods, distance ordering, walkability.
//!
//! Used by placement logic (nudging a keepsake drop off an occupied tile)
//! and by the demo shell to find free tiles near the room center.

use crate::shared::MapId;

use super::objects::LocationObjects;
use super::MapGrid;

/// Every tile within `distance` of `origin` (Chebyshev square), excluding
/// `origin` itself. Order is row-major; use [`sort_points_by_nearest`]
/// when proximity matters.
pub fn near_points(origin: (i32, i32), distance: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    for x in (origin.0 - distance)..=(origin.0 + distance) {
        for y in (origin.1 - distance)..=(origin.1 + distance) {
            if (x, y) == origin {
                continue;
            }
            points.push((x, y));
        }
    }
    points
}

/// Euclidean distance between two tiles.
pub fn tile_distance(a: (i32, i32), b: (i32, i32)) -> f32 {
    let dx = (a.0 - b.0) as f32;
    let dy = (a.1 - b.1) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// A copy of `points` ordered nearest-first from `start`.
pub fn sort_points_by_nearest(points: &[(i32, i32)], start: (i32, i32)) -> Vec<(i32, i32)> {
    let mut sorted: Vec<(i32, i32)> = points.to_vec();
    sorted.sort_by(|a, b| {
        tile_distance(*a, start)
            .partial_cmp(&tile_distance(*b, start))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

/// A tile is walkable when it is on the map, not solid terrain, and not
/// occupied by a placed object.
pub fn is_walkable_tile(
    grid: &MapGrid,
    objects: &LocationObjects,
    map: MapId,
    tile: (i32, i32),
) -> bool {
    grid.in_bounds(tile.0, tile.1)
        && !grid.is_solid(tile.0, tile.1)
        && !objects.is_occupied(map, tile)
}

/// The walkable tile closest to `origin` within `radius`, if any.
pub fn find_free_tile_near(
    grid: &MapGrid,
    objects: &LocationObjects,
    map: MapId,
    origin: (i32, i32),
    radius: i32,
) -> Option<(i32, i32)> {
    let candidates = sort_points_by_nearest(&near_points(origin, radius), origin);
    candidates
        .into_iter()
        .find(|tile| is_walkable_tile(grid, objects, map, *tile))
}
