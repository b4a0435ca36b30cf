use hecs::{Entity, World};

use crate::components::*;
use crate::resources::*;

/// Garbage collection: despawn obstacles and pickups that scrolled off the left edge
pub fn despawn_offscreen(world: &mut World, events: &mut Events) {
    let mut to_remove = Vec::new();

    for (entity, (_, body)) in world.query::<(&Obstacle, &Body)>().iter() {
        if body.right() < 0.0 {
            to_remove.push(entity);
        }
    }
    for (entity, (_, body)) in world.query::<(&Pickup, &Body)>().iter() {
        if body.right() < 0.0 {
            to_remove.push(entity);
        }
    }

    for entity in to_remove {
        if world.despawn(entity).is_ok() {
            events.despawned += 1;
        }
    }
}

/// Remove every obstacle and pickup, leaving the player
pub fn clear_scrolling(world: &mut World) -> usize {
    let mut to_remove: Vec<Entity> = world
        .query::<&Obstacle>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    to_remove.extend(world.query::<&Pickup>().iter().map(|(entity, _)| entity));

    to_remove
        .into_iter()
        .filter(|&entity| world.despawn(entity).is_ok())
        .count()
}
