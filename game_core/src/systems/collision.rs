use hecs::{Entity, World};

use crate::systems::freeze_world;
use crate::{
    Aabb, AssetRegistry, Body, CollectEvent, Events, HitEvent, Obstacle, Pickup, Player, Score,
    Sound,
};

/// Resolve this frame's overlaps, in order:
/// player against obstacles, player against pickups, pickups against obstacles.
///
/// A fatal hit kills the player and freezes the world before pickups are
/// considered, so a pickup touched in the same frame is not collected.
/// Iteration is sorted by entity id so results do not depend on storage order.
pub fn resolve_collisions(
    world: &mut World,
    player: Entity,
    registry: &AssetRegistry,
    score: &mut Score,
    events: &mut Events,
) {
    let (player_box, mut alive) = match world.query_one_mut::<(&Player, &Body)>(player) {
        Ok((p, body)) => (body.hitbox(), p.alive),
        Err(_) => return,
    };

    let mut obstacles: Vec<(Entity, Aabb, String)> = world
        .query::<(&Obstacle, &Body)>()
        .iter()
        .map(|(e, (o, body))| (e, body.hitbox(), o.label.clone()))
        .collect();
    obstacles.sort_by_key(|(e, _, _)| e.id());

    if alive {
        let hit = obstacles
            .iter()
            .find(|(_, hitbox, _)| player_box.overlaps(hitbox));

        if let Some((_, _, label)) = hit {
            if let Ok(mut p) = world.get::<&mut Player>(player) {
                p.alive = false;
            }
            alive = false;
            events.hit = Some(HitEvent {
                label: label.clone(),
            });
            events.sounds.push(Sound::Hit);
            freeze_world(world);
            log::info!("Player hit {label} at score {}", score.score);
        }
    }

    let mut pickups: Vec<(Entity, Aabb, String, u64)> = world
        .query::<(&Pickup, &Body)>()
        .iter()
        .map(|(e, (p, body))| (e, body.hitbox(), p.color_key.clone(), p.points))
        .collect();
    pickups.sort_by_key(|(e, _, _, _)| e.id());

    let mut to_remove = Vec::new();

    for (entity, hitbox, color_key, points) in pickups {
        if alive && player_box.overlaps(&hitbox) {
            score.add(points);
            if let Some(definition) = registry.definition(&color_key) {
                events.collected.push(CollectEvent {
                    color_key,
                    points,
                    definition: definition.clone(),
                });
            }
            events.sounds.push(Sound::Pickup);
            to_remove.push(entity);
            continue;
        }

        if obstacles.iter().any(|(_, obstacle, _)| obstacle.overlaps(&hitbox)) {
            events.pickups_blocked += 1;
            to_remove.push(entity);
        }
    }

    for entity in to_remove {
        let _ = world.despawn(entity);
    }
}
