use glam::Vec2;
use hecs::World;

use crate::{Body, Obstacle, Pickup, Player, Scale, Time, Viewport};

/// Hover or fall the player
pub fn move_player(world: &mut World, time: &Time, scale: &Scale) {
    for (_entity, (player, body)) in world.query_mut::<(&mut Player, &mut Body)>() {
        if let Some(hover) = player.hover.as_mut() {
            body.pos.y = hover.base_y + hover.advance(time.dt_ms());
            continue;
        }

        if player.gravity {
            body.vel.y += scale.gravity * time.dt;
        }
        body.pos += body.vel * time.dt;
    }
}

/// Move obstacles and pickups by their velocity
pub fn scroll_entities(world: &mut World, time: &Time) {
    for (_entity, (_, body)) in world.query_mut::<(&Obstacle, &mut Body)>() {
        body.pos += body.vel * time.dt;
    }
    for (_entity, (_, body)) in world.query_mut::<(&Pickup, &mut Body)>() {
        body.pos += body.vel * time.dt;
    }
}

/// Advance the player's cosmetic tilt by one frame
pub fn tilt_player(world: &mut World, time: &Time) {
    for (_entity, player) in world.query_mut::<&mut Player>() {
        player.update_tilt(time.dt_ms());
    }
}

/// Stop every obstacle and pickup where it is
pub fn freeze_world(world: &mut World) {
    set_scroll_velocity(world, 0.0);
}

/// Retarget every obstacle and pickup to a scroll velocity
pub fn set_scroll_velocity(world: &mut World, velocity: f32) {
    for (_entity, (_, body)) in world.query_mut::<(&Obstacle, &mut Body)>() {
        body.vel.x = velocity;
    }
    for (_entity, (_, body)) in world.query_mut::<(&Pickup, &mut Body)>() {
        body.vel.x = velocity;
    }
}

/// Reposition and resize everything after the viewport changed
///
/// Positions scale by the height ratio so the layout keeps its shape; the
/// player is re-centred horizontally. `velocity` is reasserted on scrolling
/// entities unless the world is frozen (`None`).
pub fn reposition_for_resize(
    world: &mut World,
    old: Viewport,
    new: Viewport,
    scale: &Scale,
    velocity: Option<f32>,
) {
    let ratio = new.height / old.height;
    let sprite = Vec2::new(scale.sprite_width, scale.sprite_height);
    let pickup = Vec2::new(scale.pickup_width, scale.pickup_height);
    let inset = scale.hit_offset / 2.0;

    for (_entity, (player, body)) in world.query_mut::<(&mut Player, &mut Body)>() {
        body.pos = Vec2::new(new.width / 2.0, body.pos.y * ratio);
        body.vel.y *= ratio;
        body.size = sprite;
        body.hit_inset = inset;
        if let Some(hover) = player.hover.as_mut() {
            hover.base_y *= ratio;
            hover.amplitude = scale.sprite_height / 2.0;
        }
    }

    for (_entity, (_, body)) in world.query_mut::<(&Obstacle, &mut Body)>() {
        body.pos *= ratio;
        body.size = sprite;
        body.hit_inset = inset;
        if let Some(v) = velocity {
            body.vel.x = v;
        }
    }

    for (_entity, (_, body)) in world.query_mut::<(&Pickup, &mut Body)>() {
        body.pos *= ratio;
        body.size = pickup;
        if let Some(v) = velocity {
            body.vel.x = v;
        }
    }
}
