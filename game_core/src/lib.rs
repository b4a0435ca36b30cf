//! Flappy Glitch simulation core
//!
//! Deterministic, engine-free game logic: gravity, scrolling spawns, the
//! difficulty ramp, AABB collisions and the run lifecycle. The embedding
//! page drives it through a [`Session`] and hears back through [`Host`].

pub mod assets;
pub mod components;
pub mod config;
pub mod error;
pub mod fsm;
pub mod host;
pub mod launcher;
pub mod params;
pub mod playfield;
pub mod presentation;
pub mod resources;
pub mod scale;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod systems;

pub use assets::{AssetRegistry, ColorDefinition, ColorValue};
pub use components::*;
pub use config::Config;
pub use error::{ConfigError, RegistryError, SessionError};
pub use fsm::{RunAction, RunFsm, RunPhase};
pub use host::{Host, NullHost, PresentationUpdate, ResultColor, RunResults, Sound};
pub use launcher::{Launch, Launcher, RestartRequest};
pub use params::Params;
pub use playfield::{Aabb, Viewport};
pub use resources::*;
pub use scale::Scale;
pub use scheduler::{Scheduler, TimerHandle};
pub use session::{Session, Timer};
pub use snapshot::Snapshot;

use glam::Vec2;
use hecs::World;

/// Helper to create the player entity, hovering at `pos`
pub fn create_player(world: &mut World, pos: Vec2, scale: &Scale) -> hecs::Entity {
    let size = Vec2::new(scale.sprite_width, scale.sprite_height);
    let body = Body::new(pos, Vec2::ZERO, size, scale.hit_offset / 2.0);
    world.spawn((Player::hovering(pos.y, scale.sprite_height / 2.0), body))
}

/// Helper to create one obstacle cell
pub fn create_obstacle(
    world: &mut World,
    label: &str,
    pos: Vec2,
    velocity: f32,
    scale: &Scale,
) -> hecs::Entity {
    let size = Vec2::new(scale.sprite_width, scale.sprite_height);
    let body = Body::new(pos, Vec2::new(velocity, 0.0), size, scale.hit_offset / 2.0);
    world.spawn((
        Obstacle {
            label: label.to_string(),
        },
        body,
    ))
}

/// Helper to create a pickup
pub fn create_pickup(
    world: &mut World,
    pickup: Pickup,
    pos: Vec2,
    velocity: f32,
    scale: &Scale,
) -> hecs::Entity {
    let size = Vec2::new(scale.pickup_width, scale.pickup_height);
    let body = Body::new(pos, Vec2::new(velocity, 0.0), size, 0.0);
    world.spawn((pickup, body))
}
