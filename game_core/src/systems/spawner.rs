use glam::Vec2;
use hecs::{Entity, World};

use crate::{
    create_obstacle, create_pickup, AssetRegistry, Config, GameRng, Pickup, PickupTier, Scale,
    Viewport,
};

/// What spawning needs to know about the current frame
pub struct SpawnContext<'a> {
    pub registry: &'a AssetRegistry,
    pub config: &'a Config,
    pub viewport: Viewport,
    pub scale: &'a Scale,
    /// Scroll velocity new entities start with
    pub velocity: f32,
}

/// A cluster of obstacle cells that share one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedCluster {
    pub label: String,
    pub columns: u32,
    pub rows: u32,
    pub entities: Vec<Entity>,
}

/// Spawn a random shape of obstacles just past the right edge
///
/// `exclude` names a label to avoid when another one is available.
pub fn spawn_obstacle_cluster(
    world: &mut World,
    ctx: &SpawnContext,
    rng: &mut GameRng,
    exclude: Option<&str>,
) -> SpawnedCluster {
    let (columns, rows) = ctx.registry.random_shape(rng);
    let label = ctx.registry.random_obstacle_key(rng, exclude).to_string();
    let origin = ctx
        .viewport
        .spawn_point(rows, ctx.config.spawn_rows, ctx.scale, rng);

    let mut entities = Vec::with_capacity((columns * rows) as usize);
    for col in 0..columns {
        for row in 0..rows {
            let pos = origin
                + Vec2::new(
                    col as f32 * ctx.scale.sprite_width,
                    row as f32 * ctx.scale.sprite_height,
                );
            entities.push(create_obstacle(world, &label, pos, ctx.velocity, ctx.scale));
        }
    }

    log::debug!("Spawned {columns}x{rows} {label} cluster at row y={}", origin.y);

    SpawnedCluster {
        label,
        columns,
        rows,
        entities,
    }
}

/// Spawn one pickup, solid or gradient, in a random row
pub fn spawn_pickup(world: &mut World, ctx: &SpawnContext, rng: &mut GameRng) -> Entity {
    let pos = ctx
        .viewport
        .spawn_point(1, ctx.config.spawn_rows, ctx.scale, rng);

    let gradient = if rng.chance(ctx.config.solid_pickup_chance) {
        None
    } else {
        ctx.registry.random_gradient_key(rng)
    };

    let pickup = match gradient {
        Some(key) => Pickup {
            color_key: key.to_string(),
            points: ctx.config.gradient_points,
            tier: PickupTier::Gradient,
        },
        None => Pickup {
            color_key: ctx.registry.random_color_key(rng).to_string(),
            points: ctx.config.solid_points,
            tier: PickupTier::Solid,
        },
    };

    create_pickup(world, pickup, pos, ctx.velocity, ctx.scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Body, ColorDefinition, Obstacle};

    fn registry(gradients: bool) -> AssetRegistry {
        let gradient_defs = if gradients {
            vec![ColorDefinition::gradient(
                Some("dusk"),
                &["#ff0000", "#0000ff"],
                "#fff",
            )]
        } else {
            Vec::new()
        };
        AssetRegistry::load_definitions(
            vec![("purple".into(), ColorDefinition::solid("#9146ff", "#fff"))],
            gradient_defs,
            vec![
                ("Kappa".into(), "emotes/kappa.png".into()),
                ("PogChamp".into(), "emotes/pog.png".into()),
            ],
            (40, 40),
        )
        .unwrap()
    }

    #[test]
    fn test_cluster_cells_share_label_and_velocity() {
        let registry = registry(true);
        let config = Config::new();
        let scale = Scale::new(600.0, &config);
        let ctx = SpawnContext {
            registry: &registry,
            config: &config,
            viewport: Viewport::new(800.0, 600.0),
            scale: &scale,
            velocity: -216.0,
        };
        let mut world = World::new();
        let mut rng = GameRng::new(7);

        for _ in 0..50 {
            let cluster = spawn_obstacle_cluster(&mut world, &ctx, &mut rng, None);
            assert_eq!(
                cluster.entities.len() as u32,
                cluster.columns * cluster.rows
            );

            for &entity in &cluster.entities {
                let obstacle = world.get::<&Obstacle>(entity).unwrap();
                let body = world.get::<&Body>(entity).unwrap();
                assert_eq!(obstacle.label, cluster.label);
                assert_eq!(body.vel, Vec2::new(-216.0, 0.0));
                assert!(body.pos.x >= 800.0);
                assert!(body.pos.y + body.size.y / 2.0 <= 600.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_cluster_avoids_excluded_label() {
        let registry = registry(false);
        let config = Config::new();
        let scale = Scale::new(600.0, &config);
        let ctx = SpawnContext {
            registry: &registry,
            config: &config,
            viewport: Viewport::new(800.0, 600.0),
            scale: &scale,
            velocity: -200.0,
        };
        let mut world = World::new();
        let mut rng = GameRng::new(3);

        for _ in 0..30 {
            let cluster = spawn_obstacle_cluster(&mut world, &ctx, &mut rng, Some("Kappa"));
            assert_eq!(cluster.label, "PogChamp");
        }
    }

    #[test]
    fn test_pickups_fall_back_to_solid_without_gradients() {
        let registry = registry(false);
        let mut config = Config::new();
        config.solid_pickup_chance = 0.0;
        let scale = Scale::new(600.0, &config);
        let ctx = SpawnContext {
            registry: &registry,
            config: &config,
            viewport: Viewport::new(800.0, 600.0),
            scale: &scale,
            velocity: -200.0,
        };
        let mut world = World::new();
        let mut rng = GameRng::new(11);

        let entity = spawn_pickup(&mut world, &ctx, &mut rng);
        let pickup = world.get::<&Pickup>(entity).unwrap();
        assert_eq!(pickup.tier, PickupTier::Solid);
        assert_eq!(pickup.points, 50);
        assert_eq!(pickup.color_key, "purple");
    }

    #[test]
    fn test_gradient_pickups_score_more() {
        let registry = registry(true);
        let mut config = Config::new();
        config.solid_pickup_chance = 0.0;
        let scale = Scale::new(600.0, &config);
        let ctx = SpawnContext {
            registry: &registry,
            config: &config,
            viewport: Viewport::new(800.0, 600.0),
            scale: &scale,
            velocity: -200.0,
        };
        let mut world = World::new();
        let mut rng = GameRng::new(5);

        let entity = spawn_pickup(&mut world, &ctx, &mut rng);
        let pickup = world.get::<&Pickup>(entity).unwrap();
        assert_eq!(pickup.tier, PickupTier::Gradient);
        assert_eq!(pickup.points, 100);
        assert_eq!(pickup.color_key, "_gradient-dusk");

        let body = world.get::<&Body>(entity).unwrap();
        assert_eq!(body.size, Vec2::new(scale.pickup_width, scale.pickup_height));
    }
}
