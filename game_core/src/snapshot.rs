use hecs::World;
use serde::{Deserialize, Serialize};

use crate::{Body, Obstacle, Pickup, PickupTier, Player, RunPhase};

/// Axis-aligned sprite placement, centre plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<&Body> for SpriteRect {
    fn from(body: &Body) -> Self {
        Self {
            x: body.pos.x,
            y: body.pos.y,
            width: body.size.x,
            height: body.size.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub rect: SpriteRect,
    pub angle: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    #[serde(flatten)]
    pub rect: SpriteRect,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupView {
    #[serde(flatten)]
    pub rect: SpriteRect,
    pub color_key: String,
    pub tier: PickupTier,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RunPhase,
    pub score: u64,
    pub highscore: u64,
    pub player: Option<PlayerView>,
    pub obstacles: Vec<ObstacleView>,
    pub pickups: Vec<PickupView>,
}

impl Snapshot {
    /// Capture the world, entities ordered by id
    pub fn capture(world: &World, phase: RunPhase, score: u64, highscore: u64) -> Self {
        let player = world
            .query::<(&Player, &Body)>()
            .iter()
            .next()
            .map(|(_e, (p, body))| PlayerView {
                rect: body.into(),
                angle: p.angle,
                alive: p.alive,
            });

        let mut obstacles: Vec<_> = world
            .query::<(&Obstacle, &Body)>()
            .iter()
            .map(|(e, (o, body))| {
                (
                    e.id(),
                    ObstacleView {
                        rect: body.into(),
                        label: o.label.clone(),
                    },
                )
            })
            .collect();
        obstacles.sort_by_key(|(id, _)| *id);

        let mut pickups: Vec<_> = world
            .query::<(&Pickup, &Body)>()
            .iter()
            .map(|(e, (p, body))| {
                (
                    e.id(),
                    PickupView {
                        rect: body.into(),
                        color_key: p.color_key.clone(),
                        tier: p.tier,
                    },
                )
            })
            .collect();
        pickups.sort_by_key(|(id, _)| *id);

        Self {
            phase,
            score,
            highscore,
            player,
            obstacles: obstacles.into_iter().map(|(_, v)| v).collect(),
            pickups: pickups.into_iter().map(|(_, v)| v).collect(),
        }
    }
}
