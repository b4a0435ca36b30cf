use serde::Deserialize;

use crate::assets::SHAPES;
use crate::error::ConfigError;
use crate::params::Params;

/// Game configuration
///
/// Every field defaults to its [`Params`] value, so hosts only need to
/// send the values they want to override.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub reference_height: f32,
    pub base_sprite_scale: f32,
    pub spawn_rows: u32,
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub sprite_hit_offset: f32,
    pub pickup_width: f32,
    pub pickup_height: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub scroll_velocity: f32,
    pub obstacle_spawn_ms: f32,
    pub pickup_spawn_ms: f32,
    pub ramp_interval_ms: f32,
    pub ramp_step: f32,
    pub ramp_max: f32,
    pub solid_points: u64,
    pub gradient_points: u64,
    pub solid_pickup_chance: f64,
    pub music_volume: f32,
    pub sound_volume: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_height: Params::REFERENCE_HEIGHT,
            base_sprite_scale: Params::BASE_SPRITE_SCALE,
            spawn_rows: Params::SPAWN_ROWS,
            sprite_width: Params::SPRITE_WIDTH,
            sprite_height: Params::SPRITE_HEIGHT,
            sprite_hit_offset: Params::SPRITE_HIT_OFFSET,
            pickup_width: Params::PICKUP_WIDTH,
            pickup_height: Params::PICKUP_HEIGHT,
            gravity: Params::GRAVITY,
            jump_velocity: Params::JUMP_VELOCITY,
            scroll_velocity: Params::SCROLL_VELOCITY,
            obstacle_spawn_ms: Params::OBSTACLE_SPAWN_MS,
            pickup_spawn_ms: Params::PICKUP_SPAWN_MS,
            ramp_interval_ms: Params::RAMP_INTERVAL_MS,
            ramp_step: Params::RAMP_STEP,
            ramp_max: Params::RAMP_MAX,
            solid_points: Params::SOLID_POINTS,
            gradient_points: Params::GRADIENT_POINTS,
            solid_pickup_chance: Params::SOLID_PICKUP_CHANCE,
            music_volume: Params::MUSIC_VOLUME,
            sound_volume: Params::SOUND_VOLUME,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("referenceHeight", self.reference_height),
            ("baseSpriteScale", self.base_sprite_scale),
            ("spriteWidth", self.sprite_width),
            ("spriteHeight", self.sprite_height),
            ("pickupWidth", self.pickup_width),
            ("pickupHeight", self.pickup_height),
            ("obstacleSpawnMs", self.obstacle_spawn_ms),
            ("pickupSpawnMs", self.pickup_spawn_ms),
            ("rampIntervalMs", self.ramp_interval_ms),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let hit_limit = self.sprite_width.min(self.sprite_height) as f64;
        let ranged = [
            ("spriteHitOffset", self.sprite_hit_offset as f64, 0.0, hit_limit),
            ("rampStep", self.ramp_step as f64, 0.0, f32::MAX as f64),
            ("rampMax", self.ramp_max as f64, 0.0, f32::MAX as f64),
            ("solidPickupChance", self.solid_pickup_chance, 0.0, 1.0),
            ("musicVolume", self.music_volume as f64, 0.0, 1.0),
            ("soundVolume", self.sound_volume as f64, 0.0, 1.0),
        ];
        for (field, value, min, max) in ranged {
            if !(min..=max).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        let tallest_shape = SHAPES.iter().map(|&(_, h)| h).max().unwrap_or(1);
        if self.spawn_rows < tallest_shape {
            return Err(ConfigError::TooFewSpawnRows {
                rows: self.spawn_rows,
                tallest_shape,
            });
        }

        let delay_ms = self.obstacle_respawn_ms(self.ramp_max);
        if !(delay_ms >= Params::MIN_OBSTACLE_DELAY_MS) {
            return Err(ConfigError::ObstacleDelayTooShort {
                ramp_max: self.ramp_max,
                delay_ms,
                min_ms: Params::MIN_OBSTACLE_DELAY_MS,
            });
        }

        Ok(())
    }

    /// Delay before the next obstacle cluster, shrinking as the ramp climbs
    pub fn obstacle_respawn_ms(&self, ramp_bonus: f32) -> f32 {
        self.obstacle_spawn_ms - ramp_bonus * 2.0
    }
}
