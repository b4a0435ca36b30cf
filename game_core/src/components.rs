use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::params::Params;
use crate::playfield::Aabb;

/// Position, velocity and extent of anything on the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2, // Centre
    pub vel: Vec2,
    pub size: Vec2,
    pub hit_inset: f32, // Trimmed from each side for collision
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, size: Vec2, hit_inset: f32) -> Self {
        Self {
            pos,
            vel,
            size,
            hit_inset,
        }
    }

    /// Full sprite bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Aabb {
        self.bounds().shrink(self.hit_inset)
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.size.y / 2.0
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Short tween of the tilt toward the jump angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltTween {
    pub from: f32,
    pub elapsed_ms: f32,
}

/// Idle hover before the first input (sine ease-in-out, yoyo)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover {
    pub base_y: f32,
    pub amplitude: f32,
    pub elapsed_ms: f32,
}

impl Hover {
    pub fn new(base_y: f32, amplitude: f32) -> Self {
        Self {
            base_y,
            amplitude,
            elapsed_ms: 0.0,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        self.elapsed_ms += dt_ms;
        self.offset()
    }

    /// Vertical offset from `base_y` at the current time
    pub fn offset(&self) -> f32 {
        let half = Params::IDLE_BOB_MS;
        let t = (self.elapsed_ms % (2.0 * half)) / half;
        let p = if t <= 1.0 { t } else { 2.0 - t };
        let eased = -((std::f32::consts::PI * p).cos() - 1.0) / 2.0;
        self.amplitude * eased
    }
}

/// The player sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub alive: bool,
    pub angle: f32, // degrees, cosmetic
    pub gravity: bool,
    pub tilt: Option<TiltTween>,
    pub hover: Option<Hover>,
}

impl Player {
    /// A hovering player waiting for the first input
    pub fn hovering(base_y: f32, amplitude: f32) -> Self {
        Self {
            alive: true,
            angle: 0.0,
            gravity: false,
            tilt: None,
            hover: Some(Hover::new(base_y, amplitude)),
        }
    }

    /// Hand the player over to gravity
    pub fn release(&mut self) {
        self.alive = true;
        self.gravity = true;
        self.hover = None;
    }

    pub fn start_jump_tilt(&mut self) {
        self.tilt = Some(TiltTween {
            from: self.angle,
            elapsed_ms: 0.0,
        });
    }

    /// Tween toward the jump angle, then nose down one degree per frame
    pub fn update_tilt(&mut self, dt_ms: f32) {
        if let Some(mut tween) = self.tilt {
            tween.elapsed_ms += dt_ms;
            let t = (tween.elapsed_ms / Params::JUMP_TILT_MS).min(1.0);
            self.angle = tween.from + (Params::JUMP_TILT - tween.from) * t;
            self.tilt = if t < 1.0 { Some(tween) } else { None };
            return;
        }

        if self.angle < Params::MAX_TILT {
            self.angle = (self.angle + Params::TILT_PER_FRAME).min(Params::MAX_TILT);
        }
    }
}

/// An obstacle sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obstacle {
    pub label: String,
}

/// Pickup value tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupTier {
    Solid,
    Gradient,
}

/// A colour pickup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickup {
    pub color_key: String,
    pub points: u64,
    pub tier: PickupTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_hitbox_is_inset() {
        let body = Body::new(Vec2::new(100.0, 100.0), Vec2::ZERO, Vec2::splat(60.0), 6.0);
        let hit = body.hitbox();
        assert_eq!(hit.min, Vec2::splat(76.0));
        assert_eq!(hit.max, Vec2::splat(124.0));
        assert_eq!(body.top(), 70.0);
        assert_eq!(body.right(), 130.0);
    }

    #[test]
    fn test_tilt_tweens_then_relaxes() {
        let mut player = Player::hovering(0.0, 10.0);
        player.release();
        player.start_jump_tilt();

        player.update_tilt(50.0);
        assert_eq!(player.angle, -10.0);
        player.update_tilt(50.0);
        assert_eq!(player.angle, -20.0);
        assert!(player.tilt.is_none());

        player.update_tilt(16.0);
        assert_eq!(player.angle, -19.0);
    }

    #[test]
    fn test_tilt_is_capped() {
        let mut player = Player::hovering(0.0, 10.0);
        player.angle = 19.5;
        player.update_tilt(16.0);
        assert_eq!(player.angle, 20.0);
        player.update_tilt(16.0);
        assert_eq!(player.angle, 20.0);
    }

    #[test]
    fn test_hover_yoyo() {
        let mut hover = Hover::new(300.0, 30.0);
        assert_eq!(hover.offset(), 0.0);
        let peak = hover.advance(Params::IDLE_BOB_MS);
        assert!((peak - 30.0).abs() < 1e-3);
        let back = hover.advance(Params::IDLE_BOB_MS);
        assert!(back.abs() < 1e-3);
        let quarter = hover.advance(Params::IDLE_BOB_MS / 2.0);
        assert!((quarter - 15.0).abs() < 1e-3);
    }
}
