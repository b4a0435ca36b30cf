use crate::config::Config;

/// Viewport-derived sizes and speeds
///
/// Everything here is a pure function of the viewport height, so a
/// rescale never accumulates error from earlier sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub viewport_height: f32,
    pub sprite_scale: f32,
    pub sprite_width: f32,
    pub sprite_height: f32,
    pub hit_offset: f32,
    pub pickup_width: f32,
    pub pickup_height: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub scroll_velocity: f32,
}

impl Scale {
    pub fn new(viewport_height: f32, config: &Config) -> Self {
        let sprite_scale = config.base_sprite_scale * (viewport_height / config.reference_height);
        Self {
            viewport_height,
            sprite_scale,
            sprite_width: config.sprite_width * sprite_scale,
            sprite_height: config.sprite_height * sprite_scale,
            hit_offset: config.sprite_hit_offset * sprite_scale,
            pickup_width: config.pickup_width * sprite_scale,
            pickup_height: config.pickup_height * sprite_scale,
            gravity: config.gravity * sprite_scale,
            jump_velocity: config.jump_velocity * sprite_scale,
            scroll_velocity: config.scroll_velocity * sprite_scale,
        }
    }

    /// Recompute for a new viewport height
    pub fn rescale(&mut self, viewport_height: f32, config: &Config) {
        *self = Self::new(viewport_height, config);
    }

    /// Size of a sprite's hitbox after trimming the offset
    pub fn hitbox(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.sprite_width - self.hit_offset,
            self.sprite_height - self.hit_offset,
        )
    }
}
