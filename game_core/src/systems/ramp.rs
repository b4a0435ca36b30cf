use hecs::World;

use crate::systems::set_scroll_velocity;
use crate::Config;

/// Scroll speed that grows over a run
///
/// `bonus` is subtracted from the base scroll velocity; it is not scaled
/// with the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyRamp {
    bonus: f32,
    step: f32,
    max: f32,
}

impl DifficultyRamp {
    pub fn new(config: &Config) -> Self {
        Self {
            bonus: 0.0,
            step: config.ramp_step,
            max: config.ramp_max,
        }
    }

    pub fn bonus(&self) -> f32 {
        self.bonus
    }

    pub fn is_maxed(&self) -> bool {
        self.bonus >= self.max
    }

    /// Raise the bonus by one step, clamped to the maximum
    pub fn tick(&mut self) -> f32 {
        self.bonus = (self.bonus + self.step).min(self.max);
        self.bonus
    }

    pub fn reset(&mut self) {
        self.bonus = 0.0;
    }

    /// Scroll velocity for a scaled base velocity
    pub fn velocity(&self, base: f32) -> f32 {
        base - self.bonus
    }
}

/// Tick the ramp and push the new velocity to everything scrolling
pub fn ramp_up(world: &mut World, ramp: &mut DifficultyRamp, base_velocity: f32) -> f32 {
    ramp.tick();
    let velocity = ramp.velocity(base_velocity);
    set_scroll_velocity(world, velocity);
    log::debug!("Ramp at {}, scroll velocity now {velocity}", ramp.bonus());
    velocity
}
