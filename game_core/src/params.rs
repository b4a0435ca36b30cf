/// Game tuning parameters for Flappy Glitch
///
/// Pixel values are in source-art units at the reference display height;
/// the scale adapter converts them to viewport pixels.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Display
    pub const REFERENCE_HEIGHT: f32 = 600.0;
    pub const BASE_SPRITE_SCALE: f32 = 0.5;
    pub const SPAWN_ROWS: u32 = 10;

    // Sprites
    pub const SPRITE_WIDTH: f32 = 120.0;
    pub const SPRITE_HEIGHT: f32 = 120.0;
    pub const SPRITE_HIT_OFFSET: f32 = 24.0; // Trimmed off the hitbox, split across both sides
    pub const PICKUP_WIDTH: f32 = 40.0;
    pub const PICKUP_HEIGHT: f32 = 40.0;

    // Physics (pixels per second at scale 1.0)
    pub const GRAVITY: f32 = 2200.0;
    pub const JUMP_VELOCITY: f32 = -740.0;
    pub const SCROLL_VELOCITY: f32 = -400.0;

    // Tilt
    pub const JUMP_TILT: f32 = -20.0; // degrees
    pub const JUMP_TILT_MS: f32 = 100.0;
    pub const MAX_TILT: f32 = 20.0;
    pub const TILT_PER_FRAME: f32 = 1.0;

    // Idle hover before the first input
    pub const IDLE_BOB_MS: f32 = 450.0;

    // Timers (milliseconds)
    pub const OBSTACLE_SPAWN_MS: f32 = 1500.0;
    pub const PICKUP_SPAWN_MS: f32 = 1000.0;
    pub const RAMP_INTERVAL_MS: f32 = 2000.0;
    pub const MIN_OBSTACLE_DELAY_MS: f32 = 100.0; // Respawn delay floor at the ramp cap

    // Difficulty ramp (pixels per second, not scaled)
    pub const RAMP_STEP: f32 = 8.0;
    pub const RAMP_MAX: f32 = 350.0;

    // Score
    pub const SOLID_POINTS: u64 = 50;
    pub const GRADIENT_POINTS: u64 = 100;
    pub const SOLID_PICKUP_CHANCE: f64 = 0.75;

    // Audio
    pub const MUSIC_VOLUME: f32 = 1.0;
    pub const SOUND_VOLUME: f32 = 0.7;

    // Presentation
    pub const DEFAULT_BACKGROUND: &'static str = "#000";
    pub const BACKGROUND_LAYERS: usize = 2;

    // Frame stepping
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
}
