use rand::Rng;

use crate::assets::ColorDefinition;
use crate::host::Sound;

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Delta time for this step (seconds)
    pub now: f32, // Total elapsed time (seconds)
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }

    pub fn dt_ms(&self) -> f32 {
        self.dt * 1000.0
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            now: 0.0,
        }
    }
}

/// Score tracking for the current run
///
/// The highscore survives restarts; the score does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub score: u64,
    pub highscore: u64,
    /// Highscore as it stood when the current run started
    pub previous_best: u64,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award points, raising the highscore if it is beaten
    pub fn add(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        if self.score > self.highscore {
            self.highscore = self.score;
        }
    }

    /// Whether the current run has beaten every earlier run
    pub fn is_record_run(&self) -> bool {
        self.score > self.previous_best
    }

    /// Start a new run, keeping the highscore
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.previous_best = self.highscore;
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    /// Uniform integer in `0..=max`
    pub fn up_to(&mut self, max: u32) -> u32 {
        self.0.gen_range(0..=max)
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// A pickup collected by the player this frame
#[derive(Debug, Clone, PartialEq)]
pub struct CollectEvent {
    pub color_key: String,
    pub points: u64,
    pub definition: ColorDefinition,
}

/// The obstacle that ended the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitEvent {
    pub label: String,
}

/// Events that occurred during this frame
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub jumped: bool,
    pub collected: Vec<CollectEvent>,
    pub hit: Option<HitEvent>,
    pub pickups_blocked: u32,
    pub despawned: u32,
    pub sounds: Vec<Sound>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.jumped = false;
        self.collected.clear();
        self.hit = None;
        self.pickups_blocked = 0;
        self.despawned = 0;
        self.sounds.clear();
    }
}

/// Input delivered by the host between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Space bar, click or tap
    Jump,
    /// The viewport changed size
    Resize { width: f32, height: f32 },
}

/// Input queue, drained once per tick
#[derive(Debug, Clone)]
pub struct InputQueue {
    pub inputs: Vec<InputEvent>,
    attached: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            inputs: Vec::new(),
            attached: true,
        }
    }

    /// Queue an input; ignored while detached
    pub fn push(&mut self, input: InputEvent) {
        if self.attached {
            self.inputs.push(input);
        }
    }

    pub fn pop_inputs(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.inputs)
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Stop accepting input and drop anything pending
    pub fn detach(&mut self) {
        self.attached = false;
        self.inputs.clear();
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
