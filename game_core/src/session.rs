//! Game session
//!
//! Owns the world and every resource a run needs, runs the per-frame
//! pipeline and reports to the [`Host`]. One session lives for the whole
//! embedding; restarts reuse it and keep the highscore.

use glam::Vec2;
use hecs::{Entity, World};

use crate::presentation::{score_text, Backdrop};
use crate::systems::*;
use crate::{
    create_player, AssetRegistry, Body, CollectEvent, Config, Events, GameRng, Host, InputEvent,
    InputQueue, Params, Player, RunAction, RunFsm, RunPhase, RunResults, Scale, Scheduler, Score,
    SessionError, Snapshot, Time, Viewport,
};

/// Timers a run schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// One-shot; reschedules itself with a delay that shrinks as the ramp climbs
    SpawnObstacles,
    SpawnPickup,
    RampTick,
}

/// Player start position: horizontally centred, a little above the middle
fn start_position(viewport: Viewport, scale: &Scale) -> Vec2 {
    let center = viewport.center();
    Vec2::new(center.x, center.y - scale.sprite_height / 4.0)
}

pub struct Session {
    pub world: World,
    pub score: Score,
    pub rng: GameRng,
    time: Time,
    config: Config,
    registry: AssetRegistry,
    viewport: Viewport,
    scale: Scale,
    scheduler: Scheduler<Timer>,
    fsm: RunFsm,
    ramp: DifficultyRamp,
    events: Events,
    input: InputQueue,
    backdrop: Backdrop,
    player: Entity,
    active_color: Option<String>,
    /// Label of the obstacle that ended this run
    last_hit: Option<String>,
    /// Label of the obstacle that ended the run before this one
    previous_hit: Option<String>,
    frozen: bool,
    halted: bool,
    torn_down: bool,
    host: Box<dyn Host>,
}

impl Session {
    /// Build a session waiting in Start for the first input
    pub fn new(
        config: Config,
        registry: AssetRegistry,
        viewport: Viewport,
        seed: u64,
        host: Box<dyn Host>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        if !viewport.has_area() {
            return Err(SessionError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let scale = Scale::new(viewport.height, &config);
        let mut world = World::new();
        let player = create_player(&mut world, start_position(viewport, &scale), &scale);
        let ramp = DifficultyRamp::new(&config);

        let mut session = Self {
            world,
            score: Score::new(),
            rng: GameRng::new(seed),
            time: Time::default(),
            config,
            registry,
            viewport,
            scale,
            scheduler: Scheduler::new(),
            fsm: RunFsm::new(),
            ramp,
            events: Events::new(),
            input: InputQueue::new(),
            backdrop: Backdrop::new(),
            player,
            active_color: None,
            last_hit: None,
            previous_hit: None,
            frozen: false,
            halted: false,
            torn_down: false,
            host,
        };

        session.begin_run();
        session.host.on_load();
        log::info!(
            "Session ready: {}x{} viewport, {} colors, {} gradients, {} obstacles",
            viewport.width,
            viewport.height,
            session.registry.color_keys().len(),
            session.registry.gradient_keys().len(),
            session.registry.obstacle_keys().len()
        );

        Ok(session)
    }

    /// Queue input for the next step
    ///
    /// A resize arriving after teardown is applied straight to the viewport
    /// the next run will use.
    pub fn push_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Resize { width, height } if !self.input.is_attached() => {
                let viewport = Viewport::new(width, height);
                if viewport.has_area() {
                    self.viewport = viewport;
                }
            }
            _ => self.input.push(input),
        }
    }

    pub fn jump(&mut self) {
        self.push_input(InputEvent::Jump);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.push_input(InputEvent::Resize { width, height });
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.halted {
            return;
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, Params::MAX_DT)
        } else {
            0.0
        };
        self.time.dt = dt;
        self.time.now += dt;
        self.events.clear();

        // 1. Input
        for input in self.input.pop_inputs() {
            match input {
                InputEvent::Jump => self.handle_jump(),
                InputEvent::Resize { width, height } => self.apply_resize(width, height),
            }
        }

        // 2. Timers
        let deadline = self.scheduler.now() + f64::from(self.time.dt_ms());
        while let Some((_handle, timer)) = self.scheduler.pop_due(deadline) {
            self.fire(timer);
        }
        self.scheduler.settle(deadline);

        // 3. Physics
        move_player(&mut self.world, &self.time, &self.scale);
        scroll_entities(&mut self.world, &self.time);

        // 4. Falling out of view ends the run from any phase
        if self.player_fell_out() {
            self.flush_sounds();
            self.finish_run();
            return;
        }

        // 5. Everything else only runs while playing
        if self.fsm.is_playing() {
            tilt_player(&mut self.world, &self.time);
            despawn_offscreen(&mut self.world, &mut self.events);
            resolve_collisions(
                &mut self.world,
                self.player,
                &self.registry,
                &mut self.score,
                &mut self.events,
            );

            if let Some(hit) = self.events.hit.as_ref().map(|h| h.label.clone()) {
                self.on_fatal_hit(hit);
            }

            let collected = std::mem::take(&mut self.events.collected);
            for event in &collected {
                self.on_collected(event);
            }
            self.events.collected = collected;
        }

        self.flush_sounds();
    }

    /// Back to Start, keeping the highscore
    pub fn restart(&mut self) {
        self.teardown();
        self.begin_run();
    }

    /// Cancel every timer and stop listening for input
    ///
    /// Safe to call any number of times.
    pub fn teardown(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.input.detach();
        if !self.torn_down {
            log::debug!("Teardown cancelled {cancelled} timers");
            self.torn_down = true;
        }
    }

    pub fn results(&self) -> RunResults {
        let color_key = self.active_color.as_deref();
        RunResults::new(
            self.score.score,
            self.score.highscore,
            self.last_hit.clone(),
            color_key,
            color_key.and_then(|key| self.registry.definition(key)),
        )
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.world,
            self.fsm.phase(),
            self.score.score,
            self.score.highscore,
        )
    }

    pub fn phase(&self) -> RunPhase {
        self.fsm.phase()
    }

    /// Current scroll velocity, ramp included
    pub fn scroll_velocity(&self) -> f32 {
        self.ramp.velocity(self.scale.scroll_velocity)
    }

    pub fn ramp_bonus(&self) -> f32 {
        self.ramp.bonus()
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn player_body(&self) -> Option<Body> {
        self.world.get::<&Body>(self.player).ok().map(|body| *body)
    }

    pub fn player_alive(&self) -> bool {
        self.world
            .get::<&Player>(self.player)
            .map(|p| p.alive)
            .unwrap_or(false)
    }

    pub fn active_color(&self) -> Option<&str> {
        self.active_color.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Events from the most recent step
    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn accepts_input(&self) -> bool {
        self.input.is_attached()
    }

    /// Reset everything run-scoped and present the waiting screen
    fn begin_run(&mut self) {
        if self.fsm.phase() != RunPhase::Start {
            self.fsm.transition(RunAction::Restart);
        }

        self.scheduler.cancel_all();
        self.input.detach();
        self.input.attach();

        clear_scrolling(&mut self.world);
        let _ = self.world.despawn(self.player);
        self.scale.rescale(self.viewport.height, &self.config);
        self.player = create_player(
            &mut self.world,
            start_position(self.viewport, &self.scale),
            &self.scale,
        );

        self.score.reset_run();
        self.ramp.reset();
        self.previous_hit = self.last_hit.take();
        self.active_color = None;
        self.frozen = false;
        self.halted = false;
        self.torn_down = false;
        self.events.clear();

        for update in self.backdrop.reset() {
            self.host.present(&update);
        }
    }

    fn handle_jump(&mut self) {
        match self.fsm.phase() {
            RunPhase::Start => self.start_playing(),
            RunPhase::Playing | RunPhase::Ending => {
                jump(&mut self.world, self.player, &self.scale, &mut self.events);
            }
            RunPhase::End => {}
        }
    }

    /// First input: release the player and start the timers
    fn start_playing(&mut self) {
        if !self.fsm.transition(RunAction::FirstInput).success {
            return;
        }

        self.host.present(&score_text(self.score.score));
        let first = self.registry.first_color_key().to_string();
        self.set_current_color(&first);

        if let Ok(mut player) = self.world.get::<&mut Player>(self.player) {
            player.release();
        }
        jump(&mut self.world, self.player, &self.scale, &mut self.events);

        let first_obstacles = f64::from(self.config.obstacle_spawn_ms) * 2.0;
        self.scheduler
            .schedule_once(first_obstacles, Timer::SpawnObstacles);
        self.scheduler.schedule_repeating(
            f64::from(self.config.pickup_spawn_ms),
            Timer::SpawnPickup,
        );
        self.scheduler.schedule_repeating(
            f64::from(self.config.ramp_interval_ms),
            Timer::RampTick,
        );
    }

    fn fire(&mut self, timer: Timer) {
        if !self.fsm.is_playing() {
            return;
        }

        let velocity = self.scroll_velocity();
        let ctx = SpawnContext {
            registry: &self.registry,
            config: &self.config,
            viewport: self.viewport,
            scale: &self.scale,
            velocity,
        };

        match timer {
            Timer::SpawnObstacles => {
                let exclude = if self.score.is_record_run() {
                    self.previous_hit.as_deref()
                } else {
                    None
                };
                spawn_obstacle_cluster(&mut self.world, &ctx, &mut self.rng, exclude);
                let delay = self.config.obstacle_respawn_ms(self.ramp.bonus());
                self.scheduler
                    .schedule_once(f64::from(delay), Timer::SpawnObstacles);
            }
            Timer::SpawnPickup => {
                spawn_pickup(&mut self.world, &ctx, &mut self.rng);
            }
            Timer::RampTick => {
                ramp_up(&mut self.world, &mut self.ramp, self.scale.scroll_velocity);
            }
        }
    }

    fn on_fatal_hit(&mut self, label: String) {
        self.fsm.transition(RunAction::FatalHit);
        self.scheduler.cancel_all();
        self.frozen = true;
        self.last_hit = Some(label);
    }

    fn on_collected(&mut self, event: &CollectEvent) {
        self.host.present(&score_text(self.score.score));
        self.set_current_color(&event.color_key);
        self.host.on_collect(&event.definition);
    }

    fn set_current_color(&mut self, color_key: &str) {
        let Some(definition) = self.registry.definition(color_key) else {
            log::warn!("Unknown color key {color_key}");
            return;
        };

        for update in self.backdrop.recolor(color_key, definition) {
            self.host.present(&update);
        }
        self.active_color = Some(color_key.to_string());
    }

    fn apply_resize(&mut self, width: f32, height: f32) {
        let new = Viewport::new(width, height);
        if !new.has_area() {
            log::warn!("Ignoring resize to {width}x{height}");
            return;
        }

        let old = self.viewport;
        self.scale.rescale(height, &self.config);
        let velocity = (!self.frozen).then(|| self.scroll_velocity());
        reposition_for_resize(&mut self.world, old, new, &self.scale, velocity);
        self.viewport = new;
    }

    fn player_fell_out(&self) -> bool {
        self.fsm.phase() != RunPhase::End
            && self
                .player_body()
                .is_some_and(|body| self.viewport.is_below(body.top()))
    }

    /// End the run: report results once, or go straight back to Start
    fn finish_run(&mut self) {
        self.fsm.transition(RunAction::FellOut);
        self.teardown();
        self.frozen = true;
        freeze_world(&mut self.world);

        let results = self.results();
        log::info!(
            "Run over: score {} (best {}), hit {:?}",
            results.score,
            results.highscore,
            results.emote
        );

        if self.host.reports_results() {
            self.halted = true;
            self.host.on_done(&results);
        } else {
            self.begin_run();
        }
    }

    fn flush_sounds(&mut self) {
        let volume = self.config.sound_volume;
        for sound in self.events.sounds.iter().copied() {
            self.host.play_sound(sound, volume);
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.fsm.phase())
            .field("score", &self.score)
            .field("viewport", &self.viewport)
            .field("ramp_bonus", &self.ramp.bonus())
            .field("pending_timers", &self.scheduler.len())
            .field("entities", &self.world.len())
            .finish()
    }
}
