use std::cell::RefCell;
use std::rc::Rc;

use game_core::*;
use glam::Vec2;

#[derive(Debug, Default)]
struct Recorded {
    loads: u32,
    collected: Vec<ColorDefinition>,
    done: Vec<RunResults>,
    sounds: Vec<Sound>,
    updates: Vec<PresentationUpdate>,
}

/// Host that writes every callback into a shared log
struct RecordingHost(Rc<RefCell<Recorded>>);

impl Host for RecordingHost {
    fn on_load(&mut self) {
        self.0.borrow_mut().loads += 1;
    }

    fn on_collect(&mut self, definition: &ColorDefinition) {
        self.0.borrow_mut().collected.push(definition.clone());
    }

    fn on_done(&mut self, results: &RunResults) {
        self.0.borrow_mut().done.push(results.clone());
    }

    fn play_sound(&mut self, sound: Sound, _volume: f32) {
        self.0.borrow_mut().sounds.push(sound);
    }

    fn present(&mut self, update: &PresentationUpdate) {
        self.0.borrow_mut().updates.push(update.clone());
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn registry() -> AssetRegistry {
    AssetRegistry::load_definitions(
        vec![
            ("purple".into(), ColorDefinition::solid("#9146ff", "#ffffff")),
            ("mint".into(), ColorDefinition::solid("#00f593", "#000000")),
        ],
        vec![ColorDefinition::gradient(
            Some("dusk"),
            &["#ff0000", "#0000ff"],
            "#ffffff",
        )],
        vec![
            ("Kappa".into(), "emotes/kappa.png".into()),
            ("PogChamp".into(), "emotes/pogchamp.png".into()),
        ],
        (40, 40),
    )
    .unwrap()
}

fn setup() -> (Session, Rc<RefCell<Recorded>>) {
    init_logging();
    let log = Rc::new(RefCell::new(Recorded::default()));
    let session = Session::new(
        Config::new(),
        registry(),
        Viewport::new(800.0, 600.0),
        12345,
        Box::new(RecordingHost(log.clone())),
    )
    .unwrap();
    (session, log)
}

/// Start a run and return with the player in flight
fn start(session: &mut Session) {
    session.jump();
    session.step(0.0);
    assert_eq!(session.phase(), RunPhase::Playing);
}

/// Drop an obstacle right on top of the player
fn place_obstacle_on_player(session: &mut Session, label: &str) -> hecs::Entity {
    let pos = session.player_body().unwrap().pos;
    let velocity = session.scroll_velocity();
    let scale = *session.scale();
    create_obstacle(&mut session.world, label, pos, velocity, &scale)
}

fn run_until_end(session: &mut Session) {
    for _ in 0..400 {
        if session.phase() == RunPhase::End {
            return;
        }
        session.step(0.05);
    }
    panic!("run never ended");
}

#[test]
fn test_load_presents_waiting_screen() {
    let (session, log) = setup();
    let log = log.borrow();

    assert_eq!(session.phase(), RunPhase::Start);
    assert_eq!(log.loads, 1);
    assert_eq!(
        log.updates,
        vec![
            PresentationUpdate::ClearBackgrounds { css: "#000".into() },
            PresentationUpdate::ScoreText(None),
            PresentationUpdate::ClearColorText,
        ]
    );
}

#[test]
fn test_first_input_jumps_with_scaled_velocity() {
    let (mut session, log) = setup();
    start(&mut session);

    let body = session.player_body().unwrap();
    assert_eq!(body.vel.y, Params::JUMP_VELOCITY * 0.5);

    let log = log.borrow();
    assert_eq!(log.sounds, vec![Sound::Jump]);
    assert!(log
        .updates
        .contains(&PresentationUpdate::ScoreText(Some("0".into()))));
    assert!(log.updates.contains(&PresentationUpdate::ColorText {
        text: "purple".into(),
        font_color: Some("#ffffff".into()),
    }));
}

#[test]
fn test_collect_updates_score_highscore_and_host() {
    let (mut session, log) = setup();
    start(&mut session);
    session.score.score = 450;
    session.score.highscore = 500;

    let pos = session.player_body().unwrap().pos;
    let scale = *session.scale();
    create_pickup(
        &mut session.world,
        Pickup {
            color_key: "_gradient-dusk".into(),
            points: 100,
            tier: PickupTier::Gradient,
        },
        pos,
        0.0,
        &scale,
    );
    session.step(0.0);

    assert_eq!(session.score.score, 550);
    assert_eq!(session.score.highscore, 550);
    assert_eq!(session.active_color(), Some("_gradient-dusk"));

    let log = log.borrow();
    assert_eq!(log.collected.len(), 1);
    assert_eq!(
        log.collected[0].color,
        ColorValue::Gradient(vec!["#ff0000".into(), "#0000ff".into()])
    );
    assert!(log.sounds.contains(&Sound::Pickup));
    assert!(log
        .updates
        .contains(&PresentationUpdate::ScoreText(Some("550".into()))));
}

#[test]
fn test_obstacle_hit_freezes_world_and_ends_run_once() {
    let (mut session, log) = setup();
    start(&mut session);

    // Let the pickup timer fire so there is something scrolling
    for _ in 0..25 {
        session.jump();
        session.step(0.05);
    }
    place_obstacle_on_player(&mut session, "PogChamp");
    session.step(0.0);

    assert_eq!(session.phase(), RunPhase::Ending);
    assert!(!session.player_alive());
    assert_eq!(session.pending_timers(), 0);
    for (_e, (_, body)) in session.world.query::<(&Obstacle, &Body)>().iter() {
        assert_eq!(body.vel.x, 0.0);
    }
    for (_e, (_, body)) in session.world.query::<(&Pickup, &Body)>().iter() {
        assert_eq!(body.vel.x, 0.0);
    }

    // Jumps no longer do anything; the player falls out
    session.jump();
    run_until_end(&mut session);

    assert!(session.is_halted());
    assert!(!session.accepts_input());

    // Further steps and teardowns never report again
    session.step(0.05);
    session.teardown();
    session.teardown();

    let log = log.borrow();
    assert_eq!(log.done.len(), 1);
    let results = &log.done[0];
    assert_eq!(results.emote.as_deref(), Some("PogChamp"));
    assert_eq!(results.color.name.as_deref(), Some("purple"));
    assert_eq!(results.color.font_color.as_deref(), Some("#ffffff"));
    assert_eq!(
        results.color.value,
        Some(ColorValue::Solid("#9146ff".into()))
    );
    assert_eq!(log.sounds.iter().filter(|s| **s == Sound::Hit).count(), 1);
}

#[test]
fn test_falling_out_without_hit_reports_no_emote() {
    let (mut session, log) = setup();
    start(&mut session);
    run_until_end(&mut session);

    let log = log.borrow();
    assert_eq!(log.done.len(), 1);
    assert_eq!(log.done[0].emote, None);
    assert_eq!(log.done[0].score, 0);
}

#[test]
fn test_scrolled_off_entities_never_score() {
    let (mut session, _log) = setup();
    start(&mut session);
    let scale = *session.scale();

    // Right edge already past the left side of the viewport
    let gone = create_pickup(
        &mut session.world,
        Pickup {
            color_key: "purple".into(),
            points: 50,
            tier: PickupTier::Solid,
        },
        Vec2::new(-scale.pickup_width, 300.0),
        -200.0,
        &scale,
    );
    session.step(0.016);

    assert!(!session.world.contains(gone));
    assert_eq!(session.score.score, 0);
}

#[test]
fn test_highscore_survives_restart() {
    let (mut session, log) = setup();
    start(&mut session);
    session.score.add(300);
    run_until_end(&mut session);
    assert_eq!(log.borrow().done[0].highscore, 300);

    session.restart();
    assert_eq!(session.phase(), RunPhase::Start);
    assert_eq!(session.score.score, 0);
    assert_eq!(session.score.highscore, 300);
    assert!(session.accepts_input());
    assert_eq!(session.snapshot().obstacles.len(), 0);

    start(&mut session);
    assert_eq!(session.pending_timers(), 3);
}

#[test]
fn test_restart_mid_run_cancels_timers() {
    let (mut session, _log) = setup();
    start(&mut session);
    for _ in 0..10 {
        session.step(0.05);
    }
    assert!(session.pending_timers() > 0);

    session.restart();

    assert_eq!(session.pending_timers(), 0);
    assert_eq!(session.ramp_bonus(), 0.0);
    assert_eq!(session.phase(), RunPhase::Start);
}

#[test]
fn test_ramp_speeds_up_scrolling() {
    let (mut session, _log) = setup();
    start(&mut session);
    let base = session.scroll_velocity();

    let mut elapsed = 0;
    while elapsed < 4_000 {
        if session.player_body().unwrap().pos.y > 300.0 {
            session.jump();
        }
        session.step(0.05);
        elapsed += 50;
        // Keep the lane clear so the run survives
        let obstacles: Vec<_> = session
            .world
            .query::<&Obstacle>()
            .iter()
            .map(|(e, _)| e)
            .collect();
        for entity in obstacles {
            let _ = session.world.despawn(entity);
        }
    }

    assert_eq!(session.phase(), RunPhase::Playing);
    assert_eq!(session.ramp_bonus(), 2.0 * Params::RAMP_STEP);
    assert_eq!(session.scroll_velocity(), base - 16.0);
}

#[test]
fn test_resize_rescales_run() {
    let (mut session, _log) = setup();
    start(&mut session);
    let y = session.player_body().unwrap().pos.y;

    session.resize(1200.0, 900.0);
    session.step(0.0);

    let body = session.player_body().unwrap();
    assert_eq!(body.pos.x, 600.0);
    assert!((body.pos.y - y * 1.5).abs() < 1e-3);
    assert_eq!(session.scale().sprite_scale, 0.75);
    assert_eq!(session.scroll_velocity(), -300.0);
}

#[test]
fn test_same_seed_same_run() {
    fn play(seed: u64) -> Snapshot {
        let mut session = Session::new(
            Config::new(),
            registry(),
            Viewport::new(800.0, 600.0),
            seed,
            Box::new(NullHost),
        )
        .unwrap();
        session.jump();
        for i in 0..80 {
            if i % 6 == 0 {
                session.jump();
            }
            session.step(0.05);
        }
        session.snapshot()
    }

    assert_eq!(play(99), play(99));
}
