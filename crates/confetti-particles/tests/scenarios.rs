//! End-to-end runs of the scheduler against a recording viewport

use confetti_core::{Bitmap, Color, Rect};
use confetti_particles::{
    AnimationState, ConfettiEvent, ConfettiManager, ConfettiSource, Confetto, ConfettoParams,
    ConfettoShape, ExitReason, Paint, ParticleRng, Surface, Viewport, INFINITE_DURATION,
};
use glam::{Affine2, Vec2};
use proptest::prelude::*;

const WIDTH: f32 = 400.0;
const HEIGHT: f32 = 400.0;

#[derive(Default)]
struct RecordingView {
    attached: bool,
    redraws: usize,
    last_frame_len: usize,
}

impl Viewport for RecordingView {
    fn bounds(&self) -> Rect {
        Rect::from_size(WIDTH, HEIGHT)
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
        self.last_frame_len = 0;
    }

    fn request_redraw(&mut self, confetti: &[Confetto]) {
        self.redraws += 1;
        self.last_frame_len = confetti.len();
    }
}

#[derive(Default)]
struct CountingSurface {
    circles: usize,
}

impl Surface for CountingSurface {
    fn draw_bitmap(&mut self, _bitmap: &Bitmap, _transform: Affine2, _paint: &Paint) {}

    fn draw_circle(&mut self, _center: Vec2, _radius: f32, _paint: &Paint) {
        self.circles += 1;
    }
}

fn manager(source: ConfettiSource, seed: u64) -> ConfettiManager<RecordingView> {
    let generator = |_: &mut ParticleRng| Confetto::new(ConfettoShape::circle(Color::WHITE, 4.0));
    ConfettiManager::new(RecordingView::default(), generator, source).with_rng(ParticleRng::new(seed))
}

fn top_edge() -> ConfettiSource {
    ConfettiSource::line(0.0, 0.0, WIDTH, 0.0)
}

/// Tick in `step` ms increments until terminated or `limit` is passed.
/// Returns the elapsed time of the terminating tick.
fn run(m: &mut ConfettiManager<RecordingView>, step: u64, limit: u64) -> Option<u64> {
    let mut t = 0;
    while t <= limit {
        if m.tick(t) == AnimationState::Terminated {
            return Some(t);
        }
        t += step;
    }
    None
}

#[test]
fn one_shot_burst_drains_then_terminates() {
    let mut m = manager(top_edge(), 1);
    m.set_num_initial(100).set_emission_duration(0);
    m.start();
    assert_eq!(m.confetti().len(), 100);

    assert_eq!(m.tick(0), AnimationState::Running);
    assert!(m.view().attached);

    // 400 px under 120 px/s² takes about 2.6 s
    let end = run(&mut m, 16, 10_000).expect("burst should fall out of view");
    assert!(end > 2000);
    assert!(!m.view().attached);
    assert_eq!(m.stats().spawned, 100);
    assert_eq!(m.stats().constructed, 100);
}

#[test]
fn stream_terminates_only_after_duration_and_drain() {
    let mut m = manager(top_edge(), 2);
    m.set_num_initial(0)
        .set_emission_duration(3000)
        .set_emission_rate(100.0)
        .set_velocity_y(400.0, 0.0);
    m.start();

    let mut t = 0;
    loop {
        let state = m.tick(t);
        if t < 3000 {
            assert_eq!(state, AnimationState::Running, "terminated early at {t} ms");
        }
        if state == AnimationState::Terminated {
            assert!(m.confetti().is_empty());
            break;
        }
        t += 16;
        assert!(t < 10_000, "stream never drained");
    }
    assert!(t >= 3000);
    assert!(m.stats().spawned > 200);
}

#[test]
fn point_source_spawns_exactly_at_point() {
    let mut m = manager(ConfettiSource::point(50.0, 50.0), 3);
    m.set_num_initial(50)
        .set_emission_duration(1000)
        .set_emission_rate(200.0)
        .set_velocity_x(0.0, 300.0)
        .set_velocity_y(0.0, 300.0);
    m.start();
    for c in m.confetti() {
        let (x, y, _) = c.motion();
        assert_eq!((x.initial, y.initial), (50.0, 50.0));
    }

    for t in (0..1000).step_by(16) {
        m.tick(t);
        for c in m.confetti().iter().filter(|c| c.spawn_delay() == t) {
            let (x, y, _) = c.motion();
            assert_eq!((x.initial, y.initial), (50.0, 50.0));
        }
    }
}

#[test]
fn ttl_expires_on_first_tick_past_it() {
    let mut m = manager(ConfettiSource::point(200.0, 200.0), 4);
    m.set_num_initial(1)
        .set_emission_duration(0)
        .set_acceleration_y(0.0, 0.0)
        .set_ttl(500);
    m.start();
    m.drain_events();

    for t in (0..500).step_by(16) {
        assert_eq!(m.tick(t), AnimationState::Running);
    }
    // 496 was the last tick before 500
    assert_eq!(m.tick(512), AnimationState::Terminated);
    let events = m.drain_events();
    assert!(events.contains(&ConfettiEvent::ConfettoExited {
        session: 1,
        reason: ExitReason::Expired,
    }));
}

#[test]
fn pool_never_allocates_while_stocked() {
    let mut m = manager(top_edge(), 5);
    m.set_num_initial(0)
        .set_emission_duration(INFINITE_DURATION)
        .set_emission_rate(300.0)
        .set_ttl(200);
    m.start();

    let mut before = m.stats();
    for t in (0..5000).step_by(16) {
        assert_eq!(m.tick(t), AnimationState::Running);
        let after = m.stats();

        // Every instance is either live or pooled, never both
        assert_eq!(after.constructed, after.live + after.pooled);

        let spawned = after.spawned - before.spawned;
        let built = after.constructed - before.constructed;
        assert!(built <= spawned.saturating_sub(before.pooled));
        before = after;
    }

    let stats = m.stats();
    assert!(stats.spawned > 1000);
    // Steady state reuses a small working set
    assert!(stats.constructed < stats.spawned / 5);
    assert!(stats.constructed >= stats.peak_live);
}

#[test]
fn emission_count_tracks_rate_times_duration() {
    let rate_per_second = 50.0;
    let duration = 20_000;
    let expected = rate_per_second / 1000.0 * duration as f64;

    for (seed, step) in [(10, 1), (11, 1), (12, 4), (13, 16), (14, 16)] {
        let mut m = manager(ConfettiSource::point(200.0, 200.0), seed);
        m.set_num_initial(0)
            .set_emission_duration(duration)
            .set_emission_rate(rate_per_second as f32)
            .set_ttl(10);
        m.start();
        for t in (0..duration).step_by(step) {
            m.tick(t);
        }
        let spawned = m.stats().spawned as f64;
        assert!(
            spawned >= expected * 0.9 && spawned <= expected * 1.01,
            "seed {seed} step {step}: spawned {spawned}, expected about {expected}"
        );
    }
}

#[test]
fn live_confetti_have_started_and_redraws_are_lent() {
    let mut m = manager(top_edge(), 6);
    m.set_num_initial(10)
        .set_emission_duration(2000)
        .set_emission_rate(100.0);
    m.start();
    for t in (0..2000).step_by(16) {
        m.tick(t);
        assert!(m.confetti().iter().all(|c| c.has_started() && !c.is_terminated()));
        assert_eq!(m.view().last_frame_len, m.confetti().len());

        let mut surface = CountingSurface::default();
        m.draw(&mut surface);
        assert_eq!(surface.circles, m.confetti().len());
    }
    assert!(m.view().redraws > 100);
}

#[test]
fn restart_mid_run_resets_session() {
    let mut m = manager(ConfettiSource::point(200.0, 200.0), 7);
    m.set_num_initial(20)
        .set_emission_duration(5000)
        .set_acceleration_y(0.0, 0.0);
    m.start();
    m.tick(0);
    m.tick(100);

    m.set_num_initial(5);
    m.start();
    assert_eq!(m.session(), 2);
    assert_eq!(m.confetti().len(), 5);
    assert_eq!(m.stats().pooled, 15);
    assert_eq!(m.stats().constructed, 20);
    assert!(m.confetti().iter().all(|c| !c.has_started()));

    // The new session's first tick does not emit on top of the initial burst
    m.tick(0);
    assert_eq!(m.stats().spawned, 25);

    let starts = m
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, ConfettiEvent::AnimationStarted { .. }))
        .count();
    assert_eq!(starts, 2);
}

proptest! {
    #[test]
    fn start_and_termination_are_one_way(
        delay in 0u64..2000,
        ttl in proptest::option::of(0u64..1500),
        velocity in -0.5f32..0.5,
        mut times in proptest::collection::vec(0u64..5000, 1..60),
    ) {
        times.sort_unstable();
        let bound = Rect::from_size(WIDTH, HEIGHT);
        let mut c = Confetto::new(ConfettoShape::circle(Color::BLACK, 3.0));
        c.configure(
            &ConfettoParams {
                spawn_delay: delay,
                initial_x: 200.0,
                initial_y: 200.0,
                velocity_x: velocity,
                ttl,
                ..Default::default()
            },
            &bound,
        );

        let mut was_terminated = false;
        for t in times {
            c.apply_update(t, &bound);
            prop_assert_eq!(c.has_started(), t >= delay);
            if was_terminated {
                prop_assert!(c.is_terminated());
            }
            was_terminated = c.is_terminated();
        }
    }
}
