//! Emission scheduler: owns the configuration, the live confetti and the pool,
//! and advances them once per host frame.

use crate::curves::FadeOut;
use crate::emitter::{per_ms, per_ms2, EmissionConfig, Jitter};
use crate::events::{ConfettiEvent, EventBus};
use crate::particle::{Confetto, ConfettoParams};
use crate::pool::ConfettoPool;
use crate::rand::ParticleRng;
use crate::shape::Surface;
use crate::source::ConfettiSource;
use crate::view::{TouchEvent, TouchPhase, Viewport};
use confetti_core::Rect;

/// Supplies freshly shaped, unconfigured confetti when the pool runs dry
pub trait ConfettoGenerator {
    fn generate(&mut self, rng: &mut ParticleRng) -> Confetto;
}

impl<F> ConfettoGenerator for F
where
    F: FnMut(&mut ParticleRng) -> Confetto,
{
    fn generate(&mut self, rng: &mut ParticleRng) -> Confetto {
        self(rng)
    }
}

/// Result of one [`ConfettiManager::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Terminated,
}

/// Allocation and throughput counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfettiStats {
    /// Confetti ever built by the generator
    pub constructed: usize,
    /// Spawns, including those served from the pool
    pub spawned: usize,
    /// Confetti returned to the pool
    pub recycled: usize,
    pub peak_live: usize,
    pub live: usize,
    pub pooled: usize,
}

pub struct ConfettiManager<V: Viewport> {
    generator: Box<dyn ConfettoGenerator>,
    source: ConfettiSource,
    view: V,
    rng: ParticleRng,

    /// Edited by the setters
    config: EmissionConfig,
    /// Snapshot taken by `start`; the running session only reads this
    active: EmissionConfig,
    bound: Rect,

    live: Vec<Confetto>,
    scratch: Vec<Confetto>,
    pool: ConfettoPool,

    running: bool,
    session: u64,
    last_emission: Option<f64>,
    last_elapsed: u64,

    events: EventBus,
    spawned: usize,
    recycled: usize,
    peak_live: usize,
}

impl<V: Viewport> ConfettiManager<V> {
    pub fn new(view: V, generator: impl ConfettoGenerator + 'static, source: ConfettiSource) -> Self {
        Self {
            generator: Box::new(generator),
            source,
            view,
            rng: ParticleRng::from_entropy(),
            config: EmissionConfig::default(),
            active: EmissionConfig::default(),
            bound: Rect::default(),
            live: Vec::new(),
            scratch: Vec::new(),
            pool: ConfettoPool::new(),
            running: false,
            session: 0,
            last_emission: None,
            last_elapsed: 0,
            events: EventBus::new(),
            spawned: 0,
            recycled: 0,
            peak_live: 0,
        }
    }

    /// Replace the random source, e.g. with a seeded one for reproducible runs
    pub fn with_rng(mut self, rng: ParticleRng) -> Self {
        self.rng = rng;
        self
    }

    // ── Configuration (per-second inputs, applied at the next `start`) ──

    pub fn set_config(&mut self, config: EmissionConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EmissionConfig {
        &self.config
    }

    pub fn set_source(&mut self, source: ConfettiSource) -> &mut Self {
        self.source = source;
        self
    }

    pub fn set_num_initial(&mut self, count: usize) -> &mut Self {
        self.config.num_initial = count;
        self
    }

    /// Milliseconds to keep emitting after `start`; see [`crate::INFINITE_DURATION`]
    pub fn set_emission_duration(&mut self, duration_ms: u64) -> &mut Self {
        self.config.emission_duration = duration_ms;
        self
    }

    /// Confetti per second. Negative rates emit nothing.
    pub fn set_emission_rate(&mut self, per_second: f32) -> &mut Self {
        self.config.emission_rate = f64::from(per_second.max(0.0)) / 1000.0;
        self
    }

    pub fn set_velocity_x(&mut self, velocity: f32, deviation: f32) -> &mut Self {
        self.config.x.velocity = Jitter::new(per_ms(velocity), per_ms(deviation));
        self
    }

    pub fn set_velocity_y(&mut self, velocity: f32, deviation: f32) -> &mut Self {
        self.config.y.velocity = Jitter::new(per_ms(velocity), per_ms(deviation));
        self
    }

    pub fn set_acceleration_x(&mut self, acceleration: f32, deviation: f32) -> &mut Self {
        self.config.x.acceleration = Jitter::new(per_ms2(acceleration), per_ms2(deviation));
        self
    }

    pub fn set_acceleration_y(&mut self, acceleration: f32, deviation: f32) -> &mut Self {
        self.config.y.acceleration = Jitter::new(per_ms2(acceleration), per_ms2(deviation));
        self
    }

    pub fn set_target_velocity_x(&mut self, velocity: f32, deviation: f32) -> &mut Self {
        self.config.x.target_velocity = Some(Jitter::new(per_ms(velocity), per_ms(deviation)));
        self
    }

    pub fn set_target_velocity_y(&mut self, velocity: f32, deviation: f32) -> &mut Self {
        self.config.y.target_velocity = Some(Jitter::new(per_ms(velocity), per_ms(deviation)));
        self
    }

    /// Degrees
    pub fn set_initial_rotation(&mut self, rotation: f32, deviation: f32) -> &mut Self {
        self.config.initial_rotation = Jitter::new(rotation, deviation);
        self
    }

    /// Degrees per second
    pub fn set_rotational_velocity(&mut self, velocity: f32, deviation: f32) -> &mut Self {
        self.config.rotation.velocity = Jitter::new(per_ms(velocity), per_ms(deviation));
        self
    }

    /// Degrees per second²
    pub fn set_rotational_acceleration(&mut self, acceleration: f32, deviation: f32) -> &mut Self {
        self.config.rotation.acceleration = Jitter::new(per_ms2(acceleration), per_ms2(deviation));
        self
    }

    pub fn set_target_rotational_velocity(&mut self, velocity: f32, deviation: f32) -> &mut Self {
        self.config.rotation.target_velocity = Some(Jitter::new(per_ms(velocity), per_ms(deviation)));
        self
    }

    /// Negative means confetti live until they leave the bound
    pub fn set_ttl(&mut self, ttl_ms: i64) -> &mut Self {
        self.config.ttl = EmissionConfig::ttl_from_signed(ttl_ms);
        self
    }

    pub fn set_bound(&mut self, bound: Rect) -> &mut Self {
        self.config.bound = Some(bound);
        self
    }

    pub fn enable_fade_out(&mut self, curve: FadeOut) -> &mut Self {
        self.config.fade_out = Some(curve);
        self
    }

    pub fn disable_fade_out(&mut self) -> &mut Self {
        self.config.fade_out = None;
        self
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.touch_enabled = enabled;
        self
    }

    // ── Lifecycle ──

    /// Begin a new session, cancelling any running one.
    ///
    /// Live confetti go back to the pool, the configuration is snapshotted and
    /// the initial burst spawns immediately with no delay.
    pub fn start(&mut self) -> &mut Self {
        if self.running {
            log::debug!("confetti: restarting session {}", self.session);
        }
        self.session += 1;
        self.running = true;
        self.active = self.config.clone();
        self.last_emission = None;
        self.last_elapsed = 0;

        for confetto in self.live.drain(..) {
            self.pool.recycle(confetto);
            self.recycled += 1;
        }

        if !self.view.is_attached() {
            self.view.attach();
        }
        self.bound = match self.active.bound {
            Some(bound) => bound,
            None => self.view.bounds(),
        };

        self.events.push(ConfettiEvent::AnimationStarted { session: self.session });
        self.spawn(self.active.num_initial, 0);
        log::debug!(
            "confetti: session {} started with {} confetti ({} pooled)",
            self.session,
            self.live.len(),
            self.pool.len()
        );
        self
    }

    /// Advance the session to `elapsed` ms since `start`.
    ///
    /// Elapsed time that runs backwards is clamped to the previous tick.
    pub fn tick(&mut self, elapsed: u64) -> AnimationState {
        if !self.running {
            return AnimationState::Terminated;
        }
        let elapsed = elapsed.max(self.last_elapsed);
        self.last_elapsed = elapsed;

        let duration = self.active.emission_duration;
        if elapsed < duration {
            self.emit(elapsed);
        }

        let session = self.session;
        for confetto in self.live.iter_mut() {
            let outcome = confetto.apply_update(elapsed, &self.bound);
            if outcome.entered {
                self.events.push(ConfettiEvent::ConfettoEntered { session });
            }
            if let Some(reason) = outcome.exited {
                self.events.push(ConfettiEvent::ConfettoExited { session, reason });
            }
        }
        self.reclaim_terminated();

        if self.live.is_empty() && elapsed >= duration {
            self.terminate();
            return AnimationState::Terminated;
        }
        self.view.request_redraw(&self.live);
        AnimationState::Running
    }

    /// Stop the session and detach the view. Does nothing when not running.
    ///
    /// Live and pooled confetti are dropped.
    pub fn terminate(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.live.clear();
        self.scratch.clear();
        self.pool.clear();
        self.view.detach();
        self.events.push(ConfettiEvent::AnimationEnded { session: self.session });
        log::debug!(
            "confetti: session {} ended at {} ms ({} spawned, {} constructed)",
            self.session,
            self.last_elapsed,
            self.spawned,
            self.pool.constructed()
        );
    }

    fn emit(&mut self, elapsed: u64) {
        let Some(last) = self.last_emission else {
            // The initial burst already covers t = 0
            self.last_emission = Some(elapsed as f64);
            return;
        };
        let rate = self.active.emission_rate;
        if rate <= 0.0 {
            return;
        }
        let delta = elapsed as f64 - last;
        let count = (self.rng.next_f64() * rate * delta).floor();
        if count >= 1.0 {
            self.spawn(count as usize, elapsed);
            self.last_emission = Some(last + count / rate);
            log::trace!("confetti: emitted {count} at {elapsed} ms");
        }
    }

    fn spawn(&mut self, count: usize, delay: u64) {
        for _ in 0..count {
            let generator = &mut self.generator;
            let rng = &mut self.rng;
            let mut confetto = self.pool.acquire_or(|| generator.generate(rng));
            let params = draw_params(&self.active, &self.source, &mut self.rng, delay);
            confetto.configure(&params, &self.bound);
            self.live.push(confetto);
        }
        self.spawned += count;
        self.peak_live = self.peak_live.max(self.live.len());
    }

    /// Move terminated confetti into the pool, keeping draw order of the rest
    fn reclaim_terminated(&mut self) {
        if !self.live.iter().any(Confetto::is_terminated) {
            return;
        }
        self.scratch.clear();
        for confetto in self.live.drain(..) {
            if confetto.is_terminated() {
                self.pool.recycle(confetto);
                self.recycled += 1;
            } else {
                self.scratch.push(confetto);
            }
        }
        std::mem::swap(&mut self.live, &mut self.scratch);
    }

    /// Route a pointer event to the held confetto, or to the topmost one under
    /// a touch-down. Returns whether a confetto handled it.
    pub fn on_touch(&mut self, event: TouchEvent) -> bool {
        if !self.running || !self.active.touch_enabled {
            return false;
        }
        let point = event.point();
        let held = self.live.iter().position(Confetto::is_dragging);
        let handled = match (event.phase, held) {
            (TouchPhase::Down, Some(_)) => false,
            (TouchPhase::Down, None) => self
                .live
                .iter_mut()
                .rev()
                .any(|c| c.on_touch_down(point, event.time_ms)),
            (TouchPhase::Move, Some(index)) => {
                self.live[index].on_touch_move(point, event.time_ms);
                true
            }
            (TouchPhase::Up | TouchPhase::Cancel, Some(index)) => {
                self.live[index].on_touch_up(point, event.time_ms);
                true
            }
            (_, None) => false,
        };
        if handled {
            self.view.request_redraw(&self.live);
        }
        handled
    }

    /// Paint every visible confetto in spawn order
    pub fn draw(&self, surface: &mut dyn Surface) {
        for confetto in &self.live {
            confetto.draw(surface);
        }
    }

    // ── Queries ──

    /// Read-only view of the live collection
    pub fn confetti(&self) -> &[Confetto] {
        &self.live
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Effective clip bound of the current session
    pub fn bound(&self) -> Rect {
        self.bound
    }

    pub fn drain_events(&mut self) -> Vec<ConfettiEvent> {
        self.events.drain()
    }

    /// Events waiting for `drain_events`
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Cap on undrained events; 0 turns event recording off
    pub fn set_event_capacity(&mut self, capacity: usize) -> &mut Self {
        self.events.set_capacity(capacity);
        self
    }

    pub fn stats(&self) -> ConfettiStats {
        ConfettiStats {
            constructed: self.pool.constructed(),
            spawned: self.spawned,
            recycled: self.recycled,
            peak_live: self.peak_live,
            live: self.live.len(),
            pooled: self.pool.len(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

/// Fresh jitter draws for one spawn
fn draw_params(
    config: &EmissionConfig,
    source: &ConfettiSource,
    rng: &mut ParticleRng,
    delay: u64,
) -> ConfettoParams {
    let (initial_x, initial_y) = source.sample(rng);
    ConfettoParams {
        spawn_delay: delay,
        initial_x,
        initial_y,
        velocity_x: config.x.velocity.sample(rng),
        velocity_y: config.y.velocity.sample(rng),
        acceleration_x: config.x.acceleration.sample(rng),
        acceleration_y: config.y.acceleration.sample(rng),
        target_velocity_x: config.x.target_velocity.map(|j| j.sample(rng)),
        target_velocity_y: config.y.target_velocity.map(|j| j.sample(rng)),
        initial_rotation: config.initial_rotation.sample(rng),
        rotational_velocity: config.rotation.velocity.sample(rng),
        rotational_acceleration: config.rotation.acceleration.sample(rng),
        target_rotational_velocity: config.rotation.target_velocity.map(|j| j.sample(rng)),
        ttl: config.ttl,
        fade_out: config.fade_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ExitReason;
    use crate::shape::ConfettoShape;
    use confetti_core::Color;

    #[derive(Default)]
    struct TestView {
        attached: bool,
        attaches: u32,
        redraws: u32,
    }

    impl Viewport for TestView {
        fn bounds(&self) -> Rect {
            Rect::from_size(400.0, 400.0)
        }

        fn is_attached(&self) -> bool {
            self.attached
        }

        fn attach(&mut self) {
            self.attached = true;
            self.attaches += 1;
        }

        fn detach(&mut self) {
            self.attached = false;
        }

        fn request_redraw(&mut self, _confetti: &[Confetto]) {
            self.redraws += 1;
        }
    }

    fn manager(source: ConfettiSource) -> ConfettiManager<TestView> {
        let generator = |_: &mut ParticleRng| Confetto::new(ConfettoShape::circle(Color::WHITE, 5.0));
        ConfettiManager::new(TestView::default(), generator, source).with_rng(ParticleRng::new(7))
    }

    #[test]
    fn setters_rescale_to_milliseconds() {
        let mut m = manager(ConfettiSource::point(0.0, 0.0));
        m.set_emission_rate(50.0)
            .set_velocity_y(100.0, 50.0)
            .set_acceleration_y(2000.0, 0.0)
            .set_rotational_velocity(360.0, 0.0)
            .set_ttl(-1);
        let config = m.config();
        assert!((config.emission_rate - 0.05).abs() < 1e-9);
        assert_eq!(config.y.velocity, Jitter::new(0.1, 0.05));
        assert!((config.y.acceleration.base - 0.002).abs() < 1e-9);
        assert!((config.rotation.velocity.base - 0.36).abs() < 1e-6);
        assert_eq!(config.ttl, None);
    }

    #[test]
    fn start_attaches_and_spawns_initial_burst() {
        let mut m = manager(ConfettiSource::point(200.0, 200.0));
        m.set_num_initial(10);
        m.start();
        assert!(m.is_running());
        assert!(m.view().is_attached());
        assert_eq!(m.confetti().len(), 10);
        assert!(m.confetti().iter().all(|c| c.spawn_delay() == 0));
        assert_eq!(m.bound(), Rect::from_size(400.0, 400.0));
        assert_eq!(m.drain_events(), vec![ConfettiEvent::AnimationStarted { session: 1 }]);
    }

    #[test]
    fn terminate_is_noop_when_idle() {
        let mut m = manager(ConfettiSource::point(0.0, 0.0));
        m.terminate();
        assert!(m.drain_events().is_empty());
        assert_eq!(m.tick(16), AnimationState::Terminated);
    }

    #[test]
    fn terminate_detaches_and_drops_confetti() {
        let mut m = manager(ConfettiSource::point(200.0, 200.0));
        m.set_num_initial(5).set_emission_duration(10_000);
        m.start();
        m.tick(16);
        m.terminate();
        assert!(!m.is_running());
        assert!(!m.view().is_attached());
        assert!(m.confetti().is_empty());
        assert_eq!(m.stats().pooled, 0);
        let events = m.drain_events();
        assert_eq!(events.last(), Some(&ConfettiEvent::AnimationEnded { session: 1 }));
    }

    #[test]
    fn restart_reclaims_live_into_pool() {
        let mut m = manager(ConfettiSource::point(200.0, 200.0));
        m.set_num_initial(8).set_emission_duration(10_000).set_acceleration_y(0.0, 0.0);
        m.start();
        m.tick(16);
        m.start();
        let stats = m.stats();
        assert_eq!(m.session(), 2);
        assert_eq!(stats.constructed, 8);
        assert_eq!(stats.live, 8);
        assert_eq!(stats.pooled, 0);
        assert_eq!(m.view().attaches, 1);
    }

    #[test]
    fn enter_and_exit_events() {
        let mut m = manager(ConfettiSource::point(200.0, 200.0));
        m.set_num_initial(3).set_ttl(100).set_acceleration_y(0.0, 0.0);
        m.start();
        m.drain_events();

        assert_eq!(m.tick(0), AnimationState::Running);
        let entered = m
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ConfettiEvent::ConfettoEntered { .. }))
            .count();
        assert_eq!(entered, 3);

        assert_eq!(m.tick(100), AnimationState::Terminated);
        let events = m.drain_events();
        let exited = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ConfettiEvent::ConfettoExited {
                        reason: ExitReason::Expired,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(exited, 3);
        assert_eq!(events.last(), Some(&ConfettiEvent::AnimationEnded { session: 1 }));
    }

    #[test]
    fn zero_rate_only_emits_initial_burst() {
        let mut m = manager(ConfettiSource::point(200.0, 200.0));
        m.set_num_initial(2).set_emission_duration(500).set_acceleration_y(0.0, 0.0);
        m.start();
        // Stationary confetti never leave, so the session outlives the duration
        for t in (0..=1000).step_by(16) {
            assert_eq!(m.tick(t), AnimationState::Running);
        }
        assert_eq!(m.stats().spawned, 2);
    }

    #[test]
    fn first_tick_only_anchors_emission() {
        let mut m = manager(ConfettiSource::point(200.0, 200.0));
        m.set_num_initial(5)
            .set_emission_rate(1000.0)
            .set_emission_duration(10_000)
            .set_acceleration_y(0.0, 0.0);
        m.start();

        // A late first frame must not back-fill 500 ms of emission
        assert_eq!(m.tick(500), AnimationState::Running);
        assert_eq!(m.stats().spawned, 5);

        for t in (516..=1000).step_by(16) {
            m.tick(t);
        }
        assert!(m.stats().spawned > 5);
        assert!(m.confetti().iter().skip(5).all(|c| c.spawn_delay() >= 516));
    }

    #[test]
    fn undrained_events_stay_bounded() {
        let mut m = manager(ConfettiSource::point(200.0, 200.0));
        m.set_emission_rate(300.0)
            .set_emission_duration(crate::INFINITE_DURATION)
            .set_ttl(200)
            .set_acceleration_y(0.0, 0.0);
        m.start();
        for t in (0..60_000).step_by(16) {
            assert_eq!(m.tick(t), AnimationState::Running);
        }
        let stats = m.stats();
        assert!(stats.spawned > 10_000);
        assert!(stats.constructed < 200);
        assert_eq!(m.pending_events(), crate::DEFAULT_EVENT_CAPACITY);

        m.set_event_capacity(0);
        assert_eq!(m.pending_events(), 0);
        m.tick(60_000);
        assert_eq!(m.pending_events(), 0);
    }

    #[test]
    fn touch_drags_topmost_confetto() {
        let mut m = manager(ConfettiSource::point(100.0, 100.0));
        m.set_num_initial(2)
            .set_emission_duration(10_000)
            .set_acceleration_y(0.0, 0.0)
            .set_touch_enabled(true);
        m.start();
        m.tick(0);

        let down = TouchEvent::new(TouchPhase::Down, 104.0, 104.0, 0);
        assert!(m.on_touch(down));
        assert!(m.confetti()[1].is_dragging());
        assert!(!m.confetti()[0].is_dragging());
        // A second finger does not steal the drag
        assert!(!m.on_touch(down));

        assert!(m.on_touch(TouchEvent::new(TouchPhase::Move, 154.0, 104.0, 50)));
        assert_eq!(m.confetti()[1].position().x, 150.0);
        assert!(m.on_touch(TouchEvent::new(TouchPhase::Up, 154.0, 104.0, 60)));
        assert!(!m.confetti()[1].is_dragging());
        assert!(!m.on_touch(TouchEvent::new(TouchPhase::Move, 0.0, 0.0, 70)));
    }

    #[test]
    fn touch_ignored_when_disabled() {
        let mut m = manager(ConfettiSource::point(100.0, 100.0));
        m.set_num_initial(1).set_emission_duration(10_000);
        m.start();
        m.tick(0);
        assert!(!m.on_touch(TouchEvent::new(TouchPhase::Down, 104.0, 104.0, 0)));
    }
}
