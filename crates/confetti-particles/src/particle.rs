//! Confetto: one pooled particle with closed-form motion

use crate::curves::FadeOut;
use crate::kinematics::AxisMotion;
use crate::shape::{ConfettoShape, Paint, Surface};
use confetti_core::Rect;
use glam::{Affine2, Vec2};

/// Why a confetto stopped animating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Lived for its full TTL
    Expired,
    /// Left the clip bound
    OutOfBounds,
}

/// Transitions observed during one [`Confetto::apply_update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Became visible this update
    pub entered: bool,
    /// Terminated this update
    pub exited: Option<ExitReason>,
}

/// Values for one (re)configuration of a confetto.
///
/// Times in milliseconds, rates per millisecond, rotation in degrees.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfettoParams {
    /// Emission time at which the confetto starts moving
    pub spawn_delay: u64,
    pub initial_x: f32,
    pub initial_y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub acceleration_x: f32,
    pub acceleration_y: f32,
    pub target_velocity_x: Option<f32>,
    pub target_velocity_y: Option<f32>,
    pub initial_rotation: f32,
    pub rotational_velocity: f32,
    pub rotational_acceleration: f32,
    pub target_rotational_velocity: Option<f32>,
    pub ttl: Option<u64>,
    pub fade_out: Option<FadeOut>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    /// Pointer position relative to the confetto's top-left corner
    offset: Vec2,
    last: Vec2,
    last_time: u64,
    velocity: Vec2,
}

#[derive(Debug, Clone)]
pub struct Confetto {
    shape: ConfettoShape,
    paint: Paint,

    start_time: u64,
    /// Time the current motion began; moves forward when a drag is released
    motion_origin: u64,
    x: AxisMotion,
    y: AxisMotion,
    rotation: AxisMotion,
    ttl: Option<u64>,
    fade_out: Option<FadeOut>,
    /// Denominator for fade progress: TTL or bound exit, whichever is sooner
    fade_lifetime: Option<f32>,

    current_x: f32,
    current_y: f32,
    current_rotation: f32,
    alpha: f32,
    started: bool,
    terminated: bool,
    exit_reason: Option<ExitReason>,

    drag: Option<Drag>,
    rebase_pending: bool,
    last_motion_time: f32,
}

impl Confetto {
    /// A fresh, unconfigured confetto
    pub fn new(shape: ConfettoShape) -> Self {
        let mut paint = Paint::default();
        shape.configure_paint(&mut paint);
        Self {
            shape,
            paint,
            start_time: 0,
            motion_origin: 0,
            x: AxisMotion::default(),
            y: AxisMotion::default(),
            rotation: AxisMotion::default(),
            ttl: None,
            fade_out: None,
            fade_lifetime: None,
            current_x: 0.0,
            current_y: 0.0,
            current_rotation: 0.0,
            alpha: 1.0,
            started: false,
            terminated: false,
            exit_reason: None,
            drag: None,
            rebase_pending: false,
            last_motion_time: 0.0,
        }
    }

    /// Overwrite every configured and transient field for a new spawn.
    ///
    /// Target-velocity reach times and the fade lifetime are derived here,
    /// never per frame.
    pub fn configure(&mut self, params: &ConfettoParams, bound: &Rect) {
        self.start_time = params.spawn_delay;
        self.motion_origin = params.spawn_delay;
        self.x = AxisMotion::new(
            params.initial_x,
            params.velocity_x,
            params.acceleration_x,
            params.target_velocity_x,
        );
        self.y = AxisMotion::new(
            params.initial_y,
            params.velocity_y,
            params.acceleration_y,
            params.target_velocity_y,
        );
        self.rotation = AxisMotion::new(
            params.initial_rotation,
            params.rotational_velocity,
            params.rotational_acceleration,
            params.target_rotational_velocity,
        );
        self.ttl = params.ttl;
        self.fade_out = params.fade_out;
        self.fade_lifetime = match params.fade_out {
            Some(_) => {
                let exit_x = self.x.bound_exit_time(bound.left, bound.right);
                let exit_y = self.y.bound_exit_time(bound.top, bound.bottom);
                [params.ttl.map(|ttl| ttl as f32), exit_x, exit_y]
                    .into_iter()
                    .flatten()
                    .reduce(f32::min)
            }
            None => None,
        };

        self.current_x = params.initial_x;
        self.current_y = params.initial_y;
        self.current_rotation = params.initial_rotation;
        self.alpha = 1.0;
        self.started = false;
        self.terminated = false;
        self.exit_reason = None;
        self.drag = None;
        self.rebase_pending = false;
        self.last_motion_time = 0.0;

        self.shape.configure_paint(&mut self.paint);
    }

    /// Advance to `elapsed` ms since the emission started.
    ///
    /// Termination is one-way: once terminated the confetto ignores further updates.
    pub fn apply_update(&mut self, elapsed: u64, bound: &Rect) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        if self.terminated || elapsed < self.start_time {
            return outcome;
        }
        outcome.entered = !self.started;
        self.started = true;

        if self.drag.is_some() {
            return outcome;
        }
        if self.rebase_pending {
            self.motion_origin = elapsed;
            self.rebase_pending = false;
        }

        let t = elapsed.saturating_sub(self.motion_origin) as f32;
        self.last_motion_time = t;
        self.current_x = self.x.position_at(t);
        self.current_y = self.y.position_at(t);
        self.current_rotation = self.rotation.position_at(t);

        let age = elapsed - self.start_time;
        if let (Some(fade), Some(lifetime)) = (self.fade_out, self.fade_lifetime) {
            let progress = if lifetime > 0.0 { age as f32 / lifetime } else { 1.0 };
            self.alpha = fade.alpha(progress);
        }

        let reason = if self.ttl.is_some_and(|ttl| age >= ttl) {
            Some(ExitReason::Expired)
        } else if !bound.contains(self.current_x, self.current_y) {
            Some(ExitReason::OutOfBounds)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.terminated = true;
            self.exit_reason = Some(reason);
            outcome.exited = Some(reason);
        }
        outcome
    }

    /// Render through `surface` when started and not yet terminated
    pub fn draw(&self, surface: &mut dyn Surface) {
        if !self.is_visible() {
            return;
        }
        let paint = Paint {
            alpha: self.paint.alpha * self.alpha,
            ..self.paint
        };
        self.shape.draw(
            surface,
            Affine2::IDENTITY,
            &paint,
            self.current_x,
            self.current_y,
            self.current_rotation,
        );
    }

    /// Whether (`x`, `y`) lands on this confetto's drawn box
    pub fn hit_test(&self, x: f32, y: f32) -> bool {
        if !self.is_visible() {
            return false;
        }
        let (w, h) = self.shape.measure();
        x >= self.current_x && x <= self.current_x + w && y >= self.current_y && y <= self.current_y + h
    }

    /// Claim a touch-down. A held confetto follows the pointer and cannot terminate.
    pub fn on_touch_down(&mut self, point: Vec2, time: u64) -> bool {
        if !self.hit_test(point.x, point.y) {
            return false;
        }
        self.drag = Some(Drag {
            offset: point - Vec2::new(self.current_x, self.current_y),
            last: point,
            last_time: time,
            velocity: Vec2::ZERO,
        });
        true
    }

    pub fn on_touch_move(&mut self, point: Vec2, time: u64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let dt = time.saturating_sub(drag.last_time);
        if dt > 0 {
            drag.velocity = (point - drag.last) / dt as f32;
        }
        drag.last = point;
        drag.last_time = time;
        let top_left = point - drag.offset;
        self.current_x = top_left.x;
        self.current_y = top_left.y;
    }

    /// Release: motion resumes from the release point at the last measured
    /// pointer velocity, re-anchored on the next update.
    pub fn on_touch_up(&mut self, point: Vec2, time: u64) {
        self.on_touch_move(point, time);
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.x = self.x.rebased(self.current_x, drag.velocity.x);
        self.y = self.y.rebased(self.current_y, drag.velocity.y);
        let spin = self.rotation.velocity_at(self.last_motion_time);
        self.rotation = self.rotation.rebased(self.current_rotation, spin);
        self.rebase_pending = true;
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn is_visible(&self) -> bool {
        self.started && !self.terminated
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit_reason
    }

    pub fn spawn_delay(&self) -> u64 {
        self.start_time
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.current_x, self.current_y)
    }

    pub fn rotation(&self) -> f32 {
        self.current_rotation
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn shape(&self) -> &ConfettoShape {
        &self.shape
    }

    pub fn motion(&self) -> (&AxisMotion, &AxisMotion, &AxisMotion) {
        (&self.x, &self.y, &self.rotation)
    }
}
