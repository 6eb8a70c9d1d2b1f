//! Closed-form motion along one axis with an optional terminal velocity
//!
//! All quantities are per millisecond: velocity in units/ms, acceleration in
//! units/ms². Rotation uses the same evaluator with degrees as the unit.

/// Time (ms) at which `velocity` reaches `target` under `acceleration`.
///
/// `None` when there is no target, when acceleration is zero, or when the
/// target lies behind the direction of acceleration. Such a target is never
/// reached and motion stays uniformly accelerated forever.
pub fn time_to_reach_target(velocity: f32, acceleration: f32, target: Option<f32>) -> Option<f32> {
    let target = target?;
    if acceleration == 0.0 {
        return None;
    }
    let t = (target - velocity) / acceleration;
    if t.is_finite() && t >= 0.0 {
        Some(t)
    } else {
        None
    }
}

/// Position at `t` ms given the initial value, velocity, acceleration and
/// optional (time-to-target, target-velocity) pair.
pub fn compute_distance(
    t: f32,
    initial: f32,
    velocity: f32,
    acceleration: f32,
    time_to_target: Option<f32>,
    target: Option<f32>,
) -> f32 {
    match (time_to_target, target) {
        (Some(tt), Some(vt)) if t >= tt => {
            initial + velocity * tt + 0.5 * acceleration * tt * tt + vt * (t - tt)
        }
        _ => initial + velocity * t + 0.5 * acceleration * t * t,
    }
}

/// One axis of a confetto's motion. The time to reach the target velocity is
/// derived once on construction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisMotion {
    pub initial: f32,
    pub velocity: f32,
    pub acceleration: f32,
    pub target_velocity: Option<f32>,
    time_to_target: Option<f32>,
}

impl AxisMotion {
    pub fn new(initial: f32, velocity: f32, acceleration: f32, target_velocity: Option<f32>) -> Self {
        Self {
            initial,
            velocity,
            acceleration,
            target_velocity,
            time_to_target: time_to_reach_target(velocity, acceleration, target_velocity),
        }
    }

    /// Motion with no acceleration and no target
    pub fn stationary(initial: f32) -> Self {
        Self::new(initial, 0.0, 0.0, None)
    }

    pub fn time_to_target(&self) -> Option<f32> {
        self.time_to_target
    }

    pub fn position_at(&self, t: f32) -> f32 {
        compute_distance(
            t,
            self.initial,
            self.velocity,
            self.acceleration,
            self.time_to_target,
            self.target_velocity,
        )
    }

    pub fn velocity_at(&self, t: f32) -> f32 {
        match (self.time_to_target, self.target_velocity) {
            (Some(tt), Some(vt)) if t >= tt => vt,
            _ => self.velocity + self.acceleration * t,
        }
    }

    /// Same acceleration and target, restarted from `initial` at `velocity`
    pub fn rebased(&self, initial: f32, velocity: f32) -> Self {
        Self::new(initial, velocity, self.acceleration, self.target_velocity)
    }

    /// First time (ms) at which this motion crosses `min` while moving toward
    /// negative values, or `max` while moving toward positive values.
    ///
    /// Crossing a bound while moving inward does not count. `None` when the
    /// motion never leaves `[min, max]`.
    pub fn bound_exit_time(&self, min: f32, max: f32) -> Option<f32> {
        let tt = self.time_to_target;
        let in_accel_phase = |t: f32| tt.map_or(true, |tt| t < tt);

        let accel_exit = self
            .accelerated_crossings(min, false)
            .into_iter()
            .chain(self.accelerated_crossings(max, true))
            .flatten()
            .filter(|&t| in_accel_phase(t))
            .reduce(f32::min);
        if accel_exit.is_some() {
            return accel_exit;
        }

        let (tt, vt) = (tt?, self.target_velocity?);
        let at_target = self.position_at(tt);
        let remaining = if vt > 0.0 {
            (max - at_target) / vt
        } else if vt < 0.0 {
            (min - at_target) / vt
        } else {
            return None;
        };
        Some(tt + remaining.max(0.0))
    }

    /// Non-negative times at which uniformly accelerated motion passes `bound`
    /// heading outward (positive for the upper bound, negative for the lower).
    fn accelerated_crossings(&self, bound: f32, upper: bool) -> [Option<f32>; 2] {
        let (x0, v0, a) = (self.initial, self.velocity, self.acceleration);
        let outward = |t: f32| {
            let v = v0 + a * t;
            if upper {
                v > 0.0
            } else {
                v < 0.0
            }
        };
        let keep = |t: f32| (t.is_finite() && t >= 0.0 && outward(t)).then_some(t);

        if a == 0.0 {
            if v0 == 0.0 {
                return [None, None];
            }
            return [keep((bound - x0) / v0), None];
        }

        let disc = v0 * v0 - 2.0 * a * (x0 - bound);
        if disc < 0.0 {
            return [None, None];
        }
        let sq = disc.sqrt();
        [keep((-v0 + sq) / a), keep((-v0 - sq) / a)]
    }
}
