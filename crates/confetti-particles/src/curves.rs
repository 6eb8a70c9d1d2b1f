//! Fade-out alpha curves and the shimmer wave

/// Maps animation progress in [0, 1] to an alpha multiplier in [0, 1].
///
/// Progress 0 is the moment the confetto starts moving; 1 is its TTL or, with
/// no TTL, the moment its motion leaves the clip bound.
#[derive(Clone, Copy, Debug)]
pub enum FadeOut {
    /// Fully opaque until `start`, then a linear ramp down to transparent
    Tail { start: f32 },
    /// `1 - progress`
    Linear,
    /// Caller-supplied curve
    Custom(fn(f32) -> f32),
}

impl FadeOut {
    pub const DEFAULT_TAIL_START: f32 = 0.9;

    pub fn alpha(&self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        let a = match *self {
            FadeOut::Tail { start } => {
                if t >= start && start < 1.0 {
                    1.0 - (t - start) / (1.0 - start)
                } else {
                    1.0
                }
            }
            FadeOut::Linear => 1.0 - t,
            FadeOut::Custom(f) => f(t),
        };
        a.clamp(0.0, 1.0)
    }

    /// Parse a curve name as used in config files
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tail" | "default" => Some(Self::default()),
            "linear" => Some(FadeOut::Linear),
            _ => None,
        }
    }
}

impl Default for FadeOut {
    fn default() -> Self {
        FadeOut::Tail {
            start: Self::DEFAULT_TAIL_START,
        }
    }
}

/// Triangle wave in [0, 1] with period `wavelength`: rises for the first half, falls for the second
pub fn triangle_wave(time: u64, wavelength: u64) -> f32 {
    if wavelength < 2 {
        return 0.0;
    }
    let half = wavelength / 2;
    let fraction = time % wavelength;
    if fraction < half {
        fraction as f32 / half as f32
    } else {
        (wavelength - fraction) as f32 / half as f32
    }
}
