//! Emission configuration (builder values or TOML) in per-millisecond units

use crate::curves::FadeOut;
use crate::rand::ParticleRng;
use confetti_core::{ConfettiError, Rect, Result};
use std::path::Path;

/// Emission duration that never runs out
pub const INFINITE_DURATION: u64 = u64::MAX;

/// Default downward pull in px/s²
pub const DEFAULT_ACCELERATION_Y: f32 = 120.0;

/// Converts a per-second value to per-millisecond
pub(crate) fn per_ms(per_second: f32) -> f32 {
    per_second / 1000.0
}

/// Converts a per-second² value to per-millisecond²
pub(crate) fn per_ms2(per_second_sq: f32) -> f32 {
    per_second_sq / 1_000_000.0
}

/// A base value with symmetric uniform deviation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Jitter {
    pub base: f32,
    pub deviation: f32,
}

impl Jitter {
    pub const fn new(base: f32, deviation: f32) -> Self {
        Self { base, deviation }
    }

    pub const fn fixed(base: f32) -> Self {
        Self::new(base, 0.0)
    }

    pub fn sample(&self, rng: &mut ParticleRng) -> f32 {
        rng.jitter(self.base, self.deviation)
    }

    fn scaled(&self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.base), f(self.deviation))
    }
}

/// Per-axis motion parameters: velocity, acceleration and optional terminal velocity
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisConfig {
    pub velocity: Jitter,
    pub acceleration: Jitter,
    /// Absent means the axis accelerates forever
    pub target_velocity: Option<Jitter>,
}

/// Everything one emission session needs. Stored in per-millisecond units;
/// the `from_toml` path and the manager's setters take per-second values.
#[derive(Debug, Clone)]
pub struct EmissionConfig {
    pub num_initial: usize,
    /// Milliseconds of emission after start, or [`INFINITE_DURATION`]
    pub emission_duration: u64,
    /// Confetti per millisecond
    pub emission_rate: f64,
    pub x: AxisConfig,
    pub y: AxisConfig,
    /// Initial angle in degrees
    pub initial_rotation: Jitter,
    /// Rotation in degrees/ms and degrees/ms²
    pub rotation: AxisConfig,
    /// Lifetime after a confetto starts; `None` lives until it leaves the bound
    pub ttl: Option<u64>,
    /// Clip bound; `None` uses the viewport bounds
    pub bound: Option<Rect>,
    pub fade_out: Option<FadeOut>,
    pub touch_enabled: bool,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            num_initial: 0,
            emission_duration: 0,
            emission_rate: 0.0,
            x: AxisConfig::default(),
            y: AxisConfig {
                acceleration: Jitter::fixed(per_ms2(DEFAULT_ACCELERATION_Y)),
                ..AxisConfig::default()
            },
            initial_rotation: Jitter::default(),
            rotation: AxisConfig::default(),
            ttl: None,
            bound: None,
            fade_out: None,
            touch_enabled: false,
        }
    }
}

impl EmissionConfig {
    /// Signed TTL: negative means unbounded
    pub fn ttl_from_signed(ttl: i64) -> Option<u64> {
        u64::try_from(ttl).ok()
    }

    /// Reject values the scheduler cannot do anything sensible with
    pub fn validate(&self) -> Result<()> {
        if !self.emission_rate.is_finite() || self.emission_rate < 0.0 {
            return Err(ConfettiError::ValueOutOfRange {
                field: "emission_rate".into(),
                min: 0.0,
                max: f64::MAX,
                value: self.emission_rate * 1000.0,
            });
        }
        if let Some(bound) = self.bound {
            if bound.is_inverted() {
                return Err(ConfettiError::InvalidConfig(format!(
                    "bound {bound:?} has right < left or bottom < top"
                )));
            }
        }
        Ok(())
    }

    /// Read and parse an emission config file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Parse and validate a TOML document holding the emission keys at the top level
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(source)?;
        let config = Self::from_toml(&table)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an EmissionConfig from a TOML table. Missing keys keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = table.get("num_initial") {
            let n = toml_int(v, "num_initial")?;
            config.num_initial = usize::try_from(n).map_err(|_| ConfettiError::ValueOutOfRange {
                field: "num_initial".into(),
                min: 0.0,
                max: usize::MAX as f64,
                value: n as f64,
            })?;
        }
        if let Some(v) = table.get("emission_duration_ms") {
            config.emission_duration = match v.as_str() {
                Some("infinite") => INFINITE_DURATION,
                _ => toml_int(v, "emission_duration_ms")?.max(0) as u64,
            };
        }
        if let Some(v) = table.get("emission_rate") {
            config.emission_rate = toml_f32(v, "emission_rate")? as f64 / 1000.0;
        }

        let parse_axis = |prefix: &str, axis: &mut AxisConfig| -> Result<()> {
            if let Some(v) = table.get(&format!("velocity_{prefix}")) {
                axis.velocity = toml_jitter(v, "velocity")?.scaled(per_ms);
            }
            if let Some(v) = table.get(&format!("acceleration_{prefix}")) {
                axis.acceleration = toml_jitter(v, "acceleration")?.scaled(per_ms2);
            }
            if let Some(v) = table.get(&format!("target_velocity_{prefix}")) {
                axis.target_velocity = Some(toml_jitter(v, "target_velocity")?.scaled(per_ms));
            }
            Ok(())
        };
        parse_axis("x", &mut config.x)?;
        parse_axis("y", &mut config.y)?;

        if let Some(v) = table.get("initial_rotation") {
            config.initial_rotation = toml_jitter(v, "initial_rotation")?;
        }
        if let Some(v) = table.get("rotational_velocity") {
            config.rotation.velocity = toml_jitter(v, "rotational_velocity")?.scaled(per_ms);
        }
        if let Some(v) = table.get("rotational_acceleration") {
            config.rotation.acceleration =
                toml_jitter(v, "rotational_acceleration")?.scaled(per_ms2);
        }
        if let Some(v) = table.get("target_rotational_velocity") {
            config.rotation.target_velocity =
                Some(toml_jitter(v, "target_rotational_velocity")?.scaled(per_ms));
        }

        if let Some(v) = table.get("ttl_ms") {
            config.ttl = Self::ttl_from_signed(toml_int(v, "ttl_ms")?);
        }
        if let Some(v) = table.get("bound") {
            let [left, top, right, bottom] = toml_array::<4>(v, "bound")?;
            config.bound = Some(Rect::new(left, top, right, bottom));
        }
        if let Some(v) = table.get("fade_out") {
            config.fade_out = match v {
                toml::Value::Boolean(true) => Some(FadeOut::default()),
                toml::Value::Boolean(false) => None,
                toml::Value::String(name) => Some(FadeOut::from_name(name).ok_or_else(|| {
                    ConfettiError::InvalidConfig(format!("unknown fade_out curve '{name}'"))
                })?),
                _ => return Err(type_error("fade_out", "bool or string")),
            };
        }
        if let Some(v) = table.get("touch_enabled") {
            config.touch_enabled = v.as_bool().ok_or_else(|| type_error("touch_enabled", "bool"))?;
        }

        Ok(config)
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn type_error(field: &str, expected: &str) -> ConfettiError {
    ConfettiError::InvalidFieldType {
        field: field.to_string(),
        expected: expected.to_string(),
    }
}

fn toml_f32(v: &toml::Value, field: &str) -> Result<f32> {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .ok_or_else(|| type_error(field, "number"))
}

fn toml_int(v: &toml::Value, field: &str) -> Result<i64> {
    v.as_integer().ok_or_else(|| type_error(field, "integer"))
}

fn toml_array<const N: usize>(v: &toml::Value, field: &str) -> Result<[f32; N]> {
    let arr = v
        .as_array()
        .filter(|arr| arr.len() == N)
        .ok_or_else(|| type_error(field, &format!("array of {N} numbers")))?;
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(arr) {
        *slot = toml_f32(item, field)?;
    }
    Ok(out)
}

/// `x` means `x ± 0`; `[x, d]` means `x ± d`
fn toml_jitter(v: &toml::Value, field: &str) -> Result<Jitter> {
    if v.is_array() {
        let [base, deviation] = toml_array::<2>(v, field)?;
        Ok(Jitter::new(base, deviation))
    } else {
        Ok(Jitter::fixed(toml_f32(v, field)?))
    }
}
