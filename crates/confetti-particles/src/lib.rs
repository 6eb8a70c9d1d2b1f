//! Confetti Particles - pooled 2D confetti emission engine
//!
//! Provides a frame-driven confetti animation with:
//! - Closed-form per-axis kinematics with an optional terminal velocity
//! - Randomized emission from a point or line source at a throttled rate
//! - A recycling pool so infinite streams stop allocating once warmed up
//! - TTL/bound termination, fade-out and touch dragging
//!
//! The host owns the frame loop: call [`ConfettiManager::start`], then
//! [`ConfettiManager::tick`] with the elapsed milliseconds until it reports
//! [`AnimationState::Terminated`].

pub mod clock;
pub mod curves;
pub mod emitter;
pub mod events;
pub mod kinematics;
pub mod manager;
pub mod particle;
pub mod pool;
pub mod presets;
pub mod rand;
pub mod shape;
pub mod source;
pub mod view;

pub use clock::AnimationClock;
pub use curves::FadeOut;
pub use emitter::{AxisConfig, EmissionConfig, Jitter, INFINITE_DURATION};
pub use events::{ConfettiEvent, EventBus, DEFAULT_EVENT_CAPACITY};
pub use kinematics::AxisMotion;
pub use manager::{AnimationState, ConfettiManager, ConfettiStats, ConfettoGenerator};
pub use particle::{Confetto, ConfettoParams, ExitReason, UpdateOutcome};
pub use pool::ConfettoPool;
pub use presets::CommonConfetti;
pub use self::rand::ParticleRng;
pub use shape::{ConfettoShape, Paint, Shimmer, Surface};
pub use source::ConfettiSource;
pub use view::{ConfettiView, Container, TouchEvent, TouchPhase, Viewport};
