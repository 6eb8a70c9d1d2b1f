//! Ready-made raining and explosion animations

use crate::curves::FadeOut;
use crate::emitter::INFINITE_DURATION;
use crate::manager::{ConfettiManager, ConfettoGenerator};
use crate::particle::Confetto;
use crate::rand::ParticleRng;
use crate::shape::ConfettoShape;
use crate::source::ConfettiSource;
use crate::view::Viewport;
use confetti_core::{Bitmap, ConfettiError, Rect, Result};
use std::sync::Arc;

/// Edge length of preset confetti bitmaps, px
pub const DEFAULT_CONFETTI_SIZE: f32 = 12.0;
/// px/s
pub const DEFAULT_VELOCITY_SLOW: f32 = 50.0;
pub const DEFAULT_VELOCITY_NORMAL: f32 = 100.0;
pub const DEFAULT_VELOCITY_FAST: f32 = 200.0;
pub const DEFAULT_EXPLOSION_RADIUS: f32 = 100.0;

const ONE_SHOT_COUNT: usize = 100;
const STREAM_RATE: f32 = 50.0;

/// A [`ConfettiManager`] preconfigured for one of the common animations.
/// Pick how to run it with [`Self::one_shot`], [`Self::stream`] or [`Self::infinite`].
pub struct CommonConfetti<V: Viewport> {
    manager: ConfettiManager<V>,
}

impl<V: Viewport> CommonConfetti<V> {
    /// Confetti falling from just above the top edge of the viewport
    pub fn raining(view: V, bitmaps: Vec<Arc<Bitmap>>) -> Result<Self> {
        let width = view.bounds().width();
        let source = ConfettiSource::line(0.0, -DEFAULT_CONFETTI_SIZE, width, -DEFAULT_CONFETTI_SIZE);
        Self::raining_from(view, source, bitmaps)
    }

    /// Confetti falling from a custom source
    pub fn raining_from(view: V, source: ConfettiSource, bitmaps: Vec<Arc<Bitmap>>) -> Result<Self> {
        Ok(Self::raining_with(view, source, bitmap_generator(bitmaps)?))
    }

    /// Raining motion for confetti built by any generator
    pub fn raining_with(
        view: V,
        source: ConfettiSource,
        generator: impl ConfettoGenerator + 'static,
    ) -> Self {
        // Confetti spawn above the top edge, so let the bound reach past the viewport
        let bound = view.bounds().outset(DEFAULT_CONFETTI_SIZE);
        let mut manager = ConfettiManager::new(view, generator, source);
        manager
            .set_bound(bound)
            .set_velocity_x(0.0, DEFAULT_VELOCITY_SLOW)
            .set_velocity_y(DEFAULT_VELOCITY_NORMAL, DEFAULT_VELOCITY_SLOW)
            .set_initial_rotation(180.0, 180.0)
            .set_rotational_acceleration(360.0, 180.0)
            .set_target_rotational_velocity(360.0, 0.0);
        Self { manager }
    }

    /// Confetti bursting outward from (`x`, `y`), fading before they leave a
    /// square of [`DEFAULT_EXPLOSION_RADIUS`] around it
    pub fn explosion(view: V, x: f32, y: f32, bitmaps: Vec<Arc<Bitmap>>) -> Result<Self> {
        Ok(Self::explosion_with(view, x, y, bitmap_generator(bitmaps)?))
    }

    pub fn explosion_with(
        view: V,
        x: f32,
        y: f32,
        generator: impl ConfettoGenerator + 'static,
    ) -> Self {
        let source = ConfettiSource::point(x, y);
        let mut manager = ConfettiManager::new(view, generator, source);
        manager
            .set_ttl(1000)
            .set_bound(Rect::around(x, y, DEFAULT_EXPLOSION_RADIUS))
            .set_velocity_x(0.0, DEFAULT_VELOCITY_FAST)
            .set_velocity_y(0.0, DEFAULT_VELOCITY_FAST)
            .enable_fade_out(FadeOut::default())
            .set_initial_rotation(180.0, 180.0)
            .set_rotational_acceleration(360.0, 180.0)
            .set_target_rotational_velocity(360.0, 0.0);
        Self { manager }
    }

    pub fn with_rng(mut self, rng: ParticleRng) -> Self {
        self.manager = self.manager.with_rng(rng);
        self
    }

    /// Everything at once, no further emission
    pub fn one_shot(&mut self) -> &mut ConfettiManager<V> {
        self.manager
            .set_num_initial(ONE_SHOT_COUNT)
            .set_emission_duration(0)
            .start()
    }

    /// A steady stream for `duration_ms`
    pub fn stream(&mut self, duration_ms: u64) -> &mut ConfettiManager<V> {
        self.manager
            .set_num_initial(0)
            .set_emission_duration(duration_ms)
            .set_emission_rate(STREAM_RATE)
            .start()
    }

    /// A stream that runs until terminated
    pub fn infinite(&mut self) -> &mut ConfettiManager<V> {
        self.stream(INFINITE_DURATION)
    }

    pub fn manager(&self) -> &ConfettiManager<V> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ConfettiManager<V> {
        &mut self.manager
    }

    pub fn into_manager(self) -> ConfettiManager<V> {
        self.manager
    }
}

/// Generator that gives each new confetto a random bitmap from `bitmaps`
pub fn bitmap_generator(
    bitmaps: Vec<Arc<Bitmap>>,
) -> Result<impl FnMut(&mut ParticleRng) -> Confetto + 'static> {
    if bitmaps.is_empty() {
        return Err(ConfettiError::InvalidConfig(
            "confetti presets need at least one bitmap".into(),
        ));
    }
    Ok(move |rng: &mut ParticleRng| {
        let bitmap = &bitmaps[rng.next_index(bitmaps.len())];
        Confetto::new(ConfettoShape::bitmap(Arc::clone(bitmap)))
    })
}
