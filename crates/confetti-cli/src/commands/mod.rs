//! CLI command implementations and the scene setup they share

pub mod presets;
pub mod render;
pub mod simulate;

use crate::assets::{palette_bitmaps, DEFAULT_PALETTE};
use crate::host::Canvas;
use anyhow::{ensure, Context, Result};
use clap::{Args, ValueEnum};
use confetti_core::Color;
use confetti_particles::presets::DEFAULT_CONFETTI_SIZE;
use confetti_particles::Viewport;
use confetti_particles::{
    CommonConfetti, ConfettiManager, ConfettiSource, ConfettiView, Confetto, ConfettoShape,
    EmissionConfig, ParticleRng,
};
use std::sync::Arc;

pub type HeadlessManager = ConfettiManager<ConfettiView<Canvas>>;

/// Shimmer period for `--shape shimmer`
const SHIMMER_WAVELENGTH_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PresetKind {
    /// Falling from above the top edge
    Rain,
    /// Bursting from a point, fading within a second
    Explosion,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EmissionMode {
    /// 100 confetti at once
    OneShot,
    /// 50 confetti per second for --duration-ms
    Stream,
    /// 50 confetti per second until --max-ms
    Infinite,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShapeKind {
    Bitmap,
    Circle,
    Shimmer,
}

#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Preset animation
    #[arg(long, value_enum, default_value = "rain")]
    pub preset: PresetKind,

    /// How the preset emits
    #[arg(long, value_enum, default_value = "one-shot")]
    pub mode: EmissionMode,

    /// Stream duration in milliseconds
    #[arg(long, default_value = "3000")]
    pub duration_ms: u64,

    /// TOML file with emission settings; replaces the preset and mode
    #[arg(long)]
    pub config: Option<String>,

    /// Emission source as x0,y0,x1,y1 (rain and --config runs)
    #[arg(long, value_parser = parse_floats::<4>)]
    pub source: Option<[f32; 4]>,

    /// Explosion center as x,y (defaults to the viewport center)
    #[arg(long, value_parser = parse_floats::<2>)]
    pub at: Option<[f32; 2]>,

    /// Viewport width in pixels
    #[arg(long, default_value = "320")]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value = "480")]
    pub height: u32,

    /// Confetto shape
    #[arg(long, value_enum, default_value = "bitmap")]
    pub shape: ShapeKind,

    /// Palette as comma-separated RRGGBB hex colors
    #[arg(long, value_delimiter = ',', value_parser = parse_color)]
    pub colors: Vec<Color>,

    /// Frame interval in milliseconds
    #[arg(long, default_value = "16")]
    pub step_ms: u64,

    /// Stop after this much animation time even if confetti remain
    #[arg(long, default_value = "30000")]
    pub max_ms: u64,

    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SceneArgs {
    pub fn label(&self) -> String {
        match &self.config {
            Some(path) => format!("config {path}"),
            None => format!("{:?} / {:?}", self.preset, self.mode).to_lowercase(),
        }
    }

    fn palette(&self) -> Vec<Color> {
        if self.colors.is_empty() {
            DEFAULT_PALETTE.iter().map(|&hex| Color::from_hex(hex)).collect()
        } else {
            self.colors.clone()
        }
    }

    fn rng(&self) -> ParticleRng {
        self.seed.map_or_else(ParticleRng::from_entropy, ParticleRng::new)
    }
}

/// Build and start the manager described by `args`
pub fn build_manager(args: &SceneArgs) -> Result<HeadlessManager> {
    ensure!(args.step_ms > 0, "--step-ms must be positive");
    ensure!(args.width > 0 && args.height > 0, "viewport must be non-empty");

    let view = ConfettiView::new(Canvas::new(args.width, args.height));
    let generator = make_generator(args.shape, &args.palette());
    let (width, height) = (args.width as f32, args.height as f32);
    let source = match args.source {
        Some([x0, y0, x1, y1]) => ConfettiSource::line(x0, y0, x1, y1),
        None => ConfettiSource::line(0.0, -DEFAULT_CONFETTI_SIZE, width, -DEFAULT_CONFETTI_SIZE),
    };

    if let Some(path) = &args.config {
        let mut config = EmissionConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load emission config from {path}"))?;
        if config.bound.is_none() {
            // Sources sit just outside the viewport, like the rain preset's
            config.bound = Some(view.bounds().outset(DEFAULT_CONFETTI_SIZE));
        }
        let mut manager = ConfettiManager::new(view, generator, source).with_rng(args.rng());
        manager.set_config(config).start();
        return Ok(manager);
    }

    let mut preset = match args.preset {
        PresetKind::Rain => CommonConfetti::raining_with(view, source, generator),
        PresetKind::Explosion => {
            let [x, y] = args.at.unwrap_or([width / 2.0, height / 2.0]);
            CommonConfetti::explosion_with(view, x, y, generator)
        }
    }
    .with_rng(args.rng());

    match args.mode {
        EmissionMode::OneShot => preset.one_shot(),
        EmissionMode::Stream => preset.stream(args.duration_ms),
        EmissionMode::Infinite => preset.infinite(),
    };
    Ok(preset.into_manager())
}

/// Generator drawing a random palette entry for every new confetto
fn make_generator(shape: ShapeKind, palette: &[Color]) -> impl FnMut(&mut ParticleRng) -> Confetto + 'static {
    let size = DEFAULT_CONFETTI_SIZE as u32;
    let bitmaps = palette_bitmaps(palette, size);
    let palette = palette.to_vec();
    move |rng: &mut ParticleRng| {
        let shape = match shape {
            ShapeKind::Bitmap => {
                ConfettoShape::bitmap(Arc::clone(&bitmaps[rng.next_index(bitmaps.len())]))
            }
            ShapeKind::Circle => ConfettoShape::circle(
                palette[rng.next_index(palette.len())],
                DEFAULT_CONFETTI_SIZE / 2.0,
            ),
            ShapeKind::Shimmer => {
                let bitmap = Arc::clone(&bitmaps[rng.next_index(bitmaps.len())]);
                let from = palette[rng.next_index(palette.len())];
                let to = palette[rng.next_index(palette.len())];
                ConfettoShape::shimmering(bitmap, from, to, SHIMMER_WAVELENGTH_MS, rng)
            }
        };
        Confetto::new(shape)
    }
}

pub fn parse_color(s: &str) -> Result<Color, String> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected RRGGBB, got '{s}'"));
    }
    u32::from_str_radix(hex, 16)
        .map(Color::from_hex)
        .map_err(|e| format!("invalid color '{s}': {e}"))
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated values, got {}", parts.len()));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| format!("invalid number '{part}': {e}"))?;
    }
    Ok(out)
}
