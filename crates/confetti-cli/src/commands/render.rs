//! Render an animation to PNG frames with the software surface

use super::{build_manager, SceneArgs};
use crate::host::ImageSurface;
use anyhow::{ensure, Context, Result};
use confetti_core::Color;
use confetti_particles::AnimationState;
use std::path::Path;

pub struct RenderArgs {
    pub scene: SceneArgs,
    pub output: String,
    pub every: u32,
    pub background: Option<Color>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    ensure!(args.every > 0, "--every must be at least 1");
    let scene = &args.scene;
    let out_dir = Path::new(&args.output);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", args.output))?;

    let mut manager = build_manager(scene)?;
    println!("Rendering {} at {}x{}", scene.label(), scene.width, scene.height);

    let mut redraws = 0u32;
    let mut written = 0u32;
    let mut t = 0u64;
    loop {
        let state = manager.tick(t);
        for event in manager.drain_events() {
            log::trace!("[{t} ms] {event:?}");
        }
        if state == AnimationState::Terminated {
            break;
        }
        let dirty = manager.view_mut().container_mut().take_dirty();
        if dirty {
            if redraws % args.every == 0 {
                let mut surface = ImageSurface::new(scene.width, scene.height, args.background);
                manager.draw(&mut surface);
                let path = out_dir.join(format!("frame_{written:05}.png"));
                surface
                    .save(&path)
                    .with_context(|| format!("Failed to save frame to {}", path.display()))?;
                written += 1;
            }
            redraws += 1;
        }
        if t >= scene.max_ms {
            println!("Stopped at {t} ms (--max-ms)");
            manager.terminate();
            break;
        }
        t += scene.step_ms;
    }

    println!("Wrote {written} frames to {}", out_dir.display());
    Ok(())
}
