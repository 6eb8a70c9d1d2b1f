//! Confetti CLI - headless host for the confetti engine

mod assets;
mod commands;
mod host;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{presets, render, simulate, SceneArgs};
use confetti_core::Color;

#[derive(Parser)]
#[command(name = "confetti")]
#[command(about = "Drive confetti animations without a display", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an animation to completion and print lifecycle statistics
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,

        /// Print every lifecycle event as it happens
        #[arg(long)]
        events: bool,
    },

    /// Render an animation to a sequence of PNG frames
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Directory for frame_NNNNN.png files
        #[arg(short, long, default_value = "frames")]
        output: String,

        /// Write every Nth redrawn frame
        #[arg(long, default_value = "1")]
        every: u32,

        /// Background color as RRGGBB hex (transparent when omitted)
        #[arg(long, value_parser = commands::parse_color)]
        background: Option<Color>,
    },

    /// List the built-in presets and emission modes
    Presets,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { scene, events } => simulate::run(&scene, events),
        Commands::Render {
            scene,
            output,
            every,
            background,
        } => render::run(render::RenderArgs {
            scene,
            output,
            every,
            background,
        }),
        Commands::Presets => {
            presets::run();
            Ok(())
        }
    }
}
