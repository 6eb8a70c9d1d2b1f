//! List built-in animations

use confetti_particles::presets::{
    DEFAULT_CONFETTI_SIZE, DEFAULT_EXPLOSION_RADIUS, DEFAULT_VELOCITY_FAST, DEFAULT_VELOCITY_NORMAL,
    DEFAULT_VELOCITY_SLOW,
};

pub fn run() {
    println!("Presets (--preset):");
    println!(
        "  rain       line source {DEFAULT_CONFETTI_SIZE} px above the top edge, falling at \
         {DEFAULT_VELOCITY_NORMAL} ± {DEFAULT_VELOCITY_SLOW} px/s"
    );
    println!(
        "  explosion  point source (--at x,y), ± {DEFAULT_VELOCITY_FAST} px/s, 1 s TTL, \
         fades within {DEFAULT_EXPLOSION_RADIUS} px"
    );
    println!();
    println!("Modes (--mode):");
    println!("  one-shot   100 confetti at once");
    println!("  stream     50 per second for --duration-ms");
    println!("  infinite   50 per second until --max-ms");
    println!();
    println!("Pass --config <file.toml> to replace the preset with custom emission settings.");
}
