//! Run an animation headlessly and report what happened

use super::{build_manager, SceneArgs};
use anyhow::Result;
use confetti_particles::{AnimationState, ConfettiEvent, ExitReason};

#[derive(Debug, Default)]
struct EventTally {
    entered: usize,
    expired: usize,
    out_of_bounds: usize,
}

impl EventTally {
    fn record(&mut self, event: &ConfettiEvent) {
        match event {
            ConfettiEvent::ConfettoEntered { .. } => self.entered += 1,
            ConfettiEvent::ConfettoExited {
                reason: ExitReason::Expired,
                ..
            } => self.expired += 1,
            ConfettiEvent::ConfettoExited {
                reason: ExitReason::OutOfBounds,
                ..
            } => self.out_of_bounds += 1,
            ConfettiEvent::AnimationStarted { .. } | ConfettiEvent::AnimationEnded { .. } => {}
        }
    }
}

pub fn run(args: &SceneArgs, print_events: bool) -> Result<()> {
    let mut manager = build_manager(args)?;
    println!(
        "Simulating {} on a {}x{} viewport",
        args.label(),
        args.width,
        args.height
    );

    let mut tally = EventTally::default();
    let mut frames = 0u64;
    let mut t = 0u64;
    let finished_at = loop {
        let state = manager.tick(t);
        frames += 1;
        for event in manager.drain_events() {
            if print_events {
                println!("  [{t:>6} ms] {event:?}");
            }
            tally.record(&event);
        }
        if state == AnimationState::Terminated {
            break Some(t);
        }
        if t >= args.max_ms {
            break None;
        }
        t += args.step_ms;
    };

    match finished_at {
        Some(t) => println!("Finished after {t} ms ({frames} frames)"),
        None => {
            println!("Stopped at {t} ms with {} confetti still live", manager.confetti().len());
            manager.terminate();
        }
    }

    let stats = manager.stats();
    println!();
    println!("Spawned:        {}", stats.spawned);
    println!("Peak live:      {}", stats.peak_live);
    println!("Constructed:    {}", stats.constructed);
    println!("Recycled:       {}", stats.recycled);
    println!("Entered view:   {}", tally.entered);
    println!("Expired (TTL):  {}", tally.expired);
    println!("Left bounds:    {}", tally.out_of_bounds);
    if stats.spawned > 0 {
        let reuse = 100.0 * (1.0 - stats.constructed as f64 / stats.spawned as f64);
        println!("Pool reuse:     {reuse:.1}%");
    }
    Ok(())
}
