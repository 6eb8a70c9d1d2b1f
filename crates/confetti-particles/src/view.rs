//! Viewport adapter between the scheduler and the host display tree

use crate::particle::Confetto;
use confetti_core::{Rect, Result};
use glam::Vec2;

/// What the scheduler needs from whatever shows the confetti.
///
/// The live collection is lent read-only on every redraw and never retained.
pub trait Viewport {
    /// Drawable area in viewport pixels; the default clip bound
    fn bounds(&self) -> Rect;

    fn is_attached(&self) -> bool;

    /// Add the confetti layer to the display tree
    fn attach(&mut self);

    /// Remove the confetti layer and drop anything drawn from the last frame
    fn detach(&mut self);

    /// Schedule a repaint of `confetti`
    fn request_redraw(&mut self, confetti: &[Confetto]);
}

/// Host display tree operations. These may fail when the host tears
/// its views down underneath a running animation.
pub trait Container {
    /// Width and height available to the overlay
    fn size(&self) -> Result<(f32, f32)>;

    fn add_overlay(&mut self) -> Result<()>;

    fn remove_overlay(&mut self) -> Result<()>;

    /// Mark the overlay dirty so the host repaints it
    fn invalidate(&mut self) -> Result<()>;
}

/// [`Viewport`] over a host [`Container`]. Container errors are logged and
/// swallowed so they never reach the scheduler.
#[derive(Debug)]
pub struct ConfettiView<C: Container> {
    container: C,
    attached: bool,
    /// Last known size, used when the container can no longer report one
    last_bounds: Rect,
    visible: usize,
}

impl<C: Container> ConfettiView<C> {
    pub fn new(container: C) -> Self {
        Self {
            container,
            attached: false,
            last_bounds: Rect::default(),
            visible: 0,
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Confetti that were drawable at the last redraw
    pub fn visible_count(&self) -> usize {
        self.visible
    }
}

impl<C: Container> Viewport for ConfettiView<C> {
    fn bounds(&self) -> Rect {
        match self.container.size() {
            Ok((width, height)) => Rect::from_size(width, height),
            Err(e) => {
                log::warn!("confetti: container size unavailable, using last bounds: {e}");
                self.last_bounds
            }
        }
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn attach(&mut self) {
        if self.attached {
            return;
        }
        match self.container.add_overlay() {
            Ok(()) => {
                if let Ok((width, height)) = self.container.size() {
                    self.last_bounds = Rect::from_size(width, height);
                }
                self.attached = true;
            }
            Err(e) => log::warn!("confetti: failed to attach overlay: {e}"),
        }
    }

    fn detach(&mut self) {
        self.visible = 0;
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Err(e) = self.container.remove_overlay() {
            log::warn!("confetti: failed to detach overlay: {e}");
        }
    }

    fn request_redraw(&mut self, confetti: &[Confetto]) {
        self.visible = confetti.iter().filter(|c| c.is_visible()).count();
        if !self.attached {
            return;
        }
        if let Err(e) = self.container.invalidate() {
            log::warn!("confetti: redraw request dropped: {e}");
        }
    }
}

/// Phase of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Pointer event forwarded from the host, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
    /// Host timestamp in milliseconds, used for release velocity
    pub time_ms: u64,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, x: f32, y: f32, time_ms: u64) -> Self {
        Self { phase, x, y, time_ms }
    }

    pub fn point(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}
