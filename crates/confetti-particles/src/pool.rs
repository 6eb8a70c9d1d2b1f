//! Recycling store for terminated confetti

use crate::particle::Confetto;
use std::collections::VecDeque;

/// FIFO of terminated confetti awaiting reuse.
///
/// Recycled confetti keep whatever state they terminated with; the next
/// [`Confetto::configure`] overwrites all of it.
#[derive(Debug, Default)]
pub struct ConfettoPool {
    free: VecDeque<Confetto>,
    constructed: usize,
}

impl ConfettoPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse a pooled confetto, or construct one with `make` when the pool is empty
    pub fn acquire_or(&mut self, make: impl FnOnce() -> Confetto) -> Confetto {
        match self.free.pop_front() {
            Some(confetto) => confetto,
            None => {
                self.constructed += 1;
                make()
            }
        }
    }

    pub fn recycle(&mut self, confetto: Confetto) {
        self.free.push_back(confetto);
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Drop every pooled confetto. The construction count is kept.
    pub fn clear(&mut self) {
        self.free.clear();
    }

    /// Confetti built through [`Self::acquire_or`] over the pool's lifetime
    pub fn constructed(&self) -> usize {
        self.constructed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ConfettoShape;
    use confetti_core::Color;

    fn make() -> Confetto {
        Confetto::new(ConfettoShape::circle(Color::WHITE, 1.0))
    }

    #[test]
    fn constructs_only_when_empty() {
        let mut pool = ConfettoPool::new();
        let a = pool.acquire_or(make);
        let b = pool.acquire_or(make);
        assert_eq!(pool.constructed(), 2);

        pool.recycle(a);
        pool.recycle(b);
        assert_eq!(pool.len(), 2);

        let _c = pool.acquire_or(|| panic!("pool was not empty"));
        assert_eq!(pool.constructed(), 2);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn clear_keeps_count() {
        let mut pool = ConfettoPool::new();
        let a = pool.acquire_or(make);
        pool.recycle(a);
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.constructed(), 1);
    }
}
