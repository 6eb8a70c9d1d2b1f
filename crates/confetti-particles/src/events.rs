//! Lifecycle notifications drained by the host after each tick

use crate::particle::ExitReason;
use std::collections::VecDeque;

/// Events kept for a host that never drains. Older ones are dropped first.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// Something observable that happened during an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfettiEvent {
    /// `start` began session `session`
    AnimationStarted { session: u64 },
    /// The session terminated, either drained or via `terminate`
    AnimationEnded { session: u64 },
    /// A confetto became visible
    ConfettoEntered { session: u64 },
    /// A confetto terminated
    ConfettoExited { session: u64, reason: ExitReason },
}

/// Bounded queue the manager pushes to and the host drains
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<ConfettiEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero disables recording
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: ConfettiEvent) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<ConfettiEvent> {
        self.events.drain(..).collect()
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.events.len() > capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events discarded because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
