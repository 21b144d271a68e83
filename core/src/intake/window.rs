use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::decoder_interface::PagerMessage;

/// Maximum number of messages held in memory.
pub const WINDOW_CAPACITY: usize = 25;

/// Ordered, bounded record of recently accepted messages, oldest at the front.
#[derive(Debug, Clone, Default)]
pub struct RetentionWindow {
    messages: VecDeque<PagerMessage>,
}

impl RetentionWindow {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
        }
    }

    /// Appends at the tail. Follow with [`evict_if_over_capacity`](Self::evict_if_over_capacity).
    pub fn insert(&mut self, message: PagerMessage) {
        self.messages.push_back(message);
    }

    /// Drops messages from the head until the window fits its capacity.
    pub fn evict_if_over_capacity(&mut self) -> Vec<PagerMessage> {
        let mut evicted = Vec::new();
        while self.messages.len() > WINDOW_CAPACITY {
            if let Some(oldest) = self.messages.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn contains<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&PagerMessage) -> bool,
    {
        self.messages.iter().any(predicate)
    }

    pub fn newest(&self) -> Option<&PagerMessage> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PagerMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn snapshot(&self, revision: u64) -> WindowSnapshot {
        WindowSnapshot {
            revision,
            messages: self.messages.iter().cloned().collect(),
        }
    }
}

/// Point-in-time copy of the window handed to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    /// Bumped on every insert, eviction or clear.
    pub revision: u64,
    pub messages: Vec<PagerMessage>,
}
