//! Bounded record of message IDs this device sent, used to drop their echo.

use std::collections::{HashSet, VecDeque};

/// Sent IDs remembered at most. An echo arrives within seconds of the send,
/// so older entries are safe to forget.
pub(super) const SENT_ID_CAPACITY: usize = 512;

#[derive(Debug)]
pub(super) struct SentIds {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl Default for SentIds {
    fn default() -> Self {
        Self::with_capacity(SENT_ID_CAPACITY)
    }
}

impl SentIds {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember `id`, forgetting the oldest entry when full.
    pub(super) fn insert(&mut self, id: String) {
        if self.capacity == 0 || !self.ids.insert(id.clone()) {
            return;
        }
        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
    }

    /// Forget `id`. Returns whether it was remembered.
    pub(super) fn remove(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.order.retain(|kept| kept != id);
        true
    }

    pub(super) fn len(&self) -> usize {
        self.ids.len()
    }
}
