use std::collections::VecDeque;

pub const DEFAULT_HISTORY_SIZE: usize = 5;

/// Trailing window of recently shown keys.
///
/// Capacity is capped at half the item count so the rejection loop in the
/// quiz always has eligible items left to draw.
#[derive(Clone, Debug)]
pub struct RepeatGuard {
    recent: VecDeque<String>,
    capacity: usize,
}

impl RepeatGuard {
    pub fn for_item_count(item_count: usize, history_size: usize) -> Self {
        Self::with_capacity(history_size.min(item_count / 2))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn should_skip(&self, key: &str) -> bool {
        self.recent.iter().any(|k| k == key)
    }

    pub fn record(&mut self, key: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(key.to_string());
    }
}
