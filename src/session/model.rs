use std::time::{Duration, Instant};

use super::SessionError;
use crate::core::item::Item;

/// Ordered items plus the navigation cursor for one run.
#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<Item>,
    current: usize,
    started_at: Instant,
}

impl Session {
    pub fn new(items: Vec<Item>) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            items,
            current: 0,
            started_at: Instant::now(),
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 0-based cursor.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_item(&self) -> &Item {
        &self.items[self.current]
    }

    pub fn current_item_mut(&mut self) -> &mut Item {
        &mut self.items[self.current]
    }

    pub fn answered_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_answered()).count()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub(crate) fn set_current(&mut self, index: usize) {
        debug_assert!(index < self.items.len());
        self.current = index.min(self.items.len() - 1);
    }
}
