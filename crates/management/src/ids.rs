use std::sync::atomic::{AtomicU64, Ordering};

use evocrm_core::config::IdStrategy;

/// Hands out numeric record ids for one collection.
#[derive(Debug)]
pub struct IdAllocator {
    strategy: IdStrategy,
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            next: AtomicU64::new(1),
        }
    }

    /// Record an id that already exists so the counter starts past it.
    /// Non-numeric ids are ignored.
    pub fn observe(&self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.next.fetch_max(n.saturating_add(1), Ordering::SeqCst);
        }
    }

    /// Next id for a collection currently holding `len` records.
    pub fn allocate(&self, len: usize) -> u64 {
        match self.strategy {
            IdStrategy::Monotonic => self.next.fetch_add(1, Ordering::SeqCst),
            IdStrategy::LegacyLength => len as u64 + 1,
        }
    }
}

pub fn invoice_number(n: u64) -> String {
    format!("INV-{n:03}")
}
