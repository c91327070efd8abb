use std::collections::HashMap;

use log::trace;

use crate::config::LoanConfig;
use crate::errors::Result;

use super::{generate_schedule, Schedule};

/// memoizes paid-off schedules by their full config
///
/// Failed runs are not stored, so an error is recomputed on every lookup.
/// An unbounded cache (`new`) keeps every schedule it has produced; use
/// `with_capacity` to cap the number of stored schedules, in which case an
/// arbitrary entry is dropped to make room for a new one.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: HashMap<LoanConfig, Schedule>,
    capacity: Option<usize>,
    hits: u64,
    misses: u64,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// cache holding at most `capacity` schedules (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn get_or_generate(&mut self, config: &LoanConfig) -> Result<&Schedule> {
        if self.entries.contains_key(config) {
            self.hits += 1;
        } else {
            self.misses += 1;
            trace!("schedule cache miss for principal {}", config.principal);
            let schedule = generate_schedule(config)?;
            self.make_room();
            self.entries.insert(config.clone(), schedule);
        }
        Ok(&self.entries[config])
    }

    fn make_room(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        while self.entries.len() >= capacity {
            let Some(evicted) = self.entries.keys().next().cloned() else {
                break;
            };
            trace!("schedule cache full, evicting principal {}", evicted.principal);
            self.entries.remove(&evicted);
        }
    }

    pub fn get(&self, config: &LoanConfig) -> Option<&Schedule> {
        self.entries.get(config)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
