//! Per-page interaction sessions.
//!
//! Every page load opens its own session, so two tabs never see each
//! other's selection. The store is bounded: opening a session past capacity
//! drops the least recently used one.

use std::collections::BTreeMap;

use uuid::Uuid;

#[derive(Debug)]
struct Entry<T> {
    value: T,
    last_used: u64,
}

/// Bounded map from session id to session.
#[derive(Debug)]
pub struct SessionStore<T> {
    entries: BTreeMap<String, Entry<T>>,
    capacity: usize,
    clock: u64,
}

impl<T> SessionStore<T> {
    /// An empty store holding at most `capacity` sessions (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    /// Stores `value` under a fresh id and returns the id.
    pub fn open(&mut self, value: T) -> String {
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            log::debug!("Dropping idle session {oldest}");
            self.entries.remove(&oldest);
        }

        let id = Uuid::new_v4().to_string();
        let last_used = self.tick();
        self.entries.insert(id.clone(), Entry { value, last_used });
        id
    }

    /// The session for `id`, marking it as recently used.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let now = self.tick();
        self.entries.get_mut(id).map(|entry| {
            entry.last_used = now;
            &mut entry.value
        })
    }

    /// Number of open sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no session is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    const fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}
