use std::collections::HashMap;
use std::hash::Hash;

struct Entry<V> {
    value: V,
    last_used: u64,
}

/// GPU resources keyed by the identity of their CPU-side source.
///
/// Entries not used for `max_idle` frames are dropped at `end_frame`, which
/// frees buffers for rooms that were switched away from.
pub struct FrameCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    frame: u64,
    max_idle: u64,
}

impl<K: Eq + Hash + Copy, V> FrameCache<K, V> {
    pub fn new(max_idle: u64) -> Self {
        Self {
            entries: HashMap::new(),
            frame: 0,
            max_idle,
        }
    }

    /// Marks the entry used this frame, creating it when missing or when
    /// `is_stale` rejects the cached value
    pub fn prepare(&mut self, key: K, is_stale: impl Fn(&V) -> bool, create: impl FnOnce() -> V) {
        let frame = self.frame;
        if let Some(entry) = self.entries.get_mut(&key) {
            if !is_stale(&entry.value) {
                entry.last_used = frame;
                return;
            }
        }
        self.entries.insert(
            key,
            Entry {
                value: create(),
                last_used: frame,
            },
        );
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Advances the frame counter; returns how many entries were evicted
    pub fn end_frame(&mut self) -> usize {
        let before = self.entries.len();
        let (frame, max_idle) = (self.frame, self.max_idle);
        self.entries
            .retain(|_, entry| frame.saturating_sub(entry.last_used) < max_idle);
        self.frame += 1;
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
