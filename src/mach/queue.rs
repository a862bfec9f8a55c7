use super::snapshot::Persist;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// ## Shared FIFO
///
/// Clones share the same queue, so a producer thread can hold one end
/// while the interpreter drains the other. Only the queue's existence
/// is saved in a snapshot; it comes back empty.

#[derive(Debug)]
pub struct EventQueue<T> {
    inner: Arc<Mutex<VecDeque<T>>>,
}

impl<T> Clone for EventQueue<T> {
    fn clone(&self) -> Self {
        EventQueue {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        EventQueue {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> EventQueue<T> {
        EventQueue::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, item: T) {
        self.lock().push_back(item)
    }

    pub fn pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear()
    }
}

impl<T> Persist for EventQueue<T> {
    type Image = ();

    fn externalize(&self) {}

    fn internalize(_: ()) -> Self {
        EventQueue::new()
    }
}

impl<T> Serialize for EventQueue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.externalize().serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for EventQueue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <()>::deserialize(deserializer).map(EventQueue::internalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share() {
        let q = EventQueue::new();
        let producer = q.clone();
        producer.push(1);
        producer.push(2);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_snapshot_restores_empty() {
        let q = EventQueue::new();
        q.push(7u8);
        let bytes = bincode::serialize(&q).unwrap();
        let back: EventQueue<u8> = bincode::deserialize(&bytes).unwrap();
        assert!(back.is_empty());
    }
}
