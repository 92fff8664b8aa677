//! Re-entrancy guards for operations with a latency window
//!
//! Submitting an incident and confirming an assignment both wait on a
//! collaborator. While one is in flight, a second attempt for the same key
//! is refused instead of being queued. Other keys are unaffected.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Returned when the key already has an operation in flight
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Operation already in flight for {key}")]
pub struct AlreadyInFlight {
    pub key: String,
}

/// Tracks which keys currently have an operation in flight
#[derive(Debug)]
pub struct InFlightGuard<K: Eq + Hash> {
    keys: Arc<Mutex<HashSet<K>>>,
}

impl<K: Eq + Hash> Default for InFlightGuard<K> {
    fn default() -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K: Eq + Hash> Clone for InFlightGuard<K> {
    fn clone(&self) -> Self {
        Self { keys: Arc::clone(&self.keys) }
    }
}

impl<K> InFlightGuard<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`; the claim is released when the permit is dropped
    pub fn try_acquire(&self, key: K) -> Result<InFlightPermit<K>, AlreadyInFlight> {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        if !keys.insert(key.clone()) {
            return Err(AlreadyInFlight { key: key.to_string() });
        }
        Ok(InFlightPermit {
            key: Some(key),
            keys: Arc::clone(&self.keys),
        })
    }

    /// Returns true if `key` is currently claimed
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }
}

/// Proof that an operation holds its key
#[derive(Debug)]
pub struct InFlightPermit<K: Eq + Hash> {
    key: Option<K>,
    keys: Arc<Mutex<HashSet<K>>>,
}

impl<K: Eq + Hash> InFlightPermit<K> {
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }
}

impl<K: Eq + Hash> Drop for InFlightPermit<K> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.keys
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_rejected_until_drop() {
        let guard: InFlightGuard<String> = InFlightGuard::new();
        let permit = guard.try_acquire("intake-1".to_string()).unwrap();
        assert!(guard.is_in_flight(&"intake-1".to_string()));
        assert!(guard.try_acquire("intake-1".to_string()).is_err());
        assert!(guard.try_acquire("intake-2".to_string()).is_ok());

        drop(permit);
        assert!(!guard.is_in_flight(&"intake-1".to_string()));
        assert!(guard.try_acquire("intake-1".to_string()).is_ok());
    }
}
