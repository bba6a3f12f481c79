//! Per-visitor submission guard.
//!
//! A visitor may have at most one login or registration request outstanding.
//! Admission hands out a guard; the slot frees up when the guard is dropped,
//! whichever way the submission ends.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<Uuid>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `visitor`, or `None` if a submission is already running.
    pub fn try_begin(&self, visitor: Uuid) -> Option<SubmissionGuard> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if !active.insert(visitor) {
            return None;
        }
        Some(SubmissionGuard {
            active: Arc::clone(&self.active),
            visitor,
        })
    }

    pub fn is_active(&self, visitor: Uuid) -> bool {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.contains(&visitor)
    }
}

#[derive(Debug)]
pub struct SubmissionGuard {
    active: Arc<Mutex<HashSet<Uuid>>>,
    visitor: Uuid,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_submission_is_refused_until_first_ends() {
        let in_flight = InFlight::new();
        let visitor = Uuid::new_v4();

        let guard = in_flight.try_begin(visitor).expect("first submission admitted");
        assert!(in_flight.try_begin(visitor).is_none());
        assert!(in_flight.is_active(visitor));

        drop(guard);
        assert!(!in_flight.is_active(visitor));
        assert!(in_flight.try_begin(visitor).is_some());
    }

    #[test]
    fn test_visitors_do_not_block_each_other() {
        let in_flight = InFlight::new();
        let _a = in_flight.try_begin(Uuid::new_v4()).unwrap();
        assert!(in_flight.try_begin(Uuid::new_v4()).is_some());
    }
}
