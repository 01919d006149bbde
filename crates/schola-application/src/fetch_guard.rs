//! Staleness guard for fire-and-forget fetches.
//!
//! There is no cancellation token for an in-flight request; instead every
//! request is tagged with the id it was issued for, and its response is
//! accepted only if that id is still the current target. An admin
//! switching the inspected student (or a logout) retargets the guard, so
//! responses for the previous target are dropped on arrival instead of
//! overwriting fresher state.

use std::sync::Mutex;

/// Tag issued to one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    target: String,
}

impl FetchTicket {
    /// The id this fetch was issued for.
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Tracks the current fetch target for one kind of data.
#[derive(Debug, Default)]
pub struct FetchGuard {
    current: Mutex<Option<String>>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `target` current and returns the ticket for its fetch.
    pub fn retarget(&self, target: &str) -> FetchTicket {
        let mut current = self.current.lock().expect("fetch guard poisoned");
        *current = Some(target.to_string());
        FetchTicket {
            target: target.to_string(),
        }
    }

    /// Clears the target; every outstanding ticket becomes stale.
    pub fn clear(&self) {
        let mut current = self.current.lock().expect("fetch guard poisoned");
        *current = None;
    }

    /// True when the ticket's target is still current.
    pub fn accepts(&self, ticket: &FetchTicket) -> bool {
        let current = self.current.lock().expect("fetch guard poisoned");
        current.as_deref() == Some(ticket.target.as_str())
    }
}
