//! Admission gate for the serialized slow digest.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Capacity-1 admission gate. At most one [`Permit`] from a gate is alive at any time.
#[derive(Debug, Default)]
pub struct AdmissionGate {
    slot: Mutex<()>,
}

/// Exclusive-access token for one slow-digest call. Released on drop.
pub struct Permit<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the gate is free, then hand out its permit.
    pub fn admit(&self) -> Permit<'_> {
        // The gate guards no data, so a holder that panicked leaves nothing inconsistent.
        let guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Permit { _guard: guard }
    }
}
