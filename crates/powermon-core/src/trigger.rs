//! Sample-ready hand-off between the alert interrupt and the main loop
//!
//! The sensor's alert pin fires once per finished conversion. The interrupt
//! handler only calls [`SampleTrigger::notify`]; the cooperative loop drains
//! the counter with [`SampleTrigger::take`] and does the actual read.

use core::cell::Cell;

use critical_section::Mutex;

/// Interrupt-safe pending-conversion counter
pub struct SampleTrigger {
    pending: Mutex<Cell<u32>>,
}

impl Default for SampleTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleTrigger {
    /// Create a trigger with nothing pending
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(0)),
        }
    }

    /// Record one finished conversion. Safe to call from interrupt context.
    pub fn notify(&self) {
        critical_section::with(|cs| {
            let pending = self.pending.borrow(cs);
            pending.set(pending.get().saturating_add(1));
        });
    }

    /// Read and clear the pending count in one critical section
    pub fn take(&self) -> u32 {
        critical_section::with(|cs| self.pending.borrow(cs).replace(0))
    }

    /// Pending count without clearing it
    pub fn pending(&self) -> u32 {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }
}
