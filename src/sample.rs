//! Latest potentiometer reading, shared between the ADC interrupt and the
//! control loop.

use core::sync::atomic::{AtomicU8, Ordering};

/// Single-byte cell written by the ADC interrupt and read by the main loop.
///
/// A byte load/store is a single instruction on every core this runs on, so
/// a reader racing the interrupt sees either the previous or the new sample,
/// never a mix. A wider sample would need a critical section around both
/// accesses instead.
pub struct AnalogSample(AtomicU8);

impl AnalogSample {
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    /// Publishes a completed conversion. Interrupt context only.
    pub fn store(&self, value: u8) {
        self.0.store(value, Ordering::Relaxed);
    }

    pub fn load(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for AnalogSample {
    fn default() -> Self {
        Self::new()
    }
}
