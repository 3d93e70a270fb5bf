//! Operator input adapter
//!
//! Turns the raw encoder count into a belt speed. The count is clamped at
//! zero: a negative reading is written back as zero so that further turns
//! of the dial start from zero instead of digging out of a negative count.
//!
//! There is no upper clamp. The usable maximum is whatever the encoder
//! and dial allow.

use crate::traits::CounterSource;

/// Clamp the counter at zero and return the speed it represents
///
/// Overwrites the counter with zero when it reads negative.
pub fn read_clamped<C: CounterSource + ?Sized>(source: &mut C) -> u32 {
    let raw = source.read();
    match u32::try_from(raw) {
        Ok(speed) => speed,
        Err(_) => {
            source.write(0);
            0
        }
    }
}

/// Operator input adapter
///
/// Owns the counter source and reports clamped readings.
pub struct OperatorInput<C> {
    source: C,
}

impl<C: CounterSource> OperatorInput<C> {
    /// Wrap a counter source
    pub fn new(source: C) -> Self {
        Self { source }
    }

    /// Force the counter to an initial speed
    pub fn preset(&mut self, speed: u32) {
        self.source.write(i32::try_from(speed).unwrap_or(i32::MAX));
    }

    /// Read the clamped speed
    pub fn read_clamped(&mut self) -> u32 {
        read_clamped(&mut self.source)
    }

    /// Read the clamped speed, returning it only if it differs from `last`
    pub fn poll_change(&mut self, last: u32) -> Option<u32> {
        let speed = self.read_clamped();
        (speed != last).then_some(speed)
    }

    /// Access the underlying source
    pub fn source(&self) -> &C {
        &self.source
    }
}
