//! Shared encoder counter
//!
//! The quadrature decoder runs from a GPIO-edge task at higher priority
//! than the control loop. It adds deltas to this counter; the control loop
//! reads it and, when clamping, overwrites it. Both sides are lock-free.
//!
//! ```ignore
//! static ENCODER: EncoderCount = EncoderCount::new(0);
//!
//! // Edge task:
//! ENCODER.add(decoder.update(a, b));
//!
//! // Control loop:
//! let counter = &ENCODER;
//! ```

use portable_atomic::{AtomicI32, Ordering};

use conveyor_core::encoder::QuadratureDecoder;
use conveyor_core::traits::CounterSource;

/// Lock-free encoder count
pub struct EncoderCount {
    count: AtomicI32,
}

impl EncoderCount {
    /// Create a counter with a starting value
    pub const fn new(value: i32) -> Self {
        Self {
            count: AtomicI32::new(value),
        }
    }

    /// Apply a decoder delta
    pub fn add(&self, delta: i8) {
        if delta != 0 {
            self.count.fetch_add(delta as i32, Ordering::Relaxed);
        }
    }

    /// Feed channel levels through a decoder and apply the delta
    pub fn update(&self, decoder: &mut QuadratureDecoder, a: bool, b: bool) -> i8 {
        let delta = decoder.update(a, b);
        self.add(delta);
        delta
    }

    /// Current count
    pub fn get(&self) -> i32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Overwrite the count
    pub fn set(&self, value: i32) {
        self.count.store(value, Ordering::Relaxed);
    }
}

impl CounterSource for &EncoderCount {
    fn read(&mut self) -> i32 {
        self.get()
    }

    fn write(&mut self, value: i32) {
        self.set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_core::input::read_clamped;

    #[test]
    fn test_add_and_read() {
        let count = EncoderCount::new(0);
        count.add(1);
        count.add(1);
        count.add(-1);
        count.add(0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_counter_source() {
        let count = EncoderCount::new(0);
        let mut source = &count;

        source.write(152);
        assert_eq!(source.read(), 152);
        assert_eq!(count.get(), 152);
    }

    #[test]
    fn test_clamp_through_shared_counter() {
        static COUNT: EncoderCount = EncoderCount::new(0);

        COUNT.set(-8);
        let mut source = &COUNT;
        assert_eq!(read_clamped(&mut source), 0);
        assert_eq!(COUNT.get(), 0);

        // Turning up again starts from zero
        COUNT.add(1);
        assert_eq!(read_clamped(&mut source), 1);
    }

    #[test]
    fn test_decoder_feeds_counter() {
        let count = EncoderCount::new(152);
        let mut decoder = QuadratureDecoder::new(false, false);

        // One clockwise detent
        for (a, b) in [(true, false), (true, true), (false, true), (false, false)] {
            count.update(&mut decoder, a, b);
        }
        assert_eq!(count.get(), 156);

        // One counter-clockwise detent
        for (a, b) in [(false, true), (true, true), (true, false), (false, false)] {
            count.update(&mut decoder, a, b);
        }
        assert_eq!(count.get(), 152);
    }
}
