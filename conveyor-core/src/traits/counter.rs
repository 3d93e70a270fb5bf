//! Adjustable counter trait for operator input

/// Source of the operator's raw count
///
/// Typically a quadrature encoder counter. The value is the desired belt
/// speed in mm/min. Reads and writes cannot fail.
pub trait CounterSource {
    /// Read the current count
    fn read(&mut self) -> i32;

    /// Force the count to a value
    ///
    /// Used for the one-time initial value at startup and for clamping
    /// negative readings back to zero.
    fn write(&mut self, value: i32);
}

impl<T: CounterSource + ?Sized> CounterSource for &mut T {
    fn read(&mut self) -> i32 {
        (**self).read()
    }

    fn write(&mut self, value: i32) {
        (**self).write(value)
    }
}
