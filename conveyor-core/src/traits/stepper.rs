//! Stepper output trait
//!
//! Abstracts the STEP/DIR lines of a stepper driver (A4988, DRV8825,
//! TMC2209 in standalone mode, etc.)

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Clockwise rotation (DIR line HIGH)
    #[default]
    Clockwise,
    /// Counter-clockwise rotation (DIR line LOW)
    CounterClockwise,
}

impl Direction {
    /// Level of the DIR line for this direction
    pub fn is_high(self) -> bool {
        matches!(self, Direction::Clockwise)
    }
}

/// Trait for step/direction stepper outputs
///
/// Implementations own the STEP and DIR lines plus a blocking delay.
pub trait StepperOutput {
    /// Drive the DIR line
    fn set_direction(&mut self, dir: Direction);

    /// Emit one full step pulse
    ///
    /// Drives STEP high, holds for `hold_ns`, drives STEP low and holds for
    /// `hold_ns` again. Blocks for the whole pulse.
    fn step(&mut self, hold_ns: u32);
}

impl<T: StepperOutput + ?Sized> StepperOutput for &mut T {
    fn set_direction(&mut self, dir: Direction) {
        (**self).set_direction(dir)
    }

    fn step(&mut self, hold_ns: u32) {
        (**self).step(hold_ns)
    }
}
