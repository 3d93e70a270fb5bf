//! STEP/DIR stepper output
//!
//! Drives any step/direction driver (A4988, DRV8825, TMC2209 standalone)
//! from two GPIO lines. Each step is a blocking square pulse: STEP high for
//! the hold time, then low for the same hold time.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use conveyor_core::traits::{Direction, StepperOutput};

use crate::infallible;

/// Bit-banged step/direction driver
pub struct StepDirDriver<STEP, DIR, D> {
    step_pin: STEP,
    dir_pin: DIR,
    delay: D,
    direction: Direction,
    /// Steps emitted since construction
    steps: u32,
}

impl<STEP, DIR, D> StepDirDriver<STEP, DIR, D>
where
    STEP: OutputPin<Error = Infallible>,
    DIR: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Create a new driver
    ///
    /// STEP starts low. DIR is left alone until [`set_direction`] is called.
    ///
    /// [`set_direction`]: StepperOutput::set_direction
    pub fn new(mut step_pin: STEP, dir_pin: DIR, delay: D) -> Self {
        infallible(step_pin.set_low());

        Self {
            step_pin,
            dir_pin,
            delay,
            direction: Direction::Clockwise,
            steps: 0,
        }
    }

    /// Get the last direction set
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Steps emitted so far (wrapping)
    pub fn steps(&self) -> u32 {
        self.steps
    }
}

impl<STEP, DIR, D> StepperOutput for StepDirDriver<STEP, DIR, D>
where
    STEP: OutputPin<Error = Infallible>,
    DIR: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    fn set_direction(&mut self, dir: Direction) {
        self.direction = dir;
        infallible(self.dir_pin.set_state(dir.is_high().into()));
    }

    fn step(&mut self, hold_ns: u32) {
        infallible(self.step_pin.set_high());
        self.delay.delay_ns(hold_ns);
        infallible(self.step_pin.set_low());
        self.delay.delay_ns(hold_ns);
        self.steps = self.steps.wrapping_add(1);
    }
}
