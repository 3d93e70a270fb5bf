//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in conveyor-core, built on embedded-hal 1.0:
//!
//! - Stepper output (bit-banged STEP/DIR with blocking delay)
//! - Character display (HD44780 in 4-bit mode)
//! - Encoder counter (lock-free, shared with an interrupt-driven decoder)
//!
//! Pins are bound with `Error = Infallible`. The control loop has no error
//! path, so only pins that cannot fail are accepted.

#![no_std]
#![deny(unsafe_code)]

use core::convert::Infallible;

pub mod display;
pub mod encoder;
pub mod stepper;

/// Unwrap a result that cannot hold an error
#[inline(always)]
pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
