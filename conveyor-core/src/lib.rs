//! Board-agnostic control logic for the stepper conveyor controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (counter, character display, stepper)
//! - Unit conversion (belt speed to RPM to step timing)
//! - Operator input adapter with clamp and change detection
//! - Display presenter for the fixed 16x2 layout
//! - Control loop state machine
//! - Quadrature decoding
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod display;
pub mod encoder;
pub mod input;
pub mod traits;
pub mod units;
