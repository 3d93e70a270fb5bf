//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! and hardware-specific implementations.

pub mod counter;
pub mod display;
pub mod stepper;

pub use counter::CounterSource;
pub use display::CharDisplay;
pub use stepper::{Direction, StepperOutput};
