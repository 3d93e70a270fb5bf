//! Embassy async tasks
//!
//! Tasks run on the high-priority interrupt executor so they preempt the
//! blocking control loop in thread mode.

pub mod encoder;

pub use encoder::encoder_task;
