//! Configuration type definitions

use core::fmt;

use crate::traits::Direction;
use crate::units::Drivetrain;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counter value loaded at startup (mm/min)
pub const DEFAULT_INITIAL_SPEED: i32 = 152;

/// Default LCD contrast duty (0-255)
pub const DEFAULT_CONTRAST: u8 = 100;

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConveyorConfig {
    /// Mechanical constants of the belt drive
    pub drivetrain: Drivetrain,
    /// Speed the dial starts at (mm/min)
    pub initial_speed: i32,
    /// Fixed rotation direction
    pub direction: Direction,
    /// LCD contrast PWM duty (0-255), set once at startup
    pub contrast: u8,
}

impl ConveyorConfig {
    /// The conveyor as built
    pub const DEFAULT: Self = Self {
        drivetrain: Drivetrain::DEFAULT,
        initial_speed: DEFAULT_INITIAL_SPEED,
        direction: Direction::Clockwise,
        contrast: DEFAULT_CONTRAST,
    };

    /// Check the configuration for values the controller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let drive = &self.drivetrain;

        if !(drive.belt_mm_per_rev.is_finite() && drive.belt_mm_per_rev > 0.0) {
            return Err(ConfigError::BeltLength);
        }
        if !(drive.belt_reduction.is_finite() && drive.belt_reduction > 0.0) {
            return Err(ConfigError::BeltReduction);
        }
        if drive.pulses_per_rev == 0 {
            return Err(ConfigError::PulsesPerRev);
        }
        if self.initial_speed < 0 {
            return Err(ConfigError::NegativeInitialSpeed);
        }

        // The slowest non-zero speed has the longest hold time
        let slowest = drive.rpm_from_speed(1);
        match drive.step_timing(slowest) {
            Some(timing) if timing.hold_ns < u32::MAX => Ok(()),
            _ => Err(ConfigError::StepTimingOverflow),
        }
    }

    /// Initial speed as a clamped setpoint
    pub fn initial_speed_clamped(&self) -> u32 {
        u32::try_from(self.initial_speed).unwrap_or(0)
    }
}

impl Default for ConveyorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Belt travel per revolution is zero, negative or not a number
    BeltLength,
    /// Belt reduction is zero, negative or not a number
    BeltReduction,
    /// Pulses per revolution is zero
    PulsesPerRev,
    /// Initial speed is below zero
    NegativeInitialSpeed,
    /// Hold time at 1 mm/min does not fit the delay range
    StepTimingOverflow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::BeltLength => "belt_mm_per_rev must be a positive number",
            ConfigError::BeltReduction => "belt_reduction must be a positive number",
            ConfigError::PulsesPerRev => "pulses_per_rev must be greater than zero",
            ConfigError::NegativeInitialSpeed => "initial_speed must not be negative",
            ConfigError::StepTimingOverflow => {
                "step hold time at 1 mm/min exceeds the delay range (~4.29 s)"
            }
        };
        f.write_str(msg)
    }
}
