//! Unit conversion
//!
//! Belt speed (mm/min) to motor RPM, and RPM to the hold time of one phase
//! of a step pulse. All functions are pure.
//!
//! ```text
//! rpm         = speed / belt_mm_per_rev / belt_reduction
//! half_period = 1e6 / ((rpm * pulses_per_rev) / 60) / 2      [µs]
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Belt travel per belt-drive revolution (mm)
pub const BELT_MM_PER_REV: f32 = 239.0;

/// Ratio between motor shaft and belt-drive revolutions
pub const BELT_REDUCTION: f32 = 0.555_555_555;

/// Microsteps per motor revolution as set on the driver
pub const PULSES_PER_REV: u32 = 12_800;

/// Mechanical constants of the belt drive
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Drivetrain {
    /// Belt travel per belt-drive revolution (mm)
    pub belt_mm_per_rev: f32,
    /// Motor to belt-drive ratio
    pub belt_reduction: f32,
    /// Microsteps per motor revolution
    pub pulses_per_rev: u32,
}

impl Drivetrain {
    /// The conveyor as built
    pub const DEFAULT: Self = Self {
        belt_mm_per_rev: BELT_MM_PER_REV,
        belt_reduction: BELT_REDUCTION,
        pulses_per_rev: PULSES_PER_REV,
    };

    /// Motor RPM for a belt speed in mm/min
    pub fn rpm_from_speed(&self, speed: u32) -> f32 {
        speed as f32 / self.belt_mm_per_rev / self.belt_reduction
    }

    /// Hold time of one pulse phase in microseconds
    ///
    /// Must not be called with `rpm == 0`; the result is infinite.
    /// Use [`Drivetrain::step_timing`] where zero is possible.
    pub fn half_period_us_from_rpm(&self, rpm: f32) -> f32 {
        1_000_000.0 / ((rpm * self.pulses_per_rev as f32) / 60.0) / 2.0
    }

    /// Step timing for an RPM, or `None` when the motor must not move
    pub fn step_timing(&self, rpm: f32) -> Option<StepTiming> {
        if rpm.is_nan() || rpm <= 0.0 {
            return None;
        }

        let half_period_us = self.half_period_us_from_rpm(rpm);
        if !half_period_us.is_finite() {
            return None;
        }

        Some(StepTiming::from_half_period_us(half_period_us))
    }
}

impl Default for Drivetrain {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Timing of one step pulse
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTiming {
    /// Hold time of each phase (µs)
    pub half_period_us: f32,
    /// Same hold time in whole nanoseconds, ready for the delay provider
    pub hold_ns: u32,
}

impl StepTiming {
    /// Build from a half period in microseconds
    ///
    /// The nanosecond value is rounded up and saturates at `u32::MAX`
    /// (about 4.3 s per phase). Half periods below 1 ns still hold for
    /// 1 ns, so every pulse has a nonzero width.
    pub fn from_half_period_us(half_period_us: f32) -> Self {
        let ns = half_period_us * 1000.0;
        let whole = ns as u32;
        let hold_ns = if (whole as f32) < ns {
            whole.saturating_add(1)
        } else {
            whole
        };

        Self {
            half_period_us,
            hold_ns: hold_ns.max(1),
        }
    }

    /// Step frequency in Hz
    pub fn frequency_hz(&self) -> f32 {
        1_000_000.0 / (self.half_period_us * 2.0)
    }
}

/// Motor RPM for a belt speed in mm/min, using the built drivetrain
pub fn rpm_from_speed(speed: u32) -> f32 {
    Drivetrain::DEFAULT.rpm_from_speed(speed)
}

/// Hold time of one pulse phase in microseconds, using the built drivetrain
///
/// Must not be called with `rpm == 0`.
pub fn half_period_us_from_rpm(rpm: f32) -> f32 {
    Drivetrain::DEFAULT.half_period_us_from_rpm(rpm)
}
