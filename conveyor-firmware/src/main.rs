//! Conveyor - Stepper Conveyor Speed Controller
//!
//! Firmware for RP2040 boards (Raspberry Pi Pico pinout). The operator sets
//! the belt speed with a rotary encoder; the controller turns it into a
//! STEP/DIR pulse train and shows speed and RPM on a 16x2 LCD.
//!
//! Two priority levels:
//! - Interrupt executor (SWI_IRQ_1): encoder edge decoding
//! - Thread mode: the blocking control loop, which busy-waits each pulse

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use conveyor_core::control::ControlLoop;
use conveyor_drivers::display::Hd44780;
use conveyor_drivers::encoder::EncoderCount;
use conveyor_drivers::stepper::StepDirDriver;

use crate::config::CONFIG;

mod config;
mod tasks;

/// Encoder count shared between the encoder task and the control loop
static ENCODER: EncoderCount = EncoderCount::new(0);

/// High-priority executor for edge-driven tasks
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[entry]
fn main() -> ! {
    info!("Conveyor firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    info!(
        "Config: {} mm/rev, reduction {}, {} pulses/rev, initial {} mm/min, {:?}",
        CONFIG.drivetrain.belt_mm_per_rev,
        CONFIG.drivetrain.belt_reduction,
        CONFIG.drivetrain.pulses_per_rev,
        CONFIG.initial_speed,
        CONFIG.direction
    );

    // LCD contrast: fixed PWM duty on GPIO6 (PWM slice 3, channel A)
    let mut contrast_config = PwmConfig::default();
    contrast_config.top = u8::MAX as u16;
    contrast_config.compare_a = CONFIG.contrast as u16;
    let _contrast = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, contrast_config);
    info!("LCD contrast set to {}/255", CONFIG.contrast);

    // Encoder on GPIO4 (A) / GPIO5 (B), open-collector with pull-ups
    let enc_a = Input::new(p.PIN_4, Pull::Up);
    let enc_b = Input::new(p.PIN_5, Pull::Up);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    spawner
        .spawn(tasks::encoder_task(enc_a, enc_b, &ENCODER))
        .unwrap();

    // Stepper driver: STEP=GPIO2, DIR=GPIO3
    let stepper = StepDirDriver::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Delay,
    );

    // HD44780 in 4-bit mode: RS=GPIO8, EN=GPIO9, D4-D7=GPIO10-13
    let lcd = Hd44780::new(
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        [
            Output::new(p.PIN_10, Level::Low),
            Output::new(p.PIN_11, Level::Low),
            Output::new(p.PIN_12, Level::Low),
            Output::new(p.PIN_13, Level::Low),
        ],
        Delay,
    );

    let mut control = ControlLoop::new(&CONFIG, &ENCODER, lcd, stepper);
    info!("Control loop running");

    loop {
        let tick = control.tick();

        if let Some(setpoint) = tick.changed {
            debug!(
                "Setpoint: {} mm/min, {} RPM, half period {:?} us",
                setpoint.speed,
                setpoint.rpm,
                setpoint.half_period_us()
            );
            if !setpoint.is_moving() {
                info!("Zero speed, step output halted");
            }
        }
    }
}
