//! Control loop
//!
//! Ties operator input, unit conversion, the display and the stepper
//! together. One iteration:
//!
//! 1. Read the clamped speed from the operator input.
//! 2. If it changed: recompute the setpoint and redraw the display.
//! 3. If the setpoint has step timing (RPM > 0): emit one step pulse.
//!    At zero speed nothing touches the STEP line and nothing blocks.
//!
//! The loop is single-threaded and blocking. The pulse hold times are the
//! only waits.

use crate::config::ConveyorConfig;
use crate::display::Presenter;
use crate::input::OperatorInput;
use crate::traits::{CharDisplay, CounterSource, StepperOutput};
use crate::units::{Drivetrain, StepTiming};

/// Speed setpoint and the values derived from it
///
/// Always rebuilt as a whole from the speed, never edited field by field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoint {
    /// Belt speed (mm/min)
    pub speed: u32,
    /// Motor speed (RPM)
    pub rpm: f32,
    /// Step timing, `None` when the motor must stand still
    pub timing: Option<StepTiming>,
}

impl Setpoint {
    /// Derive a setpoint from a belt speed
    pub fn from_speed(drivetrain: &Drivetrain, speed: u32) -> Self {
        let rpm = drivetrain.rpm_from_speed(speed);
        Self {
            speed,
            rpm,
            timing: drivetrain.step_timing(rpm),
        }
    }

    /// Stationary setpoint
    pub fn stopped(drivetrain: &Drivetrain) -> Self {
        Self::from_speed(drivetrain, 0)
    }

    /// Check if this setpoint permits motion
    pub fn is_moving(&self) -> bool {
        self.timing.is_some()
    }

    /// Half period in microseconds, if moving
    pub fn half_period_us(&self) -> Option<f32> {
        self.timing.map(|t| t.half_period_us)
    }
}

/// Outcome of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// New setpoint, if the operator input changed this iteration
    pub changed: Option<Setpoint>,
    /// Whether a step pulse was emitted
    pub stepped: bool,
}

/// Control loop context
///
/// Owns every collaborator and the setpoint. Constructed once at startup.
pub struct ControlLoop<C, D, S> {
    input: OperatorInput<C>,
    presenter: Presenter<D>,
    stepper: S,
    drivetrain: Drivetrain,
    setpoint: Setpoint,
}

impl<C, D, S> ControlLoop<C, D, S>
where
    C: CounterSource,
    D: CharDisplay,
    S: StepperOutput,
{
    /// Bring up the controller
    ///
    /// Sets the fixed direction, draws the display labels and presets the
    /// counter to the configured initial speed. The setpoint starts at zero,
    /// so the first [`tick`](Self::tick) adopts the initial speed and
    /// renders it.
    pub fn new(config: &ConveyorConfig, counter: C, display: D, mut stepper: S) -> Self {
        stepper.set_direction(config.direction);

        let mut presenter = Presenter::new(display);
        presenter.draw_labels();

        let mut input = OperatorInput::new(counter);
        input.preset(config.initial_speed_clamped());

        Self {
            input,
            presenter,
            stepper,
            drivetrain: config.drivetrain,
            setpoint: Setpoint::stopped(&config.drivetrain),
        }
    }

    /// Run one iteration
    pub fn tick(&mut self) -> Tick {
        let changed = self.input.poll_change(self.setpoint.speed).map(|speed| {
            self.setpoint = Setpoint::from_speed(&self.drivetrain, speed);
            self.presenter.render(self.setpoint.rpm, self.setpoint.speed);
            self.setpoint
        });

        let stepped = match self.setpoint.timing {
            Some(timing) => {
                self.stepper.step(timing.hold_ns);
                true
            }
            None => false,
        };

        Tick { changed, stepped }
    }

    /// Current setpoint
    pub fn setpoint(&self) -> &Setpoint {
        &self.setpoint
    }

    /// Access the stepper output
    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    /// Access the display
    pub fn display(&self) -> &D {
        self.presenter.display()
    }

    /// Access the counter source
    pub fn counter(&self) -> &C {
        self.input.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Direction;
    use core::cell::Cell;

    /// Mock counter shared with the test through a cell
    struct MockCounter<'a> {
        value: &'a Cell<i32>,
    }

    impl CounterSource for MockCounter<'_> {
        fn read(&mut self) -> i32 {
            self.value.get()
        }

        fn write(&mut self, value: i32) {
            self.value.set(value);
        }
    }

    /// Mock display that counts renders of the speed field
    #[derive(Default)]
    struct MockDisplay {
        initialized: bool,
        last_text: heapless::String<16>,
        speed_renders: usize,
    }

    impl CharDisplay for MockDisplay {
        fn initialize(&mut self, _columns: u8, _rows: u8) {
            self.initialized = true;
        }

        fn set_cursor(&mut self, column: u8, row: u8) {
            if (column, row) == (6, 0) {
                self.speed_renders += 1;
            }
        }

        fn print(&mut self, text: &str) {
            self.last_text.clear();
            let _ = self.last_text.push_str(text);
        }

        fn clear(&mut self) {}
    }

    /// Mock stepper that records pulses
    #[derive(Default)]
    struct MockStepper {
        direction: Option<Direction>,
        steps: usize,
        last_hold_ns: u32,
    }

    impl StepperOutput for MockStepper {
        fn set_direction(&mut self, dir: Direction) {
            self.direction = Some(dir);
        }

        fn step(&mut self, hold_ns: u32) {
            self.steps += 1;
            self.last_hold_ns = hold_ns;
        }
    }

    fn controller(value: &Cell<i32>) -> ControlLoop<MockCounter<'_>, MockDisplay, MockStepper> {
        ControlLoop::new(
            &ConveyorConfig::default(),
            MockCounter { value },
            MockDisplay::default(),
            MockStepper::default(),
        )
    }

    /// Each render moves the cursor to the speed field twice (blank + value)
    fn renders(ctl: &ControlLoop<MockCounter<'_>, MockDisplay, MockStepper>) -> usize {
        ctl.display().speed_renders / 2
    }

    #[test]
    fn test_startup() {
        let value = Cell::new(0);
        let ctl = controller(&value);

        assert_eq!(value.get(), 152);
        assert_eq!(ctl.stepper().direction, Some(Direction::Clockwise));
        assert!(ctl.display().initialized);
        assert_eq!(ctl.setpoint().speed, 0);
        assert!(!ctl.setpoint().is_moving());
        assert_eq!(renders(&ctl), 0);
    }

    #[test]
    fn test_first_tick_adopts_initial_speed() {
        let value = Cell::new(0);
        let mut ctl = controller(&value);

        let tick = ctl.tick();
        let setpoint = tick.changed.expect("initial speed should register as a change");
        assert_eq!(setpoint.speed, 152);
        assert!((setpoint.rpm - 1.1448).abs() < 1e-3);
        let half = setpoint.half_period_us().unwrap();
        assert!((half - 2047.35).abs() < 0.5);
        assert!(tick.stepped);

        assert_eq!(ctl.stepper().steps, 1);
        assert_eq!(ctl.stepper().last_hold_ns, setpoint.timing.unwrap().hold_ns);
        assert_eq!(ctl.display().last_text.as_str(), "1.14");
    }

    #[test]
    fn test_render_only_on_change() {
        let value = Cell::new(0);
        let mut ctl = controller(&value);

        ctl.tick();
        let tick = ctl.tick();
        assert_eq!(tick.changed, None);
        assert!(tick.stepped);
        assert_eq!(renders(&ctl), 1);
        assert_eq!(ctl.stepper().steps, 2);

        value.set(300);
        assert!(ctl.tick().changed.is_some());
        ctl.tick();
        assert_eq!(renders(&ctl), 2);
    }

    #[test]
    fn test_negative_input_stops_motor() {
        let value = Cell::new(0);
        let mut ctl = controller(&value);
        ctl.tick();
        let steps_before = ctl.stepper().steps;

        value.set(-5);
        let tick = ctl.tick();
        assert_eq!(tick.changed.map(|s| s.speed), Some(0));
        assert!(!tick.stepped);
        assert_eq!(value.get(), 0);
        assert_eq!(ctl.setpoint().rpm, 0.0);
        assert_eq!(ctl.display().last_text.as_str(), "0.00");

        for _ in 0..10 {
            let tick = ctl.tick();
            assert_eq!(tick.changed, None);
            assert!(!tick.stepped);
        }
        assert_eq!(ctl.stepper().steps, steps_before);

        // Motion resumes when the dial comes back up
        value.set(10);
        assert!(ctl.tick().stepped);
    }

    #[test]
    fn test_zero_initial_speed_never_steps() {
        let value = Cell::new(0);
        let config = ConveyorConfig {
            initial_speed: 0,
            ..ConveyorConfig::default()
        };
        let mut ctl = ControlLoop::new(
            &config,
            MockCounter { value: &value },
            MockDisplay::default(),
            MockStepper::default(),
        );

        for _ in 0..5 {
            let tick = ctl.tick();
            assert_eq!(tick.changed, None);
            assert!(!tick.stepped);
        }
        assert_eq!(ctl.stepper().steps, 0);
        assert_eq!(renders(&ctl), 0);
    }

    #[test]
    fn test_faster_speed_shorter_hold() {
        let value = Cell::new(0);
        let mut ctl = controller(&value);

        ctl.tick();
        let slow = ctl.stepper().last_hold_ns;

        value.set(1520);
        ctl.tick();
        let fast = ctl.stepper().last_hold_ns;

        assert!(fast < slow);
        // Ten times the speed, a tenth of the hold time
        assert!((slow / 10).abs_diff(fast) <= 5);
    }

    #[test]
    fn test_setpoint_from_speed() {
        let drive = Drivetrain::DEFAULT;
        assert_eq!(Setpoint::stopped(&drive).timing, None);
        assert_eq!(Setpoint::stopped(&drive).rpm, 0.0);

        let sp = Setpoint::from_speed(&drive, 239);
        assert!(sp.is_moving());
        // One belt revolution per minute through the 0.5556 reduction
        assert!((sp.rpm - 1.8).abs() < 1e-3);
    }
}
