//! HD44780 character LCD driver
//!
//! Drives HD44780-compatible panels (16x2, 20x4) over the 4-bit parallel
//! bus: RS, EN and D4-D7. R/W is tied to ground, so the busy flag is never
//! read and every command is followed by a worst-case delay instead.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use conveyor_core::traits::CharDisplay;

use crate::infallible;

/// HD44780 commands
#[allow(dead_code)]
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const ENTRY_MODE: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_DDRAM_ADDR: u8 = 0x80;

    // Entry mode flags
    pub const ENTRY_INCREMENT: u8 = 0x02;

    // Display control flags
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;

    // Function set flags
    pub const TWO_LINES: u8 = 0x08;
    pub const FONT_5X10: u8 = 0x04;
}

/// DDRAM start address of each row
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Power-on settle time before the first command
const POWER_ON_DELAY_US: u32 = 50_000;

/// Execution time of ordinary commands and data writes
const COMMAND_DELAY_US: u32 = 50;

/// Execution time of clear and home
const CLEAR_DELAY_US: u32 = 2_000;

/// DDRAM address for a cursor position
///
/// Rows past the last physical row wrap onto the last row.
pub fn ddram_address(column: u8, row: u8, rows: u8) -> u8 {
    let row = row.min(rows.saturating_sub(1)).min(ROW_OFFSETS.len() as u8 - 1);
    ROW_OFFSETS[row as usize].wrapping_add(column)
}

/// HD44780 driver on a 4-bit bus
///
/// `data` holds D4, D5, D6, D7 in that order.
pub struct Hd44780<RS, EN, P, D> {
    rs: RS,
    en: EN,
    data: [P; 4],
    delay: D,
    columns: u8,
    rows: u8,
}

impl<RS, EN, P, D> Hd44780<RS, EN, P, D>
where
    RS: OutputPin<Error = Infallible>,
    EN: OutputPin<Error = Infallible>,
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Create a new driver
    ///
    /// The panel is not touched until [`CharDisplay::initialize`] is called.
    pub fn new(rs: RS, en: EN, data: [P; 4], delay: D) -> Self {
        Self {
            rs,
            en,
            data,
            delay,
            columns: 16,
            rows: 2,
        }
    }

    /// Panel geometry as (columns, rows)
    pub fn dimensions(&self) -> (u8, u8) {
        (self.columns, self.rows)
    }

    /// Send a command byte
    pub fn command(&mut self, byte: u8) {
        infallible(self.rs.set_low());
        self.write_byte(byte);
        let wait = if byte == cmd::CLEAR || byte == cmd::HOME {
            CLEAR_DELAY_US
        } else {
            COMMAND_DELAY_US
        };
        self.delay.delay_us(wait);
    }

    /// Send a data byte (character)
    pub fn write_char(&mut self, byte: u8) {
        infallible(self.rs.set_high());
        self.write_byte(byte);
        self.delay.delay_us(COMMAND_DELAY_US);
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            infallible(pin.set_state((nibble & (1 << bit) != 0).into()));
        }
        self.pulse_enable();
    }

    /// Latch the data lines on the falling edge of EN
    fn pulse_enable(&mut self) {
        infallible(self.en.set_low());
        self.delay.delay_us(1);
        infallible(self.en.set_high());
        // Enable pulse width >= 450 ns
        self.delay.delay_us(1);
        infallible(self.en.set_low());
        self.delay.delay_us(1);
    }
}

impl<RS, EN, P, D> CharDisplay for Hd44780<RS, EN, P, D>
where
    RS: OutputPin<Error = Infallible>,
    EN: OutputPin<Error = Infallible>,
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    fn initialize(&mut self, columns: u8, rows: u8) {
        self.columns = columns;
        self.rows = rows.max(1);

        self.delay.delay_us(POWER_ON_DELAY_US);
        infallible(self.rs.set_low());
        infallible(self.en.set_low());

        // Reset by instruction: force 8-bit mode three times, then 4-bit
        self.write_nibble(0x03);
        self.delay.delay_us(4_500);
        self.write_nibble(0x03);
        self.delay.delay_us(4_500);
        self.write_nibble(0x03);
        self.delay.delay_us(150);
        self.write_nibble(0x02);
        self.delay.delay_us(COMMAND_DELAY_US);

        let lines = if self.rows > 1 { cmd::TWO_LINES } else { 0 };
        self.command(cmd::FUNCTION_SET | lines);
        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON);
        self.command(cmd::CLEAR);
        self.command(cmd::ENTRY_MODE | cmd::ENTRY_INCREMENT);
    }

    fn set_cursor(&mut self, column: u8, row: u8) {
        let addr = ddram_address(column, row, self.rows);
        self.command(cmd::SET_DDRAM_ADDR | addr);
    }

    fn print(&mut self, text: &str) {
        for byte in text.bytes() {
            // Outside printable ASCII the character ROMs disagree
            let byte = if (0x20..0x7F).contains(&byte) { byte } else { b'?' };
            self.write_char(byte);
        }
    }

    fn clear(&mut self) {
        self.command(cmd::CLEAR);
    }
}
