//! Character display trait
//!
//! Abstracts a fixed-width text surface such as an HD44780 16x2 LCD.

/// Trait for character displays
///
/// Writes are assumed to always succeed. Coordinates are zero-based,
/// column first to match the cursor command of common LCD controllers.
pub trait CharDisplay {
    /// Bring up the display with the given geometry
    fn initialize(&mut self, columns: u8, rows: u8);

    /// Move the write cursor
    ///
    /// - `column`: Column number (0-15 on a 16x2 panel)
    /// - `row`: Row number (0-1 on a 16x2 panel)
    fn set_cursor(&mut self, column: u8, row: u8);

    /// Write text at the cursor, advancing it
    fn print(&mut self, text: &str);

    /// Clear the entire screen and home the cursor
    fn clear(&mut self);
}
