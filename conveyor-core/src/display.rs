//! Display presenter
//!
//! Fixed layout on a 16x2 character panel:
//!
//! ```text
//!   0         1
//!   0123456789012345
//! 0 SPEED:152 mm/min
//! 1 RPM:1.14
//! ```
//!
//! Labels are drawn once. Each render blanks a value field to its full
//! width before writing, so a shorter value never leaves stale digits.
//! A value wider than its field is shown as dashes and never spills into
//! the labels.

use core::fmt::Write;

use heapless::String;

use crate::traits::CharDisplay;

/// Panel width in characters
pub const COLUMNS: u8 = 16;

/// Panel height in characters
pub const ROWS: u8 = 2;

/// A fixed value field on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Starting column
    pub column: u8,
    /// Row
    pub row: u8,
    /// Width in characters (blanked on every render)
    pub width: u8,
}

impl Field {
    const BLANK: &'static str = "                ";
    const OVERFLOW: &'static str = "----------------";

    /// Spaces covering this field
    pub fn blank(&self) -> &'static str {
        &Self::BLANK[..(self.width as usize).min(Self::BLANK.len())]
    }

    /// Text to print for `value`, replaced by dashes if it does not fit
    pub fn fit<'a>(&self, value: &'a str) -> &'a str {
        if value.len() <= self.width as usize {
            value
        } else {
            &Self::OVERFLOW[..(self.width as usize).min(Self::OVERFLOW.len())]
        }
    }
}

/// Belt speed value, between "SPEED:" and "mm/min"
pub const SPEED_FIELD: Field = Field {
    column: 6,
    row: 0,
    width: 4,
};

/// Motor RPM value, after "RPM:"
pub const RPM_FIELD: Field = Field {
    column: 4,
    row: 1,
    width: 7,
};

/// Static labels as (column, row, text)
pub const LABELS: [(u8, u8, &str); 3] = [(0, 0, "SPEED:"), (10, 0, "mm/min"), (0, 1, "RPM:")];

/// Render buffer for one formatted value
pub type ValueText = String<16>;

/// Format a belt speed
pub fn format_speed(speed: u32) -> ValueText {
    let mut text = ValueText::new();
    // u32 is at most 10 digits, always fits
    let _ = write!(text, "{}", speed);
    text
}

/// Format an RPM with two decimals
pub fn format_rpm(rpm: f32) -> ValueText {
    let mut text = ValueText::new();
    if write!(text, "{:.2}", rpm).is_err() {
        text.clear();
        let _ = text.push_str("---");
    }
    text
}

/// Presents the current setpoint on a character display
pub struct Presenter<D> {
    display: D,
}

impl<D: CharDisplay> Presenter<D> {
    /// Wrap a display
    pub fn new(display: D) -> Self {
        Self { display }
    }

    /// Initialize the panel and draw the static labels
    pub fn draw_labels(&mut self) {
        self.display.initialize(COLUMNS, ROWS);
        self.display.clear();
        for (column, row, text) in LABELS {
            self.display.set_cursor(column, row);
            self.display.print(text);
        }
    }

    /// Overwrite the speed and RPM fields
    pub fn render(&mut self, rpm: f32, speed: u32) {
        self.write_field(SPEED_FIELD, &format_speed(speed));
        self.write_field(RPM_FIELD, &format_rpm(rpm));
    }

    fn write_field(&mut self, field: Field, text: &str) {
        self.display.set_cursor(field.column, field.row);
        self.display.print(field.blank());
        self.display.set_cursor(field.column, field.row);
        self.display.print(field.fit(text));
    }

    /// Access the underlying display
    pub fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock panel that keeps a character grid and counts calls
    struct MockPanel {
        cells: [[u8; COLUMNS as usize]; ROWS as usize],
        cursor: (u8, u8),
        initialized: Option<(u8, u8)>,
        prints: usize,
    }

    impl MockPanel {
        fn new() -> Self {
            Self {
                cells: [[b'#'; COLUMNS as usize]; ROWS as usize],
                cursor: (0, 0),
                initialized: None,
                prints: 0,
            }
        }

        fn row(&self, row: usize) -> &str {
            core::str::from_utf8(&self.cells[row]).unwrap()
        }
    }

    impl CharDisplay for MockPanel {
        fn initialize(&mut self, columns: u8, rows: u8) {
            self.initialized = Some((columns, rows));
        }

        fn set_cursor(&mut self, column: u8, row: u8) {
            self.cursor = (column, row);
        }

        fn print(&mut self, text: &str) {
            self.prints += 1;
            let (mut col, row) = self.cursor;
            for b in text.bytes() {
                if (col as usize) < COLUMNS as usize {
                    self.cells[row as usize][col as usize] = b;
                }
                col += 1;
            }
            self.cursor = (col, row);
        }

        fn clear(&mut self) {
            self.cells = [[b' '; COLUMNS as usize]; ROWS as usize];
            self.cursor = (0, 0);
        }
    }

    #[test]
    fn test_labels() {
        let mut presenter = Presenter::new(MockPanel::new());
        presenter.draw_labels();

        let panel = presenter.display();
        assert_eq!(panel.initialized, Some((16, 2)));
        assert_eq!(panel.row(0), "SPEED:    mm/min");
        assert_eq!(panel.row(1), "RPM:            ");
    }

    #[test]
    fn test_render_initial_speed() {
        let mut presenter = Presenter::new(MockPanel::new());
        presenter.draw_labels();
        presenter.render(1.144_77, 152);

        let panel = presenter.display();
        assert_eq!(panel.row(0), "SPEED:152 mm/min");
        assert_eq!(panel.row(1), "RPM:1.14        ");
    }

    #[test]
    fn test_render_blanks_stale_digits() {
        let mut presenter = Presenter::new(MockPanel::new());
        presenter.draw_labels();
        presenter.render(123.456, 9999);
        assert_eq!(presenter.display().row(0), "SPEED:9999mm/min");
        assert_eq!(presenter.display().row(1), "RPM:123.46      ");

        presenter.render(0.0, 7);
        assert_eq!(presenter.display().row(0), "SPEED:7   mm/min");
        assert_eq!(presenter.display().row(1), "RPM:0.00        ");
    }

    #[test]
    fn test_wide_speed_keeps_label_intact() {
        let mut presenter = Presenter::new(MockPanel::new());
        presenter.draw_labels();

        presenter.render(1.0, 12345);
        assert_eq!(presenter.display().row(0), "SPEED:----mm/min");

        presenter.render(1.0, 7);
        assert_eq!(presenter.display().row(0), "SPEED:7   mm/min");
    }

    #[test]
    fn test_wide_rpm_stays_in_field() {
        let mut presenter = Presenter::new(MockPanel::new());
        presenter.draw_labels();

        presenter.render(123_456.78, 1);
        assert_eq!(presenter.display().row(1), "RPM:-------     ");

        presenter.render(1.5, 1);
        assert_eq!(presenter.display().row(1), "RPM:1.50        ");
    }

    #[test]
    fn test_field_fit() {
        assert_eq!(SPEED_FIELD.fit("9999"), "9999");
        assert_eq!(SPEED_FIELD.fit("10000"), "----");
        assert_eq!(RPM_FIELD.fit("1234.56"), "1234.56");
        assert_eq!(RPM_FIELD.fit("12345.67"), "-------");
    }

    #[test]
    fn test_render_touches_only_value_fields() {
        let mut presenter = Presenter::new(MockPanel::new());
        presenter.render(1.0, 1);

        // Cells outside the two fields keep the fill pattern
        let panel = presenter.display();
        assert_eq!(panel.row(0), "######1   ######");
        assert_eq!(panel.row(1), "####1.00   #####");
        assert_eq!(panel.prints, 4);
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_speed(0).as_str(), "0");
        assert_eq!(format_speed(152).as_str(), "152");
        assert_eq!(format_rpm(1.144_77).as_str(), "1.14");
        assert_eq!(format_rpm(0.0).as_str(), "0.00");
    }

    #[test]
    fn test_field_blank_width() {
        assert_eq!(SPEED_FIELD.blank(), "    ");
        assert_eq!(RPM_FIELD.blank(), "       ");
    }
}
