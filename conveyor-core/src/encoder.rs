//! Quadrature decoding
//!
//! Decodes the A/B channels of a mechanical rotary encoder into signed
//! counts. Every valid edge is one count, so a typical detented encoder
//! moves four counts per click.
//!
//! Gray sequence for clockwise rotation (A leads B):
//!
//! ```text
//! (A,B): (0,0) -> (1,0) -> (1,1) -> (0,1) -> (0,0)   +1 per edge
//! ```
//!
//! The reverse sequence counts down. A jump of both channels at once
//! means an edge was missed; it is counted as invalid and ignored.

/// Count delta indexed by `(previous << 2) | current`, state = `(A << 1) | B`
const TRANSITIONS: [i8; 16] = [
    0, -1, 1, 0, // from 00
    1, 0, 0, -1, // from 01
    -1, 0, 0, 1, // from 10
    0, 1, -1, 0, // from 11
];

/// Pack the channel levels into a 2-bit state
fn pack(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | (b as u8)
}

/// Quadrature decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    state: u8,
    invalid: u32,
}

impl QuadratureDecoder {
    /// Create a decoder from the current channel levels
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            state: pack(a, b),
            invalid: 0,
        }
    }

    /// Feed the current channel levels, returning the count delta
    ///
    /// Returns +1 (clockwise), -1 (counter-clockwise) or 0 (no change or
    /// invalid transition).
    pub fn update(&mut self, a: bool, b: bool) -> i8 {
        let next = pack(a, b);
        let prev = self.state;
        self.state = next;

        if prev ^ next == 0b11 {
            self.invalid = self.invalid.wrapping_add(1);
            return 0;
        }

        TRANSITIONS[((prev << 2) | next) as usize]
    }

    /// Number of invalid (double-edge) transitions seen
    pub fn invalid_transitions(&self) -> u32 {
        self.invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CW: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];

    fn run(decoder: &mut QuadratureDecoder, seq: impl IntoIterator<Item = (bool, bool)>) -> i32 {
        seq.into_iter()
            .map(|(a, b)| decoder.update(a, b) as i32)
            .sum()
    }

    #[test]
    fn test_clockwise_detent() {
        let mut decoder = QuadratureDecoder::new(false, false);
        assert_eq!(run(&mut decoder, CW), 4);
    }

    #[test]
    fn test_counter_clockwise_detent() {
        let mut decoder = QuadratureDecoder::new(false, false);
        let ccw = CW.iter().rev().skip(1).copied().chain([(false, false)]);
        assert_eq!(run(&mut decoder, ccw), -4);
    }

    #[test]
    fn test_each_edge_counts_one() {
        let mut decoder = QuadratureDecoder::new(false, false);
        for step in CW {
            assert_eq!(decoder.update(step.0, step.1), 1);
        }
    }

    #[test]
    fn test_bounce_nets_zero() {
        // A chatters on the first edge, then settles back
        let mut decoder = QuadratureDecoder::new(false, false);
        let bounce = [(true, false), (false, false), (true, false), (false, false)];
        assert_eq!(run(&mut decoder, bounce), 0);
    }

    #[test]
    fn test_no_change_is_zero() {
        let mut decoder = QuadratureDecoder::new(true, true);
        assert_eq!(decoder.update(true, true), 0);
        assert_eq!(decoder.invalid_transitions(), 0);
    }

    #[test]
    fn test_double_edge_ignored() {
        let mut decoder = QuadratureDecoder::new(false, false);
        assert_eq!(decoder.update(true, true), 0);
        assert_eq!(decoder.invalid_transitions(), 1);

        // Decoding resumes from the new state
        assert_eq!(decoder.update(false, true), 1);
    }
}
