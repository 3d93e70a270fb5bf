//! Rotary encoder task
//!
//! Wakes on every edge of either channel and feeds the levels through the
//! quadrature decoder into the shared count read by the control loop.

use defmt::*;
use embassy_futures::select::select;
use embassy_rp::gpio::Input;

use conveyor_core::encoder::QuadratureDecoder;
use conveyor_drivers::encoder::EncoderCount;

/// Encoder decoding task
///
/// Must run at a higher priority than the control loop; an edge missed
/// while a step pulse holds is a lost count.
#[embassy_executor::task]
pub async fn encoder_task(
    mut a: Input<'static>,
    mut b: Input<'static>,
    count: &'static EncoderCount,
) {
    info!("Encoder task started");

    let mut decoder = QuadratureDecoder::new(a.is_high(), b.is_high());
    let mut reported_invalid = 0;

    loop {
        select(a.wait_for_any_edge(), b.wait_for_any_edge()).await;

        let delta = count.update(&mut decoder, a.is_high(), b.is_high());
        if delta != 0 {
            trace!("Encoder count: {}", count.get());
        }

        let invalid = decoder.invalid_transitions();
        if invalid != reported_invalid {
            warn!("Encoder skipped an edge ({} total)", invalid);
            reported_invalid = invalid;
        }
    }
}
