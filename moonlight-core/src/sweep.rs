//! Power-on self test
//!
//! Runs a single lit pixel down the strip once per color so a broken LED or
//! a wrong color order is visible before the board accepts problems.

use embedded_hal_async::delay::DelayNs;
use moonlight_hal::{LedStrip, StripError, RGB8, OFF};

/// Time each pixel stays lit during the sweep
pub const SWEEP_STEP_MS: u32 = 10;

/// Sweep every color across the whole strip, then turn it off
pub async fn color_sweep<S: LedStrip, D: DelayNs>(
    strip: &mut S,
    delay: &mut D,
    colors: &[RGB8],
    step_ms: u32,
) -> Result<(), StripError> {
    let count = strip.pixel_count();

    for &color in colors {
        for index in 0..count {
            strip.clear_to(OFF);
            strip.set_pixel(index, color)?;
            strip.show().await?;
            delay.delay_ms(step_ms).await;
        }
    }

    strip.clear_to(OFF);
    strip.show().await
}
