//! PIO-driven WS2812 strip
//!
//! Wraps embassy-rp's WS2812 PIO program. Pixels are kept in a
//! [`FrameBuffer`] and pushed out by DMA on [`LedStrip::show`]. The color
//! order is a type parameter so a strip wired GRB or RGB needs no runtime
//! swizzling.

use embassy_rp::pio::Instance;
use embassy_rp::pio_programs::ws2812::{PioWs2812, RgbColorOrder};

use moonlight_hal::{FrameBuffer, LedStrip, StripError, RGB8};

/// WS2812 strip of `N` LEDs on PIO state machine `S`
pub struct PioStrip<'d, P: Instance, const S: usize, const N: usize, ORDER: RgbColorOrder> {
    driver: PioWs2812<'d, P, S, N, ORDER>,
    buffer: FrameBuffer<N>,
}

impl<'d, P: Instance, const S: usize, const N: usize, ORDER: RgbColorOrder> PioStrip<'d, P, S, N, ORDER> {
    /// Create a strip with every pixel off
    ///
    /// Nothing is sent until the first [`LedStrip::show`].
    pub fn new(driver: PioWs2812<'d, P, S, N, ORDER>) -> Self {
        Self {
            driver,
            buffer: FrameBuffer::new(),
        }
    }

    /// Current buffer contents
    pub fn pixels(&self) -> &[RGB8; N] {
        self.buffer.pixels()
    }
}

impl<'d, P: Instance, const S: usize, const N: usize, ORDER: RgbColorOrder> LedStrip
    for PioStrip<'d, P, S, N, ORDER>
{
    fn pixel_count(&self) -> usize {
        N
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) -> Result<(), StripError> {
        self.buffer.set(index, color)
    }

    fn clear_to(&mut self, color: RGB8) {
        self.buffer.fill(color);
    }

    async fn show(&mut self) -> Result<(), StripError> {
        self.driver.write(self.buffer.pixels()).await;
        Ok(())
    }
}
