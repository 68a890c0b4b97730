//! Addressable LED strip abstractions
//!
//! Pixels are written into a buffer and only reach the LEDs on
//! [`LedStrip::show`], so a whole frame appears at once.

pub use smart_leds::RGB8;

/// All channels off
pub const OFF: RGB8 = RGB8::new(0, 0, 0);

/// Errors from strip operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripError {
    /// Pixel index is past the end of the strip
    IndexOutOfRange,
    /// Sending the buffer to the LEDs failed
    Transfer,
}

/// LED strip with a frame buffer
pub trait LedStrip {
    /// Number of physical LEDs
    fn pixel_count(&self) -> usize;

    /// Set one pixel in the buffer
    fn set_pixel(&mut self, index: usize, color: RGB8) -> Result<(), StripError>;

    /// Set every pixel in the buffer to `color`
    fn clear_to(&mut self, color: RGB8);

    /// Send the buffer to the LEDs
    fn show(&mut self) -> impl core::future::Future<Output = Result<(), StripError>>;
}

/// Fixed-size pixel buffer
///
/// Chip-specific strips embed one of these and push it out in `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer<const N: usize> {
    pixels: [RGB8; N],
}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBuffer<N> {
    /// Create a buffer with every pixel off
    pub const fn new() -> Self {
        Self { pixels: [OFF; N] }
    }

    /// Number of pixels
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Set one pixel
    pub fn set(&mut self, index: usize, color: RGB8) -> Result<(), StripError> {
        let pixel = self.pixels.get_mut(index).ok_or(StripError::IndexOutOfRange)?;
        *pixel = color;
        Ok(())
    }

    /// Read one pixel
    pub fn get(&self, index: usize) -> Option<RGB8> {
        self.pixels.get(index).copied()
    }

    /// Set every pixel
    pub fn fill(&mut self, color: RGB8) {
        self.pixels.fill(color);
    }

    /// All pixels, in strip order
    pub fn pixels(&self) -> &[RGB8; N] {
        &self.pixels
    }
}
