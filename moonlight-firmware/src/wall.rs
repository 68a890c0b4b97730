//! Wall layout generated from wall.toml
//!
//! `build.rs` writes the constants and LED tables; this module adds the
//! types that depend on them.

use embassy_rp::peripherals::PIO0;
#[cfg(not(color_order_rgb))]
use embassy_rp::pio_programs::ws2812::Grb;
#[cfg(color_order_rgb)]
use embassy_rp::pio_programs::ws2812::Rgb;

use moonlight_core::Palette;
use moonlight_hal::LinkConfig;
use moonlight_hal_rp2040::PioStrip;

include!(concat!(env!("OUT_DIR"), "/wall_layout.rs"));

#[cfg(not(color_order_rgb))]
pub type ColorOrder = Grb;
#[cfg(color_order_rgb)]
pub type ColorOrder = Rgb;

/// PIO state machine driving the strip
pub const STRIP_SM: usize = 0;

/// The strip behind the wall
pub type WallStrip = PioStrip<'static, PIO0, STRIP_SM, PIXEL_COUNT, ColorOrder>;

/// Hold colors at the configured brightness
pub const PALETTE: Palette = Palette::new(HOLD_BRIGHTNESS, AUXILIARY_BRIGHTNESS);

/// UART speed and advertised name of the BLE module
pub const LINK: LinkConfig = LinkConfig {
    baudrate: LINK_BAUDRATE,
    device_name: DEVICE_NAME,
};
