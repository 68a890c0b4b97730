//! defmt logging for session diagnostics

use defmt::*;

use moonlight_core::{HoldStyle, Observer, RenderError, RenderReport};
use moonlight_protocol::{ConfigOption, FrameError, Hold, RenderOptions};

/// Logs every step of a problem render over RTT
pub struct LogObserver;

impl Observer for LogObserver {
    fn config_selected(&mut self, option: ConfigOption) {
        match option {
            ConfigOption::AuxiliaryLeds => info!("Auxiliary LEDs enabled"),
            ConfigOption::NoOp => debug!("Config option: none"),
        }
    }

    fn frame_dropped(&mut self, error: FrameError) {
        warn!("Frame dropped: {:?}", error);
    }

    fn problem_received(&mut self, payload: &[u8], options: RenderOptions) {
        info!("---------");
        match core::str::from_utf8(payload) {
            Ok(problem) => info!("Problem string: {}", problem),
            Err(_) => info!("Problem string (raw): {=[u8]:x}", payload),
        }
        if options.auxiliary_leds {
            info!("Auxiliary LEDs:");
        }
    }

    fn auxiliary_lit(&mut self, hold: Hold, led: usize) {
        info!("{}{} --> {} (yellow)", hold.hold_type.tag() as char, hold.number, led);
    }

    fn primary_lit(&mut self, hold: Hold, led: usize, style: HoldStyle) {
        info!(
            "{}{} --> {} ({})",
            hold.hold_type.tag() as char,
            hold.number,
            led,
            style.label
        );
    }

    fn hold_skipped(&mut self, position: usize, error: RenderError) {
        warn!("Hold {} skipped: {:?}", position, error);
    }

    fn problem_rendered(&mut self, report: &RenderReport) {
        debug!("Rendered: {:?}", report);
    }
}
