//! Problem renderer
//!
//! Paints one problem onto the strip in a fixed order:
//!
//! 1. clear every LED
//! 2. auxiliary pass (only if enabled for the frame)
//! 3. primary pass
//! 4. flush
//!
//! The primary pass runs last so a hold's own color always wins over an
//! auxiliary indicator that lands on the same LED, whatever the order of
//! the holds in the payload.

use moonlight_hal::{LedStrip, StripError, OFF};
use moonlight_protocol::{decode, DecodeError, Hold, RenderOptions};

use crate::observer::Observer;
use crate::registry::{HoldRegistry, LookupError};

/// Reasons a single hold is not drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Token could not be decoded
    Decode(DecodeError),
    /// Hold number has no registry entry
    Lookup(LookupError),
    /// Registry points past the end of the strip
    LedOutOfRange { hold: Hold, index: i32 },
}

impl From<DecodeError> for RenderError {
    fn from(e: DecodeError) -> Self {
        RenderError::Decode(e)
    }
}

impl From<LookupError> for RenderError {
    fn from(e: LookupError) -> Self {
        RenderError::Lookup(e)
    }
}

/// Summary of one render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderReport {
    /// Holds drawn in their own color
    pub primary_lit: u16,
    /// Auxiliary indicators drawn (some may be covered by the primary pass)
    pub auxiliary_lit: u16,
    /// Holds not drawn at all
    pub skipped: u16,
    /// Auxiliary indicators that pointed off the strip
    pub auxiliary_skipped: u16,
}

/// Renders problems using one wall's registry
#[derive(Debug, Clone, Copy)]
pub struct RenderPipeline<'r> {
    registry: &'r HoldRegistry<'r>,
}

impl<'r> RenderPipeline<'r> {
    pub fn new(registry: &'r HoldRegistry<'r>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HoldRegistry<'r> {
        self.registry
    }

    /// Render a problem and flush it to the strip
    pub async fn render<S: LedStrip, O: Observer>(
        &self,
        strip: &mut S,
        payload: &[u8],
        options: RenderOptions,
        observer: &mut O,
    ) -> Result<RenderReport, StripError> {
        let report = self.paint(strip, payload, options, observer);
        strip.show().await?;
        observer.problem_rendered(&report);
        Ok(report)
    }

    /// Fill the strip buffer for a problem without flushing
    pub fn paint<S: LedStrip, O: Observer>(
        &self,
        strip: &mut S,
        payload: &[u8],
        options: RenderOptions,
        observer: &mut O,
    ) -> RenderReport {
        let mut report = RenderReport::default();

        strip.clear_to(OFF);

        if options.auxiliary_leds {
            self.auxiliary_pass(strip, payload, &mut report, observer);
        }
        self.primary_pass(strip, payload, &mut report, observer);

        report
    }

    /// Decode and registry errors are left for the primary pass to report.
    fn auxiliary_pass<S: LedStrip, O: Observer>(
        &self,
        strip: &mut S,
        payload: &[u8],
        report: &mut RenderReport,
        observer: &mut O,
    ) {
        let color = self.registry.palette().auxiliary().color;

        for (position, token) in decode(payload).enumerate() {
            let Ok(hold) = token else { continue };
            if !hold.hold_type.allows_auxiliary() {
                continue;
            }
            let Ok(leds) = self.registry.locate(hold.number) else { continue };
            let Some(target) = leds.auxiliary() else { continue };

            let written = usize::try_from(target)
                .ok()
                .filter(|&index| strip.set_pixel(index, color).is_ok());
            match written {
                Some(index) => {
                    report.auxiliary_lit += 1;
                    observer.auxiliary_lit(hold, index);
                }
                None => {
                    report.auxiliary_skipped += 1;
                    observer.hold_skipped(position, RenderError::LedOutOfRange { hold, index: target });
                }
            }
        }
    }

    fn primary_pass<S: LedStrip, O: Observer>(
        &self,
        strip: &mut S,
        payload: &[u8],
        report: &mut RenderReport,
        observer: &mut O,
    ) {
        for (position, token) in decode(payload).enumerate() {
            match self.draw_primary(strip, token) {
                Ok((hold, led)) => {
                    report.primary_lit += 1;
                    observer.primary_lit(hold, led, self.registry.style(hold.hold_type));
                }
                Err(e) => {
                    report.skipped += 1;
                    observer.hold_skipped(position, e);
                }
            }
        }
    }

    fn draw_primary<S: LedStrip>(
        &self,
        strip: &mut S,
        token: Result<Hold, DecodeError>,
    ) -> Result<(Hold, usize), RenderError> {
        let hold = token?;
        let leds = self.registry.locate(hold.number)?;
        let color = self.registry.style(hold.hold_type).color;
        strip
            .set_pixel(leds.primary, color)
            .map_err(|_| RenderError::LedOutOfRange {
                hold,
                index: leds.primary as i32,
            })?;
        Ok((hold, leds.primary))
    }
}
