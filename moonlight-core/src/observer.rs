//! Diagnostics hooks
//!
//! The session and renderer report what they do through this trait so the
//! firmware can log it. Every method has an empty default; nothing depends
//! on an observer being present.

use moonlight_protocol::{ConfigOption, FrameError, Hold, RenderOptions};

use crate::registry::HoldStyle;
use crate::render::{RenderError, RenderReport};

/// Receives progress reports from a [`Session`](crate::session::Session)
#[allow(unused_variables)]
pub trait Observer {
    /// A config option arrived ahead of the payload
    fn config_selected(&mut self, option: ConfigOption) {}

    /// The parser dropped a frame
    fn frame_dropped(&mut self, error: FrameError) {}

    /// A complete problem string is about to be rendered
    fn problem_received(&mut self, payload: &[u8], options: RenderOptions) {}

    /// An auxiliary indicator was set
    fn auxiliary_lit(&mut self, hold: Hold, led: usize) {}

    /// A hold was set to its color
    fn primary_lit(&mut self, hold: Hold, led: usize, style: HoldStyle) {}

    /// Token at `position` in the payload was not drawn
    fn hold_skipped(&mut self, position: usize, error: RenderError) {}

    /// The strip has been flushed
    fn problem_rendered(&mut self, report: &RenderReport) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}
