//! Inter-task communication
//!
//! The link task owns the session; the main task only sees what is
//! published here.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use moonlight_core::RenderReport;

/// Outcome of the most recent render
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderStatus {
    /// Problems rendered since startup
    pub total: u32,
    pub last: RenderReport,
}

/// Latest render status (updated by the link task after every problem)
pub static RENDER_STATUS: Signal<CriticalSectionRawMutex, RenderStatus> = Signal::new();
