//! Board-agnostic core logic for the Moonlight wall firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hold registry (hold number to LED, hold type to color)
//! - Problem renderer (auxiliary pass, primary pass, flush)
//! - Link session (parser ownership and per-frame lifecycle)
//! - BLE module setup (advertised name, reply draining)
//! - Power-on color sweep
//! - Generated wall layouts used by the firmware build script

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod layout;
pub mod module;
pub mod observer;
pub mod registry;
pub mod render;
pub mod session;
pub mod sweep;

#[cfg(test)]
mod testing;

pub use observer::{NoopObserver, Observer};
pub use registry::{HoldLeds, HoldRegistry, HoldStyle, LookupError, Palette, RegistryError};
pub use render::{RenderError, RenderPipeline, RenderReport};
pub use module::set_device_name;
pub use session::{Session, SessionError};
pub use sweep::{color_sweep, SWEEP_STEP_MS};
