//! Moonlight Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The problem parser and renderer only talk to
//! these traits, so they can be tested on the host with in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  moonlight-core (session, renderer)      │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  moonlight-hal (this crate - traits)     │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  moonlight-hal-rp2040 (BLE UART, WS2812) │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`link::LinkRx`], [`link::LinkTx`], [`link::LinkStatus`] - BLE serial link
//! - [`strip::LedStrip`] - Addressable LED strip

#![no_std]
#![deny(unsafe_code)]

pub mod link;
pub mod strip;

// Re-export key traits at crate root for convenience
pub use link::{LinkConfig, LinkError, LinkRx, LinkStatus, LinkTx, NameCommand, MAX_NAME_LEN};
pub use strip::{FrameBuffer, LedStrip, StripError, OFF, RGB8};
