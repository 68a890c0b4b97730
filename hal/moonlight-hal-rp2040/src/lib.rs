//! RP2040-specific HAL for the Moonlight firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `moonlight-hal` traits:
//!
//! - BLE serial module on a buffered UART (implements `LinkRx`, `LinkTx`, `LinkStatus`)
//! - WS2812 strip driven by PIO (implements `LedStrip`)

#![no_std]

pub mod ble;
pub mod ws2812;

pub use ble::BleUart;
pub use ws2812::PioStrip;
