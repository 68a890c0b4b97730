//! Problem String Protocol
//!
//! This crate defines the text protocol the companion app uses to send a
//! climbing problem to the wall over the BLE serial link, and the decoder
//! that turns the received problem string into holds.
//!
//! # Protocol Overview
//!
//! Every frame is plain ASCII:
//! ```text
//! ┌──────────────┬───────┬──────────────────────┬─────┐
//! │ CONFIG       │ START │ PAYLOAD              │ END │
//! │ "~D" / "~l"  │ "l#"  │ "S3,R5,L12,F2,E190"  │ "#" │
//! │ optional     │ 2B    │ 0–512B               │ 1B  │
//! └──────────────┴───────┴──────────────────────┴─────┘
//! ```
//!
//! The app only ever sends, there are no acknowledgements. The parser is a
//! byte-at-a-time state machine that ignores anything it does not expect.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod hold;
pub mod problem;

pub use frame::{
    ConfigOption, FrameError, FrameParser, ParseEvent, ParserState, RenderOptions,
    MAX_PAYLOAD_SIZE,
};
pub use hold::{Hold, HoldType};
pub use problem::{decode, DecodeError, Tokens};
