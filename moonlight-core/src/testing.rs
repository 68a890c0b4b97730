//! In-memory doubles for host tests

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use moonlight_hal::{FrameBuffer, LedStrip, LinkError, LinkRx, LinkTx, StripError, RGB8};
use moonlight_protocol::{ConfigOption, FrameError, Hold, RenderOptions};

use crate::observer::Observer;
use crate::registry::{HoldRegistry, HoldStyle, Palette};
use crate::render::{RenderError, RenderReport};

pub const PIXELS: usize = 32;

// Hold 0's auxiliary lands on hold 1's primary, hold 4 has no auxiliary,
// hold 9 points backwards, hold 10's auxiliary and hold 11's primary are
// past the end of the strip.
pub static PRIMARY: [u16; 12] = [0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 31, 40];
pub static AUX: [i16; 12] = [2, 1, 1, 1, 0, 1, 1, 1, 1, -1, 1, 1];

pub fn palette() -> Palette {
    Palette::new(100, 50)
}

pub fn registry() -> HoldRegistry<'static> {
    HoldRegistry::new(&PRIMARY, &AUX, palette()).unwrap()
}

/// Strip that remembers every flushed frame
pub struct MockStrip {
    pub buffer: FrameBuffer<PIXELS>,
    pub shown: Vec<[RGB8; PIXELS]>,
    pub shows: usize,
    pub fail_show: bool,
}

impl MockStrip {
    pub fn new() -> Self {
        Self {
            buffer: FrameBuffer::new(),
            shown: Vec::new(),
            shows: 0,
            fail_show: false,
        }
    }

    pub fn last_shown(&self) -> &[RGB8; PIXELS] {
        self.shown.last().expect("nothing shown yet")
    }
}

impl LedStrip for MockStrip {
    fn pixel_count(&self) -> usize {
        PIXELS
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) -> Result<(), StripError> {
        self.buffer.set(index, color)
    }

    fn clear_to(&mut self, color: RGB8) {
        self.buffer.fill(color);
    }

    async fn show(&mut self) -> Result<(), StripError> {
        self.shows += 1;
        if self.fail_show {
            return Err(StripError::Transfer);
        }
        self.shown.push(*self.buffer.pixels());
        Ok(())
    }
}

/// Link that hands out pre-recorded chunks, then errors
///
/// With `quiet_when_empty` set an empty link never completes a read
/// instead, like a UART with nothing on the wire.
#[derive(Default)]
pub struct MockLink {
    pub chunks: VecDeque<Vec<u8>>,
    pub written: Vec<u8>,
    pub quiet_when_empty: bool,
}

impl MockLink {
    pub fn new(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
            ..Default::default()
        }
    }

    pub fn quiet(chunks: &[&[u8]]) -> Self {
        Self {
            quiet_when_empty: true,
            ..Self::new(chunks)
        }
    }
}

impl LinkRx for MockLink {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let chunk = match self.chunks.pop_front() {
            Some(chunk) => chunk,
            None if self.quiet_when_empty => core::future::pending().await,
            None => return Err(LinkError::Read),
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk[n..].to_vec());
        }
        Ok(n)
    }
}

impl LinkTx for MockLink {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.written.extend_from_slice(data);
        Ok(())
    }
}

/// Delay that only counts
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Config(ConfigOption),
    Dropped(FrameError),
    Problem(Vec<u8>, RenderOptions),
    Auxiliary(Hold, usize),
    Primary(Hold, usize, &'static str),
    Skipped(usize, RenderError),
    Rendered(RenderReport),
}

/// Observer that keeps everything it is told
#[derive(Default)]
pub struct Recorder {
    pub records: Vec<Record>,
}

impl Observer for Recorder {
    fn config_selected(&mut self, option: ConfigOption) {
        self.records.push(Record::Config(option));
    }

    fn frame_dropped(&mut self, error: FrameError) {
        self.records.push(Record::Dropped(error));
    }

    fn problem_received(&mut self, payload: &[u8], options: RenderOptions) {
        self.records.push(Record::Problem(payload.to_vec(), options));
    }

    fn auxiliary_lit(&mut self, hold: Hold, led: usize) {
        self.records.push(Record::Auxiliary(hold, led));
    }

    fn primary_lit(&mut self, hold: Hold, led: usize, style: HoldStyle) {
        self.records.push(Record::Primary(hold, led, style.label));
    }

    fn hold_skipped(&mut self, position: usize, error: RenderError) {
        self.records.push(Record::Skipped(position, error));
    }

    fn problem_rendered(&mut self, report: &RenderReport) {
        self.records.push(Record::Rendered(*report));
    }
}
