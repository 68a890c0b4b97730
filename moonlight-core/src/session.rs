//! Link session
//!
//! Owns the frame parser for one link and renders each completed problem
//! before the next byte is looked at. The polling task holds the only
//! session, so parser state and the per-frame option flag never leak into
//! other code.

use moonlight_hal::{LedStrip, LinkError, LinkRx, StripError};
use moonlight_protocol::{FrameParser, ParseEvent, ParserState};

use crate::observer::Observer;
use crate::registry::HoldRegistry;
use crate::render::{RenderPipeline, RenderReport};

/// Bytes pulled from the link per poll
pub const RX_CHUNK_SIZE: usize = 64;

/// Errors from a session poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// Reading from the link failed
    Link(LinkError),
    /// Flushing the strip failed (parser state was still reset)
    Strip(StripError),
}

impl From<LinkError> for SessionError {
    fn from(e: LinkError) -> Self {
        SessionError::Link(e)
    }
}

impl From<StripError> for SessionError {
    fn from(e: StripError) -> Self {
        SessionError::Strip(e)
    }
}

/// Parser plus renderer for one link
#[derive(Debug, Clone)]
pub struct Session<'r> {
    parser: FrameParser,
    pipeline: RenderPipeline<'r>,
    rendered: u32,
    last_report: RenderReport,
}

impl<'r> Session<'r> {
    /// Create a session in the idle state
    pub fn new(registry: &'r HoldRegistry<'r>) -> Self {
        Self {
            parser: FrameParser::new(),
            pipeline: RenderPipeline::new(registry),
            rendered: 0,
            last_report: RenderReport::default(),
        }
    }

    /// Current parser state
    pub fn state(&self) -> ParserState {
        self.parser.state()
    }

    pub fn parser(&self) -> &FrameParser {
        &self.parser
    }

    /// Number of problems that reached the strip since startup
    ///
    /// Frames whose flush failed are not counted.
    pub fn rendered(&self) -> u32 {
        self.rendered
    }

    /// Report of the last problem that reached the strip
    pub fn last_report(&self) -> RenderReport {
        self.last_report
    }

    /// Feed one byte, rendering if it completes a problem
    ///
    /// Returns the render report when a problem was drawn.
    pub async fn feed<S: LedStrip, O: Observer>(
        &mut self,
        byte: u8,
        strip: &mut S,
        observer: &mut O,
    ) -> Result<Option<RenderReport>, SessionError> {
        match self.parser.feed(byte) {
            Ok(Some(ParseEvent::PayloadComplete)) => self.render(strip, observer).await.map(Some),
            Ok(Some(ParseEvent::ConfigSelected(option))) => {
                observer.config_selected(option);
                Ok(None)
            }
            Ok(_) => Ok(None),
            Err(e) => {
                observer.frame_dropped(e);
                Ok(None)
            }
        }
    }

    /// Pull the bytes available on the link and process them
    ///
    /// Every byte read is fed, even if a flush fails part way; the first
    /// flush error is returned afterwards. Returns the number of problems
    /// rendered.
    pub async fn poll<L: LinkRx, S: LedStrip, O: Observer>(
        &mut self,
        link: &mut L,
        strip: &mut S,
        observer: &mut O,
    ) -> Result<usize, SessionError> {
        let mut buf = [0u8; RX_CHUNK_SIZE];
        let n = link.read(&mut buf).await?;

        let mut rendered = 0;
        let mut first_error = None;
        for &byte in &buf[..n] {
            match self.feed(byte, strip, observer).await {
                Ok(Some(_)) => rendered += 1,
                Ok(None) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(rendered),
        }
    }

    /// Render the completed payload, then return the parser to idle
    async fn render<S: LedStrip, O: Observer>(
        &mut self,
        strip: &mut S,
        observer: &mut O,
    ) -> Result<RenderReport, SessionError> {
        let options = self.parser.options();
        let payload = self.parser.payload();
        observer.problem_received(payload, options);

        let result = self.pipeline.render(strip, payload, options, observer).await;
        self.parser.finish();

        let report = result?;
        self.rendered = self.rendered.wrapping_add(1);
        self.last_report = report;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use embassy_futures::block_on;
    use moonlight_hal::{LinkError, OFF};
    use moonlight_protocol::{ConfigOption, FrameError, HoldType, RenderOptions, MAX_PAYLOAD_SIZE};

    fn feed_all(session: &mut Session<'_>, strip: &mut MockStrip, recorder: &mut Recorder, bytes: &[u8]) -> usize {
        let mut rendered = 0;
        for &b in bytes {
            if block_on(session.feed(b, strip, recorder)).unwrap().is_some() {
                rendered += 1;
            }
        }
        rendered
    }

    #[test]
    fn test_scenario_primary_only() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();

        assert_eq!(feed_all(&mut session, &mut strip, &mut recorder, b"l#S3,R5,F2#"), 1);

        let palette = palette();
        let frame = strip.last_shown();
        assert_eq!(frame[6], palette.style(HoldType::Start).color);
        assert_eq!(frame[10], palette.style(HoldType::Right).color);
        assert_eq!(frame[4], palette.style(HoldType::Foot).color);
        assert_eq!(frame.iter().filter(|&&c| c != OFF).count(), 3);
        assert_eq!(session.state(), ParserState::Idle);
        assert_eq!(session.last_report().primary_lit, 3);
    }

    #[test]
    fn test_scenario_auxiliary_enabled() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();

        feed_all(&mut session, &mut strip, &mut recorder, b"~Dl#S3,E7#");

        let palette = palette();
        let frame = strip.last_shown();
        assert_eq!(frame[7], palette.auxiliary().color);
        assert_eq!(frame[6], palette.style(HoldType::Start).color);
        assert_eq!(frame[14], palette.style(HoldType::End).color);
        assert_eq!(frame[15], OFF);
        assert_eq!(recorder.records[0], Record::Config(ConfigOption::AuxiliaryLeds));
        assert_eq!(
            recorder.records[1],
            Record::Problem(b"S3,E7".to_vec(), RenderOptions { auxiliary_leds: true })
        );
    }

    #[test]
    fn test_scenario_noop_config() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();

        feed_all(&mut session, &mut strip, &mut recorder, b"~ll#M9#");

        let palette = palette();
        let frame = strip.last_shown();
        assert_eq!(frame[18], palette.style(HoldType::Match).color);
        assert_eq!(frame[17], OFF);
        assert_eq!(frame.iter().filter(|&&c| c != OFF).count(), 1);
    }

    #[test]
    fn test_option_does_not_carry_over() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();

        feed_all(&mut session, &mut strip, &mut recorder, b"~Dl#S3#");
        assert_eq!(strip.last_shown()[7], palette().auxiliary().color);
        assert_eq!(session.state(), ParserState::Idle);
        assert!(!session.parser().options().auxiliary_leds);

        feed_all(&mut session, &mut strip, &mut recorder, b"l#S3#");
        assert_eq!(strip.last_shown()[7], OFF);
        assert_eq!(strip.last_shown()[6], palette().style(HoldType::Start).color);
        assert_eq!(session.rendered(), 2);
    }

    #[test]
    fn test_empty_problem_turns_everything_off() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();

        feed_all(&mut session, &mut strip, &mut recorder, b"l#S3,R5#l##");
        assert!(strip.last_shown().iter().all(|&c| c == OFF));
        assert!(!recorder.records.iter().any(|r| matches!(r, Record::Skipped(..))));
    }

    #[test]
    fn test_poll_renders_every_frame_in_chunk() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();
        let mut link = MockLink::new(&[b"l#S3#~Dl#R5#l#M"]);

        let rendered = block_on(session.poll(&mut link, &mut strip, &mut recorder)).unwrap();
        assert_eq!(rendered, 2);
        assert_eq!(strip.shown.len(), 2);
        assert_eq!(session.state(), ParserState::AccumulatingPayload);
    }

    #[test]
    fn test_frame_split_across_polls() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();
        let mut link = MockLink::new(&[b"~", b"Dl", b"#S", b"3,E7", b"#"]);

        let mut rendered = 0;
        for _ in 0..5 {
            rendered += block_on(session.poll(&mut link, &mut strip, &mut recorder)).unwrap();
        }
        assert_eq!(rendered, 1);
        assert_eq!(strip.last_shown()[7], palette().auxiliary().color);
    }

    #[test]
    fn test_poll_reads_at_most_one_chunk() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();
        let long = [b'x'; RX_CHUNK_SIZE + 10];
        let mut link = MockLink::new(&[&long]);

        block_on(session.poll(&mut link, &mut strip, &mut recorder)).unwrap();
        assert_eq!(link.chunks.front().map(|c| c.len()), Some(10));
    }

    #[test]
    fn test_link_error_is_returned() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut link = MockLink::default();

        let result = block_on(session.poll(&mut link, &mut strip, &mut Recorder::default()));
        assert_eq!(result, Err(SessionError::Link(LinkError::Read)));
    }

    #[test]
    fn test_flush_failure_still_resets_parser() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        strip.fail_show = true;
        let mut link = MockLink::new(&[b"~Dl#S3#l#R5#"]);

        let result = block_on(session.poll(&mut link, &mut strip, &mut Recorder::default()));
        assert_eq!(result, Err(SessionError::Strip(StripError::Transfer)));
        // Both frames were still processed
        assert_eq!(strip.shows, 2);
        assert_eq!(session.state(), ParserState::Idle);
        assert!(!session.parser().options().auxiliary_leds);
    }

    #[test]
    fn test_failed_flush_is_not_counted() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();

        feed_all(&mut session, &mut strip, &mut recorder, b"l#S3,R5#");
        assert_eq!(session.rendered(), 1);
        let shown = session.last_report();
        assert_eq!(shown.primary_lit, 2);

        strip.fail_show = true;
        let mut result = Ok(None);
        for &b in b"l#S3#" {
            result = block_on(session.feed(b, &mut strip, &mut recorder));
        }
        assert_eq!(result, Err(SessionError::Strip(StripError::Transfer)));
        assert_eq!(session.rendered(), 1);
        assert_eq!(session.last_report(), shown);
        assert_eq!(session.state(), ParserState::Idle);

        strip.fail_show = false;
        feed_all(&mut session, &mut strip, &mut recorder, b"l#S3#");
        assert_eq!(session.rendered(), 2);
        assert_eq!(session.last_report().primary_lit, 1);
    }

    #[test]
    fn test_overflow_is_reported_and_recovered() {
        let registry = registry();
        let mut session = Session::new(&registry);
        let mut strip = MockStrip::new();
        let mut recorder = Recorder::default();

        feed_all(&mut session, &mut strip, &mut recorder, b"l#");
        let filler = [b'1'; MAX_PAYLOAD_SIZE + 1];
        feed_all(&mut session, &mut strip, &mut recorder, &filler);
        assert!(recorder.records.contains(&Record::Dropped(FrameError::PayloadOverflow)));
        assert_eq!(session.state(), ParserState::Idle);

        // The rest of the dropped frame is ignored until a new start
        assert_eq!(feed_all(&mut session, &mut strip, &mut recorder, b"11#l#E7#"), 1);
        assert_eq!(strip.last_shown()[14], palette().style(HoldType::End).color);
    }
}
