//! Frame parsing for the problem string protocol.
//!
//! Frame format (ASCII):
//! - CONFIG (optional, 2 bytes): `~` followed by an option byte
//!   (`D` enables auxiliary LEDs, `l` is accepted and ignored)
//! - START (2 bytes): `l#`
//! - PAYLOAD (0-512 bytes): comma separated hold tokens
//! - TERMINATOR (1 byte): `#`
//!
//! Every state ignores bytes it has no transition for, so stray bytes
//! between frames never need resynchronisation.

use heapless::Vec;

/// Byte that introduces a configuration option
pub const CONFIG_MARKER: u8 = b'~';

/// Byte that starts a frame (and is also the no-op config option)
pub const FRAME_START: u8 = b'l';

/// Byte that opens and terminates the payload
pub const PAYLOAD_DELIMITER: u8 = b'#';

/// Config option byte that enables auxiliary LEDs
pub const OPTION_AUXILIARY_LEDS: u8 = b'D';

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 512;

/// Errors that can occur while feeding the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeded [`MAX_PAYLOAD_SIZE`]; the frame was dropped
    PayloadOverflow,
    /// A completed payload has not been taken with [`FrameParser::finish`] yet
    FramePending,
}

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParserState {
    /// Waiting for a config marker or the start of a frame
    Idle,
    /// Got `~`, waiting for the option byte
    AwaitingConfig,
    /// Waiting for the `#` that opens the payload
    AwaitingPayloadStart,
    /// Collecting payload bytes until the terminator
    AccumulatingPayload,
    /// Payload finalized, waiting to be rendered and finished
    PayloadComplete,
}

/// Option byte received after the config marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigOption {
    /// `D`: draw auxiliary LEDs for this frame
    AuxiliaryLeds,
    /// `l`: no option, proceed to the payload
    NoOp,
}

/// Something the caller may want to react to (or log)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseEvent {
    /// A config option was accepted
    ConfigSelected(ConfigOption),
    /// The payload opened and the buffer was cleared
    PayloadStarted,
    /// The terminator arrived; [`FrameParser::payload`] holds the problem
    PayloadComplete,
}

/// Per-frame render options collected during the config phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderOptions {
    /// Draw auxiliary indicators next to eligible holds
    pub auxiliary_leds: bool,
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParserState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    options: RenderOptions,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            buffer: Vec::new(),
            options: RenderOptions::default(),
        }
    }

    /// Current parser state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Options collected for the frame in flight
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Payload bytes collected so far
    ///
    /// Complete only while the state is [`ParserState::PayloadComplete`].
    pub fn payload(&self) -> &[u8] {
        &self.buffer
    }

    /// Reset the parser state, dropping any partial frame
    pub fn reset(&mut self) {
        self.state = ParserState::Idle;
        self.buffer.clear();
        self.options = RenderOptions::default();
    }

    /// Leave `PayloadComplete` after the problem has been rendered
    ///
    /// Returns the options that applied to the finished frame. The option
    /// flag never carries over into the next frame.
    pub fn finish(&mut self) -> RenderOptions {
        let options = self.options;
        self.reset();
        options
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(event))` when the byte caused a notable transition,
    /// `Ok(None)` when it was stored or ignored, or `Err` when it could not
    /// be accepted.
    pub fn feed(&mut self, byte: u8) -> Result<Option<ParseEvent>, FrameError> {
        use ParserState::*;

        match (self.state, byte) {
            (Idle, CONFIG_MARKER) => {
                self.state = AwaitingConfig;
                Ok(None)
            }
            (Idle, FRAME_START) => {
                self.state = AwaitingPayloadStart;
                Ok(None)
            }
            (Idle, _) => Ok(None),

            (AwaitingConfig, OPTION_AUXILIARY_LEDS) => {
                self.options.auxiliary_leds = true;
                self.state = AwaitingPayloadStart;
                Ok(Some(ParseEvent::ConfigSelected(ConfigOption::AuxiliaryLeds)))
            }
            (AwaitingConfig, FRAME_START) => {
                self.state = AwaitingPayloadStart;
                Ok(Some(ParseEvent::ConfigSelected(ConfigOption::NoOp)))
            }
            (AwaitingConfig, _) => Ok(None),

            (AwaitingPayloadStart, PAYLOAD_DELIMITER) => {
                self.buffer.clear();
                self.state = AccumulatingPayload;
                Ok(Some(ParseEvent::PayloadStarted))
            }
            (AwaitingPayloadStart, _) => Ok(None),

            (AccumulatingPayload, PAYLOAD_DELIMITER) => {
                self.state = PayloadComplete;
                Ok(Some(ParseEvent::PayloadComplete))
            }
            (AccumulatingPayload, _) => {
                if self.buffer.push(byte).is_err() {
                    self.reset();
                    return Err(FrameError::PayloadOverflow);
                }
                Ok(None)
            }

            (PayloadComplete, _) => Err(FrameError::FramePending),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Feed bytes until a payload completes, returning how many were used
    fn feed_frame(parser: &mut FrameParser, input: &[u8]) -> Option<usize> {
        for (i, &b) in input.iter().enumerate() {
            if parser.feed(b).unwrap() == Some(ParseEvent::PayloadComplete) {
                return Some(i + 1);
            }
        }
        None
    }

    fn parse_one(input: &[u8]) -> (FrameParser, usize) {
        let mut parser = FrameParser::new();
        let used = feed_frame(&mut parser, input).expect("frame did not complete");
        (parser, used)
    }

    #[test]
    fn test_plain_frame() {
        let (parser, used) = parse_one(b"l#S3,R5,F2#");
        assert_eq!(used, 11);
        assert_eq!(parser.state(), ParserState::PayloadComplete);
        assert_eq!(parser.payload(), b"S3,R5,F2");
        assert!(!parser.options().auxiliary_leds);
    }

    #[test]
    fn test_config_enables_auxiliary_leds() {
        let (parser, _) = parse_one(b"~Dl#S3,E7#");
        assert_eq!(parser.payload(), b"S3,E7");
        assert!(parser.options().auxiliary_leds);
    }

    #[test]
    fn test_noop_config_option() {
        let (parser, _) = parse_one(b"~ll#M9#");
        assert_eq!(parser.payload(), b"M9");
        assert!(!parser.options().auxiliary_leds);
    }

    #[test]
    fn test_empty_payload() {
        let (parser, _) = parse_one(b"l##");
        assert!(parser.payload().is_empty());
    }

    #[test]
    fn test_transition_bytes_are_not_payload() {
        // The opening `#` belongs to the transition, not to the payload
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(b'l'), Ok(None));
        assert_eq!(parser.feed(b'#'), Ok(Some(ParseEvent::PayloadStarted)));
        assert_eq!(parser.state(), ParserState::AccumulatingPayload);
        assert!(parser.payload().is_empty());
    }

    #[test]
    fn test_events_in_order() {
        let mut parser = FrameParser::new();
        let mut events = Vec::<ParseEvent, 8>::new();
        for &b in b"~Dl#S1#" {
            if let Some(ev) = parser.feed(b).unwrap() {
                events.push(ev).unwrap();
            }
        }
        assert_eq!(
            events.as_slice(),
            &[
                ParseEvent::ConfigSelected(ConfigOption::AuxiliaryLeds),
                ParseEvent::PayloadStarted,
                ParseEvent::PayloadComplete,
            ]
        );
    }

    #[test]
    fn test_garbage_is_ignored_in_every_waiting_state() {
        let mut parser = FrameParser::new();
        for &b in b"xyz#,D" {
            parser.feed(b).unwrap();
        }
        assert_eq!(parser.state(), ParserState::Idle);

        parser.feed(b'~').unwrap();
        for &b in b"~~x#" {
            parser.feed(b).unwrap();
        }
        assert_eq!(parser.state(), ParserState::AwaitingConfig);

        parser.feed(b'l').unwrap();
        for &b in b"lD~x" {
            parser.feed(b).unwrap();
        }
        assert_eq!(parser.state(), ParserState::AwaitingPayloadStart);
    }

    #[test]
    fn test_terminator_without_start_is_ignored() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(b'#'), Ok(None));
        assert_eq!(parser.state(), ParserState::Idle);
    }

    #[test]
    fn test_finish_resets_state_and_options() {
        let (mut parser, _) = parse_one(b"~Dl#S3#");
        let options = parser.finish();
        assert!(options.auxiliary_leds);
        assert_eq!(parser.state(), ParserState::Idle);
        assert!(!parser.options().auxiliary_leds);
        assert!(parser.payload().is_empty());

        // Next frame does not inherit the option
        assert_eq!(feed_frame(&mut parser, b"l#R5#"), Some(5));
        assert!(!parser.options().auxiliary_leds);
        assert_eq!(parser.payload(), b"R5");
    }

    #[test]
    fn test_pending_frame_rejects_bytes() {
        let (mut parser, _) = parse_one(b"l#S3#");
        assert_eq!(parser.feed(b'l'), Err(FrameError::FramePending));
        assert_eq!(parser.state(), ParserState::PayloadComplete);
        assert_eq!(parser.payload(), b"S3");
    }

    #[test]
    fn test_back_to_back_frames_need_finish_between() {
        let mut parser = FrameParser::new();
        let input = b"l#S3#l#R5#";
        let used = feed_frame(&mut parser, input).unwrap();
        assert_eq!(used, 5);
        assert_eq!(parser.feed(input[used]), Err(FrameError::FramePending));
        parser.finish();

        assert!(feed_frame(&mut parser, &input[used..]).is_some());
        assert_eq!(parser.payload(), b"R5");
    }

    #[test]
    fn test_payload_overflow_drops_frame() {
        let mut parser = FrameParser::new();
        parser.feed(b'l').unwrap();
        parser.feed(b'#').unwrap();
        for _ in 0..MAX_PAYLOAD_SIZE {
            assert_eq!(parser.feed(b'1'), Ok(None));
        }
        assert_eq!(parser.feed(b'1'), Err(FrameError::PayloadOverflow));
        assert_eq!(parser.state(), ParserState::Idle);

        // Parser recovers for the next frame
        assert_eq!(feed_frame(&mut parser, b"l#E7#"), Some(5));
        assert_eq!(parser.payload(), b"E7");
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let mut parser = FrameParser::new();
        assert_eq!(feed_frame(&mut parser, b"~Dl#S3,R"), None);
        parser.reset();
        assert_eq!(parser.state(), ParserState::Idle);
        assert!(!parser.options().auxiliary_leds);
        assert!(parser.payload().is_empty());
    }

    proptest! {
        #[test]
        fn prop_payload_is_verbatim(
            payload in proptest::collection::vec(any::<u8>().prop_filter("no delimiter", |b| *b != PAYLOAD_DELIMITER), 0..MAX_PAYLOAD_SIZE),
            aux in any::<bool>(),
        ) {
            let mut parser = FrameParser::new();
            if aux {
                parser.feed(CONFIG_MARKER).unwrap();
                parser.feed(OPTION_AUXILIARY_LEDS).unwrap();
            }
            parser.feed(FRAME_START).unwrap();
            parser.feed(PAYLOAD_DELIMITER).unwrap();
            for &b in &payload {
                prop_assert_eq!(parser.feed(b), Ok(None));
            }
            prop_assert_eq!(parser.feed(PAYLOAD_DELIMITER), Ok(Some(ParseEvent::PayloadComplete)));
            prop_assert_eq!(parser.payload(), payload.as_slice());
            prop_assert_eq!(parser.finish().auxiliary_leds, aux);
            prop_assert_eq!(parser.state(), ParserState::Idle);
        }

        #[test]
        fn prop_arbitrary_bytes_never_fail_outside_payload(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            // Short streams cannot overflow; the only error left is a pending frame
            let mut parser = FrameParser::new();
            for &b in &bytes {
                match parser.feed(b) {
                    Ok(Some(ParseEvent::PayloadComplete)) => { parser.finish(); }
                    Ok(_) => {}
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }
        }
    }
}
