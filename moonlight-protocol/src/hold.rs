//! Hold descriptors carried in the problem string

use core::fmt;

/// Hold category, sent as a single tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldType {
    /// Starting hold
    Start,
    /// Right hand hold
    Right,
    /// Left hand hold
    Left,
    /// Hold used by both hands
    Match,
    /// Foot hold
    Foot,
    /// Finishing hold
    End,
}

// Wire format values
const TAG_START: u8 = b'S';
const TAG_RIGHT: u8 = b'R';
const TAG_LEFT: u8 = b'L';
const TAG_MATCH: u8 = b'M';
const TAG_FOOT: u8 = b'F';
const TAG_END: u8 = b'E';

impl HoldType {
    /// All hold types, in palette order
    pub const ALL: [HoldType; 6] = [
        HoldType::Start,
        HoldType::Right,
        HoldType::Left,
        HoldType::Match,
        HoldType::Foot,
        HoldType::End,
    ];

    /// Parse a hold type from its tag byte
    pub fn from_tag(byte: u8) -> Option<Self> {
        match byte {
            TAG_START => Some(HoldType::Start),
            TAG_RIGHT => Some(HoldType::Right),
            TAG_LEFT => Some(HoldType::Left),
            TAG_MATCH => Some(HoldType::Match),
            TAG_FOOT => Some(HoldType::Foot),
            TAG_END => Some(HoldType::End),
            _ => None,
        }
    }

    /// Convert to tag byte
    pub fn tag(self) -> u8 {
        match self {
            HoldType::Start => TAG_START,
            HoldType::Right => TAG_RIGHT,
            HoldType::Left => TAG_LEFT,
            HoldType::Match => TAG_MATCH,
            HoldType::Foot => TAG_FOOT,
            HoldType::End => TAG_END,
        }
    }

    /// Whether this hold may get an auxiliary indicator
    ///
    /// Finishing holds never do.
    pub fn allows_auxiliary(self) -> bool {
        !matches!(self, HoldType::End)
    }
}

/// One decoded hold: its type and its number on the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hold {
    pub hold_type: HoldType,
    pub number: u16,
}

impl Hold {
    pub const fn new(hold_type: HoldType, number: u16) -> Self {
        Self { hold_type, number }
    }
}

/// Wire form, e.g. `S3`
impl fmt::Display for Hold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.hold_type.tag() as char, self.number)
    }
}
