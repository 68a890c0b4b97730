//! Hold registry
//!
//! Maps hold numbers to LEDs and hold types to colors. The tables describe
//! how one physical wall is wired and never change at runtime.

use moonlight_hal::RGB8;
use moonlight_protocol::HoldType;

/// Color and human readable name for a hold type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldStyle {
    pub color: RGB8,
    pub label: &'static str,
}

/// Colors for every hold type plus the auxiliary indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    start: HoldStyle,
    right: HoldStyle,
    left: HoldStyle,
    match_: HoldStyle,
    foot: HoldStyle,
    end: HoldStyle,
    auxiliary: HoldStyle,
}

impl Palette {
    /// Build the palette for the given channel brightness
    ///
    /// `brightness` scales the hold colors, `auxiliary_brightness` the
    /// yellow auxiliary indicator.
    pub const fn new(brightness: u8, auxiliary_brightness: u8) -> Self {
        let b = brightness;
        let half = brightness / 2;
        let a = auxiliary_brightness;
        Self {
            start: HoldStyle { color: RGB8::new(0, b, 0), label: "green" },
            right: HoldStyle { color: RGB8::new(0, 0, b), label: "blue" },
            left: HoldStyle { color: RGB8::new(half, 0, b), label: "violet" },
            match_: HoldStyle { color: RGB8::new(b, 0, half), label: "pink" },
            foot: HoldStyle { color: RGB8::new(0, b, b), label: "cyan" },
            end: HoldStyle { color: RGB8::new(b, 0, 0), label: "red" },
            auxiliary: HoldStyle { color: RGB8::new(a, a, 0), label: "yellow" },
        }
    }

    /// Style for a hold type
    pub fn style(&self, hold_type: HoldType) -> HoldStyle {
        match hold_type {
            HoldType::Start => self.start,
            HoldType::Right => self.right,
            HoldType::Left => self.left,
            HoldType::Match => self.match_,
            HoldType::Foot => self.foot,
            HoldType::End => self.end,
        }
    }

    /// Style of the auxiliary indicator
    pub fn auxiliary(&self) -> HoldStyle {
        self.auxiliary
    }

    /// Colors shown by the power-on sweep, in order
    pub fn startup_colors(&self) -> [RGB8; 7] {
        [
            self.start.color,
            self.right.color,
            self.auxiliary.color,
            self.foot.color,
            self.match_.color,
            self.left.color,
            self.end.color,
        ]
    }
}

/// Errors when building a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// The two tables do not describe the same holds
    LengthMismatch { primary: usize, auxiliary: usize },
}

/// Errors when looking up a hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LookupError {
    /// No table entry for this hold number
    UnknownHold(u16),
}

/// LEDs belonging to one hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HoldLeds {
    /// LED lit in the hold's color
    pub primary: usize,
    /// Distance from the primary LED to the auxiliary LED, 0 for none
    pub auxiliary_offset: i16,
}

impl HoldLeds {
    /// Index of the auxiliary LED, if this hold has one
    ///
    /// Signed so a negative offset past the start of the strip is still
    /// reported instead of wrapping.
    pub fn auxiliary(&self) -> Option<i32> {
        if self.auxiliary_offset == 0 {
            return None;
        }
        Some(self.primary as i32 + i32::from(self.auxiliary_offset))
    }
}

/// Lookup tables for one wall
#[derive(Debug, Clone, Copy)]
pub struct HoldRegistry<'a> {
    primary: &'a [u16],
    auxiliary_offset: &'a [i16],
    palette: Palette,
}

impl<'a> HoldRegistry<'a> {
    /// Create a registry from the wiring tables
    ///
    /// `primary[n]` is the LED of hold `n`, `auxiliary_offset[n]` the
    /// distance to its auxiliary LED (0 if it has none).
    pub fn new(
        primary: &'a [u16],
        auxiliary_offset: &'a [i16],
        palette: Palette,
    ) -> Result<Self, RegistryError> {
        if primary.len() != auxiliary_offset.len() {
            return Err(RegistryError::LengthMismatch {
                primary: primary.len(),
                auxiliary: auxiliary_offset.len(),
            });
        }
        Ok(Self {
            primary,
            auxiliary_offset,
            palette,
        })
    }

    /// Number of holds with a table entry
    pub fn hold_count(&self) -> usize {
        self.primary.len()
    }

    /// Find the LEDs for a hold number
    pub fn locate(&self, number: u16) -> Result<HoldLeds, LookupError> {
        let index = usize::from(number);
        match (self.primary.get(index), self.auxiliary_offset.get(index)) {
            (Some(&primary), Some(&auxiliary_offset)) => Ok(HoldLeds {
                primary: usize::from(primary),
                auxiliary_offset,
            }),
            _ => Err(LookupError::UnknownHold(number)),
        }
    }

    /// Style for a hold type
    pub fn style(&self, hold_type: HoldType) -> HoldStyle {
        self.palette.style(hold_type)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}
