//! Generated wall layouts
//!
//! Most walls are wired as a regular grid of holds, so the LED tables can be
//! computed from the grid size and wiring pattern instead of being typed in.
//! The firmware build script uses this module to generate its tables.
//!
//! Holds are numbered column-major: hold `n` sits in column `n / rows`,
//! row `n % rows`.

/// How the strip runs through the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wiring {
    /// Strip follows hold numbers directly
    Linear,
    /// Strip runs up even columns and down odd columns
    Serpentine,
}

impl Wiring {
    /// Parse the name used in the wall config
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Wiring::Linear),
            "serpentine" => Some(Wiring::Serpentine),
            _ => None,
        }
    }
}

/// Errors in a layout description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Columns or rows is zero
    EmptyGrid,
    /// LEDs per hold must be 1 or 2
    LedsPerHold(u8),
    /// More LEDs than a table entry can address
    TooManyLeds(u32),
}

/// Problems found in explicit LED tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Tables describe a different number of holds
    LengthMismatch { primary: usize, auxiliary: usize },
    /// Primary LED of a hold is past the end of the strip
    PrimaryOutOfRange { hold: usize, index: u16 },
    /// Auxiliary LED of a hold is off the strip
    AuxiliaryOutOfRange { hold: usize, index: i32 },
}

/// Regular grid of holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallLayout {
    pub columns: u16,
    pub rows: u16,
    pub leds_per_hold: u8,
    pub wiring: Wiring,
}

impl WallLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(LayoutError::EmptyGrid);
        }
        if !matches!(self.leds_per_hold, 1 | 2) {
            return Err(LayoutError::LedsPerHold(self.leds_per_hold));
        }
        let pixels = self.pixel_count();
        if pixels > u32::from(u16::MAX) {
            return Err(LayoutError::TooManyLeds(pixels));
        }
        Ok(())
    }

    pub fn hold_count(&self) -> u32 {
        u32::from(self.columns) * u32::from(self.rows)
    }

    pub fn pixel_count(&self) -> u32 {
        self.hold_count() * u32::from(self.leds_per_hold)
    }

    /// LED lit in a hold's color, `None` past the last hold
    pub fn primary_index(&self, hold: u16) -> Option<u16> {
        if u32::from(hold) >= self.hold_count() {
            return None;
        }
        let slot = match self.wiring {
            Wiring::Linear => u32::from(hold),
            Wiring::Serpentine => {
                let rows = u32::from(self.rows);
                let column = u32::from(hold) / rows;
                let row = u32::from(hold) % rows;
                let row = if column % 2 == 0 { row } else { rows - 1 - row };
                column * rows + row
            }
        };
        u16::try_from(slot * u32::from(self.leds_per_hold)).ok()
    }

    /// Offset from the primary LED to the auxiliary LED (0 for none)
    pub fn auxiliary_offset(&self) -> i16 {
        if self.leds_per_hold == 2 {
            1
        } else {
            0
        }
    }

    /// Primary LED of every hold, in hold order
    pub fn primary_indices(&self) -> impl Iterator<Item = u16> + '_ {
        let holds = u16::try_from(self.hold_count()).unwrap_or(u16::MAX);
        (0..holds).filter_map(move |hold| self.primary_index(hold))
    }
}

/// Check explicit tables against the strip length
///
/// Yields every problem found, not just the first.
pub fn check_tables<'a>(
    primary: &'a [u16],
    auxiliary_offset: &'a [i16],
    pixel_count: u32,
) -> impl Iterator<Item = TableError> + 'a {
    let length = (primary.len() != auxiliary_offset.len()).then_some(TableError::LengthMismatch {
        primary: primary.len(),
        auxiliary: auxiliary_offset.len(),
    });

    let entries = primary
        .iter()
        .zip(auxiliary_offset)
        .enumerate()
        .flat_map(move |(hold, (&index, &offset))| {
            let primary = (u32::from(index) >= pixel_count)
                .then_some(TableError::PrimaryOutOfRange { hold, index });
            let target = i32::from(index) + i32::from(offset);
            let auxiliary = (offset != 0 && (target < 0 || target as u32 >= pixel_count))
                .then_some(TableError::AuxiliaryOutOfRange { hold, index: target });
            primary.into_iter().chain(auxiliary)
        });

    length.into_iter().chain(entries)
}
