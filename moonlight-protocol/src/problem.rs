//! Problem string decoding
//!
//! A payload is a comma separated list of hold tokens such as `S3,R5,E7`.
//! Each token is a tag byte followed by a decimal hold number. Decoding is
//! a single lazy scan; a bad token yields an error and the scan moves on.

use crate::hold::{Hold, HoldType};

/// Token separator
pub const HOLD_SEPARATOR: u8 = b',';

/// Errors for a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Nothing between two separators (or at either end)
    EmptyToken,
    /// Tag byte is not one of `S R L M F E`
    UnknownHoldType(u8),
    /// Hold number missing, not decimal, or too large
    InvalidNumber,
}

/// Lazy iterator over the holds of a payload
///
/// Yields one `Result` per token, left to right.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: Option<&'a [u8]>,
}

/// Decode a payload into its hold tokens
///
/// An empty payload has no tokens.
pub fn decode(payload: &[u8]) -> Tokens<'_> {
    Tokens {
        rest: if payload.is_empty() { None } else { Some(payload) },
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Hold, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        let token = match rest.iter().position(|&b| b == HOLD_SEPARATOR) {
            Some(pos) => {
                self.rest = Some(&rest[pos + 1..]);
                &rest[..pos]
            }
            None => {
                self.rest = None;
                rest
            }
        };
        Some(decode_token(token))
    }
}

/// Decode one token such as `S3`
pub fn decode_token(token: &[u8]) -> Result<Hold, DecodeError> {
    let (&tag, digits) = token.split_first().ok_or(DecodeError::EmptyToken)?;
    let hold_type = HoldType::from_tag(tag).ok_or(DecodeError::UnknownHoldType(tag))?;
    let number = parse_number(digits).ok_or(DecodeError::InvalidNumber)?;
    Ok(Hold::new(hold_type, number))
}

fn parse_number(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u16, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u16::from(b - b'0'))
    })
}
