//! Scan dimension descriptors parsed from file names.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scan dimensions encoded in a file name as `X<n> Y<n> Z<n>`.
///
/// The `Y` field of the pattern encodes the number of repeated frame
/// acquisitions, not a spatial axis. That is an instrument naming quirk;
/// the field is stored here under its actual meaning, `frames`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanDescriptor {
    /// Lateral samples per frame.
    pub x: usize,
    /// Number of repeated acquisitions.
    pub frames: usize,
    /// Depth samples per line.
    pub z: usize,
}

impl ScanDescriptor {
    /// Creates a descriptor, rejecting zero dimensions.
    ///
    /// # Errors
    /// Returns [`Error::Format`] if any dimension is zero.
    pub fn new(x: usize, frames: usize, z: usize) -> Result<Self> {
        if x == 0 || frames == 0 || z == 0 {
            return Err(Error::Format(format!(
                "zero dimension in X{x} Y{frames} Z{z}"
            )));
        }
        Ok(Self { x, frames, z })
    }

    /// Extracts scan dimensions from a file name.
    ///
    /// Looks for the pattern `X<digits> Y<digits> Z<digits>` anywhere in
    /// the name, e.g. `scan X512 Y8 Z1024.dat`.
    ///
    /// # Errors
    /// Returns [`Error::Format`] if the pattern is absent or a dimension
    /// is zero.
    pub fn from_file_name(name: &str) -> Result<Self> {
        for (idx, _) in name.match_indices('X') {
            if let Some((x, frames, z)) = parse_pattern(&name[idx..]) {
                return Self::new(x, frames, z);
            }
        }
        Err(Error::Format(name.to_string()))
    }

    /// Total number of samples the file must contain.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.x * self.frames * self.z
    }
}

/// Parses `X<digits> Y<digits> Z<digits>` anchored at the start of `s`.
fn parse_pattern(s: &str) -> Option<(usize, usize, usize)> {
    let s = s.strip_prefix('X')?;
    let (x, s) = take_number(s)?;
    let s = s.strip_prefix(" Y")?;
    let (frames, s) = take_number(s)?;
    let s = s.strip_prefix(" Z")?;
    let (z, _) = take_number(s)?;
    Some((x, frames, z))
}

/// Splits a leading run of ASCII digits off `s` and parses it.
fn take_number(s: &str) -> Option<(usize, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typical_name() {
        let d = ScanDescriptor::from_file_name("scan X512 Y8 Z1024.dat").unwrap();
        assert_eq!(d.x, 512);
        assert_eq!(d.frames, 8);
        assert_eq!(d.z, 1024);
        assert_eq!(d.sample_count(), 512 * 8 * 1024);
    }

    #[test]
    fn test_pattern_anywhere_in_name() {
        let d = ScanDescriptor::from_file_name("2024-03-01 sample7 X4 Y2 Z3 rep1.dat").unwrap();
        assert_eq!((d.x, d.frames, d.z), (4, 2, 3));
    }

    #[test]
    fn test_skips_false_x_prefixes() {
        // "Xylem" starts with X but carries no digits; the real pattern follows.
        let d = ScanDescriptor::from_file_name("Xylem X10 Y2 Z20.dat").unwrap();
        assert_eq!((d.x, d.frames, d.z), (10, 2, 20));
    }

    #[test]
    fn test_missing_pattern_is_format_error() {
        let err = ScanDescriptor::from_file_name("scan.dat").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_partial_pattern_is_format_error() {
        assert!(ScanDescriptor::from_file_name("scan X512 Y8.dat").is_err());
        assert!(ScanDescriptor::from_file_name("X512 Z1024.dat").is_err());
        assert!(ScanDescriptor::from_file_name("X512Y8 Z1024.dat").is_err());
    }

    #[test]
    fn test_zero_dimension_is_format_error() {
        let err = ScanDescriptor::from_file_name("scan X512 Y0 Z1024.dat").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
