//! Core data types for SEG-Y

use crate::error::{Result, SegyError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample formats (binary header data-format code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SampleFormat {
    /// 4-byte IBM floating point
    IbmFloat32 = 1,
    /// 4-byte two's complement integer
    Int32 = 2,
    /// 2-byte two's complement integer
    Int16 = 3,
    /// 4-byte IEEE floating point
    IeeeFloat32 = 5,
    /// 1-byte two's complement integer
    Int8 = 8,
}

impl SampleFormat {
    /// Resolve a data-format code. Fixed point with gain (4) is not supported.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(SampleFormat::IbmFloat32),
            2 => Ok(SampleFormat::Int32),
            3 => Ok(SampleFormat::Int16),
            5 => Ok(SampleFormat::IeeeFloat32),
            8 => Ok(SampleFormat::Int8),
            _ => Err(SegyError::InvalidFormat(format!(
                "unsupported data format code {}",
                code
            ))),
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Size in bytes of one sample
    pub fn size_in_bytes(&self) -> usize {
        match self {
            SampleFormat::IbmFloat32 | SampleFormat::Int32 | SampleFormat::IeeeFloat32 => 4,
            SampleFormat::Int16 => 2,
            SampleFormat::Int8 => 1,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleFormat::IbmFloat32 | SampleFormat::IeeeFloat32)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleFormat::IbmFloat32 => "IBM Float",
            SampleFormat::Int32 => "Int 32",
            SampleFormat::Int16 => "Int 16",
            SampleFormat::IeeeFloat32 => "IEEE Float",
            SampleFormat::Int8 => "Int 8",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which line number varies fastest across consecutive traces.
///
/// The numeric codes are the legacy ones: 1 means traces of a crossline
/// are contiguous, 2 means traces of an inline are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Sorting {
    Unknown = 0,
    /// Inline number varies fastest
    CrosslineMajor = 1,
    /// Crossline number varies fastest
    InlineMajor = 2,
}

impl Sorting {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Sorting::CrosslineMajor,
            2 => Sorting::InlineMajor,
            _ => Sorting::Unknown,
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Sorting::Unknown)
    }
}

impl fmt::Display for Sorting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sorting::Unknown => "unknown",
            Sorting::CrosslineMajor => "crossline-major",
            Sorting::InlineMajor => "inline-major",
        };
        f.write_str(name)
    }
}

/// Line direction in the survey grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Inline,
    Crossline,
}

impl LineKind {
    /// The perpendicular direction, i.e. the axis positions along a line run over
    pub fn other(&self) -> Self {
        match self {
            LineKind::Inline => LineKind::Crossline,
            LineKind::Crossline => LineKind::Inline,
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Inline => f.write_str("inline"),
            LineKind::Crossline => f.write_str("crossline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_format_sizes() {
        assert_eq!(SampleFormat::IbmFloat32.size_in_bytes(), 4);
        assert_eq!(SampleFormat::Int16.size_in_bytes(), 2);
        assert_eq!(SampleFormat::Int8.size_in_bytes(), 1);
        assert_eq!(SampleFormat::IeeeFloat32.size_in_bytes(), 4);
    }

    #[test]
    fn test_sample_format_codes() {
        assert_eq!(SampleFormat::from_code(5).unwrap(), SampleFormat::IeeeFloat32);
        assert_eq!(SampleFormat::from_code(1).unwrap().code(), 1);
        assert!(matches!(
            SampleFormat::from_code(4),
            Err(SegyError::InvalidFormat(_))
        ));
        assert!(SampleFormat::from_code(0).is_err());
    }

    #[test]
    fn test_sorting_codes() {
        assert_eq!(Sorting::from_code(2), Sorting::InlineMajor);
        assert_eq!(Sorting::from_code(1), Sorting::CrosslineMajor);
        assert_eq!(Sorting::from_code(7), Sorting::Unknown);
        assert_eq!(Sorting::InlineMajor.code(), 2);
        assert!(!Sorting::Unknown.is_known());
    }

    #[test]
    fn test_line_kind_other() {
        assert_eq!(LineKind::Inline.other(), LineKind::Crossline);
        assert_eq!(LineKind::Crossline.other(), LineKind::Inline);
    }
}
