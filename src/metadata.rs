//! Session options and volume descriptions

use crate::error::{Result, SegyError};
use crate::field::TraceField;
use crate::layout::FileLayout;
use crate::types::{SampleFormat, Sorting};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sample interval written into new files when none is given, in microseconds
pub const DEFAULT_INTERVAL_US: i32 = 4000;

fn default_iline() -> TraceField {
    TraceField::Inline3D
}

fn default_xline() -> TraceField {
    TraceField::Crossline3D
}

fn default_offsets() -> usize {
    1
}

fn default_interval() -> i32 {
    DEFAULT_INTERVAL_US
}

/// How an existing file is interpreted when opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegyOptions {
    /// Trace header field holding the inline number
    #[serde(default = "default_iline")]
    pub iline: TraceField,

    /// Trace header field holding the crossline number
    #[serde(default = "default_xline")]
    pub xline: TraceField,

    /// Time of the first sample, in milliseconds
    #[serde(default)]
    pub t0: f64,

    /// Treat irregular geometry and unknown sorting as errors
    #[serde(default)]
    pub strict: bool,
}

impl Default for SegyOptions {
    fn default() -> Self {
        Self {
            iline: default_iline(),
            xline: default_xline(),
            t0: 0.0,
            strict: false,
        }
    }
}

impl SegyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iline(mut self, field: TraceField) -> Self {
        self.iline = field;
        self
    }

    pub fn with_xline(mut self, field: TraceField) -> Self {
        self.xline = field;
        self
    }

    /// Set both line fields at once
    pub fn with_fields(self, iline: TraceField, xline: TraceField) -> Self {
        self.with_iline(iline).with_xline(xline)
    }

    pub fn with_t0(mut self, t0: f64) -> Self {
        self.t0 = t0;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Geometry parameters of an open volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometrySpec {
    pub format: SampleFormat,
    pub sorting: Sorting,
    pub samples: usize,
    pub iline: TraceField,
    pub xline: TraceField,
}

/// Everything needed to lay out a new file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub format: SampleFormat,
    pub sorting: Sorting,
    pub samples: usize,

    /// Inline numbers, in on-disk order
    pub ilines: Vec<i32>,

    /// Crossline numbers, in on-disk order
    pub xlines: Vec<i32>,

    /// Traces per (inline, crossline) pair
    #[serde(default = "default_offsets")]
    pub offsets: usize,

    /// Sample interval in microseconds
    #[serde(default = "default_interval")]
    pub interval: i32,

    #[serde(default = "default_iline")]
    pub iline: TraceField,

    #[serde(default = "default_xline")]
    pub xline: TraceField,

    /// Extended textual headers after the binary header
    #[serde(default)]
    pub ext_headers: usize,
}

impl VolumeSpec {
    pub fn new(
        format: SampleFormat,
        sorting: Sorting,
        samples: usize,
        ilines: Vec<i32>,
        xlines: Vec<i32>,
    ) -> Self {
        Self {
            format,
            sorting,
            samples,
            ilines,
            xlines,
            offsets: default_offsets(),
            interval: default_interval(),
            iline: default_iline(),
            xline: default_xline(),
            ext_headers: 0,
        }
    }

    pub fn with_offsets(mut self, offsets: usize) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn with_interval(mut self, interval_us: i32) -> Self {
        self.interval = interval_us;
        self
    }

    pub fn with_fields(mut self, iline: TraceField, xline: TraceField) -> Self {
        self.iline = iline;
        self.xline = xline;
        self
    }

    pub fn with_ext_headers(mut self, ext_headers: usize) -> Self {
        self.ext_headers = ext_headers;
        self
    }

    /// Number of trace records the volume holds
    pub fn tracecount(&self) -> usize {
        self.ilines.len() * self.xlines.len() * self.offsets
    }

    pub fn layout(&self) -> FileLayout {
        FileLayout::new(self.samples, self.format, self.ext_headers)
    }

    pub fn geometry(&self) -> GeometrySpec {
        GeometrySpec {
            format: self.format,
            sorting: self.sorting,
            samples: self.samples,
            iline: self.iline,
            xline: self.xline,
        }
    }

    /// Reject specifications that cannot describe a regular cube
    pub fn validate(&self) -> Result<()> {
        if !self.sorting.is_known() {
            return Err(SegyError::InvalidArgument(
                "a new volume needs inline-major or crossline-major sorting".to_string(),
            ));
        }
        if self.samples == 0 || self.samples > i16::MAX as usize {
            return Err(SegyError::InvalidArgument(format!(
                "cannot create traces of {} samples",
                self.samples
            )));
        }
        if self.offsets == 0 {
            return Err(SegyError::InvalidArgument(
                "offsets per line pair must be at least 1".to_string(),
            ));
        }
        if self.iline == self.xline {
            return Err(SegyError::InvalidArgument(format!(
                "inline and crossline cannot share the field {}",
                self.iline
            )));
        }
        if i16::try_from(self.interval).is_err() {
            return Err(SegyError::InvalidArgument(format!(
                "sample interval {} does not fit the 2-byte interval fields",
                self.interval
            )));
        }
        if self.ext_headers > i16::MAX as usize {
            return Err(SegyError::InvalidArgument(format!(
                "{} extended textual headers do not fit the binary header",
                self.ext_headers
            )));
        }
        if i32::try_from(self.offsets).is_err() {
            return Err(SegyError::InvalidArgument(format!(
                "{} offsets do not fit the offset field",
                self.offsets
            )));
        }
        for (kind, lines, field) in [
            ("inline", &self.ilines, self.iline),
            ("crossline", &self.xlines, self.xline),
        ] {
            if lines.is_empty() {
                return Err(SegyError::InvalidArgument(format!("no {} numbers given", kind)));
            }
            if field.width() == 2 {
                if let Some(line) = lines.iter().find(|&&line| i16::try_from(line).is_err()) {
                    return Err(SegyError::InvalidArgument(format!(
                        "{} number {} does not fit the 2-byte field {}",
                        kind, line, field
                    )));
                }
            }
            let mut seen = HashSet::with_capacity(lines.len());
            if let Some(dup) = lines.iter().find(|&&line| !seen.insert(line)) {
                return Err(SegyError::InvalidArgument(format!(
                    "{} number {} is listed twice",
                    kind, dup
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
