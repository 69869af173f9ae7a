//! On-disk layout of a SEG-Y file
//!
//! ```text
//! | text header | binary header | ext text headers | trace 0 | trace 1 | ...
//!   3200          400             3200 each          240 + samples x width
//! ```

use crate::error::{Result, SegyError};
use crate::field::BinField;
use crate::header::BinaryHeader;
use crate::types::SampleFormat;
use crate::{BINARY_HEADER_SIZE, TEXT_HEADER_SIZE, TRACE_HEADER_SIZE};
use serde::{Deserialize, Serialize};

/// Byte layout of the trace records of one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLayout {
    /// Samples per trace
    pub samples: usize,

    /// Sample encoding
    pub format: SampleFormat,

    /// Extended textual headers following the binary header
    pub ext_headers: usize,
}

impl FileLayout {
    pub fn new(samples: usize, format: SampleFormat, ext_headers: usize) -> Self {
        Self {
            samples,
            format,
            ext_headers,
        }
    }

    /// Read the layout from a binary header
    pub fn from_binary_header(bin: &BinaryHeader) -> Result<Self> {
        let format = SampleFormat::from_code(bin.get(BinField::Format)?)?;
        let samples = bin.get(BinField::Samples)?;
        let ext_headers = bin.get(BinField::ExtendedHeaders)?;
        if samples <= 0 {
            return Err(SegyError::InvalidFormat(format!(
                "binary header declares {} samples per trace",
                samples
            )));
        }
        if ext_headers < 0 {
            return Err(SegyError::InvalidFormat(format!(
                "binary header declares {} extended textual headers",
                ext_headers
            )));
        }
        Ok(Self::new(samples as usize, format, ext_headers as usize))
    }

    /// Byte offset of the first trace record
    pub fn trace0(&self) -> u64 {
        (TEXT_HEADER_SIZE + BINARY_HEADER_SIZE + TEXT_HEADER_SIZE * self.ext_headers) as u64
    }

    /// Size in bytes of one trace's sample data
    pub fn data_bsize(&self) -> usize {
        self.samples * self.format.size_in_bytes()
    }

    /// Size in bytes of one trace record, header included
    pub fn trace_bsize(&self) -> usize {
        TRACE_HEADER_SIZE + self.data_bsize()
    }

    /// Byte offset of the header of trace `index`
    pub fn header_offset(&self, index: usize) -> u64 {
        self.trace0() + index as u64 * self.trace_bsize() as u64
    }

    /// Byte offset of the samples of trace `index`
    pub fn data_offset(&self, index: usize) -> u64 {
        self.header_offset(index) + TRACE_HEADER_SIZE as u64
    }

    /// Byte offset of textual header `index`: 0 is the mandatory one,
    /// 1.. are the extended headers
    pub fn text_offset(&self, index: usize) -> Result<u64> {
        if index > self.ext_headers {
            return Err(SegyError::OutOfRange(format!(
                "textual header {} requested, file has {} extended headers",
                index, self.ext_headers
            )));
        }
        Ok(match index {
            0 => 0,
            k => (TEXT_HEADER_SIZE + BINARY_HEADER_SIZE + (k - 1) * TEXT_HEADER_SIZE) as u64,
        })
    }

    /// Number of traces in a file of `file_size` bytes
    pub fn tracecount(&self, file_size: u64) -> Result<usize> {
        let trace0 = self.trace0();
        if file_size < trace0 {
            return Err(SegyError::InvalidFormat(format!(
                "file of {} bytes is shorter than its headers ({} bytes)",
                file_size, trace0
            )));
        }
        let data = file_size - trace0;
        let bsize = self.trace_bsize() as u64;
        if data % bsize != 0 {
            return Err(SegyError::Structural(format!(
                "{} bytes of trace data is not a multiple of the {}-byte trace record",
                data, bsize
            )));
        }
        Ok((data / bsize) as usize)
    }

    /// Total file size holding `tracecount` traces
    pub fn file_size(&self, tracecount: usize) -> u64 {
        self.header_offset(tracecount)
    }
}
