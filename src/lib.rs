//! segy - SEG-Y reader/writer
//!
//! A pure Rust implementation of geometry-aware random access to SEG-Y
//! seismic files: traces, trace headers, inlines, crosslines and depth
//! slices of post-stack and offset-gathered volumes.
//!
//! # Features
//!
//! - IBM float, IEEE float and 8/16/32-bit integer sample formats
//! - Named and byte-offset access to every trace and binary header field
//! - Inline/crossline geometry inferred from the trace headers
//! - Python-style slicing over traces, lines and depth slices
//! - Volume creation from a [`VolumeSpec`], in files or in memory
//!
//! # Example
//!
//! ```rust,ignore
//! use segy::{OpenMode, SegyFile};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = SegyFile::open("data/small.sgy", OpenMode::Read)?;
//!
//! // Inline 3 at offset 0, shaped (crosslines, samples)
//! let line = file.iline().get(3)?;
//!
//! // Every trace at sample index 10, shaped (inlines, crosslines)
//! let slice = file.depth_slice().get(10)?;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod codec;
pub mod error;
pub mod field;
pub mod geometry;
pub mod header;
pub mod io;
pub mod layout;
pub mod line;
pub mod metadata;
pub mod slice;
pub mod trace;
pub mod types;
pub mod utils;

// Re-exports
pub use access::SegyFile;
pub use error::{Result, SegyError};
pub use field::{BinField, BinaryLayout, RecordLayout, TraceField, TraceLayout};
pub use geometry::{Geometry, LineSet};
pub use header::{BinaryHeader, FieldRef, Header, TraceHeader};
pub use io::{ByteStore, FileStore, MemoryStore, OpenMode};
pub use layout::FileLayout;
pub use line::{DepthSlice, Line};
pub use metadata::{GeometrySpec, SegyOptions, VolumeSpec};
pub use slice::SliceSpec;
pub use trace::{Headers, Traces};
pub use types::{LineKind, SampleFormat, Sorting};

/// Version of the segy implementation
pub const SEGY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Size of a textual file header, mandatory or extended
pub const TEXT_HEADER_SIZE: usize = 3200;

/// Size of the binary file header
pub const BINARY_HEADER_SIZE: usize = 400;

/// Size of a trace header
pub const TRACE_HEADER_SIZE: usize = 240;
