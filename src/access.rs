//! SEG-Y file sessions - main API for reading/writing volumes

use crate::codec;
use crate::error::{Result, SegyError};
use crate::field::{BinField, TraceField, TraceLayout};
use crate::geometry::Geometry;
use crate::header::{BinaryHeader, FieldRef, Header, TraceHeader};
use crate::io::{ByteStore, FileStore, OpenMode};
use crate::layout::FileLayout;
use crate::line::{DepthSlice, Line};
use crate::metadata::{GeometrySpec, SegyOptions, VolumeSpec};
use crate::trace::{Headers, Traces};
use crate::types::{LineKind, SampleFormat, Sorting};
use crate::utils;
use crate::{BINARY_HEADER_SIZE, TEXT_HEADER_SIZE, TRACE_HEADER_SIZE};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Sample interval assumed when the headers do not settle it, in milliseconds
pub const DEFAULT_SAMPLE_INTERVAL_MS: f64 = 4.0;

/// An open SEG-Y file
///
/// The session owns its byte store exclusively. Geometry is computed once
/// at open/create and never changes; every read and write goes straight to
/// the store.
pub struct SegyFile {
    store: Mutex<Box<dyn ByteStore>>,
    layout: FileLayout,
    geometry: Geometry,
    options: SegyOptions,
    writable: bool,
    dirty: AtomicBool,
}

impl std::fmt::Debug for SegyFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegyFile")
            .field("layout", &self.layout)
            .field("geometry", &self.geometry)
            .field("options", &self.options)
            .field("writable", &self.writable)
            .finish()
    }
}

impl SegyFile {
    /// Open an existing file with default options
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        Self::open_with(path, mode, SegyOptions::default())
    }

    /// Open an existing file
    pub fn open_with(path: impl AsRef<Path>, mode: OpenMode, options: SegyOptions) -> Result<Self> {
        if mode == OpenMode::Create {
            return Err(SegyError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "cannot open for reading in create mode, use SegyFile::create",
            )));
        }
        let path = path.as_ref();
        debug!(path = %path.display(), ?mode, "opening SEG-Y file");
        let store = FileStore::open(path, mode)?;
        Self::from_store(Box::new(store), options)
    }

    /// Interpret an existing byte store as a SEG-Y file, scanning every
    /// trace header to build the geometry
    pub fn from_store(mut store: Box<dyn ByteStore>, options: SegyOptions) -> Result<Self> {
        let size = store.size()?;
        if size < (TEXT_HEADER_SIZE + BINARY_HEADER_SIZE) as u64 {
            return Err(SegyError::InvalidFormat(format!(
                "{} bytes is too short for a SEG-Y file",
                size
            )));
        }

        let mut bin = vec![0u8; BINARY_HEADER_SIZE];
        store.read_at(TEXT_HEADER_SIZE as u64, &mut bin)?;
        let layout = FileLayout::from_binary_header(&BinaryHeader::from_bytes(bin)?)?;
        let tracecount = layout.tracecount(size)?;

        let mut pairs = Vec::with_capacity(tracecount);
        let mut buf = vec![0u8; TRACE_HEADER_SIZE];
        for index in 0..tracecount {
            store.read_at(layout.header_offset(index), &mut buf)?;
            let header = Header::<TraceLayout, _>::view(&buf[..])?;
            pairs.push((header.get(options.iline)?, header.get(options.xline)?));
        }
        let geometry = Geometry::scan(&pairs, options.strict)?;

        info!(
            tracecount,
            samples = layout.samples,
            format = %layout.format,
            sorting = %geometry.sorting(),
            ilines = geometry.ilines().len(),
            xlines = geometry.xlines().len(),
            offsets = geometry.offsets(),
            "opened SEG-Y file"
        );

        let writable = store.is_writable();
        Ok(Self {
            store: Mutex::new(store),
            layout,
            geometry,
            options,
            writable,
            dirty: AtomicBool::new(false),
        })
    }

    /// Create a new file laid out for `spec`, truncating any existing file
    pub fn create(path: impl AsRef<Path>, spec: &VolumeSpec) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "creating SEG-Y file");
        let store = FileStore::open(path, OpenMode::Create)?;
        Self::create_in(Box::new(store), spec)
    }

    /// Lay out a new volume in `store`.
    ///
    /// Writes a default textual header, a binary header carrying samples,
    /// interval, format and extended header count, and stamps every trace
    /// header with its line numbers. Sample data starts zeroed.
    pub fn create_in(mut store: Box<dyn ByteStore>, spec: &VolumeSpec) -> Result<Self> {
        let geometry = Geometry::from_spec(spec)?;
        let layout = spec.layout();
        if !store.is_writable() {
            return Err(SegyError::read_only());
        }

        // every header is built before the store is touched, so a spec that
        // does not fit its fields leaves an existing file alone
        let mut bin = BinaryHeader::new();
        bin.set_many([
            (BinField::Samples, to_field_value(spec.samples)?),
            (BinField::Interval, spec.interval),
            (BinField::Format, spec.format.code()),
            (BinField::ExtendedHeaders, to_field_value(spec.ext_headers)?),
        ])?;

        let tracecount = geometry.tracecount();
        let mut template = TraceHeader::new();
        template.set_many([
            (TraceField::SampleCount, to_field_value(spec.samples)?),
            (TraceField::SampleInterval, spec.interval),
        ])?;
        let headers = (0..tracecount)
            .map(|index| -> Result<TraceHeader> {
                let (il_pos, xl_pos, offset) = geometry.grid_position(index);
                let il = geometry.ilines().get(il_pos).unwrap_or_default();
                let xl = geometry.xlines().get(xl_pos).unwrap_or_default();
                let mut header = template.clone();
                header.set_many([
                    (FieldRef::Field(TraceField::Offset), to_field_value(offset + 1)?),
                    (FieldRef::Field(spec.iline), il),
                    (FieldRef::Field(spec.xline), xl),
                ])?;
                Ok(header)
            })
            .collect::<Result<Vec<_>>>()?;

        store.set_len(0)?;
        store.set_len(layout.file_size(tracecount))?;

        store.write_at(0, &utils::ascii_to_ebcdic(&utils::default_text_header()))?;
        for index in 1..=spec.ext_headers {
            store.write_at(layout.text_offset(index)?, &utils::ascii_to_ebcdic(""))?;
        }
        store.write_at(TEXT_HEADER_SIZE as u64, bin.as_bytes())?;
        for (index, header) in headers.iter().enumerate() {
            store.write_at(layout.header_offset(index), header.as_bytes())?;
        }

        info!(
            tracecount,
            samples = layout.samples,
            format = %layout.format,
            sorting = %geometry.sorting(),
            "created SEG-Y file"
        );

        let options = SegyOptions::default().with_fields(spec.iline, spec.xline);
        Ok(Self {
            store: Mutex::new(store),
            layout,
            geometry,
            options,
            writable: true,
            dirty: AtomicBool::new(true),
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    pub fn options(&self) -> &SegyOptions {
        &self.options
    }

    pub fn tracecount(&self) -> usize {
        self.geometry.tracecount()
    }

    pub fn samples(&self) -> usize {
        self.layout.samples
    }

    pub fn format(&self) -> SampleFormat {
        self.layout.format
    }

    pub fn sorting(&self) -> Sorting {
        self.geometry.sorting()
    }

    pub fn offsets(&self) -> usize {
        self.geometry.offsets()
    }

    pub fn ilines(&self) -> &[i32] {
        self.geometry.ilines().numbers()
    }

    pub fn xlines(&self) -> &[i32] {
        self.geometry.xlines().numbers()
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Geometry parameters of this session
    pub fn geometry_spec(&self) -> GeometrySpec {
        GeometrySpec {
            format: self.layout.format,
            sorting: self.geometry.sorting(),
            samples: self.layout.samples,
            iline: self.options.iline,
            xline: self.options.xline,
        }
    }

    /// Geometry parameters as JSON
    pub fn geometry_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.geometry_spec())?)
    }

    /// A specification that creates a file with this file's layout and geometry
    pub fn volume_spec(&self) -> Result<VolumeSpec> {
        let interval = self.bin()?.get(BinField::Interval)?;
        Ok(VolumeSpec::new(
            self.layout.format,
            self.geometry.sorting(),
            self.layout.samples,
            self.ilines().to_vec(),
            self.xlines().to_vec(),
        )
        .with_offsets(self.geometry.offsets())
        .with_interval(interval)
        .with_fields(self.options.iline, self.options.xline)
        .with_ext_headers(self.layout.ext_headers))
    }

    /// Sample data by raw trace index
    pub fn traces(&self) -> Traces<'_> {
        Traces::new(self)
    }

    /// Trace headers by raw trace index
    pub fn headers(&self) -> Headers<'_> {
        Headers::new(self)
    }

    /// Lines of one direction
    pub fn line(&self, kind: LineKind) -> Line<'_> {
        Line::new(self, kind)
    }

    pub fn iline(&self) -> Line<'_> {
        self.line(LineKind::Inline)
    }

    pub fn xline(&self) -> Line<'_> {
        self.line(LineKind::Crossline)
    }

    /// Horizontal slices at constant sample index
    pub fn depth_slice(&self) -> DepthSlice<'_> {
        DepthSlice::new(self)
    }

    /// Textual header `index` as text: 0 is the mandatory header, 1.. the
    /// extended ones. Every byte decodes to one character, so writing the
    /// result back with [`write_text`](Self::write_text) restores the bytes.
    pub fn text(&self, index: usize) -> Result<String> {
        Ok(utils::ebcdic_to_ascii(&self.text_bytes(index)?))
    }

    /// Write textual header `index`, padded with blanks or truncated to 3200 bytes
    pub fn write_text(&self, index: usize, text: &str) -> Result<()> {
        self.write_text_bytes(index, &utils::ascii_to_ebcdic(text))
    }

    /// Raw bytes of textual header `index`, without any character decoding
    pub fn text_bytes(&self, index: usize) -> Result<Vec<u8>> {
        let offset = self.layout.text_offset(index)?;
        let mut buf = vec![0u8; TEXT_HEADER_SIZE];
        self.read_bytes(offset, &mut buf)?;
        Ok(buf)
    }

    /// Overwrite textual header `index` with exactly 3200 raw bytes
    pub fn write_text_bytes(&self, index: usize, bytes: &[u8]) -> Result<()> {
        if bytes.len() != TEXT_HEADER_SIZE {
            return Err(SegyError::LengthMismatch {
                expected: TEXT_HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let offset = self.layout.text_offset(index)?;
        self.write_bytes(offset, bytes)
    }

    /// Copy of the binary header
    pub fn bin(&self) -> Result<BinaryHeader> {
        let mut buf = vec![0u8; BINARY_HEADER_SIZE];
        self.read_bytes(TEXT_HEADER_SIZE as u64, &mut buf)?;
        BinaryHeader::from_bytes(buf)
    }

    /// Replace the binary header. The session keeps the layout it was opened with.
    pub fn write_bin(&self, bin: &BinaryHeader) -> Result<()> {
        self.write_bytes(TEXT_HEADER_SIZE as u64, bin.as_bytes())
    }

    /// Apply ordered field assignments to the binary header; later entries win
    pub fn update_bin<K, I>(&self, assignments: I) -> Result<()>
    where
        K: Into<FieldRef<BinField>>,
        I: IntoIterator<Item = (K, i32)>,
    {
        let mut bin = self.bin()?;
        bin.set_many(assignments)?;
        self.write_bin(&bin)
    }

    /// Sample interval in milliseconds.
    ///
    /// Taken from the binary header and trace 0. When only one is set that
    /// one wins; when both are set and disagree the default of 4 ms is used.
    pub fn sample_interval(&self) -> Result<f64> {
        let bin_us = self.bin()?.get(BinField::Interval)?;
        let trace_us = if self.tracecount() > 0 {
            self.read_header(0)?.get(TraceField::SampleInterval)?
        } else {
            0
        };
        let dt = match (bin_us, trace_us) {
            (0, 0) => DEFAULT_SAMPLE_INTERVAL_MS,
            (0, us) | (us, 0) => us as f64 / 1000.0,
            (a, b) if a == b => a as f64 / 1000.0,
            (a, b) => {
                warn!(
                    binary = a,
                    trace = b,
                    "binary and trace header sample intervals disagree, using default"
                );
                DEFAULT_SAMPLE_INTERVAL_MS
            }
        };
        Ok(dt)
    }

    /// Time of every sample: `t0 + i * dt`
    pub fn sample_indexes(&self) -> Result<Vec<f64>> {
        let dt = self.sample_interval()?;
        let t0 = self.options.t0;
        Ok((0..self.samples()).map(|i| t0 + i as f64 * dt).collect())
    }

    /// Force buffered writes to the store
    pub fn flush(&self) -> Result<()> {
        self.store.lock().flush()?;
        self.dirty.store(false, Ordering::Release);
        Ok(())
    }

    /// Flush and release the session
    pub fn close(self) -> Result<()> {
        if self.dirty.load(Ordering::Acquire) {
            self.flush()?;
        }
        Ok(())
    }

    /// One-line description of the volume
    pub fn summary(&self) -> String {
        format!(
            "SEG-Y volume: {} traces ({} inlines x {} crosslines x {} offsets), {} samples, {}, {}, {}",
            self.tracecount(),
            self.geometry.ilines().len(),
            self.geometry.xlines().len(),
            self.offsets(),
            self.samples(),
            self.format(),
            self.sorting(),
            utils::format_bytes(self.layout.file_size(self.tracecount())),
        )
    }

    pub(crate) fn check_trace(&self, index: usize) -> Result<()> {
        if index >= self.tracecount() {
            return Err(SegyError::OutOfRange(format!(
                "trace {} requested, file has {} traces",
                index,
                self.tracecount()
            )));
        }
        Ok(())
    }

    pub(crate) fn read_bytes(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.store.lock().read_at(offset, buf)
    }

    pub(crate) fn write_bytes(&self, offset: u64, data: &[u8]) -> Result<()> {
        if !self.writable {
            return Err(SegyError::read_only());
        }
        self.store.lock().write_at(offset, data)?;
        self.dirty.store(true, Ordering::Release);
        Ok(())
    }

    /// Decode the samples of trace `index` into `out`, using `scratch` for the raw bytes
    pub(crate) fn read_samples_into(
        &self,
        index: usize,
        scratch: &mut Vec<u8>,
        out: &mut [f32],
    ) -> Result<()> {
        self.check_trace(index)?;
        scratch.resize(self.layout.data_bsize(), 0);
        self.read_bytes(self.layout.data_offset(index), scratch)?;
        codec::decode_samples(scratch, self.layout.format, out)
    }

    /// Encode and write the samples of trace `index`. Nothing is written on error.
    pub(crate) fn write_samples<'a, I>(&self, index: usize, samples: I, count: usize) -> Result<()>
    where
        I: IntoIterator<Item = &'a f32>,
    {
        self.check_trace(index)?;
        if count != self.layout.samples {
            return Err(SegyError::LengthMismatch {
                expected: self.layout.samples,
                actual: count,
            });
        }
        let mut bytes = vec![0u8; self.layout.data_bsize()];
        codec::encode_samples(samples, self.layout.format, &mut bytes)?;
        self.write_bytes(self.layout.data_offset(index), &bytes)
    }

    /// One sample of trace `index`
    pub(crate) fn read_sample(&self, index: usize, sample: usize) -> Result<f32> {
        let width = self.layout.format.size_in_bytes();
        let mut buf = [0u8; 4];
        let offset = self.layout.data_offset(index) + (sample * width) as u64;
        self.read_bytes(offset, &mut buf[..width])?;
        Ok(codec::decode_sample(&buf[..width], self.layout.format))
    }

    pub(crate) fn write_sample(&self, index: usize, sample: usize, value: f32) -> Result<()> {
        let width = self.layout.format.size_in_bytes();
        let mut buf = [0u8; 4];
        codec::encode_sample(value, self.layout.format, &mut buf[..width])?;
        let offset = self.layout.data_offset(index) + (sample * width) as u64;
        self.write_bytes(offset, &buf[..width])
    }

    pub(crate) fn read_header(&self, index: usize) -> Result<TraceHeader> {
        self.check_trace(index)?;
        let mut buf = vec![0u8; TRACE_HEADER_SIZE];
        self.read_bytes(self.layout.header_offset(index), &mut buf)?;
        TraceHeader::from_bytes(buf)
    }

    pub(crate) fn write_header(&self, index: usize, header: &[u8]) -> Result<()> {
        self.check_trace(index)?;
        if header.len() != TRACE_HEADER_SIZE {
            return Err(SegyError::LengthMismatch {
                expected: TRACE_HEADER_SIZE,
                actual: header.len(),
            });
        }
        self.write_bytes(self.layout.header_offset(index), header)
    }
}

impl Drop for SegyFile {
    fn drop(&mut self) {
        if self.dirty.load(Ordering::Acquire) {
            if let Err(err) = self.store.get_mut().flush() {
                warn!(error = %err, "flush on drop failed, recent writes may be lost");
            }
        }
    }
}

fn to_field_value(value: usize) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| SegyError::OutOfRange(format!("{} does not fit in a header field", value)))
}
