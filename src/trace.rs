//! Trace store: sample arrays and trace headers by raw trace index

use crate::access::SegyFile;
use crate::error::{Result, SegyError};
use crate::field::{TraceField, TraceLayout};
use crate::header::{FieldRef, Header, TraceHeader};
use crate::slice::{SlicePositions, SliceSpec};
use crate::types::LineKind;
use ndarray::{Array1, Array2, ArrayView1, AsArray};

/// Sample data of every trace, addressed by raw index
#[derive(Debug, Clone, Copy)]
pub struct Traces<'a> {
    file: &'a SegyFile,
}

impl<'a> Traces<'a> {
    pub(crate) fn new(file: &'a SegyFile) -> Self {
        Self { file }
    }

    pub fn len(&self) -> usize {
        self.file.tracecount()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples of trace `index`
    pub fn read(&self, index: usize) -> Result<Array1<f32>> {
        self.read_raw(index)
    }

    /// Samples of trace `index` exactly as decoded from disk.
    ///
    /// Identical to [`read`](Self::read) while no value transform exists.
    pub fn read_raw(&self, index: usize) -> Result<Array1<f32>> {
        let mut out = Array1::zeros(self.file.samples());
        let mut scratch = Vec::new();
        if let Some(samples) = out.as_slice_mut() {
            self.file.read_samples_into(index, &mut scratch, samples)?;
        }
        Ok(out)
    }

    /// Decode trace `index` into a caller-owned buffer of exactly `samples` values
    pub fn read_into(&self, index: usize, out: &mut [f32]) -> Result<()> {
        self.check_buffer(out.len())?;
        self.file.read_samples_into(index, &mut Vec::new(), out)
    }

    /// Every selected trace as one row of a (traces, samples) array
    pub fn read_raw_block(&self, slice: impl Into<SliceSpec>) -> Result<Array2<f32>> {
        let positions = slice.into().positions(self.len())?;
        let rows = positions.len();
        let samples = self.file.samples();
        let mut data = vec![0f32; rows * samples];
        let mut scratch = Vec::new();
        for (index, row) in positions.zip(data.chunks_exact_mut(samples.max(1))) {
            self.file.read_samples_into(index, &mut scratch, row)?;
        }
        Ok(Array2::from_shape_vec((rows, samples), data)?)
    }

    /// Overwrite the samples of trace `index`
    pub fn write<'b, A: AsArray<'b, f32>>(&self, index: usize, samples: A) -> Result<()> {
        let samples: ArrayView1<'b, f32> = samples.into();
        self.file.write_samples(index, samples.iter(), samples.len())
    }

    /// Lazily read the selected traces, allocating one array per trace
    pub fn iter(&self, slice: impl Into<SliceSpec>) -> Result<TraceIter<'a>> {
        Ok(TraceIter {
            file: self.file,
            positions: slice.into().positions(self.len())?,
            scratch: Vec::new(),
        })
    }

    /// Lazily read the selected traces into `buf`, which is overwritten on
    /// every step; each view must be dropped before advancing.
    pub fn cursor<'b>(
        &self,
        slice: impl Into<SliceSpec>,
        buf: &'b mut [f32],
    ) -> Result<TraceCursor<'a, 'b>> {
        self.check_buffer(buf.len())?;
        Ok(TraceCursor {
            file: self.file,
            positions: slice.into().positions(self.len())?,
            scratch: Vec::new(),
            buf,
        })
    }

    fn check_buffer(&self, len: usize) -> Result<()> {
        if len != self.file.samples() {
            return Err(SegyError::LengthMismatch {
                expected: self.file.samples(),
                actual: len,
            });
        }
        Ok(())
    }
}

/// Iterator over selected traces
pub struct TraceIter<'a> {
    file: &'a SegyFile,
    positions: SlicePositions,
    scratch: Vec<u8>,
}

impl Iterator for TraceIter<'_> {
    type Item = Result<Array1<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.positions.next()?;
        let mut out = vec![0f32; self.file.samples()];
        Some(
            self.file
                .read_samples_into(index, &mut self.scratch, &mut out)
                .map(|_| Array1::from_vec(out)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for TraceIter<'_> {}

/// Buffer-reusing walk over selected traces
pub struct TraceCursor<'a, 'b> {
    file: &'a SegyFile,
    positions: SlicePositions,
    scratch: Vec<u8>,
    buf: &'b mut [f32],
}

impl TraceCursor<'_, '_> {
    /// Read the next trace into the shared buffer and return a view of it
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<ArrayView1<'_, f32>>> {
        let index = self.positions.next()?;
        Some(
            self.file
                .read_samples_into(index, &mut self.scratch, self.buf)
                .map(|_| ArrayView1::from(&*self.buf)),
        )
    }

    /// Traces left to visit
    pub fn remaining(&self) -> usize {
        self.positions.len()
    }
}

/// Trace headers of every trace, addressed by raw index
#[derive(Debug, Clone, Copy)]
pub struct Headers<'a> {
    file: &'a SegyFile,
}

impl<'a> Headers<'a> {
    pub(crate) fn new(file: &'a SegyFile) -> Self {
        Self { file }
    }

    pub fn len(&self) -> usize {
        self.file.tracecount()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the header of trace `index`
    pub fn get(&self, index: usize) -> Result<TraceHeader> {
        self.file.read_header(index)
    }

    /// Replace the header of trace `index`
    pub fn set<B: AsRef<[u8]>>(&self, index: usize, header: &Header<TraceLayout, B>) -> Result<()> {
        self.file.write_header(index, header.as_bytes())
    }

    /// Apply ordered field assignments to one header; later entries win
    pub fn update<K, I>(&self, index: usize, assignments: I) -> Result<()>
    where
        K: Into<FieldRef<TraceField>>,
        I: IntoIterator<Item = (K, i32)>,
    {
        let mut header = self.get(index)?;
        header.set_many(assignments)?;
        self.set(index, &header)
    }

    /// Lazily read the selected headers
    pub fn iter(
        &self,
        slice: impl Into<SliceSpec>,
    ) -> Result<impl ExactSizeIterator<Item = Result<TraceHeader>> + 'a> {
        self.iter_positions(slice.into())
    }

    fn iter_positions(
        &self,
        slice: SliceSpec,
    ) -> Result<impl ExactSizeIterator<Item = Result<TraceHeader>> + 'a> {
        let file = self.file;
        let positions = slice.positions(self.len())?;
        Ok(positions.map(move |index| file.read_header(index)))
    }

    /// Apply the same assignments to every trace header.
    ///
    /// Assignments are validated before the first write.
    pub fn update_all<K, I>(&self, assignments: I) -> Result<()>
    where
        K: Into<FieldRef<TraceField>>,
        I: IntoIterator<Item = (K, i32)>,
    {
        let assignments = resolve(assignments)?;
        for index in 0..self.len() {
            self.update(index, assignments.iter().cloned())?;
        }
        Ok(())
    }

    /// Copy every header of `other` over the headers of this file
    pub fn copy_from(&self, other: &Headers<'_>) -> Result<()> {
        if other.len() != self.len() {
            return Err(SegyError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        for index in 0..self.len() {
            self.set(index, &other.get(index)?)?;
        }
        Ok(())
    }

    /// Raw indices of every trace on one line, position-major then offset
    fn line_indices(&self, kind: LineKind, line: i32) -> Result<Vec<usize>> {
        let geometry = self.file.geometry();
        let mut indices = Vec::with_capacity(geometry.line_length(kind) * geometry.offsets());
        for position in 0..geometry.line_length(kind) {
            for offset in 0..geometry.offsets() {
                indices.push(geometry.line_to_trace_index(kind, line, position, offset)?);
            }
        }
        Ok(indices)
    }

    /// Headers of every trace on one line, offsets included
    pub fn line(&self, kind: LineKind, line: i32) -> Result<Vec<TraceHeader>> {
        self.line_indices(kind, line)?
            .into_iter()
            .map(|index| self.get(index))
            .collect()
    }

    /// Apply the same assignments to every trace header on one line
    pub fn update_line<K, I>(&self, kind: LineKind, line: i32, assignments: I) -> Result<()>
    where
        K: Into<FieldRef<TraceField>>,
        I: IntoIterator<Item = (K, i32)>,
    {
        let assignments = resolve(assignments)?;
        for index in self.line_indices(kind, line)? {
            self.update(index, assignments.iter().cloned())?;
        }
        Ok(())
    }
}

/// Collect assignments and check them against a blank header
fn resolve<K, I>(assignments: I) -> Result<Vec<(FieldRef<TraceField>, i32)>>
where
    K: Into<FieldRef<TraceField>>,
    I: IntoIterator<Item = (K, i32)>,
{
    let assignments: Vec<(FieldRef<TraceField>, i32)> = assignments
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .collect();
    TraceHeader::new().set_many(assignments.iter().cloned())?;
    Ok(assignments)
}
