//! Inline, crossline and depth-slice views
//!
//! Lines are addressed by line number; slices over lines select ordinal
//! positions in the line set. Depth slices are addressed by sample index.

use crate::access::SegyFile;
use crate::error::{Result, SegyError};
use crate::slice::{SlicePositions, SliceSpec};
use crate::types::LineKind;
use ndarray::{aview1, Array2, ArrayView2, AsArray, Ix2};

fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        return Err(SegyError::LengthMismatch {
            expected: expected.0 * expected.1,
            actual: actual.0 * actual.1,
        });
    }
    Ok(())
}

/// Collect bulk sources, failing before any write if the count or a shape is off
fn collect_sources<'b, A, I>(
    sources: I,
    count: usize,
    shape: (usize, usize),
) -> Result<Vec<ArrayView2<'b, f32>>>
where
    A: AsArray<'b, f32, Ix2>,
    I: IntoIterator<Item = A>,
{
    let sources: Vec<ArrayView2<'b, f32>> = sources.into_iter().map(Into::into).collect();
    if sources.len() != count {
        return Err(SegyError::LengthMismatch {
            expected: count,
            actual: sources.len(),
        });
    }
    for source in &sources {
        check_shape(shape, source.dim())?;
    }
    Ok(sources)
}

/// All lines of one direction
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    file: &'a SegyFile,
    kind: LineKind,
}

impl<'a> Line<'a> {
    pub(crate) fn new(file: &'a SegyFile, kind: LineKind) -> Self {
        Self { file, kind }
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.file.geometry().lines(self.kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Line numbers in on-disk order
    pub fn lines(&self) -> &'a [i32] {
        self.file.geometry().lines(self.kind).numbers()
    }

    /// Traces along one line
    pub fn line_length(&self) -> usize {
        self.file.geometry().line_length(self.kind)
    }

    /// Shape of one line: (traces along the line, samples)
    pub fn shape(&self) -> (usize, usize) {
        (self.line_length(), self.file.samples())
    }

    /// Line `line` at offset index 0
    pub fn get(&self, line: i32) -> Result<Array2<f32>> {
        self.get_offset(line, 0)
    }

    /// Line `line` at offset index `offset`
    pub fn get_offset(&self, line: i32, offset: usize) -> Result<Array2<f32>> {
        let mut out = Array2::zeros(self.shape());
        self.read_into(line, offset, &mut out)?;
        Ok(out)
    }

    /// Read line `line` into a caller-owned array of the line's shape
    pub fn get_into(&self, line: i32, out: &mut Array2<f32>) -> Result<()> {
        self.read_into(line, 0, out)
    }

    fn read_into(&self, line: i32, offset: usize, out: &mut Array2<f32>) -> Result<()> {
        check_shape(self.shape(), out.dim())?;
        let geometry = self.file.geometry();
        let mut scratch = Vec::new();
        let mut samples = vec![0f32; self.file.samples()];
        for (position, mut row) in out.outer_iter_mut().enumerate() {
            let index = geometry.line_to_trace_index(self.kind, line, position, offset)?;
            self.file.read_samples_into(index, &mut scratch, &mut samples)?;
            row.assign(&aview1(&samples));
        }
        Ok(())
    }

    /// Lazily read the lines at the selected ordinal positions
    pub fn iter(&self, slice: impl Into<SliceSpec>) -> Result<LineIter<'a>> {
        Ok(LineIter {
            line: *self,
            positions: slice.into().positions(self.len())?,
        })
    }

    /// Lazily read the lines whose numbers fall in `slice`, taken over line
    /// number values instead of positions
    pub fn iter_numbers(
        &self,
        slice: impl Into<SliceSpec>,
    ) -> Result<impl Iterator<Item = Result<Array2<f32>>> + 'a> {
        self.numbers_iter(slice.into())
    }

    fn numbers_iter(
        &self,
        slice: SliceSpec,
    ) -> Result<impl Iterator<Item = Result<Array2<f32>>> + 'a> {
        let line = *self;
        let numbers = self.file.geometry().lines(self.kind).select_numbers(slice)?;
        Ok(numbers.into_iter().map(move |number| line.get(number)))
    }

    /// Overwrite every trace of line `line` at offset index 0
    pub fn set<'b, A: AsArray<'b, f32, Ix2>>(&self, line: i32, data: A) -> Result<()> {
        let data: ArrayView2<'b, f32> = data.into();
        check_shape(self.shape(), data.dim())?;
        self.file.geometry().line_position(self.kind, line)?;
        self.write_line(line, data)
    }

    fn write_line(&self, line: i32, data: ArrayView2<'_, f32>) -> Result<()> {
        let geometry = self.file.geometry();
        for (position, row) in data.outer_iter().enumerate() {
            let index = geometry.line_to_trace_index(self.kind, line, position, 0)?;
            self.file.write_samples(index, row.iter(), row.len())?;
        }
        Ok(())
    }

    /// Write one source array per selected line, in slice order.
    ///
    /// Counts and shapes are checked before anything is written.
    pub fn set_slice<'b, A, I>(&self, slice: impl Into<SliceSpec>, sources: I) -> Result<()>
    where
        A: AsArray<'b, f32, Ix2>,
        I: IntoIterator<Item = A>,
    {
        let positions = slice.into().positions(self.len())?;
        let sources = collect_sources(sources, positions.len(), self.shape())?;
        let numbers = self.lines();
        for (position, data) in positions.zip(sources) {
            self.write_line(numbers[position], data)?;
        }
        Ok(())
    }
}

/// Iterator over lines at selected ordinal positions
pub struct LineIter<'a> {
    line: Line<'a>,
    positions: SlicePositions,
}

impl Iterator for LineIter<'_> {
    type Item = Result<Array2<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.positions.next()?;
        Some(self.line.get(self.line.lines()[position]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for LineIter<'_> {}

/// Horizontal slices: one sample index across every (inline, crossline) pair
#[derive(Debug, Clone, Copy)]
pub struct DepthSlice<'a> {
    file: &'a SegyFile,
}

impl<'a> DepthSlice<'a> {
    pub(crate) fn new(file: &'a SegyFile) -> Self {
        Self { file }
    }

    /// Number of depth slices, i.e. samples per trace
    pub fn len(&self) -> usize {
        self.file.samples()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape of one slice: (inlines, crosslines)
    pub fn shape(&self) -> (usize, usize) {
        let geometry = self.file.geometry();
        (geometry.ilines().len(), geometry.xlines().len())
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth >= self.len() {
            return Err(SegyError::OutOfRange(format!(
                "depth {} requested, traces have {} samples",
                depth,
                self.len()
            )));
        }
        Ok(())
    }

    /// Sample `depth` of every trace at offset index 0
    pub fn get(&self, depth: usize) -> Result<Array2<f32>> {
        self.check_depth(depth)?;
        let geometry = self.file.geometry();
        let mut out = Array2::zeros(self.shape());
        for ((il_pos, xl_pos), value) in out.indexed_iter_mut() {
            let index = geometry.trace_index(il_pos, xl_pos, 0)?;
            *value = self.file.read_sample(index, depth)?;
        }
        Ok(out)
    }

    /// Lazily read the selected depth slices
    pub fn iter(&self, slice: impl Into<SliceSpec>) -> Result<DepthIter<'a>> {
        Ok(DepthIter {
            depth: *self,
            positions: slice.into().positions(self.len())?,
        })
    }

    /// Overwrite sample `depth` of every trace at offset index 0
    pub fn set<'b, A: AsArray<'b, f32, Ix2>>(&self, depth: usize, data: A) -> Result<()> {
        let data: ArrayView2<'b, f32> = data.into();
        self.check_depth(depth)?;
        check_shape(self.shape(), data.dim())?;
        self.write_depth(depth, data)
    }

    fn write_depth(&self, depth: usize, data: ArrayView2<'_, f32>) -> Result<()> {
        let geometry = self.file.geometry();
        for ((il_pos, xl_pos), &value) in data.indexed_iter() {
            let index = geometry.trace_index(il_pos, xl_pos, 0)?;
            self.file.write_sample(index, depth, value)?;
        }
        Ok(())
    }

    /// Write one source array per selected depth, in slice order
    pub fn set_slice<'b, A, I>(&self, slice: impl Into<SliceSpec>, sources: I) -> Result<()>
    where
        A: AsArray<'b, f32, Ix2>,
        I: IntoIterator<Item = A>,
    {
        let positions = slice.into().positions(self.len())?;
        let sources = collect_sources(sources, positions.len(), self.shape())?;
        for (depth, data) in positions.zip(sources) {
            self.write_depth(depth, data)?;
        }
        Ok(())
    }

    /// Write every depth slice; exactly one source per sample index
    pub fn set_all<'b, A, I>(&self, sources: I) -> Result<()>
    where
        A: AsArray<'b, f32, Ix2>,
        I: IntoIterator<Item = A>,
    {
        self.set_slice(SliceSpec::full(), sources)
    }
}

/// Iterator over selected depth slices
pub struct DepthIter<'a> {
    depth: DepthSlice<'a>,
    positions: SlicePositions,
}

impl Iterator for DepthIter<'_> {
    type Item = Result<Array2<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        let depth = self.positions.next()?;
        Some(self.depth.get(depth))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl ExactSizeIterator for DepthIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;
    use crate::metadata::VolumeSpec;
    use crate::types::{SampleFormat, Sorting};

    /// 3 inlines x 2 crosslines x 3 samples, value = il * 10 + xl + sample / 10
    fn volume(sorting: Sorting) -> SegyFile {
        let spec = VolumeSpec::new(
            SampleFormat::IeeeFloat32,
            sorting,
            3,
            vec![1, 2, 3],
            vec![7, 8],
        );
        let file = SegyFile::create_in(Box::new(MemoryStore::new()), &spec).unwrap();
        for il in [1, 2, 3] {
            for (pos, xl) in [7, 8].into_iter().enumerate() {
                let index = file
                    .geometry()
                    .line_to_trace_index(LineKind::Inline, il, pos, 0)
                    .unwrap();
                let v = (il * 10 + xl) as f32;
                file.traces().write(index, &[v, v + 0.5, v + 0.25]).unwrap();
            }
        }
        file
    }

    #[test]
    fn test_inline_and_crossline() {
        for sorting in [Sorting::InlineMajor, Sorting::CrosslineMajor] {
            let file = volume(sorting);
            let line = file.iline().get(2).unwrap();
            assert_eq!(line.dim(), (2, 3));
            assert_eq!(line[[1, 0]], 28.0);

            let line = file.xline().get(7).unwrap();
            assert_eq!(line.dim(), (3, 3));
            assert_eq!(line[[2, 1]], 37.5);

            assert!(file.iline().get(4).unwrap_err().is_not_found());
        }
    }

    #[test]
    fn test_line_slices() {
        let file = volume(Sorting::InlineMajor);
        let firsts = |slice: SliceSpec| -> Vec<f32> {
            file.iline()
                .iter(slice)
                .unwrap()
                .map(|line| line.unwrap()[[0, 0]])
                .collect()
        };
        assert_eq!(firsts(SliceSpec::full()), vec![17.0, 27.0, 37.0]);
        assert_eq!(firsts(SliceSpec::full().step(-1)), vec![37.0, 27.0, 17.0]);
        assert_eq!(firsts(SliceSpec::full().step(2)), vec![17.0, 37.0]);
        assert!(firsts((5..9).into()).is_empty());

        let by_number: Vec<_> = file.iline().iter_numbers(2..).unwrap().collect();
        assert_eq!(by_number.len(), 2);
    }

    #[test]
    fn test_line_set() {
        let file = volume(Sorting::CrosslineMajor);
        let mut line = file.iline().get(1).unwrap();
        line.fill(-1.0);
        file.iline().set(1, &line).unwrap();
        assert_eq!(file.iline().get(1).unwrap(), line);
        assert_eq!(file.iline().get(2).unwrap()[[0, 0]], 27.0);

        let mut reused = Array2::zeros((2, 3));
        file.iline().get_into(3, &mut reused).unwrap();
        assert_eq!(reused[[0, 0]], 37.0);

        assert!(matches!(
            file.iline().set(1, &Array2::<f32>::zeros((3, 3))),
            Err(SegyError::LengthMismatch { .. })
        ));
        assert!(file.iline().set(9, &line).unwrap_err().is_not_found());
    }

    #[test]
    fn test_line_set_slice_counts() {
        let file = volume(Sorting::InlineMajor);
        let zeros = vec![Array2::<f32>::zeros((2, 3)); 2];
        let err = file.iline().set_slice(SliceSpec::full(), &zeros).unwrap_err();
        assert!(matches!(err, SegyError::LengthMismatch { expected: 3, actual: 2 }));
        assert_eq!(file.iline().get(1).unwrap()[[0, 0]], 17.0);

        file.iline().set_slice(1.., &zeros).unwrap();
        assert_eq!(file.iline().get(1).unwrap()[[0, 0]], 17.0);
        assert_eq!(file.iline().get(3).unwrap()[[1, 2]], 0.0);
    }

    #[test]
    fn test_depth_slice() {
        for sorting in [Sorting::InlineMajor, Sorting::CrosslineMajor] {
            let file = volume(sorting);
            let depth = file.depth_slice().get(1).unwrap();
            assert_eq!(depth.dim(), (3, 2));
            assert_eq!(depth[[1, 1]], 28.5);
            assert!(file.depth_slice().get(3).unwrap_err().is_out_of_range());

            let mut plane = depth.clone();
            plane.fill(5.0);
            file.depth_slice().set(2, &plane).unwrap();
            assert_eq!(file.traces().read(0).unwrap().to_vec(), vec![17.0, 17.5, 5.0]);

            let planes: Vec<_> = file.depth_slice().iter(..).unwrap().collect();
            assert_eq!(planes.len(), 3);

            let err = file.depth_slice().set_all([&plane]).unwrap_err();
            assert!(matches!(err, SegyError::LengthMismatch { expected: 3, actual: 1 }));
        }
    }
}
