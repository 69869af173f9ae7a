//! Survey geometry: line sets, sorting and the line-to-trace mapping
//!
//! A [`Geometry`] is computed once per session, either from a full scan of
//! the (inline, crossline) numbers of every trace or from a [`VolumeSpec`],
//! and is immutable afterwards.

use crate::error::{Result, SegyError};
use crate::metadata::VolumeSpec;
use crate::slice::SliceSpec;
use crate::types::{LineKind, Sorting};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Distinct line numbers in discovery order, with O(1) number-to-position lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSet {
    numbers: Vec<i32>,
    positions: HashMap<i32, usize>,
}

impl LineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an explicit list; duplicates are rejected
    pub fn from_numbers(numbers: &[i32]) -> Result<Self> {
        let mut set = Self::new();
        for &number in numbers {
            if !set.insert(number) {
                return Err(SegyError::InvalidArgument(format!(
                    "line number {} is listed twice",
                    number
                )));
            }
        }
        Ok(set)
    }

    /// Append `number` unless already present; returns whether it was new
    fn insert(&mut self, number: i32) -> bool {
        if self.positions.contains_key(&number) {
            return false;
        }
        self.positions.insert(number, self.numbers.len());
        self.numbers.push(number);
        true
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn numbers(&self) -> &[i32] {
        &self.numbers
    }

    /// Ordinal position of a line number
    pub fn position(&self, number: i32) -> Option<usize> {
        self.positions.get(&number).copied()
    }

    pub fn contains(&self, number: i32) -> bool {
        self.positions.contains_key(&number)
    }

    /// Line number at an ordinal position
    pub fn get(&self, position: usize) -> Option<i32> {
        self.numbers.get(position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.numbers.iter().copied()
    }

    /// Select line numbers by value rather than by position.
    ///
    /// The slice runs over the integers `0..=max`, an omitted start with a
    /// forward step begins at the smallest line number, and only numbers
    /// present in the set are kept, in slice order.
    pub fn select_numbers(&self, slice: SliceSpec) -> Result<Vec<i32>> {
        let (Some(&min), Some(&max)) = (self.numbers.iter().min(), self.numbers.iter().max())
        else {
            slice.indices(0)?;
            return Ok(Vec::new());
        };
        let mut slice = slice;
        if slice.start.is_none() && slice.step.unwrap_or(1) > 0 {
            slice.start = Some(min as isize);
        }
        let domain = if max < 0 { 0 } else { max as usize + 1 };
        Ok(slice
            .positions(domain)?
            .filter_map(|n| i32::try_from(n).ok())
            .filter(|n| self.contains(*n))
            .collect())
    }
}

/// Geometry of one volume
#[derive(Debug, Clone)]
pub struct Geometry {
    sorting: Sorting,
    tracecount: usize,
    offsets: usize,
    ilines: LineSet,
    xlines: LineSet,
    regular: bool,
}

impl Geometry {
    /// Derive geometry from the (inline, crossline) numbers of every trace,
    /// in physical order.
    ///
    /// Irregular or unsortable layouts fall back to offsets = 1 and/or
    /// [`Sorting::Unknown`] with a warning, or fail with
    /// [`SegyError::Structural`] when `strict` is set.
    pub fn scan(pairs: &[(i32, i32)], strict: bool) -> Result<Self> {
        let tracecount = pairs.len();
        let mut ilines = LineSet::new();
        let mut xlines = LineSet::new();
        for &(il, xl) in pairs {
            ilines.insert(il);
            xlines.insert(xl);
        }

        let Some(&first) = pairs.first() else {
            if strict {
                return Err(SegyError::Structural("file holds no traces".to_string()));
            }
            warn!("file holds no traces, geometry is empty");
            return Ok(Self {
                sorting: Sorting::Unknown,
                tracecount: 0,
                offsets: 1,
                ilines,
                xlines,
                regular: false,
            });
        };

        let run = pairs.iter().take_while(|&&pair| pair == first).count();
        let sorting = match pairs.get(run) {
            None => Sorting::InlineMajor,
            Some(&(il, _)) if il == first.0 => Sorting::InlineMajor,
            Some(&(_, xl)) if xl == first.1 => Sorting::CrosslineMajor,
            Some(_) => Sorting::Unknown,
        };

        let cells = ilines.len() * xlines.len();
        let (offsets, regular) = if tracecount % cells == 0 {
            (tracecount / cells, true)
        } else {
            (1, false)
        };
        debug!(
            tracecount,
            ilines = ilines.len(),
            xlines = xlines.len(),
            offsets,
            leading_run = run,
            %sorting,
            "scanned trace headers"
        );

        let mut geometry = Self {
            sorting,
            tracecount,
            offsets,
            ilines,
            xlines,
            regular,
        };

        if !regular {
            if strict {
                return Err(SegyError::Structural(format!(
                    "{} traces do not divide into {} x {} line pairs",
                    tracecount,
                    geometry.ilines.len(),
                    geometry.xlines.len()
                )));
            }
            warn!(
                tracecount,
                cells, "irregular geometry, traces beyond the grid are only addressable by index"
            );
            return Ok(geometry);
        }

        if let Some(index) = geometry.first_mismatch(pairs) {
            if strict {
                return Err(SegyError::Structural(format!(
                    "trace {} breaks the {} layout",
                    index, geometry.sorting
                )));
            }
            warn!(trace = index, "traces do not follow a regular sorting");
            geometry.sorting = Sorting::Unknown;
        }
        Ok(geometry)
    }

    /// Geometry of a volume about to be created
    pub fn from_spec(spec: &VolumeSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            sorting: spec.sorting,
            tracecount: spec.tracecount(),
            offsets: spec.offsets,
            ilines: LineSet::from_numbers(&spec.ilines)?,
            xlines: LineSet::from_numbers(&spec.xlines)?,
            regular: true,
        })
    }

    /// First trace whose line numbers disagree with the grid implied by
    /// the sorting, if any
    fn first_mismatch(&self, pairs: &[(i32, i32)]) -> Option<usize> {
        if !self.sorting.is_known() {
            return Some(self.offsets.min(pairs.len().saturating_sub(1)));
        }
        pairs.iter().enumerate().find_map(|(index, &pair)| {
            let (il_pos, xl_pos, _) = self.grid_position(index);
            let expected = (self.ilines.get(il_pos), self.xlines.get(xl_pos));
            (expected != (Some(pair.0), Some(pair.1))).then_some(index)
        })
    }

    /// (inline position, crossline position, offset index) of a raw index
    pub(crate) fn grid_position(&self, index: usize) -> (usize, usize, usize) {
        let offset = index % self.offsets;
        let cell = index / self.offsets;
        match self.sorting {
            Sorting::CrosslineMajor => (cell % self.ilines.len(), cell / self.ilines.len(), offset),
            _ => (cell / self.xlines.len(), cell % self.xlines.len(), offset),
        }
    }

    pub fn sorting(&self) -> Sorting {
        self.sorting
    }

    pub fn tracecount(&self) -> usize {
        self.tracecount
    }

    /// Traces per (inline, crossline) pair
    pub fn offsets(&self) -> usize {
        self.offsets
    }

    pub fn ilines(&self) -> &LineSet {
        &self.ilines
    }

    pub fn xlines(&self) -> &LineSet {
        &self.xlines
    }

    pub fn lines(&self, kind: LineKind) -> &LineSet {
        match kind {
            LineKind::Inline => &self.ilines,
            LineKind::Crossline => &self.xlines,
        }
    }

    /// Whether every trace sits on the inline x crossline x offset grid
    pub fn is_regular(&self) -> bool {
        self.regular
    }

    /// Number of traces along one line of `kind`
    pub fn line_length(&self, kind: LineKind) -> usize {
        self.lines(kind.other()).len()
    }

    /// Raw index of the trace at grid position (inline position, crossline position, offset index)
    pub fn trace_index(&self, il_pos: usize, xl_pos: usize, offset: usize) -> Result<usize> {
        let (nil, nxl) = (self.ilines.len(), self.xlines.len());
        if il_pos >= nil || xl_pos >= nxl || offset >= self.offsets {
            return Err(SegyError::OutOfRange(format!(
                "grid position ({}, {}, {}) outside {} x {} x {}",
                il_pos, xl_pos, offset, nil, nxl, self.offsets
            )));
        }
        let cell = match self.sorting {
            Sorting::InlineMajor => il_pos * nxl + xl_pos,
            Sorting::CrosslineMajor => xl_pos * nil + il_pos,
            Sorting::Unknown => {
                return Err(SegyError::Structural(
                    "sorting is unknown, traces are only addressable by index".to_string(),
                ))
            }
        };
        let raw = cell * self.offsets + offset;
        if raw >= self.tracecount {
            return Err(SegyError::OutOfRange(format!(
                "grid position ({}, {}, {}) maps to trace {} past the last trace {}",
                il_pos,
                xl_pos,
                offset,
                raw,
                self.tracecount.saturating_sub(1)
            )));
        }
        Ok(raw)
    }

    /// Ordinal position of a line number, or `NotFound`
    pub fn line_position(&self, kind: LineKind, line: i32) -> Result<usize> {
        self.lines(kind)
            .position(line)
            .ok_or_else(|| SegyError::NotFound(format!("{} {} does not exist", kind, line)))
    }

    /// Raw index of the trace at `position` along line `line` of `kind`
    pub fn line_to_trace_index(
        &self,
        kind: LineKind,
        line: i32,
        position: usize,
        offset: usize,
    ) -> Result<usize> {
        let line_pos = self.line_position(kind, line)?;
        let length = self.line_length(kind);
        if position >= length {
            return Err(SegyError::OutOfRange(format!(
                "position {} along {} {} which has {} traces",
                position, kind, line, length
            )));
        }
        if offset >= self.offsets {
            return Err(SegyError::OutOfRange(format!(
                "offset index {} with {} offsets per line pair",
                offset, self.offsets
            )));
        }
        match kind {
            LineKind::Inline => self.trace_index(line_pos, position, offset),
            LineKind::Crossline => self.trace_index(position, line_pos, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inline-major 5 x 5 grid, inlines 1..=5, crosslines 20..=24
    fn inline_sorted() -> Vec<(i32, i32)> {
        (1..=5)
            .flat_map(|il| (20..=24).map(move |xl| (il, xl)))
            .collect()
    }

    #[test]
    fn test_scan_inline_sorted() {
        let geometry = Geometry::scan(&inline_sorted(), false).unwrap();
        assert_eq!(geometry.sorting(), Sorting::InlineMajor);
        assert_eq!(geometry.ilines().numbers(), &[1, 2, 3, 4, 5]);
        assert_eq!(geometry.xlines().numbers(), &[20, 21, 22, 23, 24]);
        assert_eq!(geometry.offsets(), 1);
        assert!(geometry.is_regular());

        assert_eq!(
            geometry.line_to_trace_index(LineKind::Inline, 2, 1, 0).unwrap(),
            6
        );
        assert_eq!(
            geometry.line_to_trace_index(LineKind::Crossline, 21, 4, 0).unwrap(),
            21
        );
    }

    #[test]
    fn test_scan_crossline_sorted() {
        let pairs: Vec<_> = (20..=22)
            .flat_map(|xl| (1..=4).map(move |il| (il, xl)))
            .collect();
        let geometry = Geometry::scan(&pairs, true).unwrap();
        assert_eq!(geometry.sorting(), Sorting::CrosslineMajor);
        for (raw, &(il, xl)) in pairs.iter().enumerate() {
            let il_pos = geometry.ilines().position(il).unwrap();
            let xl_pos = geometry.xlines().position(xl).unwrap();
            assert_eq!(geometry.trace_index(il_pos, xl_pos, 0).unwrap(), raw);
        }
    }

    #[test]
    fn test_scan_transposed() {
        let swapped: Vec<_> = inline_sorted().into_iter().map(|(il, xl)| (xl, il)).collect();
        let geometry = Geometry::scan(&swapped, false).unwrap();
        assert_eq!(geometry.ilines().numbers(), &[20, 21, 22, 23, 24]);
        assert_eq!(geometry.xlines().numbers(), &[1, 2, 3, 4, 5]);
        assert_eq!(geometry.sorting(), Sorting::CrosslineMajor);
    }

    #[test]
    fn test_scan_offsets() {
        let pairs: Vec<_> = inline_sorted()
            .into_iter()
            .flat_map(|pair| [pair, pair, pair])
            .collect();
        let geometry = Geometry::scan(&pairs, true).unwrap();
        assert_eq!(geometry.offsets(), 3);
        assert_eq!(
            geometry.line_to_trace_index(LineKind::Inline, 1, 1, 2).unwrap(),
            5
        );
        assert!(geometry
            .line_to_trace_index(LineKind::Inline, 1, 1, 3)
            .unwrap_err()
            .is_out_of_range());
    }

    #[test]
    fn test_scan_irregular() {
        let mut pairs = inline_sorted();
        pairs.push((6, 20));
        let geometry = Geometry::scan(&pairs, false).unwrap();
        assert!(!geometry.is_regular());
        assert_eq!(geometry.offsets(), 1);
        assert!(matches!(
            Geometry::scan(&pairs, true),
            Err(SegyError::Structural(_))
        ));
    }

    #[test]
    fn test_scan_unsortable() {
        let mut pairs = inline_sorted();
        pairs.swap(3, 17);
        let geometry = Geometry::scan(&pairs, false).unwrap();
        assert_eq!(geometry.sorting(), Sorting::Unknown);
        assert!(matches!(
            geometry.line_to_trace_index(LineKind::Inline, 1, 0, 0),
            Err(SegyError::Structural(_))
        ));
        assert!(Geometry::scan(&pairs, true).is_err());
    }

    #[test]
    fn test_single_line_volumes() {
        let one_inline: Vec<_> = (1..=4).map(|xl| (7, xl)).collect();
        let geometry = Geometry::scan(&one_inline, true).unwrap();
        assert_eq!(geometry.ilines().len(), 1);
        assert_eq!(geometry.xlines().len(), 4);

        let one_trace = Geometry::scan(&[(1, 1)], true).unwrap();
        assert_eq!(one_trace.tracecount(), 1);
        assert_eq!(one_trace.trace_index(0, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_line_lookup_errors() {
        let geometry = Geometry::scan(&inline_sorted(), false).unwrap();
        assert!(geometry
            .line_to_trace_index(LineKind::Inline, 9, 0, 0)
            .unwrap_err()
            .is_not_found());
        assert!(geometry
            .line_to_trace_index(LineKind::Inline, 1, 5, 0)
            .unwrap_err()
            .is_out_of_range());
    }

    #[test]
    fn test_from_spec() {
        use crate::types::SampleFormat;
        let spec = VolumeSpec::new(
            SampleFormat::IeeeFloat32,
            Sorting::CrosslineMajor,
            4,
            vec![10, 11],
            vec![1, 2, 3],
        );
        let geometry = Geometry::from_spec(&spec).unwrap();
        assert_eq!(geometry.tracecount(), 6);
        assert_eq!(
            geometry.line_to_trace_index(LineKind::Crossline, 3, 1, 0).unwrap(),
            5
        );
    }

    #[test]
    fn test_select_numbers() {
        let ilines = LineSet::from_numbers(&[1, 2, 3, 4, 5]).unwrap();
        let count = |slice: SliceSpec| ilines.select_numbers(slice).unwrap().len();
        assert_eq!(count((1..6).into()), 5);
        assert_eq!(count(SliceSpec::new(Some(5), Some(0), Some(-1))), 5);
        assert_eq!(count(SliceSpec::full().step(2)), 3);
        assert_eq!(count((12..24).into()), 0);
        assert_eq!(count((..4).into()), 3);
        assert_eq!(count(SliceSpec::new(Some(2), Some(6), Some(2))), 2);

        let xlines = LineSet::from_numbers(&[20, 21, 22, 23, 24]).unwrap();
        let selected = xlines
            .select_numbers(SliceSpec::new(None, Some(25), Some(3)))
            .unwrap();
        assert_eq!(selected, vec![20, 23]);

        assert!(LineSet::from_numbers(&[1, 1]).is_err());
    }
}
