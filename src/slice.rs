//! Half-open strided position ranges
//!
//! [`SliceSpec`] is a `start:stop:step` selection with the usual negative
//! index and clamping rules. It is resolved against a collection length
//! into a lazy [`SlicePositions`] iterator.

use crate::error::{Result, SegyError};
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// A strided selection over positions `0..len`.
///
/// Negative `start`/`stop` count from the end; out-of-range bounds are
/// clamped; a negative `step` walks backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// Every position
    pub fn full() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve against a collection of `len` items into `(start, stop, step)`
    /// where iteration runs `start, start+step, ...` while short of `stop`.
    pub fn indices(&self, len: usize) -> Result<(isize, isize, isize)> {
        let len = len as isize;
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(SegyError::InvalidArgument(
                "slice step cannot be zero".to_string(),
            ));
        }

        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = match self.start {
            Some(start) => clamp(start),
            None if step < 0 => upper,
            None => lower,
        };
        let stop = match self.stop {
            Some(stop) => clamp(stop),
            None if step < 0 => lower,
            None => upper,
        };
        Ok((start, stop, step))
    }

    /// Lazily produce the selected positions of a collection of `len` items
    pub fn positions(&self, len: usize) -> Result<SlicePositions> {
        let (start, stop, step) = self.indices(len)?;
        Ok(SlicePositions {
            next: start,
            stop,
            step,
        })
    }

    /// Number of positions selected out of `len`
    pub fn count(&self, len: usize) -> Result<usize> {
        Ok(self.positions(len)?.len())
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        SliceSpec::full()
    }
}

impl From<Range<isize>> for SliceSpec {
    fn from(range: Range<isize>) -> Self {
        SliceSpec::new(Some(range.start), Some(range.end), None)
    }
}

impl From<RangeFrom<isize>> for SliceSpec {
    fn from(range: RangeFrom<isize>) -> Self {
        SliceSpec::new(Some(range.start), None, None)
    }
}

impl From<RangeTo<isize>> for SliceSpec {
    fn from(range: RangeTo<isize>) -> Self {
        SliceSpec::new(None, Some(range.end), None)
    }
}

/// Positions selected by a [`SliceSpec`]
#[derive(Debug, Clone)]
pub struct SlicePositions {
    next: isize,
    stop: isize,
    step: isize,
}

impl Iterator for SlicePositions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let remaining = if self.step > 0 {
            self.next < self.stop
        } else {
            self.next > self.stop
        };
        if !remaining {
            return None;
        }
        let current = self.next;
        // a step past the end of isize also ends the walk
        self.next = self.next.checked_add(self.step).unwrap_or(self.stop);
        Some(current as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let stride = self.step.unsigned_abs();
        let span = if self.step > 0 && self.next < self.stop {
            self.stop.abs_diff(self.next)
        } else if self.step < 0 && self.next > self.stop {
            self.next.abs_diff(self.stop)
        } else {
            0
        };
        let n = if span == 0 { 0 } else { (span - 1) / stride + 1 };
        (n, Some(n))
    }
}

impl ExactSizeIterator for SlicePositions {}
