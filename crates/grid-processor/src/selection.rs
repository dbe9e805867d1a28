//! Label-based selection along monotonic coordinate axes.
//!
//! Grids store latitude either south-to-north or north-to-south (IMERG is
//! ascending, many reanalysis products are descending). A slice is always
//! expressed in the axis' own direction: `(lo, hi)` on an ascending axis and
//! `(hi, lo)` on a descending one. Slicing a descending axis with `(lo, hi)`
//! matches nothing.

use std::ops::Range;

use crate::error::{GridProcessorError, Result};

/// Stored direction of a coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    Ascending,
    Descending,
}

impl AxisOrder {
    /// Detect the order by comparing the first and last samples.
    ///
    /// A single-sample axis counts as ascending.
    pub fn detect(axis: &[f64]) -> Result<Self> {
        let (Some(&first), Some(&last)) = (axis.first(), axis.last()) else {
            return Err(GridProcessorError::axis("empty coordinate axis"));
        };
        if !first.is_finite() || !last.is_finite() {
            return Err(GridProcessorError::axis("non-finite coordinate at axis end"));
        }
        Ok(if first <= last {
            AxisOrder::Ascending
        } else {
            AxisOrder::Descending
        })
    }

    /// Order the bounds `(lo, hi)` in this axis' direction.
    pub fn slice_bounds(&self, lo: f64, hi: f64) -> (f64, f64) {
        match self {
            AxisOrder::Ascending => (lo, hi),
            AxisOrder::Descending => (hi, lo),
        }
    }
}

/// Indices of the samples lying between `start` and `stop`, both inclusive,
/// walking the axis in its stored direction.
///
/// `start`/`stop` must already be ordered for `order` (see
/// [`AxisOrder::slice_bounds`]); reversed bounds yield an empty range.
pub fn slice_indices(axis: &[f64], order: AxisOrder, start: f64, stop: f64) -> Range<usize> {
    let (begin, end) = match order {
        AxisOrder::Ascending => (
            axis.partition_point(|&v| v < start),
            axis.partition_point(|&v| v <= stop),
        ),
        AxisOrder::Descending => (
            axis.partition_point(|&v| v > start),
            axis.partition_point(|&v| v >= stop),
        ),
    };
    if begin < end {
        begin..end
    } else {
        begin..begin
    }
}

/// Select the samples of `axis` within `[lo, hi]`, whatever the axis order.
pub fn select_axis(axis: &[f64], lo: f64, hi: f64) -> Result<AxisSelection> {
    let order = AxisOrder::detect(axis)?;
    let (start, stop) = order.slice_bounds(lo, hi);
    Ok(AxisSelection {
        order,
        range: slice_indices(axis, order, start, stop),
    })
}

/// Detected order and selected index range of one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub order: AxisOrder,
    pub range: Range<usize>,
}

impl AxisSelection {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}
