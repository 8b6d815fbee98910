//! Coverage depth series for alignment charts
//!
//! Pathoscope analyses report coverage for each reference as a sparse list of
//! `[position, depth]` breakpoints. This module expands those into one point
//! per base, optionally trims high outliers, and hands back plain
//! `(position, value)` pairs for an area chart.

pub mod layout;
pub mod outliers;

use serde::{Deserialize, Serialize};

pub use layout::{ChartLayout, LinearScale, Margin};
pub use outliers::{quartile, trim_outliers_by_iqr};

/// A position where the coverage depth changes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(u64, f64)", into = "(u64, f64)")]
pub struct Breakpoint {
    pub position: u64,
    pub depth: f64,
}

impl From<(u64, f64)> for Breakpoint {
    fn from((position, depth): (u64, f64)) -> Self {
        Self { position, depth }
    }
}

impl From<Breakpoint> for (u64, f64) {
    fn from(bp: Breakpoint) -> Self {
        (bp.position, bp.depth)
    }
}

/// Depth at a single base
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoveragePoint {
    pub position: u64,
    pub value: f64,
}

/// Expand breakpoints into one point per position in `0..length`
///
/// Every position takes the depth of the closest breakpoint at or before it.
/// Positions ahead of the first breakpoint take its depth, and a breakpoint at
/// or past `length` lands on the last position. Breakpoints must be ordered by
/// position.
pub fn expand(series: &[Breakpoint], length: u64) -> Vec<CoveragePoint> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    if length == 0 {
        return Vec::new();
    }

    let last = length - 1;
    let mut breakpoints = series.iter().peekable();
    let mut value = first.depth;
    let mut points = Vec::with_capacity(length as usize);

    for position in 0..length {
        while let Some(bp) = breakpoints.next_if(|bp| bp.position.min(last) <= position) {
            value = bp.depth;
        }
        points.push(CoveragePoint { position, value });
    }

    points
}

/// Build the `(position, value)` pairs an area chart is drawn from
///
/// The uncropped series has one pair per position. The cropped series has
/// high outliers removed and may be shorter; it stays in position order.
pub fn build_chart_series(series: &[Breakpoint], length: u64, cropped: bool) -> Vec<(u64, f64)> {
    let mut points = expand(series, length);

    if cropped {
        points.sort_by(|a, b| a.value.total_cmp(&b.value));
        let kept = trim_outliers_by_iqr(&points).len();
        points.truncate(kept);
        points.sort_by_key(|p| p.position);
    }

    points.into_iter().map(|p| (p.position, p.value)).collect()
}

/// Highest depth in a series, 0 when empty
pub fn y_max(series: &[Breakpoint]) -> f64 {
    series.iter().map(|bp| bp.depth).fold(0.0, f64::max)
}
