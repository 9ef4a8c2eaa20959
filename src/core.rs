//! Core traits and types for Geoflux.
//!
//! This module defines:
//! - [`FluxOrd`]: The main trait users implement to sort their custom types.
//! - [`SortError`]: The comparison failure surfaced by every entry point.
//! - [`TraceEvent`], [`Pass`], [`HighlightTag`]: The event schema emitted by
//!   traced runs for external renderers.
//! - `Group`: Internal extracted-run structure.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use thiserror::Error;

/// Errors produced by the sorting entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SortError {
    /// Two elements admitted no ordering (e.g. a float `NaN`).
    ///
    /// Comparisons are staged ahead of the writes they justify, so a failed
    /// sort leaves the slice holding the same elements it started with.
    #[error("elements are not pairwise orderable")]
    Incomparable,
}

/// A trait for values that order and carry a measurable distance.
///
/// Grouping needs more than an ordering: the algorithm must decide whether
/// two values are *similar*, meaning their distance falls within a tolerance
/// derived from the data set. `FluxOrd` therefore couples `PartialOrd` with:
///
/// - [`span`](FluxOrd::span): the absolute difference between two values, and
/// - [`tolerance`](FluxOrd::tolerance): the similarity tolerance for a data
///   set with the given value range (5% of the range in the provided impls),
///   or `None` when the range is zero and the input is trivially sorted.
///
/// Implementations are provided for every integer primitive and for
/// `f32`/`f64`. Integer tolerances are floored at 1 so a narrow range does
/// not collapse the tolerance to 0 and disable grouping entirely.
///
/// # Examples
///
/// Implementing for a custom measurement type:
///
/// ```
/// use geoflux::{FluxOrd, geoflux_sort};
///
/// #[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
/// struct Celsius(f64);
///
/// impl FluxOrd for Celsius {
///     type Span = f64;
///
///     fn span(&self, other: &Self) -> f64 {
///         (self.0 - other.0).abs()
///     }
///
///     fn tolerance(range: f64) -> Option<f64> {
///         (range != 0.0).then_some(range * 0.05)
///     }
/// }
///
/// let mut readings = vec![Celsius(21.4), Celsius(19.8), Celsius(20.1)];
/// geoflux_sort(&mut readings).unwrap();
/// assert_eq!(readings, vec![Celsius(19.8), Celsius(20.1), Celsius(21.4)]);
/// ```
pub trait FluxOrd: Clone + PartialOrd {
    /// Magnitude of the difference between two values.
    ///
    /// Kept separate from `Self` so signed integers can report exact
    /// distances without overflow (`i32` spans are `u32`, and so on).
    type Span: PartialOrd;

    /// Returns the absolute difference between `self` and `other`.
    ///
    /// A span with no ordering against the tolerance (same-sign infinities
    /// subtract to NaN) counts as outside tolerance; ordering errors come
    /// only from element comparisons.
    fn span(&self, other: &Self) -> Self::Span;

    /// Returns the similarity tolerance for a data set whose value range
    /// (maximum minus minimum) is `range`.
    ///
    /// Returns `None` when the range is zero: every element is equal and the
    /// input is sorted by definition.
    fn tolerance(range: Self::Span) -> Option<Self::Span>;

    /// Total comparison, surfacing unordered pairs as [`SortError`].
    #[inline]
    fn try_cmp(&self, other: &Self) -> Result<Ordering, SortError> {
        self.partial_cmp(other).ok_or(SortError::Incomparable)
    }
}

// Signed and unsigned integers share the abs_diff shape; only the span type
// differs. Tolerance is 5% of the range (integer division), floored at 1.
macro_rules! impl_flux_ord_int {
    ($($t:ty => $span:ty),* $(,)?) => {
        $(
            impl FluxOrd for $t {
                type Span = $span;

                #[inline]
                fn span(&self, other: &Self) -> $span {
                    self.abs_diff(*other)
                }

                #[inline]
                fn tolerance(range: $span) -> Option<$span> {
                    (range != 0).then(|| (range / 20).max(1))
                }
            }
        )*
    };
}

impl_flux_ord_int! {
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    i128 => u128,
    isize => usize,
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    u128 => u128,
    usize => usize,
}

// Floats keep the fractional tolerance; no floor, a tiny range just means
// tight grouping. A NaN element surfaces as SortError::Incomparable.
macro_rules! impl_flux_ord_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl FluxOrd for $t {
                type Span = $t;

                #[inline]
                fn span(&self, other: &Self) -> $t {
                    (self - other).abs()
                }

                #[inline]
                fn tolerance(range: $t) -> Option<$t> {
                    (range != 0.0).then_some(range * 0.05)
                }
            }
        )*
    };
}

impl_flux_ord_float!(f32, f64);

/// Direction or terminal status of the pass a trace event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pass {
    /// Left-migrating sweep: out-of-place groups move toward the front.
    Ascending,
    /// Right-migrating sweep: out-of-place groups move toward the back.
    Descending,
    /// Terminal: the working copy is sorted.
    Finished,
    /// Terminal: the safety iteration cap fired before convergence.
    ///
    /// Never expected on finite comparable input; treat as a defect signal.
    SafetyStopped,
}

/// Why an index is notable in a [`TraceEvent`] snapshot.
///
/// Tags carry semantics only; renderers decide how each one looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HighlightTag {
    /// Member of the group currently under examination.
    Group,
    /// Index inside the segment a relocation just rewrote (the landed group
    /// together with the displaced run folded around it).
    MovedGroup,
    /// Index being compared while searching for a migration boundary.
    Cursor,
    /// Destination index where a migrating group will be written.
    InsertionPoint,
    /// Element in its final position (terminal snapshots only).
    Sorted,
}

/// One observable step of a traced sort.
///
/// Events are self-contained: `array` is a full snapshot of the private
/// working copy at the instant the step happened, so consumers never need an
/// earlier event to interpret a later one, and abandoning the stream
/// mid-sort leaves no shared state behind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEvent<T> {
    /// Snapshot of the working copy after the step described by `status`.
    pub array: Vec<T>,
    /// Which sweep produced the event, or the terminal status.
    pub pass: Pass,
    /// Human-readable description of the step.
    pub status: String,
    /// Indices worth highlighting, keyed to their semantic role.
    pub highlights: BTreeMap<usize, HighlightTag>,
}

/// A contiguous run of similar values extracted for migration.
///
/// Ephemeral: built per scan position, dropped after the migration decision.
/// `values` holds the run already sorted ascending; the slice segment
/// `[start, end]` keeps the original order until the rewrite.
#[derive(Debug)]
pub(crate) struct Group<T> {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) values: Vec<T>,
}

impl<T> Group<T> {
    /// Number of elements in the run.
    pub(crate) fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Smallest value in the run.
    pub(crate) fn min(&self) -> &T {
        &self.values[0]
    }

    /// Largest value in the run.
    pub(crate) fn max(&self) -> &T {
        &self.values[self.values.len() - 1]
    }
}
