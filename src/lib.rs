//! # Geoflux
//!
//! `geoflux` is a bidirectional group-migration sorting library with a
//! built-in, step-by-step trace protocol for external visualization.
//!
//! Instead of moving single elements, the algorithm finds contiguous runs of
//! *similar* values (groups), sorts each run internally, and migrates it as
//! a block toward its correct position. An ascending pass carries groups
//! toward the front, a descending pass carries groups toward the back, and
//! the two alternate until a full cycle makes no change.
//!
//! ## Key Features
//!
//! - **Group migration**: clustered data moves in blocks instead of one
//!   element at a time, so bands of similar values settle quickly.
//! - **Adaptive similarity tolerance**: the grouping tolerance is derived
//!   from the data itself (5% of the value range), not configured by the
//!   caller.
//! - **Fast paths**: already-sorted input returns after a single scan, and
//!   short input (at most 20 elements) falls back to insertion sort.
//! - **Observable execution**: [`geoflux_trace`] replays the exact algorithm
//!   as a lazy stream of [`TraceEvent`] snapshots, each carrying the full
//!   array state, a pass label, a human-readable status, and per-index
//!   highlight tags, so renderers can animate every step without touching
//!   algorithm internals.
//!
//! ## Usage
//!
//! ### Sorting in place
//!
//! ```rust
//! use geoflux::geoflux_sort;
//!
//! let mut data = vec![64, 34, 25, 12, 22, 11, 90];
//! geoflux_sort(&mut data).unwrap();
//!
//! assert_eq!(data, vec![11, 12, 22, 25, 34, 64, 90]);
//! ```
//!
//! ### Tracing a sort
//!
//! ```rust
//! use geoflux::{Pass, geoflux_trace};
//!
//! let data = vec![9, 1, 8, 2, 7, 3];
//! let events: Vec<_> = geoflux_trace(&data).collect::<Result<_, _>>().unwrap();
//!
//! let last = events.last().unwrap();
//! assert_eq!(last.pass, Pass::Finished);
//! assert_eq!(last.array, vec![1, 2, 3, 7, 8, 9]);
//! // Tracing never mutates the caller's data.
//! assert_eq!(data, vec![9, 1, 8, 2, 7, 3]);
//! ```
//!
//! ### Custom Types
//!
//! Anything `Clone + PartialOrd` with a measurable distance can be sorted by
//! implementing [`FluxOrd`].
//!
//! ```rust
//! use geoflux::{FluxOrd, geoflux_sort};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
//! struct Millis(u64);
//!
//! impl FluxOrd for Millis {
//!     type Span = u64;
//!
//!     fn span(&self, other: &Self) -> u64 {
//!         self.0.abs_diff(other.0)
//!     }
//!
//!     fn tolerance(range: u64) -> Option<u64> {
//!         (range != 0).then(|| (range / 20).max(1))
//!     }
//! }
//!
//! let mut latencies = vec![Millis(250), Millis(40), Millis(245)];
//! geoflux_sort(&mut latencies).unwrap();
//!
//! assert_eq!(latencies, vec![Millis(40), Millis(245), Millis(250)]);
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Best Case**: O(N) for already-sorted input (single-scan fast path).
//! - **Typical Case**: clustered data migrates in blocks of up to 50
//!   elements, and every cycle skips prefixes and suffixes proven sorted.
//! - **Worst Case**: comparable to elementary quadratic sorts; no asymptotic
//!   guarantee is made, and a defensive cycle cap bounds pathological runs.
//! - **Memory Overhead**: O(1) auxiliary state plus one bounded buffer per
//!   migration; traced runs clone the array once per event.
//!
//! Geoflux is **not stable**: groups are re-sorted internally, so equal
//! elements may change relative order. Errors are surfaced, never panicked;
//! comparing unordered values (a float `NaN`, say) yields
//! [`SortError::Incomparable`] from either entry point.
//!
//! ## Feature Flags
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`TraceEvent`],
//!   [`Pass`], and [`HighlightTag`], for renderers that consume events over
//!   a wire.

pub mod algo;
pub mod core;
pub mod trace;

pub use crate::algo::geoflux_sort;
pub use crate::core::{FluxOrd, HighlightTag, Pass, SortError, TraceEvent};
pub use crate::trace::{Trace, geoflux_trace};

pub mod prelude {
    pub use crate::algo::geoflux_sort;
    pub use crate::core::FluxOrd;
    pub use crate::trace::geoflux_trace;
}
