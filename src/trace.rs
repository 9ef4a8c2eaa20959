//! Step-by-step observable variant of the geoflux sort.
//!
//! [`geoflux_trace`] runs the exact algorithm of
//! [`geoflux_sort`](crate::geoflux_sort) against a private copy of the input
//! and surfaces every state transition as a [`TraceEvent`]: fast-path
//! outcomes, pass starts, group identification and extraction, each boundary
//! comparison, relocations, and the terminal result. External renderers
//! replay the events one logical operation at a time.
//!
//! The stream is pull-based and lazy. No work happens before the first
//! `next()` call, each call advances the sort by exactly one observable
//! step, and dropping the iterator abandons the run with nothing left
//! behind. Generator-style suspension is expressed as an explicit state
//! machine: the paused scan position (pass direction, current pivot, pending
//! group) lives in ordinary fields, and `next()` resumes from there.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::iter::FusedIterator;
use std::mem;

use crate::algo::{
    SMALL_SORT_LEN, extract_group, grow_group_backward, grow_group_forward, insertion_sort,
    is_sorted, migrate_left, migrate_right, safety_cap, similarity_threshold, sorted_region,
};
use crate::core::{FluxOrd, Group, HighlightTag, Pass, SortError, TraceEvent};

/// Traces a geoflux sort of `data` without mutating it.
///
/// Returns a lazy iterator over [`TraceEvent`] snapshots of a private
/// working copy. Every input produces at least one event; the last `Ok`
/// event of a completed run carries [`Pass::Finished`] (or
/// [`Pass::SafetyStopped`]) and the final state of the copy.
///
/// An incomparable pair (a float `NaN`, say) ends the stream with a single
/// `Err` item. After the terminal event or the error the iterator is fused
/// and yields `None` forever.
///
/// # Examples
///
/// ```
/// use geoflux::{Pass, geoflux_trace};
///
/// let data = vec![9, 1, 8, 2, 7, 3];
/// let events: Vec<_> = geoflux_trace(&data).collect::<Result<_, _>>().unwrap();
///
/// let last = events.last().unwrap();
/// assert_eq!(last.pass, Pass::Finished);
/// assert_eq!(last.array, vec![1, 2, 3, 7, 8, 9]);
/// // The caller's data is untouched.
/// assert_eq!(data, vec![9, 1, 8, 2, 7, 3]);
/// ```
pub fn geoflux_trace<T: FluxOrd + Display>(data: &[T]) -> Trace<T> {
    Trace {
        state: State::Pending { arr: data.to_vec() },
    }
}

/// Lazy event stream over one sort run. See [`geoflux_trace`].
pub struct Trace<T: FluxOrd> {
    state: State<T>,
}

enum State<T: FluxOrd> {
    /// No work done yet; fast paths run on the first `next()`.
    Pending { arr: Vec<T> },
    /// Main loop in progress.
    Running(Driver<T>),
    /// Terminal event or error already delivered.
    Done,
}

impl<T: FluxOrd + Display> Iterator for Trace<T> {
    type Item = Result<TraceEvent<T>, SortError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Taking the state out lets every early return (terminal, error)
            // leave `Done` behind without a separate assignment.
            match mem::replace(&mut self.state, State::Done) {
                State::Done => return None,
                State::Pending { arr } => match start_run(arr) {
                    Ok(Started::Terminal(event)) => return Some(Ok(event)),
                    Ok(Started::Run(driver)) => {
                        self.state = State::Running(driver);
                    }
                    Err(error) => return Some(Err(error)),
                },
                State::Running(mut driver) => match driver.step() {
                    Ok(Step::Event(event)) => {
                        self.state = State::Running(driver);
                        return Some(Ok(event));
                    }
                    Ok(Step::Terminal(event)) => return Some(Ok(event)),
                    Ok(Step::Continue) => {
                        self.state = State::Running(driver);
                    }
                    Err(error) => return Some(Err(error)),
                },
            }
        }
    }
}

impl<T: FluxOrd + Display> FusedIterator for Trace<T> {}

/// Outcome of one internal transition.
enum Step<T> {
    /// Emit and keep going.
    Event(TraceEvent<T>),
    /// Emit and fuse the stream.
    Terminal(TraceEvent<T>),
    /// Bookkeeping transition with nothing to show; take another step.
    Continue,
}

enum Started<T: FluxOrd> {
    Terminal(TraceEvent<T>),
    Run(Driver<T>),
}

/// Fast paths, mirrored from the in-place sort. Each one resolves the whole
/// run into a single terminal event; otherwise the main-loop driver is set
/// up with the derived tolerance.
fn start_run<T: FluxOrd + Display>(mut arr: Vec<T>) -> Result<Started<T>, SortError> {
    let n = arr.len();
    if n <= 1 {
        return Ok(Started::Terminal(terminal_event(
            arr,
            "array too small to need sorting",
        )));
    }
    if is_sorted(&arr)? {
        return Ok(Started::Terminal(terminal_event(arr, "input already sorted")));
    }
    if n <= SMALL_SORT_LEN {
        insertion_sort(&mut arr)?;
        return Ok(Started::Terminal(terminal_event(
            arr,
            "sorted with the small-input insertion fast path",
        )));
    }
    let Some(tolerance) = similarity_threshold(&arr)? else {
        return Ok(Started::Terminal(terminal_event(
            arr,
            "all elements equal, nothing to sort",
        )));
    };

    let cap = safety_cap(n);
    Ok(Started::Run(Driver {
        arr,
        tolerance,
        cap,
        cycles: 0,
        changed: false,
        region_start: 0,
        region_end: 0,
        phase: Phase::CycleStart,
    }))
}

/// Suspended state of a traced run: everything the recursive description of
/// the algorithm keeps in local variables, held as fields between `next()`
/// calls.
struct Driver<T: FluxOrd> {
    arr: Vec<T>,
    tolerance: T::Span,
    /// Cycle budget; exceeding it emits the safety stop.
    cap: usize,
    cycles: usize,
    /// Whether any group migrated in the current cycle.
    changed: bool,
    /// Sorted-region window for the current cycle; pivots stay inside it.
    region_start: usize,
    region_end: usize,
    phase: Phase<T>,
}

enum Phase<T> {
    /// About to start a cycle: cap check, region scan, ascending kickoff.
    CycleStart,
    /// Ascending sweep with the next pivot at `i`; a pivot past the window
    /// hands over to the descending sweep.
    AscendPivot { i: usize },
    /// Group `[start, end]` identified; trigger check and extraction pending.
    AscendIdentified { start: usize, end: usize },
    /// Scanning left for the insertion point, currently at `ip`.
    AscendScan { group: Group<T>, ip: usize },
    /// Insertion point fixed; relocation pending.
    AscendMigrate { group: Group<T>, ip: usize },
    /// Descending sweep with the next pivot at `i`.
    DescendPivot { i: usize },
    /// Group `[start, end]` identified; extraction pending.
    DescendIdentified { start: usize, end: usize },
    /// Scanning right for the terminal boundary (exclusive), currently `j`.
    DescendScan { group: Group<T>, j: usize },
    /// Terminal boundary fixed; relocation pending.
    DescendMigrate { group: Group<T>, j: usize },
    /// Descending sweep exhausted: close the cycle.
    CycleEnd,
}

impl<T: FluxOrd + Display> Driver<T> {
    fn step(&mut self) -> Result<Step<T>, SortError> {
        match mem::replace(&mut self.phase, Phase::CycleStart) {
            Phase::CycleStart => {
                self.cycles += 1;
                if self.cycles > self.cap {
                    return Ok(Step::Terminal(self.event(
                        Pass::SafetyStopped,
                        format!("safety stop: {} cycles without convergence", self.cap),
                        BTreeMap::new(),
                    )));
                }
                let (region_start, region_end) = sorted_region(&self.arr)?;
                if region_start >= region_end {
                    return Ok(Step::Terminal(self.sorted_event()));
                }
                self.region_start = region_start;
                self.region_end = region_end;
                self.changed = false;
                self.phase = Phase::AscendPivot { i: region_start + 1 };
                Ok(Step::Event(self.event(
                    Pass::Ascending,
                    "starting ascending pass".to_string(),
                    BTreeMap::new(),
                )))
            }

            Phase::AscendPivot { i } => {
                if i > self.region_end {
                    // Window exhausted: kick off the mirrored sweep.
                    let n = self.arr.len();
                    self.phase = Phase::DescendPivot {
                        i: (n - 2).min(self.region_end - 1),
                    };
                    return Ok(Step::Event(self.event(
                        Pass::Descending,
                        "starting descending pass".to_string(),
                        BTreeMap::new(),
                    )));
                }
                let end = grow_group_forward(&self.arr, i, &self.tolerance);
                self.phase = Phase::AscendIdentified { start: i, end };
                Ok(Step::Event(self.event(
                    Pass::Ascending,
                    format!("identifying group A[{i}]..A[{end}]"),
                    group_tags(i, end),
                )))
            }

            Phase::AscendIdentified { start, end } => {
                let triggered =
                    start > 0 && self.arr[start].try_cmp(&self.arr[start - 1])? == Ordering::Less;
                if !triggered {
                    // In place relative to its left neighbor; skip the run.
                    self.phase = Phase::AscendPivot { i: end + 1 };
                    return Ok(Step::Continue);
                }
                let originals = join_values(&self.arr[start..=end]);
                let group = extract_group(&self.arr, start, end)?;
                self.phase = Phase::AscendScan { group, ip: start };
                Ok(Step::Event(self.event(
                    Pass::Ascending,
                    format!("extracting group [{originals}] for internal sort"),
                    group_tags(start, end),
                )))
            }

            Phase::AscendScan { group, ip } => {
                if ip > 0 && self.arr[ip - 1].try_cmp(group.min())? == Ordering::Greater {
                    let cursor = ip - 1;
                    let mut highlights = group_tags(group.start, group.end);
                    highlights.insert(cursor, HighlightTag::Cursor);
                    let status = format!(
                        "comparing A[{cursor}]={} against group minimum {}",
                        self.arr[cursor],
                        group.min(),
                    );
                    self.phase = Phase::AscendScan { group, ip: cursor };
                    return Ok(Step::Event(self.event(Pass::Ascending, status, highlights)));
                }
                let mut highlights = group_tags(group.start, group.end);
                highlights.insert(ip, HighlightTag::InsertionPoint);
                let status = format!("insertion point for group: {ip}");
                self.phase = Phase::AscendMigrate { group, ip };
                Ok(Step::Event(self.event(Pass::Ascending, status, highlights)))
            }

            Phase::AscendMigrate { group, ip } => {
                migrate_left(&mut self.arr, &group, ip)?;
                self.changed = true;
                let highlights = moved_tags(ip, group.end + 1);
                self.phase = Phase::AscendPivot { i: group.end + 1 };
                Ok(Step::Event(self.event(
                    Pass::Ascending,
                    "group relocated and internally sorted".to_string(),
                    highlights,
                )))
            }

            Phase::DescendPivot { i } => {
                let start = grow_group_backward(&self.arr, i, &self.tolerance);
                self.phase = Phase::DescendIdentified { start, end: i };
                Ok(Step::Event(self.event(
                    Pass::Descending,
                    format!("identifying group A[{start}]..A[{i}]"),
                    group_tags(start, i),
                )))
            }

            Phase::DescendIdentified { start, end } => {
                let n = self.arr.len();
                let triggered =
                    end + 1 < n && self.arr[end].try_cmp(&self.arr[end + 1])? == Ordering::Greater;
                if !triggered {
                    self.phase = self.descend_step(start);
                    return Ok(Step::Continue);
                }
                let originals = join_values(&self.arr[start..=end]);
                let group = extract_group(&self.arr, start, end)?;
                self.phase = Phase::DescendScan { group, j: end + 1 };
                Ok(Step::Event(self.event(
                    Pass::Descending,
                    format!("extracting group [{originals}] for internal sort"),
                    group_tags(start, end),
                )))
            }

            Phase::DescendScan { group, j } => {
                let n = self.arr.len();
                if j < n && self.arr[j].try_cmp(group.max())? == Ordering::Less {
                    let mut highlights = group_tags(group.start, group.end);
                    highlights.insert(j, HighlightTag::Cursor);
                    let status = format!(
                        "comparing A[{j}]={} against group maximum {}",
                        self.arr[j],
                        group.max(),
                    );
                    self.phase = Phase::DescendScan { group, j: j + 1 };
                    return Ok(Step::Event(self.event(
                        Pass::Descending,
                        status,
                        highlights,
                    )));
                }
                let highlights = group_tags(group.start, group.end);
                let status = format!("terminal boundary for group: {j}");
                self.phase = Phase::DescendMigrate { group, j };
                Ok(Step::Event(self.event(Pass::Descending, status, highlights)))
            }

            Phase::DescendMigrate { group, j } => {
                migrate_right(&mut self.arr, &group, j)?;
                self.changed = true;
                let highlights = moved_tags(group.start, j);
                self.phase = self.descend_step(group.start);
                Ok(Step::Event(self.event(
                    Pass::Descending,
                    "group relocated and internally sorted".to_string(),
                    highlights,
                )))
            }

            Phase::CycleEnd => {
                if self.changed {
                    self.phase = Phase::CycleStart;
                    return Ok(Step::Continue);
                }
                Ok(Step::Terminal(self.sorted_event()))
            }
        }
    }

    /// Next descending phase after the run starting at `start` is resolved.
    fn descend_step(&self, start: usize) -> Phase<T> {
        if start <= self.region_start {
            Phase::CycleEnd
        } else {
            Phase::DescendPivot { i: start - 1 }
        }
    }

    fn event(
        &self,
        pass: Pass,
        status: String,
        highlights: BTreeMap<usize, HighlightTag>,
    ) -> TraceEvent<T> {
        TraceEvent {
            array: self.arr.clone(),
            pass,
            status,
            highlights,
        }
    }

    fn sorted_event(&self) -> TraceEvent<T> {
        TraceEvent {
            array: self.arr.clone(),
            pass: Pass::Finished,
            status: "array sorted".to_string(),
            highlights: sorted_tags(self.arr.len()),
        }
    }
}

/// Terminal event for the fast paths; the working copy becomes the snapshot.
fn terminal_event<T: FluxOrd>(arr: Vec<T>, status: &str) -> TraceEvent<T> {
    let highlights = sorted_tags(arr.len());
    TraceEvent {
        array: arr,
        pass: Pass::Finished,
        status: status.to_string(),
        highlights,
    }
}

fn group_tags(start: usize, end: usize) -> BTreeMap<usize, HighlightTag> {
    (start..=end).map(|index| (index, HighlightTag::Group)).collect()
}

fn moved_tags(start: usize, end: usize) -> BTreeMap<usize, HighlightTag> {
    (start..end).map(|index| (index, HighlightTag::MovedGroup)).collect()
}

fn sorted_tags(n: usize) -> BTreeMap<usize, HighlightTag> {
    (0..n).map(|index| (index, HighlightTag::Sorted)).collect()
}

fn join_values<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
