//! The geoflux group-migration sort.
//!
//! Geoflux sorts by identifying contiguous runs of *similar* values (groups),
//! sorting each run internally, and migrating it as a block toward its
//! correct position:
//! - **Ascending pass**: groups with an inverted left boundary migrate left.
//! - **Descending pass**: groups with an inverted right boundary migrate right.
//! - **Fast paths**: already-sorted input returns after one scan; short input
//!   falls back to insertion sort.
//!
//! Passes alternate until a full cycle makes no change. The main entry point
//! is [`geoflux_sort`]; the step-by-step observable variant lives in
//! [`crate::trace`].

use std::cmp::Ordering;

use crate::core::{FluxOrd, Group, SortError};

/// Inputs this short or shorter skip the group machinery entirely and run a
/// plain insertion sort.
pub(crate) const SMALL_SORT_LEN: usize = 20;

/// Upper bound on the length of an identified group.
///
/// Bounds scan and buffer cost when most of the slice falls inside one
/// similarity band; oversized clusters simply migrate in several steps.
pub(crate) const MAX_GROUP_LEN: usize = 50;

/// Sorts a slice in place with the geoflux group-migration algorithm.
///
/// The slice ends up in non-decreasing order. Equal elements may change
/// relative order because identified groups are re-sorted internally, so the
/// algorithm is **not stable**.
///
/// # Errors
///
/// Returns [`SortError::Incomparable`] if two elements admit no ordering
/// (for example a float `NaN`). Writes are staged after the comparisons that
/// justify them, so a failed call still leaves the slice holding a
/// permutation of its original contents.
///
/// # Examples
///
/// ```
/// use geoflux::geoflux_sort;
///
/// let mut data = vec![64, 34, 25, 12, 22, 11, 90];
/// geoflux_sort(&mut data).unwrap();
/// assert_eq!(data, vec![11, 12, 22, 25, 34, 64, 90]);
/// ```
///
/// Floats sort as long as no `NaN` is present:
///
/// ```
/// use geoflux::geoflux_sort;
///
/// let mut data = vec![2.5_f64, -0.5, 1.25];
/// geoflux_sort(&mut data).unwrap();
/// assert_eq!(data, vec![-0.5, 1.25, 2.5]);
///
/// let mut poisoned = vec![1.0, f64::NAN];
/// assert!(geoflux_sort(&mut poisoned).is_err());
/// ```
pub fn geoflux_sort<T: FluxOrd>(arr: &mut [T]) -> Result<(), SortError> {
    let n = arr.len();
    if n <= 1 {
        return Ok(());
    }

    // Fast paths: one scan for ordered input, insertion sort for short input
    // where group bookkeeping costs more than it saves.
    if is_sorted(arr)? {
        return Ok(());
    }
    if n <= SMALL_SORT_LEN {
        return insertion_sort(arr);
    }

    // A zero range means every element is equal. The sorted check above
    // already returned in that case, but the tolerance contract stands on
    // its own.
    let Some(tolerance) = similarity_threshold(arr)? else {
        return Ok(());
    };

    // Cycle cap: a guard against non-convergence, not a normal exit. A stop
    // here leaves a best-effort partial order behind.
    let cap = safety_cap(n);
    let mut cycles = 0usize;

    let mut changed = true;
    while changed {
        cycles += 1;
        if cycles > cap {
            return Ok(());
        }
        changed = false;

        // Shrink the active window past prefixes and suffixes already in
        // order; equal boundaries mean the whole slice is sorted.
        let (region_start, region_end) = sorted_region(arr)?;
        if region_start >= region_end {
            return Ok(());
        }

        // Ascending sweep.
        let mut i = region_start + 1;
        while i <= region_end {
            let end = grow_group_forward(arr, i, &tolerance);
            if i > 0 && arr[i].try_cmp(&arr[i - 1])? == Ordering::Less {
                let group = extract_group(arr, i, end)?;
                let insertion_point = left_boundary(arr, &group)?;
                migrate_left(arr, &group, insertion_point)?;
                changed = true;
            }
            // The run is fully examined whether or not it moved.
            i = end + 1;
        }

        // Descending sweep, walking from the back of the window toward
        // region_start.
        let mut i = (n - 2).min(region_end - 1);
        loop {
            let start = grow_group_backward(arr, i, &tolerance);
            if i + 1 < n && arr[i].try_cmp(&arr[i + 1])? == Ordering::Greater {
                let group = extract_group(arr, start, i)?;
                let boundary = right_boundary(arr, &group)?;
                migrate_right(arr, &group, boundary)?;
                changed = true;
            }
            if start <= region_start {
                break;
            }
            i = start - 1;
        }
    }

    Ok(())
}

/// Cycle budget before the driver gives up: `n^2 / 2 + 5`.
///
/// Generous on purpose: every cycle that changes anything removes at least
/// one inversion, and a slice of length `n` holds at most `n(n-1)/2` of
/// them, so the cap sits above the worst-case cycle count. The test suite
/// treats reaching it as a regression.
pub(crate) fn safety_cap(n: usize) -> usize {
    n.saturating_mul(n) / 2 + 5
}

/// Single left-to-right scan for non-decreasing order.
pub(crate) fn is_sorted<T: FluxOrd>(arr: &[T]) -> Result<bool, SortError> {
    for pair in arr.windows(2) {
        if pair[0].try_cmp(&pair[1])? == Ordering::Greater {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Insertion sort with staged writes: the slot for each element is located
/// with fallible comparisons first, then the rotation happens, so an `Err`
/// never interrupts a half-applied shift.
pub(crate) fn insertion_sort<T: FluxOrd>(arr: &mut [T]) -> Result<(), SortError> {
    for i in 1..arr.len() {
        let mut slot = i;
        while slot > 0 && arr[slot - 1].try_cmp(&arr[i])? == Ordering::Greater {
            slot -= 1;
        }
        arr[slot..=i].rotate_right(1);
    }
    Ok(())
}

/// Derives the similarity tolerance from the value range, or `None` when all
/// elements compare equal. Callers guarantee a non-empty slice.
pub(crate) fn similarity_threshold<T: FluxOrd>(arr: &[T]) -> Result<Option<T::Span>, SortError> {
    let mut min = &arr[0];
    let mut max = &arr[0];
    for value in &arr[1..] {
        if value.try_cmp(min)? == Ordering::Less {
            min = value;
        }
        if value.try_cmp(max)? == Ordering::Greater {
            max = value;
        }
    }
    Ok(T::tolerance(max.span(min)))
}

/// Returns the end of the longest sorted prefix and the start of the longest
/// sorted suffix. `start >= end` means the whole slice is ordered.
pub(crate) fn sorted_region<T: FluxOrd>(arr: &[T]) -> Result<(usize, usize), SortError> {
    let n = arr.len();
    let mut start = 0;
    while start + 1 < n && arr[start].try_cmp(&arr[start + 1])? != Ordering::Greater {
        start += 1;
    }
    let mut end = n - 1;
    while end > 0 && arr[end - 1].try_cmp(&arr[end])? != Ordering::Greater {
        end -= 1;
    }
    Ok((start, end))
}

/// Grows a group to the right of `pivot`: the run of indices whose values
/// lie within `tolerance` of `arr[pivot]`, capped at [`MAX_GROUP_LEN`].
/// Returns the inclusive end index.
pub(crate) fn grow_group_forward<T: FluxOrd>(
    arr: &[T],
    pivot: usize,
    tolerance: &T::Span,
) -> usize {
    let n = arr.len();
    let mut end = pivot;
    while end + 1 < n
        && end - pivot + 1 < MAX_GROUP_LEN
        && within_tolerance(&arr[end + 1], &arr[pivot], tolerance)
    {
        end += 1;
    }
    end
}

/// Mirror of [`grow_group_forward`]: grows to the left of `pivot` and
/// returns the inclusive start index.
pub(crate) fn grow_group_backward<T: FluxOrd>(
    arr: &[T],
    pivot: usize,
    tolerance: &T::Span,
) -> usize {
    let mut start = pivot;
    while start > 0
        && pivot - start + 1 < MAX_GROUP_LEN
        && within_tolerance(&arr[start - 1], &arr[pivot], tolerance)
    {
        start -= 1;
    }
    start
}

fn within_tolerance<T: FluxOrd>(value: &T, reference: &T, tolerance: &T::Span) -> bool {
    // An unordered span (same-sign infinities subtract to NaN) lies outside
    // every tolerance; it is not an ordering failure of the elements.
    matches!(
        value.span(reference).partial_cmp(tolerance),
        Some(Ordering::Less | Ordering::Equal)
    )
}

/// Copies `[start, end]` out of the slice and sorts the copy ascending.
pub(crate) fn extract_group<T: FluxOrd>(
    arr: &[T],
    start: usize,
    end: usize,
) -> Result<Group<T>, SortError> {
    let mut values = arr[start..=end].to_vec();
    insertion_sort(&mut values)?;
    Ok(Group { start, end, values })
}

/// Finds the ascending-pass insertion point: scans left from the group while
/// neighbors exceed the group minimum.
pub(crate) fn left_boundary<T: FluxOrd>(arr: &[T], group: &Group<T>) -> Result<usize, SortError> {
    let mut insertion_point = group.start;
    while insertion_point > 0 && arr[insertion_point - 1].try_cmp(group.min())? == Ordering::Greater
    {
        insertion_point -= 1;
    }
    Ok(insertion_point)
}

/// Finds the descending-pass terminal boundary (exclusive): scans right from
/// the group while neighbors fall below the group maximum.
pub(crate) fn right_boundary<T: FluxOrd>(arr: &[T], group: &Group<T>) -> Result<usize, SortError> {
    let n = arr.len();
    let mut boundary = group.end + 1;
    while boundary < n && arr[boundary].try_cmp(group.max())? == Ordering::Less {
        boundary += 1;
    }
    Ok(boundary)
}

/// Rewrites `[insertion_point, end]` as the ascending order of the group
/// values and the displaced run together. The rotation keeps the slice a
/// permutation of itself at every instant; the insertion pass then folds the
/// displaced run into the sorted group.
///
/// Ordering the whole segment is what makes the driver converge: a displaced
/// value lying strictly between the group's extremes would otherwise land
/// inverted behind the group, and the descending pass would migrate the same
/// group straight back. With the segment sorted, every migration removes at
/// least one inversion and never creates one across the segment boundary
/// (everything left of the insertion point is at most the group minimum), so
/// the total inversion count strictly decreases and the cycle cap is
/// unreachable.
pub(crate) fn migrate_left<T: FluxOrd>(
    arr: &mut [T],
    group: &Group<T>,
    insertion_point: usize,
) -> Result<(), SortError> {
    let len = group.len();
    arr[insertion_point..=group.end].rotate_right(len);
    arr[insertion_point..insertion_point + len].clone_from_slice(&group.values);
    insertion_sort(&mut arr[insertion_point..=group.end])
}

/// Mirror of [`migrate_left`]: rewrites `[start, boundary)` as the ascending
/// order of the displaced run and the group values together.
pub(crate) fn migrate_right<T: FluxOrd>(
    arr: &mut [T],
    group: &Group<T>,
    boundary: usize,
) -> Result<(), SortError> {
    let len = group.len();
    arr[group.start..boundary].rotate_left(len);
    arr[boundary - len..boundary].clone_from_slice(&group.values);
    insertion_sort(&mut arr[group.start..boundary])
}
