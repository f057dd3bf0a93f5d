//! Binary search over intervals sorted ascending on one endpoint.
//!
//! Callers guarantee the ordering. Nothing here checks it: an unsorted slice gives an
//! unspecified (but memory-safe) answer.
//!
//! Ties resolve toward the extreme index consistent with the relation, so a run of equal
//! values (e.g. zero-width intervals at the same instant) yields its first element for `>=`
//! searches and its last element for `<=` searches.

use crate::interval::{Endpoint, Interval};

/// Smallest index `i` with `intervals[i].endpoint(endpoint) >= value`.
///
/// `None` when every interval's endpoint is below `value` (or `value` is NaN).
pub fn search_ge<I: Interval>(intervals: &[I], endpoint: Endpoint, value: f64) -> Option<usize> {
    let mut lo = 0;
    let mut hi = intervals.len();
    let mut found = None;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if intervals[mid].endpoint(endpoint) >= value {
            found = Some(mid);
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    found
}

/// Largest index `i` with `intervals[i].endpoint(endpoint) <= value`.
///
/// `None` when every interval's endpoint is above `value` (or `value` is NaN).
pub fn search_le<I: Interval>(intervals: &[I], endpoint: Endpoint, value: f64) -> Option<usize> {
    let mut lo = 0;
    let mut hi = intervals.len();
    let mut found = None;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if intervals[mid].endpoint(endpoint) <= value {
            found = Some(mid);
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    found
}

pub fn search_start_ge<I: Interval>(intervals: &[I], value: f64) -> Option<usize> {
    search_ge(intervals, Endpoint::Start, value)
}

pub fn search_end_ge<I: Interval>(intervals: &[I], value: f64) -> Option<usize> {
    search_ge(intervals, Endpoint::End, value)
}

pub fn search_start_le<I: Interval>(intervals: &[I], value: f64) -> Option<usize> {
    search_le(intervals, Endpoint::Start, value)
}

pub fn search_end_le<I: Interval>(intervals: &[I], value: f64) -> Option<usize> {
    search_le(intervals, Endpoint::End, value)
}
