//! Stable merge sort over element indices.
//!
//! Sorting indices rather than elements lets multi-key ordering precompute
//! every key once per element and compare by position.

use std::cmp::Ordering;

/// Indices `0..len` ordered by `compare`, ties kept in ascending index order.
///
/// Bottom-up merge sort: runs of width 1, 2, 4, ... are merged pairwise
/// between two buffers. Taking from the left run on ties keeps it stable.
pub fn stable_sort_indices(len: usize, mut compare: impl FnMut(usize, usize) -> Ordering) -> Vec<usize> {
    let mut src: Vec<usize> = (0..len).collect();
    let mut dst: Vec<usize> = vec![0; len];
    let mut width = 1;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge(&src[start..mid], &src[mid..end], &mut dst[start..end], &mut compare);
            start = end;
        }
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }
    src
}

fn merge(
    left: &[usize],
    right: &[usize],
    out: &mut [usize],
    compare: &mut impl FnMut(usize, usize) -> Ordering,
) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        let take_left = match (left.get(i), right.get(j)) {
            (Some(&l), Some(&r)) => compare(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            _ => false,
        };
        if take_left {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}
