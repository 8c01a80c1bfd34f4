use std::ops::{Bound, Range, RangeBounds};

use crate::Error;


pub(crate) fn try_to_range(
    range: impl RangeBounds<usize>,
    len: usize,
) -> Result<Range<usize>, Error> {
    let start = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&n) => n.saturating_add(1),
        Bound::Excluded(&n) => n,
        Bound::Unbounded => len,
    };
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }
    if end > len {
        return Err(Error::RangeOutOfBounds { start, end, len });
    }
    Ok(start..end)
}

pub(crate) fn to_range(range: impl RangeBounds<usize>, len: usize) -> Range<usize> {
    match try_to_range(range, len) {
        Ok(range) => range,
        Err(e) => panic!("{e}"),
    }
}

/// Returns the positions in `values` of one longest strictly increasing subsequence.
///
/// Among runs of the same length, the one whose elements end up smallest is chosen.
pub(crate) fn longest_increasing_subsequence(values: &[usize]) -> Vec<usize> {
    // tails[k]: position of the smallest last value of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; values.len()];
    for (i, &value) in values.iter().enumerate() {
        let k = tails.partition_point(|&t| values[t] < value);
        if k > 0 {
            prev[i] = Some(tails[k - 1]);
        }
        if k == tails.len() {
            tails.push(i);
        } else {
            tails[k] = i;
        }
    }
    let mut positions = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        positions.push(i);
        cursor = prev[i];
    }
    positions.reverse();
    positions
}
