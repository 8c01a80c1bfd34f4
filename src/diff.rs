use std::{cmp::max, ops::Range};

use derive_ex::derive_ex;
use serde::{Deserialize, Serialize};

use crate::{utils::longest_increasing_subsequence, ChangeEvent, ItemEq, Move};


/// Edit script that turns an old sequence into a new one.
///
/// `deletes` are ascending indices into the old sequence, `inserts` and `updates` are
/// ascending indices into the new sequence, and `moves` are ordered by their old index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive_ex(Default(bound()))]
pub struct DiffResult<T> {
    pub inserts: Vec<(usize, T)>,
    pub deletes: Vec<(usize, T)>,
    pub moves: Vec<Move>,
    pub updates: Vec<(usize, T)>,
}

impl<T> DiffResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the script contains no change at all.
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.deletes.is_empty()
            && self.moves.is_empty()
            && self.updates.is_empty()
    }

    /// Shifts every index by `offset`.
    ///
    /// Used to turn a script computed over a subrange into one over the full sequence.
    pub fn offset_by(&mut self, offset: usize) {
        if offset == 0 {
            return;
        }
        for (index, _) in &mut self.inserts {
            *index += offset;
        }
        for (index, _) in &mut self.deletes {
            *index += offset;
        }
        for (index, _) in &mut self.updates {
            *index += offset;
        }
        for m in &mut self.moves {
            m.old_index += offset;
            m.new_index += offset;
        }
    }

    /// Converts the script into one transaction of change events.
    ///
    /// Empty lists are omitted, so a script with no change yields only
    /// `BeginUpdates` and `EndUpdates`.
    pub fn into_events(self) -> Vec<ChangeEvent<T>> {
        let mut events = vec![ChangeEvent::BeginUpdates];
        if !self.moves.is_empty() {
            events.push(ChangeEvent::Moves(self.moves));
        }
        if !self.deletes.is_empty() {
            let (indices, elements) = self.deletes.into_iter().unzip();
            events.push(ChangeEvent::Deletes { indices, elements });
        }
        if !self.inserts.is_empty() {
            let (indices, elements) = self.inserts.into_iter().unzip();
            events.push(ChangeEvent::Inserts { indices, elements });
        }
        if !self.updates.is_empty() {
            let (indices, elements) = self.updates.into_iter().unzip();
            events.push(ChangeEvent::Updates { indices, elements });
        }
        events.push(ChangeEvent::EndUpdates);
        events
    }
}

/// Computes the edit script that turns `old` into `new`.
pub fn diff<T: Clone>(old: &[T], new: &[T], eq: &impl ItemEq<T>) -> DiffResult<T> {
    let result = diff_slices(old, new, eq);
    trace_result(&result, old.len(), new.len());
    result
}

/// Computes the edit script for a replacement restricted to `range` of `old`.
///
/// `new` is the whole sequence after the replacement. The elements of `old` before and after
/// `range` are treated as fixed context at both ends of `new`, so the replaced part of `new` is
/// `new[range.start..new.len() - (old.len() - range.end)]`. Indices in the result refer to the
/// full sequences.
///
/// # Panics
///
/// Panics if `range` is not within `old`, or if `new` is shorter than the fixed context.
pub fn diff_range<T: Clone>(
    old: &[T],
    range: Range<usize>,
    new: &[T],
    eq: &impl ItemEq<T>,
) -> DiffResult<T> {
    assert!(
        range.start <= range.end && range.end <= old.len(),
        "range {}..{} out of bounds for length {}",
        range.start,
        range.end,
        old.len()
    );
    let suffix = old.len() - range.end;
    assert!(
        range.start + suffix <= new.len(),
        "new sequence of length {} is shorter than the fixed context",
        new.len()
    );
    let new_range = range.start..new.len() - suffix;
    let mut result = diff_slices(&old[range.clone()], &new[new_range.clone()], eq);
    result.offset_by(range.start);
    trace_result(&result, range.len(), new_range.len());
    result
}

fn trace_result<T>(result: &DiffResult<T>, old_len: usize, new_len: usize) {
    tracing::trace!(
        old_len,
        new_len,
        moves = result.moves.len(),
        deletes = result.deletes.len(),
        inserts = result.inserts.len(),
        updates = result.updates.len(),
        "computed diff"
    );
}

fn diff_slices<T: Clone>(old: &[T], new: &[T], eq: &impl ItemEq<T>) -> DiffResult<T> {
    let mut result = DiffResult::new();
    if old.is_empty() {
        result.inserts = new.iter().cloned().enumerate().collect();
        return result;
    }
    if new.is_empty() {
        result.deletes = old.iter().cloned().enumerate().collect();
        return result;
    }

    let old_to_new = match_items(old, new, eq);
    let mut new_matched = vec![false; new.len()];
    let mut pairs = Vec::new();
    for (old_index, &new_index) in old_to_new.iter().enumerate() {
        if let Some(new_index) = new_index {
            new_matched[new_index] = true;
            pairs.push((old_index, new_index));
        } else {
            result.deletes.push((old_index, old[old_index].clone()));
        }
    }
    for (new_index, value) in new.iter().enumerate() {
        if !new_matched[new_index] {
            result.inserts.push((new_index, value.clone()));
        }
    }

    let new_indices: Vec<usize> = pairs.iter().map(|&(_, new_index)| new_index).collect();
    let mut stay = longest_increasing_subsequence(&new_indices)
        .into_iter()
        .peekable();
    for (i, &(old_index, new_index)) in pairs.iter().enumerate() {
        if stay.next_if_eq(&i).is_none() {
            result.moves.push(Move::new(old_index, new_index));
        }
        if !eq.same_content(&old[old_index], &new[new_index]) {
            result.updates.push((new_index, new[new_index].clone()));
        }
    }
    result.updates.sort_by_key(|&(index, _)| index);
    result
}

/// Returns, for each position of `old`, the position of `new` it is matched with.
///
/// The common prefix and then the common suffix are matched first. Of what remains, a
/// longest common subsequence is matched, preferring the earliest positions on both
/// sides. Elements left over are then paired with the earliest unmatched equal element
/// of `new`; those pairs are the candidates for moves.
fn match_items<T>(old: &[T], new: &[T], eq: &impl ItemEq<T>) -> Vec<Option<usize>> {
    let mut old_to_new = vec![None; old.len()];
    let mut new_used = vec![false; new.len()];

    let prefix = old
        .iter()
        .zip(new)
        .take_while(|&(a, b)| eq.same_item(a, b))
        .count();
    for (i, slot) in old_to_new[..prefix].iter_mut().enumerate() {
        *slot = Some(i);
    }
    new_used[..prefix].fill(true);

    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|&(a, b)| eq.same_item(a, b))
        .count();
    let (old_end, new_end) = (old.len() - suffix, new.len() - suffix);
    for (k, slot) in old_to_new[old_end..].iter_mut().enumerate() {
        *slot = Some(new_end + k);
    }
    new_used[new_end..].fill(true);

    let (old_rest, new_rest) = (&old[prefix..old_end], &new[prefix..new_end]);
    let (m, n) = (old_rest.len(), new_rest.len());
    if m > 0 && n > 0 {
        let width = n + 1;
        // lcs[i * width + j]: length of the longest common subsequence of old_rest[i..] and new_rest[j..]
        let mut lcs = vec![0u32; (m + 1) * width];
        for i in (0..m).rev() {
            for j in (0..n).rev() {
                lcs[i * width + j] = if eq.same_item(&old_rest[i], &new_rest[j]) {
                    lcs[(i + 1) * width + j + 1] + 1
                } else {
                    max(lcs[(i + 1) * width + j], lcs[i * width + j + 1])
                };
            }
        }
        let (mut i, mut j) = (0, 0);
        while i < m && j < n {
            if eq.same_item(&old_rest[i], &new_rest[j]) {
                old_to_new[prefix + i] = Some(prefix + j);
                new_used[prefix + j] = true;
                i += 1;
                j += 1;
            } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
                i += 1;
            } else {
                j += 1;
            }
        }
    }

    for old_index in prefix..old_end {
        if old_to_new[old_index].is_some() {
            continue;
        }
        let found = (prefix..new_end).find(|&new_index| {
            !new_used[new_index] && eq.same_item(&old[old_index], &new[new_index])
        });
        if let Some(new_index) = found {
            old_to_new[old_index] = Some(new_index);
            new_used[new_index] = true;
        }
    }
    old_to_new
}
