use crate::{ChangeEvent, DiffResult};


impl<T: Clone> DiffResult<T> {
    /// Applies the script to `items`, which must hold the old sequence.
    ///
    /// Elements that are neither deleted nor moved keep their relative order and fill the
    /// positions not taken by moves and inserts.
    ///
    /// # Panics
    ///
    /// Panics if the script does not fit `items`.
    pub fn apply_to(&self, items: &mut Vec<T>) {
        let old_len = items.len();
        let new_len = (old_len + self.inserts.len())
            .checked_sub(self.deletes.len())
            .expect("more deletes than items");
        let mut removed = vec![false; old_len];
        for &(index, _) in &self.deletes {
            removed[index] = true;
        }
        for m in &self.moves {
            removed[m.old_index] = true;
        }

        let mut slots: Vec<Option<T>> = (0..new_len).map(|_| None).collect();
        for m in &self.moves {
            slots[m.new_index] = Some(items[m.old_index].clone());
        }
        for (index, value) in &self.inserts {
            slots[*index] = Some(value.clone());
        }
        let mut survivors = items
            .drain(..)
            .zip(removed)
            .filter_map(|(value, removed)| (!removed).then_some(value))
            .collect::<Vec<_>>()
            .into_iter();
        for slot in &mut slots {
            if slot.is_none() {
                *slot = survivors.next();
            }
        }
        assert!(survivors.next().is_none(), "edit script leaves items unplaced");
        items.extend(
            slots
                .into_iter()
                .map(|slot| slot.expect("edit script leaves a hole")),
        );
        for (index, value) in &self.updates {
            items[*index] = value.clone();
        }
    }
}

/// A mirrored copy of an observed sequence, kept up to date by replaying change events.
///
/// Events between `BeginUpdates` and `EndUpdates` are buffered and applied together when
/// the transaction ends.
///
/// Content changes reach the mirror only through `Updates` events, so a matched item whose
/// content changed stays stale when the observed vector's [`ItemEq`](crate::ItemEq) does
/// not compare content (for example [`FnEq`](crate::FnEq) without `with_content`).
#[derive(Clone, Debug)]
pub struct VecMirror<T> {
    items: Vec<T>,
    pending: Option<DiffResult<T>>,
}

impl<T: Clone> VecMirror<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            pending: None,
        }
    }
    pub fn items(&self) -> &[T] {
        &self.items
    }
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
    pub fn in_transaction(&self) -> bool {
        self.pending.is_some()
    }

    /// Feeds one event.
    ///
    /// # Panics
    ///
    /// Panics on a nested `BeginUpdates`, or on any other event outside a transaction.
    pub fn apply(&mut self, event: &ChangeEvent<T>) {
        match event {
            ChangeEvent::BeginUpdates => {
                assert!(self.pending.is_none(), "nested `BeginUpdates`");
                self.pending = Some(DiffResult::new());
            }
            ChangeEvent::Moves(moves) => self.pending_mut().moves.extend_from_slice(moves),
            ChangeEvent::Deletes { indices, elements } => {
                let pending = self.pending_mut();
                pending
                    .deletes
                    .extend(indices.iter().copied().zip(elements.iter().cloned()));
            }
            ChangeEvent::Inserts { indices, elements } => {
                let pending = self.pending_mut();
                pending
                    .inserts
                    .extend(indices.iter().copied().zip(elements.iter().cloned()));
            }
            ChangeEvent::Updates { indices, elements } => {
                let pending = self.pending_mut();
                pending
                    .updates
                    .extend(indices.iter().copied().zip(elements.iter().cloned()));
            }
            ChangeEvent::EndUpdates => {
                let pending = self
                    .pending
                    .take()
                    .expect("`EndUpdates` without `BeginUpdates`");
                pending.apply_to(&mut self.items);
            }
        }
    }

    fn pending_mut(&mut self) -> &mut DiffResult<T> {
        self.pending
            .as_mut()
            .expect("change event outside of a transaction")
    }
}

impl<T: Clone> Default for VecMirror<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Extend<ChangeEvent<T>> for VecMirror<T> {
    fn extend<I: IntoIterator<Item = ChangeEvent<T>>>(&mut self, iter: I) {
        for event in iter {
            self.apply(&event);
        }
    }
}
