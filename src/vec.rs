use std::{
    fmt::{self, Debug},
    marker::PhantomData,
    ops::{Index, IndexMut, Range, RangeBounds},
    slice,
};

use serde::{Deserialize, Serialize};

use crate::{
    diff,
    utils::{to_range, try_to_range},
    ByPartialEq, ChangeEvent, DiffResult, Error, ItemEq,
};

#[cfg(test)]
mod tests;

type Handler<T> = Box<dyn FnMut(&ChangeEvent<T>)>;

/// An ordered sequence that reports its structural changes to a single handler.
///
/// `replace` and `replace_subrange` compute a minimal edit script with the diff engine,
/// using the [`ItemEq`] given at construction to recognize items across the old and new
/// contents. `insert_contents`, `append` and `remove_all` report their changes directly.
/// Each of these calls delivers exactly one transaction (see [`ChangeEvent`]) to the
/// handler before it returns.
///
/// # Silent writes
///
/// [`set_silently`](Self::set_silently) and `vec[i] = value` (via [`IndexMut`]) write to
/// the storage **without notifying the handler**. They exist for callers that refresh the
/// affected item on their own; any mirror of this sequence misses these writes.
pub struct ObservableVec<T, E = ByPartialEq> {
    items: Vec<T>,
    eq: E,
    handler: Option<Handler<T>>,
}

impl<T: PartialEq> ObservableVec<T> {
    pub fn new() -> Self {
        Self::with_matcher(ByPartialEq)
    }
}

impl<T, E: ItemEq<T>> ObservableVec<T, E> {
    pub fn with_matcher(eq: E) -> Self {
        Self::from_vec_with(Vec::new(), eq)
    }
    pub fn from_vec_with(items: Vec<T>, eq: E) -> Self {
        Self {
            items,
            eq,
            handler: None,
        }
    }

    pub fn matcher(&self) -> &E {
        &self.eq
    }

    pub fn set_handler(&mut self, f: impl FnMut(&ChangeEvent<T>) + 'static) {
        self.handler = Some(Box::new(f));
    }
    pub fn clear_handler(&mut self) {
        self.handler = None;
    }
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Overwrites the item at `index` without notifying the handler.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_silently(&mut self, index: usize, value: T) {
        if let Err(e) = self.try_set_silently(index, value) {
            panic!("{e}");
        }
    }
    pub fn try_set_silently(&mut self, index: usize, value: T) -> Result<(), Error> {
        let len = self.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn remove_all(&mut self) {
        let deletes = self.items.drain(..).enumerate().collect();
        self.emit(DiffResult {
            deletes,
            ..DiffResult::new()
        });
    }

    fn emit(&mut self, result: DiffResult<T>) {
        let Some(handler) = &mut self.handler else {
            return;
        };
        tracing::debug!(
            len = self.items.len(),
            moves = result.moves.len(),
            deletes = result.deletes.len(),
            inserts = result.inserts.len(),
            updates = result.updates.len(),
            "emit transaction"
        );
        for event in result.into_events() {
            handler(&event);
        }
    }
}

impl<T: Clone, E: ItemEq<T>> ObservableVec<T, E> {
    /// Replaces the whole content with `items`.
    ///
    /// If `perform_diff` is `false`, the storage is swapped without notifying the handler.
    pub fn replace(&mut self, items: Vec<T>, perform_diff: bool) {
        if !perform_diff || self.handler.is_none() {
            self.items = items;
            return;
        }
        let result = diff(&self.items, &items, &self.eq);
        self.items = items;
        self.emit(result);
    }

    /// Replaces the items in `range` with `items`, reporting the changes within the range.
    ///
    /// Items outside `range` are never reported. Indices in the events refer to the whole sequence.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn replace_subrange(
        &mut self,
        range: impl RangeBounds<usize>,
        items: impl IntoIterator<Item = T>,
    ) {
        let range = to_range(range, self.len());
        self.splice(range, items.into_iter().collect());
    }
    pub fn try_replace_subrange(
        &mut self,
        range: impl RangeBounds<usize>,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), Error> {
        let range = try_to_range(range, self.len())?;
        self.splice(range, items.into_iter().collect());
        Ok(())
    }
    fn splice(&mut self, range: Range<usize>, items: Vec<T>) {
        let result = if self.handler.is_some() {
            let mut result = diff(&self.items[range.clone()], &items, &self.eq);
            result.offset_by(range.start);
            Some(result)
        } else {
            None
        };
        self.items.splice(range, items);
        if let Some(result) = result {
            self.emit(result);
        }
    }

    /// Inserts `items` at `index`, reporting them as inserted without computing a diff.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_contents(&mut self, index: usize, items: impl IntoIterator<Item = T>) {
        if let Err(e) = self.try_insert_contents(index, items) {
            panic!("{e}");
        }
    }
    pub fn try_insert_contents(
        &mut self,
        index: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Result<(), Error> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        let items: Vec<T> = items.into_iter().collect();
        let inserts = if self.handler.is_some() {
            items
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, value)| (index + i, value))
                .collect()
        } else {
            Vec::new()
        };
        self.items.splice(index..index, items);
        self.emit(DiffResult {
            inserts,
            ..DiffResult::new()
        });
        Ok(())
    }

    pub fn append(&mut self, items: impl IntoIterator<Item = T>) {
        let len = self.len();
        self.insert_contents(len, items);
    }
}

impl<T: PartialEq> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E: ItemEq<T> + Default> From<Vec<T>> for ObservableVec<T, E> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec_with(items, E::default())
    }
}

impl<T, E: ItemEq<T> + Default> FromIterator<T> for ObservableVec<T, E> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Clone, E: ItemEq<T>> Extend<T> for ObservableVec<T, E> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append(iter);
    }
}

impl<T, E> Index<usize> for ObservableVec<T, E> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.items.get(index).expect("index out of bounds")
    }
}

/// Writes through `vec[i] = value` are not reported to the handler.
impl<T, E> IndexMut<usize> for ObservableVec<T, E> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.items.get_mut(index).expect("index out of bounds")
    }
}

impl<'a, T, E> IntoIterator for &'a ObservableVec<T, E> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Debug, E> Debug for ObservableVec<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq, E> PartialEq<[T]> for ObservableVec<T, E> {
    fn eq(&self, other: &[T]) -> bool {
        self.items == other
    }
}
impl<T: PartialEq, E> PartialEq<Vec<T>> for ObservableVec<T, E> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}
impl<T: PartialEq, E> PartialEq<&[T]> for ObservableVec<T, E> {
    fn eq(&self, other: &&[T]) -> bool {
        self.items == *other
    }
}

impl<T: Serialize, E> Serialize for ObservableVec<T, E> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.items.iter())
    }
}
impl<'de, T, E> Deserialize<'de> for ObservableVec<T, E>
where
    T: Deserialize<'de>,
    E: ItemEq<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ObservableVecVisitor<T, E>(PhantomData<fn() -> (T, E)>);
        impl<'de, T, E> serde::de::Visitor<'de> for ObservableVecVisitor<T, E>
        where
            T: Deserialize<'de>,
            E: ItemEq<T> + Default,
        {
            type Value = ObservableVec<T, E>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element()? {
                    items.push(value);
                }
                Ok(ObservableVec::from(items))
            }
        }
        deserializer.deserialize_seq(ObservableVecVisitor(PhantomData))
    }
}

/// Creates an [`ObservableVec`] that matches items with [`PartialEq`].
#[macro_export]
macro_rules! obs_vec {
    () => {
        $crate::ObservableVec::new()
    };
    ($($x:expr),+ $(,)?) => {
        $crate::ObservableVec::from_vec_with(::std::vec![$($x),+], $crate::ByPartialEq)
    };
}
