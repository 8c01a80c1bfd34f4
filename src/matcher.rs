
/// Equality capability used to recognize the same logical item across two sequences.
///
/// The diff engine never inspects items in any other way, so an implementation that
/// always returns `false` turns every mutation into delete-all followed by insert-all.
pub trait ItemEq<T: ?Sized> {
    /// Returns `true` if `a` and `b` are the same logical item.
    fn same_item(&self, a: &T, b: &T) -> bool;

    /// Returns `true` if two items matched by [`same_item`](Self::same_item) also have the same content.
    ///
    /// Matched items for which this returns `false` are reported as updates.
    fn same_content(&self, a: &T, b: &T) -> bool {
        let _ = (a, b);
        true
    }
}

impl<T: ?Sized, E: ItemEq<T> + ?Sized> ItemEq<T> for &E {
    fn same_item(&self, a: &T, b: &T) -> bool {
        (**self).same_item(a, b)
    }
    fn same_content(&self, a: &T, b: &T) -> bool {
        (**self).same_content(a, b)
    }
}

/// Matches items with [`PartialEq`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByPartialEq;

impl<T: PartialEq + ?Sized> ItemEq<T> for ByPartialEq {
    fn same_item(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Treats every pair of items as different.
///
/// Use this for item types that have no meaningful equality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeverEq;

impl<T: ?Sized> ItemEq<T> for NeverEq {
    fn same_item(&self, _a: &T, _b: &T) -> bool {
        false
    }
}

/// Matches items by a key, and compares the content of matched items with [`PartialEq`].
///
/// Items with the same key but different content are reported as updates.
#[derive(Clone, Copy, Debug)]
pub struct ByKey<F>(pub F);

impl<T, K, F> ItemEq<T> for ByKey<F>
where
    T: PartialEq,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    fn same_item(&self, a: &T, b: &T) -> bool {
        (self.0)(a) == (self.0)(b)
    }
    fn same_content(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Matches items with an arbitrary predicate.
///
/// Matched items are never reported as updates, even if their content differs.
/// Use [`with_content`](Self::with_content) to compare content as well.
#[derive(Clone, Copy, Debug)]
pub struct FnEq<F>(pub F);

impl<F> FnEq<F> {
    pub fn with_content<C>(self, same_content: C) -> FnEqWithContent<F, C> {
        FnEqWithContent {
            same_item: self.0,
            same_content,
        }
    }
}

impl<T, F> ItemEq<T> for FnEq<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn same_item(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

/// Matches items with one predicate and compares the content of matched items with another.
#[derive(Clone, Copy, Debug)]
pub struct FnEqWithContent<F, C> {
    same_item: F,
    same_content: C,
}

impl<T, F, C> ItemEq<T> for FnEqWithContent<F, C>
where
    F: Fn(&T, &T) -> bool,
    C: Fn(&T, &T) -> bool,
{
    fn same_item(&self, a: &T, b: &T) -> bool {
        (self.same_item)(a, b)
    }
    fn same_content(&self, a: &T, b: &T) -> bool {
        (self.same_content)(a, b)
    }
}
