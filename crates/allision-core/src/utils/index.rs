// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Strongly Typed Indices
//!
//! Phantom-typed wrappers around `usize` that keep the index spaces of a
//! collision study apart. A bridge registry, the piers of one bridge, the
//! dolphins of one bridge and the vessel length classes are all addressed by
//! position; `TypedIndex<T>` carries a tag type `T: TypedIndexTag` so that a
//! pier index cannot be handed to a function expecting a length class.
//!
//! The wrapper is `#[repr(transparent)]` over `usize`.
//!
//! ## Usage
//!
//! ```rust
//! use allision_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
//! struct PierTag;
//! impl TypedIndexTag for PierTag { const NAME: &'static str = "PierIndex"; }
//!
//! type PierIndex = TypedIndex<PierTag>;
//! let p = PierIndex::new(3);
//! assert_eq!(p.get(), 3);
//! assert_eq!(format!("{}", p), "PierIndex(3)");
//! ```

/// A trait to tag typed indices with a name used by `Display` and `Debug`.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A strongly typed index associated with a tag type `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new `TypedIndex` from a raw position.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize` position.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Checks if the index is zero.
    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.index == 0
    }

    /// Returns an iterator over the typed indices `0..len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use allision_core::utils::index::{TypedIndex, TypedIndexTag};
    /// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    /// struct ClassTag;
    /// impl TypedIndexTag for ClassTag { const NAME: &'static str = "ClassIndex"; }
    ///
    /// let all: Vec<usize> = TypedIndex::<ClassTag>::range(3).map(|c| c.get()).collect();
    /// assert_eq!(all, vec![0, 1, 2]);
    /// ```
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct BridgeTag;

    impl TypedIndexTag for BridgeTag {
        const NAME: &'static str = "BridgeIdx";
    }

    type BridgeIdx = TypedIndex<BridgeTag>;

    #[test]
    fn test_new_and_get() {
        let idx = BridgeIdx::new(10);
        assert_eq!(idx.get(), 10);
        assert!(!idx.is_zero());
        assert!(BridgeIdx::new(0).is_zero());
    }

    #[test]
    fn test_conversions() {
        let idx: BridgeIdx = 42.into();
        assert_eq!(idx.get(), 42);

        let val: usize = idx.into();
        assert_eq!(val, 42);
    }

    #[test]
    fn test_debug_and_display() {
        let idx = BridgeIdx::new(7);
        assert_eq!(format!("{}", idx), "BridgeIdx(7)");
        assert_eq!(format!("{:?}", idx), "BridgeIdx(7)");
    }

    #[test]
    fn test_range_is_ordered_and_sized() {
        let it = BridgeIdx::range(4);
        assert_eq!(it.len(), 4);
        let collected: Vec<BridgeIdx> = BridgeIdx::range(4).rev().collect();
        assert_eq!(collected.first().map(|i| i.get()), Some(3));
        assert_eq!(collected.last().map(|i| i.get()), Some(0));
        assert_eq!(BridgeIdx::range(0).count(), 0);
    }

    #[test]
    fn test_ordering_follows_position() {
        assert!(BridgeIdx::new(1) < BridgeIdx::new(2));
        assert_eq!(BridgeIdx::new(5), BridgeIdx::from(5));
    }
}
