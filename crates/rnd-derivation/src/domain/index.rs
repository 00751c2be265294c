//! # Derivation Indices
//!
//! 32-bit child indices split into two disjoint ranges:
//!
//! | Kind | Range |
//! |------|-------|
//! | [`Hardened`] | `[2^31, 2^32)` |
//! | [`Soft`] | `[0, 2^31)` |
//!
//! The kind is a type parameter, so an `Index<Hardened>` always holds a
//! hardened value. Child derivation itself accepts any value.

use std::fmt;
use std::marker::PhantomData;

use crate::domain::errors::{RndError, RndResult};

/// Smallest hardened index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Hardened {}
    impl Sealed for super::Soft {}
}

/// Index range marker.
pub trait IndexKind: sealed::Sealed + Copy + Send + Sync + 'static {
    /// Human readable kind name.
    const NAME: &'static str;

    /// Whether `value` falls in this kind's range.
    fn contains(value: u32) -> bool;
}

/// Hardened indices, `[2^31, 2^32)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hardened;

/// Soft indices, `[0, 2^31)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Soft;

impl IndexKind for Hardened {
    const NAME: &'static str = "hardened";

    fn contains(value: u32) -> bool {
        value >= HARDENED_OFFSET
    }
}

impl IndexKind for Soft {
    const NAME: &'static str = "soft";

    fn contains(value: u32) -> bool {
        value < HARDENED_OFFSET
    }
}

/// A derivation index whose range is fixed by `K`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index<K: IndexKind> {
    value: u32,
    _kind: PhantomData<K>,
}

impl<K: IndexKind> Index<K> {
    /// Validate `value` against the kind's range.
    pub fn new(value: u32) -> RndResult<Self> {
        if !K::contains(value) {
            return Err(RndError::IndexOutOfRange {
                kind: K::NAME,
                value,
            });
        }
        Ok(Self {
            value,
            _kind: PhantomData,
        })
    }

    /// Raw 32-bit value.
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Wrap `value` without a range check. Callers check the range.
    const fn unchecked(value: u32) -> Self {
        Self {
            value,
            _kind: PhantomData,
        }
    }
}

impl Index<Hardened> {
    /// The smallest hardened index, `2^31`.
    pub const MIN: Self = Self {
        value: HARDENED_OFFSET,
        _kind: PhantomData,
    };

    /// Hardened index at `offset` past `2^31`.
    pub fn from_offset(offset: u32) -> RndResult<Self> {
        match HARDENED_OFFSET.checked_add(offset) {
            Some(value) => Self::new(value),
            None => Err(RndError::IndexOutOfRange {
                kind: Hardened::NAME,
                value: offset,
            }),
        }
    }

    /// Offset past `2^31`.
    pub const fn offset(&self) -> u32 {
        self.value - HARDENED_OFFSET
    }
}

impl Index<Soft> {
    /// Index zero.
    pub const MIN: Self = Self {
        value: 0,
        _kind: PhantomData,
    };
}

impl<K: IndexKind> fmt::Debug for Index<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index<{}>({:#x})", K::NAME, self.value)
    }
}

impl<K: IndexKind> fmt::Display for Index<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<K: IndexKind> From<Index<K>> for u32 {
    fn from(index: Index<K>) -> u32 {
        index.value
    }
}

impl<K: IndexKind> TryFrom<u32> for Index<K> {
    type Error = RndError;

    fn try_from(value: u32) -> RndResult<Self> {
        Self::new(value)
    }
}

/// An address index of either kind.
///
/// Legacy wallets issued hardened address indices as well as soft ones, so
/// address derivation accepts both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressIndex {
    /// Index in `[2^31, 2^32)`.
    Hardened(Index<Hardened>),
    /// Index in `[0, 2^31)`.
    Soft(Index<Soft>),
}

impl AddressIndex {
    /// Raw 32-bit value.
    pub const fn value(&self) -> u32 {
        match self {
            AddressIndex::Hardened(index) => index.value(),
            AddressIndex::Soft(index) => index.value(),
        }
    }
}

impl From<u32> for AddressIndex {
    fn from(value: u32) -> Self {
        if Hardened::contains(value) {
            AddressIndex::Hardened(Index::<Hardened>::unchecked(value))
        } else {
            AddressIndex::Soft(Index::<Soft>::unchecked(value))
        }
    }
}

impl From<Index<Hardened>> for AddressIndex {
    fn from(index: Index<Hardened>) -> Self {
        AddressIndex::Hardened(index)
    }
}

impl From<Index<Soft>> for AddressIndex {
    fn from(index: Index<Soft>) -> Self {
        AddressIndex::Soft(index)
    }
}

impl From<AddressIndex> for u32 {
    fn from(index: AddressIndex) -> u32 {
        index.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardened_bounds() {
        assert!(Index::<Hardened>::new(HARDENED_OFFSET).is_ok());
        assert!(Index::<Hardened>::new(u32::MAX).is_ok());
        assert_eq!(
            Index::<Hardened>::new(HARDENED_OFFSET - 1).unwrap_err(),
            RndError::IndexOutOfRange {
                kind: "hardened",
                value: HARDENED_OFFSET - 1
            }
        );
    }

    #[test]
    fn test_soft_bounds() {
        assert!(Index::<Soft>::new(0).is_ok());
        assert!(Index::<Soft>::new(HARDENED_OFFSET - 1).is_ok());
        assert!(Index::<Soft>::new(HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_hardened_offset() {
        let index = Index::<Hardened>::from_offset(5).unwrap();
        assert_eq!(index.value(), 0x8000_0005);
        assert_eq!(index.offset(), 5);
        assert!(Index::<Hardened>::from_offset(HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_min_constants() {
        assert_eq!(Index::<Hardened>::MIN.value(), 2_147_483_648);
        assert_eq!(Index::<Soft>::MIN.value(), 0);
    }

    #[test]
    fn test_try_from_u32() {
        let index: Index<Soft> = 42u32.try_into().unwrap();
        assert_eq!(u32::from(index), 42);
    }

    #[test]
    fn test_address_index_classifies_kind() {
        assert!(matches!(AddressIndex::from(7), AddressIndex::Soft(_)));
        assert!(matches!(
            AddressIndex::from(HARDENED_OFFSET),
            AddressIndex::Hardened(_)
        ));
        assert_eq!(AddressIndex::from(Index::<Hardened>::MIN).value(), HARDENED_OFFSET);
        assert_eq!(u32::from(AddressIndex::from(Index::<Soft>::MIN)), 0);
    }

    #[test]
    fn test_address_index_from_u32_at_boundaries() {
        for value in [0, 1, HARDENED_OFFSET - 1] {
            assert_eq!(
                AddressIndex::from(value),
                AddressIndex::Soft(Index::<Soft>::new(value).unwrap())
            );
        }
        for value in [HARDENED_OFFSET, HARDENED_OFFSET + 1, u32::MAX] {
            assert_eq!(
                AddressIndex::from(value),
                AddressIndex::Hardened(Index::<Hardened>::new(value).unwrap())
            );
        }
    }
}
