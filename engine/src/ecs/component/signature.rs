use std::fmt;

use fixedbitset::FixedBitSet;

use crate::{
    all_tuples,
    ecs::component::{Component, ComponentTypes, Id, MAX_COMPONENTS},
};

/// A fixed-width set of component kinds.
///
/// For an entity, bit `k` is set exactly when the entity owns a component whose kind id is `k`.
/// For a system, the set bits are the kinds an entity must own to be a member.
///
/// The width is always [`MAX_COMPONENTS`]. Using an id outside that range is a programming error
/// and panics.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// One bit per component kind id.
    bits: FixedBitSet,
}

impl Signature {
    /// Create a signature with no bits set.
    #[inline]
    pub fn new() -> Self {
        Self {
            bits: FixedBitSet::with_capacity(MAX_COMPONENTS),
        }
    }

    /// Create a signature with the given kinds set.
    pub fn from_ids(ids: impl IntoIterator<Item = Id>) -> Self {
        let mut signature = Self::new();
        for id in ids {
            signature.set(id);
        }
        signature
    }

    /// Mark the given kind as present.
    #[inline]
    pub fn set(&mut self, id: Id) {
        self.bits.insert(Self::bit(id));
    }

    /// Mark the given kind as absent.
    #[inline]
    pub fn clear(&mut self, id: Id) {
        self.bits.set(Self::bit(id), false);
    }

    /// Clear every bit.
    #[inline]
    pub fn reset(&mut self) {
        self.bits.clear();
    }

    /// Check whether the given kind is present.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.bits.contains(Self::bit(id))
    }

    /// Check whether every kind in `required` is also present here, i.e.
    /// `(self & required) == required`.
    #[inline]
    pub fn matches(&self, required: &Signature) -> bool {
        self.bits.is_superset(&required.bits)
    }

    /// Union another signature into this one.
    #[inline]
    pub fn union_with(&mut self, other: &Signature) {
        self.bits.union_with(&other.bits);
    }

    /// Check if no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Get the number of kinds present.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over the kinds present, in id order.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.bits.ones().map(Id::from)
    }

    /// Map an id to its bit, enforcing the fixed width.
    #[inline]
    fn bit(id: Id) -> usize {
        let bit = id.index();
        assert!(
            bit < MAX_COMPONENTS,
            "component id {bit} does not fit in a {MAX_COMPONENTS}-bit signature"
        );
        bit
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

/// Render as a bit string with bit 0 on the right, like a bitset literal.
impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: String = (0..MAX_COMPONENTS)
            .rev()
            .map(|bit| if self.bits.contains(bit) { '1' } else { '0' })
            .collect();
        write!(f, "Signature({bits})")
    }
}

/// Trait for converting a kind, or a tuple of kinds, into a [`Signature`].
pub trait IntoSignature {
    /// Build the signature, registering any kinds not yet known.
    fn into_signature(types: &ComponentTypes) -> Signature;
}

/// [`IntoSignature`] implementation for the empty tuple.
impl IntoSignature for () {
    fn into_signature(_types: &ComponentTypes) -> Signature {
        Signature::new()
    }
}

/// [`IntoSignature`] implementation for single component kinds.
impl<C: Component> IntoSignature for C {
    fn into_signature(types: &ComponentTypes) -> Signature {
        Signature::from_ids([types.register::<C>()])
    }
}

/// [`IntoSignature`] implementation for tuples of other [`IntoSignature`] types.
macro_rules! tuple_signature {
    ($($name: ident),*) => {
        impl<$($name: IntoSignature),*> IntoSignature for ($($name,)*) {
            fn into_signature(types: &ComponentTypes) -> Signature {
                let mut signature = Signature::new();
                $(
                    signature.union_with(&<$name>::into_signature(types));
                )*
                signature
            }
        }
    }
}

// Implement the tuple -> Signature for all tuples up to 26 elements.
all_tuples!(tuple_signature);
