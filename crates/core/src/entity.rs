//! Entity trait: identity + continuity.

/// Entity marker + minimal interface.
///
/// Every stored row of the dataset is an entity: it has a storage-assigned
/// identity and is never mutated after insertion.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
