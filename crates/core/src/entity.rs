//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Line items and categories are entities: two line items with the same
/// product id are the same bill entry, whatever their quantity.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
