//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Menu items are entities: an admin edit changes every field except the id,
/// and cart lines keep pointing at the same item.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
