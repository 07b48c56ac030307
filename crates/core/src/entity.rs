//! Entity trait: identity + continuity across edits.

/// Entity marker + minimal interface.
///
/// Products, categories, subcategories and banners are entities: the hosted
/// backend assigns their identifier and every edit keeps it.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
