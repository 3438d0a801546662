//! Entity traits: identity that survives status changes.

/// Anything persisted and addressed by id (blocks, slabs).
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// An entity owned by another one (a slab belongs to exactly one block).
///
/// Persistence adapters use this to answer "list children of" queries.
pub trait Owned: Entity {
    type ParentId: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn parent_id(&self) -> &Self::ParentId;
}
