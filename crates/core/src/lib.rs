//! `stoneyard-core` — domain foundation shared by the stone-yard crates.
//!
//! Pure domain primitives only: identifiers, aggregate/entity traits, the
//! event contract and the error taxonomy. No IO lives here.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::{Entity, Owned};
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{BlockId, SlabId, UserId};
pub use value_object::ValueObject;
