//! Persistence port for workflow entities, plus an in-memory adapter.
//!
//! The real backend lives behind an HTTP API owned by another service; this
//! crate only states what the workflow needs from it. Writes are
//! last-write-wins.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use stoneyard_core::{Entity, Owned};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// fetch / update / delete by id.
pub trait EntityStore<E: Entity>: Send + Sync {
    fn fetch(&self, id: &E::Id) -> Result<E, StoreError>;

    /// Insert or replace; returns what was stored.
    fn update(&self, entity: E) -> Result<E, StoreError>;

    fn delete(&self, id: &E::Id) -> Result<(), StoreError>;
}

/// Stores that can list the children of a parent entity.
pub trait ChildStore<E: Owned>: EntityStore<E> {
    fn list_by_parent(&self, parent: &E::ParentId) -> Result<Vec<E>, StoreError>;
}

impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn fetch(&self, id: &E::Id) -> Result<E, StoreError> {
        (**self).fetch(id)
    }

    fn update(&self, entity: E) -> Result<E, StoreError> {
        (**self).update(entity)
    }

    fn delete(&self, id: &E::Id) -> Result<(), StoreError> {
        (**self).delete(id)
    }
}

impl<E, S> ChildStore<E> for Arc<S>
where
    E: Owned,
    S: ChildStore<E> + ?Sized,
{
    fn list_by_parent(&self, parent: &E::ParentId) -> Result<Vec<E>, StoreError> {
        (**self).list_by_parent(parent)
    }
}

/// In-memory store for tests/dev. Listing keeps first-insertion order.
#[derive(Debug)]
pub struct InMemoryEntityStore<E: Entity> {
    inner: RwLock<Entries<E>>,
}

#[derive(Debug)]
struct Entries<E: Entity> {
    next_seq: u64,
    rows: HashMap<E::Id, (u64, E)>,
}

impl<E: Entity> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Entries {
                next_seq: 0,
                rows: HashMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|e| e.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl<E> EntityStore<E> for InMemoryEntityStore<E>
where
    E: Entity + Clone + Send + Sync,
    E::Id: Send + Sync,
{
    fn fetch(&self, id: &E::Id) -> Result<E, StoreError> {
        let entries = self.inner.read().map_err(poisoned)?;
        entries
            .rows
            .get(id)
            .map(|(_, e)| e.clone())
            .ok_or_else(|| StoreError::NotFound(format!("{id:?}")))
    }

    fn update(&self, entity: E) -> Result<E, StoreError> {
        let mut entries = self.inner.write().map_err(poisoned)?;
        let id = entity.id().clone();
        let seq = match entries.rows.get(&id) {
            Some((seq, _)) => *seq,
            None => {
                entries.next_seq += 1;
                entries.next_seq
            }
        };
        entries.rows.insert(id, (seq, entity.clone()));
        Ok(entity)
    }

    fn delete(&self, id: &E::Id) -> Result<(), StoreError> {
        let mut entries = self.inner.write().map_err(poisoned)?;
        match entries.rows.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("{id:?}"))),
        }
    }
}

impl<E> ChildStore<E> for InMemoryEntityStore<E>
where
    E: Owned + Clone + Send + Sync,
    E::Id: Send + Sync,
{
    fn list_by_parent(&self, parent: &E::ParentId) -> Result<Vec<E>, StoreError> {
        let entries = self.inner.read().map_err(poisoned)?;
        let mut children: Vec<&(u64, E)> = entries
            .rows
            .values()
            .filter(|(_, e)| e.parent_id() == parent)
            .collect();
        children.sort_by_key(|(seq, _)| *seq);
        Ok(children.into_iter().map(|(_, e)| e.clone()).collect())
    }
}
