//! One generic repository for every id-keyed entity.
//!
//! Stations, trains, routes, schedules and timetables are all stored in a
//! `Repository<T>`.  Entities are kept in an ordered map so iteration,
//! archiving and id allocation are deterministic.
//!
//! The archive form is a plain `Vec<T>` in id order; it is what the
//! persistence document stores.
//!
//! Ids are handed out by a counter that only moves forward, so the id of a
//! removed entity never comes back while the repository lives.  Loading an
//! archive restarts the counter one past the largest stored id.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::{CoreError, CoreResult, SequentialId};

/// An entity that carries its own id.
pub trait Entity {
    type Id: SequentialId;

    fn id(&self) -> Self::Id;
}

/// Id-keyed entity store.
#[derive(Clone, Debug)]
pub struct Repository<T: Entity> {
    items: BTreeMap<T::Id, T>,
    next: T::Id,
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self { items: BTreeMap::new(), next: T::Id::first() }
    }
}

/// Equal when the stored entities are equal; the id counter is not state.
impl<T: Entity + PartialEq> PartialEq for Repository<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Entity> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new entity.  Fails if its id is already taken.
    pub fn add(&mut self, item: T) -> CoreResult<T::Id> {
        let id = item.id();
        match self.items.entry(id) {
            btree_map::Entry::Occupied(_) => Err(CoreError::DuplicateId(id.to_string())),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(item);
                self.claim(id);
                Ok(id)
            }
        }
    }

    /// Store an entity, replacing any entity with the same id.
    pub fn insert(&mut self, item: T) -> Option<T> {
        let id = item.id();
        self.claim(id);
        self.items.insert(id, item)
    }

    fn claim(&mut self, id: T::Id) {
        if id >= self.next {
            self.next = id.successor();
        }
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        self.items.remove(&id)
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    /// Like [`get`](Self::get) but an unknown id is an error.
    pub fn require(&self, id: T::Id) -> CoreResult<&T> {
        self.items.get(&id).ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.items.contains_key(&id)
    }

    /// All entities in ascending id order.
    pub fn all(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.values()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = T::Id> + '_ {
        self.items.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The id a newly created entity should receive: one past the largest
    /// id ever stored here.
    pub fn next_id(&self) -> T::Id {
        self.next
    }

    /// Keep only the entities for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.items.retain(|_, item| keep(item));
    }

    // ── Archive ───────────────────────────────────────────────────────────

    /// Entities in id order, ready for serialization.
    pub fn to_archive(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.values().cloned().collect()
    }

    /// Rebuild a repository from its archive.  Fails on duplicate ids.
    pub fn from_archive(items: Vec<T>) -> CoreResult<Self> {
        let mut repo = Self::new();
        for item in items {
            repo.add(item)?;
        }
        Ok(repo)
    }
}
