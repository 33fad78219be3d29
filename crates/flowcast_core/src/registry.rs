//! Id-keyed lookup tables used while linking a scenario

use std::fmt::Display;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::{IdKind, LinkError};

#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    kind: IdKind,
    entries: FxHashMap<K, V>,
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Display,
{
    pub fn new(kind: IdKind) -> Self {
        Self {
            kind,
            entries: FxHashMap::default(),
        }
    }

    /// Build a registry from `(id, value)` pairs, rejecting the first repeated id.
    pub fn from_entries(
        kind: IdKind,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, LinkError> {
        let mut registry = Self::new(kind);
        for (id, value) in entries {
            registry.insert(id, value)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, id: K, value: V) -> Result<(), LinkError> {
        if self.entries.contains_key(&id) {
            return Err(LinkError::DuplicateId {
                kind: self.kind,
                id: id.to_string(),
            });
        }
        self.entries.insert(id, value);
        Ok(())
    }

    pub fn get(&self, id: &K) -> Result<&V, LinkError> {
        self.entries.get(id).ok_or_else(|| LinkError::NotFound {
            kind: self.kind,
            id: id.to_string(),
        })
    }

    pub fn lookup(&self, id: &K) -> Option<&V> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityId;

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut registry = Registry::new(IdKind::Entity);
        registry.insert(EntityId::from("alice"), 1).unwrap();

        let err = registry.insert(EntityId::from("alice"), 2).unwrap_err();
        assert_eq!(
            err,
            LinkError::DuplicateId {
                kind: IdKind::Entity,
                id: "alice".to_string()
            }
        );
        assert_eq!(registry.get(&"alice".into()), Ok(&1), "first value is kept");
    }

    #[test]
    fn test_get_and_lookup_missing() {
        let registry: Registry<EntityId, u8> = Registry::new(IdKind::Entity);
        assert!(registry.lookup(&"bob".into()).is_none());
        assert!(matches!(
            registry.get(&"bob".into()),
            Err(LinkError::NotFound { kind: IdKind::Entity, .. })
        ));
    }
}
