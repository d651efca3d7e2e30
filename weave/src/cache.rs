use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map;

use crate::Instance;

/// Singleton instances keyed by their concrete type.
///
/// The cache is append-only: once a type has an instance it is never
/// replaced or evicted.
#[derive(Default)]
pub struct InstanceCache {
    instances: HashMap<TypeId, Instance>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_id: TypeId) -> Option<Instance> {
        self.instances.get(&type_id).cloned()
    }

    /// Stores `instance` unless the type already has one, and returns the
    /// instance that ends up cached.
    pub fn put(&mut self, type_id: TypeId, instance: Instance) -> Instance {
        match self.instances.entry(type_id) {
            hash_map::Entry::Occupied(v) => v.get().clone(),
            hash_map::Entry::Vacant(v) => v.insert(instance).clone(),
        }
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.instances.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
