/// Owning collection of named records (a texture or LUT folder of one file).
///
/// Records live in a `SlotMap`; a name map gives O(1) lookup and an order list
/// keeps the container's ordering for saving. Names are unique and non-empty.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use super::resource::Named;

new_key_type! {
    /// Stable key of a record inside a `ResourceCollection`
    pub struct ResourceKey;
}

/// Name-unique, ordered collection of `Named` records
pub struct ResourceCollection<T: Named> {
    items: SlotMap<ResourceKey, T>,
    by_name: FxHashMap<String, ResourceKey>,
    order: Vec<ResourceKey>,
}

impl<T: Named> Default for ResourceCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Named> ResourceCollection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            by_name: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether a record with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Key of the record with this name
    pub fn key(&self, name: &str) -> Option<ResourceKey> {
        self.by_name.get(name).copied()
    }

    /// Record by name
    pub fn get(&self, name: &str) -> Option<&T> {
        self.by_name.get(name).and_then(|&key| self.items.get(key))
    }

    /// Record by key
    pub fn get_by_key(&self, key: ResourceKey) -> Option<&T> {
        self.items.get(key)
    }

    /// Append a record
    ///
    /// # Errors
    ///
    /// `InvalidName` for an empty name, `NameCollision` if the name is taken.
    pub fn insert(&mut self, item: T) -> Result<ResourceKey> {
        let name = item.name().to_string();
        if name.is_empty() {
            return Err(Error::InvalidName("resource name cannot be empty".to_string()));
        }
        if self.by_name.contains_key(&name) {
            return Err(Error::NameCollision(name));
        }

        let key = self.items.insert(item);
        self.by_name.insert(name, key);
        self.order.push(key);
        Ok(key)
    }

    /// Swap the record stored under `item`'s name, keeping its position
    ///
    /// Returns the previous record.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if no record has that name.
    pub fn replace(&mut self, item: T) -> Result<T> {
        let key = self.by_name.get(item.name()).copied()
            .ok_or_else(|| Error::ResourceNotFound(item.name().to_string()))?;
        let slot = self.items.get_mut(key)
            .ok_or_else(|| Error::ResourceNotFound(item.name().to_string()))?;
        Ok(std::mem::replace(slot, item))
    }

    /// Rename a record in place, keeping its position
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if `old` is absent, `InvalidName` for an empty `new`,
    /// `NameCollision` if `new` belongs to another record.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let key = self.key(old).ok_or_else(|| Error::ResourceNotFound(old.to_string()))?;
        if new.is_empty() {
            return Err(Error::InvalidName("resource name cannot be empty".to_string()));
        }
        if old == new {
            return Ok(());
        }
        if self.by_name.contains_key(new) {
            return Err(Error::NameCollision(new.to_string()));
        }

        if let Some(item) = self.items.get_mut(key) {
            item.set_name(new.to_string());
        }
        self.by_name.remove(old);
        self.by_name.insert(new.to_string(), key);
        Ok(())
    }

    /// Remove a record by name
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let key = self.by_name.remove(name)?;
        self.order.retain(|&k| k != key);
        self.items.remove(key)
    }

    /// Remove every record, returning them in order
    pub fn drain(&mut self) -> Vec<T> {
        let order = std::mem::take(&mut self.order);
        self.by_name.clear();
        let drained = order.into_iter().filter_map(|key| self.items.remove(key)).collect();
        self.items.clear();
        drained
    }

    /// Records in container order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(move |&key| self.items.get(key))
    }

    /// Names in container order
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|item| item.name()).collect()
    }

    /// `base` if free, otherwise `base` followed by the first free integer
    pub fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1u32..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
