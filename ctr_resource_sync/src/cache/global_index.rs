/// Process-wide resource index, one per resource kind.
///
/// Every open file contributes its records under its own `OwnerId`. Several
/// files may contribute the same name; the index keeps all contributions and
/// exposes the one with the highest priority. Closing a file removes exactly
/// its own contributions, so a name shared by two open files stays resolvable
/// while either of them is open.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use crate::resource::{OwnerId, Resource};

/// Global index shared between all open files of the process
pub type SharedGlobalIndex = Arc<Mutex<GlobalIndex>>;

/// One file's record under a name
#[derive(Debug, Clone)]
struct Contribution {
    owner: OwnerId,
    resource: Resource,
}

/// Name -> resource index with per-owner contributions
///
/// Contributions of one name are ordered by priority, lowest first; the last
/// one is what `lookup` returns.
#[derive(Default)]
pub struct GlobalIndex {
    entries: FxHashMap<String, Vec<Contribution>>,
}

impl GlobalIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Create a shareable empty index
    pub fn shared() -> SharedGlobalIndex {
        Arc::new(Mutex::new(Self::new()))
    }

    fn normalize(name: &str, resource: Resource) -> Resource {
        if resource.name == name {
            resource
        } else {
            resource.renamed(name)
        }
    }

    /// Insert or replace `owner`'s record under `name` and make it visible
    pub fn upsert(&mut self, owner: OwnerId, name: &str, resource: Resource) {
        let resource = Self::normalize(name, resource);
        let list = self.entries.entry(name.to_string()).or_default();
        list.retain(|c| c.owner != owner);
        list.push(Contribution { owner, resource });
    }

    /// Add `owner`'s record under `name` without shadowing other owners
    ///
    /// Used when a file is loaded: a name already visible from another open
    /// file stays visible. Returns `true` if the new record is the visible one.
    pub fn register(&mut self, owner: OwnerId, name: &str, resource: Resource) -> bool {
        let resource = Self::normalize(name, resource);
        let list = self.entries.entry(name.to_string()).or_default();
        if let Some(existing) = list.iter_mut().find(|c| c.owner == owner) {
            existing.resource = resource;
        } else {
            list.insert(0, Contribution { owner, resource });
        }
        list.last().is_some_and(|c| c.owner == owner)
    }

    /// Remove `owner`'s record under `name`
    ///
    /// Returns `true` if `owner` had contributed that name.
    pub fn remove(&mut self, owner: OwnerId, name: &str) -> bool {
        let Some(list) = self.entries.get_mut(name) else {
            return false;
        };
        let before = list.len();
        list.retain(|c| c.owner != owner);
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(name);
        }
        removed
    }

    /// Remove every contribution of `owner`, returning the affected names
    pub fn remove_owner(&mut self, owner: OwnerId) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|name, list| {
            let before = list.len();
            list.retain(|c| c.owner != owner);
            if list.len() != before {
                removed.push(name.clone());
            }
            !list.is_empty()
        });
        removed.sort();
        removed
    }

    /// Visible record under `name`
    pub fn lookup(&self, name: &str) -> Option<Resource> {
        self.entries
            .get(name)
            .and_then(|list| list.last())
            .map(|c| c.resource.clone())
    }

    /// `owner`'s own record under `name`, visible or not
    pub fn lookup_owned(&self, owner: OwnerId, name: &str) -> Option<Resource> {
        self.entries
            .get(name)?
            .iter()
            .find(|c| c.owner == owner)
            .map(|c| c.resource.clone())
    }

    /// Whether any owner contributes `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Owner whose record is visible under `name`
    pub fn visible_owner(&self, name: &str) -> Option<OwnerId> {
        self.entries.get(name).and_then(|list| list.last()).map(|c| c.owner)
    }

    /// Owners contributing `name`, lowest priority first
    pub fn owners_of(&self, name: &str) -> Vec<OwnerId> {
        self.entries
            .get(name)
            .map(|list| list.iter().map(|c| c.owner).collect())
            .unwrap_or_default()
    }

    /// Number of visible names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visible names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop every contribution of every owner
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "global_index_tests.rs"]
mod tests;
