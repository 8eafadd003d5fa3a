//! Flat, id-keyed arena of virtual file-system entities.
//!
//! The store keeps the tree consistent on every write: parents always exist and are folders, and
//! moves that would create a cycle are rejected by walking the target's ancestor chain. Each walk
//! is bounded by the entity count so a corrupt chain can never loop forever.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DesktopError, DesktopResult};
use crate::model::{Entity, EntityId, EntityKind};
use crate::time::ModifiedClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// What happens to the children of a removed folder.
pub enum DeletePolicy {
    /// Children are detached to the desktop root.
    #[default]
    Orphan,
    /// The whole subtree is removed.
    Cascade,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Entities affected by a [`EntityStore::remove`] call.
pub struct RemovalReport {
    /// Entities deleted from the store, the requested one first.
    pub removed: Vec<EntityId>,
    /// Former children that were detached to the root.
    pub orphaned: Vec<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    delete_policy: DeletePolicy,
    clock: ModifiedClock,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delete_policy(delete_policy: DeletePolicy) -> Self {
        Self {
            delete_policy,
            ..Self::default()
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    pub fn set_delete_policy(&mut self, policy: DeletePolicy) {
        self.delete_policy = policy;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Iterates all entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Inserts a new entity.
    ///
    /// A zero `date_modified` is replaced with the current time.
    ///
    /// # Errors
    ///
    /// [`DesktopError::DuplicateId`] when the id is taken, [`DesktopError::InvalidName`] for a
    /// blank name, and [`DesktopError::InvalidTarget`] when the parent is missing or not a folder.
    pub fn create(&mut self, mut entity: Entity) -> DesktopResult<&Entity> {
        if self.entities.contains_key(&entity.id) {
            return Err(DesktopError::DuplicateId(entity.id));
        }
        entity.name = normalized_name(&entity.name)?;
        if let Some(parent) = entity.parent.as_ref() {
            self.require_folder(parent)?;
        }
        if entity.date_modified == 0 {
            entity.date_modified = self.clock.stamp();
        }

        debug!(entity = %entity.id, kind = ?entity.kind, "entity created");
        let id = entity.id.clone();
        self.order.push(id.clone());
        Ok(self.entities.entry(id).or_insert(entity))
    }

    /// Renames an entity; surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] or [`DesktopError::InvalidName`].
    pub fn rename(&mut self, id: &EntityId, new_name: &str) -> DesktopResult<()> {
        let name = normalized_name(new_name)?;
        let entity = lookup_mut(&mut self.entities, id)?;
        entity.name = name;
        entity.date_modified = self.clock.stamp();
        debug!(entity = %id, name = %entity.name, "entity renamed");
        Ok(())
    }

    /// Replaces the content of a text entity.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`], or [`DesktopError::InvalidType`] for non-text entities.
    pub fn update_content(&mut self, id: &EntityId, content: impl Into<String>) -> DesktopResult<()> {
        let entity = lookup_mut(&mut self.entities, id)?;
        if entity.kind != EntityKind::Text {
            return Err(DesktopError::InvalidType {
                id: id.clone(),
                actual: entity.kind,
            });
        }
        entity.content = Some(content.into());
        entity.date_modified = self.clock.stamp();
        debug!(entity = %id, "entity content updated");
        Ok(())
    }

    /// Reparents an entity under `new_parent`, or to the root when `None`.
    ///
    /// # Errors
    ///
    /// - [`DesktopError::EntityNotFound`] when `id` is unknown.
    /// - [`DesktopError::CycleDetected`] when the target is `id` itself or one of its descendants.
    /// - [`DesktopError::InvalidTarget`] when the target is missing or not a folder.
    pub fn move_entity(&mut self, id: &EntityId, new_parent: Option<&EntityId>) -> DesktopResult<()> {
        if !self.entities.contains_key(id) {
            return Err(DesktopError::EntityNotFound(id.clone()));
        }
        if let Some(target) = new_parent {
            let rejected = if target == id {
                Some(DesktopError::CycleDetected {
                    id: id.clone(),
                    target: target.clone(),
                })
            } else if let Err(err) = self.require_folder(target) {
                Some(err)
            } else if self.chain_reaches(target, id) {
                Some(DesktopError::CycleDetected {
                    id: id.clone(),
                    target: target.clone(),
                })
            } else {
                None
            };
            if let Some(err) = rejected {
                warn!(entity = %id, target = %target, error = %err, "move rejected");
                return Err(err);
            }
        }

        let entity = lookup_mut(&mut self.entities, id)?;
        entity.parent = new_parent.cloned();
        entity.date_modified = self.clock.stamp();
        debug!(entity = %id, parent = ?new_parent, "entity moved");
        Ok(())
    }

    /// Removes an entity according to the store's [`DeletePolicy`].
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when `id` is unknown.
    pub fn remove(&mut self, id: &EntityId) -> DesktopResult<RemovalReport> {
        if !self.entities.contains_key(id) {
            return Err(DesktopError::EntityNotFound(id.clone()));
        }

        let mut report = RemovalReport::default();
        match self.delete_policy {
            DeletePolicy::Orphan => {
                report.removed.push(id.clone());
                let stamp = self.clock.stamp();
                for child_id in &self.order {
                    if let Some(child) = self.entities.get_mut(child_id) {
                        if child.parent.as_ref() == Some(id) {
                            child.parent = None;
                            child.date_modified = stamp;
                            report.orphaned.push(child_id.clone());
                        }
                    }
                }
            }
            DeletePolicy::Cascade => {
                report.removed = self.subtree(id);
            }
        }

        let removed: HashSet<&EntityId> = report.removed.iter().collect();
        self.order.retain(|entry| !removed.contains(entry));
        for entry in &report.removed {
            self.entities.remove(entry);
        }
        debug!(
            entity = %id,
            removed = report.removed.len(),
            orphaned = report.orphaned.len(),
            "entity removed"
        );
        Ok(report)
    }

    /// Lists the direct children of `parent` (or root entities for `None`) in insertion order.
    pub fn list_children(&self, parent: Option<&EntityId>) -> Vec<&Entity> {
        self.iter()
            .filter(|entity| entity.parent.as_ref() == parent)
            .collect()
    }

    /// Returns the ancestor chain of `id`, nearest parent first.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when `id` is unknown.
    pub fn ancestors(&self, id: &EntityId) -> DesktopResult<Vec<EntityId>> {
        let entity = self
            .entities
            .get(id)
            .ok_or_else(|| DesktopError::EntityNotFound(id.clone()))?;
        let mut chain = Vec::new();
        let mut cursor = entity.parent.as_ref();
        while let Some(parent) = cursor {
            if chain.len() >= self.len() {
                break;
            }
            chain.push(parent.clone());
            cursor = self.entities.get(parent).and_then(|p| p.parent.as_ref());
        }
        Ok(chain)
    }

    /// Returns `true` when `candidate` sits somewhere below `ancestor`.
    pub fn is_descendant_of(&self, candidate: &EntityId, ancestor: &EntityId) -> bool {
        if candidate == ancestor {
            return false;
        }
        self.chain_reaches(candidate, ancestor)
    }

    /// Returns the `/`-joined name path from the root to `id`.
    ///
    /// # Errors
    ///
    /// [`DesktopError::EntityNotFound`] when `id` is unknown.
    pub fn path_of(&self, id: &EntityId) -> DesktopResult<String> {
        let mut names: Vec<&str> = self
            .ancestors(id)?
            .iter()
            .filter_map(|ancestor| self.entities.get(ancestor))
            .map(|entity| entity.name.as_str())
            .collect();
        names.reverse();
        if let Some(entity) = self.entities.get(id) {
            names.push(entity.name.as_str());
        }
        Ok(format!("/{}", names.join("/")))
    }

    fn require_folder(&self, target: &EntityId) -> DesktopResult<()> {
        match self.entities.get(target) {
            None => Err(DesktopError::InvalidTarget {
                target: target.clone(),
                reason: "parent does not exist",
            }),
            Some(entity) if !entity.is_folder() => Err(DesktopError::InvalidTarget {
                target: target.clone(),
                reason: "parent is not a folder",
            }),
            Some(_) => Ok(()),
        }
    }

    /// Walks up from `start` (inclusive) and reports whether `needle` is on the chain.
    ///
    /// A chain longer than the entity count can only be a cycle and is reported as reaching.
    fn chain_reaches(&self, start: &EntityId, needle: &EntityId) -> bool {
        let mut cursor = Some(start);
        let mut steps = 0usize;
        while let Some(current) = cursor {
            if current == needle {
                return true;
            }
            steps += 1;
            if steps > self.len() {
                return true;
            }
            cursor = self.entities.get(current).and_then(|e| e.parent.as_ref());
        }
        false
    }

    /// Collects `root` and all of its descendants, parents before children.
    fn subtree(&self, root: &EntityId) -> Vec<EntityId> {
        let mut collected = vec![root.clone()];
        let mut seen: HashSet<EntityId> = HashSet::from([root.clone()]);
        let mut index = 0;
        while index < collected.len() {
            let parent = collected[index].clone();
            for child in self.list_children(Some(&parent)) {
                if seen.insert(child.id.clone()) {
                    collected.push(child.id.clone());
                }
            }
            index += 1;
        }
        collected
    }
}

fn lookup_mut<'a>(
    entities: &'a mut HashMap<EntityId, Entity>,
    id: &EntityId,
) -> DesktopResult<&'a mut Entity> {
    entities
        .get_mut(id)
        .ok_or_else(|| DesktopError::EntityNotFound(id.clone()))
}

fn normalized_name(raw: &str) -> DesktopResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DesktopError::InvalidName);
    }
    Ok(trimmed.to_string())
}
