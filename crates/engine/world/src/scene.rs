//! Entity tree with world-space transforms
//!
//! Every entity has at most one parent and an ordered list of children.
//! Transform edits can optionally drag the subtree along; the tree itself
//! never stores relative transforms.

use std::collections::BTreeMap;

use math::{Rotation, Vector};

use crate::entity::{Entity, EntityId};
use crate::error::{Result, SceneError};

/// Owns every entity and the links between them
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: BTreeMap<EntityId, Entity>,
    next_id: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity at the root level
    ///
    /// Any parent or child links carried by `entity` are dropped.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.parent = None;
        entity.children.clear();
        self.entities.insert(id, entity);
        id
    }

    /// Insert an entity and attach it under `parent`
    pub fn spawn_child(&mut self, parent: EntityId, entity: Entity) -> Result<EntityId> {
        self.entity(parent)?;
        let id = self.spawn(entity);
        self.add_child(parent, id)?;
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(&id).ok_or(SceneError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities.get_mut(&id).ok_or(SceneError::UnknownEntity(id))
    }

    pub fn position(&self, id: EntityId) -> Option<Vector> {
        self.get(id).map(|e| e.position)
    }

    pub fn rotation(&self, id: EntityId) -> Option<Rotation> {
        self.get(id).map(|e| e.rotation)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Every entity below `id`, depth first in child order
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is `id` itself or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Attach `child` under `parent`
    ///
    /// The child is detached from its previous parent first. Attaching an
    /// entity under itself or under one of its own descendants is refused.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<()> {
        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        self.entity(parent)?;
        self.entity(child)?;
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.detach(child)?;
        self.entity_mut(child)?.parent = Some(parent);
        self.entity_mut(parent)?.children.push(child);
        tracing::trace!(%parent, %child, "attached");
        Ok(())
    }

    /// Move `child` back to the root level
    pub fn detach(&mut self, child: EntityId) -> Result<()> {
        let previous = self.entity_mut(child)?.parent.take();
        if let Some(previous) = previous {
            if let Some(parent) = self.entities.get_mut(&previous) {
                parent.children.retain(|c| *c != child);
            }
        }
        Ok(())
    }

    /// Remove an entity; its children move to the root level
    pub fn remove(&mut self, id: EntityId) -> Result<Entity> {
        self.detach(id)?;
        let mut entity = self.entities.remove(&id).ok_or(SceneError::UnknownEntity(id))?;
        for child in entity.children.drain(..) {
            if let Some(child) = self.entities.get_mut(&child) {
                child.parent = None;
            }
        }
        tracing::trace!(%id, "removed entity");
        Ok(entity)
    }

    /// Move an entity by `delta`, optionally dragging its whole subtree
    pub fn translate(&mut self, id: EntityId, delta: Vector, move_children: bool) -> Result<()> {
        self.entity_mut(id)?.position += delta;
        if move_children {
            for descendant in self.descendants(id) {
                if let Some(entity) = self.entities.get_mut(&descendant) {
                    entity.position += delta;
                }
            }
        }
        Ok(())
    }

    /// Place an entity at `position`, optionally dragging its subtree
    pub fn set_position(&mut self, id: EntityId, position: Vector, move_children: bool) -> Result<()> {
        let delta = position - self.entity(id)?.position;
        self.translate(id, delta, move_children)
    }

    /// Replace an entity's rotation without touching its children
    pub fn set_rotation(&mut self, id: EntityId, rotation: Rotation) -> Result<()> {
        self.entity_mut(id)?.rotation = rotation;
        Ok(())
    }

    /// Turn an entity by `delta`
    ///
    /// The entity's own rotation is updated component-wise. With
    /// `move_children`, each child orbits the entity: its offset is brought
    /// into the entity's unyawed frame, tilted by the X/Y part of `delta`,
    /// yawed back and then turned by the Z part of `delta`. Children keep
    /// facing the same way relative to the parent by receiving the Y/Z part
    /// of `delta`, recursively for their own children.
    pub fn rotate(&mut self, id: EntityId, delta: Rotation, move_children: bool) -> Result<()> {
        let (origin, previous) = {
            let entity = self.entity_mut(id)?;
            let previous = entity.rotation;
            entity.rotation = previous + delta;
            (entity.position, previous)
        };
        if !move_children {
            return Ok(());
        }

        let tilt = Rotation::new(0.0, delta.y, 0.0);
        let carried = Rotation::new(0.0, delta.y, delta.z);
        for child in self.children(id).to_vec() {
            let offset = self.entity(child)?.position - origin;
            let orbited = offset
                .rotate_2d(-previous.z)
                .rotate(tilt)
                .rotate_2d(previous.z)
                .rotate_2d(delta.z);
            self.translate(child, orbited - offset, true)?;
            self.rotate(child, carried, true)?;
        }
        Ok(())
    }
}
