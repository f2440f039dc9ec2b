//! Minimal scene graph: parent/child links, local transforms, bounding
//! boxes and enabled state.

use crate::collections::map::HashMap;
use crate::dfatal;
use crate::events::{AabbChangedEvent, ParentChangedEvent};
use crate::{Dispatcher, Entity, System};
use lullaby_math::{Aabb, Sqt, Vec3};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

pub type ChildList = SmallVec<[Entity; 8]>;

#[derive(Clone, Debug, Default)]
struct TransformNode {
    parent: Entity,
    children: ChildList,
    sqt: Sqt,
    aabb: Aabb,
    enabled_self: bool,
}

pub struct TransformSystem {
    dispatcher: Rc<Dispatcher>,
    nodes: RefCell<HashMap<Entity, TransformNode>>,
}

impl TransformSystem {
    pub fn new(dispatcher: Rc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            nodes: RefCell::new(HashMap::default()),
        }
    }

    /// Gives `entity` a transform. Existing transforms are left untouched.
    pub fn create(&self, entity: Entity) {
        if entity.is_null() {
            return;
        }
        self.nodes
            .borrow_mut()
            .entry(entity)
            .or_insert_with(|| TransformNode {
                enabled_self: true,
                ..TransformNode::default()
            });
    }

    pub fn has_transform(&self, entity: Entity) -> bool {
        self.nodes.borrow().contains_key(&entity)
    }

    /// Attaches `child` under `parent`, appending it to the parent's
    /// children. A null `parent` detaches the child.
    pub fn add_child(&self, parent: Entity, child: Entity) {
        let old_parent = {
            let mut nodes = self.nodes.borrow_mut();
            if !parent.is_null() && !nodes.contains_key(&parent) {
                dfatal!("Invalid parent {:?}: it has no transform", parent);
                return;
            }
            let Some(node) = nodes.get_mut(&child) else {
                dfatal!("Invalid child {:?}: it has no transform", child);
                return;
            };
            let old_parent = node.parent;
            if old_parent == parent {
                return;
            }
            node.parent = parent;
            if let Some(old) = nodes.get_mut(&old_parent) {
                old.children.retain(|c| *c != child);
            }
            if let Some(new) = nodes.get_mut(&parent) {
                new.children.push(child);
            }
            old_parent
        };
        self.dispatcher.send_to(
            child,
            ParentChangedEvent {
                target: child,
                old_parent,
                new_parent: parent,
            },
        );
    }

    pub fn parent(&self, entity: Entity) -> Entity {
        self.nodes
            .borrow()
            .get(&entity)
            .map(|node| node.parent)
            .unwrap_or(Entity::NULL)
    }

    /// Ordered children, or `None` if the entity has no transform.
    pub fn children(&self, entity: Entity) -> Option<ChildList> {
        self.nodes
            .borrow()
            .get(&entity)
            .map(|node| node.children.clone())
    }

    /// `entity` followed by all of its descendants, depth first.
    pub fn subtree(&self, entity: Entity) -> Vec<Entity> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack = vec![entity];
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = nodes.get(&next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn sqt(&self, entity: Entity) -> Option<Sqt> {
        self.nodes.borrow().get(&entity).map(|node| node.sqt)
    }

    pub fn set_sqt(&self, entity: Entity, sqt: Sqt) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(&entity) {
            node.sqt = sqt;
        }
    }

    pub fn local_translation(&self, entity: Entity) -> Option<Vec3> {
        self.sqt(entity).map(|sqt| sqt.translation)
    }

    pub fn set_local_translation(&self, entity: Entity, translation: Vec3) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(&entity) {
            node.sqt.translation = translation;
        }
    }

    pub fn aabb(&self, entity: Entity) -> Option<Aabb> {
        self.nodes.borrow().get(&entity).map(|node| node.aabb)
    }

    /// Stores the box and always notifies, even if the value is unchanged.
    pub fn set_aabb(&self, entity: Entity, aabb: Aabb) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(&entity) {
            node.aabb = aabb;
        }
        self.dispatcher
            .send_to(entity, AabbChangedEvent { target: entity });
    }

    pub fn enable(&self, entity: Entity) {
        self.set_enabled(entity, true);
    }

    pub fn disable(&self, entity: Entity) {
        self.set_enabled(entity, false);
    }

    fn set_enabled(&self, entity: Entity, enabled: bool) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(&entity) {
            node.enabled_self = enabled;
        }
    }

    /// True unless the entity or one of its ancestors is disabled. Entities
    /// without a transform count as enabled.
    pub fn is_enabled(&self, entity: Entity) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = entity;
        while let Some(node) = nodes.get(&current) {
            if !node.enabled_self {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Maps a world-space point into `entity`'s local space.
    pub fn world_to_local(&self, entity: Entity, world_position: Vec3) -> Option<Vec3> {
        let nodes = self.nodes.borrow();
        let mut chain: SmallVec<[Sqt; 8]> = SmallVec::new();
        let mut current = entity;
        while let Some(node) = nodes.get(&current) {
            chain.push(node.sqt);
            current = node.parent;
        }
        if chain.is_empty() {
            return None;
        }
        Some(
            chain
                .iter()
                .rev()
                .fold(world_position, |point, sqt| sqt.inverse_transform_point(point)),
        )
    }

    /// Maps a point in `entity`'s local space into world space.
    pub fn local_to_world(&self, entity: Entity, local_position: Vec3) -> Option<Vec3> {
        let nodes = self.nodes.borrow();
        if !nodes.contains_key(&entity) {
            return None;
        }
        let mut point = local_position;
        let mut current = entity;
        while let Some(node) = nodes.get(&current) {
            point = node.sqt.transform_point(point);
            current = node.parent;
        }
        Some(point)
    }
}

impl System for TransformSystem {
    fn destroy(&self, entity: Entity) {
        let old_parent = {
            let mut nodes = self.nodes.borrow_mut();
            let Some(node) = nodes.remove(&entity) else {
                return;
            };
            if let Some(parent) = nodes.get_mut(&node.parent) {
                parent.children.retain(|c| *c != entity);
            }
            node.parent
        };
        if !old_parent.is_null() {
            self.dispatcher.send_to(
                entity,
                ParentChangedEvent {
                    target: entity,
                    old_parent,
                    new_parent: Entity::NULL,
                },
            );
        }
    }
}

#[cfg(test)]
#[path = "tests/transform_system_tests.rs"]
mod tests;
