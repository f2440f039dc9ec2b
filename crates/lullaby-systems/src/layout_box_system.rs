//! Per-entity box bookkeeping for the layout protocol.
//!
//! Three boxes are tracked per entity:
//!
//! - the **original box**, what the entity asks for before any layout
//!   shrinks it;
//! - the **desired size**, per-axis targets imposed by an ancestor layout;
//! - the **actual box**, what the entity reports after honoring the desired
//!   size.
//!
//! Boxes that were never set fall back to the entity's transform box.
//! Records are created on first write and dropped when the entity is
//! destroyed.

use crate::{ActualBoxChangedEvent, DesiredSizeChangedEvent, OriginalBoxChangedEvent};
use lullaby_core::collections::map::HashMap;
use lullaby_core::{Dispatcher, Entity, System, TransformSystem};
use lullaby_layout::DesiredSize;
use lullaby_math::Aabb;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default)]
struct BoxRecord {
    original_box: Option<Aabb>,
    desired_size: DesiredSize,
    actual_box: Option<Aabb>,
}

pub struct LayoutBoxSystem {
    dispatcher: Rc<Dispatcher>,
    transforms: Rc<TransformSystem>,
    records: RefCell<HashMap<Entity, BoxRecord>>,
}

impl LayoutBoxSystem {
    pub fn new(dispatcher: Rc<Dispatcher>, transforms: Rc<TransformSystem>) -> Self {
        Self {
            dispatcher,
            transforms,
            records: RefCell::new(HashMap::default()),
        }
    }

    fn update<F>(&self, entity: Entity, f: F)
    where
        F: FnOnce(&mut BoxRecord),
    {
        f(self.records.borrow_mut().entry(entity).or_default());
    }

    /// Stores the box an entity wants and copies it into the actual box, so
    /// clients that never take part in the resize round trip still report a
    /// sensible size.
    pub fn set_original_box(&self, entity: Entity, original_box: Aabb) {
        self.update(entity, |record| {
            record.original_box = Some(original_box);
            record.actual_box = Some(original_box);
        });
        self.dispatcher
            .send_to(entity, OriginalBoxChangedEvent { target: entity });
    }

    /// The stored original box, or the transform box if none was set.
    /// `None` only if the entity has neither.
    pub fn get_original_box(&self, entity: Entity) -> Option<Aabb> {
        let stored = self
            .records
            .borrow()
            .get(&entity)
            .and_then(|record| record.original_box);
        stored.or_else(|| self.transforms.aabb(entity))
    }

    /// Imposes per-axis target sizes on `entity` and notifies before
    /// returning.
    pub fn set_desired_size(&self, entity: Entity, source: Entity, desired: DesiredSize) {
        self.update(entity, |record| record.desired_size = desired);
        self.dispatcher.send_to_immediately(
            entity,
            DesiredSizeChangedEvent {
                target: entity,
                source,
                x: desired.x,
                y: desired.y,
                z: desired.z,
            },
        );
    }

    pub fn get_desired_size(&self, entity: Entity) -> DesiredSize {
        self.records
            .borrow()
            .get(&entity)
            .map(|record| record.desired_size)
            .unwrap_or_default()
    }

    pub fn get_desired_size_x(&self, entity: Entity) -> Option<f32> {
        self.get_desired_size(entity).x
    }

    pub fn get_desired_size_y(&self, entity: Entity) -> Option<f32> {
        self.get_desired_size(entity).y
    }

    pub fn get_desired_size_z(&self, entity: Entity) -> Option<f32> {
        self.get_desired_size(entity).z
    }

    /// Stores the box a client settled on after a resize. `source` is passed
    /// along so the parent layout knows where the change started.
    pub fn set_actual_box(&self, entity: Entity, source: Entity, actual_box: Aabb) {
        self.update(entity, |record| record.actual_box = Some(actual_box));
        self.dispatcher.send_to(
            entity,
            ActualBoxChangedEvent {
                target: entity,
                source,
            },
        );
    }

    /// The stored actual box, or the transform box if none was set.
    pub fn get_actual_box(&self, entity: Entity) -> Option<Aabb> {
        let stored = self
            .records
            .borrow()
            .get(&entity)
            .and_then(|record| record.actual_box);
        stored.or_else(|| self.transforms.aabb(entity))
    }

    pub fn has_record(&self, entity: Entity) -> bool {
        self.records.borrow().contains_key(&entity)
    }
}

impl System for LayoutBoxSystem {
    fn destroy(&self, entity: Entity) {
        self.records.borrow_mut().remove(&entity);
    }
}

#[cfg(test)]
#[path = "tests/layout_box_system_tests.rs"]
mod tests;
