//! Passes desired sizes from a container entity down to its children.
//!
//! Useful for decorations such as backdrops that wrap a nested layout: the
//! container is sized by its own parent and its children should follow.

use crate::{DesiredSizeChangedEvent, LayoutBoxSystem};
use lullaby_core::collections::map::HashSet;
use lullaby_core::{ConnectionId, Dispatcher, Entity, System, TransformSystem};
use lullaby_layout::DesiredSize;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

pub struct DesiredSizeForwarder {
    dispatcher: Rc<Dispatcher>,
    transforms: Rc<TransformSystem>,
    boxes: Rc<LayoutBoxSystem>,
    managed: RefCell<HashSet<Entity>>,
    connection: Cell<Option<ConnectionId>>,
}

impl DesiredSizeForwarder {
    pub fn new(
        dispatcher: Rc<Dispatcher>,
        transforms: Rc<TransformSystem>,
        boxes: Rc<LayoutBoxSystem>,
    ) -> Rc<Self> {
        let forwarder = Rc::new(Self {
            dispatcher,
            transforms,
            boxes,
            managed: RefCell::new(HashSet::default()),
            connection: Cell::new(None),
        });
        let weak: Weak<Self> = Rc::downgrade(&forwarder);
        let id = forwarder
            .dispatcher
            .connect(move |event: &DesiredSizeChangedEvent| {
                if let Some(forwarder) = weak.upgrade() {
                    forwarder.forward(event);
                }
            });
        forwarder.connection.set(Some(id));
        forwarder
    }

    /// Starts forwarding desired sizes received by `entity`.
    pub fn create(&self, entity: Entity) {
        self.managed.borrow_mut().insert(entity);
    }

    pub fn is_managed(&self, entity: Entity) -> bool {
        self.managed.borrow().contains(&entity)
    }

    fn forward(&self, event: &DesiredSizeChangedEvent) {
        if !self.is_managed(event.target) {
            return;
        }
        let Some(children) = self.transforms.children(event.target) else {
            return;
        };
        let desired = DesiredSize::new(event.x, event.y, event.z);
        log::trace!(
            "forwarding desired size of {} to {} children",
            event.target,
            children.len()
        );
        for child in children {
            self.boxes.set_desired_size(child, event.source, desired);
        }
    }
}

impl System for DesiredSizeForwarder {
    fn destroy(&self, entity: Entity) {
        self.managed.borrow_mut().remove(&entity);
    }
}

impl Drop for DesiredSizeForwarder {
    fn drop(&mut self) {
        if let Some(id) = self.connection.take() {
            self.dispatcher.disconnect(id);
        }
    }
}
