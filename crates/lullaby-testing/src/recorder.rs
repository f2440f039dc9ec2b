//! Listener that tallies layout protocol events per entity.

use lullaby_core::collections::map::HashMap;
use lullaby_core::{ConnectionId, Dispatcher, Entity};
use lullaby_systems::{
    ActualBoxChangedEvent, DesiredSizeChangedEvent, LayoutChangedEvent, OriginalBoxChangedEvent,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Tally {
    layouts_changed: HashMap<Entity, usize>,
    original_boxes: HashMap<Entity, usize>,
    desired_sizes: HashMap<Entity, usize>,
    actual_boxes: HashMap<Entity, usize>,
    desired_sources: HashMap<Entity, Entity>,
    actual_sources: HashMap<Entity, Entity>,
}

/// Counts every layout event seen on a dispatcher, keyed by target, and
/// keeps the last source reported for each target.
pub struct EventRecorder {
    dispatcher: Rc<Dispatcher>,
    tally: Rc<RefCell<Tally>>,
    connections: Vec<ConnectionId>,
}

impl EventRecorder {
    pub fn connect(dispatcher: &Rc<Dispatcher>) -> Self {
        let tally = Rc::new(RefCell::new(Tally::default()));
        let mut connections = Vec::with_capacity(4);

        let sink = Rc::clone(&tally);
        connections.push(dispatcher.connect(move |event: &LayoutChangedEvent| {
            *sink.borrow_mut().layouts_changed.entry(event.target).or_default() += 1;
        }));
        let sink = Rc::clone(&tally);
        connections.push(dispatcher.connect(move |event: &OriginalBoxChangedEvent| {
            *sink.borrow_mut().original_boxes.entry(event.target).or_default() += 1;
        }));
        let sink = Rc::clone(&tally);
        connections.push(dispatcher.connect(move |event: &DesiredSizeChangedEvent| {
            let mut tally = sink.borrow_mut();
            *tally.desired_sizes.entry(event.target).or_default() += 1;
            tally.desired_sources.insert(event.target, event.source);
        }));
        let sink = Rc::clone(&tally);
        connections.push(dispatcher.connect(move |event: &ActualBoxChangedEvent| {
            let mut tally = sink.borrow_mut();
            *tally.actual_boxes.entry(event.target).or_default() += 1;
            tally.actual_sources.insert(event.target, event.source);
        }));

        Self {
            dispatcher: Rc::clone(dispatcher),
            tally,
            connections,
        }
    }

    pub fn clear(&self) {
        *self.tally.borrow_mut() = Tally::default();
    }

    /// True if no event has been counted since the last [`clear`](Self::clear).
    pub fn is_empty(&self) -> bool {
        let tally = self.tally.borrow();
        tally.layouts_changed.is_empty()
            && tally.original_boxes.is_empty()
            && tally.desired_sizes.is_empty()
            && tally.actual_boxes.is_empty()
    }

    pub fn layouts_changed(&self) -> Vec<(Entity, usize)> {
        sorted(&self.tally.borrow().layouts_changed)
    }

    pub fn original_boxes(&self) -> Vec<(Entity, usize)> {
        sorted(&self.tally.borrow().original_boxes)
    }

    pub fn desired_sizes(&self) -> Vec<(Entity, usize)> {
        sorted(&self.tally.borrow().desired_sizes)
    }

    pub fn actual_boxes(&self) -> Vec<(Entity, usize)> {
        sorted(&self.tally.borrow().actual_boxes)
    }

    pub fn desired_sources(&self) -> Vec<(Entity, Entity)> {
        sorted(&self.tally.borrow().desired_sources)
    }

    pub fn actual_sources(&self) -> Vec<(Entity, Entity)> {
        sorted(&self.tally.borrow().actual_sources)
    }
}

impl Drop for EventRecorder {
    fn drop(&mut self) {
        for id in self.connections.drain(..) {
            self.dispatcher.disconnect(id);
        }
    }
}

fn sorted<V: Copy>(map: &HashMap<Entity, V>) -> Vec<(Entity, V)> {
    let mut entries: Vec<(Entity, V)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_by_key(|(entity, _)| *entity);
    entries
}
