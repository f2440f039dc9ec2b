//! Typed event dispatcher with immediate and queued delivery.
//!
//! Handlers are registered per event type, either globally or against a
//! single [`Entity`]. Events sent globally reach only global handlers;
//! events sent to an entity reach the global handlers and that entity's
//! handlers.
//!
//! In [`DispatchMode::Queued`] mode, [`Dispatcher::send`] appends to a work
//! list that [`Dispatcher::dispatch`] drains once per frame. The drain keeps
//! going until the list is empty, so events queued by handlers during the
//! drain are delivered in the same call. [`Dispatcher::send_immediately`]
//! always calls through.
//!
//! Handler lists are cloned out before invocation, so a handler may connect,
//! disconnect, send, or re-enter the dispatcher freely.

use crate::collections::map::HashMap;
use crate::Entity;
use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Delivery behavior for [`Dispatcher::send`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// `send` calls every handler before returning.
    #[default]
    Immediate,
    /// `send` queues the event until the next [`Dispatcher::dispatch`].
    Queued,
}

/// Identifies one connected handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

type ErasedHandler = Rc<dyn Fn(&dyn Any)>;

#[derive(Clone)]
struct HandlerEntry {
    id: ConnectionId,
    target: Option<Entity>,
    handler: ErasedHandler,
}

struct QueuedEvent {
    type_id: TypeId,
    target: Option<Entity>,
    payload: Box<dyn Any>,
}

pub struct Dispatcher {
    mode: DispatchMode,
    next_connection: Cell<u64>,
    handlers: RefCell<HashMap<TypeId, SmallVec<[HandlerEntry; 4]>>>,
    queue: RefCell<VecDeque<QueuedEvent>>,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            next_connection: Cell::new(1),
            handlers: RefCell::new(HashMap::default()),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Connects a handler that observes every event of type `E`.
    pub fn connect<E, F>(&self, handler: F) -> ConnectionId
    where
        E: Any,
        F: Fn(&E) + 'static,
    {
        self.connect_impl::<E, F>(None, handler)
    }

    /// Connects a handler that observes events of type `E` sent to `entity`.
    pub fn connect_to<E, F>(&self, entity: Entity, handler: F) -> ConnectionId
    where
        E: Any,
        F: Fn(&E) + 'static,
    {
        self.connect_impl::<E, F>(Some(entity), handler)
    }

    fn connect_impl<E, F>(&self, target: Option<Entity>, handler: F) -> ConnectionId
    where
        E: Any,
        F: Fn(&E) + 'static,
    {
        let id = ConnectionId(self.next_connection.get());
        self.next_connection.set(id.0 + 1);
        let erased: ErasedHandler = Rc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.handlers
            .borrow_mut()
            .entry(TypeId::of::<E>())
            .or_default()
            .push(HandlerEntry {
                id,
                target,
                handler: erased,
            });
        id
    }

    /// Removes a handler. Returns false if it was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let mut removed = false;
        for entries in handlers.values_mut() {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            removed |= entries.len() != before;
        }
        removed
    }

    /// Drops every handler registered against `entity`.
    pub fn disconnect_entity(&self, entity: Entity) {
        let mut handlers = self.handlers.borrow_mut();
        for entries in handlers.values_mut() {
            entries.retain(|entry| entry.target != Some(entity));
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().values().map(|entries| entries.len()).sum()
    }

    /// Sends a global event, queued or immediate depending on the mode.
    pub fn send<E: Any>(&self, event: E) {
        self.send_impl(None, event);
    }

    /// Sends an event to the global handlers and to `entity`'s handlers,
    /// queued or immediate depending on the mode.
    pub fn send_to<E: Any>(&self, entity: Entity, event: E) {
        self.send_impl(Some(entity), event);
    }

    /// Sends a global event to all handlers before returning.
    pub fn send_immediately<E: Any>(&self, event: E) {
        self.deliver(TypeId::of::<E>(), None, &event);
    }

    /// Immediate counterpart of [`Dispatcher::send_to`].
    pub fn send_to_immediately<E: Any>(&self, entity: Entity, event: E) {
        self.deliver(TypeId::of::<E>(), Some(entity), &event);
    }

    fn send_impl<E: Any>(&self, target: Option<Entity>, event: E) {
        match self.mode {
            DispatchMode::Immediate => self.deliver(TypeId::of::<E>(), target, &event),
            DispatchMode::Queued => self.queue.borrow_mut().push_back(QueuedEvent {
                type_id: TypeId::of::<E>(),
                target,
                payload: Box::new(event),
            }),
        }
    }

    /// Number of events waiting for [`Dispatcher::dispatch`].
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Delivers queued events until the queue is empty.
    pub fn dispatch(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.deliver(event.type_id, event.target, event.payload.as_ref());
        }
    }

    fn deliver(&self, type_id: TypeId, target: Option<Entity>, event: &dyn Any) {
        let entries: SmallVec<[HandlerEntry; 4]> = match self.handlers.borrow().get(&type_id) {
            Some(entries) => entries
                .iter()
                .filter(|entry| entry.target.is_none() || entry.target == target)
                .cloned()
                .collect(),
            None => return,
        };
        for entry in entries {
            (entry.handler)(event);
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchMode::default())
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
