//! A wired-up set of layout systems for integration tests.

use lullaby_core::{DispatchMode, Dispatcher, Entity, EntityFactory, TransformSystem};
use lullaby_math::Vec2;
use lullaby_systems::{
    DesiredSizeForwarder, LayoutBoxSystem, LayoutChangedEvent, LayoutDef, LayoutElementDef,
    LayoutSystem, RadialLayoutDef,
};
use std::cell::Cell;
use std::rc::Rc;

/// Dispatcher, transforms, factory and the layout systems, connected the way
/// an application would connect them.
pub struct LayoutWorld {
    pub dispatcher: Rc<Dispatcher>,
    pub transforms: Rc<TransformSystem>,
    pub factory: Rc<EntityFactory>,
    pub boxes: Rc<LayoutBoxSystem>,
    pub layouts: Rc<LayoutSystem>,
    pub forwarder: Rc<DesiredSizeForwarder>,
}

impl LayoutWorld {
    pub fn new(mode: DispatchMode) -> Self {
        let dispatcher = Rc::new(Dispatcher::new(mode));
        let transforms = Rc::new(TransformSystem::new(Rc::clone(&dispatcher)));
        let factory = Rc::new(EntityFactory::new(Rc::clone(&transforms)));
        let boxes = Rc::new(LayoutBoxSystem::new(
            Rc::clone(&dispatcher),
            Rc::clone(&transforms),
        ));
        let layouts = LayoutSystem::new(Rc::clone(&dispatcher), &factory, Rc::clone(&boxes));
        let forwarder = DesiredSizeForwarder::new(
            Rc::clone(&dispatcher),
            Rc::clone(&transforms),
            Rc::clone(&boxes),
        );
        factory.register_system(layouts.clone());
        factory.register_system(boxes.clone());
        factory.register_system(forwarder.clone());
        Self {
            dispatcher,
            transforms,
            factory,
            boxes,
            layouts,
            forwarder,
        }
    }

    /// Every `send` is delivered before it returns.
    pub fn immediate() -> Self {
        Self::new(DispatchMode::Immediate)
    }

    /// Events wait for [`LayoutWorld::dispatch`], like a frame loop.
    pub fn queued() -> Self {
        Self::new(DispatchMode::Queued)
    }

    pub fn dispatch(&self) {
        self.dispatcher.dispatch();
    }

    /// A 2x2 canvas holding two elements per row, capped at four.
    pub fn parent_def() -> LayoutDef {
        LayoutDef {
            canvas_size: Vec2::new(2.0, 2.0),
            shrink_to_fit: false,
            elements_per_wrap: 2,
            max_elements: 4,
            ..LayoutDef::default()
        }
    }

    pub fn create_parent(&self) -> Entity {
        self.create_layout(&Self::parent_def())
    }

    pub fn create_layout(&self, def: &LayoutDef) -> Entity {
        let entity = self.factory.create();
        self.layouts.create_from_def(entity, def);
        entity
    }

    pub fn create_radial(&self, def: &RadialLayoutDef) -> Entity {
        let entity = self.factory.create();
        self.layouts.create_radial_from_def(entity, def);
        entity
    }

    /// Adds a child to `parent`. A nonzero `weight` makes it stretch
    /// horizontally; `add_layout` gives it an empty grid layout of its own.
    pub fn create_child(&self, parent: Entity, weight: f32, add_layout: bool) -> Entity {
        let child = self.factory.create();
        if weight != 0.0 {
            self.layouts.create_element_from_def(
                child,
                &LayoutElementDef {
                    horizontal_weight: weight,
                    ..LayoutElementDef::default()
                },
            );
        }
        if add_layout {
            self.layouts.create_from_def(child, &LayoutDef::default());
        }
        self.transforms.add_child(parent, child);
        child
    }

    /// Local xy translation, zero if the entity has no transform.
    pub fn translation(&self, entity: Entity) -> Vec2 {
        self.transforms
            .local_translation(entity)
            .map(|translation| translation.xy())
            .unwrap_or(Vec2::ZERO)
    }

    /// xy extent of the entity's actual box.
    pub fn actual_size(&self, entity: Entity) -> Vec2 {
        self.boxes
            .get_actual_box(entity)
            .map(|aabb| aabb.size().xy())
            .unwrap_or(Vec2::ZERO)
    }

    /// Counts [`LayoutChangedEvent`]s sent to `entity`.
    pub fn count_layout_changes(&self, entity: Entity) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        self.dispatcher
            .connect_to(entity, move |_: &LayoutChangedEvent| sink.set(sink.get() + 1));
        count
    }
}
