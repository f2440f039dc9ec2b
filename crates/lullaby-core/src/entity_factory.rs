//! Entity allocation, named blueprints and destruction.

use crate::collections::map::{HashMap, HashSet};
use crate::{Entity, TransformSystem};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Per-entity storage owner that must forget an entity when it is destroyed.
pub trait System {
    fn destroy(&self, entity: Entity);
}

/// Closure that configures a freshly created entity.
pub type Blueprint = Rc<dyn Fn(Entity)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    UnknownBlueprint(String),
    NullEntity,
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryError::UnknownBlueprint(name) => write!(f, "unknown blueprint '{}'", name),
            FactoryError::NullEntity => write!(f, "operation on the null entity"),
        }
    }
}

impl std::error::Error for FactoryError {}

pub struct EntityFactory {
    next_entity: Cell<u32>,
    transforms: Rc<TransformSystem>,
    blueprints: RefCell<HashMap<String, Blueprint>>,
    systems: RefCell<Vec<Rc<dyn System>>>,
    live: RefCell<HashSet<Entity>>,
}

impl EntityFactory {
    pub fn new(transforms: Rc<TransformSystem>) -> Self {
        Self {
            next_entity: Cell::new(1),
            transforms,
            blueprints: RefCell::new(HashMap::default()),
            systems: RefCell::new(Vec::new()),
            live: RefCell::new(HashSet::default()),
        }
    }

    pub fn transforms(&self) -> &Rc<TransformSystem> {
        &self.transforms
    }

    /// Registers a system whose `destroy` runs for every destroyed entity.
    /// Systems are destroyed in registration order, the transform last.
    pub fn register_system(&self, system: Rc<dyn System>) {
        self.systems.borrow_mut().push(system);
    }

    pub fn register_blueprint<F>(&self, name: impl Into<String>, blueprint: F)
    where
        F: Fn(Entity) + 'static,
    {
        self.blueprints
            .borrow_mut()
            .insert(name.into(), Rc::new(blueprint));
    }

    pub fn has_blueprint(&self, name: &str) -> bool {
        self.blueprints.borrow().contains_key(name)
    }

    /// Allocates a new entity with a transform.
    pub fn create(&self) -> Entity {
        let entity = self.allocate();
        self.transforms.create(entity);
        entity
    }

    /// Allocates a new entity without any components.
    pub fn allocate(&self) -> Entity {
        let entity = Entity(self.next_entity.get());
        self.next_entity.set(entity.0 + 1);
        self.live.borrow_mut().insert(entity);
        entity
    }

    pub fn create_from_blueprint(&self, name: &str) -> Result<Entity, FactoryError> {
        let blueprint = self
            .blueprints
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| FactoryError::UnknownBlueprint(name.to_string()))?;
        let entity = self.create();
        blueprint(entity);
        Ok(entity)
    }

    /// Instantiates `name` and appends it to `parent`'s children.
    pub fn create_child(&self, parent: Entity, name: &str) -> Result<Entity, FactoryError> {
        if parent.is_null() {
            return Err(FactoryError::NullEntity);
        }
        let child = self.create_from_blueprint(name)?;
        self.transforms.add_child(parent, child);
        Ok(child)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.live.borrow().contains(&entity)
    }

    /// Destroys `entity` and its descendants, parents before children.
    pub fn destroy(&self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }
        let doomed = self.transforms.subtree(entity);
        let systems = self.systems.borrow().clone();
        for target in doomed {
            if !self.live.borrow_mut().remove(&target) {
                continue;
            }
            for system in &systems {
                system.destroy(target);
            }
            self.transforms.destroy(target);
        }
    }
}
