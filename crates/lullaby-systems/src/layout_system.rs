//! Layout components and the dirty-layout scheduler.
//!
//! A layout entity is recomputed when something it depends on changes. Each
//! trigger is classified into a [`LayoutPass`]:
//!
//! - [`LayoutPass::Original`]: params changed, a child was added or removed,
//!   or a child's original box changed. The layout uses its own canvas size,
//!   pushes desired sizes to weighted children and publishes its result as
//!   its original box.
//! - [`LayoutPass::Desired`]: an ancestor imposed a desired size on this
//!   layout. The canvas is overridden by that size, children get new desired
//!   sizes, and the result is published as the actual box.
//! - [`LayoutPass::Actual`]: a child reported a new actual box. Same canvas
//!   rule as `Desired`, but children keep the desired sizes they have, which
//!   stops resize ping-pong.
//!
//! Triggers are merged per entity into a [`DirtyLayout`] and drained once
//! per frame from a queued [`LayoutDirtyEvent`]. The pending map is swapped
//! out before it is drained: layouts dirtied while draining wait for the
//! next drain.

use crate::{
    ActualBoxChangedEvent, DesiredSizeChangedEvent, LayoutBoxSystem, LayoutChangedEvent,
    LayoutDef, LayoutElementDef, OriginalBoxChangedEvent, RadialLayoutDef,
};
use lullaby_core::collections::map::HashMap;
use lullaby_core::collections::ordered::{Entry, IndexMap};
use lullaby_core::{
    dfatal, AabbChangedEvent, ChildList, ConnectionId, Dispatcher, Entity, EntityFactory,
    ParentChangedEvent, System, TransformSystem,
};
use lullaby_layout::{
    apply_layout, apply_radial_layout, try_calculate_insert_index_for_position, CachedPositions,
    DesiredSize, FillOrder, HorizontalAlignment, LayoutElement, LayoutError, LayoutHost,
    LayoutParams, RadialLayoutParams, VerticalAlignment,
};
use lullaby_math::{Aabb, Vec2, Vec3};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use web_time::Duration;

/// Why a layout is being recomputed. Later variants win when merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayoutPass {
    Actual,
    Desired,
    Original,
}

/// Pending recomputation of one layout entity.
///
/// Tracks the entity whose desired size started the change (handed on to
/// the children) and the entity whose actual box did (handed on with this
/// layout's own actual box).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyLayout {
    layout: Entity,
    pass: LayoutPass,
    desired_source: Entity,
    actual_source: Entity,
}

impl DirtyLayout {
    pub fn new(layout: Entity, pass: LayoutPass, source: Entity) -> Self {
        let (desired_source, actual_source) = match pass {
            LayoutPass::Original => (Entity::NULL, Entity::NULL),
            LayoutPass::Desired => (source, source),
            LayoutPass::Actual => (Entity::NULL, source),
        };
        Self {
            layout,
            pass,
            desired_source,
            actual_source,
        }
    }

    pub fn layout(&self) -> Entity {
        self.layout
    }

    pub fn pass(&self) -> LayoutPass {
        self.pass
    }

    pub fn desired_source(&self) -> Entity {
        self.desired_source
    }

    pub fn actual_source(&self) -> Entity {
        self.actual_source
    }

    /// Merges another trigger into this one.
    pub fn update(&mut self, transforms: &TransformSystem, pass: LayoutPass, source: Entity) {
        self.pass = self.pass.max(pass);
        match pass {
            LayoutPass::Original => {}
            LayoutPass::Desired => {
                self.desired_source = self.closest_source(transforms, self.desired_source, source);
                self.actual_source = self.closest_source(transforms, self.actual_source, source);
            }
            LayoutPass::Actual => {
                self.actual_source = self.closest_source(transforms, self.actual_source, source);
            }
        }
    }

    /// Whichever source comes first walking up from the layout. If neither
    /// is an ancestor the old one is kept.
    fn closest_source(&self, transforms: &TransformSystem, old: Entity, new: Entity) -> Entity {
        if old.is_null() {
            return new;
        }
        if new.is_null() {
            return old;
        }
        let mut entity = self.layout;
        while !entity.is_null() {
            if entity == old || entity == new {
                return entity;
            }
            entity = transforms.parent(entity);
        }
        old
    }

    /// True unless the layout is computed from scratch.
    pub fn should_use_desired_size(&self) -> bool {
        self.pass != LayoutPass::Original
    }

    /// A layout that started the change closes the loop by updating its
    /// original box instead.
    pub fn should_set_actual_box(&self) -> bool {
        self.should_use_desired_size() && self.actual_source != self.layout
    }

    /// Source handed to children's desired sizes. Null skips resizing them.
    pub fn childrens_desired_source(&self) -> Entity {
        match self.pass {
            LayoutPass::Original => self.layout,
            LayoutPass::Desired => self.desired_source,
            LayoutPass::Actual => Entity::NULL,
        }
    }
}

/// Moves an entity over time instead of snapping it.
pub trait PositionAnimator {
    fn animate_position(&self, entity: Entity, target: Vec3, duration: Duration);
}

/// Drains the pending dirty layouts.
#[derive(Clone, Copy, Debug, Default)]
struct LayoutDirtyEvent;

#[derive(Clone, Debug, Default)]
struct LayoutComponent {
    params: Option<LayoutParams>,
    radial: Option<RadialLayoutParams>,
    max_elements: usize,
    empty_blueprint: Option<String>,
    empty_placeholders: VecDeque<Entity>,
    cached_positions: CachedPositions,
}

#[derive(Clone, Copy, Debug)]
struct ElementRecord {
    element: LayoutElement,
    /// Not placed yet; the first placement never animates.
    first: bool,
}

impl ElementRecord {
    fn new(element: LayoutElement) -> Self {
        Self {
            element,
            first: true,
        }
    }
}

pub struct LayoutSystem {
    dispatcher: Rc<Dispatcher>,
    transforms: Rc<TransformSystem>,
    boxes: Rc<LayoutBoxSystem>,
    factory: Weak<EntityFactory>,
    layouts: RefCell<HashMap<Entity, LayoutComponent>>,
    elements: RefCell<HashMap<Entity, ElementRecord>>,
    dirty_layouts: RefCell<IndexMap<Entity, DirtyLayout>>,
    animator: RefCell<Option<Rc<dyn PositionAnimator>>>,
    connections: RefCell<SmallVec<[ConnectionId; 8]>>,
}

impl LayoutSystem {
    /// Creates the system and connects it to the dispatcher.
    ///
    /// The factory is used for placeholders; register the returned system
    /// with it so that destroyed entities lose their layout data.
    pub fn new(
        dispatcher: Rc<Dispatcher>,
        factory: &Rc<EntityFactory>,
        boxes: Rc<LayoutBoxSystem>,
    ) -> Rc<Self> {
        let system = Rc::new(Self {
            dispatcher,
            transforms: Rc::clone(factory.transforms()),
            boxes,
            factory: Rc::downgrade(factory),
            layouts: RefCell::new(HashMap::default()),
            elements: RefCell::new(HashMap::default()),
            dirty_layouts: RefCell::new(IndexMap::default()),
            animator: RefCell::new(None),
            connections: RefCell::new(SmallVec::new()),
        });
        system.connect_handlers();
        system
    }

    fn connect_handlers(self: &Rc<Self>) {
        let ids = [
            self.connect(|system, event: &ParentChangedEvent| system.on_parent_changed(event)),
            self.connect(|system, event: &OriginalBoxChangedEvent| {
                // A resized child moves its siblings.
                system.set_parent_dirty(event.target, LayoutPass::Original, Entity::NULL)
            }),
            self.connect(|system, event: &DesiredSizeChangedEvent| {
                if system.has_layout(event.target) {
                    system.set_dirty(event.target, LayoutPass::Desired, event.source);
                }
            }),
            self.connect(|system, event: &AabbChangedEvent| {
                system.set_parent_dirty(event.target, LayoutPass::Actual, Entity::NULL)
            }),
            self.connect(|system, event: &ActualBoxChangedEvent| {
                system.set_parent_dirty(event.target, LayoutPass::Actual, event.source)
            }),
            // Sent once per clean-to-dirty transition, so everything dirtied
            // in one frame is laid out once.
            self.connect(|system, _: &LayoutDirtyEvent| system.process_dirty()),
        ];
        self.connections.borrow_mut().extend(ids);
    }

    fn connect<E, F>(self: &Rc<Self>, handler: F) -> ConnectionId
    where
        E: Any,
        F: Fn(&LayoutSystem, &E) + 'static,
    {
        let weak = Rc::downgrade(self);
        self.dispatcher.connect(move |event: &E| {
            if let Some(system) = weak.upgrade() {
                handler(&system, event);
            }
        })
    }

    /// Attaches a grid layout. Does not schedule a layout.
    pub fn create(&self, entity: Entity, params: LayoutParams) {
        self.layouts.borrow_mut().entry(entity).or_default().params = Some(params);
    }

    pub fn create_from_def(&self, entity: Entity, def: &LayoutDef) {
        let has_blueprint = {
            let mut layouts = self.layouts.borrow_mut();
            let layout = layouts.entry(entity).or_default();
            layout.empty_blueprint = def.empty_blueprint.clone();
            layout.max_elements = def.max_elements;
            layout.params = Some(def.params());
            layout.empty_blueprint.is_some()
        };
        if has_blueprint {
            self.set_dirty(entity, LayoutPass::Original, Entity::NULL);
        }
    }

    pub fn create_radial_from_def(&self, entity: Entity, def: &RadialLayoutDef) {
        let has_blueprint = {
            let mut layouts = self.layouts.borrow_mut();
            let layout = layouts.entry(entity).or_default();
            layout.empty_blueprint = def.empty_blueprint.clone();
            layout.max_elements = def.max_elements;
            layout.radial = Some(def.params());
            layout.empty_blueprint.is_some()
        };
        if has_blueprint {
            self.set_dirty(entity, LayoutPass::Original, Entity::NULL);
        }
    }

    pub fn create_element_from_def(&self, entity: Entity, def: &LayoutElementDef) {
        let element = LayoutElement {
            duration: def.duration(),
            ..LayoutElement::new(entity).with_weights(def.horizontal_weight, def.vertical_weight)
        };
        self.elements
            .borrow_mut()
            .insert(entity, ElementRecord::new(element));
    }

    pub fn has_layout(&self, entity: Entity) -> bool {
        self.layouts.borrow().contains_key(&entity)
    }

    pub fn layout_params(&self, entity: Entity) -> Option<LayoutParams> {
        self.layouts
            .borrow()
            .get(&entity)
            .and_then(|layout| layout.params.clone())
    }

    pub fn radial_layout_params(&self, entity: Entity) -> Option<RadialLayoutParams> {
        self.layouts
            .borrow()
            .get(&entity)
            .and_then(|layout| layout.radial.clone())
    }

    pub fn cached_positions(&self, entity: Entity) -> Option<CachedPositions> {
        self.layouts
            .borrow()
            .get(&entity)
            .map(|layout| layout.cached_positions.clone())
    }

    pub fn max_elements(&self, entity: Entity) -> Option<usize> {
        self.layouts
            .borrow()
            .get(&entity)
            .map(|layout| layout.max_elements)
    }

    /// Layout participation of `entity`, recording the defaults on first use.
    pub fn layout_element(&self, entity: Entity) -> LayoutElement {
        self.elements
            .borrow_mut()
            .entry(entity)
            .or_insert_with(|| ElementRecord::new(LayoutElement::new(entity)))
            .element
    }

    /// Replaces the grid params, turning radial layouts into grids.
    pub fn set_layout_params(&self, entity: Entity, params: LayoutParams) {
        let updated = match self.layouts.borrow_mut().get_mut(&entity) {
            Some(layout) => {
                layout.params = Some(params);
                true
            }
            None => false,
        };
        if updated {
            self.set_dirty(entity, LayoutPass::Original, Entity::NULL);
        }
    }

    fn update_params<F>(&self, entity: Entity, f: F)
    where
        F: FnOnce(&mut LayoutParams),
    {
        let updated = match self
            .layouts
            .borrow_mut()
            .get_mut(&entity)
            .and_then(|layout| layout.params.as_mut())
        {
            Some(params) => {
                f(params);
                true
            }
            None => false,
        };
        if updated {
            self.set_dirty(entity, LayoutPass::Original, Entity::NULL);
        }
    }

    pub fn set_canvas_size_x(&self, entity: Entity, x: f32) {
        self.update_params(entity, |params| params.canvas_size.x = x);
    }

    pub fn set_canvas_size_y(&self, entity: Entity, y: f32) {
        self.update_params(entity, |params| params.canvas_size.y = y);
    }

    pub fn set_spacing_x(&self, entity: Entity, x: f32) {
        self.update_params(entity, |params| params.spacing.x = x);
    }

    pub fn set_spacing_y(&self, entity: Entity, y: f32) {
        self.update_params(entity, |params| params.spacing.y = y);
    }

    pub fn set_fill_order(&self, entity: Entity, fill_order: FillOrder) {
        self.update_params(entity, |params| params.fill_order = fill_order);
    }

    pub fn set_horizontal_alignment(&self, entity: Entity, alignment: HorizontalAlignment) {
        self.update_params(entity, |params| params.horizontal_alignment = alignment);
    }

    pub fn set_vertical_alignment(&self, entity: Entity, alignment: VerticalAlignment) {
        self.update_params(entity, |params| params.vertical_alignment = alignment);
    }

    pub fn set_row_alignment(&self, entity: Entity, alignment: VerticalAlignment) {
        self.update_params(entity, |params| params.row_alignment = alignment);
    }

    pub fn set_column_alignment(&self, entity: Entity, alignment: HorizontalAlignment) {
        self.update_params(entity, |params| params.column_alignment = alignment);
    }

    pub fn set_elements_per_wrap(&self, entity: Entity, elements_per_wrap: usize) {
        self.update_params(entity, |params| params.elements_per_wrap = elements_per_wrap);
    }

    /// Works for grid and radial layouts alike.
    pub fn set_max_elements(&self, entity: Entity, max_elements: usize) {
        let updated = match self.layouts.borrow_mut().get_mut(&entity) {
            Some(layout) => {
                layout.max_elements = max_elements;
                true
            }
            None => false,
        };
        if updated {
            self.set_dirty(entity, LayoutPass::Original, Entity::NULL);
        }
    }

    /// Length of the tween used when `element` is moved by its layout.
    pub fn set_duration(&self, element: Entity, duration: Duration) {
        self.elements
            .borrow_mut()
            .entry(element)
            .or_insert_with(|| ElementRecord::new(LayoutElement::new(element)))
            .element
            .duration = duration;
    }

    pub fn set_position_animator(&self, animator: Rc<dyn PositionAnimator>) {
        *self.animator.borrow_mut() = Some(animator);
    }

    /// Lays out `entity` right away, bypassing the dirty queue.
    pub fn layout(&self, entity: Entity) {
        self.run(DirtyLayout::new(entity, LayoutPass::Original, Entity::NULL));
    }

    /// Index at which an element dropped at `world_position` would be
    /// inserted among `entity`'s children. Returns 0 on misuse.
    pub fn get_insert_index_for_position(&self, entity: Entity, world_position: Vec3) -> usize {
        match self.try_get_insert_index_for_position(entity, world_position) {
            Ok(index) => index,
            Err(err) => {
                dfatal!("{}", err);
                0
            }
        }
    }

    pub fn try_get_insert_index_for_position(
        &self,
        entity: Entity,
        world_position: Vec3,
    ) -> Result<usize, LayoutError> {
        let cached = self
            .layouts
            .borrow()
            .get(&entity)
            .filter(|layout| layout.params.is_some())
            .map(|layout| layout.cached_positions.clone())
            .ok_or(LayoutError::MissingParams { entity })?;
        let local_position = self
            .transforms
            .world_to_local(entity, world_position)
            .ok_or(LayoutError::MissingTransform { entity })?;
        try_calculate_insert_index_for_position(&cached, local_position)
    }

    /// Number of layouts waiting for the next drain.
    pub fn pending_dirty(&self) -> usize {
        self.dirty_layouts.borrow().len()
    }

    pub fn dirty_layout(&self, entity: Entity) -> Option<DirtyLayout> {
        self.dirty_layouts.borrow().get(&entity).copied()
    }

    fn set_dirty(&self, entity: Entity, pass: LayoutPass, source: Entity) {
        let was_clean = {
            let mut dirty_layouts = self.dirty_layouts.borrow_mut();
            let was_clean = dirty_layouts.is_empty();
            match dirty_layouts.entry(entity) {
                Entry::Occupied(mut entry) => {
                    entry.get_mut().update(&self.transforms, pass, source);
                }
                Entry::Vacant(entry) => {
                    entry.insert(DirtyLayout::new(entity, pass, source));
                }
            }
            was_clean
        };
        log::trace!("layout {} dirty ({:?}, source {})", entity, pass, source);
        // Recorded before sending, since an immediate dispatcher drains here.
        if was_clean {
            self.dispatcher.send(LayoutDirtyEvent);
        }
    }

    fn set_parent_dirty(&self, entity: Entity, pass: LayoutPass, source: Entity) {
        let parent = self.transforms.parent(entity);
        if self.has_layout(parent) {
            self.set_dirty(parent, pass, source);
        }
    }

    fn on_parent_changed(&self, event: &ParentChangedEvent) {
        if self.has_layout(event.new_parent) {
            self.set_dirty(event.new_parent, LayoutPass::Original, Entity::NULL);
        }
        if self.has_layout(event.old_parent) {
            self.set_dirty(event.old_parent, LayoutPass::Original, Entity::NULL);
        }
    }

    fn process_dirty(&self) {
        let dirty_layouts = std::mem::take(&mut *self.dirty_layouts.borrow_mut());
        log::debug!("processing {} dirty layouts", dirty_layouts.len());
        for dirty in dirty_layouts.into_values() {
            self.run(dirty);
        }
    }

    fn run(&self, dirty: DirtyLayout) {
        if let Err(err) = self.layout_impl(&dirty) {
            dfatal!("Cannot lay out {}: {}", dirty.layout, err);
        }
    }

    fn layout_impl(&self, dirty: &DirtyLayout) -> Result<(), LayoutError> {
        let entity = dirty.layout;
        if !self.has_layout(entity) {
            return Ok(());
        }
        let Some(children) = self.transforms.children(entity) else {
            return Ok(());
        };
        let Some(children) = self.fill_placeholders(entity, children) else {
            return Ok(());
        };

        let (params, radial) = match self.layouts.borrow().get(&entity) {
            Some(layout) => (layout.params.clone(), layout.radial.clone()),
            None => return Ok(()),
        };
        if let Some(mut params) = params {
            let elements: Vec<LayoutElement> = children
                .iter()
                .map(|child| self.layout_element(*child))
                .collect();
            if dirty.should_use_desired_size() {
                let desired = self.boxes.get_desired_size(entity);
                if let Some(x) = desired.x {
                    params.canvas_size.x = x;
                }
                if let Some(y) = desired.y {
                    params.canvas_size.y = y;
                }
            }

            // Taken out for the duration of the call: clients may re-enter
            // and lay this entity out again.
            let mut cached_positions = self
                .layouts
                .borrow_mut()
                .get_mut(&entity)
                .map(|layout| std::mem::take(&mut layout.cached_positions))
                .unwrap_or_default();
            let aabb = apply_layout(
                &SystemLayoutHost { system: self },
                &params,
                &elements,
                dirty.childrens_desired_source(),
                Some(&mut cached_positions),
            );
            if let Some(layout) = self.layouts.borrow_mut().get_mut(&entity) {
                layout.cached_positions = cached_positions;
            }

            self.transforms.set_aabb(entity, aabb);
            if dirty.should_set_actual_box() {
                self.boxes.set_actual_box(entity, dirty.actual_source, aabb);
            } else {
                self.boxes.set_original_box(entity, aabb);
            }
        } else if let Some(radial) = radial {
            apply_radial_layout(&*self.transforms, &children, &radial);
        } else {
            return Err(LayoutError::MissingParams { entity });
        }

        self.dispatcher
            .send_to(entity, LayoutChangedEvent { target: entity });
        Ok(())
    }

    /// Creates or destroys placeholder children until the child count
    /// matches `max_elements`. Returns the resulting children, or `None` if
    /// the layout lost its transform meanwhile.
    fn fill_placeholders(&self, entity: Entity, mut children: ChildList) -> Option<ChildList> {
        let (blueprint, max_elements) = {
            let layouts = self.layouts.borrow();
            let layout = layouts.get(&entity)?;
            (layout.empty_blueprint.clone(), layout.max_elements)
        };

        if let (Some(blueprint), Some(factory)) = (blueprint, self.factory.upgrade()) {
            while children.len() < max_elements {
                match factory.create_child(entity, &blueprint) {
                    Ok(placeholder) => {
                        if let Some(layout) = self.layouts.borrow_mut().get_mut(&entity) {
                            layout.empty_placeholders.push_back(placeholder);
                        }
                    }
                    Err(err) => {
                        log::warn!("could not create placeholders for layout {}: {}", entity, err);
                        break;
                    }
                }
                children = self.transforms.children(entity)?;
            }
        }

        while children.len() > max_elements {
            let placeholder = self
                .layouts
                .borrow_mut()
                .get_mut(&entity)
                .and_then(|layout| layout.empty_placeholders.pop_front());
            let Some(placeholder) = placeholder else {
                break;
            };
            if let Some(factory) = self.factory.upgrade() {
                factory.destroy(placeholder);
            }
            children = self.transforms.children(entity)?;
        }

        if max_elements > 0 && children.len() > max_elements {
            log::warn!("layout {} has more children than max_elements", entity);
        }
        Some(children)
    }

    fn set_layout_position(&self, entity: Entity, position: Vec2) {
        let z = self
            .transforms
            .local_translation(entity)
            .map_or(0.0, |translation| translation.z);
        let translation = position.extend(z);

        let (duration, first) = {
            let mut elements = self.elements.borrow_mut();
            let record = elements
                .entry(entity)
                .or_insert_with(|| ElementRecord::new(LayoutElement::new(entity)));
            let first = record.first;
            record.first = false;
            (record.element.duration, first)
        };
        let animator = self.animator.borrow().clone();
        match animator {
            Some(animator) if !first && duration > Duration::ZERO => {
                animator.animate_position(entity, translation, duration);
            }
            _ => self.transforms.set_local_translation(entity, translation),
        }
    }
}

impl System for LayoutSystem {
    fn destroy(&self, entity: Entity) {
        self.layouts.borrow_mut().remove(&entity);
        self.elements.borrow_mut().remove(&entity);
    }
}

impl Drop for LayoutSystem {
    fn drop(&mut self) {
        for id in self.connections.get_mut().drain(..) {
            self.dispatcher.disconnect(id);
        }
    }
}

/// Routes [`apply_layout`]'s reads and writes to the live systems.
struct SystemLayoutHost<'a> {
    system: &'a LayoutSystem,
}

impl LayoutHost for SystemLayoutHost<'_> {
    fn original_box(&self, entity: Entity) -> Aabb {
        self.system
            .boxes
            .get_original_box(entity)
            .unwrap_or(Aabb::ZERO)
    }

    fn actual_box(&self, entity: Entity) -> Aabb {
        self.system
            .boxes
            .get_actual_box(entity)
            .unwrap_or(Aabb::ZERO)
    }

    fn set_desired_size(&self, entity: Entity, source: Entity, desired: DesiredSize) {
        self.system.boxes.set_desired_size(entity, source, desired);
    }

    fn set_enabled(&self, entity: Entity, enabled: bool) {
        if enabled {
            self.system.transforms.enable(entity);
        } else {
            self.system.transforms.disable(entity);
        }
    }

    fn set_position(&self, entity: Entity, position: Vec2) {
        self.system.set_layout_position(entity, position);
    }
}

#[cfg(test)]
#[path = "tests/layout_system_tests.rs"]
mod tests;
