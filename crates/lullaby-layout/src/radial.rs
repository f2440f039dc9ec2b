//! Elliptical placement.

use crate::RadialLayoutParams;
use lullaby_core::{dfatal, Entity, TransformSystem};
use lullaby_math::{Sqt, Vec3, DEGREES_TO_RADIANS};

/// Transform access needed by [`apply_radial_layout`].
pub trait RadialHost {
    fn sqt(&self, entity: Entity) -> Option<Sqt>;
    fn set_sqt(&self, entity: Entity, sqt: Sqt);
}

impl RadialHost for TransformSystem {
    fn sqt(&self, entity: Entity) -> Option<Sqt> {
        TransformSystem::sqt(self, entity)
    }

    fn set_sqt(&self, entity: Entity, sqt: Sqt) {
        TransformSystem::set_sqt(self, entity, sqt)
    }
}

/// Translation of the `index`th element.
pub fn radial_translation(params: &RadialLayoutParams, index: usize) -> Vec3 {
    let angle = index as f32 * params.degrees_per_element * DEGREES_TO_RADIANS;
    params.major_axis * angle.cos() + params.minor_axis * angle.sin()
}

/// Moves each entity onto the ellipse spanned by the major and minor axes,
/// keeping its rotation and scale.
pub fn apply_radial_layout<H: RadialHost + ?Sized>(
    host: &H,
    entities: &[Entity],
    params: &RadialLayoutParams,
) {
    for (index, &entity) in entities.iter().enumerate() {
        let Some(mut sqt) = host.sqt(entity) else {
            dfatal!("Radial layout child {} has no transform", entity);
            continue;
        };
        sqt.translation = radial_translation(params, index);
        host.set_sqt(entity, sqt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lullaby_core::{DispatchMode, Dispatcher};
    use lullaby_math::Quat;
    use std::rc::Rc;

    #[test]
    fn keeps_rotation_and_scale() {
        let transforms = TransformSystem::new(Rc::new(Dispatcher::new(DispatchMode::Immediate)));
        let children = [Entity(1), Entity(2), Entity(3)];
        let rotation = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.25);
        for &child in &children {
            transforms.create(child);
            transforms.set_sqt(
                child,
                Sqt {
                    translation: Vec3::new(9.0, 9.0, 9.0),
                    rotation,
                    scale: Vec3::new(2.0, 2.0, 2.0),
                },
            );
        }

        let params = RadialLayoutParams {
            degrees_per_element: 90.0,
            major_axis: Vec3::new(2.0, 0.0, 0.0),
            minor_axis: Vec3::new(0.0, 1.0, 0.0),
        };
        apply_radial_layout(&transforms, &children, &params);

        let expected = [(2.0, 0.0), (0.0, 1.0), (-2.0, 0.0)];
        for (child, (x, y)) in children.iter().zip(expected) {
            let sqt = transforms.sqt(*child).unwrap();
            assert!((sqt.translation.x - x).abs() < 1e-5);
            assert!((sqt.translation.y - y).abs() < 1e-5);
            assert_eq!(sqt.translation.z, 0.0);
            assert_eq!(sqt.rotation, rotation);
            assert_eq!(sqt.scale, Vec3::new(2.0, 2.0, 2.0));
        }
    }
}
