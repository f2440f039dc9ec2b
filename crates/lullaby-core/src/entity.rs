//! Opaque entity handles.

use std::fmt;

/// Handle to an entity owned by the [`EntityFactory`](crate::EntityFactory).
///
/// Systems key their per-entity records by this handle; it never points into
/// another system's storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Entity(pub u32);

impl Entity {
    /// The null entity. Never handed out by the factory.
    pub const NULL: Entity = Entity(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Entity {
    fn from(value: u32) -> Self {
        Entity(value)
    }
}
