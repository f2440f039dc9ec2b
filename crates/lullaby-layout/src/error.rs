use lullaby_core::Entity;
use std::fmt;

/// Errors raised while laying out a node or querying its last layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Cached positions hold more row boundaries than rows.
    InvalidCachedPositions { rows: usize, boundaries: usize },
    /// The entity has a layout component but neither grid nor radial params.
    MissingParams { entity: Entity },
    /// The entity has no transform to read children or write bounds.
    MissingTransform { entity: Entity },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::InvalidCachedPositions { rows, boundaries } => write!(
                f,
                "invalid cached positions: {} row boundaries for {} rows",
                boundaries, rows
            ),
            LayoutError::MissingParams { entity } => {
                write!(f, "layout {} has neither grid nor radial params", entity)
            }
            LayoutError::MissingTransform { entity } => {
                write!(f, "layout {} has no transform", entity)
            }
        }
    }
}

impl std::error::Error for LayoutError {}
