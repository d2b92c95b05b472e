//! Pure math/data for the zoomable crates
//!
//! Geometry primitives and the layer transform a zoomable surface hands back
//! to its host.

mod geometry;
mod layer;

pub use geometry::*;
pub use layer::*;

pub mod prelude {
    pub use crate::geometry::{Point, Size};
    pub use crate::layer::GraphicsLayer;
}
