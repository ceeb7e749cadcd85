//! Drawing Surface
//!
//! Geometry behind the image annotation canvas:
//! - [`shape`]: drawn regions and their text descriptions
//! - [`gesture`]: pointer input turned into finished shapes
//! - [`viewport`]: pan/zoom transform between screen and image space
//!
//! Image space is a flat pixel plane with `x` to the right and `y` up,
//! origin at the bottom-left corner of the raster.

pub mod gesture;
pub mod shape;
pub mod viewport;

pub use gesture::{DrawTool, Gesture};
pub use shape::{
    selection_message, selection_prompt, DrawnShape, Point, ShapeCollection, ShapeId,
};
pub use viewport::Viewport;
