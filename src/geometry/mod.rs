//! Lattice geometry shared by every stage of the shaper.

pub mod angle;
pub mod canvas;
pub mod line;
pub mod point;
pub mod rect;

pub use angle::Angle;
pub use canvas::{Canvas, BLOCKED};
pub use line::Line;
pub use point::Point;
pub use rect::Rect;
