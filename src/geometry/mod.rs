pub mod line;
pub mod polygon;
pub mod shape;

pub use line::{Line2, LineSegment2};
pub use polygon::{Aabb2, Polygon};
pub use shape::{Circle, Shape2D, DEFAULT_CIRCLE_SEGMENTS};
