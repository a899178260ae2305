pub mod boolean_2d;
pub mod clip;

pub use boolean_2d::{boolean_2d, difference, intersection_polygon, BooleanOp};
pub use clip::clip_polygon;
