pub mod gesture;
pub mod shapes;

pub use gesture::GestureEngine;
pub use shapes::{ShapeKind, StrokeStyle};
