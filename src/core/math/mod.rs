pub mod color;
pub mod easing;
pub mod vec2;

pub use color::{GradientStop, Rgba};
pub use easing::Easing;
pub use vec2::{Vec2, EPSILON};
