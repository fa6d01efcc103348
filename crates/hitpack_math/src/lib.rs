// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
pub mod packing;

pub use interval::Interval;
pub use ray::Ray;
