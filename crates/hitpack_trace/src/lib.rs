//! hitpack trace - reference producer and consumer of packed hit records.
//!
//! Traces batches of rays against instanced triangle meshes and an optional
//! homogeneous medium, writing one packed record per ray, and decodes the
//! resulting buffers back into summaries. Exercises the full
//! intersection-to-buffer-to-decode path of `hitpack_core`.

mod scene;
mod summary;
mod tracer;
mod triangle;

pub use scene::{Instance, Medium, Mesh, Scene};
pub use summary::HitSummary;
pub use tracer::{trace, trace_ray};
pub use triangle::{Triangle, TriangleIntersection};

/// Re-export the codec and math crates
pub use hitpack_core;
pub use hitpack_math::{Interval, Ray, Vec2, Vec3};
