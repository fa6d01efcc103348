//! hitpack core - packed hit records for GPU-visible buffers.
//!
//! This crate provides:
//!
//! - **Configuration**: `HitInfoConfig`, the session-wide field widths and switches
//! - **Header codec**: the shared type / instance / primitive header
//! - **Hit codecs**: one bit layout per hit kind (`TriangleHit`, `VolumeHit`, ...)
//! - **Records**: `HitInfo` (decoded sum type), `HitRecord` (packed words plus
//!   configuration) and `PackedHitBuffer` (one record per ray)
//!
//! Encoding and decoding never fail. Out-of-range values are truncated,
//! disabled hit types decode to defaults, and a record decoded under a
//! different configuration than it was packed with reads back as garbage.
//!
//! # Example
//!
//! ```
//! use hitpack_core::{GeometryInstanceId, HitInfoConfig, HitRecord, HitType, TriangleHit};
//! use hitpack_math::Vec2;
//!
//! let config = HitInfoConfig::default();
//! let hit = TriangleHit::new(GeometryInstanceId(5), 123, Vec2::new(0.25, 0.5));
//!
//! let words = HitRecord::from_hit(config, hit).packed();
//! let record = HitRecord::new(config, words);
//! assert_eq!(record.hit_type(), HitType::Triangle);
//! assert_eq!(record.triangle_hit(), hit);
//! ```

pub mod buffer;
pub mod config;
pub mod header;
pub mod hit_info;
pub mod hit_type;
pub mod hits;
pub mod packed;
pub mod record;

// Re-export commonly used types
pub use buffer::{BufferError, BufferResult, PackedHitBuffer};
pub use config::{ConfigError, ConfigResult, HitInfoConfig, HitInfoConfigDesc, SceneStats};
pub use header::GeometryInstanceId;
pub use hit_info::HitInfo;
pub use hit_type::{GeometryTypes, HitType, SdfGridBackend};
pub use hits::{
    CurveHit, DisplacedTriangleHit, GeometryHit, HitCodec, SdfGridHit, SdfGridHitData,
    TriangleHit, VolumeHit,
};
pub use packed::PackedHitInfo;
pub use record::HitRecord;
