//! Typed hit records and their packed layouts.
//!
//! Each hit kind implements [`HitCodec`], which owns the bit layout of the
//! payload that follows the shared header.

mod curve;
mod displaced_triangle;
mod sdf_grid;
mod triangle;
mod volume;

pub use curve::CurveHit;
pub use displaced_triangle::DisplacedTriangleHit;
pub use sdf_grid::{SdfGridHit, SdfGridHitData};
pub use triangle::TriangleHit;
pub use volume::VolumeHit;

use hitpack_math::{Vec2, Vec3};

use crate::config::HitInfoConfig;
use crate::header::{pack_header, unpack_header, GeometryInstanceId};
use crate::hit_type::HitType;
use crate::packed::PackedHitInfo;

/// Bit layout of one hit kind.
///
/// `unpack` does not look at the stored type tag: decoding a record of a
/// different kind produces a well-formed but meaningless value.
pub trait HitCodec: Copy + Default {
    /// Tag written into the header.
    const HIT_TYPE: HitType;

    /// Write header and payload into a zeroed record.
    fn encode(&self, packed: &mut PackedHitInfo, config: &HitInfoConfig);

    /// Read header and payload, ignoring whether the type is enabled.
    fn decode(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self;

    /// Pack into a new record.
    fn pack(&self, config: &HitInfoConfig) -> PackedHitInfo {
        let mut packed = PackedHitInfo::INVALID;
        self.encode(&mut packed, config);
        packed
    }

    /// Unpack a record. Returns `Default` when the hit type is disabled in
    /// the configuration.
    fn unpack(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        if config.supports(Self::HIT_TYPE) {
            Self::decode(packed, config)
        } else {
            Self::default()
        }
    }
}

/// Fields shared by hits on triangle-like geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryHit {
    /// Instance that was hit
    pub instance_id: GeometryInstanceId,
    /// Index of the primitive within the instance's geometry
    pub primitive_index: u32,
    /// Barycentric weights of the second and third vertex
    pub barycentrics: Vec2,
}

impl GeometryHit {
    pub fn new(instance_id: GeometryInstanceId, primitive_index: u32, barycentrics: Vec2) -> Self {
        Self {
            instance_id,
            primitive_index,
            barycentrics,
        }
    }

    /// All three barycentric weights, the first one derived as 1 - x - y.
    pub fn barycentric_weights(&self) -> Vec3 {
        Vec3::new(
            1.0 - self.barycentrics.x - self.barycentrics.y,
            self.barycentrics.x,
            self.barycentrics.y,
        )
    }

    /// Interpolate a per-vertex attribute at the hit point.
    pub fn interpolate<T>(&self, a: T, b: T, c: T) -> T
    where
        T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    {
        let w = self.barycentric_weights();
        a * w.x + b * w.y + c * w.z
    }

    fn encode_header(&self, packed: &mut PackedHitInfo, config: &HitInfoConfig, hit_type: HitType) {
        pack_header(packed, config, hit_type, self.instance_id, self.primitive_index);
    }

    fn decode_header(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        let (instance_id, primitive_index) = unpack_header(packed, config);
        Self {
            instance_id,
            primitive_index,
            barycentrics: Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barycentric_weights() {
        let hit = GeometryHit::new(GeometryInstanceId(0), 0, Vec2::new(0.25, 0.5));
        let w = hit.barycentric_weights();
        assert_eq!(w, Vec3::new(0.25, 0.25, 0.5));
        assert!((w.x + w.y + w.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_interpolate() {
        let hit = GeometryHit::new(GeometryInstanceId(0), 0, Vec2::new(0.5, 0.5));
        let p = hit.interpolate(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(p, Vec3::new(0.5, 0.5, 0.0));

        let corner = GeometryHit::default().interpolate(1.0f32, 2.0, 3.0);
        assert_eq!(corner, 1.0);
    }
}
