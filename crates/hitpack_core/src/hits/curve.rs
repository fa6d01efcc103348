use std::ops::Deref;

use hitpack_math::Vec2;

use super::{GeometryHit, HitCodec};
use crate::config::HitInfoConfig;
use crate::header::GeometryInstanceId;
use crate::hit_type::HitType;
use crate::packed::PackedHitInfo;

/// Hit on a curve segment.
///
/// Barycentrics are always stored as raw floats in words 2 and 3,
/// whatever the compression setting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurveHit(pub GeometryHit);

impl CurveHit {
    pub fn new(instance_id: GeometryInstanceId, primitive_index: u32, barycentrics: Vec2) -> Self {
        Self(GeometryHit::new(instance_id, primitive_index, barycentrics))
    }
}

impl Deref for CurveHit {
    type Target = GeometryHit;

    fn deref(&self) -> &GeometryHit {
        &self.0
    }
}

impl HitCodec for CurveHit {
    const HIT_TYPE: HitType = HitType::Curve;

    fn encode(&self, packed: &mut PackedHitInfo, config: &HitInfoConfig) {
        self.0.encode_header(packed, config, Self::HIT_TYPE);
        packed.0[2] = self.barycentrics.x.to_bits();
        packed.0[3] = self.barycentrics.y.to_bits();
    }

    fn decode(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        let mut hit = GeometryHit::decode_header(packed, config);
        hit.barycentrics = Vec2::new(f32::from_bits(packed.0[2]), f32::from_bits(packed.0[3]));
        Self(hit)
    }
}
