use std::ops::Deref;

use hitpack_math::packing::{f16_bits_to_f32, f32_to_f16_bits, pack_unorm24, unpack_unorm24};
use hitpack_math::Vec2;

use super::{GeometryHit, HitCodec};
use crate::config::HitInfoConfig;
use crate::header::GeometryInstanceId;
use crate::hit_type::HitType;
use crate::packed::PackedHitInfo;

/// Hit on a displaced triangle mesh.
///
/// Payload layout, after the header:
///
/// ```text
/// word 2: | bary.x (24 bits)              | bary.y[23:16] |
/// word 3: | bary.y[15:0]  | displacement (f16)            |
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplacedTriangleHit {
    pub hit: GeometryHit,
    /// Displacement offset along the surface normal
    pub displacement: f32,
}

impl DisplacedTriangleHit {
    pub fn new(
        instance_id: GeometryInstanceId,
        primitive_index: u32,
        barycentrics: Vec2,
        displacement: f32,
    ) -> Self {
        Self {
            hit: GeometryHit::new(instance_id, primitive_index, barycentrics),
            displacement,
        }
    }
}

impl Deref for DisplacedTriangleHit {
    type Target = GeometryHit;

    fn deref(&self) -> &GeometryHit {
        &self.hit
    }
}

impl HitCodec for DisplacedTriangleHit {
    const HIT_TYPE: HitType = HitType::DisplacedTriangle;

    fn encode(&self, packed: &mut PackedHitInfo, config: &HitInfoConfig) {
        self.hit.encode_header(packed, config, Self::HIT_TYPE);
        let x = pack_unorm24(self.hit.barycentrics.x);
        let y = pack_unorm24(self.hit.barycentrics.y);
        packed.0[2] = (x << 8) | ((y >> 16) & 0xff);
        packed.0[3] = (y << 16) | f32_to_f16_bits(self.displacement);
    }

    fn decode(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        let mut hit = GeometryHit::decode_header(packed, config);
        let x = packed.0[2] >> 8;
        let y = ((packed.0[2] & 0xff) << 16) | (packed.0[3] >> 16);
        hit.barycentrics = Vec2::new(unpack_unorm24(x), unpack_unorm24(y));
        Self {
            hit,
            displacement: f16_bits_to_f32(packed.0[3]),
        }
    }
}
