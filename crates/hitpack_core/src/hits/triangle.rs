use std::ops::Deref;

use hitpack_math::packing::{pack_unorm2x16_unsafe, unpack_unorm2x16};
use hitpack_math::Vec2;

use super::{GeometryHit, HitCodec};
use crate::config::HitInfoConfig;
use crate::header::GeometryInstanceId;
use crate::hit_type::HitType;
use crate::packed::PackedHitInfo;

/// Hit on a triangle mesh.
///
/// Uncompressed, the barycentrics are stored as raw floats in words 2 and 3.
/// Compressed, both are quantized to 16-bit unorm in word 1; the encoder
/// does not clamp, so barycentrics must already lie in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriangleHit(pub GeometryHit);

impl TriangleHit {
    pub fn new(instance_id: GeometryInstanceId, primitive_index: u32, barycentrics: Vec2) -> Self {
        Self(GeometryHit::new(instance_id, primitive_index, barycentrics))
    }
}

impl Deref for TriangleHit {
    type Target = GeometryHit;

    fn deref(&self) -> &GeometryHit {
        &self.0
    }
}

impl HitCodec for TriangleHit {
    const HIT_TYPE: HitType = HitType::Triangle;

    fn encode(&self, packed: &mut PackedHitInfo, config: &HitInfoConfig) {
        self.0.encode_header(packed, config, Self::HIT_TYPE);
        if config.use_compression() {
            packed.0[1] = pack_unorm2x16_unsafe(self.barycentrics);
        } else {
            packed.0[2] = self.barycentrics.x.to_bits();
            packed.0[3] = self.barycentrics.y.to_bits();
        }
    }

    fn decode(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        let mut hit = GeometryHit::decode_header(packed, config);
        hit.barycentrics = if config.use_compression() {
            unpack_unorm2x16(packed.0[1])
        } else {
            Vec2::new(f32::from_bits(packed.0[2]), f32::from_bits(packed.0[3]))
        };
        Self(hit)
    }
}
