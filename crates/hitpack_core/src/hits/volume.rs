use hitpack_math::packing::{f16_bits_to_f32, f32_to_f16_bits};

use super::HitCodec;
use crate::config::HitInfoConfig;
use crate::header::pack_type;
use crate::hit_type::HitType;
use crate::packed::PackedHitInfo;

/// Scattering event inside a participating medium.
///
/// Only the type tag is written to the header. Uncompressed, `t` and `g`
/// are raw floats in words 1 and 2. Compressed, `t` stays in word 1 and
/// `g` is stored as a half float in the low 16 bits of word 0, next to the tag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeHit {
    /// Distance along the ray to the scattering event
    pub t: f32,
    /// Phase function asymmetry parameter
    pub g: f32,
}

impl VolumeHit {
    pub fn new(t: f32, g: f32) -> Self {
        Self { t, g }
    }
}

impl HitCodec for VolumeHit {
    const HIT_TYPE: HitType = HitType::Volume;

    fn encode(&self, packed: &mut PackedHitInfo, config: &HitInfoConfig) {
        pack_type(packed, config, Self::HIT_TYPE);
        packed.0[1] = self.t.to_bits();
        if config.use_compression() {
            packed.0[0] |= f32_to_f16_bits(self.g);
        } else {
            packed.0[2] = self.g.to_bits();
        }
    }

    fn decode(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        let g = if config.use_compression() {
            f16_bits_to_f32(packed.0[0])
        } else {
            f32::from_bits(packed.0[2])
        };
        Self {
            t: f32::from_bits(packed.0[1]),
            g,
        }
    }
}
