//! Shared record header: type tag, instance ID and primitive index.
//!
//! Single-word layout (header_bits <= 32), word 0:
//!
//! ```text
//! | type (type_bits) | instance ID (instance_id_bits) | primitive index (primitive_index_bits) |
//! 31                                                                                         0
//! ```
//!
//! Two-word layout (header_bits > 32): word 0 holds the type tag in its top
//! `type_bits` and the instance ID in the remaining low bits; word 1 holds
//! the primitive index.
//!
//! Field values wider than their slot are truncated to the slot's low bits.

use hitpack_math::packing::bit_mask;

use crate::config::HitInfoConfig;
use crate::hit_type::HitType;
use crate::packed::PackedHitInfo;

/// Handle of a placed geometry instance in the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryInstanceId(pub u32);

impl GeometryInstanceId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl From<u32> for GeometryInstanceId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Write only the type tag into word 0, for hits without geometry addressing.
#[inline]
pub fn pack_type(packed: &mut PackedHitInfo, config: &HitInfoConfig, hit_type: HitType) {
    packed.0[0] = hit_type.raw() << config.type_offset();
}

/// Write the full header.
pub fn pack_header(
    packed: &mut PackedHitInfo,
    config: &HitInfoConfig,
    hit_type: HitType,
    instance_id: GeometryInstanceId,
    primitive_index: u32,
) {
    let tag = hit_type.raw() << config.type_offset();
    if config.single_word_header() {
        let instance = instance_id.0 & bit_mask(config.instance_id_bits());
        let primitive = primitive_index & bit_mask(config.primitive_index_bits());
        packed.0[0] = tag | (instance << config.instance_id_offset()) | primitive;
    } else {
        // Instance ID gets every bit of word 0 below the tag, not just instance_id_bits
        packed.0[0] = tag | (instance_id.0 & bit_mask(config.type_offset()));
        packed.0[1] = primitive_index;
    }
}

/// Read the type tag from word 0.
#[inline]
pub fn unpack_type(packed: &PackedHitInfo, config: &HitInfoConfig) -> HitType {
    let raw = packed.0[0] >> config.type_offset();
    HitType::from_raw(raw & bit_mask(config.type_bits()))
}

/// Read the instance ID and primitive index. Inverse of [`pack_header`].
pub fn unpack_header(packed: &PackedHitInfo, config: &HitInfoConfig) -> (GeometryInstanceId, u32) {
    let instance_mask = bit_mask(config.instance_id_bits());
    let primitive_mask = bit_mask(config.primitive_index_bits());
    if config.single_word_header() {
        let instance = (packed.0[0] >> config.instance_id_offset()) & instance_mask;
        (GeometryInstanceId(instance), packed.0[0] & primitive_mask)
    } else {
        (
            GeometryInstanceId(packed.0[0] & instance_mask),
            packed.0[1] & primitive_mask,
        )
    }
}
