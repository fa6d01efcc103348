use super::HitCodec;
use crate::config::HitInfoConfig;
use crate::header::{pack_header, unpack_header, GeometryInstanceId};
use crate::hit_type::{HitType, SdfGridBackend};
use crate::packed::PackedHitInfo;

/// Backend-specific part of an SDF grid hit.
///
/// The integer is stored in the header's primitive-index slot, so it is
/// truncated to `primitive_index_bits` like any primitive index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SdfGridHitData {
    /// Normalized dense grid: level of detail that was hit
    Lod { lod: u32, hit_t: f32 },
    /// Sparse voxel set: voxel primitive that was hit
    PrimitiveId { primitive_id: u32, hit_t: f32 },
    /// Sparse voxel octree: octree node that was hit
    SvoIndex { svo_index: u32, hit_t: f32 },
}

impl SdfGridHitData {
    /// Build the variant matching `backend`.
    pub fn for_backend(backend: SdfGridBackend, aux: u32, hit_t: f32) -> Self {
        match backend {
            SdfGridBackend::NormalizedDenseGrid => SdfGridHitData::Lod { lod: aux, hit_t },
            SdfGridBackend::SparseVoxelSet => SdfGridHitData::PrimitiveId {
                primitive_id: aux,
                hit_t,
            },
            SdfGridBackend::SparseVoxelOctree => SdfGridHitData::SvoIndex {
                svo_index: aux,
                hit_t,
            },
        }
    }

    /// The integer stored in the primitive-index slot.
    pub fn aux(&self) -> u32 {
        match *self {
            SdfGridHitData::Lod { lod, .. } => lod,
            SdfGridHitData::PrimitiveId { primitive_id, .. } => primitive_id,
            SdfGridHitData::SvoIndex { svo_index, .. } => svo_index,
        }
    }

    /// Distance along the ray to the surface.
    pub fn hit_t(&self) -> f32 {
        match *self {
            SdfGridHitData::Lod { hit_t, .. }
            | SdfGridHitData::PrimitiveId { hit_t, .. }
            | SdfGridHitData::SvoIndex { hit_t, .. } => hit_t,
        }
    }
}

impl Default for SdfGridHitData {
    fn default() -> Self {
        SdfGridHitData::Lod { lod: 0, hit_t: 0.0 }
    }
}

/// Hit on an SDF grid. The hit distance is stored as a raw float in word 2.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SdfGridHit {
    pub instance_id: GeometryInstanceId,
    pub hit_data: SdfGridHitData,
}

impl SdfGridHit {
    pub fn new(instance_id: GeometryInstanceId, hit_data: SdfGridHitData) -> Self {
        Self {
            instance_id,
            hit_data,
        }
    }
}

impl HitCodec for SdfGridHit {
    const HIT_TYPE: HitType = HitType::SdfGrid;

    fn encode(&self, packed: &mut PackedHitInfo, config: &HitInfoConfig) {
        pack_header(packed, config, Self::HIT_TYPE, self.instance_id, self.hit_data.aux());
        packed.0[2] = self.hit_data.hit_t().to_bits();
    }

    /// The data variant is chosen by the configured backend, not by what
    /// was packed.
    fn decode(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        let (instance_id, aux) = unpack_header(packed, config);
        let hit_t = f32::from_bits(packed.0[2]);
        Self {
            instance_id,
            hit_data: SdfGridHitData::for_backend(config.sdf_grid_backend(), aux, hit_t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HitInfoConfigDesc;

    fn config(backend: SdfGridBackend) -> HitInfoConfig {
        HitInfoConfig::new(HitInfoConfigDesc {
            sdf_grid_backend: backend,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_roundtrip_per_backend() {
        for backend in [
            SdfGridBackend::NormalizedDenseGrid,
            SdfGridBackend::SparseVoxelSet,
            SdfGridBackend::SparseVoxelOctree,
        ] {
            let config = config(backend);
            let data = SdfGridHitData::for_backend(backend, 1234, 7.25);
            let hit = SdfGridHit::new(GeometryInstanceId(9), data);
            let packed = hit.pack(&config);

            assert_eq!(packed.0[2], 7.25f32.to_bits());
            assert_eq!(packed.0[3], 0);
            assert_eq!(SdfGridHit::unpack(&packed, &config), hit);
        }
    }

    #[test]
    fn test_wire_bits_match_across_backends() {
        // Same integer and distance give the same bits whichever interpretation is active
        let lod = SdfGridHit::new(GeometryInstanceId(3), SdfGridHitData::Lod { lod: 5, hit_t: 2.0 });
        let svo = SdfGridHit::new(
            GeometryInstanceId(3),
            SdfGridHitData::SvoIndex {
                svo_index: 5,
                hit_t: 2.0,
            },
        );
        let config = config(SdfGridBackend::SparseVoxelOctree);
        assert_eq!(lod.pack(&config), svo.pack(&config));
        assert_eq!(SdfGridHit::unpack(&lod.pack(&config), &config), svo);
    }

    #[test]
    fn test_aux_uses_primitive_slot() {
        let config = config(SdfGridBackend::SparseVoxelSet);
        let hit = SdfGridHit::new(
            GeometryInstanceId(1),
            SdfGridHitData::PrimitiveId {
                primitive_id: 0x7f,
                hit_t: 1.0,
            },
        );
        let (_, primitive_index) = unpack_header(&hit.pack(&config), &config);
        assert_eq!(primitive_index, 0x7f);
    }
}
