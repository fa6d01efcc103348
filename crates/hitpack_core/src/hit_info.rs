//! Decoded hit record as a sum type.

use crate::config::HitInfoConfig;
use crate::header::unpack_type;
use crate::hit_type::HitType;
use crate::hits::{CurveHit, DisplacedTriangleHit, HitCodec, SdfGridHit, TriangleHit, VolumeHit};
use crate::packed::PackedHitInfo;

/// Any hit record, decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum HitInfo {
    /// No hit
    #[default]
    None,
    Triangle(TriangleHit),
    DisplacedTriangle(DisplacedTriangleHit),
    Curve(CurveHit),
    SdfGrid(SdfGridHit),
    Volume(VolumeHit),
}

impl HitInfo {
    pub fn hit_type(&self) -> HitType {
        match self {
            HitInfo::None => HitType::None,
            HitInfo::Triangle(_) => HitType::Triangle,
            HitInfo::DisplacedTriangle(_) => HitType::DisplacedTriangle,
            HitInfo::Curve(_) => HitType::Curve,
            HitInfo::SdfGrid(_) => HitType::SdfGrid,
            HitInfo::Volume(_) => HitType::Volume,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, HitInfo::None)
    }

    /// Pack into the wire layout. `None` packs to the all-zero record.
    pub fn pack(&self, config: &HitInfoConfig) -> PackedHitInfo {
        match self {
            HitInfo::None => PackedHitInfo::INVALID,
            HitInfo::Triangle(hit) => hit.pack(config),
            HitInfo::DisplacedTriangle(hit) => hit.pack(config),
            HitInfo::Curve(hit) => hit.pack(config),
            HitInfo::SdfGrid(hit) => hit.pack(config),
            HitInfo::Volume(hit) => hit.pack(config),
        }
    }

    /// Decode a record, dispatching on its stored type tag.
    ///
    /// A tag whose geometry type is disabled yields that variant holding
    /// its default value.
    pub fn unpack(packed: &PackedHitInfo, config: &HitInfoConfig) -> Self {
        match unpack_type(packed, config) {
            HitType::None => HitInfo::None,
            HitType::Triangle => HitInfo::Triangle(TriangleHit::unpack(packed, config)),
            HitType::DisplacedTriangle => {
                HitInfo::DisplacedTriangle(DisplacedTriangleHit::unpack(packed, config))
            }
            HitType::Curve => HitInfo::Curve(CurveHit::unpack(packed, config)),
            HitType::SdfGrid => HitInfo::SdfGrid(SdfGridHit::unpack(packed, config)),
            HitType::Volume => HitInfo::Volume(VolumeHit::unpack(packed, config)),
        }
    }
}

impl From<TriangleHit> for HitInfo {
    fn from(hit: TriangleHit) -> Self {
        HitInfo::Triangle(hit)
    }
}

impl From<DisplacedTriangleHit> for HitInfo {
    fn from(hit: DisplacedTriangleHit) -> Self {
        HitInfo::DisplacedTriangle(hit)
    }
}

impl From<CurveHit> for HitInfo {
    fn from(hit: CurveHit) -> Self {
        HitInfo::Curve(hit)
    }
}

impl From<SdfGridHit> for HitInfo {
    fn from(hit: SdfGridHit) -> Self {
        HitInfo::SdfGrid(hit)
    }
}

impl From<VolumeHit> for HitInfo {
    fn from(hit: VolumeHit) -> Self {
        HitInfo::Volume(hit)
    }
}
