//! Packed hit record paired with the configuration that reads it.

use crate::config::HitInfoConfig;
use crate::header::unpack_type;
use crate::hit_info::HitInfo;
use crate::hit_type::HitType;
use crate::hits::{CurveHit, DisplacedTriangleHit, HitCodec, SdfGridHit, TriangleHit, VolumeHit};
use crate::packed::PackedHitInfo;

/// A hit record as stored in a buffer.
///
/// Built once, from a typed hit or from raw words, and never modified.
/// Every query decodes from the stored words.
///
/// The unchecked accessors (`triangle_hit`, ...) expect the caller to have
/// checked [`HitRecord::hit_type`] first. On a mismatched tag they decode
/// the words anyway and return meaningless values. The `try_` variants
/// check the tag and return `None` on mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRecord {
    config: HitInfoConfig,
    packed: PackedHitInfo,
}

impl HitRecord {
    /// Wrap packed words read from storage.
    pub fn new(config: HitInfoConfig, packed: PackedHitInfo) -> Self {
        Self { config, packed }
    }

    /// Pack a typed hit.
    pub fn from_hit(config: HitInfoConfig, hit: impl Into<HitInfo>) -> Self {
        let packed = hit.into().pack(&config);
        Self { config, packed }
    }

    /// The invalid record (all words zero).
    pub fn invalid(config: HitInfoConfig) -> Self {
        Self {
            config,
            packed: PackedHitInfo::INVALID,
        }
    }

    pub fn config(&self) -> &HitInfoConfig {
        &self.config
    }

    /// The packed record, always four words.
    pub fn packed(&self) -> PackedHitInfo {
        self.packed
    }

    /// The words that go on the wire: two when compressed, four otherwise.
    pub fn words(&self) -> &[u32] {
        self.packed.words(&self.config)
    }

    /// Whether the record holds a hit.
    ///
    /// Raw tags past the last known hit type read as [`HitType::None`], so a
    /// record carrying one reports `false` here even though its tag is nonzero.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.hit_type() != HitType::None
    }

    /// Stored type tag. Only reads the header.
    #[inline]
    pub fn hit_type(&self) -> HitType {
        unpack_type(&self.packed, &self.config)
    }

    /// Decode as `T` without looking at the tag.
    pub fn get<T: HitCodec>(&self) -> T {
        T::unpack(&self.packed, &self.config)
    }

    /// Decode as `T` if the tag says the record holds a `T`.
    pub fn try_get<T: HitCodec>(&self) -> Option<T> {
        (self.hit_type() == T::HIT_TYPE).then(|| self.get())
    }

    /// Decode into the matching [`HitInfo`] variant.
    pub fn unpack(&self) -> HitInfo {
        HitInfo::unpack(&self.packed, &self.config)
    }

    pub fn triangle_hit(&self) -> TriangleHit {
        self.get()
    }

    pub fn displaced_triangle_hit(&self) -> DisplacedTriangleHit {
        self.get()
    }

    pub fn curve_hit(&self) -> CurveHit {
        self.get()
    }

    pub fn sdf_grid_hit(&self) -> SdfGridHit {
        self.get()
    }

    pub fn volume_hit(&self) -> VolumeHit {
        self.get()
    }

    pub fn try_triangle_hit(&self) -> Option<TriangleHit> {
        self.try_get()
    }

    pub fn try_displaced_triangle_hit(&self) -> Option<DisplacedTriangleHit> {
        self.try_get()
    }

    pub fn try_curve_hit(&self) -> Option<CurveHit> {
        self.try_get()
    }

    pub fn try_sdf_grid_hit(&self) -> Option<SdfGridHit> {
        self.try_get()
    }

    pub fn try_volume_hit(&self) -> Option<VolumeHit> {
        self.try_get()
    }
}
