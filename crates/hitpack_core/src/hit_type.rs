//! Hit type tags and the scene-level switches that gate them.

use serde::{Deserialize, Serialize};

/// Kind of intersection stored in a packed hit record.
///
/// The discriminants are the on-wire tag values. `None` is zero so a
/// zero-filled record always reads back as invalid.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitType {
    #[default]
    None = 0,
    Triangle = 1,
    Volume = 2,
    DisplacedTriangle = 3,
    Curve = 4,
    SdfGrid = 5,
}

impl HitType {
    /// Number of distinct tags, including `None`.
    pub const COUNT: u32 = 6;

    /// All tags in discriminant order.
    pub const ALL: [HitType; Self::COUNT as usize] = [
        HitType::None,
        HitType::Triangle,
        HitType::Volume,
        HitType::DisplacedTriangle,
        HitType::Curve,
        HitType::SdfGrid,
    ];

    /// Map a raw tag to a hit type. Unknown tags read as `None`.
    #[inline]
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => HitType::Triangle,
            2 => HitType::Volume,
            3 => HitType::DisplacedTriangle,
            4 => HitType::Curve,
            5 => HitType::SdfGrid,
            _ => HitType::None,
        }
    }

    /// On-wire tag value.
    #[inline]
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Short lowercase name, used in logs and debug output.
    pub fn name(self) -> &'static str {
        match self {
            HitType::None => "none",
            HitType::Triangle => "triangle",
            HitType::Volume => "volume",
            HitType::DisplacedTriangle => "displaced_triangle",
            HitType::Curve => "curve",
            HitType::SdfGrid => "sdf_grid",
        }
    }
}

impl std::fmt::Display for HitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometry types present in the current scene.
///
/// A hit tagged with a disabled type decodes to that variant's default
/// value. Volume hits carry no geometry addressing and are always decodable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryTypes {
    pub triangle_mesh: bool,
    pub displaced_triangle_mesh: bool,
    pub curve: bool,
    pub sdf_grid: bool,
}

impl GeometryTypes {
    /// Every geometry type enabled.
    pub const ALL: GeometryTypes = GeometryTypes {
        triangle_mesh: true,
        displaced_triangle_mesh: true,
        curve: true,
        sdf_grid: true,
    };

    /// Only plain triangle meshes.
    pub const TRIANGLES_ONLY: GeometryTypes = GeometryTypes {
        triangle_mesh: true,
        displaced_triangle_mesh: false,
        curve: false,
        sdf_grid: false,
    };

    /// Whether hits of `hit_type` can be decoded under these flags.
    pub fn supports(&self, hit_type: HitType) -> bool {
        match hit_type {
            HitType::None | HitType::Volume => true,
            HitType::Triangle => self.triangle_mesh,
            HitType::DisplacedTriangle => self.displaced_triangle_mesh,
            HitType::Curve => self.curve,
            HitType::SdfGrid => self.sdf_grid,
        }
    }

    /// Whether any enabled type stores payload in words 2 and 3.
    pub fn needs_wide_payload(&self) -> bool {
        self.displaced_triangle_mesh || self.curve || self.sdf_grid
    }
}

impl Default for GeometryTypes {
    fn default() -> Self {
        Self::ALL
    }
}

/// SDF grid implementation active in the scene.
///
/// Selects how the header's primitive-index slot is interpreted for SDF grid hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdfGridBackend {
    /// Normalized dense grid; the slot holds the level of detail.
    #[default]
    NormalizedDenseGrid,
    /// Sparse voxel set; the slot holds the voxel primitive ID.
    SparseVoxelSet,
    /// Sparse voxel octree; the slot holds the octree node index.
    SparseVoxelOctree,
}

impl SdfGridBackend {
    /// Value exported as `SCENE_SDF_GRID_IMPLEMENTATION` for shader builds.
    pub fn define_value(self) -> u32 {
        match self {
            SdfGridBackend::NormalizedDenseGrid => 1,
            SdfGridBackend::SparseVoxelSet => 2,
            SdfGridBackend::SparseVoxelOctree => 3,
        }
    }
}
