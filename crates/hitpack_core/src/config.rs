//! Session-wide codec configuration.
//!
//! A [`HitInfoConfig`] fixes the header field widths, the compression mode,
//! the enabled geometry types and the SDF grid backend. Producers and
//! consumers must use the identical configuration: records carry no
//! description of their own layout, so a mismatch decodes silently into
//! garbage. [`HitInfoConfig::shader_defines`] exports the values for GPU
//! programs that read or write the same buffers.

use hitpack_math::packing::bits_for_count;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hit_type::{GeometryTypes, HitType, SdfGridBackend};

/// Errors that can occur while building a configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("type_bits = {bits} cannot hold {count} hit types")]
    TypeBitsTooSmall { bits: u32, count: u32 },

    #[error("{field} = {bits} exceeds the 32-bit word size")]
    FieldTooWide { field: &'static str, bits: u32 },

    #[error("header needs {0} bits, at most 64 are supported")]
    HeaderTooWide(u32),

    #[error("two-word header needs type_bits + instance_id_bits <= 32, got {0}")]
    InstanceWordOverflow(u32),

    #[error("compression needs a single-word header, got {0} bits")]
    CompressionHeaderTooWide(u32),

    #[error("compression supports only triangle and volume hits")]
    CompressionUnsupportedGeometry,

    #[error("compressed volume hits need type_bits <= 16, got {0}")]
    CompressionTypeBitsTooWide(u32),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Plain description of a configuration, before validation.
///
/// This is also the serialized form of [`HitInfoConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitInfoConfigDesc {
    /// Pack records into 2 words instead of 4
    pub use_compression: bool,
    /// Width of the hit type tag
    pub type_bits: u32,
    /// Width of the geometry instance ID field
    pub instance_id_bits: u32,
    /// Width of the primitive index field
    pub primitive_index_bits: u32,
    /// Geometry types present in the scene
    pub geometry_types: GeometryTypes,
    /// Active SDF grid implementation
    pub sdf_grid_backend: SdfGridBackend,
}

impl Default for HitInfoConfigDesc {
    fn default() -> Self {
        Self {
            use_compression: false,
            type_bits: 3,
            instance_id_bits: 12,
            primitive_index_bits: 17,
            geometry_types: GeometryTypes::ALL,
            sdf_grid_backend: SdfGridBackend::NormalizedDenseGrid,
        }
    }
}

/// Scene properties that determine the header field widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneStats {
    /// Number of geometry instances in the scene
    pub instance_count: u32,
    /// Largest primitive count of any geometry, including SDF grid auxiliary values
    pub max_primitive_count: u32,
    /// Geometry types present in the scene
    pub geometry_types: GeometryTypes,
    /// Active SDF grid implementation
    pub sdf_grid_backend: SdfGridBackend,
}

/// Validated, immutable codec configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HitInfoConfigDesc", into = "HitInfoConfigDesc")]
pub struct HitInfoConfig {
    desc: HitInfoConfigDesc,
    type_offset: u32,
    instance_id_offset: u32,
    header_bits: u32,
}

impl HitInfoConfig {
    /// Validate a description and derive the field offsets.
    pub fn new(desc: HitInfoConfigDesc) -> ConfigResult<Self> {
        validate(&desc).inspect_err(|err| log::warn!("Rejected hit info configuration: {}", err))?;

        let config = Self {
            desc,
            type_offset: 32 - desc.type_bits,
            instance_id_offset: desc.primitive_index_bits,
            header_bits: desc.type_bits + desc.instance_id_bits + desc.primitive_index_bits,
        };

        log::debug!(
            "Hit info layout: type={} instance={} primitive={} bits ({} header bits, {} words)",
            desc.type_bits,
            desc.instance_id_bits,
            desc.primitive_index_bits,
            config.header_bits,
            config.packed_words()
        );

        Ok(config)
    }

    /// Allocate the smallest field widths that address every instance and
    /// primitive in the scene.
    ///
    /// Compression is dropped when the scene contains geometry whose
    /// payload does not fit in two words.
    pub fn from_scene(stats: &SceneStats, use_compression: bool) -> ConfigResult<Self> {
        let mut desc = HitInfoConfigDesc {
            use_compression,
            type_bits: bits_for_count(HitType::COUNT),
            instance_id_bits: bits_for_count(stats.instance_count),
            primitive_index_bits: bits_for_count(stats.max_primitive_count),
            geometry_types: stats.geometry_types,
            sdf_grid_backend: stats.sdf_grid_backend,
        };

        let header_bits = desc.type_bits + desc.instance_id_bits + desc.primitive_index_bits;
        if use_compression && (desc.geometry_types.needs_wide_payload() || header_bits > 32) {
            log::warn!("Scene geometry does not fit compressed hit info, using 4-word records");
            desc.use_compression = false;
        }

        log::info!(
            "Allocated hit info bits for {} instances, {} max primitives: {}/{}/{}",
            stats.instance_count,
            stats.max_primitive_count,
            desc.type_bits,
            desc.instance_id_bits,
            desc.primitive_index_bits
        );

        Self::new(desc)
    }

    /// The description this configuration was built from.
    pub fn desc(&self) -> &HitInfoConfigDesc {
        &self.desc
    }

    pub fn use_compression(&self) -> bool {
        self.desc.use_compression
    }

    pub fn type_bits(&self) -> u32 {
        self.desc.type_bits
    }

    pub fn instance_id_bits(&self) -> u32 {
        self.desc.instance_id_bits
    }

    pub fn primitive_index_bits(&self) -> u32 {
        self.desc.primitive_index_bits
    }

    pub fn geometry_types(&self) -> GeometryTypes {
        self.desc.geometry_types
    }

    pub fn sdf_grid_backend(&self) -> SdfGridBackend {
        self.desc.sdf_grid_backend
    }

    /// Bit position of the type tag in word 0.
    #[inline]
    pub fn type_offset(&self) -> u32 {
        self.type_offset
    }

    /// Bit position of the instance ID in a single-word header.
    #[inline]
    pub fn instance_id_offset(&self) -> u32 {
        self.instance_id_offset
    }

    /// Total header width; above 32 the header spans two words.
    #[inline]
    pub fn header_bits(&self) -> u32 {
        self.header_bits
    }

    /// Whether the header fits in word 0 alone.
    #[inline]
    pub fn single_word_header(&self) -> bool {
        self.header_bits <= 32
    }

    /// Number of 32-bit words per record on the wire (2 or 4).
    #[inline]
    pub fn packed_words(&self) -> usize {
        if self.desc.use_compression {
            2
        } else {
            4
        }
    }

    /// Size of one record on the wire.
    pub fn packed_size_in_bytes(&self) -> usize {
        self.packed_words() * std::mem::size_of::<u32>()
    }

    /// Whether hits of `hit_type` are decoded, rather than defaulted.
    #[inline]
    pub fn supports(&self, hit_type: HitType) -> bool {
        self.desc.geometry_types.supports(hit_type)
    }

    /// Preprocessor defines describing this layout to shader code.
    pub fn shader_defines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("HIT_INFO_DEFINES", "1".to_string()),
            ("HIT_INFO_USE_COMPRESSION", (self.desc.use_compression as u32).to_string()),
            ("HIT_INFO_TYPE_BITS", self.desc.type_bits.to_string()),
            ("HIT_INFO_INSTANCE_ID_BITS", self.desc.instance_id_bits.to_string()),
            ("HIT_INFO_PRIMITIVE_INDEX_BITS", self.desc.primitive_index_bits.to_string()),
            (
                "SCENE_SDF_GRID_IMPLEMENTATION",
                self.desc.sdf_grid_backend.define_value().to_string(),
            ),
        ]
    }
}

impl Default for HitInfoConfig {
    fn default() -> Self {
        let desc = HitInfoConfigDesc::default();
        Self {
            desc,
            type_offset: 32 - desc.type_bits,
            instance_id_offset: desc.primitive_index_bits,
            header_bits: desc.type_bits + desc.instance_id_bits + desc.primitive_index_bits,
        }
    }
}

impl TryFrom<HitInfoConfigDesc> for HitInfoConfig {
    type Error = ConfigError;

    fn try_from(desc: HitInfoConfigDesc) -> ConfigResult<Self> {
        Self::new(desc)
    }
}

impl From<HitInfoConfig> for HitInfoConfigDesc {
    fn from(config: HitInfoConfig) -> Self {
        config.desc
    }
}

fn validate(desc: &HitInfoConfigDesc) -> ConfigResult<()> {
    let type_bits_needed = bits_for_count(HitType::COUNT);
    if desc.type_bits < type_bits_needed {
        return Err(ConfigError::TypeBitsTooSmall {
            bits: desc.type_bits,
            count: HitType::COUNT,
        });
    }

    for (field, bits) in [
        ("type_bits", desc.type_bits),
        ("instance_id_bits", desc.instance_id_bits),
        ("primitive_index_bits", desc.primitive_index_bits),
    ] {
        if bits > 32 {
            return Err(ConfigError::FieldTooWide { field, bits });
        }
    }

    let header_bits = desc.type_bits + desc.instance_id_bits + desc.primitive_index_bits;
    if header_bits > 64 {
        return Err(ConfigError::HeaderTooWide(header_bits));
    }

    if header_bits > 32 && desc.type_bits + desc.instance_id_bits > 32 {
        return Err(ConfigError::InstanceWordOverflow(desc.type_bits + desc.instance_id_bits));
    }

    if desc.use_compression {
        if header_bits > 32 {
            return Err(ConfigError::CompressionHeaderTooWide(header_bits));
        }
        if desc.geometry_types.needs_wide_payload() {
            return Err(ConfigError::CompressionUnsupportedGeometry);
        }
        // Compressed volume hits keep the phase parameter in word 0's low half
        if desc.type_bits > 16 {
            return Err(ConfigError::CompressionTypeBitsTooWide(desc.type_bits));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(type_bits: u32, instance_id_bits: u32, primitive_index_bits: u32) -> HitInfoConfigDesc {
        HitInfoConfigDesc {
            type_bits,
            instance_id_bits,
            primitive_index_bits,
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_offsets() {
        let config = HitInfoConfig::new(desc(4, 12, 16)).unwrap();
        assert_eq!(config.type_offset(), 28);
        assert_eq!(config.instance_id_offset(), 16);
        assert_eq!(config.header_bits(), 32);
        assert!(config.single_word_header());
        assert_eq!(config.packed_words(), 4);
        assert_eq!(config.packed_size_in_bytes(), 16);
    }

    #[test]
    fn test_two_word_header() {
        let config = HitInfoConfig::new(desc(3, 20, 24)).unwrap();
        assert_eq!(config.header_bits(), 47);
        assert!(!config.single_word_header());
    }

    #[test]
    fn test_default_is_valid() {
        let config = HitInfoConfig::default();
        assert_eq!(HitInfoConfig::new(*config.desc()).unwrap(), config);
        assert_eq!(config.header_bits(), 32);
    }

    #[test]
    fn test_rejects_narrow_type_field() {
        assert_eq!(
            HitInfoConfig::new(desc(2, 12, 16)),
            Err(ConfigError::TypeBitsTooSmall { bits: 2, count: 6 })
        );
    }

    #[test]
    fn test_rejects_wide_headers() {
        assert_eq!(
            HitInfoConfig::new(desc(3, 30, 33)),
            Err(ConfigError::FieldTooWide {
                field: "primitive_index_bits",
                bits: 33
            })
        );
        assert_eq!(HitInfoConfig::new(desc(8, 24, 32)).map(|c| c.header_bits()), Ok(64));
        assert_eq!(
            HitInfoConfig::new(desc(8, 25, 32)),
            Err(ConfigError::HeaderTooWide(65))
        );
        assert_eq!(
            HitInfoConfig::new(desc(4, 30, 8)),
            Err(ConfigError::InstanceWordOverflow(34))
        );
    }

    #[test]
    fn test_compression_rules() {
        let compressed = HitInfoConfigDesc {
            use_compression: true,
            geometry_types: GeometryTypes::TRIANGLES_ONLY,
            ..Default::default()
        };
        let config = HitInfoConfig::new(compressed).unwrap();
        assert_eq!(config.packed_words(), 2);
        assert_eq!(config.packed_size_in_bytes(), 8);

        let with_curves = HitInfoConfigDesc {
            geometry_types: GeometryTypes::ALL,
            ..compressed
        };
        assert_eq!(
            HitInfoConfig::new(with_curves),
            Err(ConfigError::CompressionUnsupportedGeometry)
        );

        let wide_header = HitInfoConfigDesc {
            instance_id_bits: 16,
            primitive_index_bits: 20,
            ..compressed
        };
        assert_eq!(
            HitInfoConfig::new(wide_header),
            Err(ConfigError::CompressionHeaderTooWide(39))
        );

        let wide_type = HitInfoConfigDesc {
            type_bits: 17,
            instance_id_bits: 5,
            primitive_index_bits: 10,
            ..compressed
        };
        assert_eq!(
            HitInfoConfig::new(wide_type),
            Err(ConfigError::CompressionTypeBitsTooWide(17))
        );
    }

    #[test]
    fn test_from_scene() {
        let stats = SceneStats {
            instance_count: 1000,
            max_primitive_count: 70000,
            geometry_types: GeometryTypes::ALL,
            sdf_grid_backend: SdfGridBackend::SparseVoxelSet,
        };
        let config = HitInfoConfig::from_scene(&stats, false).unwrap();
        assert_eq!(config.type_bits(), 3);
        assert_eq!(config.instance_id_bits(), 10);
        assert_eq!(config.primitive_index_bits(), 17);
        assert_eq!(config.sdf_grid_backend(), SdfGridBackend::SparseVoxelSet);
    }

    #[test]
    fn test_from_scene_drops_compression() {
        let stats = SceneStats {
            instance_count: 4,
            max_primitive_count: 12,
            geometry_types: GeometryTypes::ALL,
            ..Default::default()
        };
        let config = HitInfoConfig::from_scene(&stats, true).unwrap();
        assert!(!config.use_compression());

        let triangles = SceneStats {
            geometry_types: GeometryTypes::TRIANGLES_ONLY,
            ..stats
        };
        let config = HitInfoConfig::from_scene(&triangles, true).unwrap();
        assert!(config.use_compression());
        assert_eq!(config.packed_words(), 2);
    }

    #[test]
    fn test_from_scene_single_instance() {
        // One instance and one primitive need no addressing bits at all
        let stats = SceneStats {
            instance_count: 1,
            max_primitive_count: 1,
            ..Default::default()
        };
        let config = HitInfoConfig::from_scene(&stats, false).unwrap();
        assert_eq!(config.instance_id_bits(), 0);
        assert_eq!(config.primitive_index_bits(), 0);
        assert_eq!(config.header_bits(), 3);
    }

    #[test]
    fn test_shader_defines() {
        let config = HitInfoConfig::new(desc(4, 12, 16)).unwrap();
        let defines = config.shader_defines();

        let lookup = |name: &str| {
            defines
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(lookup("HIT_INFO_USE_COMPRESSION"), Some("0"));
        assert_eq!(lookup("HIT_INFO_TYPE_BITS"), Some("4"));
        assert_eq!(lookup("HIT_INFO_INSTANCE_ID_BITS"), Some("12"));
        assert_eq!(lookup("HIT_INFO_PRIMITIVE_INDEX_BITS"), Some("16"));
        assert_eq!(lookup("SCENE_SDF_GRID_IMPLEMENTATION"), Some("1"));
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{
            "use_compression": false,
            "type_bits": 4,
            "instance_id_bits": 12,
            "primitive_index_bits": 16,
            "geometry_types": { "curve": false },
            "sdf_grid_backend": "sparse_voxel_octree"
        }"#;
        let config: HitInfoConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.header_bits(), 32);
        assert!(config.geometry_types().triangle_mesh);
        assert!(!config.geometry_types().curve);
        assert_eq!(config.sdf_grid_backend(), SdfGridBackend::SparseVoxelOctree);

        let roundtrip: HitInfoConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(roundtrip, config);
    }

    #[test]
    fn test_load_from_json_validates() {
        let json = r#"{ "type_bits": 2 }"#;
        assert!(serde_json::from_str::<HitInfoConfig>(json).is_err());
    }
}
