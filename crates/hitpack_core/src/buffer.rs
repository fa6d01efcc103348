//! Flat storage for many packed records, laid out for GPU upload.

use thiserror::Error;

use crate::config::HitInfoConfig;
use crate::packed::PackedHitInfo;
use crate::record::HitRecord;

/// Errors that can occur when adopting raw buffer contents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("buffer of {len} bytes is not a whole number of {stride}-byte records")]
    PartialRecord { len: usize, stride: usize },
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Array of packed hit records, one per ray.
///
/// Records are stored back to back at the configuration's wire stride
/// (2 or 4 words). A new buffer is zero-filled, so every slot starts as
/// an invalid record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedHitBuffer {
    config: HitInfoConfig,
    words: Vec<u32>,
}

impl PackedHitBuffer {
    /// Create a buffer of `len` invalid records.
    pub fn new(config: HitInfoConfig, len: usize) -> Self {
        Self {
            config,
            words: vec![0; len * config.packed_words()],
        }
    }

    /// Adopt bytes read back from storage. The slice needs no particular alignment.
    pub fn from_bytes(config: HitInfoConfig, bytes: &[u8]) -> BufferResult<Self> {
        let stride = config.packed_size_in_bytes();
        if bytes.len() % stride != 0 {
            return Err(BufferError::PartialRecord {
                len: bytes.len(),
                stride,
            });
        }
        Ok(Self {
            config,
            words: bytemuck::pod_collect_to_vec(bytes),
        })
    }

    pub fn config(&self) -> &HitInfoConfig {
        &self.config
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.words.len() / self.config.packed_words()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Write a record into slot `index`. Words beyond the wire stride are dropped.
    pub fn store(&mut self, index: usize, packed: &PackedHitInfo) {
        let stride = self.config.packed_words();
        let slot = &mut self.words[index * stride..(index + 1) * stride];
        slot.copy_from_slice(packed.words(&self.config));
    }

    /// Read the record in slot `index`.
    pub fn record(&self, index: usize) -> HitRecord {
        let stride = self.config.packed_words();
        let slot = &self.words[index * stride..(index + 1) * stride];
        HitRecord::new(self.config, PackedHitInfo::from_words(slot))
    }

    /// Iterate over all records in slot order.
    pub fn records(&self) -> impl Iterator<Item = HitRecord> + '_ {
        self.words
            .chunks_exact(self.config.packed_words())
            .map(move |slot| HitRecord::new(self.config, PackedHitInfo::from_words(slot)))
    }

    /// One mutable word slice per record. Slots are disjoint, so each can
    /// be handed to a different producer.
    pub fn slots_mut(&mut self) -> std::slice::ChunksExactMut<'_, u32> {
        let stride = self.config.packed_words();
        self.words.chunks_exact_mut(stride)
    }

    /// Raw words, for parallel producers that split the buffer themselves.
    pub fn words_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Buffer contents as bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HitInfoConfigDesc;
    use crate::header::GeometryInstanceId;
    use crate::hit_type::{GeometryTypes, HitType};
    use crate::hits::{HitCodec, TriangleHit, VolumeHit};
    use hitpack_math::Vec2;

    fn compressed() -> HitInfoConfig {
        HitInfoConfig::new(HitInfoConfigDesc {
            use_compression: true,
            geometry_types: GeometryTypes::TRIANGLES_ONLY,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_buffer_is_invalid() {
        let buffer = PackedHitBuffer::new(HitInfoConfig::default(), 8);
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.words().len(), 32);
        assert!(buffer.records().all(|record| !record.is_valid()));
    }

    #[test]
    fn test_store_and_read() {
        let config = compressed();
        let mut buffer = PackedHitBuffer::new(config, 3);
        let hit = TriangleHit::new(GeometryInstanceId(2), 5, Vec2::new(0.0, 1.0));
        buffer.store(1, &hit.pack(&config));

        assert_eq!(buffer.words().len(), 6);
        assert!(!buffer.record(0).is_valid());
        assert_eq!(buffer.record(1).try_triangle_hit(), Some(hit));
        assert!(!buffer.record(2).is_valid());
    }

    #[test]
    fn test_slots_are_disjoint() {
        let config = HitInfoConfig::default();
        let mut buffer = PackedHitBuffer::new(config, 4);
        for (i, slot) in buffer.slots_mut().enumerate() {
            slot.copy_from_slice(VolumeHit::new(i as f32, 0.0).pack(&config).words(&config));
        }

        for (i, record) in buffer.records().enumerate() {
            assert_eq!(record.hit_type(), HitType::Volume);
            assert_eq!(record.volume_hit().t, i as f32);
        }
    }

    #[test]
    fn test_bytes_roundtrip() {
        let config = compressed();
        let mut buffer = PackedHitBuffer::new(config, 2);
        buffer.store(0, &VolumeHit::new(3.0, 0.5).pack(&config));

        let bytes = buffer.as_bytes().to_vec();
        assert_eq!(bytes.len(), 2 * config.packed_size_in_bytes());

        let restored = PackedHitBuffer::from_bytes(config, &bytes).unwrap();
        assert_eq!(restored, buffer);
        assert_eq!(restored.record(0).volume_hit().t, 3.0);
    }

    #[test]
    fn test_from_bytes_rejects_partial_record() {
        let config = HitInfoConfig::default();
        assert_eq!(
            PackedHitBuffer::from_bytes(config, &[0u8; 20]),
            Err(BufferError::PartialRecord { len: 20, stride: 16 })
        );
    }

    #[test]
    fn test_from_bytes_unaligned() {
        let config = compressed();
        let storage = [0u8; 17];
        // Offset by one byte so the slice is not u32-aligned
        let buffer = PackedHitBuffer::from_bytes(config, &storage[1..]).unwrap();
        assert_eq!(buffer.len(), 2);
    }
}
