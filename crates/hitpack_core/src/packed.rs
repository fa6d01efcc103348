//! Wire representation of a hit record.

use bytemuck::{Pod, Zeroable};

use crate::config::HitInfoConfig;

/// Maximum number of 32-bit words in a packed record.
pub const MAX_PACKED_WORDS: usize = 4;

/// A hit record packed into 32-bit words.
///
/// Always stores four words; with compression enabled only the first two
/// are part of the wire format and the rest stay zero. All zeros is the
/// invalid record.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct PackedHitInfo(pub [u32; MAX_PACKED_WORDS]);

impl PackedHitInfo {
    /// The invalid record, decoding to `HitType::None`.
    pub const INVALID: PackedHitInfo = PackedHitInfo([0; MAX_PACKED_WORDS]);

    /// Build a record from wire words. Missing trailing words are zero and
    /// words past the fourth are ignored.
    pub fn from_words(words: &[u32]) -> Self {
        let mut packed = Self::INVALID;
        let n = words.len().min(MAX_PACKED_WORDS);
        packed.0[..n].copy_from_slice(&words[..n]);
        packed
    }

    /// The words that make up this record on the wire.
    #[inline]
    pub fn words(&self, config: &HitInfoConfig) -> &[u32] {
        &self.0[..config.packed_words()]
    }

    #[inline]
    pub fn word(&self, index: usize) -> u32 {
        self.0[index]
    }
}
