//! Consumer side: decode a hit buffer into per-type statistics.

use hitpack_core::{HitType, PackedHitBuffer};

/// Per-type record counts for a traced batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitSummary {
    counts: [usize; HitType::COUNT as usize],
    /// Smallest `t` of any volume hit
    pub nearest_volume_t: Option<f32>,
}

impl HitSummary {
    /// Decode every record in `buffer`.
    pub fn from_buffer(buffer: &PackedHitBuffer) -> Self {
        let mut summary = Self::default();
        for record in buffer.records() {
            let hit_type = record.hit_type();
            summary.counts[hit_type.raw() as usize] += 1;

            if let Some(volume) = record.try_volume_hit() {
                summary.nearest_volume_t = Some(match summary.nearest_volume_t {
                    Some(t) => t.min(volume.t),
                    None => volume.t,
                });
            }
        }
        summary
    }

    /// Number of records of `hit_type`.
    pub fn count(&self, hit_type: HitType) -> usize {
        self.counts[hit_type.raw() as usize]
    }

    /// Number of valid records.
    pub fn hits(&self) -> usize {
        self.counts.iter().sum::<usize>() - self.count(HitType::None)
    }

    /// Number of records in the batch.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl std::fmt::Display for HitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} hits / {} rays", self.hits(), self.total())?;
        for hit_type in HitType::ALL.into_iter().skip(1) {
            let count = self.count(hit_type);
            if count > 0 {
                write!(f, ", {}: {}", hit_type, count)?;
            }
        }
        Ok(())
    }
}
