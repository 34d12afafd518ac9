//! Queue-depth classification and bucket selection.

use rand::Rng;

/// Queue-depth thresholds separating the fairness buckets.
///
/// A project falls in the first bucket whose threshold is strictly greater
/// than its current depth; everything at or past the last threshold shares
/// the open-ended overflow bucket.
pub const BUCKET_THRESHOLDS: [usize; 3] = [1, 10, 50];

/// Number of buckets, including the open-ended overflow bucket.
pub const BUCKET_COUNT: usize = BUCKET_THRESHOLDS.len() + 1;

/// Bucket index for a project whose job list currently holds `depth` builds.
///
/// Depth is sampled before the enqueue push, so a project's first build
/// classifies at depth zero into bucket zero.
pub fn bucket_for(depth: usize) -> usize {
    BUCKET_THRESHOLDS
        .iter()
        .position(|&threshold| depth < threshold)
        .unwrap_or(BUCKET_THRESHOLDS.len())
}

/// How dequeue picks the bucket it scans first.
///
/// Whatever the starting point, one pass wraps across every bucket, so no
/// bucket is unreachable on a quiet queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Start-bucket weight halves with each bucket index, favoring the
    /// buckets that hold lightly-queued projects.
    #[default]
    Weighted,
    /// All start buckets equally likely.
    Uniform,
}

impl SelectionPolicy {
    /// Bucket indices in the order one dequeue pass visits them.
    pub fn scan_order(&self, rng: &mut impl Rng) -> [usize; BUCKET_COUNT] {
        let start = self.sample_start(rng);
        std::array::from_fn(|i| (start + i) % BUCKET_COUNT)
    }

    fn sample_start(&self, rng: &mut impl Rng) -> usize {
        match self {
            Self::Uniform => rng.random_range(0..BUCKET_COUNT),
            Self::Weighted => {
                // Weights 8:4:2:1 over buckets 0..4; the total is 2^n - 1.
                let mut draw = rng.random_range(0..(1usize << BUCKET_COUNT) - 1);
                for bucket in 0..BUCKET_COUNT {
                    let weight = 1 << (BUCKET_COUNT - 1 - bucket);
                    if draw < weight {
                        return bucket;
                    }
                    draw -= weight;
                }
                BUCKET_COUNT - 1
            }
        }
    }
}
