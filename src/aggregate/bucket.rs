//! Score distribution histogram.

/// Number of score buckets.
pub const BUCKET_COUNT: usize = 5;

/// Lower bounds of each bucket. The last bucket is unbounded above.
pub const BUCKET_LOWER_BOUNDS: [f64; BUCKET_COUNT] = [0.0, 20.0, 40.0, 60.0, 80.0];

/// Axis labels for the distribution chart.
pub const BUCKET_LABELS: [&str; BUCKET_COUNT] = ["0-20", "20-40", "40-60", "60-80", "80-100"];

/// Index of the bucket a score falls into.
///
/// Buckets are lower-inclusive and upper-exclusive. Scores below zero land in
/// the first bucket, scores at or above 80 (including 100 and beyond) in the
/// last one. NaN compares false against every bound and lands in the first.
pub fn bucket_index(score: f64) -> usize {
    BUCKET_LOWER_BOUNDS[1..]
        .iter()
        .take_while(|bound| score >= **bound)
        .count()
}

/// Count scores per bucket.
pub fn bucketize<I>(scores: I) -> [u32; BUCKET_COUNT]
where
    I: IntoIterator<Item = f64>,
{
    let mut buckets = [0u32; BUCKET_COUNT];
    for score in scores {
        buckets[bucket_index(score)] += 1;
    }
    buckets
}
