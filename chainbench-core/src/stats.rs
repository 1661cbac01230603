//! Sample reduction

use crate::types::Summary;

/// Round to two decimal digits.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reduce a sample sequence to its rounded (max, min, average).
///
/// Returns `None` for an empty sequence; callers decide whether that is an
/// error or a sentinel.
pub fn reduce(samples: &[f64]) -> Option<Summary> {
    if samples.is_empty() {
        return None;
    }

    let (max, min, sum) = samples.iter().fold(
        (f64::NEG_INFINITY, f64::INFINITY, 0.0),
        |(max, min, sum), &v| (max.max(v), min.min(v), sum + v),
    );
    let average = sum / samples.len() as f64;

    Some(Summary {
        max: round2(max),
        min: round2(min),
        average: round2(average),
    })
}
