use super::domain::Dimension;

/// Sum of the raw (relative) weights.
pub fn raw_weight_total(dimensions: &[Dimension]) -> f64 {
    dimensions.iter().map(|dimension| dimension.weight).sum()
}

/// Rescales weights so they sum to one, preserving input order.
///
/// A zero total is replaced by one, so an all-zero input keeps every
/// normalized weight at zero rather than spreading weight uniformly.
pub fn normalize_weights(dimensions: &[Dimension]) -> Vec<(&Dimension, f64)> {
    let total = match raw_weight_total(dimensions) {
        total if total == 0.0 => 1.0,
        total => total,
    };

    dimensions
        .iter()
        .map(|dimension| (dimension, dimension.weight / total))
        .collect()
}
