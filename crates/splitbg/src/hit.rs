/// Slice under a horizontal position given as a fraction of the width.
///
/// The first split at or beyond the position wins; past the last split the
/// position belongs to the final slice.
pub fn slice_at(fraction: f64, splits: &[f64]) -> usize {
    splits
        .iter()
        .position(|split| fraction <= *split)
        .unwrap_or(splits.len())
}
