/// Divide each bin by the volume factor `(R + dr)^3 - R^3` of its shell,
/// with `R = i * dr`. The `4 pi / 3` prefactor is already folded into the
/// per-pair weight.
///
/// Applying this to its own output divides a second time.
pub fn normalize_shells(values: &[f64], bin_width: f64) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let r = i as f64 * bin_width;
            let shell = (r + bin_width).powi(3) - r.powi(3);
            (r, value / shell)
        })
        .collect()
}
