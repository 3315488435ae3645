/// Edit-distance similarity in `[0, 1]`: `1 - levenshtein(a, b) / max(len(a), len(b))`.
///
/// Lengths are counted in characters. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(a, b) as f64 / max_len as f64
}
