/// Formats a real in its shortest round-trip form.
///
/// Integral values keep a trailing `.0` (`1.0`, `-2.0`) and very small or very large
/// magnitudes switch to exponent notation, so the output always parses back to the
/// same `f64`.
pub fn format_real(x: f64) -> String {
    format!("{:?}", x)
}

/// Parses a real token, accepting both `1e-5` and `1e+20` exponent styles.
pub fn parse_real(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

/// Row-major linear index of `(i, j)` in a grid with `y` columns.
pub fn linear_index_2d(i: usize, j: usize, y: usize) -> usize {
    i * y + j
}

/// Row-major linear index of `(i, j, k)` in a grid of shape `_ × y × z`.
pub fn linear_index_3d(i: usize, j: usize, k: usize, y: usize, z: usize) -> usize {
    i * y * z + j * z + k
}
