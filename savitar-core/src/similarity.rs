//! Cosine similarity between feature vectors.
//!
//! All functions here are pure and safe to call from any number of threads.

use crate::error::{Error, Result};

/// Computes the cosine similarity of two equal-length vectors.
///
/// Formula: (a · b) / (||a|| * ||b||)
/// Range: [-1, 1] where 1 = same direction, -1 = opposite direction.
///
/// Dot product and both squared norms are accumulated in a single pass.
///
/// # Errors
///
/// - [`Error::LengthMismatch`] if the lengths differ.
/// - [`Error::ZeroVector`] if either vector has zero norm.
/// - [`Error::NonFiniteValue`] if either vector holds NaN or an infinity,
///   which only happens when insert validation is switched off.
///
/// # Example
///
/// ```
/// use savitar_core::similarity::cosine_similarity;
///
/// let s = cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]).unwrap();
/// assert!((s - 1.0).abs() < 1e-12);
/// ```
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = accumulate(a, b, 1.0, 1.0);
    if dot.is_finite() && well_scaled(norm_a) && well_scaled(norm_b) {
        return Ok(ratio(dot, norm_a, norm_b));
    }

    // Overflow or underflow in the squares: redo the pass with each vector
    // divided by its largest magnitude, which keeps every term in [-1, 1].
    let scale_a = max_abs(a)?;
    let scale_b = max_abs(b)?;
    if scale_a == 0.0 || scale_b == 0.0 {
        return Err(Error::ZeroVector);
    }
    let (dot, norm_a, norm_b) = accumulate(a, b, scale_a, scale_b);
    Ok(ratio(dot, norm_a, norm_b))
}

#[inline]
fn accumulate(a: &[f64], b: &[f64], scale_a: f64, scale_b: f64) -> (f64, f64, f64) {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    (dot, norm_a, norm_b)
}

#[inline]
fn well_scaled(squared_norm: f64) -> bool {
    squared_norm.is_finite() && squared_norm >= f64::MIN_POSITIVE
}

/// Largest absolute component, or the position of the first NaN/infinity.
fn max_abs(v: &[f64]) -> Result<f64> {
    let mut max = 0.0f64;
    for (index, x) in v.iter().enumerate() {
        if !x.is_finite() {
            return Err(Error::NonFiniteValue { index });
        }
        max = max.max(x.abs());
    }
    Ok(max)
}

#[inline]
fn ratio(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    // Rounding can push the ratio a hair outside [-1, 1].
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Computes the Euclidean (L2) norm of a vector.
#[inline]
pub fn norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}
