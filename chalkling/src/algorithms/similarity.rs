//! Cosine scoring of a variant against the authored form.
//!
//! The flattened position vectors are compared as a single aggregate: one
//! dot product over all coordinates divided by the product of the norms.
//! Accumulation is in f64. Cosine is sensitive to translation, so a variant
//! shifted as a whole scores as deviating even if its shape is unchanged.

use crate::error::ScoreError;
use crate::geometry::tolerance::EPS_NORM;
use crate::model::Stats;
use crate::Form;

pub fn cosine_similarity(original: &[f32], variant: &[f32]) -> Result<f64, ScoreError> {
    if original.len() != variant.len() {
        return Err(ScoreError::ShapeMismatch { original: original.len(), variant: variant.len() });
    }
    let mut dot = 0.0f64;
    let mut n_o = 0.0f64;
    let mut n_v = 0.0f64;
    for (&o, &v) in original.iter().zip(variant) {
        let (o, v) = (o as f64, v as f64);
        dot += o * v;
        n_o += o * o;
        n_v += v * v;
    }
    let denom = n_o.sqrt() * n_v.sqrt();
    if !denom.is_finite() || !dot.is_finite() {
        return Err(ScoreError::NonFinite);
    }
    if n_o.sqrt() <= EPS_NORM || n_v.sqrt() <= EPS_NORM {
        return Err(ScoreError::ZeroNorm);
    }
    let cos = dot / denom;
    if !cos.is_finite() {
        return Err(ScoreError::NonFinite);
    }
    Ok(cos)
}

/// `1 - cos` between the two forms' position vectors.
pub fn deviation(original: &Form, variant: &Form) -> Result<f32, ScoreError> {
    let cos = cosine_similarity(&original.to_position_vector(), &variant.to_position_vector())?;
    Ok((1.0 - cos) as f32)
}

/// Stats for an exported variant: the original's stats scaled by the
/// deviation, with `aesthetic` set to the deviation itself.
pub fn derive_stats(original: &Form, variant: &Form) -> Result<Stats, ScoreError> {
    let dev = deviation(original, variant)?;
    let mut stats = *original.stats();
    stats.scale(dev);
    stats.aesthetic = dev;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_unit_cosine() {
        let v = [3.0, 4.0, -1.0, 2.0];
        let c = cosine_similarity(&v, &v).unwrap();
        assert!((c - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opposite_vectors() {
        let c = cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]).unwrap();
        assert!((c + 1.0).abs() < 1e-12);
    }

    #[test]
    fn failures_are_explicit() {
        assert_eq!(
            cosine_similarity(&[1.0, 2.0], &[1.0]),
            Err(ScoreError::ShapeMismatch { original: 2, variant: 1 })
        );
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), Err(ScoreError::ZeroNorm));
        assert_eq!(cosine_similarity(&[], &[]), Err(ScoreError::ZeroNorm));
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), Err(ScoreError::NonFinite));
    }

    #[test]
    fn scale_does_not_change_cosine() {
        let a = [10.0, 20.0, 30.0, 5.0];
        let b: Vec<f32> = a.iter().map(|x| x * 0.25).collect();
        let c = cosine_similarity(&a, &b).unwrap();
        assert!((c - 1.0).abs() < 1e-9);
    }
}
