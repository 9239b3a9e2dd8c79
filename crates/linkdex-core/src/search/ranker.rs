//! Exact cosine-similarity ranking.
//!
//! Brute force over every corpus row: O(N*D) time and O(N) extra space per
//! query. Row norms come precomputed from the [`EmbeddingMatrix`]; the query
//! norm is computed once per call.
//!
//! A zero-norm query or row scores exactly 0.0 instead of NaN, so the
//! ordering is total and reproducible. Norms and products are computed on
//! rescaled components, so finite vectors with very large or very small
//! magnitudes neither overflow to `inf` nor underflow to zero.

use std::cmp::Ordering;

use crate::corpus::EmbeddingMatrix;

/// A corpus index paired with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub index: usize,
    pub score: f64,
}

/// Euclidean norm, accumulated relative to the largest component.
pub fn l2_norm(v: &[f64]) -> f64 {
    let scale = v.iter().fold(0.0_f64, |max, x| max.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = v
        .iter()
        .map(|x| {
            let y = x / scale;
            y * y
        })
        .sum();
    scale * sum.sqrt()
}

/// Cosine similarity of two equal-length vectors, 0.0 if either is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
}

fn cosine_with_norms(a: &[f64], a_norm: f64, b: &[f64], b_norm: f64) -> f64 {
    if a_norm == 0.0 || b_norm == 0.0 || !a_norm.is_finite() || !b_norm.is_finite() {
        return 0.0;
    }
    // Each factor is in [-1, 1], so the sum cannot overflow.
    let score: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x / a_norm) * (y / b_norm))
        .sum();
    if score.is_nan() { 0.0 } else { score.clamp(-1.0, 1.0) }
}

/// Score every row of `matrix` against `query` and sort descending.
///
/// The sort is stable: rows with equal scores keep their corpus order.
/// `query` must have the matrix's dimension; the search service checks this
/// before calling.
pub fn rank(query: &[f64], matrix: &EmbeddingMatrix) -> Vec<Scored> {
    debug_assert!(matrix.rows() == 0 || query.len() == matrix.dimension());

    let query_norm = l2_norm(query);
    let mut scored: Vec<Scored> = matrix
        .iter()
        .enumerate()
        .map(|(index, (row, row_norm))| Scored {
            index,
            score: cosine_with_norms(query, query_norm, row, row_norm),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> EmbeddingMatrix {
        let mut m = EmbeddingMatrix::with_dimension(rows[0].len(), rows.len());
        for row in rows {
            m.push(row);
        }
        m
    }

    fn order(scored: &[Scored]) -> Vec<usize> {
        scored.iter().map(|s| s.index).collect()
    }

    #[test]
    fn test_rank_basic_example() {
        let m = matrix(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
        let ranked = rank(&[1.0, 0.0], &m);

        assert_eq!(order(&ranked), vec![0, 2, 1]);
        assert!((ranked[0].score - 1.0).abs() < 1e-12);
        assert!((ranked[1].score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn test_rank_is_total_over_corpus() {
        let m = matrix(&[&[1.0], &[-1.0], &[2.0], &[0.5]]);
        assert_eq!(rank(&[1.0], &m).len(), 4);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let m = matrix(&[&[0.0, 1.0], &[2.0, 0.0], &[0.0, 3.0], &[1.0, 0.0], &[0.0, 0.5]]);
        let ranked = rank(&[0.0, 1.0], &m);
        assert_eq!(order(&ranked), vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn test_zero_row_scores_zero() {
        let m = matrix(&[&[0.0, 0.0], &[-1.0, 0.0], &[1.0, 0.0]]);
        let ranked = rank(&[1.0, 0.0], &m);

        assert_eq!(order(&ranked), vec![2, 0, 1]);
        assert_eq!(ranked[1].score, 0.0);
        assert!(ranked.iter().all(|s| !s.score.is_nan()));
    }

    #[test]
    fn test_zero_query_scores_everything_zero_in_corpus_order() {
        let m = matrix(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0]]);
        let ranked = rank(&[0.0, 0.0], &m);

        assert_eq!(order(&ranked), vec![0, 1, 2]);
        assert!(ranked.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn test_ranking_invariant_under_positive_scaling() {
        let rows: [&[f64]; 4] = [
            &[0.3, 0.9, -0.1],
            &[1.0, 0.2, 0.4],
            &[-0.5, 0.5, 0.5],
            &[0.2, 0.1, 0.9],
        ];
        let query = [0.4, 0.6, 0.2];
        let baseline = order(&rank(&query, &matrix(&rows)));

        let scaled_query: Vec<f64> = query.iter().map(|v| v * 7.5).collect();
        assert_eq!(order(&rank(&scaled_query, &matrix(&rows))), baseline);

        let scaled_row: Vec<f64> = rows[1].iter().map(|v| v * 0.01).collect();
        let mut scaled_rows: Vec<&[f64]> = rows.to_vec();
        scaled_rows[1] = scaled_row.as_slice();
        assert_eq!(order(&rank(&query, &matrix(&scaled_rows))), baseline);
    }

    #[test]
    fn test_norm_of_extreme_magnitudes_stays_finite() {
        assert!((l2_norm(&[3e200, 4e200]) / 5e200 - 1.0).abs() < 1e-12);
        assert!((l2_norm(&[3e-200, 4e-200]) / 5e-200 - 1.0).abs() < 1e-12);
        assert_eq!(l2_norm(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_extreme_rows_rank_like_unit_rows() {
        let m = matrix(&[&[1e200, 0.0], &[0.0, 1e200], &[1e200, 1e200]]);
        let ranked = rank(&[1e-200, 0.0], &m);

        assert_eq!(order(&ranked), vec![0, 2, 1]);
        assert!((ranked[0].score - 1.0).abs() < 1e-12);
        assert!((ranked[1].score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn test_scaling_invariance_holds_for_large_factors() {
        let rows: [&[f64]; 3] = [&[0.3, 0.9, -0.1], &[1.0, 0.2, 0.4], &[0.2, 0.1, 0.9]];
        let query = [0.4, 0.6, 0.2];
        let baseline = order(&rank(&query, &matrix(&rows)));

        let scaled_row: Vec<f64> = rows[1].iter().map(|v| v * 1e300).collect();
        let mut scaled_rows: Vec<&[f64]> = rows.to_vec();
        scaled_rows[1] = scaled_row.as_slice();
        assert_eq!(order(&rank(&query, &matrix(&scaled_rows))), baseline);
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[-3.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_rank_empty_matrix() {
        let m = EmbeddingMatrix::default();
        assert!(rank(&[1.0, 0.0], &m).is_empty());
    }
}
