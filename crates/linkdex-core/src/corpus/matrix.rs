//! Dense row-major embedding matrix with precomputed row norms.

use crate::search::ranker::l2_norm;

/// N x D matrix of corpus embeddings.
///
/// Rows are appended once during load; after that the matrix is only read.
/// Row norms are computed on push so ranking never renormalizes the corpus.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingMatrix {
    data: Vec<f64>,
    norms: Vec<f64>,
    dimension: usize,
}

impl EmbeddingMatrix {
    pub(crate) fn with_dimension(dimension: usize, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(dimension * capacity),
            norms: Vec::with_capacity(capacity),
            dimension,
        }
    }

    /// Append a row. The caller has already checked its length.
    pub(crate) fn push(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.dimension);
        self.data.extend_from_slice(row);
        self.norms.push(l2_norm(row));
    }

    /// Number of rows (N).
    pub fn rows(&self) -> usize {
        self.norms.len()
    }

    /// Row width (D). Zero for an empty corpus.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// Precomputed Euclidean norm of row `index`.
    pub fn norm(&self, index: usize) -> f64 {
        self.norms[index]
    }

    /// Iterate `(row, norm)` pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64)> + '_ {
        let dimension = self.dimension.max(1);
        self.data
            .chunks_exact(dimension)
            .zip(self.norms.iter().copied())
    }
}
