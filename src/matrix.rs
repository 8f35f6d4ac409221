//! Validated row-stochastic transition matrices.

use crate::error::ConstructionError;

/// Absolute tolerance for floating-point checks (row sums, zero pivots,
/// clamping rounding noise in solved distributions).
pub const EPSILON: f64 = 1e-8;

/// A validated N x N row-stochastic transition matrix.
///
/// Row `i` holds the probabilities of transitioning from state `i` to each
/// state `j`. Construction checks shape, finiteness, non-negativity, and row
/// sums; the matrix is immutable afterwards, so every derived structure can
/// be computed once and trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n: usize,
    /// Row-major, length `n * n`.
    probs: Vec<f64>,
}

impl TransitionMatrix {
    /// Validates and takes ownership of a matrix given as nested rows.
    ///
    /// Checks, in order: every row has length equal to the row count, the
    /// matrix is non-empty, every entry is finite and non-negative, and
    /// every row sums to 1 within [`EPSILON`].
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] naming the first check that failed.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ConstructionError> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(ConstructionError::NotSquare {
                    rows: n,
                    row: i,
                    len: row.len(),
                });
            }
        }
        if n == 0 {
            return Err(ConstructionError::Empty);
        }

        let mut probs = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            let mut sum = 0.0;
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() {
                    return Err(ConstructionError::NonFinite {
                        row: i,
                        col: j,
                        value: p,
                    });
                }
                if p < 0.0 {
                    return Err(ConstructionError::NegativeEntry {
                        row: i,
                        col: j,
                        value: p,
                    });
                }
                sum += p;
                probs.push(p);
            }
            if (sum - 1.0).abs() > EPSILON {
                return Err(ConstructionError::RowSum { row: i, sum });
            }
        }

        Ok(Self { n, probs })
    }

    /// Returns the number of states N.
    pub fn n_states(&self) -> usize {
        self.n
    }

    /// Returns the probability of transitioning from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        assert!(from < self.n && to < self.n, "state index out of range");
        self.probs[from * self.n + to]
    }

    /// Returns the transition probabilities out of `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is out of range.
    pub fn row(&self, from: usize) -> &[f64] {
        assert!(from < self.n, "state index out of range");
        &self.probs[from * self.n..(from + 1) * self.n]
    }
}
