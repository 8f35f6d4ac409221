//! Stationary distributions via a dense linear solve per recurrent class.
//!
//! A recurrent class has no outgoing transitions, so the matrix restricted
//! to it is itself row-stochastic and irreducible, and carries exactly one
//! stationary distribution. It is found by solving `(Q^T - I) x = 0` with
//! one equation replaced by the normalization constraint `sum(x) = 1`;
//! because the rows of `Q^T - I` sum to the zero row, replacing any one of
//! them keeps the system nonsingular.

use std::collections::BTreeSet;

use tracing::debug;

use crate::classes::{ClassKind, ClassPartition};
use crate::error::ConstructionError;
use crate::matrix::{TransitionMatrix, EPSILON};

/// The stationary distributions of a chain.
///
/// The shape depends on reducibility and is intentionally inspectable
/// rather than flattened: an irreducible chain has exactly one stationary
/// distribution, a reducible chain has one per recurrent class.
#[derive(Debug, Clone, PartialEq)]
pub enum SteadyStates {
    /// Irreducible chain: the unique stationary distribution over all states.
    Unique(Vec<f64>),
    /// Reducible chain: one length-N vector per recurrent class, in class
    /// order, each supported on its class and zero elsewhere.
    PerClass(Vec<Vec<f64>>),
}

impl SteadyStates {
    /// Returns all distribution vectors regardless of shape.
    pub fn vectors(&self) -> Vec<&[f64]> {
        match self {
            SteadyStates::Unique(v) => vec![v.as_slice()],
            SteadyStates::PerClass(vs) => vs.iter().map(|v| v.as_slice()).collect(),
        }
    }
}

/// Solves the stationary distribution(s) of a validated chain.
///
/// # Errors
///
/// Returns [`ConstructionError::SteadyStateSolve`] if a class system turns
/// out numerically singular, which cannot happen for a matrix that passed
/// validation.
pub fn solve(
    matrix: &TransitionMatrix,
    partition: &ClassPartition,
) -> Result<SteadyStates, ConstructionError> {
    let n = matrix.n_states();
    let mut dists = Vec::new();

    for (idx, class) in partition
        .classes_of_kind(ClassKind::Recurrent)
        .into_iter()
        .enumerate()
    {
        let pi = class_distribution(matrix, class)
            .ok_or(ConstructionError::SteadyStateSolve { class: idx })?;
        let mut full = vec![0.0; n];
        for (k, &s) in class.iter().enumerate() {
            full[s] = pi[k];
        }
        dists.push(full);
    }

    debug!(
        n_states = n,
        n_distributions = dists.len(),
        irreducible = partition.is_irreducible(),
        "stationary distributions solved"
    );

    if partition.is_irreducible() {
        if let Some(d) = dists.pop() {
            return Ok(SteadyStates::Unique(d));
        }
    }
    Ok(SteadyStates::PerClass(dists))
}

/// Solves the stationary distribution of one recurrent class, returned in
/// class iteration order over the class members.
fn class_distribution(matrix: &TransitionMatrix, class: &BTreeSet<usize>) -> Option<Vec<f64>> {
    let states: Vec<usize> = class.iter().copied().collect();
    let k = states.len();

    // A = Q^T - I over the class sub-chain, last row replaced by ones.
    let mut a = vec![vec![0.0; k]; k];
    let mut b = vec![0.0; k];
    for r in 0..k {
        for c in 0..k {
            a[r][c] = if r + 1 == k {
                1.0
            } else {
                let q = matrix.prob(states[c], states[r]);
                if r == c { q - 1.0 } else { q }
            };
        }
    }
    b[k - 1] = 1.0;

    let mut x = solve_dense(a, b)?;

    // Clamp rounding noise below zero, then renormalize.
    for v in x.iter_mut() {
        if *v < 0.0 {
            *v = 0.0;
        }
    }
    let sum: f64 = x.iter().sum();
    if sum <= EPSILON {
        return None;
    }
    for v in x.iter_mut() {
        *v /= sum;
    }
    Some(x)
}

/// Gaussian elimination with partial pivoting; `None` on a singular system.
fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let k = b.len();

    // Singularity is judged relative to the matrix scale so that badly
    // scaled but well-conditioned systems (sub-tolerance transition
    // probabilities) are not rejected.
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |m, &v| m.max(v.abs()));
    if scale == 0.0 {
        return None;
    }
    let pivot_min = scale * f64::EPSILON;

    for col in 0..k {
        let mut pivot = col;
        for r in col + 1..k {
            if a[r][col].abs() > a[pivot][col].abs() {
                pivot = r;
            }
        }
        if a[pivot][col].abs() <= pivot_min {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for r in col + 1..k {
            let f = a[r][col] / a[col][col];
            if f == 0.0 {
                continue;
            }
            for c in col..k {
                a[r][c] -= f * a[col][c];
            }
            b[r] -= f * b[col];
        }
    }

    let mut x = vec![0.0; k];
    for col in (0..k).rev() {
        let mut s = b[col];
        for c in col + 1..k {
            s -= a[col][c] * x[c];
        }
        x[col] = s / a[col][col];
    }
    Some(x)
}
