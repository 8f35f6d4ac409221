//! Directed state graph implied by non-zero transition probabilities.

use std::collections::VecDeque;

use crate::matrix::TransitionMatrix;

/// Adjacency over state indices: edge `i -> j` exists iff `P[i][j] > 0`.
///
/// Built once from a validated [`TransitionMatrix`] and never mutated, so
/// successor slices can be handed out freely.
#[derive(Debug, Clone)]
pub struct StateGraph {
    succ: Vec<Vec<usize>>,
}

impl StateGraph {
    /// Builds the adjacency structure from a validated matrix.
    pub fn from_matrix(matrix: &TransitionMatrix) -> Self {
        let n = matrix.n_states();
        let succ = (0..n)
            .map(|i| (0..n).filter(|&j| matrix.prob(i, j) > 0.0).collect())
            .collect();
        Self { succ }
    }

    /// Returns the number of states.
    pub fn n_states(&self) -> usize {
        self.succ.len()
    }

    /// Returns the states directly reachable from `state` in one step.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn successors(&self, state: usize) -> &[usize] {
        &self.succ[state]
    }

    /// Returns true iff `to` is reachable from `from` along directed edges.
    ///
    /// Every state trivially reaches itself (the empty walk).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn reachable(&self, from: usize, to: usize) -> bool {
        assert!(
            from < self.n_states() && to < self.n_states(),
            "state index out of range"
        );
        if from == to {
            return true;
        }
        let mut visited = vec![false; self.n_states()];
        visited[from] = true;
        let mut queue = VecDeque::from([from]);
        while let Some(u) = queue.pop_front() {
            for &v in &self.succ[u] {
                if v == to {
                    return true;
                }
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
        false
    }
}
