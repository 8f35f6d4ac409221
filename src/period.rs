//! Period computation via cycle-length GCD, one traversal per class.
//!
//! Every state in a communicating class shares the same period, so the
//! period is computed once per class rather than once per state: a BFS from
//! any member assigns root distances, and every intra-class edge `(u, v)`
//! closes a walk of length `dist[u] + 1 - dist[v]` whose absolute value is
//! folded into a running GCD.

use std::collections::{BTreeSet, VecDeque};

use crate::graph::StateGraph;

/// Returns the common period of all states in `class`, or `None` if the
/// class contains no cycle (a singleton without a self-loop).
///
/// `class` must be a communicating class of `graph`; members outside the
/// class are never visited.
pub fn class_period(graph: &StateGraph, class: &BTreeSet<usize>) -> Option<u64> {
    let root = *class.iter().next()?;

    let mut dist: Vec<Option<i64>> = vec![None; graph.n_states()];
    dist[root] = Some(0);
    let mut queue = VecDeque::from([root]);
    let mut g: u64 = 0;

    while let Some(u) = queue.pop_front() {
        let du = dist[u].unwrap_or(0);
        for &v in graph.successors(u) {
            if !class.contains(&v) {
                continue;
            }
            match dist[v] {
                Some(dv) => {
                    // Closing edge: fold the walk-length difference.
                    g = gcd(g, (du + 1 - dv).unsigned_abs());
                }
                None => {
                    dist[v] = Some(du + 1);
                    queue.push_back(v);
                }
            }
        }
    }

    if g == 0 { None } else { Some(g) }
}

/// Greatest common divisor with `gcd(0, x) = x`.
fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassPartition;
    use crate::matrix::TransitionMatrix;

    fn graph(rows: Vec<Vec<f64>>) -> StateGraph {
        StateGraph::from_matrix(&TransitionMatrix::new(rows).unwrap())
    }

    fn whole_class(g: &StateGraph) -> BTreeSet<usize> {
        (0..g.n_states()).collect()
    }

    #[test]
    fn gcd_basics() {
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(3, 0), 3);
        assert_eq!(gcd(5, 5), 5);
    }

    #[test]
    fn self_loop_is_aperiodic() {
        let g = graph(vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
        assert_eq!(class_period(&g, &whole_class(&g)), Some(1));
    }

    #[test]
    fn two_cycle_has_period_two() {
        let g = graph(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert_eq!(class_period(&g, &whole_class(&g)), Some(2));
    }

    #[test]
    fn three_cycle_has_period_three() {
        let g = graph(vec![
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
        ]);
        assert_eq!(class_period(&g, &whole_class(&g)), Some(3));
    }

    #[test]
    fn mixed_cycle_lengths_reduce_the_period() {
        // Cycles of length 2 and 3 through state 0 => aperiodic.
        let g = graph(vec![
            vec![0.0, 0.5, 0.5],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ]);
        assert_eq!(class_period(&g, &whole_class(&g)), Some(1));
    }

    #[test]
    fn transient_singleton_has_no_period() {
        // State 1 can never return to itself.
        let g = graph(vec![vec![1.0, 0.0], vec![1.0, 0.0]]);
        let singleton: BTreeSet<usize> = [1].into_iter().collect();
        assert_eq!(class_period(&g, &singleton), None);
    }

    #[test]
    fn seven_state_cyclic_structure_has_period_three() {
        let g = graph(vec![
            vec![0.0, 0.0, 0.5, 0.25, 0.25, 0.0, 0.0],
            vec![0.0, 0.0, 1.0 / 3.0, 0.0, 2.0 / 3.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0 / 3.0, 2.0 / 3.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.5],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.75, 0.25],
            vec![0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.25, 0.75, 0.0, 0.0, 0.0, 0.0, 0.0],
        ]);
        let p = ClassPartition::new(&g);
        assert!(p.is_irreducible());
        assert_eq!(class_period(&g, &p.classes()[0]), Some(3));
    }
}
