//! Communicating-class decomposition and recurrence classification.
//!
//! Two states communicate iff each reaches the other, so the communicating
//! classes of a chain are exactly the strongly connected components of its
//! state graph. A class is recurrent iff no transition leaves it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::graph::StateGraph;

/// Recurrence classification of a communicating class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// No transition leaves the class; once entered, never left.
    Recurrent,
    /// At least one transition leads out of the class.
    Transient,
}

/// The communicating-class partition of a chain's state space.
///
/// Every state belongs to exactly one class. Classes are ordered by their
/// smallest state index so results are deterministic.
#[derive(Debug, Clone)]
pub struct ClassPartition {
    classes: Vec<BTreeSet<usize>>,
    kinds: Vec<ClassKind>,
    /// `class_of[s]` is the index into `classes` of the class holding `s`.
    class_of: Vec<usize>,
}

impl ClassPartition {
    /// Decomposes the state graph into communicating classes and classifies
    /// each as recurrent or transient.
    ///
    /// Uses Kosaraju's two-pass strongly-connected-component algorithm with
    /// iterative traversals, so deep chains cannot overflow the stack.
    pub fn new(graph: &StateGraph) -> Self {
        let n = graph.n_states();

        // Reverse adjacency for the second pass.
        let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
        for u in 0..n {
            for &v in graph.successors(u) {
                pred[v].push(u);
            }
        }

        // First pass: forward DFS postorder.
        let order = postorder(graph);

        // Second pass: reverse-graph sweeps in reverse postorder; each sweep
        // collects one strongly connected component.
        let mut class_of = vec![usize::MAX; n];
        let mut classes: Vec<BTreeSet<usize>> = Vec::new();
        for &root in order.iter().rev() {
            if class_of[root] != usize::MAX {
                continue;
            }
            let idx = classes.len();
            let mut members = BTreeSet::new();
            let mut stack = vec![root];
            class_of[root] = idx;
            while let Some(u) = stack.pop() {
                members.insert(u);
                for &v in &pred[u] {
                    if class_of[v] == usize::MAX {
                        class_of[v] = idx;
                        stack.push(v);
                    }
                }
            }
            classes.push(members);
        }

        // Reorder classes by smallest member for deterministic output.
        let mut by_min: Vec<usize> = (0..classes.len()).collect();
        by_min.sort_by_key(|&c| classes[c].iter().next().copied());
        let mut remap = vec![0usize; classes.len()];
        for (new_idx, &old_idx) in by_min.iter().enumerate() {
            remap[old_idx] = new_idx;
        }
        let mut ordered: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); classes.len()];
        for (old_idx, members) in classes.into_iter().enumerate() {
            ordered[remap[old_idx]] = members;
        }
        for c in class_of.iter_mut() {
            *c = remap[*c];
        }

        // A class is transient iff any member has a successor outside it.
        let kinds: Vec<ClassKind> = ordered
            .iter()
            .enumerate()
            .map(|(c, members)| {
                let leaves = members
                    .iter()
                    .any(|&u| graph.successors(u).iter().any(|&v| class_of[v] != c));
                if leaves {
                    ClassKind::Transient
                } else {
                    ClassKind::Recurrent
                }
            })
            .collect();

        debug!(
            n_states = n,
            n_classes = ordered.len(),
            n_recurrent = kinds.iter().filter(|k| **k == ClassKind::Recurrent).count(),
            "communicating classes computed"
        );

        Self {
            classes: ordered,
            kinds,
            class_of,
        }
    }

    /// Returns all communicating classes, ordered by smallest state index.
    pub fn classes(&self) -> &[BTreeSet<usize>] {
        &self.classes
    }

    /// Returns the kind of each class, matching [`Self::classes`] order.
    pub fn kinds(&self) -> &[ClassKind] {
        &self.kinds
    }

    /// Returns the number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Returns the class index holding `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` is out of range.
    pub fn class_of(&self, state: usize) -> usize {
        self.class_of[state]
    }

    /// True iff the whole state space is one communicating class.
    pub fn is_irreducible(&self) -> bool {
        self.classes.len() == 1
    }

    /// Returns the classes of the given kind, in class order.
    pub fn classes_of_kind(&self, kind: ClassKind) -> Vec<&BTreeSet<usize>> {
        self.classes
            .iter()
            .zip(&self.kinds)
            .filter(|(_, k)| **k == kind)
            .map(|(c, _)| c)
            .collect()
    }

    /// Returns the union of all states in classes of the given kind.
    pub fn states_of_kind(&self, kind: ClassKind) -> BTreeSet<usize> {
        self.classes_of_kind(kind)
            .into_iter()
            .flat_map(|c| c.iter().copied())
            .collect()
    }

    /// Returns the absorbing states: singleton recurrent classes.
    ///
    /// A singleton class with no outgoing edge necessarily has a self-loop
    /// of probability 1.
    pub fn absorbing_states(&self) -> BTreeSet<usize> {
        self.classes
            .iter()
            .zip(&self.kinds)
            .filter(|(c, k)| c.len() == 1 && **k == ClassKind::Recurrent)
            .flat_map(|(c, _)| c.iter().copied())
            .collect()
    }
}

/// Iterative DFS postorder over the whole graph.
fn postorder(graph: &StateGraph) -> Vec<usize> {
    let n = graph.n_states();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        // (state, next successor position) frames.
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let (u, i) = *frame;
            if i < graph.successors(u).len() {
                frame.1 += 1;
                let v = graph.successors(u)[i];
                if !visited[v] {
                    visited[v] = true;
                    stack.push((v, 0));
                }
            } else {
                stack.pop();
                order.push(u);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::TransitionMatrix;

    fn partition(rows: Vec<Vec<f64>>) -> ClassPartition {
        let matrix = TransitionMatrix::new(rows).unwrap();
        ClassPartition::new(&StateGraph::from_matrix(&matrix))
    }

    fn set(states: &[usize]) -> BTreeSet<usize> {
        states.iter().copied().collect()
    }

    #[test]
    fn identity_is_all_singletons() {
        let p = partition(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ]);
        assert_eq!(p.n_classes(), 3);
        assert_eq!(p.classes(), &[set(&[0]), set(&[1]), set(&[2])]);
        assert!(p.kinds().iter().all(|k| *k == ClassKind::Recurrent));
        assert_eq!(p.absorbing_states(), set(&[0, 1, 2]));
        assert!(!p.is_irreducible());
    }

    #[test]
    fn irreducible_chain_is_one_class() {
        let p = partition(vec![
            vec![0.9, 0.075, 0.025],
            vec![0.15, 0.8, 0.05],
            vec![0.25, 0.25, 0.5],
        ]);
        assert!(p.is_irreducible());
        assert_eq!(p.classes(), &[set(&[0, 1, 2])]);
        assert_eq!(p.kinds(), &[ClassKind::Recurrent]);
        assert!(p.absorbing_states().is_empty());
    }

    #[test]
    fn block_matrix_partition() {
        let third = 1.0 / 3.0;
        let sixth = 1.0 / 6.0;
        let p = partition(vec![
            vec![0.5, 0.5, 0.0, 0.0],
            vec![0.5, 0.5, 0.0, 0.0],
            vec![third, sixth, sixth, third],
            vec![0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(p.classes(), &[set(&[0, 1]), set(&[2]), set(&[3])]);
        assert_eq!(
            p.kinds(),
            &[ClassKind::Recurrent, ClassKind::Transient, ClassKind::Recurrent]
        );
        assert_eq!(p.class_of(0), 0);
        assert_eq!(p.class_of(1), 0);
        assert_eq!(p.class_of(2), 1);
        assert_eq!(p.class_of(3), 2);
        assert_eq!(p.absorbing_states(), set(&[3]));
    }

    #[test]
    fn recurrent_and_transient_states() {
        let p = partition(vec![
            vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.4, 0.6, 0.0, 0.0, 0.0, 0.0],
            vec![0.3, 0.0, 0.4, 0.2, 0.1, 0.0],
            vec![0.0, 0.0, 0.0, 0.3, 0.7, 0.0],
            vec![0.0, 0.0, 0.0, 0.5, 0.0, 0.5],
            vec![0.0, 0.0, 0.0, 0.3, 0.0, 0.7],
        ]);
        assert_eq!(
            p.classes_of_kind(ClassKind::Recurrent),
            vec![&set(&[0, 1]), &set(&[3, 4, 5])]
        );
        assert_eq!(p.classes_of_kind(ClassKind::Transient), vec![&set(&[2])]);
        assert_eq!(p.states_of_kind(ClassKind::Recurrent), set(&[0, 1, 3, 4, 5]));
        assert_eq!(p.states_of_kind(ClassKind::Transient), set(&[2]));
    }

    #[test]
    fn partition_covers_every_state_once() {
        let third = 1.0 / 3.0;
        let sixth = 1.0 / 6.0;
        let p = partition(vec![
            vec![0.5, 0.5, 0.0, 0.0],
            vec![0.5, 0.5, 0.0, 0.0],
            vec![third, sixth, sixth, third],
            vec![0.0, 0.0, 0.0, 1.0],
        ]);
        let mut seen = BTreeSet::new();
        for class in p.classes() {
            for &s in class {
                assert!(seen.insert(s), "state {s} appears in two classes");
            }
        }
        assert_eq!(seen, set(&[0, 1, 2, 3]));
    }

    #[test]
    fn classes_are_mutually_reachable() {
        let matrix = TransitionMatrix::new(vec![
            vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.4, 0.6, 0.0, 0.0, 0.0, 0.0],
            vec![0.3, 0.0, 0.4, 0.2, 0.1, 0.0],
            vec![0.0, 0.0, 0.0, 0.3, 0.7, 0.0],
            vec![0.0, 0.0, 0.0, 0.5, 0.0, 0.5],
            vec![0.0, 0.0, 0.0, 0.3, 0.0, 0.7],
        ])
        .unwrap();
        let graph = StateGraph::from_matrix(&matrix);
        let p = ClassPartition::new(&graph);
        for class in p.classes() {
            for &a in class {
                for &b in class {
                    assert!(graph.reachable(a, b), "{a} should reach {b}");
                }
            }
        }
    }
}
