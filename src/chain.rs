//! The chain facade: validated matrix, optional labels, and eagerly
//! computed structural results.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::classes::{ClassKind, ClassPartition};
use crate::error::{ConstructionError, QueryError};
use crate::graph::StateGraph;
use crate::matrix::TransitionMatrix;
use crate::period::class_period;
use crate::steady::{self, SteadyStates};

/// Bidirectional label <-> index table.
///
/// Purely a translation convenience; the analytical engine below it only
/// ever sees state indices.
#[derive(Debug, Clone)]
struct LabelTable {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelTable {
    fn new(labels: Vec<String>, n: usize) -> Result<Self, ConstructionError> {
        if labels.len() != n {
            return Err(ConstructionError::LabelCount {
                expected: n,
                got: labels.len(),
            });
        }
        let mut index = HashMap::with_capacity(n);
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(ConstructionError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }
        Ok(Self { labels, index })
    }
}

/// A finite discrete-time Markov chain with eagerly computed structure.
///
/// Construction validates the transition matrix, derives the state graph,
/// the communicating-class partition, per-class periods, and the stationary
/// distribution(s). The result is immutable, so every query is a pure
/// lookup, trivially idempotent and safe to share across threads.
#[derive(Debug, Clone)]
pub struct DiscreteTimeMarkovChain {
    matrix: TransitionMatrix,
    labels: Option<LabelTable>,
    graph: StateGraph,
    partition: ClassPartition,
    /// Period per class, matching class order; `None` where no cycle exists.
    periods: Vec<Option<u64>>,
    steady: SteadyStates,
}

impl DiscreteTimeMarkovChain {
    /// Builds a chain from an N x N row-stochastic matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] if the matrix is empty, non-square,
    /// contains non-finite or negative entries, or has a row not summing
    /// to 1 within tolerance.
    pub fn new(matrix: Vec<Vec<f64>>) -> Result<Self, ConstructionError> {
        Self::build(matrix, None)
    }

    /// Builds a chain with one unique label per state, in state order.
    ///
    /// # Errors
    ///
    /// As [`Self::new`], plus label count or uniqueness failures.
    pub fn with_labels<S: Into<String>>(
        matrix: Vec<Vec<f64>>,
        labels: Vec<S>,
    ) -> Result<Self, ConstructionError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        Self::build(matrix, Some(labels))
    }

    fn build(
        matrix: Vec<Vec<f64>>,
        labels: Option<Vec<String>>,
    ) -> Result<Self, ConstructionError> {
        let matrix = TransitionMatrix::new(matrix)?;
        let labels = match labels {
            Some(l) => Some(LabelTable::new(l, matrix.n_states())?),
            None => None,
        };

        let graph = StateGraph::from_matrix(&matrix);
        let partition = ClassPartition::new(&graph);
        let periods = partition
            .classes()
            .iter()
            .map(|class| class_period(&graph, class))
            .collect();
        let steady = steady::solve(&matrix, &partition)?;

        debug!(
            n_states = matrix.n_states(),
            n_classes = partition.n_classes(),
            labelled = labels.is_some(),
            "chain constructed"
        );

        Ok(Self {
            matrix,
            labels,
            graph,
            partition,
            periods,
            steady,
        })
    }

    /// Returns the number of states N.
    pub fn n_states(&self) -> usize {
        self.matrix.n_states()
    }

    /// Returns the validated transition matrix.
    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// Returns the state labels in state order, if any were configured.
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_ref().map(|t| t.labels.as_slice())
    }

    /// Resolves a label to its state index.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain,
    /// [`QueryError::UnknownLabel`] if no state carries the label.
    pub fn state_index(&self, label: &str) -> Result<usize, QueryError> {
        let table = self.labels.as_ref().ok_or(QueryError::NoLabels)?;
        table
            .index
            .get(label)
            .copied()
            .ok_or_else(|| QueryError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Resolves a state index to its label.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain,
    /// [`QueryError::StateOutOfRange`] for an invalid index.
    pub fn label(&self, state: usize) -> Result<&str, QueryError> {
        let table = self.labels.as_ref().ok_or(QueryError::NoLabels)?;
        table
            .labels
            .get(state)
            .map(String::as_str)
            .ok_or(QueryError::StateOutOfRange {
                state,
                n: self.n_states(),
            })
    }

    fn label_table(&self) -> Result<&LabelTable, QueryError> {
        self.labels.as_ref().ok_or(QueryError::NoLabels)
    }

    fn to_labels<'a>(table: &'a LabelTable, states: &BTreeSet<usize>) -> BTreeSet<&'a str> {
        states.iter().map(|&s| table.labels[s].as_str()).collect()
    }

    /// True iff the chain has more than one communicating class.
    pub fn is_reducible(&self) -> bool {
        !self.partition.is_irreducible()
    }

    /// True iff all states form a single communicating class.
    pub fn is_irreducible(&self) -> bool {
        self.partition.is_irreducible()
    }

    /// Returns all communicating classes, ordered by smallest state index.
    pub fn communicating_classes(&self) -> &[BTreeSet<usize>] {
        self.partition.classes()
    }

    /// Returns the communicating classes no transition leaves.
    pub fn recurrent_classes(&self) -> Vec<&BTreeSet<usize>> {
        self.partition.classes_of_kind(ClassKind::Recurrent)
    }

    /// Returns the communicating classes with at least one exit transition.
    pub fn transient_classes(&self) -> Vec<&BTreeSet<usize>> {
        self.partition.classes_of_kind(ClassKind::Transient)
    }

    /// Returns the union of all recurrent classes.
    pub fn recurrent_states(&self) -> BTreeSet<usize> {
        self.partition.states_of_kind(ClassKind::Recurrent)
    }

    /// Returns the union of all transient classes.
    pub fn transient_states(&self) -> BTreeSet<usize> {
        self.partition.states_of_kind(ClassKind::Transient)
    }

    /// Returns the absorbing states: singleton recurrent classes, i.e.
    /// states with `P[i][i] == 1`.
    pub fn absorbing_states(&self) -> BTreeSet<usize> {
        self.partition.absorbing_states()
    }

    /// Returns the communicating classes as label sets, in class order.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain.
    pub fn communicating_class_labels(&self) -> Result<Vec<BTreeSet<&str>>, QueryError> {
        let table = self.label_table()?;
        Ok(self
            .partition
            .classes()
            .iter()
            .map(|c| Self::to_labels(table, c))
            .collect())
    }

    /// Returns the recurrent classes as label sets, in class order.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain.
    pub fn recurrent_class_labels(&self) -> Result<Vec<BTreeSet<&str>>, QueryError> {
        let table = self.label_table()?;
        Ok(self
            .partition
            .classes_of_kind(ClassKind::Recurrent)
            .into_iter()
            .map(|c| Self::to_labels(table, c))
            .collect())
    }

    /// Returns the transient classes as label sets, in class order.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain.
    pub fn transient_class_labels(&self) -> Result<Vec<BTreeSet<&str>>, QueryError> {
        let table = self.label_table()?;
        Ok(self
            .partition
            .classes_of_kind(ClassKind::Transient)
            .into_iter()
            .map(|c| Self::to_labels(table, c))
            .collect())
    }

    /// Returns the labels of all recurrent states.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain.
    pub fn recurrent_state_labels(&self) -> Result<BTreeSet<&str>, QueryError> {
        let table = self.label_table()?;
        Ok(Self::to_labels(
            table,
            &self.partition.states_of_kind(ClassKind::Recurrent),
        ))
    }

    /// Returns the labels of all transient states.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain.
    pub fn transient_state_labels(&self) -> Result<BTreeSet<&str>, QueryError> {
        let table = self.label_table()?;
        Ok(Self::to_labels(
            table,
            &self.partition.states_of_kind(ClassKind::Transient),
        ))
    }

    /// Returns the labels of all absorbing states.
    ///
    /// # Errors
    ///
    /// [`QueryError::NoLabels`] on an unlabelled chain.
    pub fn absorbing_state_labels(&self) -> Result<BTreeSet<&str>, QueryError> {
        let table = self.label_table()?;
        Ok(Self::to_labels(table, &self.partition.absorbing_states()))
    }

    /// Returns the period of `state`: the GCD of the lengths of all closed
    /// walks through it.
    ///
    /// # Errors
    ///
    /// [`QueryError::StateOutOfRange`] for an invalid index,
    /// [`QueryError::UndefinedPeriod`] for a state with no return path
    /// (a transient singleton without a self-loop).
    pub fn period(&self, state: usize) -> Result<u64, QueryError> {
        if state >= self.n_states() {
            return Err(QueryError::StateOutOfRange {
                state,
                n: self.n_states(),
            });
        }
        self.periods[self.partition.class_of(state)]
            .ok_or(QueryError::UndefinedPeriod { state })
    }

    /// Returns the period of the state carrying `label`.
    ///
    /// # Errors
    ///
    /// As [`Self::period`], plus label resolution failures.
    pub fn period_of(&self, label: &str) -> Result<u64, QueryError> {
        self.period(self.state_index(label)?)
    }

    /// Returns the stationary distribution(s).
    ///
    /// [`SteadyStates::Unique`] for an irreducible chain,
    /// [`SteadyStates::PerClass`] otherwise.
    pub fn steady_states(&self) -> &SteadyStates {
        &self.steady
    }

    /// True iff `to` is reachable from `from` (trivially true when equal).
    ///
    /// # Errors
    ///
    /// [`QueryError::StateOutOfRange`] if either index is invalid.
    pub fn is_accessible(&self, from: usize, to: usize) -> Result<bool, QueryError> {
        let n = self.n_states();
        for state in [from, to] {
            if state >= n {
                return Err(QueryError::StateOutOfRange { state, n });
            }
        }
        Ok(self.graph.reachable(from, to))
    }
}
