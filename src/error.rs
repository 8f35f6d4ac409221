//! Error types for the dtmc crate.

/// Error raised while constructing a chain.
///
/// Any of these failures means no chain object exists afterwards; the
/// offending input is never coerced or normalized.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConstructionError {
    /// Returned when the input matrix has no rows.
    #[error("transition matrix is empty")]
    Empty,

    /// Returned when a row's length differs from the row count.
    #[error("matrix is not square: {rows} rows, but row {row} has {len} columns")]
    NotSquare {
        /// Number of rows in the input.
        rows: usize,
        /// Index of the offending row.
        row: usize,
        /// Length of the offending row.
        len: usize,
    },

    /// Returned when an entry is NaN or infinite.
    #[error("entry [{row}][{col}] is not finite: {value}")]
    NonFinite {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when an entry is a negative probability.
    #[error("entry [{row}][{col}] is negative: {value}")]
    NegativeEntry {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a row does not sum to 1 within tolerance.
    #[error("row {row} sums to {sum}, expected ~1.0")]
    RowSum {
        /// Index of the offending row.
        row: usize,
        /// Actual sum of the row.
        sum: f64,
    },

    /// Returned when the label count does not match the state count.
    #[error("label count mismatch: matrix has {expected} states, got {got} labels")]
    LabelCount {
        /// Number of states in the matrix.
        expected: usize,
        /// Number of labels supplied.
        got: usize,
    },

    /// Returned when two states share a label.
    #[error("duplicate label: {label:?}")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },

    /// Returned when the stationary linear system for a recurrent class is
    /// numerically singular. Cannot occur for a matrix that passed
    /// validation; kept so the solver never panics.
    #[error("stationary solve failed for recurrent class {class}: singular system")]
    SteadyStateSolve {
        /// Index of the recurrent class (in class order).
        class: usize,
    },
}

/// Error raised by a query on an otherwise valid chain.
///
/// The chain remains intact and reusable after any of these.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// Returned when a label does not name any state.
    #[error("unknown label: {label:?}")]
    UnknownLabel {
        /// The label that was looked up.
        label: String,
    },

    /// Returned when a state index is out of range.
    #[error("state index {state} out of range for {n} states")]
    StateOutOfRange {
        /// The index that was queried.
        state: usize,
        /// Number of states in the chain.
        n: usize,
    },

    /// Returned when a label-based query is made on an unlabelled chain.
    #[error("chain has no labels; query by state index instead")]
    NoLabels,

    /// Returned when a state has no return path, so no period exists.
    #[error("state {state} has no return path; period is undefined")]
    UndefinedPeriod {
        /// The state that was queried.
        state: usize,
    },
}
