//! Structural and steady-state analysis of finite discrete-time Markov chains.
//!
//! Given a row-stochastic transition matrix, this crate validates it,
//! partitions the states into communicating classes, classifies each class
//! as recurrent or transient, computes per-class periods, and solves the
//! stationary distribution(s).
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//!  │   matrix     │────▶│    graph     │────▶│     classes      │
//!  │  (validate)  │     │ (adjacency)  │     │  (SCC + kinds)   │
//!  └──────────────┘     └──────────────┘     └────────┬─────────┘
//!                                                     │
//!                                     ┌───────────────┴───────────────┐
//!                                     ▼                               ▼
//!                            ┌────────────────┐              ┌────────────────┐
//!                            │     period     │              │     steady     │
//!                            │  (cycle GCDs)  │              │  (pi P = pi)   │
//!                            └────────────────┘              └────────────────┘
//! ```
//!
//! All of it is orchestrated by [`DiscreteTimeMarkovChain`], which analyzes
//! eagerly at construction; every query afterwards is a pure lookup.
//!
//! # Quick start
//!
//! ```rust
//! use dtmc::DiscreteTimeMarkovChain;
//!
//! let chain = DiscreteTimeMarkovChain::with_labels(
//!     vec![vec![0.9, 0.1], vec![0.5, 0.5]],
//!     vec!["sunny", "rainy"],
//! )?;
//!
//! assert!(chain.is_irreducible());
//! assert_eq!(chain.period_of("sunny")?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chain;
pub mod classes;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod period;
pub mod steady;

pub use chain::DiscreteTimeMarkovChain;
pub use classes::{ClassKind, ClassPartition};
pub use error::{ConstructionError, QueryError};
pub use graph::StateGraph;
pub use matrix::{TransitionMatrix, EPSILON};
pub use period::class_period;
pub use steady::SteadyStates;
