//! # Search Module
//!
//! The optimizers operating on chromosome flat vectors through the shared
//! scoring-function contract.
//!
//! - [`genome`] - one chromosome clone coupled with its cached score and
//!   roulette-wheel fitness
//! - [`population`] - the genetic-algorithm driver: selection, crossover,
//!   mutation, and elitist replacement over a fixed-size genome collection
//! - [`simplex`] - derivative-free Nelder-Mead local search
//! - [`error`] - search-layer error types
//!
//! Everything here is strictly sequential: genome scoring writes the
//! chromosome through to the shared live model before each evaluation, so
//! at most one genome's values are live on the model at a time.

pub mod error;
pub mod genome;
pub mod population;
pub mod simplex;

pub use error::SearchError;
pub use genome::Genome;
pub use population::Population;
pub use simplex::SimplexSearch;
