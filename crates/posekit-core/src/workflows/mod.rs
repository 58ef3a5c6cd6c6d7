//! # Workflows Module
//!
//! The highest-level, user-facing layer: complete search protocols tying
//! the chromosome and search layers together.
//!
//! - [`ga`] - the genetic-algorithm generation loop with convergence on
//!   non-improving cycles
//! - [`simplex`] - iterated Nelder-Mead minimisation with per-cycle
//!   restart and score-delta convergence
//!
//! Both protocols are parameterised by plain config structs with serde
//! support, so search profiles can be loaded from TOML.

pub mod ga;
pub mod simplex;

pub use ga::{GaParams, run_ga};
pub use simplex::{SimplexParams, run_simplex};
