//! # Core Module
//!
//! Fundamental building blocks for the docking optimizer: the molecular
//! model and docking site collaborators, geometry and element-data
//! utilities, the explicit random-number context, and the scoring-function
//! boundary.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - atoms, bonds, the live
//!   molecular model written to by chromosome synchronization, and the
//!   docking-site candidate coordinates
//! - **Randomness** ([`rand`]) - seedable random-number context threaded
//!   explicitly through every stochastic operation
//! - **Scoring Boundary** ([`scoring`]) - the external scoring-function
//!   contract shared by the genetic algorithm and the simplex search
//! - **Utilities** ([`utils`]) - geometry (dihedrals, principal axes, Euler
//!   angles) and element reference data

pub mod models;
pub mod rand;
pub mod scoring;
pub mod utils;
