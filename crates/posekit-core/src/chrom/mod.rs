//! # Chromosome Module
//!
//! The genotype layer: a polymorphic chromosome element per degree of
//! freedom, immutable per-element reference data shared by every clone,
//! and the factory that assembles one aggregate chromosome from the
//! flexibility descriptors of receptor, ligand, and solvent models.
//!
//! ## Architecture
//!
//! - [`element`] - the `ChromElement` capability set, sampling modes,
//!   error type, and two-point crossover
//! - [`dihedral`] - one rotatable-bond dihedral angle
//! - [`position`] - one rigid-body pose (centre of mass + orientation)
//! - [`occupancy`] - one solvent-occupancy scalar
//! - [`aggregate`] - the ordered composite chromosome
//! - [`flex`] - per-model flexibility descriptors
//! - [`factory`] - descriptor-driven chromosome assembly
//!
//! Every element exposes the same flat-vector and grouped-vector forms, so
//! the genetic algorithm and the simplex search can manipulate any mix of
//! degrees of freedom generically while each element keeps its own domain
//! semantics (angular wraparound, tether bounds, mode switching).

pub mod aggregate;
pub mod dihedral;
pub mod element;
pub mod factory;
pub mod flex;
pub mod occupancy;
pub mod position;

pub use aggregate::Chromosome;
pub use element::{ChromElement, ChromError, SamplingMode, XoverGene, crossover};
pub use factory::{ChromosomeFactory, InteractionPartition};
pub use flex::{LigandFlex, ReceptorFlex, SolventFlex};
