//! # posekit Core Library
//!
//! The optimization core of a flexible molecular docking engine: searches for
//! low-energy poses of a molecular assembly (ligand, partially flexible
//! receptor, explicit solvent) against an external scoring function.
//!
//! ## Architectural Philosophy
//!
//! The hard problem this library solves is representing heterogeneous,
//! mixed-mode degrees of freedom — rigid-body translation/rotation, dihedral
//! bond rotation, and solvent-occupancy toggling — as a uniform, orderable
//! numeric vector that genetic-algorithm and simplex optimizers can
//! manipulate generically, while each degree of freedom keeps its own domain
//! semantics (angular wraparound, tether bounds, mode switching).
//!
//! The library is designed with a strict layered architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularModel`,
//!   `DockingSite`), geometry utilities (principal axes, dihedrals, Euler
//!   conversions), the explicit random-number context, and the
//!   scoring-function boundary trait.
//!
//! - **[`chrom`]: The Genotype.** The polymorphic chromosome element
//!   hierarchy (dihedral, position, occupancy, aggregate), the shared
//!   immutable per-element reference data, and the factory that assembles a
//!   chromosome from flexibility descriptors.
//!
//! - **[`search`]: The Optimizers.** Genome and genetic-algorithm population
//!   management with roulette-wheel selection, and a derivative-free
//!   Nelder-Mead simplex search, both driven through the same
//!   scoring-function contract.
//!
//! - **[`workflows`]: The Public API.** High-level search protocols (the GA
//!   generation loop and the iterated simplex minimisation) tying the lower
//!   layers together.

pub mod chrom;
pub mod core;
pub mod search;
pub mod workflows;
