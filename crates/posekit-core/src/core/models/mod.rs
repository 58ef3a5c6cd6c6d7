//! # Core Models Module
//!
//! Data structures representing the molecular assembly being docked.
//!
//! The [`model::MolecularModel`] is the live phenotype: chromosome elements
//! write pose changes through to it (`SyncToModel`) and read their initial
//! state from it (`SyncFromModel`). The [`site::DockingSite`] supplies the
//! enumerable candidate start coordinates used by free-translation
//! randomisation.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with element and coordinates
//! - [`ids`] - Unique identifier types for atoms
//! - [`topology`] - Bond connectivity with rotatable-bond classification
//! - [`model`] - The complete molecular model with occupancy state,
//!   coordinate snapshots, and rigid-body transforms
//! - [`site`] - Docking-site candidate coordinates

pub mod atom;
pub mod ids;
pub mod model;
pub mod site;
pub mod topology;
