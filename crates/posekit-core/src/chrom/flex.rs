use super::element::SamplingMode;
use crate::core::models::model::MolecularModel;
use crate::core::models::site::DockingSite;
use std::cell::RefCell;
use std::rc::Rc;

/// Flexibility descriptor for a receptor model.
///
/// Receptor flexibility is limited to rotatable terminal polar bonds
/// (hydroxyl and primary-amine hydrogens) within range of the docking
/// site; those dihedrals sample freely.
#[derive(Debug, Clone)]
pub struct ReceptorFlex {
    pub model: Rc<RefCell<MolecularModel>>,
    pub site: Rc<DockingSite>,
    /// Dihedral mutation step size in degrees.
    pub dihedral_step: f64,
    /// Range (Angstroms) from the docking site within which terminal
    /// polar bonds are treated as flexible.
    pub flex_distance: f64,
}

impl ReceptorFlex {
    pub fn new(model: Rc<RefCell<MolecularModel>>, site: Rc<DockingSite>) -> Self {
        Self {
            model,
            site,
            dihedral_step: 30.0,
            flex_distance: 3.0,
        }
    }
}

/// Flexibility descriptor for a ligand model: independent sampling modes,
/// step sizes, and tether bounds for translation, rotation, and dihedral
/// degrees of freedom.
#[derive(Debug, Clone)]
pub struct LigandFlex {
    pub model: Rc<RefCell<MolecularModel>>,
    pub site: Rc<DockingSite>,
    /// Translation mutation step size in Angstroms.
    pub trans_step: f64,
    /// Whole-body rotation mutation step size in degrees.
    pub rot_step: f64,
    /// Dihedral mutation step size in degrees.
    pub dihedral_step: f64,
    pub trans_mode: SamplingMode,
    pub rot_mode: SamplingMode,
    pub dihedral_mode: SamplingMode,
    /// Maximum tethered COM displacement in Angstroms.
    pub max_trans: f64,
    /// Maximum tethered rotation in degrees.
    pub max_rot: f64,
    /// Maximum tethered dihedral deviation in degrees.
    pub max_dihedral: f64,
}

impl LigandFlex {
    pub fn new(model: Rc<RefCell<MolecularModel>>, site: Rc<DockingSite>) -> Self {
        Self {
            model,
            site,
            trans_step: 2.0,
            rot_step: 30.0,
            dihedral_step: 30.0,
            trans_mode: SamplingMode::Free,
            rot_mode: SamplingMode::Free,
            dihedral_mode: SamplingMode::Free,
            max_trans: 1.0,
            max_rot: 30.0,
            max_dihedral: 30.0,
        }
    }
}

/// Flexibility descriptor for an explicit solvent model: ligand-like pose
/// flexibility plus a variable-occupancy probability.
#[derive(Debug, Clone)]
pub struct SolventFlex {
    pub flex: LigandFlex,
    /// Probability that the solvent model is enabled. Values strictly
    /// between 0 and 1 create an occupancy degree of freedom; exactly 0
    /// or 1 permanently fixes the model at construction.
    pub occupancy: f64,
    /// Occupancy mutation step size.
    pub occupancy_step: f64,
}

impl SolventFlex {
    pub fn new(model: Rc<RefCell<MolecularModel>>, site: Rc<DockingSite>) -> Self {
        Self {
            flex: LigandFlex::new(model, site),
            occupancy: 1.0,
            occupancy_step: 1.0,
        }
    }
}
