use super::aggregate::Chromosome;
use super::dihedral::DihedralElement;
use super::element::SamplingMode;
use super::flex::{LigandFlex, ReceptorFlex, SolventFlex};
use super::occupancy::OccupancyElement;
use super::position::PositionElement;
use crate::core::models::ids::AtomId;
use crate::core::models::model::MolecularModel;
use crate::core::models::topology::Bond;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Opaque interaction-partitioning helper produced alongside the
/// chromosome: the flexible bonds and tethered atoms of a model, for
/// downstream scoring bookkeeping (flexible interaction maps). The
/// optimizer itself never consumes it; it is passed through unchanged.
#[derive(Debug, Clone)]
pub struct InteractionPartition {
    model: Rc<RefCell<MolecularModel>>,
    rotatable_bonds: Vec<usize>,
    tethered_atoms: Vec<AtomId>,
}

impl InteractionPartition {
    pub fn model(&self) -> &Rc<RefCell<MolecularModel>> {
        &self.model
    }

    pub fn rotatable_bonds(&self) -> &[usize] {
        &self.rotatable_bonds
    }

    pub fn tethered_atoms(&self) -> &[AtomId] {
        &self.tethered_atoms
    }
}

/// Builds one aggregate chromosome by visiting the flexibility
/// descriptors of the receptor, ligand, and solvent models.
///
/// Rules: one dihedral element per rotatable bond unless the dihedral
/// mode is fixed; one position element per model unless both translation
/// and rotation are fixed; one occupancy element per solvent model only
/// when the enable probability is strictly between 0 and 1.
#[derive(Debug, Default)]
pub struct ChromosomeFactory {
    chrom: Chromosome,
    partition: Option<InteractionPartition>,
}

impl ChromosomeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the factory, yielding the assembled chromosome and the
    /// interaction partition of the last visited model (if any).
    pub fn into_parts(self) -> (Chromosome, Option<InteractionPartition>) {
        (self.chrom, self.partition)
    }

    pub fn chrom(&self) -> &Chromosome {
        &self.chrom
    }

    pub fn partition(&self) -> Option<&InteractionPartition> {
        self.partition.as_ref()
    }

    /// Receptor flexibility: free dihedral elements for every rotatable
    /// terminal OH/NH3 bond within range of the docking site.
    pub fn visit_receptor(&mut self, flex: &ReceptorFlex) {
        let flexible_bonds: Vec<usize> = {
            let m = flex.model.borrow();
            m.bonds()
                .iter()
                .enumerate()
                .filter(|(_, bond)| {
                    bond.rotatable
                        && is_terminal_polar(&m, bond)
                        && flex
                            .site
                            .is_in_range(&m.position(bond.atom1), flex.flex_distance)
                        && flex
                            .site
                            .is_in_range(&m.position(bond.atom2), flex.flex_distance)
                })
                .map(|(index, _)| index)
                .collect()
        };
        for &bond_index in &flexible_bonds {
            self.chrom.push(Box::new(DihedralElement::new(
                flex.model.clone(),
                bond_index,
                &[],
                flex.dihedral_step,
                SamplingMode::Free,
                180.0,
            )));
        }
        self.partition = if flexible_bonds.is_empty() {
            None
        } else {
            Some(InteractionPartition {
                model: flex.model.clone(),
                rotatable_bonds: flexible_bonds,
                tethered_atoms: Vec::new(),
            })
        };
    }

    /// Ligand flexibility: dihedral elements per rotatable bond plus one
    /// position element, subject to the sampling modes.
    pub fn visit_ligand(&mut self, flex: &LigandFlex) {
        // In tethered modes the mutation step may not exceed the tether
        // bound
        let mut trans_step = flex.trans_step;
        let mut rot_step = flex.rot_step;
        let mut dihedral_step = flex.dihedral_step;
        if flex.trans_mode == SamplingMode::Tethered && trans_step > flex.max_trans {
            trans_step = flex.max_trans;
        }
        if flex.rot_mode == SamplingMode::Tethered && rot_step > flex.max_rot {
            rot_step = flex.max_rot;
        }
        if flex.dihedral_mode == SamplingMode::Tethered && dihedral_step > flex.max_dihedral {
            dihedral_step = flex.max_dihedral;
        }

        let (tethered_atoms, rotatable_bonds) = {
            let m = flex.model.borrow();
            (m.tethered_atoms().to_vec(), m.rotatable_bond_indices())
        };

        if flex.dihedral_mode != SamplingMode::Fixed {
            for &bond_index in &rotatable_bonds {
                self.chrom.push(Box::new(DihedralElement::new(
                    flex.model.clone(),
                    bond_index,
                    &tethered_atoms,
                    dihedral_step,
                    flex.dihedral_mode,
                    flex.max_dihedral,
                )));
            }
        }

        // A position element only when at least one of translation and
        // rotation is sampled; whole-body rotation works in radians
        if flex.trans_mode != SamplingMode::Fixed || flex.rot_mode != SamplingMode::Fixed {
            self.chrom.push(Box::new(PositionElement::new(
                flex.model.clone(),
                &flex.site,
                trans_step,
                rot_step.to_radians(),
                flex.trans_mode,
                flex.rot_mode,
                flex.max_trans,
                flex.max_rot.to_radians(),
            )));
        }

        self.partition = if rotatable_bonds.is_empty() {
            None
        } else {
            Some(InteractionPartition {
                model: flex.model.clone(),
                rotatable_bonds,
                tethered_atoms,
            })
        };
    }

    /// Solvent flexibility: ligand-like pose flexibility plus an
    /// occupancy element when the enable probability is strictly between
    /// 0 and 1. A probability of exactly 0 or 1 permanently fixes the
    /// model with no chromosome element, reducing the search
    /// dimensionality.
    pub fn visit_solvent(&mut self, flex: &SolventFlex) {
        self.visit_ligand(&flex.flex);
        let model = &flex.flex.model;
        if flex.occupancy > 0.0 && flex.occupancy < 1.0 {
            let threshold = 1.0 - flex.occupancy;
            debug!(
                model = model.borrow().name(),
                occupancy = flex.occupancy,
                "solvent model has variable occupancy"
            );
            self.chrom.push(Box::new(OccupancyElement::new(
                model.clone(),
                flex.occupancy_step,
                threshold,
            )));
        } else if flex.occupancy <= 0.0 {
            model.borrow_mut().set_occupancy(0.0, 0.5);
            warn!(
                model = model.borrow().name(),
                "solvent model is permanently disabled"
            );
        } else {
            model.borrow_mut().set_occupancy(1.0, 0.5);
            debug!(
                model = model.borrow().name(),
                "solvent model is permanently enabled"
            );
        }
    }
}

/// True if one end of the bond is an oxygen with a single hydrogen
/// neighbour (terminal hydroxyl) or a nitrogen with three hydrogen
/// neighbours (terminal primary amine), besides the bond partner.
fn is_terminal_polar(model: &MolecularModel, bond: &Bond) -> bool {
    let ends = [(bond.atom1, bond.atom2), (bond.atom2, bond.atom1)];
    ends.iter().any(|&(candidate, partner)| {
        let atom = match model.atom(candidate) {
            Some(atom) => atom,
            None => return false,
        };
        let hydrogens: Vec<_> = model
            .bonded_neighbors(candidate)
            .iter()
            .filter(|&&n| n != partner)
            .collect();
        let all_h = hydrogens.iter().all(|&&n| {
            model
                .atom(n)
                .map(|a| a.element.eq_ignore_ascii_case("H"))
                .unwrap_or(false)
        });
        match atom.element.to_ascii_uppercase().as_str() {
            "O" => all_h && hydrogens.len() == 1,
            "N" => all_h && hydrogens.len() == 3,
            _ => false,
        }
    })
}
