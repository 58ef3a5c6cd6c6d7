use super::element::{ChromElement, ChromError, INVALID_COMPARISON, SamplingMode, XoverGene};
use crate::core::models::ids::AtomId;
use crate::core::models::model::MolecularModel;
use crate::core::rand::Rand;
use crate::core::utils::geometry::standardise_degrees;
use std::cell::RefCell;
use std::rc::Rc;

/// Immutable reference data for one dihedral degree of freedom, created
/// once from the live model and shared read-only by every clone of the
/// element.
#[derive(Debug)]
pub struct DihedralRefData {
    model: Rc<RefCell<MolecularModel>>,
    /// The four-atom dihedral specification around the rotatable bond.
    atom1: AtomId,
    atom2: AtomId,
    atom3: AtomId,
    atom4: AtomId,
    /// Atoms driven by the bond rotation (the smaller half of the
    /// molecule, or the free end in tethered mode).
    rot_atoms: Vec<AtomId>,
    step_size: f64,
    mode: SamplingMode,
    max_dihedral: f64,
    initial_value: f64,
}

impl DihedralRefData {
    /// Builds the reference data for the rotatable bond at `bond_index`.
    ///
    /// `tethered_atoms` is the tethered substructure of the model (may be
    /// empty); when present the rotated set is chosen to minimise the
    /// number of tethered atoms moved, i.e. the free end of the bond is
    /// rotated even if it is over half the molecule.
    pub fn new(
        model: Rc<RefCell<MolecularModel>>,
        bond_index: usize,
        tethered_atoms: &[AtomId],
        step_size: f64,
        mode: SamplingMode,
        max_dihedral: f64,
    ) -> Self {
        let (atom1, atom2, atom3, atom4, rot_atoms) = {
            let m = model.borrow();
            let bond = m.bonds()[bond_index];
            let (a2, a3) = (bond.atom1, bond.atom2);
            let neighbor2 = m
                .bonded_neighbors(a2)
                .iter()
                .copied()
                .find(|&n| n != a3)
                .expect("rotatable bond atom has no other bonded neighbor");
            let neighbor3 = m
                .bonded_neighbors(a3)
                .iter()
                .copied()
                .find(|&n| n != a2)
                .expect("rotatable bond atom has no other bonded neighbor");

            let side3 = m.atoms_downstream(a2, a3);
            let selected: Vec<AtomId> = side3
                .iter()
                .copied()
                .filter(|&id| id != a2 && id != a3)
                .collect();

            let n_atoms = m.num_atoms();
            let n_tethered = tethered_atoms.len();
            let n_selected = if n_tethered == 0 {
                selected.len()
            } else {
                selected
                    .iter()
                    .filter(|id| tethered_atoms.contains(id))
                    .count()
            };
            let n_half = if n_tethered == 0 {
                n_atoms.saturating_sub(2) / 2
            } else {
                n_tethered.saturating_sub(2) / 2
            };

            if n_selected > n_half {
                // Rotate the other end and reverse the dihedral spec so the
                // driven side stays on the fourth-atom side
                let rot: Vec<AtomId> = m
                    .atom_ids()
                    .iter()
                    .copied()
                    .filter(|id| !side3.contains(id) && *id != a2)
                    .collect();
                (neighbor3, a3, a2, neighbor2, rot)
            } else {
                (neighbor2, a2, a3, neighbor3, selected)
            }
        };
        let mut ref_data = Self {
            model,
            atom1,
            atom2,
            atom3,
            atom4,
            rot_atoms,
            step_size,
            mode,
            max_dihedral,
            initial_value: 0.0,
        };
        ref_data.initial_value = ref_data.model_value();
        ref_data
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    pub fn max_dihedral(&self) -> f64 {
        self.max_dihedral
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Measured dihedral angle (degrees) on the live model.
    pub fn model_value(&self) -> f64 {
        self.model
            .borrow()
            .dihedral_degrees(self.atom1, self.atom2, self.atom3, self.atom4)
    }

    /// Drives the model dihedral to `angle` by rotating the driven atoms
    /// about the bond axis.
    pub fn set_model_value(&self, angle: f64) {
        let delta = angle - self.model_value();
        if delta.abs() > 0.001 {
            let mut m = self.model.borrow_mut();
            let anchor = m.position(self.atom2);
            let axis = m.position(self.atom3) - anchor;
            m.rotate_about_axis(&self.rot_atoms, anchor, axis, delta.to_radians());
        }
    }
}

/// One bond dihedral angle, standardised to [-180, 180) degrees.
#[derive(Debug, Clone)]
pub struct DihedralElement {
    ref_data: Rc<DihedralRefData>,
    value: f64,
}

impl DihedralElement {
    pub fn new(
        model: Rc<RefCell<MolecularModel>>,
        bond_index: usize,
        tethered_atoms: &[AtomId],
        step_size: f64,
        mode: SamplingMode,
        max_dihedral: f64,
    ) -> Self {
        let ref_data = Rc::new(DihedralRefData::new(
            model,
            bond_index,
            tethered_atoms,
            step_size,
            mode,
            max_dihedral,
        ));
        // Initial genotype matches the current phenotype
        let value = ref_data.initial_value();
        Self { ref_data, value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    fn correct_tethered_dihedral(&mut self) {
        let max_delta = self.ref_data.max_dihedral();
        let initial = self.ref_data.initial_value();
        let delta = standardise_degrees(self.value - initial);
        if delta > max_delta {
            self.value = standardise_degrees(initial + max_delta);
        } else if delta < -max_delta {
            self.value = standardise_degrees(initial - max_delta);
        }
    }
}

impl ChromElement for DihedralElement {
    fn reset(&mut self) {
        self.value = self.ref_data.initial_value();
    }

    fn randomise(&mut self, rng: &mut Rand) {
        let max_delta = self.ref_data.max_dihedral();
        match self.ref_data.mode() {
            SamplingMode::Tethered => {
                let delta = 2.0 * max_delta * rng.random01() - max_delta;
                self.value = standardise_degrees(self.ref_data.initial_value() + delta);
            }
            SamplingMode::Free => {
                self.value = 360.0 * rng.random01() - 180.0;
            }
            SamplingMode::Fixed => {
                self.value = self.ref_data.initial_value();
            }
        }
    }

    fn mutate(&mut self, rel_step: f64, rng: &mut Rand) {
        let abs_step = rel_step * self.ref_data.step_size();
        if abs_step <= 0.0 {
            return;
        }
        match self.ref_data.mode() {
            SamplingMode::Tethered => {
                let delta = 2.0 * abs_step * rng.random01() - abs_step;
                self.value = standardise_degrees(self.value + delta);
                self.correct_tethered_dihedral();
            }
            SamplingMode::Free => {
                let delta = 2.0 * abs_step * rng.random01() - abs_step;
                self.value = standardise_degrees(self.value + delta);
            }
            SamplingMode::Fixed => {}
        }
    }

    fn sync_from_model(&mut self) {
        self.value = self.ref_data.model_value();
    }

    fn sync_to_model(&self) {
        self.ref_data.set_model_value(self.value);
    }

    fn clone_box(&self) -> Box<dyn ChromElement> {
        Box::new(self.clone())
    }

    fn length(&self) -> usize {
        1
    }

    fn xover_length(&self) -> usize {
        1
    }

    fn get_vector(&self, v: &mut Vec<f64>) {
        v.push(self.value);
    }

    fn get_xover_vector(&self, v: &mut Vec<XoverGene>) {
        v.push(vec![self.value]);
    }

    fn set_vector(&mut self, v: &[f64], i: &mut usize) -> Result<(), ChromError> {
        if !self.flat_vector_ok(v, *i) {
            return Err(ChromError::VectorOutOfRange {
                index: *i,
                needed: self.length(),
                available: v.len(),
            });
        }
        self.value = standardise_degrees(v[*i]);
        *i += 1;
        Ok(())
    }

    fn set_xover_vector(&mut self, v: &[XoverGene], i: &mut usize) -> Result<(), ChromError> {
        if !self.xover_vector_ok(v, *i) {
            return Err(ChromError::VectorOutOfRange {
                index: *i,
                needed: self.xover_length(),
                available: v.len(),
            });
        }
        let gene = &v[*i];
        if gene.len() != 1 {
            return Err(ChromError::GeneLength {
                expected: 1,
                got: gene.len(),
            });
        }
        self.value = gene[0];
        *i += 1;
        Ok(())
    }

    fn get_step_vector(&self, v: &mut Vec<f64>) {
        v.push(self.ref_data.step_size());
    }

    fn compare_vector(&self, v: &[f64], i: &mut usize) -> f64 {
        if !self.flat_vector_ok(v, *i) {
            return INVALID_COMPARISON;
        }
        let other = v[*i];
        *i += 1;
        let step_size = self.ref_data.step_size();
        if step_size > 0.0 {
            // Shortest-arc difference: dihedrals are cyclic
            standardise_degrees(self.value - other).abs() / step_size
        } else {
            0.0
        }
    }
}
