use super::element::{ChromElement, ChromError, INVALID_COMPARISON, SamplingMode, XoverGene};
use crate::core::models::ids::AtomId;
use crate::core::models::model::MolecularModel;
use crate::core::models::site::DockingSite;
use crate::core::rand::Rand;
use crate::core::utils::geometry::{euler_from_quat, quat_from_euler};
use nalgebra::{Point3, Unit, UnitQuaternion};
use std::cell::RefCell;
use std::rc::Rc;

/// Fraction of the tether bound used when correcting an out-of-bounds
/// mutation, so the corrected value sits strictly inside the boundary
/// rather than oscillating on it.
const TETHER_MARGIN: f64 = 0.999;

/// Immutable reference data for one rigid-body degree of freedom.
///
/// Holds the reference atom set used to measure the pose (the tethered
/// substructure when present, else all atoms), the movable atom set
/// written by `SyncToModel`, the independent translation/rotation sampling
/// modes and bounds, the initial pose, and the enumerated docking-site
/// start coordinates for free-translation randomisation.
#[derive(Debug)]
pub struct PositionRefData {
    model: Rc<RefCell<MolecularModel>>,
    ref_atoms: Vec<AtomId>,
    movable_atoms: Vec<AtomId>,
    trans_step: f64,
    /// Rotation step size in radians.
    rot_step: f64,
    trans_mode: SamplingMode,
    rot_mode: SamplingMode,
    max_trans: f64,
    /// Maximum tethered rotation in radians.
    max_rot: f64,
    length: usize,
    xover_length: usize,
    initial_com: Point3<f64>,
    initial_orientation: UnitQuaternion<f64>,
    start_coords: Vec<Point3<f64>>,
}

impl PositionRefData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: Rc<RefCell<MolecularModel>>,
        site: &DockingSite,
        trans_step: f64,
        rot_step: f64,
        trans_mode: SamplingMode,
        rot_mode: SamplingMode,
        max_trans: f64,
        max_rot: f64,
    ) -> Self {
        let (ref_atoms, movable_atoms) = {
            let m = model.borrow();
            let tethered = m.tethered_atoms().to_vec();
            let all = m.atom_ids().to_vec();
            let ref_atoms = if tethered.is_empty() { all.clone() } else { tethered };
            (ref_atoms, all)
        };
        // Zero tether ranges degrade to fixed; fixed sub-modes drop their
        // three values from the serialized form
        let (trans_mode, max_trans) = if trans_mode == SamplingMode::Tethered && max_trans <= 0.0 {
            (SamplingMode::Fixed, 0.0)
        } else {
            (trans_mode, max_trans)
        };
        let (rot_mode, max_rot) = if rot_mode == SamplingMode::Tethered && max_rot <= 0.0 {
            (SamplingMode::Fixed, 0.0)
        } else {
            (rot_mode, max_rot)
        };
        let mut length = 6;
        let mut xover_length = 2;
        if trans_mode.is_fixed() {
            length -= 3;
            xover_length -= 1;
        }
        if rot_mode.is_fixed() {
            length -= 3;
            xover_length -= 1;
        }
        let mut ref_data = Self {
            model,
            ref_atoms,
            movable_atoms,
            trans_step,
            rot_step,
            trans_mode,
            rot_mode,
            max_trans,
            max_rot,
            length,
            xover_length,
            initial_com: Point3::origin(),
            initial_orientation: UnitQuaternion::identity(),
            start_coords: site.coords().to_vec(),
        };
        let (com, orientation) = ref_data.model_value();
        ref_data.initial_com = com;
        ref_data.initial_orientation = orientation;
        ref_data
    }

    pub fn trans_step(&self) -> f64 {
        self.trans_step
    }

    pub fn rot_step(&self) -> f64 {
        self.rot_step
    }

    pub fn trans_mode(&self) -> SamplingMode {
        self.trans_mode
    }

    pub fn rot_mode(&self) -> SamplingMode {
        self.rot_mode
    }

    pub fn max_trans(&self) -> f64 {
        self.max_trans
    }

    pub fn max_rot(&self) -> f64 {
        self.max_rot
    }

    pub fn is_trans_fixed(&self) -> bool {
        self.trans_mode.is_fixed()
    }

    pub fn is_rot_fixed(&self) -> bool {
        self.rot_mode.is_fixed()
    }

    pub fn initial_com(&self) -> Point3<f64> {
        self.initial_com
    }

    pub fn initial_orientation(&self) -> UnitQuaternion<f64> {
        self.initial_orientation
    }

    pub fn num_start_coords(&self) -> usize {
        self.start_coords.len()
    }

    pub fn start_coord(&self, index: usize) -> Option<Point3<f64>> {
        self.start_coords.get(index).copied()
    }

    /// Current pose of the reference atoms: centre of mass plus the
    /// absolute orientation of the principal axes.
    pub fn model_value(&self) -> (Point3<f64>, UnitQuaternion<f64>) {
        let axes = self.model.borrow().principal_axes(&self.ref_atoms);
        (axes.com, axes.orientation)
    }

    /// Rigidly moves every movable atom so the reference atoms adopt the
    /// requested pose: recompute the current principal axes, rotate from
    /// the current orientation to the target, and translate the centre of
    /// mass to the target.
    pub fn set_model_value(&self, com: Point3<f64>, orientation: UnitQuaternion<f64>) {
        let axes = self.model.borrow().principal_axes(&self.ref_atoms);
        let rotation = orientation * axes.orientation.inverse();
        self.model
            .borrow_mut()
            .rigid_transform(&self.movable_atoms, axes.com, &rotation, com);
    }
}

/// One rigid-body pose: centre of mass plus orientation.
///
/// Translation and rotation each have an independent sampling mode. The
/// orientation is held as a unit quaternion and serialized as the three
/// Euler angles (heading, attitude, bank), which crossover treats as one
/// intact gene group.
#[derive(Debug, Clone)]
pub struct PositionElement {
    ref_data: Rc<PositionRefData>,
    com: Point3<f64>,
    orientation: UnitQuaternion<f64>,
}

impl PositionElement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: Rc<RefCell<MolecularModel>>,
        site: &DockingSite,
        trans_step: f64,
        rot_step: f64,
        trans_mode: SamplingMode,
        rot_mode: SamplingMode,
        max_trans: f64,
        max_rot: f64,
    ) -> Self {
        let ref_data = Rc::new(PositionRefData::new(
            model, site, trans_step, rot_step, trans_mode, rot_mode, max_trans, max_rot,
        ));
        let com = ref_data.initial_com();
        let orientation = ref_data.initial_orientation();
        Self {
            ref_data,
            com,
            orientation,
        }
    }

    pub fn com(&self) -> Point3<f64> {
        self.com
    }

    pub fn orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    fn rotate(&mut self, axis: &Unit<nalgebra::Vector3<f64>>, angle: f64) {
        self.orientation = UnitQuaternion::from_axis_angle(axis, angle) * self.orientation;
    }

    fn randomise_com(&mut self, rng: &mut Rand) {
        match self.ref_data.trans_mode() {
            // A single excursion from the initial COM up to the maximum
            // permitted
            SamplingMode::Tethered => {
                let dist = self.ref_data.max_trans() * rng.random01();
                let axis = rng.random_unit_vector();
                self.com = self.ref_data.initial_com() + dist * axis;
            }
            // Randomise across the docking volume candidate coords
            SamplingMode::Free => {
                let n = self.ref_data.num_start_coords();
                if let Some(coord) = self.ref_data.start_coord(rng.random_int(n)) {
                    self.com = coord;
                }
            }
            SamplingMode::Fixed => {
                self.com = self.ref_data.initial_com();
            }
        }
    }

    fn randomise_orientation(&mut self, rng: &mut Rand) {
        use std::f64::consts::PI;
        match self.ref_data.rot_mode() {
            SamplingMode::Tethered => {
                self.orientation = self.ref_data.initial_orientation();
                let theta = self.ref_data.max_rot() * rng.random01();
                let axis = Unit::new_normalize(rng.random_unit_vector());
                self.rotate(&axis, theta);
            }
            // Completely scramble the orientation
            SamplingMode::Free => {
                let heading = 2.0 * PI * rng.random01() - PI;
                let attitude = PI * rng.random01() - 0.5 * PI;
                let bank = 2.0 * PI * rng.random01() - PI;
                self.orientation = quat_from_euler(heading, attitude, bank);
            }
            SamplingMode::Fixed => {
                self.orientation = self.ref_data.initial_orientation();
            }
        }
    }

    fn mutate_com(&mut self, rel_step: f64, rng: &mut Rand) {
        if self.ref_data.is_trans_fixed() {
            return;
        }
        let abs_step = rel_step * self.ref_data.trans_step();
        if abs_step <= 0.0 {
            return;
        }
        let dist = abs_step * rng.random01();
        let axis = rng.random_unit_vector();
        self.com += dist * axis;
        if self.ref_data.trans_mode() == SamplingMode::Tethered {
            self.correct_tethered_com();
        }
    }

    fn mutate_orientation(&mut self, rel_step: f64, rng: &mut Rand) {
        if self.ref_data.is_rot_fixed() {
            return;
        }
        let abs_step = rel_step * self.ref_data.rot_step();
        if abs_step <= 0.0 {
            return;
        }
        let theta = abs_step * rng.random01();
        let axis = Unit::new_normalize(rng.random_unit_vector());
        self.rotate(&axis, theta);
        if self.ref_data.rot_mode() == SamplingMode::Tethered {
            self.correct_tethered_orientation();
        }
    }

    /// If the COM has left the tether sphere, translate back along the
    /// line to the initial COM until just inside the boundary.
    fn correct_tethered_com(&mut self) {
        let max_trans = self.ref_data.max_trans();
        let axis = self.com - self.ref_data.initial_com();
        if axis.norm_squared() > max_trans * max_trans {
            self.com =
                self.ref_data.initial_com() + TETHER_MARGIN * max_trans * axis.normalize();
        }
    }

    /// If the orientation has exceeded the geodesic tether bound, rotate
    /// back towards the initial orientation along the alignment axis until
    /// just inside the boundary.
    fn correct_tethered_orientation(&mut self) {
        let max_rot = self.ref_data.max_rot();
        let align = self.ref_data.initial_orientation() * self.orientation.inverse();
        if let Some((axis, theta)) = align.axis_angle() {
            if theta > max_rot {
                let correction = theta - TETHER_MARGIN * max_rot;
                self.rotate(&axis, correction);
            }
        }
    }
}

impl ChromElement for PositionElement {
    fn reset(&mut self) {
        self.com = self.ref_data.initial_com();
        self.orientation = self.ref_data.initial_orientation();
    }

    fn randomise(&mut self, rng: &mut Rand) {
        self.randomise_com(rng);
        self.randomise_orientation(rng);
    }

    fn mutate(&mut self, rel_step: f64, rng: &mut Rand) {
        self.mutate_com(rel_step, rng);
        self.mutate_orientation(rel_step, rng);
    }

    fn sync_from_model(&mut self) {
        let (com, orientation) = self.ref_data.model_value();
        self.com = com;
        self.orientation = orientation;
    }

    fn sync_to_model(&self) {
        self.ref_data.set_model_value(self.com, self.orientation);
    }

    fn clone_box(&self) -> Box<dyn ChromElement> {
        Box::new(self.clone())
    }

    fn length(&self) -> usize {
        self.ref_data.length
    }

    fn xover_length(&self) -> usize {
        self.ref_data.xover_length
    }

    fn get_vector(&self, v: &mut Vec<f64>) {
        if !self.ref_data.is_trans_fixed() {
            v.push(self.com.x);
            v.push(self.com.y);
            v.push(self.com.z);
        }
        if !self.ref_data.is_rot_fixed() {
            let (heading, attitude, bank) = euler_from_quat(&self.orientation);
            v.push(heading);
            v.push(attitude);
            v.push(bank);
        }
    }

    fn get_xover_vector(&self, v: &mut Vec<XoverGene>) {
        if !self.ref_data.is_trans_fixed() {
            v.push(vec![self.com.x, self.com.y, self.com.z]);
        }
        if !self.ref_data.is_rot_fixed() {
            let (heading, attitude, bank) = euler_from_quat(&self.orientation);
            v.push(vec![heading, attitude, bank]);
        }
    }

    fn set_vector(&mut self, v: &[f64], i: &mut usize) -> Result<(), ChromError> {
        if !self.flat_vector_ok(v, *i) {
            return Err(ChromError::VectorOutOfRange {
                index: *i,
                needed: self.length(),
                available: v.len(),
            });
        }
        if !self.ref_data.is_trans_fixed() {
            let x = v[*i];
            let y = v[*i + 1];
            let z = v[*i + 2];
            *i += 3;
            self.com = Point3::new(x, y, z);
        }
        if !self.ref_data.is_rot_fixed() {
            let heading = v[*i];
            let attitude = v[*i + 1];
            let bank = v[*i + 2];
            *i += 3;
            self.orientation = quat_from_euler(heading, attitude, bank);
        }
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
        if !self.ref_data.is_trans_fixed() {
            let gene = &v[*i];
            if gene.len() != 3 {
                return Err(ChromError::GeneLength {
                    expected: 3,
                    got: gene.len(),
                });
            }
            // An intact COM gene is crossed over whole, so there is no
            // need to re-check tethered bounds here
            self.com = Point3::new(gene[0], gene[1], gene[2]);
            *i += 1;
        }
        if !self.ref_data.is_rot_fixed() {
            let gene = &v[*i];
            if gene.len() != 3 {
                return Err(ChromError::GeneLength {
                    expected: 3,
                    got: gene.len(),
                });
            }
            self.orientation = quat_from_euler(gene[0], gene[1], gene[2]);
            *i += 1;
        }
        Ok(())
    }

    fn get_step_vector(&self, v: &mut Vec<f64>) {
        if !self.ref_data.is_trans_fixed() {
            for _ in 0..3 {
                v.push(self.ref_data.trans_step());
            }
        }
        if !self.ref_data.is_rot_fixed() {
            for _ in 0..3 {
                v.push(self.ref_data.rot_step());
            }
        }
    }

    fn compare_vector(&self, v: &[f64], i: &mut usize) -> f64 {
        if !self.flat_vector_ok(v, *i) {
            return INVALID_COMPARISON;
        }
        let mut ret_val = 0.0f64;
        if !self.ref_data.is_trans_fixed() {
            let x = v[*i];
            let y = v[*i + 1];
            let z = v[*i + 2];
            *i += 3;
            let trans_step = self.ref_data.trans_step();
            if trans_step > 0.0 {
                let abs_diff = (self.com - Point3::new(x, y, z)).norm();
                ret_val = ret_val.max(abs_diff / trans_step);
            }
        }
        if !self.ref_data.is_rot_fixed() {
            let heading = v[*i];
            let attitude = v[*i + 1];
            let bank = v[*i + 2];
            *i += 3;
            let rot_step = self.ref_data.rot_step();
            if rot_step > 0.0 {
                let other = quat_from_euler(heading, attitude, bank);
                // Geodesic angle needed to realign the two orientations
                let abs_diff = self.orientation.angle_to(&other);
                ret_val = ret_val.max(abs_diff / rot_step);
            }
        }
        ret_val
    }
}
