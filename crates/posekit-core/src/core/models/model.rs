use super::atom::Atom;
use super::ids::AtomId;
use super::topology::Bond;
use crate::core::utils::geometry::{self, PrincipalAxes};
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use slotmap::{SecondaryMap, SlotMap};

/// The live molecular model a chromosome synchronizes with.
///
/// This is the phenotype side of the genotype/phenotype split: chromosome
/// elements read their initial state from the model at construction
/// (`SyncFromModel`) and write pose changes through to it during search
/// (`SyncToModel`). The scoring function always reads the current model
/// coordinates, never a private snapshot, so at most one chromosome's
/// values may be live on a model at a time.
#[derive(Debug, Clone)]
pub struct MolecularModel {
    name: String,
    atoms: SlotMap<AtomId, Atom>,
    /// Atom IDs in insertion order; all ordered iteration goes through
    /// this list so coordinate snapshots and comparisons are stable.
    atom_order: Vec<AtomId>,
    bonds: Vec<Bond>,
    adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
    /// Tethered substructure (may be empty). When present, position
    /// reference data uses it as the reference atom set and dihedral setup
    /// minimises the number of tethered atoms rotated.
    tethered: Vec<AtomId>,
    occupancy: f64,
    occupancy_threshold: f64,
    enabled: bool,
    saved_coords: Vec<Vec<Point3<f64>>>,
}

impl MolecularModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            atoms: SlotMap::with_key(),
            atom_order: Vec::new(),
            bonds: Vec::new(),
            adjacency: SecondaryMap::new(),
            tethered: Vec::new(),
            occupancy: 1.0,
            occupancy_threshold: 0.0,
            enabled: true,
            saved_coords: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.atom_order.push(id);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Adds a bond and returns its index into the bond list.
    pub fn add_bond(&mut self, bond: Bond) -> usize {
        self.adjacency[bond.atom1].push(bond.atom2);
        self.adjacency[bond.atom2].push(bond.atom1);
        self.bonds.push(bond);
        self.bonds.len() - 1
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_ids(&self) -> &[AtomId] {
        &self.atom_order
    }

    pub fn num_atoms(&self) -> usize {
        self.atom_order.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Indices of all rotatable bonds, in bond-list order.
    pub fn rotatable_bond_indices(&self) -> Vec<usize> {
        self.bonds
            .iter()
            .enumerate()
            .filter(|(_, b)| b.rotatable)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn bonded_neighbors(&self, id: AtomId) -> &[AtomId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn position(&self, id: AtomId) -> Point3<f64> {
        self.atoms[id].position
    }

    pub fn set_position(&mut self, id: AtomId, position: Point3<f64>) {
        self.atoms[id].position = position;
    }

    /// Current coordinates of all atoms in insertion order.
    pub fn coords(&self) -> Vec<Point3<f64>> {
        self.atom_order
            .iter()
            .map(|&id| self.atoms[id].position)
            .collect()
    }

    /// Saves the current coordinates and returns a snapshot handle.
    pub fn save_coords(&mut self) -> usize {
        self.saved_coords.push(self.coords());
        self.saved_coords.len() - 1
    }

    /// Restores a previously saved snapshot. Returns false for an unknown
    /// handle.
    pub fn restore_coords(&mut self, snapshot: usize) -> bool {
        let Some(saved) = self.saved_coords.get(snapshot).cloned() else {
            return false;
        };
        for (&id, position) in self.atom_order.iter().zip(saved) {
            self.atoms[id].position = position;
        }
        true
    }

    pub fn set_tethered_atoms(&mut self, atoms: Vec<AtomId>) {
        self.tethered = atoms;
    }

    pub fn tethered_atoms(&self) -> &[AtomId] {
        &self.tethered
    }

    /// Sets the solvent occupancy value and decision threshold; the model
    /// is enabled iff the value reaches the threshold.
    pub fn set_occupancy(&mut self, value: f64, threshold: f64) {
        self.occupancy = value;
        self.occupancy_threshold = threshold;
        self.enabled = value >= threshold;
    }

    pub fn occupancy(&self) -> f64 {
        self.occupancy
    }

    pub fn occupancy_threshold(&self) -> f64 {
        self.occupancy_threshold
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Mass-weighted centre of mass of an atom subset.
    pub fn center_of_mass(&self, ids: &[AtomId]) -> Point3<f64> {
        let mut com = Vector3::zeros();
        let mut total = 0.0;
        for &id in ids {
            let atom = &self.atoms[id];
            com += atom.position.coords * atom.mass();
            total += atom.mass();
        }
        if total > 0.0 {
            Point3::from(com / total)
        } else {
            Point3::origin()
        }
    }

    /// Principal inertia axes and centre of mass of an atom subset.
    pub fn principal_axes(&self, ids: &[AtomId]) -> PrincipalAxes {
        let points: Vec<(Point3<f64>, f64)> = ids
            .iter()
            .map(|&id| {
                let atom = &self.atoms[id];
                (atom.position, atom.mass())
            })
            .collect();
        geometry::principal_axes(&points)
    }

    /// Rigidly transforms an atom subset: translate `pivot` to the origin,
    /// rotate, then translate to `target`.
    pub fn rigid_transform(
        &mut self,
        ids: &[AtomId],
        pivot: Point3<f64>,
        rotation: &UnitQuaternion<f64>,
        target: Point3<f64>,
    ) {
        for &id in ids {
            let atom = &mut self.atoms[id];
            atom.position = target + rotation.transform_vector(&(atom.position - pivot));
        }
    }

    /// Rotates an atom subset about an axis line through `anchor`.
    pub fn rotate_about_axis(
        &mut self,
        ids: &[AtomId],
        anchor: Point3<f64>,
        axis: Vector3<f64>,
        angle_rad: f64,
    ) {
        let rotation = UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle_rad);
        self.rigid_transform(ids, anchor, &rotation, anchor);
    }

    /// Measured dihedral angle (degrees) over four atoms.
    pub fn dihedral_degrees(&self, a1: AtomId, a2: AtomId, a3: AtomId, a4: AtomId) -> f64 {
        geometry::dihedral_degrees(
            &self.atoms[a1].position,
            &self.atoms[a2].position,
            &self.atoms[a3].position,
            &self.atoms[a4].position,
        )
    }

    /// Atoms reachable from `to` when the `from`-`to` bond is removed
    /// (includes `to` itself). Used to find the set of atoms driven by a
    /// rotatable bond; assumes the bond is not part of a ring.
    pub fn atoms_downstream(&self, from: AtomId, to: AtomId) -> Vec<AtomId> {
        let mut visited: Vec<AtomId> = vec![to];
        let mut queue: Vec<AtomId> = vec![to];
        while let Some(current) = queue.pop() {
            for &next in self.bonded_neighbors(current) {
                if current == to && next == from {
                    continue;
                }
                if next != from && !visited.contains(&next) {
                    visited.push(next);
                    queue.push(next);
                }
            }
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn butane_like() -> (MolecularModel, [AtomId; 4]) {
        // Four heavy atoms in a chain with a gauche-ish twist
        let mut model = MolecularModel::new("butane");
        let c1 = model.add_atom(Atom::new("C1", "C", Point3::new(1.0, 0.5, -1.5)));
        let c2 = model.add_atom(Atom::new("C2", "C", Point3::new(0.0, 0.0, 0.0)));
        let c3 = model.add_atom(Atom::new("C3", "C", Point3::new(0.0, 0.0, 1.5)));
        let c4 = model.add_atom(Atom::new("C4", "C", Point3::new(1.2, 0.7, 2.2)));
        model.add_bond(Bond::new(c1, c2));
        model.add_bond(Bond::rotatable(c2, c3));
        model.add_bond(Bond::new(c3, c4));
        (model, [c1, c2, c3, c4])
    }

    #[test]
    fn adjacency_tracks_bonds() {
        let (model, [c1, c2, c3, c4]) = butane_like();
        assert_eq!(model.bonded_neighbors(c1), &[c2]);
        assert_eq!(model.bonded_neighbors(c2), &[c1, c3]);
        assert_eq!(model.bonded_neighbors(c3), &[c2, c4]);
        assert_eq!(model.bonded_neighbors(c4), &[c3]);
    }

    #[test]
    fn rotatable_bond_indices_filters() {
        let (model, _) = butane_like();
        assert_eq!(model.rotatable_bond_indices(), vec![1]);
    }

    #[test]
    fn atoms_downstream_splits_on_the_bond() {
        let (model, [c1, c2, c3, c4]) = butane_like();
        let mut side = model.atoms_downstream(c2, c3);
        side.sort();
        let mut expected = vec![c3, c4];
        expected.sort();
        assert_eq!(side, expected);
        assert_eq!(model.atoms_downstream(c3, c2).len(), 2);
        assert!(model.atoms_downstream(c3, c2).contains(&c1));
    }

    #[test]
    fn save_and_restore_coords_round_trips() {
        let (mut model, [c1, ..]) = butane_like();
        let before = model.coords();
        let snapshot = model.save_coords();
        model.set_position(c1, Point3::new(9.0, 9.0, 9.0));
        assert_ne!(model.coords(), before);
        assert!(model.restore_coords(snapshot));
        assert_eq!(model.coords(), before);
        assert!(!model.restore_coords(99));
    }

    #[test]
    fn occupancy_threshold_drives_enabled_flag() {
        let mut model = MolecularModel::new("water");
        model.set_occupancy(0.4, 0.5);
        assert!(!model.is_enabled());
        model.set_occupancy(0.5, 0.5);
        assert!(model.is_enabled());
        model.set_occupancy(0.9, 0.5);
        assert!(model.is_enabled());
    }

    #[test]
    fn rotate_about_axis_drives_the_dihedral() {
        let (mut model, [c1, c2, c3, c4]) = butane_like();
        let before = model.dihedral_degrees(c1, c2, c3, c4);
        let anchor = model.position(c2);
        let axis = model.position(c3) - anchor;
        model.rotate_about_axis(&[c4], anchor, axis, 25f64.to_radians());
        let after = model.dihedral_degrees(c1, c2, c3, c4);
        let delta = crate::core::utils::geometry::standardise_degrees(after - before);
        assert!((delta - 25.0).abs() < 1e-9);
    }

    #[test]
    fn rigid_transform_preserves_internal_geometry() {
        let (mut model, [c1, c2, ..]) = butane_like();
        let d_before = (model.position(c1) - model.position(c2)).norm();
        let com = model.center_of_mass(model.atom_ids());
        let rotation = UnitQuaternion::from_axis_angle(
            &Unit::new_normalize(Vector3::new(1.0, 1.0, 0.0)),
            0.7,
        );
        let ids = model.atom_ids().to_vec();
        model.rigid_transform(&ids, com, &rotation, Point3::new(5.0, 5.0, 5.0));
        let d_after = (model.position(c1) - model.position(c2)).norm();
        assert!((d_before - d_after).abs() < 1e-12);
    }
}
