#![allow(dead_code)]

use nalgebra::Point3;
use posekit::chrom::aggregate::Chromosome;
use posekit::chrom::element::ChromElement;
use posekit::chrom::factory::ChromosomeFactory;
use posekit::chrom::flex::LigandFlex;
use posekit::core::models::atom::Atom;
use posekit::core::models::model::MolecularModel;
use posekit::core::models::site::DockingSite;
use posekit::core::models::topology::Bond;
use posekit::core::scoring::ScoringFunction;
use std::cell::RefCell;
use std::rc::Rc;

pub const TINY: f64 = 1e-4;

/// A small asymmetric ligand: six heavy atoms, two rotatable bonds.
pub fn ligand_model() -> Rc<RefCell<MolecularModel>> {
    let mut model = MolecularModel::new("ligand");
    let c1 = model.add_atom(Atom::new("C1", "C", Point3::new(1.0, 0.5, -1.5)));
    let c2 = model.add_atom(Atom::new("C2", "C", Point3::new(0.0, 0.0, 0.0)));
    let c3 = model.add_atom(Atom::new("C3", "C", Point3::new(0.0, 0.0, 1.5)));
    let c4 = model.add_atom(Atom::new("C4", "C", Point3::new(1.2, 0.7, 2.2)));
    let n1 = model.add_atom(Atom::new("N1", "N", Point3::new(1.4, 0.8, 3.7)));
    let o1 = model.add_atom(Atom::new("O1", "O", Point3::new(2.3, -0.1, 1.8)));
    model.add_bond(Bond::new(c1, c2));
    model.add_bond(Bond::rotatable(c2, c3));
    model.add_bond(Bond::rotatable(c3, c4));
    model.add_bond(Bond::new(c4, n1));
    model.add_bond(Bond::new(c4, o1));
    Rc::new(RefCell::new(model))
}

pub fn docking_site() -> Rc<DockingSite> {
    Rc::new(DockingSite::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(3.0, 1.0, -1.0),
        Point3::new(-2.0, 2.0, 3.0),
        Point3::new(1.0, -2.5, 1.5),
    ]))
}

/// A fully free ligand chromosome (two dihedrals + one position element).
pub fn free_chromosome(model: &Rc<RefCell<MolecularModel>>) -> Chromosome {
    let flex = LigandFlex::new(model.clone(), docking_site());
    let mut factory = ChromosomeFactory::new();
    factory.visit_ligand(&flex);
    let (chrom, _) = factory.into_parts();
    chrom
}

/// A harmonic restraint towards a fixed point, summed over all atoms.
/// Deterministic in the model coordinates; lower is better.
pub fn harmonic_sf(model: Rc<RefCell<MolecularModel>>) -> Rc<dyn ScoringFunction> {
    let target = Point3::new(0.5, 0.5, 0.5);
    Rc::new(move || {
        let m = model.borrow();
        m.coords()
            .iter()
            .map(|p| (p - target).norm_squared())
            .sum::<f64>()
    })
}

pub fn rmsd(reference: &[Point3<f64>], coords: &[Point3<f64>]) -> f64 {
    if reference.len() != coords.len() || reference.is_empty() {
        return 999.9;
    }
    let sum: f64 = reference
        .iter()
        .zip(coords)
        .map(|(a, b)| (a - b).norm_squared())
        .sum();
    (sum / reference.len() as f64).sqrt()
}

/// Measures the min/mean/max step-normalised displacement from the
/// element's current value over repeated randomisation or unit mutation.
pub fn measure_rand_or_mutate_diff(
    chrom: &mut dyn ChromElement,
    n_trials: usize,
    mutate: bool,
    rng: &mut posekit::core::rand::Rand,
) -> (f64, f64, f64) {
    let mut reference = Vec::new();
    chrom.get_vector(&mut reference);
    let mut mean = 0.0;
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for _ in 0..n_trials {
        if mutate {
            chrom.mutate(1.0, rng);
        } else {
            chrom.randomise(rng);
        }
        let mut i = 0;
        let diff = chrom.compare_vector(&reference, &mut i);
        mean += diff;
        min = min.min(diff);
        max = max.max(diff);
    }
    (mean / n_trials as f64, min, max)
}
