mod common;

use common::{TINY, docking_site, free_chromosome, ligand_model, measure_rand_or_mutate_diff, rmsd};
use posekit::chrom::aggregate::Chromosome;
use posekit::chrom::dihedral::DihedralElement;
use posekit::chrom::element::{ChromElement, INVALID_COMPARISON, SamplingMode, crossover};
use posekit::chrom::occupancy::OccupancyElement;
use posekit::chrom::position::PositionElement;
use posekit::core::rand::Rand;

#[test]
fn clone_has_equal_length_and_values() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let clone = chrom.clone_box();
    assert_eq!(chrom.length(), clone.length());
    assert!(chrom.equals(&*clone, TINY));
}

#[test]
fn mutated_clone_differs_from_the_original() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let mut clone = chrom.clone_box();
    let mut rng = Rand::from_seed(101);
    clone.mutate(1.0, &mut rng);
    assert!(!chrom.equals(&*clone, TINY));
}

#[test]
fn randomised_clone_differs_from_the_original() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let mut clone = chrom.clone_box();
    let mut rng = Rand::from_seed(103);
    clone.randomise(&mut rng);
    assert!(!chrom.equals(&*clone, TINY));
}

#[test]
fn sync_to_model_of_unmutated_chromosome_leaves_coords_unchanged() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let before = model.borrow().coords();
    chrom.sync_to_model();
    let after = model.borrow().coords();
    assert!(rmsd(&before, &after) < TINY);
}

#[test]
fn sync_to_model_after_mutate_changes_coords() {
    let model = ligand_model();
    let mut chrom = free_chromosome(&model);
    let before = model.borrow().coords();
    let mut rng = Rand::from_seed(107);
    chrom.mutate(1.0, &mut rng);
    chrom.sync_to_model();
    let after = model.borrow().coords();
    assert!(rmsd(&before, &after) > TINY);
}

#[test]
fn reset_after_mutate_restores_coords() {
    let model = ligand_model();
    let mut chrom = free_chromosome(&model);
    let before = model.borrow().coords();
    let mut rng = Rand::from_seed(109);
    chrom.mutate(1.0, &mut rng);
    chrom.sync_to_model();
    chrom.reset();
    chrom.sync_to_model();
    let after = model.borrow().coords();
    assert!(rmsd(&before, &after) < TINY);
}

#[test]
fn reset_after_randomise_restores_coords() {
    let model = ligand_model();
    let mut chrom = free_chromosome(&model);
    let before = model.borrow().coords();
    let mut rng = Rand::from_seed(113);
    chrom.randomise(&mut rng);
    chrom.sync_to_model();
    chrom.reset();
    chrom.sync_to_model();
    let after = model.borrow().coords();
    assert!(rmsd(&before, &after) < TINY);
}

#[test]
fn clone_created_after_mutation_still_resets_to_the_initial_state() {
    let model = ligand_model();
    let mut chrom = free_chromosome(&model);
    let before = model.borrow().coords();
    let mut rng = Rand::from_seed(127);
    // Mutate the original before creating the clone
    chrom.mutate(1.0, &mut rng);
    chrom.sync_to_model();
    let mut clone = chrom.clone_box();
    clone.mutate(1.0, &mut rng);
    clone.sync_to_model();
    clone.reset();
    clone.sync_to_model();
    let after = model.borrow().coords();
    assert!(rmsd(&before, &after) < TINY);
}

#[test]
fn mutate_then_reset_clone_equals_the_original() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let mut clone = chrom.clone_box();
    let mut rng = Rand::from_seed(131);
    clone.mutate(1.0, &mut rng);
    clone.reset();
    assert!(chrom.equals(&*clone, TINY));
}

#[test]
fn repeated_sync_leaves_genotype_and_phenotype_unchanged() {
    let model = ligand_model();
    let mut chrom = free_chromosome(&model);
    let reference = chrom.clone_box();
    let before = model.borrow().coords();
    for _ in 0..100 {
        chrom.sync_to_model();
        chrom.sync_from_model();
    }
    let after = model.borrow().coords();
    assert!(rmsd(&before, &after) < TINY);
    let cmp = chrom.compare(&*reference);
    assert!(cmp >= 0.0 && cmp < TINY);
}

#[test]
fn compare_with_a_zero_length_chromosome_is_invalid() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let empty = Chromosome::new();
    assert_eq!(chrom.compare(&empty), INVALID_COMPARISON);
    assert!(!chrom.equals(&empty, TINY));
}

#[test]
fn compare_after_a_single_mutation_never_exceeds_the_mutation_distance() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let mut rng = Rand::from_seed(137);
    for _ in 0..10_000 {
        let mut clone = chrom.clone_box();
        let mutation_distance = rng.random01();
        clone.mutate(mutation_distance, &mut rng);
        let cmp = chrom.compare(&*clone);
        assert!(cmp >= 0.0);
        assert!(cmp <= mutation_distance + 1e-12);
    }
}

#[test]
fn crossover_of_four_unmutated_clones_keeps_them_all_equal() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let clone1 = chrom.clone_box();
    let clone2 = chrom.clone_box();
    let mut clone3 = chrom.clone_box();
    let mut clone4 = chrom.clone_box();
    let mut rng = Rand::from_seed(139);
    assert!(clone1.equals(&*clone2, TINY));
    assert!(clone1.equals(&*clone3, TINY));
    assert!(clone1.equals(&*clone4, TINY));
    crossover(&*clone1, &*clone2, clone3.as_mut(), clone4.as_mut(), &mut rng).unwrap();
    assert!(clone1.equals(&*clone2, TINY));
    assert!(clone1.equals(&*clone3, TINY));
    assert!(clone1.equals(&*clone4, TINY));
}

#[test]
fn crossover_with_mismatched_lengths_is_rejected() {
    let model = ligand_model();
    let chrom = free_chromosome(&model);
    let other = Chromosome::new();
    let mut clone1 = chrom.clone_box();
    let mut clone2 = chrom.clone_box();
    let mut rng = Rand::from_seed(149);
    assert!(
        crossover(&chrom, &other, clone1.as_mut(), clone2.as_mut(), &mut rng).is_err()
    );
}

#[test]
fn tethered_dihedral_randomise_stays_in_bounds_with_uniform_spread() {
    let model = ligand_model();
    let step_size = 10.0;
    let max_delta = 45.0;
    let mut element = DihedralElement::new(
        model,
        1,
        &[],
        step_size,
        SamplingMode::Tethered,
        max_delta,
    );
    let mut rng = Rand::from_seed(151);
    let (mean, min, max) =
        measure_rand_or_mutate_diff(&mut element, 1_000_000, false, &mut rng);
    let expected_mean = 0.5 * max_delta / step_size;
    assert!(min >= 0.0);
    assert!(max <= 2.0 * expected_mean + 1e-9);
    assert!(max > 1.99 * expected_mean);
    assert!(mean / expected_mean > 0.99);
    assert!(mean / expected_mean < 1.01);
}

#[test]
fn tethered_com_randomise_stays_in_bounds_with_uniform_spread() {
    let model = ligand_model();
    let trans_step = 0.1;
    let max_trans = 1.0;
    let mut element = PositionElement::new(
        model,
        &docking_site(),
        trans_step,
        10f64.to_radians(),
        SamplingMode::Tethered,
        SamplingMode::Fixed,
        max_trans,
        45f64.to_radians(),
    );
    let mut rng = Rand::from_seed(157);
    let (mean, min, max) =
        measure_rand_or_mutate_diff(&mut element, 1_000_000, false, &mut rng);
    let expected_mean = 0.5 * max_trans / trans_step;
    assert!(min >= 0.0);
    assert!(max <= 2.0 * expected_mean + 1e-9);
    assert!(max > 1.99 * expected_mean);
    assert!(mean / expected_mean > 0.99);
    assert!(mean / expected_mean < 1.01);
}

#[test]
fn tethered_orientation_randomise_stays_in_bounds_with_uniform_spread() {
    let model = ligand_model();
    let rot_step = 10f64.to_radians();
    let max_rot = 45f64.to_radians();
    let mut element = PositionElement::new(
        model,
        &docking_site(),
        0.1,
        rot_step,
        SamplingMode::Fixed,
        SamplingMode::Tethered,
        1.0,
        max_rot,
    );
    let mut rng = Rand::from_seed(163);
    let (mean, min, max) =
        measure_rand_or_mutate_diff(&mut element, 1_000_000, false, &mut rng);
    let expected_mean = 0.5 * max_rot / rot_step;
    assert!(min >= 0.0);
    assert!(max <= 2.0 * expected_mean + 1e-9);
    assert!(max > 1.99 * expected_mean);
    assert!(mean / expected_mean > 0.99);
    assert!(mean / expected_mean < 1.01);
}

#[test]
fn tethered_dihedral_mutation_walk_stays_in_bounds() {
    let model = ligand_model();
    let step_size = 10.0;
    let max_delta = 45.0;
    let mut element = DihedralElement::new(
        model,
        1,
        &[],
        step_size,
        SamplingMode::Tethered,
        max_delta,
    );
    let mut rng = Rand::from_seed(167);
    let (_, min, max) = measure_rand_or_mutate_diff(&mut element, 100_000, true, &mut rng);
    assert!(min >= 0.0);
    assert!(max <= 1.01 * max_delta / step_size);
}

#[test]
fn tethered_com_mutation_walk_stays_in_bounds() {
    let model = ligand_model();
    let mut element = PositionElement::new(
        model,
        &docking_site(),
        0.1,
        10f64.to_radians(),
        SamplingMode::Tethered,
        SamplingMode::Fixed,
        1.0,
        45f64.to_radians(),
    );
    let mut rng = Rand::from_seed(173);
    let (_, min, max) = measure_rand_or_mutate_diff(&mut element, 100_000, true, &mut rng);
    assert!(min >= 0.0);
    assert!(max <= 1.01 * 1.0 / 0.1);
}

#[test]
fn tethered_orientation_mutation_walk_stays_in_bounds() {
    let model = ligand_model();
    let rot_step = 10f64.to_radians();
    let max_rot = 45f64.to_radians();
    let mut element = PositionElement::new(
        model,
        &docking_site(),
        0.1,
        rot_step,
        SamplingMode::Fixed,
        SamplingMode::Tethered,
        1.0,
        max_rot,
    );
    let mut rng = Rand::from_seed(179);
    let (_, min, max) = measure_rand_or_mutate_diff(&mut element, 100_000, true, &mut rng);
    assert!(min >= 0.0);
    assert!(max <= 1.01 * max_rot / rot_step);
}

#[test]
fn tethered_crossover_stays_in_bounds() {
    let model = ligand_model();
    let mut element = PositionElement::new(
        model,
        &docking_site(),
        0.1,
        10f64.to_radians(),
        SamplingMode::Tethered,
        SamplingMode::Tethered,
        1.0,
        45f64.to_radians(),
    );
    let mut rng = Rand::from_seed(181);
    let mut reference = Vec::new();
    element.get_vector(&mut reference);
    let mut partner = element.clone_box();
    let mut child1 = element.clone_box();
    let mut child2 = element.clone_box();
    let mut max_diff = 0.0f64;
    for _ in 0..100 {
        element.randomise(&mut rng);
        partner.randomise(&mut rng);
        crossover(&element, &*partner, child1.as_mut(), child2.as_mut(), &mut rng).unwrap();
        let mut i = 0;
        max_diff = max_diff.max(child1.compare_vector(&reference, &mut i));
        let mut i = 0;
        max_diff = max_diff.max(child2.compare_vector(&reference, &mut i));
    }
    // Both tether bounds are 10 steps wide here
    assert!(max_diff <= 1.01 * 10.0);
}

#[test]
fn occupancy_randomise_is_rectangular_on_the_unit_interval() {
    let model = ligand_model();
    let step_size = 0.1;
    model.borrow_mut().set_occupancy(1.0, 0.5);
    let mut element = OccupancyElement::new(model, step_size, 0.5);
    let mut rng = Rand::from_seed(191);
    let (mean, min, max) =
        measure_rand_or_mutate_diff(&mut element, 1_000_000, false, &mut rng);
    // Differences are measured from the initial occupancy of 1.0, so the
    // rectangular [0, 1] draw appears as displacements in [0, 1]
    let (mean, min, max) = (mean * step_size, min * step_size, max * step_size);
    assert!(min.abs() < 0.01);
    assert!((mean - 0.5).abs() < 0.01);
    assert!((max - 1.0).abs() < 0.01);
}

#[test]
fn occupancy_threshold_yields_the_requested_enable_probability() {
    let model = ligand_model();
    let occupancy_prob = 0.7;
    let threshold = 1.0 - occupancy_prob;
    model.borrow_mut().set_occupancy(1.0, threshold);
    let mut element = OccupancyElement::new(model.clone(), 0.1, threshold);
    let mut rng = Rand::from_seed(193);
    let n_trials = 1_000_000;
    let mut n_enabled = 0usize;
    for _ in 0..n_trials {
        element.randomise(&mut rng);
        element.sync_to_model();
        if model.borrow().is_enabled() {
            n_enabled += 1;
        }
    }
    let enabled_prob = n_enabled as f64 / n_trials as f64;
    assert!((enabled_prob - occupancy_prob).abs() < 0.01);
}
