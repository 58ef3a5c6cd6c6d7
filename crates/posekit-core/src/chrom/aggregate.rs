use super::element::{ChromElement, ChromError, INVALID_COMPARISON, XoverGene};
use crate::core::rand::Rand;

/// The aggregate chromosome: an owned, ordered sequence of chromosome
/// elements.
///
/// All operations iterate the children in order and concatenate their
/// results; children are independent degrees of freedom, and the ordering
/// only matters for keeping the vector (de)serialization consistent across
/// calls. This is the only element variant whose `add` succeeds, and the
/// only one whose length can grow (via `add`, before optimization begins).
#[derive(Debug, Clone, Default)]
pub struct Chromosome {
    elements: Vec<Box<dyn ChromElement>>,
}

impl Chromosome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child element. Infallible inherent form of
    /// [`ChromElement::add`].
    pub fn push(&mut self, element: Box<dyn ChromElement>) {
        self.elements.push(element);
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[Box<dyn ChromElement>] {
        &self.elements
    }
}

impl ChromElement for Chromosome {
    fn reset(&mut self) {
        for element in &mut self.elements {
            element.reset();
        }
    }

    fn randomise(&mut self, rng: &mut Rand) {
        for element in &mut self.elements {
            element.randomise(rng);
        }
    }

    fn mutate(&mut self, rel_step: f64, rng: &mut Rand) {
        for element in &mut self.elements {
            element.mutate(rel_step, rng);
        }
    }

    fn sync_from_model(&mut self) {
        for element in &mut self.elements {
            element.sync_from_model();
        }
    }

    fn sync_to_model(&self) {
        for element in &self.elements {
            element.sync_to_model();
        }
    }

    fn clone_box(&self) -> Box<dyn ChromElement> {
        Box::new(self.clone())
    }

    fn length(&self) -> usize {
        self.elements.iter().map(|e| e.length()).sum()
    }

    fn xover_length(&self) -> usize {
        self.elements.iter().map(|e| e.xover_length()).sum()
    }

    fn get_vector(&self, v: &mut Vec<f64>) {
        for element in &self.elements {
            element.get_vector(v);
        }
    }

    fn get_xover_vector(&self, v: &mut Vec<XoverGene>) {
        for element in &self.elements {
            element.get_xover_vector(v);
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
        for element in &mut self.elements {
            element.set_vector(v, i)?;
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
        for element in &mut self.elements {
            element.set_xover_vector(v, i)?;
        }
        Ok(())
    }

    fn get_step_vector(&self, v: &mut Vec<f64>) {
        for element in &self.elements {
            element.get_step_vector(v);
        }
    }

    /// The maximum difference of any of the child elements, or the
    /// negative sentinel if any child reports a mismatch.
    fn compare_vector(&self, v: &[f64], i: &mut usize) -> f64 {
        if !self.flat_vector_ok(v, *i) {
            return INVALID_COMPARISON;
        }
        let mut ret_val = 0.0f64;
        for element in &self.elements {
            let cmp = element.compare_vector(v, i);
            if cmp < 0.0 {
                return cmp;
            }
            ret_val = ret_val.max(cmp);
        }
        ret_val
    }

    fn add(&mut self, element: Box<dyn ChromElement>) -> Result<(), ChromError> {
        self.push(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrom::occupancy::OccupancyElement;
    use crate::core::models::model::MolecularModel;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn solvent_pair() -> Chromosome {
        let mut chrom = Chromosome::new();
        for _ in 0..2 {
            let model = Rc::new(RefCell::new(MolecularModel::new("water")));
            model.borrow_mut().set_occupancy(0.5, 0.5);
            chrom.push(Box::new(OccupancyElement::new(model, 0.1, 0.5)));
        }
        chrom
    }

    #[test]
    fn empty_chromosome_has_zero_length() {
        let chrom = Chromosome::new();
        assert_eq!(chrom.length(), 0);
        assert_eq!(chrom.xover_length(), 0);
    }

    #[test]
    fn length_sums_over_children() {
        let chrom = solvent_pair();
        assert_eq!(chrom.length(), 2);
        assert_eq!(chrom.xover_length(), 2);
    }

    #[test]
    fn add_succeeds_on_the_aggregate_only() {
        let mut chrom = Chromosome::new();
        let child = solvent_pair();
        assert!(chrom.add(child.clone_box()).is_ok());

        let model = Rc::new(RefCell::new(MolecularModel::new("water")));
        let mut leaf = OccupancyElement::new(model, 0.1, 0.5);
        assert_eq!(
            leaf.add(child.clone_box()),
            Err(ChromError::NonAggregateAdd)
        );
    }

    #[test]
    fn vector_round_trip_covers_all_children() {
        let mut chrom = solvent_pair();
        chrom.set_vector_from(&[0.25, 0.75]).unwrap();
        let mut v = Vec::new();
        chrom.get_vector(&mut v);
        assert_eq!(v, vec![0.25, 0.75]);
    }

    #[test]
    fn set_vector_with_too_few_values_fails() {
        let mut chrom = solvent_pair();
        assert!(matches!(
            chrom.set_vector_from(&[0.5]),
            Err(ChromError::VectorOutOfRange { .. })
        ));
    }

    #[test]
    fn compare_against_zero_length_chromosome_is_invalid() {
        let chrom = solvent_pair();
        let empty = Chromosome::new();
        assert_eq!(chrom.compare(&empty), INVALID_COMPARISON);
        assert!(!chrom.equals(&empty, 1.0));
    }

    #[test]
    fn compare_reports_the_worst_child() {
        let mut chrom = solvent_pair();
        chrom.set_vector_from(&[0.5, 0.5]).unwrap();
        let mut i = 0;
        let cmp = chrom.compare_vector(&[0.51, 0.8], &mut i);
        // Second child differs by 0.3 against a step of 0.1
        assert!((cmp - 3.0).abs() < 1e-9);
    }
}
