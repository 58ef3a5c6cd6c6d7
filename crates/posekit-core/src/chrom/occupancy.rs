use super::element::{ChromElement, ChromError, INVALID_COMPARISON, XoverGene};
use crate::core::models::model::MolecularModel;
use crate::core::rand::Rand;
use std::cell::RefCell;
use std::rc::Rc;

/// Immutable reference data for one solvent-occupancy degree of freedom.
#[derive(Debug)]
pub struct OccupancyRefData {
    model: Rc<RefCell<MolecularModel>>,
    step_size: f64,
    /// Decision threshold: the model is enabled iff the occupancy value
    /// reaches it. A threshold T gives an enabled probability of (1 - T)
    /// under uniform randomisation.
    threshold: f64,
    initial_value: f64,
}

impl OccupancyRefData {
    pub fn new(model: Rc<RefCell<MolecularModel>>, step_size: f64, threshold: f64) -> Self {
        let initial_value = model.borrow().occupancy();
        Self {
            model,
            step_size,
            threshold,
            initial_value,
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn model_value(&self) -> f64 {
        self.model.borrow().occupancy()
    }

    pub fn set_model_value(&self, value: f64) {
        self.model.borrow_mut().set_occupancy(value, self.threshold);
    }
}

/// One solvent-occupancy scalar in [0, 1]; effectively always free.
#[derive(Debug, Clone)]
pub struct OccupancyElement {
    ref_data: Rc<OccupancyRefData>,
    value: f64,
}

impl OccupancyElement {
    pub fn new(model: Rc<RefCell<MolecularModel>>, step_size: f64, threshold: f64) -> Self {
        let ref_data = Rc::new(OccupancyRefData::new(model, step_size, threshold));
        let value = ref_data.initial_value();
        Self { ref_data, value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Clamps an occupancy value onto [0, 1]; unlike angles, occupancy
    /// does not wrap around.
    fn standardised_value(value: f64) -> f64 {
        value.clamp(0.0, 1.0)
    }
}

impl ChromElement for OccupancyElement {
    fn reset(&mut self) {
        self.value = self.ref_data.initial_value();
    }

    fn randomise(&mut self, rng: &mut Rand) {
        self.value = rng.random01();
    }

    fn mutate(&mut self, rel_step: f64, rng: &mut Rand) {
        let abs_step = rel_step * self.ref_data.step_size();
        if abs_step > 0.0 {
            let delta = 2.0 * abs_step * rng.random01() - abs_step;
            self.value = Self::standardised_value(self.value + delta);
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
        self.value = Self::standardised_value(v[*i]);
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
            (self.value - other).abs() / step_size
        } else {
            0.0
        }
    }
}
