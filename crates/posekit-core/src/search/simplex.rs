use super::error::SearchError;
use crate::chrom::element::ChromElement;
use crate::core::scoring::ScoringFunction;

/// Derivative-free Nelder-Mead simplex search over a chromosome's flat
/// vector.
///
/// The search walks an (N+1)-point simplex in the N-dimensional chromosome
/// space: each iteration reflects the worst point through the centroid of
/// the others, then expands, contracts, or shrinks depending on how the
/// reflected value compares against the best, second-worst, and worst
/// values. Every evaluation sets the chromosome's flat vector, syncs it to
/// the model, and reads the scoring function; the call counter increments
/// on every evaluation regardless of which move triggered it.
///
/// State machine: an `init_*` call builds and evaluates the simplex (and
/// resets the call counter); `exploratory_moves` then iterates until
/// [`SimplexSearch::stop`] reports either budget exhaustion or
/// convergence, the latter flagged via [`SimplexSearch::tolerance_hit`].
pub struct SimplexSearch<'a> {
    chrom: &'a mut dyn ChromElement,
    scoring_fn: &'a dyn ScoringFunction,
    dimensions: usize,
    /// Reflection coefficient.
    alpha: f64,
    /// Contraction coefficient.
    beta: f64,
    /// Expansion coefficient.
    gamma: f64,
    /// Shrink coefficient.
    sigma: f64,
    max_calls: Option<usize>,
    stopping_length: f64,
    /// (N+1) x N simplex points; empty until initialised.
    simplex: Vec<Vec<f64>>,
    /// Function value per simplex point.
    values: Vec<f64>,
    min_index: usize,
    max_index: usize,
    function_calls: usize,
    tolerance_hit: bool,
}

/// Which point a contraction moved towards, controlling the tie rule for
/// accepting the contracted point.
enum ContractionTarget {
    Reflection,
    Worst,
}

impl<'a> SimplexSearch<'a> {
    /// Creates an uninitialised search with the standard Nelder-Mead
    /// coefficients (reflection 1.0, contraction 0.5, expansion 2.0,
    /// shrink 0.5), no call budget, and a 1e-8 stopping length.
    pub fn new(chrom: &'a mut dyn ChromElement, scoring_fn: &'a dyn ScoringFunction) -> Self {
        let dimensions = chrom.length();
        Self {
            chrom,
            scoring_fn,
            dimensions,
            alpha: 1.0,
            beta: 0.5,
            gamma: 2.0,
            sigma: 0.5,
            max_calls: None,
            stopping_length: 1e-8,
            simplex: Vec::new(),
            values: Vec::new(),
            min_index: 0,
            max_index: 0,
            function_calls: 0,
            tolerance_hit: false,
        }
    }

    pub fn with_coefficients(mut self, alpha: f64, beta: f64, gamma: f64, sigma: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
        self.sigma = sigma;
        self
    }

    pub fn set_max_calls(&mut self, max_calls: Option<usize>) {
        self.max_calls = max_calls;
    }

    pub fn set_stopping_length(&mut self, stopping_length: f64) {
        self.stopping_length = stopping_length;
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The number of scoring-function evaluations since the last init.
    pub fn function_calls(&self) -> usize {
        self.function_calls
    }

    /// True when the last run terminated on the convergence tolerance
    /// rather than the call budget.
    pub fn tolerance_hit(&self) -> bool {
        self.tolerance_hit
    }

    /// The best simplex point, once initialised.
    pub fn min_point(&self) -> Option<&[f64]> {
        self.simplex.get(self.min_index).map(Vec::as_slice)
    }

    /// The best simplex value, once initialised.
    pub fn min_val(&self) -> Option<f64> {
        self.values.get(self.min_index).copied()
    }

    /// Builds a right simplex with equal edge lengths along every axis
    /// from the base point.
    pub fn init_fixed_length_right_simplex(
        &mut self,
        base_point: &[f64],
        edge_length: f64,
    ) -> Result<(), SearchError> {
        let edge_lengths = vec![edge_length; self.dimensions];
        self.init_variable_length_right_simplex(base_point, &edge_lengths)
    }

    /// Builds a right simplex with a per-axis edge length from the base
    /// point: point i offsets the base along axis i, and the base point
    /// itself is the final vertex.
    pub fn init_variable_length_right_simplex(
        &mut self,
        base_point: &[f64],
        edge_lengths: &[f64],
    ) -> Result<(), SearchError> {
        if base_point.len() != self.dimensions {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimensions,
                got: base_point.len(),
            });
        }
        if edge_lengths.len() != self.dimensions {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimensions,
                got: edge_lengths.len(),
            });
        }
        let mut plex = vec![base_point.to_vec(); self.dimensions + 1];
        for (i, row) in plex.iter_mut().enumerate().take(self.dimensions) {
            row[i] += edge_lengths[i];
        }
        self.init_general_simplex(plex)
    }

    fn init_general_simplex(&mut self, plex: Vec<Vec<f64>>) -> Result<(), SearchError> {
        self.function_calls = 0;
        self.tolerance_hit = false;
        self.simplex = plex;
        self.values = vec![0.0; self.dimensions + 1];
        for i in 0..=self.dimensions {
            let point = self.simplex[i].clone();
            self.values[i] = self.fcn_call(&point)?;
        }
        self.find_min_max_indices();
        Ok(())
    }

    /// One evaluation: write the vector to the chromosome, sync to the
    /// model, score.
    fn fcn_call(&mut self, point: &[f64]) -> Result<f64, SearchError> {
        self.chrom.set_vector_from(point)?;
        self.chrom.sync_to_model();
        let value = self.scoring_fn.score();
        self.function_calls += 1;
        Ok(value)
    }

    fn budget_reached(&self) -> bool {
        self.max_calls
            .is_some_and(|max| self.function_calls >= max)
    }

    /// Iterates reflection/expansion/contraction/shrink moves until a
    /// stopping criterion is satisfied.
    pub fn exploratory_moves(&mut self) -> Result<(), SearchError> {
        if self.values.is_empty() {
            return Err(SearchError::SimplexUninitialised);
        }
        // A zero-length chromosome has nothing to optimise
        if self.dimensions == 0 {
            return Ok(());
        }
        self.tolerance_hit = false;
        self.find_min_max_indices();
        loop {
            let centroid = self.centroid();
            let second_highest_value = self.values[self.second_highest_index()];

            // Reflection step
            let reflection: Vec<f64> = centroid
                .iter()
                .zip(&self.simplex[self.max_index])
                .map(|(c, worst)| c * (1.0 + self.alpha) - self.alpha * worst)
                .collect();
            let reflection_value = self.fcn_call(&reflection)?;

            // Out of budget: keep the reflected point and leave the
            // simplex in a consistent state
            if self.budget_reached() {
                self.find_min_max_indices();
                self.replace_worst(reflection, reflection_value);
                self.find_min_max_indices();
                return Ok(());
            }

            if self.values[self.min_index] > reflection_value {
                // Expansion step
                let expansion: Vec<f64> = centroid
                    .iter()
                    .zip(&reflection)
                    .map(|(c, r)| c * (1.0 - self.gamma) + self.gamma * r)
                    .collect();
                let expansion_value = self.fcn_call(&expansion)?;
                if reflection_value > expansion_value {
                    self.replace_worst(expansion, expansion_value);
                } else {
                    self.replace_worst(reflection, reflection_value);
                }
            } else if second_highest_value > reflection_value
                && reflection_value >= self.values[self.min_index]
            {
                self.replace_worst(reflection, reflection_value);
            } else {
                // Contraction step, towards the better of the worst point
                // and the reflected point
                let worst_value = self.values[self.max_index];
                let (target_point, target_value, target) = if worst_value <= reflection_value {
                    (
                        self.simplex[self.max_index].clone(),
                        worst_value,
                        ContractionTarget::Worst,
                    )
                } else {
                    (
                        reflection.clone(),
                        reflection_value,
                        ContractionTarget::Reflection,
                    )
                };
                let contraction: Vec<f64> = centroid
                    .iter()
                    .zip(&target_point)
                    .map(|(c, t)| c * (1.0 - self.beta) + self.beta * t)
                    .collect();
                let contraction_value = self.fcn_call(&contraction)?;
                let failed = match target {
                    ContractionTarget::Reflection => contraction_value > target_value,
                    ContractionTarget::Worst => contraction_value >= target_value,
                };
                if failed {
                    self.shrink_simplex()?;
                } else {
                    self.replace_worst(contraction, contraction_value);
                }
            }
            self.find_min_max_indices();
            if self.stop() {
                return Ok(());
            }
        }
    }

    /// True when the call budget is exhausted, or when the sample
    /// standard deviation of the simplex values (over dimensions + 1
    /// points) falls below the stopping length. The latter sets the
    /// tolerance-hit flag, distinguishing convergence from budget
    /// exhaustion.
    fn stop(&mut self) -> bool {
        if self.budget_reached() {
            return true;
        }
        let n = self.dimensions as f64;
        let mut mean = 0.0;
        for (i, value) in self.values.iter().enumerate() {
            if i != self.min_index {
                mean += value;
            }
        }
        mean /= n;
        let mut total = 0.0;
        for value in &self.values {
            total += (value - mean).powi(2);
        }
        total = (total / (n + 1.0)).sqrt();
        if total < self.stopping_length {
            self.tolerance_hit = true;
            true
        } else {
            false
        }
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        self.simplex[self.max_index] = point;
        self.values[self.max_index] = value;
    }

    fn find_min_max_indices(&mut self) {
        self.min_index = 0;
        self.max_index = 0;
        for (i, value) in self.values.iter().enumerate() {
            if *value < self.values[self.min_index] {
                self.min_index = i;
            }
            if *value > self.values[self.max_index] {
                self.max_index = i;
            }
        }
    }

    fn second_highest_index(&self) -> usize {
        let mut index = self.min_index;
        for (i, value) in self.values.iter().enumerate() {
            if i != self.max_index && *value > self.values[index] {
                index = i;
            }
        }
        index
    }

    /// Centroid of all simplex points excluding the worst.
    fn centroid(&self) -> Vec<f64> {
        let mut centroid = vec![0.0; self.dimensions];
        for (i, point) in self.simplex.iter().enumerate() {
            if i != self.max_index {
                for (c, x) in centroid.iter_mut().zip(point) {
                    *c += x;
                }
            }
        }
        for c in &mut centroid {
            *c /= self.dimensions as f64;
        }
        centroid
    }

    /// Shrinks every point except the best towards the best point,
    /// re-evaluating as it goes. Bails out early if the call budget is
    /// reached.
    fn shrink_simplex(&mut self) -> Result<(), SearchError> {
        if self.budget_reached() {
            return Ok(());
        }
        let lowest = self.simplex[self.min_index].clone();
        for i in 0..=self.dimensions {
            if i == self.min_index {
                continue;
            }
            let shrunk: Vec<f64> = self.simplex[i]
                .iter()
                .zip(&lowest)
                .map(|(x, low)| x + self.sigma * (low - x))
                .collect();
            self.values[i] = self.fcn_call(&shrunk)?;
            self.simplex[i] = shrunk;
            if self.budget_reached() {
                return Ok(());
            }
        }
        Ok(())
    }
}
