use super::error::SearchError;
use super::genome::Genome;
use crate::chrom::element::{ChromElement, crossover};
use crate::core::rand::Rand;
use crate::core::scoring::ScoringFunction;
use std::rc::Rc;
use tracing::trace;

/// Sigma-truncation multiplier (Goldberg page 124).
const SIGMA_TRUNCATION: f64 = 2.0;

/// Parent-selection retry budget before the population is declared to
/// lack diversity.
const MAX_SELECT_RETRIES: usize = 100;

/// A fixed-size population of genomes driven by a genetic algorithm.
///
/// Genomes are kept sorted in ascending score order (a stable,
/// deterministic total order), so the best genome is always last.
/// Roulette-wheel fitness values are cumulative in the same order and
/// normalised so the best genome's fitness is 1.0.
pub struct Population {
    genomes: Vec<Genome>,
    max_size: usize,
    scoring_fn: Rc<dyn ScoringFunction>,
    score_mean: f64,
    score_variance: f64,
}

impl Population {
    /// Creates a randomised population of `size` independent clones of
    /// the seed chromosome, scores them, and computes the roulette-wheel
    /// fitness values.
    ///
    /// Fails with `SearchError` if `size` is zero, or if the seed
    /// chromosome or scoring function is absent: continuing would operate
    /// on undefined chromosome geometry.
    pub fn new(
        seed: Option<&dyn ChromElement>,
        size: usize,
        scoring_fn: Option<Rc<dyn ScoringFunction>>,
        rng: &mut Rand,
    ) -> Result<Self, SearchError> {
        let seed = seed.ok_or(SearchError::MissingSeedChromosome)?;
        let scoring_fn = scoring_fn.ok_or(SearchError::MissingScoringFunction)?;
        if size == 0 {
            return Err(SearchError::InvalidPopulationSize);
        }
        let mut genomes = Vec::with_capacity(size);
        for _ in 0..size {
            // The genome constructor clones the chromosome, so every
            // member randomises independently
            let mut genome = Genome::new(seed);
            genome.chrom_mut().randomise(rng);
            genomes.push(genome);
        }
        let mut population = Self {
            genomes,
            max_size: size,
            scoring_fn,
            score_mean: 0.0,
            score_variance: 0.0,
        };
        population.rescore();
        Ok(population)
    }

    /// The maximum size fixed at construction.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// The current number of genomes (equal to `max_size`).
    pub fn actual_size(&self) -> usize {
        self.genomes.len()
    }

    /// The best (highest-score) genome.
    pub fn best(&self) -> Option<&Genome> {
        self.genomes.last()
    }

    /// Read-only view of the genomes in ascending score order.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn score_mean(&self) -> f64 {
        self.score_mean
    }

    pub fn score_variance(&self) -> f64 {
        self.score_variance
    }

    pub fn scoring_fn(&self) -> &Rc<dyn ScoringFunction> {
        &self.scoring_fn
    }

    /// Replaces the scoring function and rescores every genome. Call this
    /// whenever the scoring-function parameters change, e.g. between GA
    /// stages.
    pub fn set_scoring_function(&mut self, scoring_fn: Rc<dyn ScoringFunction>) {
        self.scoring_fn = scoring_fn;
        self.rescore();
    }

    fn rescore(&mut self) {
        for genome in &mut self.genomes {
            genome.set_score(Some(self.scoring_fn.as_ref()));
        }
        self.sort_by_score();
        self.evaluate_rw_fitness();
    }

    fn sort_by_score(&mut self) {
        self.genomes
            .sort_by(|a, b| a.score().total_cmp(&b.score()));
    }

    /// Performs one GA iteration: create `n_replicates` children by
    /// roulette-wheel parent selection with optional crossover and
    /// Cauchy/regular mutation, then merge them into the population.
    ///
    /// The population size is unchanged by this call and the best score
    /// never decreases.
    #[allow(clippy::too_many_arguments)]
    pub fn ga_step(
        &mut self,
        n_replicates: usize,
        rel_step_size: f64,
        equality_threshold: f64,
        p_crossover: f64,
        xover_mutate: bool,
        cauchy_mutate: bool,
        rng: &mut Rand,
    ) -> Result<(), SearchError> {
        if n_replicates == 0 {
            return Err(SearchError::InvalidReplicateCount);
        }
        let mut children = Vec::with_capacity(n_replicates);
        for _ in 0..n_replicates / 2 {
            let mother = self.roulette_index(rng);
            // The identity check is on the genome index, not chromosome
            // near-equality. Repeatedly selecting the same genome means
            // the population lacks diversity.
            let mut father = self.roulette_index(rng);
            let mut retries = 0;
            while father == mother {
                father = self.roulette_index(rng);
                retries += 1;
                if retries > MAX_SELECT_RETRIES {
                    return Err(SearchError::InsufficientDiversity);
                }
            }
            let mut child1 = self.genomes[mother].clone();
            let mut child2 = self.genomes[father].clone();
            if rng.random01() < p_crossover {
                crossover(
                    self.genomes[father].chrom(),
                    self.genomes[mother].chrom(),
                    child1.chrom_mut(),
                    child2.chrom_mut(),
                    rng,
                )?;
                if xover_mutate {
                    child1.chrom_mut().cauchy_mutate(0.0, rel_step_size, rng);
                    child2.chrom_mut().cauchy_mutate(0.0, rel_step_size, rng);
                }
            } else if cauchy_mutate {
                child1.chrom_mut().cauchy_mutate(0.0, rel_step_size, rng);
                child2.chrom_mut().cauchy_mutate(0.0, rel_step_size, rng);
            } else {
                child1.chrom_mut().mutate(rel_step_size, rng);
                child2.chrom_mut().mutate(rel_step_size, rng);
            }
            children.push(child1);
            children.push(child2);
        }
        // One more child if the replicate count is odd
        if n_replicates % 2 == 1 {
            let mother = self.roulette_index(rng);
            let mut child = self.genomes[mother].clone();
            child.chrom_mut().cauchy_mutate(0.0, rel_step_size, rng);
            children.push(child);
        }
        self.merge_children(children, equality_threshold);
        self.evaluate_rw_fitness();
        Ok(())
    }

    /// Selects a genome with probability proportional to its scaled
    /// fitness: draw uniform [0, 1) and return the first genome (in
    /// ascending cumulative-fitness order) whose fitness reaches the
    /// draw.
    pub fn roulette_wheel_select(&self, rng: &mut Rand) -> &Genome {
        &self.genomes[self.roulette_index(rng)]
    }

    fn roulette_index(&self, rng: &mut Rand) -> usize {
        let cutoff = rng.random01();
        let index = self
            .genomes
            .partition_point(|genome| genome.rw_fitness() < cutoff);
        index.min(self.genomes.len() - 1)
    }

    /// Merges scored children into the population, preserving its size:
    /// a child is inserted only if it is not a near-duplicate of an
    /// existing genome (chromosome equality within `equality_threshold`)
    /// and scores above the current worst, which it evicts.
    fn merge_children(&mut self, mut children: Vec<Genome>, equality_threshold: f64) {
        for child in &mut children {
            child.set_score(Some(self.scoring_fn.as_ref()));
        }
        for child in children {
            if self
                .genomes
                .iter()
                .any(|existing| existing.equals(&child, equality_threshold))
            {
                continue;
            }
            if child.score() <= self.genomes[0].score() {
                continue;
            }
            self.genomes.remove(0);
            let position = self
                .genomes
                .partition_point(|existing| existing.score() <= child.score());
            trace!(score = child.score(), position, "inserting child genome");
            self.genomes.insert(position, child);
        }
    }

    /// Recomputes the roulette-wheel fitness values: sigma-truncated
    /// scaled scores (offset `mean - 2 sigma`, floored at the minimum
    /// score), accumulated in ascending-score order and normalised so the
    /// fitness values run from 0 to 1.
    fn evaluate_rw_fitness(&mut self) {
        let size = self.genomes.len() as f64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for genome in &self.genomes {
            let score = genome.score();
            sum += score;
            sum_sq += score * score;
        }
        self.score_mean = sum / size;
        self.score_variance = (sum_sq / size - self.score_mean * self.score_mean).max(0.0);
        let sigma = self.score_variance.sqrt();
        let min_score = self.genomes[0].score();
        let offset = (self.score_mean - SIGMA_TRUNCATION * sigma).max(min_score);
        let mut partial_sum = 0.0;
        for genome in &mut self.genomes {
            partial_sum = genome.set_rw_fitness(offset, partial_sum);
        }
        for genome in &mut self.genomes {
            genome.normalise_rw_fitness(partial_sum);
        }
    }
}
