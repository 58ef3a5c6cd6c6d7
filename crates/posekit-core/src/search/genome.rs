use crate::chrom::element::{ChromElement, EQUALITY_THRESHOLD};
use crate::core::scoring::ScoringFunction;

/// Genome for roulette-wheel selection: an owned chromosome clone, the
/// associated raw score, and a scaled fitness value.
///
/// Scores are negated at storage time so that higher positive scores are
/// uniformly better across the search layer, regardless of the scoring
/// function's lower-is-better convention.
#[derive(Debug, Clone)]
pub struct Genome {
    chrom: Box<dyn ChromElement>,
    score: f64,
    rw_fitness: f64,
}

impl Genome {
    /// Creates a genome owning an independent clone of `chrom`.
    pub fn new(chrom: &dyn ChromElement) -> Self {
        Self {
            chrom: chrom.clone_box(),
            score: 0.0,
            rw_fitness: 0.0,
        }
    }

    pub fn chrom(&self) -> &dyn ChromElement {
        self.chrom.as_ref()
    }

    pub fn chrom_mut(&mut self) -> &mut dyn ChromElement {
        self.chrom.as_mut()
    }

    /// Synchronizes the chromosome to the model, evaluates the scoring
    /// function once, and stores the negated result. An absent scoring
    /// function stores a zero score.
    pub fn set_score(&mut self, scoring_fn: Option<&dyn ScoringFunction>) {
        self.chrom.sync_to_model();
        self.score = scoring_fn.map(|sf| -sf.score()).unwrap_or(0.0);
        self.rw_fitness = 0.0;
    }

    /// The stored raw score (no re-evaluation).
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Sets the fitness value used for roulette-wheel selection, given
    /// the sigma-truncation offset and the partial sum of all previous
    /// fitness values. Returns the new partial sum.
    ///
    /// Callers must process genomes in ascending-score order; see
    /// `Population::evaluate_rw_fitness` for the canonical use.
    pub fn set_rw_fitness(&mut self, sigma_offset: f64, partial_sum: f64) -> f64 {
        // Sigma truncation: subtract the offset, floor at zero
        self.rw_fitness = (self.score - sigma_offset).max(0.0) + partial_sum;
        self.rw_fitness
    }

    /// Normalises the fitness value to lie between 0 and 1, given the
    /// total sum of fitness values from the last `set_rw_fitness` pass.
    pub fn normalise_rw_fitness(&mut self, total: f64) {
        if total > 0.0 {
            self.rw_fitness /= total;
        }
    }

    pub fn rw_fitness(&self) -> f64 {
        self.rw_fitness
    }

    /// Equality based on chromosome element values only; the score is
    /// not taken into account.
    pub fn equals(&self, other: &Genome, threshold: f64) -> bool {
        self.chrom.equals(other.chrom.as_ref(), threshold)
    }
}

impl PartialEq for Genome {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, EQUALITY_THRESHOLD)
    }
}
