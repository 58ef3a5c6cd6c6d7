use crate::chrom::element::ChromElement;
use crate::core::rand::Rand;
use crate::core::scoring::ScoringFunction;
use crate::search::error::SearchError;
use crate::search::population::Population;
use serde::Deserialize;
use std::rc::Rc;
use tracing::{debug, info};

/// Parameters of the genetic-algorithm search protocol.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GaParams {
    /// Population size.
    pub pop_size: usize,
    /// Fraction of the population replaced per cycle.
    pub new_fraction: f64,
    /// Probability of crossover (vs pure mutation) per child pair.
    pub p_crossover: f64,
    /// Apply a Cauchy mutation to children produced by crossover.
    pub xover_mutate: bool,
    /// Use Cauchy mutations instead of regular mutations for non-crossover
    /// children.
    pub cauchy_mutate: bool,
    /// Relative step size for chromosome mutations.
    pub step_size: f64,
    /// Chromosome equality threshold for duplicate rejection.
    pub equality_threshold: f64,
    /// Maximum number of GA cycles.
    pub n_cycles: usize,
    /// Stop after this many consecutive cycles without improvement of the
    /// best score.
    pub n_convergence: usize,
}

impl Default for GaParams {
    fn default() -> Self {
        Self {
            pop_size: 50,
            new_fraction: 0.5,
            p_crossover: 0.4,
            xover_mutate: true,
            cauchy_mutate: false,
            step_size: 1.0,
            equality_threshold: 0.1,
            n_cycles: 100,
            n_convergence: 6,
        }
    }
}

impl GaParams {
    /// Loads parameters from a TOML document; missing keys take their
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Runs the genetic-algorithm protocol: build a randomised population from
/// the seed chromosome, iterate GA cycles until the cycle budget or the
/// convergence criterion is reached, and leave the model synchronized to
/// the best genome.
///
/// Returns the final population (sorted ascending by score, best last).
pub fn run_ga(
    seed: &dyn ChromElement,
    scoring_fn: Rc<dyn ScoringFunction>,
    params: &GaParams,
    rng: &mut Rand,
) -> Result<Population, SearchError> {
    let mut population = Population::new(Some(seed), params.pop_size, Some(scoring_fn), rng)?;
    let n_replicates = ((params.new_fraction * params.pop_size as f64) as usize).max(1);

    let mut best_score = population.best().map(|g| g.score()).unwrap_or(0.0);
    let mut convergence = 0usize;
    for cycle in 0..params.n_cycles {
        if convergence >= params.n_convergence {
            break;
        }
        population.ga_step(
            n_replicates,
            params.step_size,
            params.equality_threshold,
            params.p_crossover,
            params.xover_mutate,
            params.cauchy_mutate,
            rng,
        )?;
        let score = population.best().map(|g| g.score()).unwrap_or(best_score);
        if score > best_score {
            best_score = score;
            convergence = 0;
        } else {
            convergence += 1;
        }
        debug!(
            cycle,
            convergence,
            best = score,
            mean = population.score_mean(),
            variance = population.score_variance(),
            "ga cycle"
        );
    }
    if let Some(best) = population.best() {
        best.chrom().sync_to_model();
    }
    info!(best = best_score, "genetic algorithm finished");
    Ok(population)
}
