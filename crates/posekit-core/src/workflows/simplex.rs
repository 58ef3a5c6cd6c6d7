use crate::chrom::element::ChromElement;
use crate::core::scoring::ScoringFunction;
use crate::search::error::SearchError;
use crate::search::simplex::SimplexSearch;
use serde::Deserialize;
use tracing::{debug, info};

/// Parameters of the iterated simplex minimisation protocol.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimplexParams {
    /// Scoring-function call budget per cycle.
    pub max_calls: usize,
    /// Maximum number of restart cycles.
    pub n_cycles: usize,
    /// Stopping length for the per-cycle convergence test.
    pub stopping_step_length: f64,
    /// Scale factor applied to the chromosome step sizes to obtain the
    /// initial simplex edge lengths.
    pub step_size: f64,
    /// Minimum score improvement between cycles; smaller deltas terminate
    /// the protocol.
    pub convergence: f64,
}

impl Default for SimplexParams {
    fn default() -> Self {
        Self {
            max_calls: 200,
            n_cycles: 5,
            stopping_step_length: 1e-3,
            step_size: 0.1,
            convergence: 0.001,
        }
    }
}

impl SimplexParams {
    /// Loads parameters from a TOML document; missing keys take their
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Runs the iterated simplex minimisation: per cycle, build a
/// variable-length right simplex around the current chromosome value with
/// edge lengths proportional to the per-value step sizes, run the
/// exploratory moves, and adopt the minimum point. Cycles repeat while the
/// score keeps improving by more than the convergence margin. The model is
/// left synchronized to the final chromosome value.
///
/// Returns the final (lower-is-better) score.
pub fn run_simplex(
    chrom: &mut dyn ChromElement,
    scoring_fn: &dyn ScoringFunction,
    params: &SimplexParams,
) -> Result<f64, SearchError> {
    chrom.sync_from_model();
    let mut edge_lengths = Vec::new();
    chrom.get_step_vector(&mut edge_lengths);
    for edge in &mut edge_lengths {
        *edge *= params.step_size;
    }

    let initial_score = scoring_fn.score();
    let mut min = initial_score;
    let mut total_calls = 0usize;
    // Initialise the delta so the loop never terminates immediately
    let mut delta = -params.convergence - 1.0;
    for cycle in 0..params.n_cycles {
        if delta >= -params.convergence {
            break;
        }
        let mut base = Vec::new();
        chrom.get_vector(&mut base);
        let (new_min, min_point, calls) = {
            let mut search = SimplexSearch::new(chrom, scoring_fn);
            search.set_max_calls(Some(params.max_calls));
            search.set_stopping_length(params.stopping_step_length);
            search.init_variable_length_right_simplex(&base, &edge_lengths)?;
            search.exploratory_moves()?;
            let new_min = search.min_val().ok_or(SearchError::SimplexUninitialised)?;
            let min_point = search
                .min_point()
                .ok_or(SearchError::SimplexUninitialised)?
                .to_vec();
            (new_min, min_point, search.function_calls())
        };
        total_calls += calls;
        chrom.set_vector_from(&min_point)?;
        delta = new_min - min;
        min = new_min;
        debug!(cycle, total_calls, score = min, delta, "simplex cycle");
    }
    chrom.sync_to_model();
    info!(
        initial = initial_score,
        score = min,
        calls = total_calls,
        "simplex minimisation finished"
    );
    Ok(min)
}
