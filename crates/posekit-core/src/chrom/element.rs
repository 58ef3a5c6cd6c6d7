use crate::core::rand::Rand;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default threshold used to assess equality of two chromosome elements.
pub const EQUALITY_THRESHOLD: f64 = 1e-4;

/// Sentinel returned by `compare`/`compare_vector` when a comparison is
/// invalid (mismatched lengths, cursor out of range). Comparisons run in
/// hot loops, so invalidity is signalled by value rather than by error.
pub const INVALID_COMPARISON: f64 = -1.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChromError {
    #[error("index {index} out of range or insufficient elements remaining (need {needed}, have {available})")]
    VectorOutOfRange {
        index: usize,
        needed: usize,
        available: usize,
    },
    #[error("crossover gene is of incorrect length (expected {expected}, got {got})")]
    GeneLength { expected: usize, got: usize },
    #[error("mismatch in chromosome crossover lengths")]
    CrossoverLengthMismatch,
    #[error("add is invalid for a non-aggregate chromosome element")]
    NonAggregateAdd,
    #[error("unknown chromosome sampling mode ({0})")]
    UnknownMode(String),
}

/// Sampling mode of a degree of freedom, governing how `Randomise` and
/// `Mutate` behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Pinned to the value captured at construction.
    Fixed,
    /// Bounded excursion around the value captured at construction.
    Tethered,
    /// Unrestricted sampling over the full domain.
    #[default]
    Free,
}

impl SamplingMode {
    pub fn is_fixed(&self) -> bool {
        matches!(self, SamplingMode::Fixed)
    }
}

impl FromStr for SamplingMode {
    type Err = ChromError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FIXED" => Ok(SamplingMode::Fixed),
            "TETHERED" => Ok(SamplingMode::Tethered),
            "FREE" => Ok(SamplingMode::Free),
            _ => Err(ChromError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SamplingMode::Fixed => "FIXED",
            SamplingMode::Tethered => "TETHERED",
            SamplingMode::Free => "FREE",
        };
        f.write_str(s)
    }
}

/// One gene group for crossover purposes.
///
/// To prevent splitting an atomic multi-value group (for example a 3-component
/// centre of mass, or the 3 Euler angles of an orientation) in two during
/// crossover, the chromosome converts to a vector of `XoverGene` groups
/// rather than a flat vector of doubles.
pub type XoverGene = Vec<f64>;

/// Capability set shared by every chromosome element (degree of freedom).
///
/// Elements serialize to exactly `length()` scalars at a cursor, and to
/// `xover_length()` gene groups for crossover. `length()` is stable after
/// construction, except for the aggregate which grows via `add` before
/// optimization begins.
pub trait ChromElement: fmt::Debug {
    /// Resets the element to the value captured from the model at
    /// construction time.
    fn reset(&mut self);

    /// Randomises the element within the context of its sampling mode.
    fn randomise(&mut self, rng: &mut Rand);

    /// Mutates the element. `rel_step` is the fraction (0.0..=1.0) of the
    /// maximum defined step size.
    fn mutate(&mut self, rel_step: f64, rng: &mut Rand);

    /// Updates the element to match the current model state (read-only on
    /// the model).
    fn sync_from_model(&mut self);

    /// Updates the model state to match the element (write-only on the
    /// model).
    fn sync_to_model(&self);

    /// Creates an independent clone sharing the same immutable reference
    /// data. Mutating the clone never affects the original.
    fn clone_box(&self) -> Box<dyn ChromElement>;

    /// Number of scalar values needed to represent this element.
    fn length(&self) -> usize;

    /// Number of gene groups needed to represent this element for
    /// crossover purposes.
    fn xover_length(&self) -> usize;

    /// Appends exactly `length()` scalars to `v`.
    fn get_vector(&self, v: &mut Vec<f64>);

    /// Appends exactly `xover_length()` gene groups to `v`.
    fn get_xover_vector(&self, v: &mut Vec<XoverGene>);

    /// Consumes exactly `length()` scalars from `v` starting at the
    /// cursor `i`, advancing it. Fails if insufficient entries remain.
    fn set_vector(&mut self, v: &[f64], i: &mut usize) -> Result<(), ChromError>;

    /// Consumes exactly `xover_length()` gene groups from `v` starting at
    /// the cursor `i`, advancing it.
    fn set_xover_vector(&mut self, v: &[XoverGene], i: &mut usize) -> Result<(), ChromError>;

    /// Appends the absolute step size corresponding to each scalar value.
    fn get_step_vector(&self, v: &mut Vec<f64>);

    /// Maximum step-size-normalised absolute difference between this
    /// element and the values in `v` at the cursor, advancing it. Returns
    /// [`INVALID_COMPARISON`] if the cursor is out of range or
    /// insufficient entries remain. Differences are normalised by step
    /// size so that values that are hard to compare numerically (e.g.
    /// cyclic dihedral angles, where -180 and +179 differ by one degree)
    /// compare meaningfully.
    fn compare_vector(&self, v: &[f64], i: &mut usize) -> f64;

    /// Adds a child element. Invalid for every non-aggregate element.
    fn add(&mut self, element: Box<dyn ChromElement>) -> Result<(), ChromError> {
        let _ = element;
        Err(ChromError::NonAggregateAdd)
    }

    // Provided methods

    /// Mutates using the absolute value of a Cauchy random variable as
    /// the relative step size.
    fn cauchy_mutate(&mut self, mean: f64, variance: f64, rng: &mut Rand) {
        let rel_step = rng.cauchy(mean, variance).abs();
        self.mutate(rel_step, rng);
    }

    /// Compares two chromosome elements. Returns [`INVALID_COMPARISON`]
    /// for unequal lengths, else the maximum step-normalised pair-wise
    /// difference as returned by `compare_vector`.
    fn compare(&self, other: &dyn ChromElement) -> f64 {
        if self.length() != other.length() {
            return INVALID_COMPARISON;
        }
        let mut v = Vec::with_capacity(other.length());
        other.get_vector(&mut v);
        let mut i = 0;
        self.compare_vector(&v, &mut i)
    }

    /// True if the elements have near-equal values (valid comparison
    /// below `threshold`). False for an invalid comparison.
    fn equals(&self, other: &dyn ChromElement, threshold: f64) -> bool {
        let cmp = self.compare(other);
        cmp >= 0.0 && cmp < threshold
    }

    /// Convenience: `set_vector` with the cursor initialised to zero.
    fn set_vector_from(&mut self, v: &[f64]) -> Result<(), ChromError> {
        let mut i = 0;
        self.set_vector(v, &mut i)
    }

    /// Convenience: `set_xover_vector` with the cursor initialised to
    /// zero.
    fn set_xover_vector_from(&mut self, v: &[XoverGene]) -> Result<(), ChromError> {
        let mut i = 0;
        self.set_xover_vector(v, &mut i)
    }

    /// Checks that the cursor is in range and that `v` has enough entries
    /// remaining to satisfy `length()`. An empty element accepts any
    /// vector.
    fn flat_vector_ok(&self, v: &[f64], i: usize) -> bool {
        let needed = self.length();
        needed == 0 || (i < v.len() && needed <= v.len() - i)
    }

    /// Checks that the cursor is in range and that `v` has enough entries
    /// remaining to satisfy `xover_length()`.
    fn xover_vector_ok(&self, v: &[XoverGene], i: usize) -> bool {
        let needed = self.xover_length();
        needed == 0 || (i < v.len() && needed <= v.len() - i)
    }
}

impl Clone for Box<dyn ChromElement> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Two-point crossover.
///
/// Extracts the gene-group vectors of the two parents, swaps a random
/// contiguous gene range, and writes the results into the two children.
/// All four chromosomes must have the same crossover length. Gene groups
/// are swapped intact, so atomic multi-value groups are never split.
pub fn crossover(
    parent1: &dyn ChromElement,
    parent2: &dyn ChromElement,
    child1: &mut dyn ChromElement,
    child2: &mut dyn ChromElement,
    rng: &mut Rand,
) -> Result<(), ChromError> {
    let length = parent1.xover_length();
    if length != parent2.xover_length()
        || length != child1.xover_length()
        || length != child2.xover_length()
    {
        return Err(ChromError::CrossoverLengthMismatch);
    }
    if length == 0 {
        return Ok(());
    }
    let mut v1 = Vec::with_capacity(length);
    let mut v2 = Vec::with_capacity(length);
    parent1.get_xover_vector(&mut v1);
    parent2.get_xover_vector(&mut v2);
    // ixbegin is the first gene to cross over, ixend is one past the last.
    // If ixbegin is 0 we need to avoid selecting the whole chromosome.
    let ixbegin = rng.random_int(length);
    let ixend = if ixbegin == 0 {
        rng.random_int(length - 1) + 1
    } else {
        rng.random_int(length - ixbegin) + ixbegin + 1
    };
    for k in ixbegin..ixend {
        std::mem::swap(&mut v1[k], &mut v2[k]);
    }
    child1.set_xover_vector_from(&v1)?;
    child2.set_xover_vector_from(&v2)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_mode_parses_case_insensitively() {
        assert_eq!("fixed".parse::<SamplingMode>(), Ok(SamplingMode::Fixed));
        assert_eq!("TETHERED".parse::<SamplingMode>(), Ok(SamplingMode::Tethered));
        assert_eq!("Free".parse::<SamplingMode>(), Ok(SamplingMode::Free));
        assert!(matches!(
            "loose".parse::<SamplingMode>(),
            Err(ChromError::UnknownMode(_))
        ));
    }

    #[test]
    fn sampling_mode_round_trips_through_display() {
        for mode in [SamplingMode::Fixed, SamplingMode::Tethered, SamplingMode::Free] {
            assert_eq!(mode.to_string().parse::<SamplingMode>(), Ok(mode));
        }
    }
}
