use phf::{Map, phf_map};

/// Standard atomic masses (amu) for the elements that occur in receptors,
/// drug-like ligands, and solvent models.
static ATOMIC_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.008,
    "B" => 10.811,
    "C" => 12.011,
    "N" => 14.007,
    "O" => 15.999,
    "F" => 18.998,
    "NA" => 22.990,
    "MG" => 24.305,
    "P" => 30.974,
    "S" => 32.066,
    "CL" => 35.453,
    "K" => 39.098,
    "CA" => 40.078,
    "MN" => 54.938,
    "FE" => 55.845,
    "ZN" => 65.38,
    "BR" => 79.904,
    "I" => 126.904,
};

/// Fallback mass for unparameterized elements.
const DEFAULT_MASS: f64 = 12.011;

/// Looks up the atomic mass for an element symbol (case-insensitive).
/// Unknown symbols fall back to a carbon-like mass so that centre-of-mass
/// computations remain well defined.
pub fn atomic_mass(element: &str) -> f64 {
    ATOMIC_MASSES
        .get(element.to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_MASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(atomic_mass("c"), atomic_mass("C"));
        assert_eq!(atomic_mass("cl"), atomic_mass("CL"));
    }

    #[test]
    fn unknown_element_falls_back_to_default() {
        assert_eq!(atomic_mass("Xx"), DEFAULT_MASS);
    }

    #[test]
    fn common_elements_have_expected_ordering() {
        assert!(atomic_mass("H") < atomic_mass("C"));
        assert!(atomic_mass("C") < atomic_mass("N"));
        assert!(atomic_mass("N") < atomic_mass("O"));
        assert!(atomic_mass("O") < atomic_mass("S"));
    }
}
