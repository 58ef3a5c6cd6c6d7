use crate::core::utils::elements::atomic_mass;
use nalgebra::Point3;

/// Represents an atom in the molecular model.
///
/// Only the properties the optimizer needs are carried: a name for
/// diagnostics, the element symbol (used to resolve the atomic mass for
/// centre-of-mass and principal-axes computations), and the current 3D
/// coordinates. Force-field typing and charges belong to the external
/// scoring-function implementations and are not represented here.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N1", "O").
    pub name: String,
    /// The element symbol (e.g., "C", "N", "O", "H").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` with the given name, element, and position.
    pub fn new(name: &str, element: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element: element.to_string(),
            position,
        }
    }

    /// The atomic mass in amu, resolved from the element symbol.
    pub fn mass(&self) -> f64 {
        atomic_mass(&self.element)
    }
}
