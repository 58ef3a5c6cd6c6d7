use nalgebra::Point3;

/// The docking-site collaborator: an enumerable, indexable list of
/// candidate coordinates inside the docking volume.
///
/// Free-translation randomisation draws the centre of mass from this list;
/// receptor flexibility discovery uses the range predicate to restrict
/// flexible bonds to the neighbourhood of the site.
#[derive(Debug, Clone, Default)]
pub struct DockingSite {
    coords: Vec<Point3<f64>>,
}

impl DockingSite {
    pub fn new(coords: Vec<Point3<f64>>) -> Self {
        Self { coords }
    }

    pub fn num_coords(&self) -> usize {
        self.coords.len()
    }

    pub fn coord(&self, index: usize) -> Option<Point3<f64>> {
        self.coords.get(index).copied()
    }

    pub fn coords(&self) -> &[Point3<f64>] {
        &self.coords
    }

    /// True if `point` lies within `distance` of any site coordinate.
    pub fn is_in_range(&self, point: &Point3<f64>, distance: f64) -> bool {
        self.coords
            .iter()
            .any(|c| (c - point).norm_squared() <= distance * distance)
    }
}
