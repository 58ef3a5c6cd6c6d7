use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, Vector3};

/// Maps an angle in degrees onto the standardised range [-180, 180).
pub fn standardise_degrees(mut angle: f64) -> f64 {
    while angle >= 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Maps an angle in radians onto the standardised range [-pi, pi).
pub fn standardise_radians(mut angle: f64) -> f64 {
    while angle >= std::f64::consts::PI {
        angle -= 2.0 * std::f64::consts::PI;
    }
    while angle < -std::f64::consts::PI {
        angle += 2.0 * std::f64::consts::PI;
    }
    angle
}

/// Signed dihedral angle (degrees) defined by four points.
///
/// The sign convention is chosen so that rotating the `p4`-side atoms
/// right-handedly about the `p2`->`p3` axis by an angle delta increases the
/// measured dihedral by delta.
pub fn dihedral_degrees(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;
    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let m = b2.normalize().cross(&n1);
    let x = n1.dot(&n2);
    let y = m.dot(&n2);
    standardise_degrees(y.atan2(x).to_degrees())
}

/// Centre of mass and absolute orientation of a weighted point set.
///
/// The orientation is the rotation taking the Cartesian axes onto the
/// principal inertia axes (sorted by ascending moment, deterministically
/// sign-fixed, right-handed). Because the sign convention is a function of
/// the geometry itself, rigidly rotating the point set rotates the
/// orientation by exactly the same rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxes {
    pub com: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub moments: [f64; 3],
}

impl Default for PrincipalAxes {
    fn default() -> Self {
        Self {
            com: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            moments: [0.0; 3],
        }
    }
}

/// Computes the principal axes of a set of (position, mass) pairs.
pub fn principal_axes(points: &[(Point3<f64>, f64)]) -> PrincipalAxes {
    if points.is_empty() {
        return PrincipalAxes::default();
    }
    let total_mass: f64 = points.iter().map(|(_, m)| m).sum();
    let mut com = Vector3::zeros();
    for (p, m) in points {
        com += p.coords * *m;
    }
    com /= total_mass;
    let com = Point3::from(com);

    // Moment of inertia tensor about the centre of mass
    let mut inertia = Matrix3::zeros();
    for (p, m) in points {
        let d = p - com;
        inertia += *m * (d.norm_squared() * Matrix3::identity() - d * d.transpose());
    }

    let eigen = inertia.symmetric_eigen();
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let mut axes = [Vector3::zeros(), Vector3::zeros(), Vector3::zeros()];
    for k in 0..2 {
        let mut axis: Vector3<f64> = eigen.eigenvectors.column(order[k]).clone_owned();
        // Fix the eigenvector sign against the most-projected point so the
        // convention rotates with the geometry
        let mut best_dot = 0.0f64;
        for (p, _) in points {
            let dot = (p - com).dot(&axis);
            if dot.abs() > best_dot.abs() {
                best_dot = dot;
            }
        }
        if best_dot < 0.0 {
            axis = -axis;
        }
        axes[k] = axis;
    }
    axes[2] = axes[0].cross(&axes[1]);

    let rotation = Matrix3::from_columns(&axes);
    let orientation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
        rotation,
    ));
    PrincipalAxes {
        com,
        orientation,
        moments: [
            eigen.eigenvalues[order[0]],
            eigen.eigenvalues[order[1]],
            eigen.eigenvalues[order[2]],
        ],
    }
}

/// Decomposes a rotation into (heading, attitude, bank) Euler angles.
pub fn euler_from_quat(q: &UnitQuaternion<f64>) -> (f64, f64, f64) {
    let (bank, attitude, heading) = q.euler_angles();
    (heading, attitude, bank)
}

/// Reconstructs a rotation from (heading, attitude, bank) Euler angles.
pub fn quat_from_euler(heading: f64, attitude: f64, bank: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(bank, attitude, heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Unit;

    const TINY: f64 = 1e-9;

    #[test]
    fn standardise_degrees_wraps_into_range() {
        assert_eq!(standardise_degrees(180.0), -180.0);
        assert_eq!(standardise_degrees(-180.0), -180.0);
        assert!((standardise_degrees(540.0) - (-180.0)).abs() < TINY);
        assert!((standardise_degrees(-190.0) - 170.0).abs() < TINY);
        assert_eq!(standardise_degrees(90.0), 90.0);
    }

    #[test]
    fn dihedral_of_cis_arrangement_is_zero() {
        let p1 = Point3::new(1.0, 0.0, -1.0);
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(0.0, 0.0, 1.0);
        let p4 = Point3::new(1.0, 0.0, 2.0);
        assert!(dihedral_degrees(&p1, &p2, &p3, &p4).abs() < TINY);
    }

    #[test]
    fn dihedral_sign_follows_right_handed_rotation() {
        let p1 = Point3::new(1.0, 0.0, -1.0);
        let p2 = Point3::new(0.0, 0.0, 0.0);
        let p3 = Point3::new(0.0, 0.0, 1.0);
        // p4 rotated +90 degrees about the +z bond axis from the cis position
        let p4 = Point3::new(0.0, 1.0, 2.0);
        assert!((dihedral_degrees(&p1, &p2, &p3, &p4) - 90.0).abs() < TINY);
    }

    #[test]
    fn principal_axes_com_is_mass_weighted() {
        let points = [
            (Point3::new(0.0, 0.0, 0.0), 1.0),
            (Point3::new(2.0, 0.0, 0.0), 3.0),
        ];
        let pa = principal_axes(&points);
        assert!((pa.com.x - 1.5).abs() < TINY);
    }

    #[test]
    fn principal_axes_rotate_with_the_geometry() {
        let points = vec![
            (Point3::new(0.0, 0.0, 0.0), 12.0),
            (Point3::new(1.5, 0.0, 0.0), 14.0),
            (Point3::new(2.1, 1.2, 0.0), 16.0),
            (Point3::new(2.8, 1.9, 0.9), 1.0),
        ];
        let pa = principal_axes(&points);

        let q = UnitQuaternion::from_axis_angle(
            &Unit::new_normalize(Vector3::new(0.3, -1.0, 0.7)),
            1.1,
        );
        let rotated: Vec<_> = points
            .iter()
            .map(|(p, m)| (Point3::from(q.transform_vector(&p.coords)), *m))
            .collect();
        let pa_rot = principal_axes(&rotated);

        let expected = q * pa.orientation;
        assert!(pa_rot.orientation.angle_to(&expected) < 1e-6);
    }

    #[test]
    fn euler_round_trip_preserves_rotation() {
        let q = UnitQuaternion::from_euler_angles(0.3, -0.8, 2.1);
        let (heading, attitude, bank) = euler_from_quat(&q);
        let q2 = quat_from_euler(heading, attitude, bank);
        assert!(q.angle_to(&q2) < TINY);
    }
}
