//! Bounding volumes
//!
//! Spherical bounds are the scheduling and influence currency of the scene
//! graph: behaviors run while the viewer is inside their scheduling bounds,
//! and lights reach shapes whose world bounds intersect their influencing
//! bounds.

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Sphere in 3D space used as a bounding volume
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center
    pub center: Point3,
    /// Sphere radius, never negative
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a bounding sphere from center and radius
    pub fn new(center: Point3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Sphere of the given radius centered at the origin
    pub fn at_origin(radius: f32) -> Self {
        Self::new(Point3::origin(), radius)
    }

    /// Bounds of a point cloud: centroid center with the radius reaching the
    /// farthest point
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Self {
        let points: Vec<Point3> = points.into_iter().collect();
        if points.is_empty() {
            return Self::new(Point3::origin(), 0.0);
        }

        let mut center = Vec3::zeros();
        for p in &points {
            center += p.coords;
        }
        center /= points.len() as f32;
        let center = Point3::from(center);

        let radius = points
            .iter()
            .map(|p| (p - center).norm())
            .fold(0.0f32, f32::max);

        Self { center, radius }
    }

    /// Whether the point lies inside or on the sphere
    pub fn contains_point(&self, point: Point3) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }

    /// Whether two spheres overlap or touch
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_sq = (other.center - self.center).norm_squared();
        let reach = self.radius + other.radius;
        distance_sq <= reach * reach
    }

    /// Bounds after applying a node-to-world matrix
    ///
    /// The center goes through the full transform; the radius scales by the
    /// largest column length so the result stays conservative under
    /// non-uniform scale.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let center = matrix.transform_point(&self.center);

        let scale_x = Vec3::new(matrix[(0, 0)], matrix[(1, 0)], matrix[(2, 0)]).norm();
        let scale_y = Vec3::new(matrix[(0, 1)], matrix[(1, 1)], matrix[(2, 1)]).norm();
        let scale_z = Vec3::new(matrix[(0, 2)], matrix[(1, 2)], matrix[(2, 2)]).norm();
        let max_scale = scale_x.max(scale_y).max(scale_z);

        Self {
            center,
            radius: self.radius * max_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Transform};
    use approx::assert_relative_eq;

    #[test]
    fn contains_point_includes_surface() {
        let bounds = BoundingSphere::at_origin(2.0);
        assert!(bounds.contains_point(Point3::new(2.0, 0.0, 0.0)));
        assert!(bounds.contains_point(Point3::new(0.5, 0.5, 0.5)));
        assert!(!bounds.contains_point(Point3::new(2.1, 0.0, 0.0)));
    }

    #[test]
    fn intersects_is_symmetric() {
        let a = BoundingSphere::at_origin(1.0);
        let b = BoundingSphere::new(Point3::new(1.5, 0.0, 0.0), 1.0);
        let c = BoundingSphere::new(Point3::new(5.0, 0.0, 0.0), 1.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn from_points_reaches_farthest_point() {
        let bounds = BoundingSphere::from_points([
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        assert_relative_eq!(bounds.center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.radius, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn from_points_empty_is_degenerate() {
        let bounds = BoundingSphere::from_points([]);
        assert_eq!(bounds.radius, 0.0);
    }

    #[test]
    fn transformed_translates_center() {
        let bounds = BoundingSphere::at_origin(0.5);
        let moved = bounds.transformed(
            &Transform::from_position(crate::foundation::math::Vec3::new(1.5, 0.0, 0.0))
                .to_matrix(),
        );
        assert_relative_eq!(moved.center.x, 1.5, epsilon = 1e-6);
        assert_relative_eq!(moved.radius, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn transformed_scales_radius_conservatively() {
        let bounds = BoundingSphere::at_origin(1.0);
        let scaled = bounds.transformed(&Mat4::new_nonuniform_scaling(&Vec3::new(1.0, 3.0, 2.0)));
        assert_relative_eq!(scaled.radius, 3.0, epsilon = 1e-6);

        // Rotation alone leaves the radius untouched.
        let rotated = bounds.transformed(&Mat4::rotation_y(1.0));
        assert_relative_eq!(rotated.radius, 1.0, epsilon = 1e-5);
    }
}
