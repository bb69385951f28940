//! Light sources
//!
//! Directional and ambient lights with spherical regions of influence. A
//! light reaches a shape only while its influencing bounds intersect the
//! shape's world bounds; a light with no bounds set influences nothing,
//! which is the retained-graph convention this toolkit follows.

use crate::foundation::math::Vec3;
use crate::scene::bounds::BoundingSphere;

/// Most directional lights the forward pass uploads per frame
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// What kind of light this is
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Infinitely distant light traveling along `direction`
    Directional {
        /// Propagation direction, not required to be normalized
        direction: Vec3,
    },
    /// Orientation-independent fill light
    Ambient,
}

/// A light source in the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Light color
    pub color: [f32; 3],
    kind: LightKind,
    influencing_bounds: Option<BoundingSphere>,
}

impl Light {
    /// Directional light traveling along `direction`
    pub fn directional(color: [f32; 3], direction: Vec3) -> Self {
        Self {
            color,
            kind: LightKind::Directional { direction },
            influencing_bounds: None,
        }
    }

    /// Ambient fill light
    pub fn ambient(color: [f32; 3]) -> Self {
        Self {
            color,
            kind: LightKind::Ambient,
            influencing_bounds: None,
        }
    }

    /// Set the region of influence, builder style
    pub fn with_influencing_bounds(mut self, bounds: BoundingSphere) -> Self {
        self.influencing_bounds = Some(bounds);
        self
    }

    /// The light kind
    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    /// The region of influence, if any
    pub fn influencing_bounds(&self) -> Option<&BoundingSphere> {
        self.influencing_bounds.as_ref()
    }

    /// Whether this light reaches anything inside `bounds`
    pub fn influences(&self, bounds: &BoundingSphere) -> bool {
        match &self.influencing_bounds {
            Some(influence) => influence.intersects(bounds),
            None => false,
        }
    }

    /// Normalized propagation direction for directional lights
    ///
    /// Returns `None` for ambient lights and for degenerate zero directions.
    pub fn direction(&self) -> Option<Vec3> {
        match &self.kind {
            LightKind::Directional { direction } => {
                let norm = direction.norm();
                if norm > f32::EPSILON {
                    Some(direction / norm)
                } else {
                    None
                }
            }
            LightKind::Ambient => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn directional_light_normalizes_on_query() {
        let light = Light::directional([1.0, 1.0, 1.0], Vec3::new(-1.0, -1.0, -1.0));
        let dir = light.direction().unwrap();
        assert_relative_eq!(dir.norm(), 1.0, epsilon = 1e-6);
        assert!(dir.x < 0.0 && dir.y < 0.0 && dir.z < 0.0);
    }

    #[test]
    fn zero_direction_is_rejected() {
        let light = Light::directional([1.0, 1.0, 1.0], Vec3::zeros());
        assert!(light.direction().is_none());
    }

    #[test]
    fn ambient_has_no_direction() {
        assert!(Light::ambient([0.3, 0.3, 0.3]).direction().is_none());
    }

    #[test]
    fn unbounded_light_influences_nothing() {
        let light = Light::ambient([0.3, 0.3, 0.3]);
        assert!(!light.influences(&BoundingSphere::at_origin(1.0)));
    }

    #[test]
    fn influence_follows_bounds_intersection() {
        let light = Light::directional([1.0, 1.0, 1.0], Vec3::new(-1.0, -1.0, -1.0))
            .with_influencing_bounds(BoundingSphere::at_origin(100.0));

        let near = BoundingSphere::new(Point3::new(1.5, 0.0, 0.0), 0.3);
        let far = BoundingSphere::new(Point3::new(500.0, 0.0, 0.0), 0.3);
        assert!(light.influences(&near));
        assert!(!light.influences(&far));
    }
}
