//! Perspective camera
//!
//! World-space camera state plus the matrix chain the renderer consumes.
//! View space is right-handed Y-up; the Vulkan axis-flip is folded in when
//! the combined view-projection matrix is built, so culling and depth behave
//! correctly without per-mesh fixups.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Point3, Vec3};

/// Camera with perspective projection
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera looks at
    pub target: Vec3,

    /// Up direction, usually +Y
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Viewport aspect ratio (width / height)
    pub aspect: f32,

    /// Near clip distance
    pub near: f32,

    /// Far clip distance
    pub far: f32,
}

impl Camera {
    /// Perspective camera at `position` looking at the origin
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Camera at the nominal viewing distance
    ///
    /// Places the eye on +Z looking at the origin, backed off far enough
    /// that one unit at the origin spans the viewport height: the distance
    /// is `1 / tan(fov / 2)`, about 2.41 for the default 45 degree field of
    /// view. This is the standard starting viewpoint for retained scene
    /// viewers.
    pub fn nominal(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let fov = utils::deg_to_rad(fov_degrees);
        let distance = 1.0 / (fov * 0.5).tan();
        Self::perspective(
            Vec3::new(0.0, 0.0, distance),
            fov_degrees,
            aspect,
            near,
            far,
        )
    }

    /// Eye position as a point, for bounds tests
    pub fn position_point(&self) -> Point3 {
        Point3::from(self.position)
    }

    /// Update the aspect ratio after a viewport resize
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("camera aspect ratio {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// View-to-clip projection matrix (before the Vulkan axis flip)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix for the forward pass
    ///
    /// Composed as projection * axis-flip * view, keeping the view and
    /// projection math in conventional Y-up space.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * Mat4::vulkan_coordinate_transform() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::nominal(45.0, 4.0 / 3.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn nominal_distance_for_45_degrees() {
        let camera = Camera::nominal(45.0, 4.0 / 3.0, 0.1, 100.0);
        // 1 / tan(22.5 deg)
        assert_relative_eq!(camera.position.z, 2.4142137, epsilon = 1e-4);
        assert_relative_eq!(camera.position.x, 0.0);
        assert_relative_eq!(camera.position.y, 0.0);
        assert_relative_eq!(camera.target.norm(), 0.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::nominal(45.0, 4.0 / 3.0, 0.1, 100.0);
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        // In front of the camera, inside the depth range.
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn nominal_framing_spans_the_viewport_height() {
        let camera = Camera::nominal(45.0, 1.0, 0.1, 100.0);
        // A point one unit above the origin lands at the top edge of NDC.
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, 1.0, 0.0, 1.0);
        // Vulkan clip space has Y down, so "up" is negative.
        assert_relative_eq!(clip.y / clip.w, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn aspect_ratio_updates() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(16.0 / 9.0);
        assert_relative_eq!(camera.aspect, 16.0 / 9.0);
    }
}
