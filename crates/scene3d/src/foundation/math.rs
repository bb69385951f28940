//! Math types and helpers
//!
//! Thin aliases over nalgebra plus the transform and matrix conveniences the
//! scene graph and renderer are built on.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local transform of a scene node: position, rotation, and scale
///
/// Converted to a matrix as translation * rotation * scale, so scale applies
/// in the node's own frame before rotation and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Translation component
    pub position: Vec3,

    /// Rotation component
    pub rotation: Quat,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Transform that only translates
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Transform that only rotates
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Transform with translation and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Set a uniform scale, builder style
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Convert to a 4x4 transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Math constants
pub mod constants {
    /// Pi
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi, one full turn
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Scalar math helpers
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value to the [min, max] range
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }

    /// Linear interpolation between a and b
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Extension trait adding graphics-oriented constructors to [`Mat4`]
pub trait Mat4Ext {
    /// Rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Perspective projection matrix with Vulkan's [0, 1] depth range
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Axis-flip matrix converting Y-up view space to Vulkan's Y-down,
    /// Z-into-screen clip conventions
    fn vulkan_coordinate_transform() -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // Maps depth to [0, 1] as Vulkan expects; the Y flip lives in
        // vulkan_coordinate_transform, not here.
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn vulkan_coordinate_transform() -> Mat4 {
        // X stays right, Y flips to down, Z flips into the screen.
        Mat4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, -1.0, 0.0, 0.0,
            0.0, 0.0, -1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};

    #[test]
    fn identity_transform_is_identity_matrix() {
        let m = Transform::identity().to_matrix();
        assert_relative_eq!(m, Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn transform_matrix_applies_scale_before_rotation_and_translation() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), constants::PI / 2.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        // The +X unit point scales to (2,0,0), rotates about Y to (0,0,-2),
        // then translates.
        let p = t.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_y_matches_axis_angle_quaternion() {
        let angle = 1.25;
        let from_ext = Mat4::rotation_y(angle);
        let from_quat = Quat::from_axis_angle(&Vec3::y_axis(), angle).to_homogeneous();
        assert!(relative_eq!(from_ext, from_quat, epsilon = 1e-6));
    }

    #[test]
    fn perspective_maps_near_and_far_to_zero_one() {
        let proj = Mat4::perspective(utils::deg_to_rad(45.0), 4.0 / 3.0, 0.1, 100.0);

        let near_point = proj * Vec4::new(0.0, 0.0, 0.1, 1.0);
        assert_relative_eq!(near_point.z / near_point.w, 0.0, epsilon = 1e-5);

        let far_point = proj * Vec4::new(0.0, 0.0, 100.0, 1.0);
        assert_relative_eq!(far_point.z / far_point.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let view = Mat4::look_at(
            Vec3::new(0.0, 0.0, 2.4),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let eye = view.transform_point(&Point3::new(0.0, 0.0, 2.4));
        assert_relative_eq!(eye.coords.norm(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn lerp_endpoints() {
        assert_relative_eq!(utils::lerp(2.0, 6.0, 0.0), 2.0);
        assert_relative_eq!(utils::lerp(2.0, 6.0, 1.0), 6.0);
        assert_relative_eq!(utils::lerp(2.0, 6.0, 0.5), 4.0);
    }
}
