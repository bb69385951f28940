//! Time-driven behaviors
//!
//! The only animation primitive this toolkit ships: a time-to-[0,1] ramp
//! ([`Alpha`]) feeding a rotation interpolator ([`RotationBehavior`]) that
//! rewrites one transform group per frame. Behaviors are scene nodes; the
//! universe ticks them between event polling and drawing.

use std::time::Duration;

use crate::foundation::math::{constants, utils, Point3, Quat, Transform, Vec3};
use crate::scene::bounds::BoundingSphere;
use crate::scene::graph::NodeKey;

/// Maps elapsed wall-clock time onto the [0, 1] interval
///
/// An alpha ramps from 0 to 1 over its increasing duration, then either wraps
/// (infinite looping) or, once its loop budget is spent, holds at 1.
#[derive(Debug, Clone)]
pub struct Alpha {
    loop_count: i32,
    increasing_duration: Duration,
}

impl Alpha {
    /// Alpha that runs `loop_count` cycles of `increasing_duration`
    ///
    /// A negative `loop_count` loops forever.
    pub fn new(loop_count: i32, increasing_duration: Duration) -> Self {
        Self {
            loop_count,
            increasing_duration,
        }
    }

    /// Alpha that loops forever with the given cycle duration
    pub fn infinite(increasing_duration: Duration) -> Self {
        Self::new(-1, increasing_duration)
    }

    /// One cycle's duration
    pub fn increasing_duration(&self) -> Duration {
        self.increasing_duration
    }

    /// Alpha value for the given elapsed time
    ///
    /// A zero-length cycle and a finished finite alpha both report 1.0.
    pub fn value(&self, elapsed: Duration) -> f32 {
        let cycle = self.increasing_duration.as_secs_f64();
        if cycle <= 0.0 {
            return 1.0;
        }

        let t = elapsed.as_secs_f64();
        if self.is_finished(elapsed) {
            return 1.0;
        }

        ((t % cycle) / cycle) as f32
    }

    /// Whether a finite alpha has used up all of its loops
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        if self.loop_count < 0 {
            return false;
        }
        let total = self.increasing_duration.as_secs_f64() * f64::from(self.loop_count);
        elapsed.as_secs_f64() >= total
    }
}

/// Rotates a transform group over time
///
/// Each tick interpolates an angle between `minimum_angle` and
/// `maximum_angle` by the alpha value and **replaces** the target's local
/// transform with a rotation in the axis frame: with the default identity
/// frame that is a plain rotation about world +Y. The target must be a
/// transform group created with
/// [`Capabilities::ALLOW_TRANSFORM_WRITE`](crate::scene::Capabilities) for
/// the write to be legal after compilation.
#[derive(Debug, Clone)]
pub struct RotationBehavior {
    alpha: Alpha,
    target: NodeKey,
    axis_frame: Transform,
    minimum_angle: f32,
    maximum_angle: f32,
    scheduling_bounds: Option<BoundingSphere>,
}

impl RotationBehavior {
    /// Full-turn rotation about world +Y driven by `alpha`
    pub fn new(alpha: Alpha, target: NodeKey) -> Self {
        Self {
            alpha,
            target,
            axis_frame: Transform::identity(),
            minimum_angle: 0.0,
            maximum_angle: constants::TAU,
            scheduling_bounds: None,
        }
    }

    /// Set the interpolation angle range in radians, builder style
    pub fn with_angles(mut self, minimum_angle: f32, maximum_angle: f32) -> Self {
        self.minimum_angle = minimum_angle;
        self.maximum_angle = maximum_angle;
        self
    }

    /// Set the frame whose +Y axis the rotation spins about, builder style
    pub fn with_axis_frame(mut self, axis_frame: Transform) -> Self {
        self.axis_frame = axis_frame;
        self
    }

    /// Set the scheduling bounds, builder style
    ///
    /// A behavior with no scheduling bounds never runs.
    pub fn with_scheduling_bounds(mut self, bounds: BoundingSphere) -> Self {
        self.scheduling_bounds = Some(bounds);
        self
    }

    /// The transform group this behavior writes to
    pub fn target(&self) -> NodeKey {
        self.target
    }

    /// The scheduling bounds, if any
    pub fn scheduling_bounds(&self) -> Option<&BoundingSphere> {
        self.scheduling_bounds.as_ref()
    }

    /// Whether the behavior should run for a viewer at `view_position`
    pub fn is_scheduled(&self, view_position: Point3) -> bool {
        match &self.scheduling_bounds {
            Some(bounds) => bounds.contains_point(view_position),
            None => false,
        }
    }

    /// Interpolated angle for the given elapsed time
    pub fn angle_at(&self, elapsed: Duration) -> f32 {
        utils::lerp(
            self.minimum_angle,
            self.maximum_angle,
            self.alpha.value(elapsed),
        )
    }

    /// The transform written to the target for the given elapsed time
    ///
    /// Conjugates the Y rotation by the axis frame, so the spin happens about
    /// the frame's +Y axis through the frame's origin. Replaces whatever the
    /// target held before.
    pub fn transform_at(&self, elapsed: Duration) -> Transform {
        let angle = self.angle_at(elapsed);
        let spin = self.axis_frame.rotation
            * Quat::from_axis_angle(&Vec3::y_axis(), angle)
            * self.axis_frame.rotation.inverse();
        let position = self.axis_frame.position - spin * self.axis_frame.position;
        Transform::from_position_rotation(position, spin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn test_key() -> NodeKey {
        let mut keys: SlotMap<NodeKey, ()> = SlotMap::with_key();
        keys.insert(())
    }

    #[test]
    fn alpha_starts_at_zero() {
        let alpha = Alpha::infinite(Duration::from_millis(4000));
        assert_relative_eq!(alpha.value(Duration::ZERO), 0.0);
    }

    #[test]
    fn alpha_reaches_half_at_half_cycle() {
        let alpha = Alpha::infinite(Duration::from_millis(4000));
        assert_relative_eq!(alpha.value(Duration::from_millis(2000)), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn infinite_alpha_wraps() {
        let alpha = Alpha::infinite(Duration::from_millis(4000));
        assert_relative_eq!(alpha.value(Duration::from_millis(6000)), 0.5, epsilon = 1e-6);
        assert!(!alpha.is_finished(Duration::from_secs(3600)));
    }

    #[test]
    fn finite_alpha_holds_at_one() {
        let alpha = Alpha::new(2, Duration::from_millis(1000));
        assert_relative_eq!(alpha.value(Duration::from_millis(1500)), 0.5, epsilon = 1e-6);
        assert!(alpha.is_finished(Duration::from_millis(2000)));
        assert_relative_eq!(alpha.value(Duration::from_millis(2500)), 1.0);
    }

    #[test]
    fn zero_duration_alpha_is_one() {
        let alpha = Alpha::infinite(Duration::ZERO);
        assert_relative_eq!(alpha.value(Duration::from_millis(10)), 1.0);
    }

    #[test]
    fn angle_covers_full_turn_by_default() {
        let behavior = RotationBehavior::new(
            Alpha::infinite(Duration::from_millis(4000)),
            test_key(),
        );
        assert_relative_eq!(behavior.angle_at(Duration::ZERO), 0.0);
        assert_relative_eq!(
            behavior.angle_at(Duration::from_millis(1000)),
            constants::TAU / 4.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn quarter_cycle_rotates_x_to_minus_z() {
        let behavior = RotationBehavior::new(
            Alpha::infinite(Duration::from_millis(4000)),
            test_key(),
        );
        let transform = behavior.transform_at(Duration::from_millis(1000));
        let rotated = transform.rotation * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-5);
        assert_relative_eq!(transform.position.norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn axis_frame_redirects_the_spin() {
        // Tilting the frame +90 degrees about X sends its Y axis to +Z, so
        // the interpolator spins about world +Z.
        let axis = Transform::from_rotation(Quat::from_axis_angle(
            &Vec3::x_axis(),
            constants::PI / 2.0,
        ));
        let behavior = RotationBehavior::new(
            Alpha::infinite(Duration::from_millis(4000)),
            test_key(),
        )
        .with_axis_frame(axis);

        let transform = behavior.transform_at(Duration::from_millis(1000));
        let rotated = transform.rotation * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn unbounded_behavior_is_never_scheduled() {
        let behavior = RotationBehavior::new(
            Alpha::infinite(Duration::from_millis(4000)),
            test_key(),
        );
        assert!(!behavior.is_scheduled(Point3::origin()));
    }

    #[test]
    fn scheduling_bounds_gate_on_viewer_position() {
        let behavior = RotationBehavior::new(
            Alpha::infinite(Duration::from_millis(4000)),
            test_key(),
        )
        .with_scheduling_bounds(BoundingSphere::at_origin(100.0));

        assert!(behavior.is_scheduled(Point3::new(0.0, 0.0, 2.4)));
        assert!(!behavior.is_scheduled(Point3::new(0.0, 0.0, 250.0)));
    }
}
