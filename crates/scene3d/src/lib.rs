//! # scene3d
//!
//! A retained-mode 3D scene graph toolkit with Vulkan rendering.
//!
//! Applications describe a scene as a graph of groups, transform groups,
//! shapes, lights and behaviors, compile it, and hand it to a [`Universe`]
//! that owns the window and the frame loop. The toolkit renders the graph
//! continuously until the window closes; application code is not called
//! back per frame.
//!
//! ## Features
//!
//! - **Retained scene graph**: groups, transform groups, shape and light
//!   leaves, compiled once into a flat draw list
//! - **Time-driven behaviors**: alpha-ramped rotation interpolators with
//!   spherical scheduling bounds
//! - **Vulkan forward renderer**: untextured Blinn-Phong and vertex-color
//!   shading with depth testing
//! - **Headless detection**: display probing before any GPU work, with a
//!   stable message for scripted environments
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use scene3d::prelude::*;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = SceneGraph::new();
//!     let root = scene.root();
//!     let bounds = BoundingSphere::new(Point3::origin(), 100.0);
//!
//!     let spin = scene.add_transform_group(root, Transform::identity())?;
//!     scene.set_capabilities(spin, Capabilities::ALLOW_TRANSFORM_WRITE)?;
//!     scene.add_shape(spin, Mesh::color_cube(0.4), Material::vertex_color())?;
//!
//!     let alpha = Alpha::infinite(Duration::from_millis(4000));
//!     let rotator = RotationBehavior::new(alpha, spin).with_scheduling_bounds(bounds);
//!     scene.add_behavior(root, rotator)?;
//!     scene.compile()?;
//!
//!     let config = UniverseConfig::new("Demo").with_window_size(800, 600);
//!     let mut universe = Universe::new(&config)?;
//!     universe.attach(scene)?;
//!     universe.run()?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

pub mod config;
pub mod display;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod universe;
pub mod window;

pub use config::{Config, RendererConfig, ShaderConfig, UniverseConfig, WindowConfig};
pub use universe::{Universe, UniverseError};

/// Common imports for toolkit users
pub mod prelude {
    pub use crate::config::{Config, UniverseConfig, WindowConfig};
    pub use crate::display::{self, HEADLESS_MESSAGE};
    pub use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
    pub use crate::render::{Camera, Light, Material, Mesh, PhongMaterial, Vertex};
    pub use crate::scene::{
        Alpha, BoundingSphere, Capabilities, NodeKey, RotationBehavior, SceneGraph,
    };
    pub use crate::universe::{Universe, UniverseError};
}
