//! Rendering layer
//!
//! Camera, lights, materials and mesh data on the API-agnostic side, plus
//! the Vulkan backend that consumes them. Applications normally reach these
//! through [`Universe`](crate::universe::Universe) rather than driving the
//! renderer directly.

pub mod camera;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod vulkan;

pub use camera::Camera;
pub use lighting::{Light, LightKind, MAX_DIRECTIONAL_LIGHTS};
pub use material::{Material, PhongMaterial};
pub use mesh::{Mesh, Vertex};
pub use vulkan::{VulkanError, VulkanRenderer, VulkanResult};
