//! Retained-mode scene graph
//!
//! Content is described once as a tree of groups, shapes, lights, and
//! behaviors, then compiled into a form the renderer consumes every frame:
//!
//! ```text
//! SceneGraph (build + compile)
//!      |
//! DrawItem list + active lights   (per frame)
//!      |
//! Renderer (graphics)
//! ```
//!
//! Compilation seals the tree and validates behavior wiring up front, so
//! the per-frame path never hits a structural error.

pub mod behavior;
pub mod bounds;
pub mod draw_list;
pub mod graph;

pub use behavior::{Alpha, RotationBehavior};
pub use bounds::BoundingSphere;
pub use draw_list::DrawItem;
pub use graph::{Capabilities, NodeKey, NodeKind, SceneError, SceneGraph};
