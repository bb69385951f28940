//! Retained scene graph
//!
//! Nodes live in a slotmap arena and are addressed by [`NodeKey`] handles.
//! A graph is assembled once, compiled, and then driven by behaviors each
//! frame. Compilation seals the structure: no nodes can be added afterwards,
//! and only transform groups that declared
//! [`Capabilities::ALLOW_TRANSFORM_WRITE`] beforehand still accept transform
//! writes. Compiling also validates every behavior target and caches the
//! transform paths the draw list walks per frame.

use std::time::Duration;

use slotmap::SlotMap;
use thiserror::Error;

use crate::foundation::math::{Mat4, Point3, Transform};
use crate::render::lighting::Light;
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::scene::behavior::RotationBehavior;
use crate::scene::draw_list::{CompiledScene, CompiledShape};

slotmap::new_key_type! {
    /// Stable handle to a node in a [`SceneGraph`]
    pub struct NodeKey;
}

bitflags::bitflags! {
    /// Per-node permissions enforced once the graph is compiled
    ///
    /// Capabilities must be set before [`SceneGraph::compile`]; the sealed
    /// graph rejects capability changes along with structural edits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u32 {
        /// Permit writes to a transform group's local transform after
        /// compilation. Behavior targets must carry this flag.
        const ALLOW_TRANSFORM_WRITE = 1 << 0;
    }
}

/// Errors from scene graph construction and per-frame access
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// Key does not resolve to a node in this graph
    #[error("node does not exist in this scene graph")]
    NodeNotFound,

    /// Children can only hang off group and transform group nodes
    #[error("node cannot have children")]
    NotAGroup,

    /// Operation requires a transform group node
    #[error("node is not a transform group")]
    NotATransformGroup,

    /// Structural edits are rejected once compiled
    #[error("scene graph is already compiled")]
    AlreadyCompiled,

    /// Per-frame queries require a compiled graph
    #[error("scene graph must be compiled first")]
    NotCompiled,

    /// Transform write attempted without the required capability
    #[error("transform write capability is not set on this node")]
    CapabilityNotSet,

    /// Behavior must target a transform group with the write capability
    #[error("behavior target must be a transform group with transform write capability")]
    InvalidBehaviorTarget,
}

/// What a node contributes to the scene
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Grouping node with no spatial effect
    Group,

    /// Group applying a local transform to its whole subtree
    TransformGroup(Transform),

    /// Renderable geometry with its surface material
    Shape {
        /// Geometry in model space
        mesh: Mesh,
        /// Surface appearance
        material: Material,
    },

    /// Light source, active within its influencing bounds
    Light(Light),

    /// Time-driven animation writing to a transform group
    Behavior(RotationBehavior),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) capabilities: Capabilities,
}

/// Arena-backed retained scene graph
///
/// The graph always has a root group node. Content is attached under it
/// with the `add_*` methods, then [`compile`](Self::compile) freezes the
/// structure for rendering. Nodes are never removed, so a [`NodeKey`]
/// obtained from this graph stays valid for the graph's lifetime.
#[derive(Debug)]
pub struct SceneGraph {
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
    pub(crate) compiled: Option<CompiledScene>,
}

impl SceneGraph {
    /// Empty graph containing only the root group
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node {
            kind: NodeKind::Group,
            parent: None,
            children: Vec::new(),
            capabilities: Capabilities::empty(),
        });
        Self {
            nodes,
            root,
            compiled: None,
        }
    }

    /// Root group node, parent of all scene content
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Total node count, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether [`compile`](Self::compile) has run
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Add a plain group under `parent`
    pub fn add_group(&mut self, parent: NodeKey) -> Result<NodeKey, SceneError> {
        self.add_node(parent, NodeKind::Group)
    }

    /// Add a transform group under `parent`
    pub fn add_transform_group(
        &mut self,
        parent: NodeKey,
        transform: Transform,
    ) -> Result<NodeKey, SceneError> {
        self.add_node(parent, NodeKind::TransformGroup(transform))
    }

    /// Add a shape leaf under `parent`
    pub fn add_shape(
        &mut self,
        parent: NodeKey,
        mesh: Mesh,
        material: Material,
    ) -> Result<NodeKey, SceneError> {
        self.add_node(parent, NodeKind::Shape { mesh, material })
    }

    /// Add a light leaf under `parent`
    pub fn add_light(&mut self, parent: NodeKey, light: Light) -> Result<NodeKey, SceneError> {
        self.add_node(parent, NodeKind::Light(light))
    }

    /// Add a behavior leaf under `parent`
    ///
    /// The behavior's target is validated at [`compile`](Self::compile)
    /// time, so behaviors may be added before the node they animate.
    pub fn add_behavior(
        &mut self,
        parent: NodeKey,
        behavior: RotationBehavior,
    ) -> Result<NodeKey, SceneError> {
        self.add_node(parent, NodeKind::Behavior(behavior))
    }

    fn add_node(&mut self, parent: NodeKey, kind: NodeKind) -> Result<NodeKey, SceneError> {
        if self.compiled.is_some() {
            return Err(SceneError::AlreadyCompiled);
        }
        let parent_node = self.nodes.get(parent).ok_or(SceneError::NodeNotFound)?;
        if !matches!(
            parent_node.kind,
            NodeKind::Group | NodeKind::TransformGroup(_)
        ) {
            return Err(SceneError::NotAGroup);
        }
        let key = self.nodes.insert(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            capabilities: Capabilities::empty(),
        });
        self.nodes[parent].children.push(key);
        Ok(key)
    }

    /// Declare capabilities on a node before compiling
    pub fn set_capabilities(
        &mut self,
        node: NodeKey,
        capabilities: Capabilities,
    ) -> Result<(), SceneError> {
        if self.compiled.is_some() {
            return Err(SceneError::AlreadyCompiled);
        }
        let node = self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound)?;
        node.capabilities = capabilities;
        Ok(())
    }

    /// Capabilities declared on a node
    pub fn capabilities(&self, node: NodeKey) -> Result<Capabilities, SceneError> {
        let node = self.nodes.get(node).ok_or(SceneError::NodeNotFound)?;
        Ok(node.capabilities)
    }

    /// Local transform of a transform group
    pub fn local_transform(&self, node: NodeKey) -> Result<&Transform, SceneError> {
        let node = self.nodes.get(node).ok_or(SceneError::NodeNotFound)?;
        match &node.kind {
            NodeKind::TransformGroup(transform) => Ok(transform),
            _ => Err(SceneError::NotATransformGroup),
        }
    }

    /// Replace the local transform of a transform group
    ///
    /// Unrestricted while the graph is under construction. Once compiled,
    /// the node must have declared
    /// [`Capabilities::ALLOW_TRANSFORM_WRITE`].
    pub fn set_local_transform(
        &mut self,
        node: NodeKey,
        transform: Transform,
    ) -> Result<(), SceneError> {
        let sealed = self.compiled.is_some();
        let node = self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound)?;
        if sealed && !node.capabilities.contains(Capabilities::ALLOW_TRANSFORM_WRITE) {
            return Err(SceneError::CapabilityNotSet);
        }
        match &mut node.kind {
            NodeKind::TransformGroup(local) => {
                *local = transform;
                Ok(())
            }
            _ => Err(SceneError::NotATransformGroup),
        }
    }

    /// World matrix of a node, composed from every transform group on the
    /// path from the root down to (and including) the node itself
    pub fn world_transform(&self, node: NodeKey) -> Result<Mat4, SceneError> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::NodeNotFound);
        }
        let mut matrix = Mat4::identity();
        let mut current = Some(node);
        while let Some(key) = current {
            let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound)?;
            if let NodeKind::TransformGroup(transform) = &node.kind {
                matrix = transform.to_matrix() * matrix;
            }
            current = node.parent;
        }
        Ok(matrix)
    }

    /// Seal the graph for rendering
    ///
    /// Walks the tree once, caching for every shape the chain of transform
    /// groups above it plus its model-space bounding sphere, and collecting
    /// lights and behaviors. Every behavior target is validated here: it
    /// must be an existing transform group carrying
    /// [`Capabilities::ALLOW_TRANSFORM_WRITE`]. Traversal order is
    /// insertion order, so draw order is deterministic.
    pub fn compile(&mut self) -> Result<(), SceneError> {
        if self.compiled.is_some() {
            return Err(SceneError::AlreadyCompiled);
        }

        let mut shapes = Vec::new();
        let mut lights = Vec::new();
        let mut behaviors = Vec::new();

        let mut stack = vec![(self.root, Vec::new())];
        while let Some((key, path)) = stack.pop() {
            let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound)?;
            match &node.kind {
                NodeKind::Group => {
                    for &child in node.children.iter().rev() {
                        stack.push((child, path.clone()));
                    }
                }
                NodeKind::TransformGroup(_) => {
                    let mut child_path = path;
                    child_path.push(key);
                    for &child in node.children.iter().rev() {
                        stack.push((child, child_path.clone()));
                    }
                }
                NodeKind::Shape { mesh, material } => {
                    shapes.push(CompiledShape {
                        node: key,
                        path,
                        local_bounds: mesh.bounding_sphere(),
                        material: *material,
                    });
                }
                NodeKind::Light(_) => {
                    lights.push(key);
                }
                NodeKind::Behavior(behavior) => {
                    let target = self
                        .nodes
                        .get(behavior.target())
                        .ok_or(SceneError::InvalidBehaviorTarget)?;
                    let writable = matches!(target.kind, NodeKind::TransformGroup(_))
                        && target
                            .capabilities
                            .contains(Capabilities::ALLOW_TRANSFORM_WRITE);
                    if !writable {
                        return Err(SceneError::InvalidBehaviorTarget);
                    }
                    behaviors.push(key);
                }
            }
        }

        log::info!(
            "Scene graph compiled: {} shapes, {} lights, {} behaviors",
            shapes.len(),
            lights.len(),
            behaviors.len()
        );

        self.compiled = Some(CompiledScene {
            shapes,
            lights,
            behaviors,
        });
        Ok(())
    }

    /// Run every scheduled behavior against the elapsed scene time
    ///
    /// A behavior is scheduled when its scheduling bounds contain the
    /// current view position; behaviors without bounds never run. Each
    /// scheduled behavior overwrites its target's local transform.
    pub fn tick_behaviors(
        &mut self,
        elapsed: Duration,
        view_position: Point3,
    ) -> Result<(), SceneError> {
        let keys = match &self.compiled {
            Some(compiled) => compiled.behaviors.clone(),
            None => return Err(SceneError::NotCompiled),
        };

        for key in keys {
            let (target, transform) = match self.nodes.get(key).map(|node| &node.kind) {
                Some(NodeKind::Behavior(behavior)) if behavior.is_scheduled(view_position) => {
                    (behavior.target(), behavior.transform_at(elapsed))
                }
                _ => continue,
            };
            // Target validity was checked at compile time and nodes are
            // never removed.
            if let Some(node) = self.nodes.get_mut(target) {
                if let NodeKind::TransformGroup(local) = &mut node.kind {
                    *local = transform;
                }
            }
        }
        Ok(())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants, Vec3};
    use crate::scene::behavior::Alpha;
    use crate::scene::bounds::BoundingSphere;
    use approx::assert_relative_eq;

    fn cube_shape(graph: &mut SceneGraph, parent: NodeKey) -> NodeKey {
        graph
            .add_shape(parent, Mesh::color_cube(0.5), Material::vertex_color())
            .unwrap()
    }

    #[test]
    fn new_graph_has_only_the_root() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert!(!graph.is_compiled());
        assert!(matches!(
            graph.capabilities(graph.root()),
            Ok(caps) if caps.is_empty()
        ));
    }

    #[test]
    fn leaves_cannot_have_children() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let shape = cube_shape(&mut graph, root);
        assert_eq!(graph.add_group(shape), Err(SceneError::NotAGroup));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut graph = SceneGraph::new();
        assert_eq!(
            graph.add_group(NodeKey::default()),
            Err(SceneError::NodeNotFound)
        );
        assert_eq!(
            graph.world_transform(NodeKey::default()),
            Err(SceneError::NodeNotFound)
        );
    }

    #[test]
    fn compile_seals_the_structure() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        cube_shape(&mut graph, root);
        graph.compile().unwrap();

        assert!(graph.is_compiled());
        assert_eq!(graph.add_group(root), Err(SceneError::AlreadyCompiled));
        assert_eq!(
            graph.set_capabilities(root, Capabilities::ALLOW_TRANSFORM_WRITE),
            Err(SceneError::AlreadyCompiled)
        );
        assert_eq!(graph.compile(), Err(SceneError::AlreadyCompiled));
    }

    #[test]
    fn transform_writes_are_free_until_compiled() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let group = graph
            .add_transform_group(root, Transform::identity())
            .unwrap();

        let moved = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        assert!(graph.set_local_transform(group, moved.clone()).is_ok());
        assert_eq!(graph.local_transform(group).unwrap(), &moved);
    }

    #[test]
    fn transform_writes_need_the_capability_once_compiled() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let locked = graph
            .add_transform_group(root, Transform::identity())
            .unwrap();
        let open = graph
            .add_transform_group(root, Transform::identity())
            .unwrap();
        graph
            .set_capabilities(open, Capabilities::ALLOW_TRANSFORM_WRITE)
            .unwrap();
        graph.compile().unwrap();

        assert_eq!(
            graph.set_local_transform(locked, Transform::identity()),
            Err(SceneError::CapabilityNotSet)
        );
        assert!(graph.set_local_transform(open, Transform::identity()).is_ok());
    }

    #[test]
    fn local_transform_requires_a_transform_group() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        assert_eq!(
            graph.local_transform(root),
            Err(SceneError::NotATransformGroup)
        );
    }

    #[test]
    fn world_transform_composes_down_the_path() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let outer = graph
            .add_transform_group(root, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        let inner = graph
            .add_transform_group(outer, Transform::from_position(Vec3::new(0.0, 2.0, 0.0)))
            .unwrap();
        let shape = cube_shape(&mut graph, inner);

        let world = graph.world_transform(shape).unwrap();
        assert_relative_eq!(world[(0, 3)], 1.0);
        assert_relative_eq!(world[(1, 3)], 2.0);
        assert_relative_eq!(world[(2, 3)], 0.0);
    }

    #[test]
    fn compile_rejects_behaviors_without_a_writable_target() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let target = graph
            .add_transform_group(root, Transform::identity())
            .unwrap();
        let alpha = Alpha::infinite(Duration::from_millis(4000));
        graph
            .add_behavior(root, RotationBehavior::new(alpha, target))
            .unwrap();

        // No ALLOW_TRANSFORM_WRITE on the target.
        assert_eq!(graph.compile(), Err(SceneError::InvalidBehaviorTarget));
    }

    #[test]
    fn compile_rejects_behaviors_targeting_non_groups() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let shape = cube_shape(&mut graph, root);
        let alpha = Alpha::infinite(Duration::from_millis(4000));
        graph
            .add_behavior(root, RotationBehavior::new(alpha, shape))
            .unwrap();

        assert_eq!(graph.compile(), Err(SceneError::InvalidBehaviorTarget));
    }

    #[test]
    fn scheduled_behavior_overwrites_its_target() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let spin = graph
            .add_transform_group(root, Transform::identity())
            .unwrap();
        graph
            .set_capabilities(spin, Capabilities::ALLOW_TRANSFORM_WRITE)
            .unwrap();
        let behavior = RotationBehavior::new(Alpha::infinite(Duration::from_millis(4000)), spin)
            .with_scheduling_bounds(BoundingSphere::at_origin(100.0));
        graph.add_behavior(root, behavior).unwrap();
        graph.compile().unwrap();

        // One second into a four second cycle: a quarter turn around Y.
        graph
            .tick_behaviors(Duration::from_millis(1000), Point3::origin())
            .unwrap();
        let transform = graph.local_transform(spin).unwrap();
        let rotated = transform.rotation * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-5);

        let angle = transform.rotation.angle();
        assert_relative_eq!(angle, constants::PI / 2.0, epsilon = 1e-5);
    }

    #[test]
    fn behavior_without_bounds_never_runs() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let spin = graph
            .add_transform_group(root, Transform::identity())
            .unwrap();
        graph
            .set_capabilities(spin, Capabilities::ALLOW_TRANSFORM_WRITE)
            .unwrap();
        let behavior =
            RotationBehavior::new(Alpha::infinite(Duration::from_millis(4000)), spin);
        graph.add_behavior(root, behavior).unwrap();
        graph.compile().unwrap();

        graph
            .tick_behaviors(Duration::from_millis(1000), Point3::origin())
            .unwrap();
        assert_eq!(graph.local_transform(spin).unwrap(), &Transform::identity());
    }

    #[test]
    fn tick_requires_a_compiled_graph() {
        let mut graph = SceneGraph::new();
        assert_eq!(
            graph.tick_behaviors(Duration::ZERO, Point3::origin()),
            Err(SceneError::NotCompiled)
        );
    }
}
