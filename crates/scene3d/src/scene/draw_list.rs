//! Per-frame draw list extraction
//!
//! A compiled [`SceneGraph`](super::graph::SceneGraph) caches, for every
//! shape, the chain of transform groups above it. Each frame the renderer
//! asks for [`DrawItem`]s, which re-read the current transforms so behavior
//! writes show up immediately, and for the lights whose influencing bounds
//! actually reach the visible geometry.

use crate::foundation::math::Mat4;
use crate::render::lighting::Light;
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::scene::bounds::BoundingSphere;
use crate::scene::graph::{NodeKey, NodeKind, SceneError, SceneGraph};

/// Shape entry cached by compilation
#[derive(Debug, Clone)]
pub(crate) struct CompiledShape {
    /// The shape node itself
    pub(crate) node: NodeKey,
    /// Transform groups from the root down to the shape, in order
    pub(crate) path: Vec<NodeKey>,
    /// Model-space bounds of the shape's mesh
    pub(crate) local_bounds: BoundingSphere,
    /// Material baked at compile time
    pub(crate) material: Material,
}

/// Caches built by [`SceneGraph::compile`](super::graph::SceneGraph::compile)
#[derive(Debug, Clone)]
pub(crate) struct CompiledScene {
    pub(crate) shapes: Vec<CompiledShape>,
    pub(crate) lights: Vec<NodeKey>,
    pub(crate) behaviors: Vec<NodeKey>,
}

/// One shape instance ready for submission
///
/// `shape_index` is stable across frames and matches the order of
/// [`SceneGraph::compiled_meshes`], so renderers can upload geometry once
/// and index it by this value every frame.
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Index into the compiled shape list
    pub shape_index: usize,
    /// Model-to-world matrix for this frame
    pub world: Mat4,
    /// World-space bounds for this frame
    pub bounds: BoundingSphere,
    /// Surface appearance
    pub material: Material,
}

impl SceneGraph {
    /// Geometry of every compiled shape, in `shape_index` order
    pub fn compiled_meshes(&self) -> Result<Vec<&Mesh>, SceneError> {
        let compiled = self.compiled.as_ref().ok_or(SceneError::NotCompiled)?;
        let mut meshes = Vec::with_capacity(compiled.shapes.len());
        for shape in &compiled.shapes {
            let node = self.nodes.get(shape.node).ok_or(SceneError::NodeNotFound)?;
            if let NodeKind::Shape { mesh, .. } = &node.kind {
                meshes.push(mesh);
            }
        }
        Ok(meshes)
    }

    /// Extract this frame's draw list
    ///
    /// Walks each shape's cached transform path against the current local
    /// transforms, so the result reflects any behavior writes made this
    /// frame.
    pub fn draw_items(&self) -> Result<Vec<DrawItem>, SceneError> {
        let compiled = self.compiled.as_ref().ok_or(SceneError::NotCompiled)?;
        let mut items = Vec::with_capacity(compiled.shapes.len());
        for (index, shape) in compiled.shapes.iter().enumerate() {
            let mut world = Mat4::identity();
            for &group in &shape.path {
                if let Some(node) = self.nodes.get(group) {
                    if let NodeKind::TransformGroup(transform) = &node.kind {
                        world *= transform.to_matrix();
                    }
                }
            }
            items.push(DrawItem {
                shape_index: index,
                world,
                bounds: shape.local_bounds.transformed(&world),
                material: shape.material,
            });
        }
        Ok(items)
    }

    /// Lights whose influencing bounds reach any of the given draw items
    ///
    /// Lights without influencing bounds never contribute.
    pub fn active_lights(&self, items: &[DrawItem]) -> Result<Vec<&Light>, SceneError> {
        let compiled = self.compiled.as_ref().ok_or(SceneError::NotCompiled)?;
        let mut active = Vec::new();
        for &key in &compiled.lights {
            let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound)?;
            if let NodeKind::Light(light) = &node.kind {
                if items.iter().any(|item| light.influences(&item.bounds)) {
                    active.push(light);
                }
            }
        }
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point3, Transform, Vec3};
    use crate::render::material::PhongMaterial;
    use approx::assert_relative_eq;

    fn offset_sphere_scene() -> SceneGraph {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph
            .add_shape(root, Mesh::color_cube(0.4), Material::vertex_color())
            .unwrap();
        let offset = graph
            .add_transform_group(root, Transform::from_position(Vec3::new(1.5, 0.0, 0.0)))
            .unwrap();
        graph
            .add_shape(
                offset,
                Mesh::uv_sphere(0.3, 16, 8),
                Material::lit(PhongMaterial::new().with_diffuse(0.2, 0.8, 0.2)),
            )
            .unwrap();
        graph
    }

    #[test]
    fn draw_items_need_a_compiled_graph() {
        let graph = offset_sphere_scene();
        assert!(matches!(graph.draw_items(), Err(SceneError::NotCompiled)));
        assert!(matches!(
            graph.compiled_meshes(),
            Err(SceneError::NotCompiled)
        ));
        assert!(matches!(
            graph.active_lights(&[]),
            Err(SceneError::NotCompiled)
        ));
    }

    #[test]
    fn items_follow_insertion_order() {
        let mut graph = offset_sphere_scene();
        graph.compile().unwrap();

        let items = graph.draw_items().unwrap();
        assert_eq!(items.len(), 2);

        // Cube first, at the origin with its vertex-color material.
        assert_eq!(items[0].shape_index, 0);
        assert!(!items[0].material.is_lit());
        assert_relative_eq!(items[0].world[(0, 3)], 0.0);

        // Sphere second, carried by its transform group.
        assert_eq!(items[1].shape_index, 1);
        assert!(items[1].material.is_lit());
        assert_relative_eq!(items[1].world[(0, 3)], 1.5);
        assert_relative_eq!(items[1].bounds.center.x, 1.5, epsilon = 1e-5);
        assert_relative_eq!(items[1].bounds.radius, 0.3, epsilon = 1e-3);
    }

    #[test]
    fn meshes_match_shape_indices() {
        let mut graph = offset_sphere_scene();
        graph.compile().unwrap();

        let meshes = graph.compiled_meshes().unwrap();
        assert_eq!(meshes.len(), 2);
        // 24 cube vertices, then the sphere's larger set.
        assert_eq!(meshes[0].vertices.len(), 24);
        assert!(meshes[1].vertices.len() > 24);
    }

    #[test]
    fn lights_filter_by_influencing_bounds() {
        let mut graph = offset_sphere_scene();
        let root = graph.root();
        graph
            .add_light(
                root,
                Light::directional([1.0, 1.0, 1.0], Vec3::new(-1.0, -1.0, -1.0))
                    .with_influencing_bounds(BoundingSphere::at_origin(100.0)),
            )
            .unwrap();
        // Unbounded lights never influence anything.
        graph
            .add_light(root, Light::ambient([0.3, 0.3, 0.3]))
            .unwrap();
        // Bounded but far from every shape.
        graph
            .add_light(
                root,
                Light::ambient([0.5, 0.5, 0.5]).with_influencing_bounds(BoundingSphere::new(
                    Point3::new(1000.0, 0.0, 0.0),
                    1.0,
                )),
            )
            .unwrap();
        graph.compile().unwrap();

        let items = graph.draw_items().unwrap();
        let lights = graph.active_lights(&items).unwrap();
        assert_eq!(lights.len(), 1);
        assert!(lights[0].direction().is_some());
    }
}
