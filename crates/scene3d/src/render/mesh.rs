//! Mesh geometry
//!
//! Pure geometry containers plus the two generators the toolkit ships: the
//! six-color cube and a latitude/longitude sphere. Vertex layout is fixed
//! (position, normal, vertex color) and matches the forward-pass shaders.

use crate::scene::bounds::BoundingSphere;

/// Single vertex of a [`Mesh`]
///
/// `#[repr(C)]` keeps the layout stable for GPU uploads; the attribute order
/// mirrors the vertex shader's input locations.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Outward normal, unit length
    pub normal: [f32; 3],

    /// Vertex color, used by unlit materials
    pub color: [f32; 3],
}

// Only f32 arrays inside, so the bit-level contract holds.
unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

impl Vertex {
    /// Create a vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// Triangle mesh: vertex array plus `u32` triangle indices
///
/// Indices wind counter-clockwise when the triangle is viewed from outside
/// the surface; the pipeline's front-face setting accounts for the Vulkan
/// Y flip.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data, three entries per triangle
    pub indices: Vec<u32>,
}

/// Face colors of [`Mesh::color_cube`]: +Z, -Z, +X, -X, +Y, -Y
const CUBE_FACE_COLORS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0], // +Z red
    [0.0, 1.0, 0.0], // -Z green
    [0.0, 0.0, 1.0], // +X blue
    [1.0, 0.0, 1.0], // -X magenta
    [1.0, 1.0, 0.0], // +Y yellow
    [0.0, 1.0, 1.0], // -Y cyan
];

impl Mesh {
    /// Create a mesh from raw vertex and index data
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Object-space bounds covering every vertex
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::from_points(
            self.vertices
                .iter()
                .map(|v| crate::foundation::math::Point3::from(v.position)),
        )
    }

    /// Axis-aligned cube with one distinct color per face
    ///
    /// `scale` is the half-extent, so `color_cube(0.4)` spans 0.8 units per
    /// axis. 24 vertices (each face owns its corners so colors and normals
    /// stay flat) and 36 indices. Meant to be paired with
    /// [`Material::vertex_color`](crate::render::Material::vertex_color).
    pub fn color_cube(scale: f32) -> Self {
        let s = scale;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        // Per face: outward normal, then the four corners wound
        // counter-clockwise as seen from outside.
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            (
                [0.0, 0.0, 1.0],
                [[-s, -s, s], [s, -s, s], [s, s, s], [-s, s, s]],
            ),
            (
                [0.0, 0.0, -1.0],
                [[s, -s, -s], [-s, -s, -s], [-s, s, -s], [s, s, -s]],
            ),
            (
                [1.0, 0.0, 0.0],
                [[s, -s, s], [s, -s, -s], [s, s, -s], [s, s, s]],
            ),
            (
                [-1.0, 0.0, 0.0],
                [[-s, -s, -s], [-s, -s, s], [-s, s, s], [-s, s, -s]],
            ),
            (
                [0.0, 1.0, 0.0],
                [[-s, s, s], [s, s, s], [s, s, -s], [-s, s, -s]],
            ),
            (
                [0.0, -1.0, 0.0],
                [[-s, -s, -s], [s, -s, -s], [s, -s, s], [-s, -s, s]],
            ),
        ];

        for (face, (normal, corners)) in faces.iter().enumerate() {
            let base = vertices.len() as u32;
            let color = CUBE_FACE_COLORS[face];
            for corner in corners {
                vertices.push(Vertex::new(*corner, *normal, color));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }

    /// Latitude/longitude sphere centered at the origin
    ///
    /// `sectors` is the longitude count, `stacks` the latitude count; both
    /// are clamped to sane minimums. Normals point outward and vertex colors
    /// are white so lit materials control the final color.
    pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> Self {
        use crate::foundation::math::constants::{PI, TAU};

        let sectors = sectors.max(3);
        let stacks = stacks.max(2);

        let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
        for stack in 0..=stacks {
            let phi = PI * stack as f32 / stacks as f32;
            let y = phi.cos();
            let ring = phi.sin();

            for sector in 0..=sectors {
                let theta = TAU * sector as f32 / sectors as f32;
                let x = ring * theta.cos();
                let z = ring * theta.sin();

                vertices.push(Vertex::new(
                    [radius * x, radius * y, radius * z],
                    [x, y, z],
                    [1.0, 1.0, 1.0],
                ));
            }
        }

        let mut indices = Vec::new();
        for stack in 0..stacks {
            for sector in 0..sectors {
                let k1 = stack * (sectors + 1) + sector;
                let k2 = k1 + sectors + 1;

                // Pole bands collapse one triangle of each quad.
                if stack != 0 {
                    indices.extend_from_slice(&[k1, k1 + 1, k2 + 1]);
                }
                if stack != stacks - 1 {
                    indices.extend_from_slice(&[k1, k2 + 1, k2]);
                }
            }
        }

        Self::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn color_cube_has_24_vertices_and_12_triangles() {
        let cube = Mesh::color_cube(0.4);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn color_cube_spans_the_half_extent() {
        let cube = Mesh::color_cube(0.4);
        for v in &cube.vertices {
            for axis in 0..3 {
                assert_relative_eq!(v.position[axis].abs(), 0.4, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn color_cube_uses_six_distinct_colors() {
        let cube = Mesh::color_cube(1.0);
        let mut colors: Vec<[u32; 3]> = cube
            .vertices
            .iter()
            .map(|v| [v.color[0].to_bits(), v.color[1].to_bits(), v.color[2].to_bits()])
            .collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 6);
    }

    #[test]
    fn color_cube_normals_match_faces() {
        let cube = Mesh::color_cube(1.0);
        for v in &cube.vertices {
            let n = v.normal;
            let len_sq = n[0] * n[0] + n[1] * n[1] + n[2] * n[2];
            assert_relative_eq!(len_sq, 1.0, epsilon = 1e-6);
            // Each corner lies on the face its normal points out of.
            let dot = n[0] * v.position[0] + n[1] * v.position[1] + n[2] * v.position[2];
            assert_relative_eq!(dot, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn cube_indices_stay_in_range() {
        let cube = Mesh::color_cube(0.5);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let sphere = Mesh::uv_sphere(0.3, 16, 8);
        for v in &sphere.vertices {
            let r = (v.position[0] * v.position[0]
                + v.position[1] * v.position[1]
                + v.position[2] * v.position[2])
                .sqrt();
            assert_relative_eq!(r, 0.3, epsilon = 1e-5);
        }
    }

    #[test]
    fn sphere_normals_are_radial_units() {
        let sphere = Mesh::uv_sphere(2.0, 12, 6);
        for v in &sphere.vertices {
            let n = v.normal;
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1e-5);
            // Normal is position / radius.
            assert_relative_eq!(n[0] * 2.0, v.position[0], epsilon = 1e-5);
        }
    }

    #[test]
    fn sphere_triangle_count_accounts_for_pole_collapse() {
        let sectors = 16u32;
        let stacks = 8u32;
        let sphere = Mesh::uv_sphere(1.0, sectors, stacks);
        let expected = (sectors * (2 * stacks - 2) * 3) as usize;
        assert_eq!(sphere.indices.len(), expected);
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertices.len()));
    }

    #[test]
    fn bounding_sphere_covers_the_cube_corners() {
        let cube = Mesh::color_cube(0.4);
        let bounds = cube.bounding_sphere();
        assert_relative_eq!(bounds.center.coords.norm(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.radius, 0.4 * 3.0f32.sqrt(), epsilon = 1e-5);
    }
}
