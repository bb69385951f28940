//! Surface appearance
//!
//! Two appearances cover this toolkit's needs: flat vertex colors for shapes
//! built with colored geometry, and a classic Blinn-Phong material for lit
//! surfaces. A shape's material decides which path the fragment shader takes.

use crate::foundation::math::utils;

/// Blinn-Phong shading parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    /// Diffuse reflectance color
    pub diffuse: [f32; 3],
    /// Specular highlight color
    pub specular: [f32; 3],
    /// Specular exponent, clamped to [1, 128]
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
            shininess: 64.0,
        }
    }
}

impl PhongMaterial {
    /// White material with the default exponent
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diffuse color, builder style
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse = [r, g, b];
        self
    }

    /// Set the specular color, builder style
    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular = [r, g, b];
        self
    }

    /// Set the specular exponent, builder style
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = utils::clamp(shininess, 1.0, 128.0);
        self
    }
}

/// How a shape's surface is shaded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Unlit; the interpolated vertex color is the final color
    VertexColor,
    /// Lit with Blinn-Phong shading; vertex colors are ignored
    Lit(PhongMaterial),
}

impl Material {
    /// Unlit vertex-color appearance
    pub fn vertex_color() -> Self {
        Self::VertexColor
    }

    /// Lit appearance with the given parameters
    pub fn lit(params: PhongMaterial) -> Self {
        Self::Lit(params)
    }

    /// Whether lighting applies to this material
    pub fn is_lit(&self) -> bool {
        matches!(self, Self::Lit(_))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::VertexColor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phong_defaults_are_white() {
        let m = PhongMaterial::new();
        assert_eq!(m.diffuse, [1.0, 1.0, 1.0]);
        assert_eq!(m.specular, [1.0, 1.0, 1.0]);
        assert_eq!(m.shininess, 64.0);
    }

    #[test]
    fn shininess_clamps_to_valid_range() {
        assert_eq!(PhongMaterial::new().with_shininess(1000.0).shininess, 128.0);
        assert_eq!(PhongMaterial::new().with_shininess(0.0).shininess, 1.0);
        assert_eq!(PhongMaterial::new().with_shininess(100.0).shininess, 100.0);
    }

    #[test]
    fn builder_sets_colors() {
        let m = PhongMaterial::new()
            .with_diffuse(0.2, 0.8, 0.2)
            .with_specular(1.0, 1.0, 1.0);
        assert_eq!(m.diffuse, [0.2, 0.8, 0.2]);
        assert!(Material::lit(m).is_lit());
        assert!(!Material::vertex_color().is_lit());
    }
}
