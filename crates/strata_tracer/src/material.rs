//! Surface parameters consumed by the bounce decision.

use strata_math::Vec3;

/// Color type alias (linear RGB radiance or reflectance, unclamped)
pub type Color = Vec3;

/// How a surface splits incoming light between reflection and diffusion.
///
/// The shape supplies the surface color; the material only decides the
/// lobe and how strongly that color tints mirror reflections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Index of refraction, drives Schlick's Fresnel term when
    /// `reflectivity` is `None`
    pub index: f32,
    /// Fixed probability of a specular bounce, overrides Fresnel
    pub reflectivity: Option<f32>,
    /// Half-angle (radians) of the cone around the mirror direction,
    /// 0.0 = perfect mirror
    pub gloss: f32,
    /// How much the surface color tints its reflections, in [0, 1]
    pub tint: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse()
    }
}

impl Material {
    /// Purely diffuse surface, never reflects specularly.
    pub fn diffuse() -> Self {
        Self {
            index: 1.0,
            reflectivity: Some(0.0),
            gloss: 0.0,
            tint: 0.0,
        }
    }

    /// Dielectric coating: Fresnel-weighted mix of a glossy reflection and
    /// a diffuse base.
    ///
    /// - `index`: 1.5 for plastic or varnish
    /// - `gloss`: cone half-angle in radians
    pub fn glossy(index: f32, gloss: f32) -> Self {
        Self {
            index: index.max(1.0),
            reflectivity: None,
            gloss: gloss.max(0.0),
            tint: 0.0,
        }
    }

    /// Perfect mirror. Combine with [`Material::with_tint`] for metals.
    pub fn mirror() -> Self {
        Self {
            index: 1.0,
            reflectivity: Some(1.0),
            gloss: 0.0,
            tint: 0.0,
        }
    }

    /// Fixed reflection probability instead of Fresnel.
    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = Some(reflectivity.clamp(0.0, 1.0));
        self
    }

    pub fn with_gloss(mut self, gloss: f32) -> Self {
        self.gloss = gloss.max(0.0);
        self
    }

    pub fn with_tint(mut self, tint: f32) -> Self {
        self.tint = tint.clamp(0.0, 1.0);
        self
    }

    /// Probability of a specular bounce for a ray arriving at `cos_theta`
    /// to the normal.
    pub fn reflectance(&self, cos_theta: f32) -> f32 {
        match self.reflectivity {
            Some(r) => r,
            None => schlick(cos_theta, 1.0, self.index),
        }
    }
}

/// Schlick's approximation of Fresnel reflectance between media `n1` and `n2`.
fn schlick(cos_theta: f32, n1: f32, n2: f32) -> f32 {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    let x = (1.0 - cos_theta.clamp(0.0, 1.0)).powi(5);
    r0 + (1.0 - r0) * x
}
