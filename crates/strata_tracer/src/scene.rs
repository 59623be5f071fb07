//! Scene construction and the geometric queries the integrator runs on.
//!
//! A [`SceneBuilder`] collects shapes and lights; [`SceneBuilder::compile`]
//! consumes it and returns an immutable [`Scene`] holding two BVHs, one over
//! every shape and one over the lights alone. Once compiled nothing can be
//! added, so the trees can never go stale.

use crate::{Bounce, BvhNode, Hit, Shape, SurfaceBounce};
use serde::{Deserialize, Serialize};
use strata_math::{Interval, Ray};
use thiserror::Error;

/// What direct lighting means when the scene has no lights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyLightPolicy {
    /// Direct light is black; only paths that reach a light through
    /// specular bounces carry emission.
    #[default]
    Black,
    /// Refuse to compile a scene without lights.
    Reject,
}

/// Integrator tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Minimum ray parameter for every secondary query. Keeps rays leaving
    /// a surface from re-hitting it; also pulled off the far end of shadow
    /// rays so a light never shadows its own sample point.
    pub ray_epsilon: f32,
    /// Behavior of next-event estimation with zero lights
    pub empty_lights: EmptyLightPolicy,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            ray_epsilon: 1e-3,
            empty_lights: EmptyLightPolicy::Black,
        }
    }
}

/// Errors that can occur while compiling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("scene has no lights and the empty-light policy is `reject`")]
    NoLights,

    #[error("ray epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f32),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Mutable, append-only scene under construction.
#[derive(Debug, Default, Clone)]
pub struct SceneBuilder {
    shapes: Vec<Shape>,
    lights: Vec<Shape>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ordinary shape. Shapes are the only source of occlusion.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> &mut Self {
        self.shapes.push(shape.into());
        self
    }

    /// Add a light used for emission sampling only.
    ///
    /// The light neither occludes nor shows up for camera rays unless it is
    /// also added with [`SceneBuilder::add_shape`]; see
    /// [`SceneBuilder::add_emitter`].
    pub fn add_light(&mut self, light: impl Into<Shape>) -> &mut Self {
        self.lights.push(light.into());
        self
    }

    /// Add a shape that is both a light and visible, occluding geometry.
    pub fn add_emitter(&mut self, emitter: impl Into<Shape>) -> &mut Self {
        let emitter = emitter.into();
        self.shapes.push(emitter.clone());
        self.lights.push(emitter);
        self
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Build both acceleration structures with the default bounce model.
    pub fn compile(self, config: IntegratorConfig) -> SceneResult<Scene> {
        self.compile_with(config, SurfaceBounce)
    }

    /// Build both acceleration structures with a custom bounce model.
    pub fn compile_with<B: Bounce>(self, config: IntegratorConfig, bounce: B) -> SceneResult<Scene<B>> {
        if !config.ray_epsilon.is_finite() || config.ray_epsilon < 0.0 {
            return Err(SceneError::InvalidEpsilon(config.ray_epsilon));
        }
        if self.lights.is_empty() {
            match config.empty_lights {
                EmptyLightPolicy::Reject => return Err(SceneError::NoLights),
                EmptyLightPolicy::Black => {
                    log::warn!("Scene has no lights; direct lighting will be black")
                }
            }
        }

        let shape_tree = BvhNode::new(self.shapes);
        let light_tree = BvhNode::new(self.lights.clone());

        log::info!(
            "Compiled scene: {} shapes (BVH depth {}), {} lights (BVH depth {})",
            shape_tree.len(),
            shape_tree.depth(),
            light_tree.len(),
            light_tree.depth()
        );

        Ok(Scene {
            lights: self.lights,
            shape_tree,
            light_tree,
            config,
            bounce,
        })
    }
}

/// A compiled, read-only scene. Share it freely across threads; every query
/// takes its own random source.
pub struct Scene<B: Bounce = SurfaceBounce> {
    /// Raw light list, sampled once per light by next-event estimation
    pub(crate) lights: Vec<Shape>,
    shape_tree: BvhNode,
    light_tree: BvhNode,
    pub(crate) config: IntegratorConfig,
    pub(crate) bounce: B,
}

impl<B: Bounce> Scene<B> {
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    pub fn bounce_model(&self) -> &B {
        &self.bounce
    }

    pub fn lights(&self) -> &[Shape] {
        &self.lights
    }

    pub fn shape_count(&self) -> usize {
        self.shape_tree.len()
    }

    #[inline]
    fn query_interval(&self) -> Interval {
        Interval::beyond(self.config.ray_epsilon)
    }

    /// Nearest hit against all shapes.
    pub fn intersect_shapes(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.shape_tree.intersect(ray, self.query_interval())
    }

    /// Nearest light along `ray`, unless a shape lies strictly closer.
    ///
    /// The light tree has no notion of occluders, so a candidate is checked
    /// with a shape query bounded at the light's distance. A light that is
    /// also a shape sits at exactly that distance and does not hide itself.
    pub fn intersect_lights(&self, ray: &Ray) -> Option<Hit<'_>> {
        let hit = self.light_tree.intersect(ray, self.query_interval())?;
        (!self.shadow(ray, hit.t)).then_some(hit)
    }

    /// True iff a shape is hit strictly closer than `max_distance`.
    pub fn shadow(&self, ray: &Ray, max_distance: f32) -> bool {
        let bounded = self.query_interval().with_max(max_distance);
        self.shape_tree.shadow(ray, bounded) < max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Hittable, Material, Sphere};
    use strata_math::Vec3;

    fn ball(center: Vec3, radius: f32, color: Color) -> Sphere {
        Sphere::new(center, radius, color, Material::diffuse())
    }

    fn compile(builder: SceneBuilder) -> Scene {
        builder.compile(IntegratorConfig::default()).unwrap()
    }

    #[test]
    fn test_builder_counts() {
        let mut builder = SceneBuilder::new();
        builder
            .add_shape(ball(Vec3::ZERO, 1.0, Color::ONE))
            .add_light(ball(Vec3::Y * 5.0, 1.0, Color::ONE))
            .add_emitter(ball(Vec3::X * 5.0, 1.0, Color::ONE));

        assert_eq!(builder.shape_count(), 2);
        assert_eq!(builder.light_count(), 2);

        let scene = compile(builder);
        assert_eq!(scene.shape_count(), 2);
        assert_eq!(scene.lights().len(), 2);
    }

    #[test]
    fn test_reject_policy_without_lights() {
        let mut builder = SceneBuilder::new();
        builder.add_shape(ball(Vec3::ZERO, 1.0, Color::ONE));

        let config = IntegratorConfig {
            empty_lights: EmptyLightPolicy::Reject,
            ..Default::default()
        };
        assert_eq!(builder.clone().compile(config).err(), Some(SceneError::NoLights));
        assert!(builder.compile(IntegratorConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_epsilon() {
        for eps in [-1.0, f32::NAN, f32::INFINITY] {
            let config = IntegratorConfig {
                ray_epsilon: eps,
                ..Default::default()
            };
            let err = SceneBuilder::new().compile(config).err();
            assert!(matches!(err, Some(SceneError::InvalidEpsilon(_))));
        }
    }

    #[test]
    fn test_shadow_empty_scene() {
        let scene = compile(SceneBuilder::new());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        for max in [0.5, 1.0, 1e6] {
            assert!(!scene.shadow(&ray, max));
        }
    }

    #[test]
    fn test_shadow_is_strict() {
        let mut builder = SceneBuilder::new();
        builder.add_shape(ball(Vec3::new(0.0, 0.0, -5.0), 1.0, Color::ONE));
        let scene = compile(builder);

        // Nearest hit at t = 4
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(scene.shadow(&ray, 10.0));
        assert!(scene.shadow(&ray, 4.01));
        assert!(!scene.shadow(&ray, 3.99));
    }

    #[test]
    fn test_intersect_shapes_ignores_light_only_entries() {
        let mut builder = SceneBuilder::new();
        builder.add_light(ball(Vec3::new(0.0, 0.0, -5.0), 1.0, Color::ONE));
        let scene = compile(builder);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(scene.intersect_shapes(&ray).is_none());
        assert!(scene.intersect_lights(&ray).is_some());
    }

    #[test]
    fn test_intersect_lights_defers_to_closer_shapes() {
        let emission = Color::new(4.0, 3.0, 2.0);
        let mut builder = SceneBuilder::new();
        builder
            .add_light(ball(Vec3::new(0.0, 0.0, -10.0), 1.0, emission))
            .add_shape(ball(Vec3::new(0.0, 0.0, -5.0), 1.0, Color::ONE));
        let scene = compile(builder);

        let blocked = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(scene.intersect_lights(&blocked).is_none());

        // From behind the occluder the light is visible
        let clear = Ray::new(Vec3::new(0.0, 0.0, -7.0), -Vec3::Z);
        let hit = scene.intersect_lights(&clear).unwrap();
        assert_eq!(hit.shape.color(hit.point()), emission);
        assert!((hit.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_emitter_does_not_occlude_itself() {
        let mut builder = SceneBuilder::new();
        builder.add_emitter(ball(Vec3::new(0.0, 0.0, -5.0), 1.0, Color::ONE));
        let scene = compile(builder);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let light = scene.intersect_lights(&ray).unwrap();
        let shape = scene.intersect_shapes(&ray).unwrap();
        assert_eq!(light.t, shape.t);
    }

    #[test]
    fn test_config_from_json() {
        let config: IntegratorConfig =
            serde_json::from_str(r#"{ "empty_lights": "reject" }"#).unwrap();
        assert_eq!(config.empty_lights, EmptyLightPolicy::Reject);
        assert_eq!(config.ray_epsilon, IntegratorConfig::default().ray_epsilon);
    }
}
