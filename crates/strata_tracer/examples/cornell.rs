//! Cornell-style box rendered with the stratified path tracer.
//!
//! Usage: `cargo run --release --example cornell -- [config.json] [out.png]`
//!
//! The optional JSON file may hold `render` and `integrator` sections; any
//! field left out keeps its default.

use anyhow::{Context, Result};
use serde::Deserialize;
use strata_tracer::{
    render, Camera, Color, Cube, IntegratorConfig, Material, RenderConfig, SceneBuilder, Sphere,
    Triangle, Vec3,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    render: RenderConfig,
    integrator: IntegratorConfig,
}

fn load_config(path: Option<&str>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig {
            render: RenderConfig::default().with_samples(4, 16).with_bounces(4),
            ..Default::default()
        });
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

/// Axis-aligned quad as two triangles, corners in winding order.
fn add_quad(builder: &mut SceneBuilder, corners: [Vec3; 4], color: Color, material: Material) {
    let [a, b, c, d] = corners;
    builder
        .add_shape(Triangle::new(a, b, c, color, material))
        .add_shape(Triangle::new(a, c, d, color, material));
}

fn build_scene(builder: &mut SceneBuilder) {
    let white = Color::splat(0.73);
    let red = Color::new(0.65, 0.05, 0.05);
    let green = Color::new(0.12, 0.45, 0.15);
    let diffuse = Material::diffuse();

    let p = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);

    // Floor, ceiling, back wall
    add_quad(builder, [p(-1.0, -1.0, 1.0), p(1.0, -1.0, 1.0), p(1.0, -1.0, -1.0), p(-1.0, -1.0, -1.0)], white, diffuse);
    add_quad(builder, [p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0)], white, diffuse);
    add_quad(builder, [p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(-1.0, 1.0, -1.0)], white, diffuse);

    // Side walls
    add_quad(builder, [p(-1.0, -1.0, 1.0), p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(-1.0, 1.0, 1.0)], red, diffuse);
    add_quad(builder, [p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0)], green, diffuse);

    builder
        .add_shape(Cube::new(
            p(-0.7, -1.0, -0.6),
            p(-0.15, 0.1, -0.05),
            white,
            Material::glossy(1.5, 0.15),
        ))
        .add_shape(Sphere::new(
            p(0.45, -0.6, 0.1),
            0.4,
            Color::new(0.95, 0.85, 0.6),
            Material::mirror().with_gloss(0.03).with_tint(0.6),
        ))
        // Ceiling panel light, slightly below the ceiling
        .add_emitter(Cube::new(
            p(-0.25, 0.98, -0.25),
            p(0.25, 0.99, 0.25),
            Color::splat(12.0),
            diffuse,
        ));
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let output = args.get(1).map(String::as_str).unwrap_or("cornell.png");

    let mut builder = SceneBuilder::new();
    build_scene(&mut builder);
    let scene = builder.compile(config.integrator)?;

    let mut camera = Camera::new()
        .with_resolution(400, 400)
        .with_position(Vec3::new(0.0, 0.0, 3.4), Vec3::ZERO, Vec3::Y)
        .with_fov(40.0);
    camera.initialize();

    let image = render(&camera, &scene, &config.render);
    image.save_png(output)?;
    Ok(())
}
