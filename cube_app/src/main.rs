//! Spinning cube demo
//!
//! A vertex-colored cube spinning about Y once every four seconds, a lit
//! green sphere beside it, one white directional light plus a soft ambient
//! fill. Window setup, the scene graph, and the render loop all come from
//! the `scene3d` crate.

use std::process::exit;
use std::time::Duration;

use scene3d::foundation::logging;
use scene3d::prelude::*;
use scene3d::scene::SceneError;

const CONFIG_PATH: &str = "cube_app.toml";

/// Influencing and scheduling region shared by the lights and the rotator.
const SCENE_BOUNDS_RADIUS: f32 = 100.0;

fn load_config() -> UniverseConfig {
    if std::path::Path::new(CONFIG_PATH).exists() {
        match UniverseConfig::load_from_file(CONFIG_PATH) {
            Ok(config) => {
                log::info!("Loaded configuration from {CONFIG_PATH}");
                return config;
            }
            Err(err) => {
                log::warn!("Ignoring {CONFIG_PATH}: {err}");
            }
        }
    }

    UniverseConfig::new("Spinning Cube Demo").with_window_size(800, 600)
}

fn build_scene() -> Result<SceneGraph, SceneError> {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let bounds = BoundingSphere::new(Point3::origin(), SCENE_BOUNDS_RADIUS);

    // Cube under a writable transform group so the behavior can spin it.
    let spin = scene.add_transform_group(root, Transform::identity())?;
    scene.set_capabilities(spin, Capabilities::ALLOW_TRANSFORM_WRITE)?;
    scene.add_shape(spin, Mesh::color_cube(0.4), Material::vertex_color())?;

    let alpha = Alpha::infinite(Duration::from_millis(4000));
    let rotator = RotationBehavior::new(alpha, spin).with_scheduling_bounds(bounds.clone());
    scene.add_behavior(root, rotator)?;

    // Shiny green sphere offset to the right of the cube.
    let sphere_group =
        scene.add_transform_group(root, Transform::from_position(Vec3::new(1.5, 0.0, 0.0)))?;
    let sphere_material = Material::lit(
        PhongMaterial::new()
            .with_diffuse(0.2, 0.8, 0.2)
            .with_specular(1.0, 1.0, 1.0)
            .with_shininess(100.0),
    );
    scene.add_shape(sphere_group, Mesh::uv_sphere(0.3, 32, 16), sphere_material)?;

    let sun = Light::directional([1.0, 1.0, 1.0], Vec3::new(-1.0, -1.0, -1.0))
        .with_influencing_bounds(bounds.clone());
    scene.add_light(root, sun)?;

    let fill = Light::ambient([0.3, 0.3, 0.3]).with_influencing_bounds(bounds);
    scene.add_light(root, fill)?;

    scene.compile()?;
    Ok(scene)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config();
    let mut universe = Universe::new(&config)?;

    let scene = build_scene()?;
    universe.attach(scene)?;
    log::info!("Scene ready, entering render loop (Escape closes the window)");

    universe.run()?;
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {panic_info:?}");
        if let Some(location) = panic_info.location() {
            eprintln!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }
    }));

    logging::init_with_level(log::LevelFilter::Info);

    // Probe before any logging so a headless run prints nothing but the
    // message below.
    if !display::display_available() {
        eprintln!("{HEADLESS_MESSAGE}");
        exit(1);
    }

    log::info!("Starting spinning cube demo");

    match std::panic::catch_unwind(run) {
        Ok(Ok(())) => {
            log::info!("Spinning cube demo finished");
        }
        Ok(Err(err)) => {
            // GLFW can still fail against a broken display even when the
            // environment advertises one.
            if matches!(err.downcast_ref::<UniverseError>(), Some(UniverseError::Display(_))) {
                eprintln!("{HEADLESS_MESSAGE}");
            } else {
                log::error!("Spinning cube demo failed: {err}");
            }
            exit(1);
        }
        Err(_) => {
            log::error!("Spinning cube demo panicked, see stderr for details");
            exit(1);
        }
    }
}
