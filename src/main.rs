//! Demo driver: a spinning red cube next to the textured helmet, lit by a
//! point light marked with a white sphere.

use std::path::PathBuf;

use anyhow::{ Context, Result };
use log::{ error, info };

use diffuse_demo::engine::components::{ Mesh, Transform };
use diffuse_demo::engine::config::AppConfig;
use diffuse_demo::engine::loaders::{ load_model, load_rgba8 };
use diffuse_demo::engine::logging::init_logging;
use diffuse_demo::engine::platform::DesktopWindow;
use diffuse_demo::engine::rendering::draw_mode::{ DrawMode, RED, WHITE };
use diffuse_demo::engine::rendering::{ GlContext, Renderer };
use diffuse_demo::engine::utils::math::{ vec3_add, Vec3, VEC3_RIGHT, VEC3_UP };

const SCENE_LIGHT: Vec3 = [0.0, 2.0, 1.0];
const CUBE_POSITION: Vec3 = [-2.0, 0.0, 0.0];
const HELMET_POSITION: Vec3 = [2.0, 0.0, 0.0];

// Both objects spin about right + up.
fn spin_axis() -> Vec3 {
    vec3_add(VEC3_UP, VEC3_RIGHT)
}

fn helmet_transform(angle: f32) -> Transform {
    Transform::new(HELMET_POSITION, 1.0, angle, spin_axis())
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AppConfig::load(&path).with_context(|| format!("loading config {:?}", path)),
        None => Ok(AppConfig::default()),
    };
    // Log even when the config itself is broken.
    init_logging(config.as_ref().map(|config| config.logging.clone()).unwrap_or_default());
    let config = config?;

    let (window, gl) = DesktopWindow::create(&config.window).context("creating window")?;
    let ctx = GlContext::new(gl).context("creating draw context")?;
    let mut renderer = Renderer::new(ctx, window, &config).context("initializing renderer")?;

    let model_path = config.assets.model_path();
    let model = load_model(&model_path).with_context(|| format!("loading model {:?}", model_path))?;
    let texture_path = config.assets.texture_path();
    let texture = load_rgba8(&texture_path).with_context(|| format!("loading texture {:?}", texture_path))?;
    let helmet = Mesh::upload(renderer.context_mut(), &model, Some(&texture)).context("uploading helmet")?;

    renderer.set_light_source(SCENE_LIGHT);
    let mut angle = 0.0f32;

    info!("entering draw loop");
    while !renderer.should_close() {
        angle = (angle + 1.0) % 360.0;

        renderer.begin_frame()?;
        renderer.draw_cube(RED, CUBE_POSITION, 1.0, angle, spin_axis())?;
        renderer.draw_mesh(&helmet, &helmet_transform(angle), DrawMode::Textured, WHITE)?;
        renderer.end_frame()?;
    }

    renderer.release_mesh(helmet);
    renderer.terminate();
    info!("bye");
    Ok(())
}
