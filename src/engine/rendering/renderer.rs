use log::{ debug, info, warn };

use crate::engine::components::mesh::Mesh;
use crate::engine::components::shapes::Shape;
use crate::engine::components::transform::Transform;
use crate::engine::config::{ AppConfig, CameraConfig };
use crate::engine::error::RenderError;
use crate::engine::platform::PresentSurface;
use crate::engine::rendering::context::{ DrawContext, Extent };
use crate::engine::rendering::draw_mode::{ DrawMode, WHITE };
use crate::engine::rendering::shader::{ slots, uniforms, ShaderProgram };
use crate::engine::utils::math::{ mat4x4_perspective, mat4x4_translate, view_projection, Mat4x4, Vec3 };

pub const SPHERE_SUBDIVISIONS: u32 = 3;
pub const LIGHT_MARKER_SCALE: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinShape {
    Cube,
    Sphere,
}

impl BuiltinShape {
    pub fn shape(self) -> Shape {
        match self {
            BuiltinShape::Cube => Shape::Cube,
            BuiltinShape::Sphere => Shape::Sphere { subdivisions: SPHERE_SUBDIVISIONS },
        }
    }
}

struct BuiltinShapes {
    cube: Mesh,
    sphere: Mesh,
}

impl BuiltinShapes {
    fn release<C: DrawContext>(self, ctx: &mut C) {
        self.cube.release(ctx);
        self.sphere.release(ctx);
    }
}

// Per-frame constants the shader needs on every draw.
struct SceneUniforms {
    projection_view: Mat4x4,
    light_source: Vec3,
}

/// Owns the draw context, the window, the diffuse program and the built-in
/// meshes. All GPU handles it gives out are valid until [`Renderer::terminate`].
pub struct Renderer<C: DrawContext, W: PresentSurface> {
    ctx: C,
    window: W,
    extent: Extent,
    projection_matrix: Mat4x4,
    view_matrix: Mat4x4,
    light_source: Vec3,
    shader: ShaderProgram,
    shapes: BuiltinShapes,
}

impl<C: DrawContext, W: PresentSurface> Renderer<C, W> {
    pub fn new(mut ctx: C, window: W, config: &AppConfig) -> Result<Self, RenderError> {
        let extent = window.extent();
        ctx.init_pipeline(extent);

        let projection_matrix = projection_for(&config.camera, extent);
        let view_matrix = mat4x4_translate(0.0, 0.0, -config.camera.distance);

        let shader = ShaderProgram::diffuse(&mut ctx);
        if !shader.is_valid() {
            return Err(RenderError::InvalidShaderProgram);
        }
        let shapes = match init_resources(&mut ctx, &shader) {
            Ok(shapes) => shapes,
            Err(e) => {
                shader.release(&mut ctx);
                return Err(e);
            }
        };

        if let Err(e) = check_diagnostics(&mut ctx) {
            shapes.release(&mut ctx);
            shader.release(&mut ctx);
            return Err(e);
        }

        info!(
            "renderer ready: {}x{}, camera at distance {}",
            extent.width,
            extent.height,
            config.camera.distance
        );

        Ok(Self {
            ctx,
            window,
            extent,
            projection_matrix,
            view_matrix,
            light_source: config.light_source,
            shader,
            shapes,
        })
    }

    /// Polls events, clears the frame and draws the light marker.
    pub fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.window.poll_events();
        self.ctx.clear();
        let light = self.light_source;
        self.draw_sphere_unlit(WHITE, light, LIGHT_MARKER_SCALE)
    }

    /// Reports queued GPU errors, then presents.
    pub fn end_frame(&mut self) -> Result<(), RenderError> {
        check_diagnostics(&mut self.ctx)?;
        self.window.present()
    }

    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Draws `mesh` with one indexed call. `color` is ignored in
    /// [`DrawMode::Textured`]. Bindings are left as the draw set them.
    pub fn draw_mesh(&mut self, mesh: &Mesh, transform: &Transform, mode: DrawMode, color: Vec3) -> Result<(), RenderError> {
        let scene = self.scene_uniforms();
        issue_draw(&mut self.ctx, &self.shader, &scene, mesh, transform, mode, color)
    }

    pub fn draw_cube(&mut self, color: Vec3, position: Vec3, scale: f32, angle_degrees: f32, axis: Vec3) -> Result<(), RenderError> {
        let transform = Transform::new(position, scale, angle_degrees, axis);
        self.draw_builtin(BuiltinShape::Cube, &transform, DrawMode::Color, color)
    }

    pub fn draw_sphere(&mut self, color: Vec3, position: Vec3, scale: f32) -> Result<(), RenderError> {
        self.draw_builtin(BuiltinShape::Sphere, &Transform::at(position, scale), DrawMode::Color, color)
    }

    pub fn draw_sphere_unlit(&mut self, color: Vec3, position: Vec3, scale: f32) -> Result<(), RenderError> {
        self.draw_builtin(BuiltinShape::Sphere, &Transform::at(position, scale), DrawMode::UnlitColor, color)
    }

    fn draw_builtin(&mut self, shape: BuiltinShape, transform: &Transform, mode: DrawMode, color: Vec3) -> Result<(), RenderError> {
        let scene = self.scene_uniforms();
        let mesh = match shape {
            BuiltinShape::Cube => &self.shapes.cube,
            BuiltinShape::Sphere => &self.shapes.sphere,
        };
        issue_draw(&mut self.ctx, &self.shader, &scene, mesh, transform, mode, color)
    }

    fn scene_uniforms(&self) -> SceneUniforms {
        SceneUniforms {
            projection_view: view_projection(&self.projection_matrix, &self.view_matrix),
            light_source: self.light_source,
        }
    }

    pub fn shape(&self, shape: BuiltinShape) -> &Mesh {
        match shape {
            BuiltinShape::Cube => &self.shapes.cube,
            BuiltinShape::Sphere => &self.shapes.sphere,
        }
    }

    pub fn light_source(&self) -> Vec3 {
        self.light_source
    }

    pub fn set_light_source(&mut self, position: Vec3) {
        self.light_source = position;
    }

    pub fn projection_matrix(&self) -> &Mat4x4 {
        &self.projection_matrix
    }

    pub fn view_matrix(&self) -> &Mat4x4 {
        &self.view_matrix
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// For uploading caller-owned meshes.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn release_mesh(&mut self, mesh: Mesh) {
        mesh.release(&mut self.ctx);
    }

    /// Releases built-in meshes and the program, then closes the window.
    pub fn terminate(self) {
        let Self { mut ctx, window, shader, shapes, .. } = self;
        shapes.release(&mut ctx);
        shader.release(&mut ctx);
        for diagnostic in ctx.take_diagnostics() {
            warn!("GPU error {} during shutdown: {}", diagnostic.id, diagnostic.message);
        }
        drop(ctx);
        drop(window);
        debug!("renderer terminated");
    }
}

pub fn projection_for(camera: &CameraConfig, extent: Extent) -> Mat4x4 {
    mat4x4_perspective(camera.fov_y_degrees.to_radians(), extent.aspect_ratio(), camera.near, camera.far)
}

// Sampler binding and built-in meshes. Leaves nothing allocated on failure.
fn init_resources<C: DrawContext>(ctx: &mut C, shader: &ShaderProgram) -> Result<BuiltinShapes, RenderError> {
    shader.bind(ctx);
    shader.set_int_uniform(ctx, uniforms::ALBEDO_TEXTURE, 0)?;

    let cube = Mesh::from_shape(ctx, BuiltinShape::Cube.shape())?;
    match Mesh::from_shape(ctx, BuiltinShape::Sphere.shape()) {
        Ok(sphere) => Ok(BuiltinShapes { cube, sphere }),
        Err(e) => {
            cube.release(ctx);
            Err(e)
        }
    }
}

fn check_diagnostics<C: DrawContext>(ctx: &mut C) -> Result<(), RenderError> {
    match ctx.take_diagnostics().into_iter().next() {
        Some(diagnostic) => Err(RenderError::Gpu {
            id: diagnostic.id,
            message: diagnostic.message,
        }),
        None => Ok(()),
    }
}

fn issue_draw<C: DrawContext>(
    ctx: &mut C,
    shader: &ShaderProgram,
    scene: &SceneUniforms,
    mesh: &Mesh,
    transform: &Transform,
    mode: DrawMode,
    color: Vec3
) -> Result<(), RenderError> {
    let textured = match (mode, mesh.tex_coords(), mesh.texture()) {
        (DrawMode::Textured, Some(uvs), Some(texture)) => Some((uvs, texture)),
        (DrawMode::Textured, _, _) => return Err(RenderError::MissingTexture),
        _ => None,
    };

    shader.bind(ctx);
    shader.set_matrix_uniform(ctx, uniforms::MODEL_MATRIX, &transform.get_matrix())?;
    shader.set_matrix_uniform(ctx, uniforms::NORMAL_MATRIX, &transform.get_normal_matrix())?;
    shader.set_matrix_uniform(ctx, uniforms::PROJECTION_MATRIX, &scene.projection_view)?;
    shader.set_int_uniform(ctx, uniforms::MODE, mode.uniform_value())?;
    shader.set_vector_uniform(ctx, uniforms::LIGHT_SOURCE, scene.light_source)?;
    if mode.uses_color() {
        shader.set_vector_uniform(ctx, uniforms::COLOR, color)?;
    }

    ctx.bind_index_buffer(mesh.indices());
    ctx.bind_vertex_attribute(slots::POSITION, mesh.positions(), 3);
    ctx.bind_vertex_attribute(slots::NORMAL, mesh.normals(), 3);
    match textured {
        Some((uvs, texture)) => {
            ctx.bind_texture(0, texture);
            ctx.bind_vertex_attribute(slots::TEX_COORD, uvs, 2);
        }
        None => ctx.disable_vertex_attribute(slots::TEX_COORD),
    }

    ctx.draw_indexed_u16(mesh.index_count());
    Ok(())
}
