use crate::config;
use crate::geometry::{self, Primitive, Vertex, VertexColor};
use crate::shading::ShadeMode;
use glow::HasContext;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::{Display, DisplayApiPreference};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use log::{debug, info, warn};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::error::Error;
use std::ffi::CStr;
use std::mem;
use std::num::NonZeroU32;
use std::sync::Arc;
use winit::window::Window;

// Compatibility-profile primitive; glow does not export it.
const GL_POLYGON: u32 = 0x0009;

struct ProgramState {
    program: glow::Program,
    position_location: u32,
    color_location: Option<u32>,
}

pub struct State {
    gl: glow::Context,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    program: Option<ProgramState>,
    vao: glow::VertexArray,
    position_buffer: glow::Buffer,
    color_buffer: glow::Buffer,
    window_size: (u32, u32),
}

pub fn init(
    window: Arc<Window>,
    mode: ShadeMode,
    vsync_enabled: bool,
) -> Result<State, Box<dyn Error>> {
    info!("Initializing OpenGL renderer...");

    let (gl_surface, gl_context, gl) = create_opengl_context(&window, vsync_enabled)?;
    let (vao, position_buffer, color_buffer) = upload_geometry(&gl)?;

    let program = match build_program(&gl, mode) {
        Ok(program) => Some(program),
        Err(e) => {
            warn!("Failed to build the {} program: {}", mode, e);
            None
        }
    };

    let size = window.inner_size();
    unsafe {
        gl.viewport(0, 0, size.width as i32, size.height as i32);
    }

    info!(
        "Uploaded {} vertices across {} shapes.",
        geometry::VERTEX_POSITIONS.len(),
        geometry::SHAPES.len()
    );
    for shape in &geometry::SHAPES {
        debug!(
            "Shape '{}' covers vertices [{}, {}) as {:?}.",
            shape.name,
            shape.first,
            shape.first + shape.count,
            shape.primitive
        );
    }

    Ok(State {
        gl,
        gl_surface,
        gl_context,
        program,
        vao,
        position_buffer,
        color_buffer,
        window_size: (size.width, size.height),
    })
}

/// Swaps the live program for the given mode's pair. On a build failure the
/// previous program stays active so exactly one program remains alive.
pub fn activate(state: &mut State, mode: ShadeMode) {
    match build_program(&state.gl, mode) {
        Ok(program) => {
            if let Some(old) = state.program.take() {
                unsafe {
                    state.gl.delete_program(old.program);
                }
            }
            state.program = Some(program);
            info!("Activated the {} program.", mode);
        }
        Err(e) => {
            warn!("Failed to build the {} program: {}", mode, e);
        }
    }
    drain_gl_errors(&state.gl, "program activation");
}

fn build_program(gl: &glow::Context, mode: ShadeMode) -> Result<ProgramState, String> {
    let sources = mode.sources();
    let stages = [
        (glow::VERTEX_SHADER, sources.vertex),
        (glow::FRAGMENT_SHADER, sources.fragment),
    ];

    unsafe {
        let program = gl.create_program()?;
        let mut shaders = Vec::with_capacity(stages.len());

        for (stage, source) in stages {
            let shader = match gl.create_shader(stage) {
                Ok(shader) => shader,
                Err(e) => {
                    for shader in shaders {
                        gl.delete_shader(shader);
                    }
                    gl.delete_program(program);
                    return Err(e);
                }
            };
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                for shader in shaders {
                    gl.delete_shader(shader);
                }
                gl.delete_program(program);
                return Err(format!("shader compilation failed: {log}"));
            }
            gl.attach_shader(program, shader);
            shaders.push(shader);
        }

        gl.link_program(program);
        for shader in shaders {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("program linking failed: {log}"));
        }

        let Some(position_location) = gl.get_attrib_location(program, "position") else {
            gl.delete_program(program);
            return Err("program has no position attribute".to_string());
        };
        let color_location = gl.get_attrib_location(program, "color");

        gl.use_program(Some(program));

        Ok(ProgramState {
            program,
            position_location,
            color_location,
        })
    }
}

fn upload_geometry(
    gl: &glow::Context,
) -> Result<(glow::VertexArray, glow::Buffer, glow::Buffer), String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let position_buffer = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(position_buffer));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&geometry::VERTEX_POSITIONS),
            glow::STATIC_DRAW,
        );

        let color_buffer = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(color_buffer));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&geometry::VERTEX_COLORS),
            glow::STATIC_DRAW,
        );

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        drain_gl_errors(gl, "geometry upload");
        Ok((vao, position_buffer, color_buffer))
    }
}

pub fn draw(state: &mut State) -> Result<(), Box<dyn Error>> {
    if state.window_size.0 == 0 || state.window_size.1 == 0 {
        return Ok(());
    }

    let gl = &state.gl;
    unsafe {
        let [r, g, b, a] = config::CLEAR_COLOR;
        gl.clear_color(r, g, b, a);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        if let Some(program) = &state.program {
            gl.use_program(Some(program.program));
            gl.bind_vertex_array(Some(state.vao));

            gl.enable_vertex_attrib_array(program.position_location);
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(state.position_buffer));
            gl.vertex_attrib_pointer_f32(
                program.position_location,
                2,
                glow::FLOAT,
                false,
                mem::size_of::<Vertex>() as i32,
                0,
            );

            if let Some(color_location) = program.color_location {
                gl.enable_vertex_attrib_array(color_location);
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(state.color_buffer));
                gl.vertex_attrib_pointer_f32(
                    color_location,
                    3,
                    glow::FLOAT,
                    false,
                    mem::size_of::<VertexColor>() as i32,
                    0,
                );
            }

            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            for shape in &geometry::SHAPES {
                gl.draw_arrays(gl_primitive(shape.primitive), shape.first, shape.count);
            }

            gl.disable_vertex_attrib_array(program.position_location);
            if let Some(color_location) = program.color_location {
                gl.disable_vertex_attrib_array(color_location);
            }
            gl.bind_vertex_array(None);
        }
    }

    drain_gl_errors(gl, "draw");
    state.gl_surface.swap_buffers(&state.gl_context)?;
    Ok(())
}

pub fn resize(state: &mut State, width: u32, height: u32) {
    if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
        state.gl_surface.resize(&state.gl_context, w, h);
        unsafe {
            state.gl.viewport(0, 0, width as i32, height as i32);
        }
        state.window_size = (width, height);
    } else {
        warn!("Ignoring resize to zero dimensions.");
    }
}

pub fn cleanup(state: &mut State) {
    info!("Cleaning up OpenGL resources...");
    unsafe {
        if let Some(program) = state.program.take() {
            state.gl.delete_program(program.program);
        }
        state.gl.delete_vertex_array(state.vao);
        state.gl.delete_buffer(state.position_buffer);
        state.gl.delete_buffer(state.color_buffer);
    }
    info!("OpenGL resources cleaned up.");
}

fn gl_primitive(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::TriangleList => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
        Primitive::TriangleFan => glow::TRIANGLE_FAN,
        Primitive::Polygon => GL_POLYGON,
    }
}

/// Logs and discards every pending OpenGL error. Rendering carries on.
fn drain_gl_errors(gl: &glow::Context, context: &str) {
    unsafe {
        loop {
            let code = gl.get_error();
            if code == glow::NO_ERROR {
                break;
            }
            warn!("OpenGL error {:#06x} after {}.", code, context);
        }
    }
}

fn create_opengl_context(
    window: &Window,
    vsync_enabled: bool,
) -> Result<(Surface<WindowSurface>, PossiblyCurrentContext, glow::Context), Box<dyn Error>> {
    let display_handle = window.display_handle()?.as_raw();
    let window_handle = window.window_handle()?.as_raw();

    #[cfg(target_os = "windows")]
    let preference = DisplayApiPreference::WglThenEgl(Some(window_handle));
    #[cfg(target_os = "macos")]
    let preference = DisplayApiPreference::Cgl;
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let preference =
        DisplayApiPreference::EglThenGlx(Box::new(winit::platform::x11::register_xlib_error_hook));

    let gl_display = unsafe { Display::new(display_handle, preference)? };

    let template = ConfigTemplateBuilder::new()
        .with_alpha_size(8)
        .with_depth_size(24)
        .build();
    let gl_config = unsafe { gl_display.find_configs(template)? }
        .next()
        .ok_or("No suitable OpenGL config found")?;

    let size = window.inner_size();
    let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        window_handle,
        NonZeroU32::new(size.width).ok_or("Cannot create a zero-width window surface")?,
        NonZeroU32::new(size.height).ok_or("Cannot create a zero-height window surface")?,
    );
    let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes)? };

    // The pentagon draws with the legacy polygon primitive, so the context
    // must use the compatibility profile.
    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .with_profile(GlProfile::Compatibility)
        .build(Some(window_handle));
    let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes)? }
        .make_current(&gl_surface)?;

    let interval = if vsync_enabled {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    };
    if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
        warn!("Failed to set swap interval: {}", e);
    }

    let gl = unsafe {
        glow::Context::from_loader_function_cstr(|s: &CStr| {
            gl_display.get_proc_address(s) as *const _
        })
    };

    Ok((gl_surface, gl_context, gl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_mapping_matches_gl_enums() {
        assert_eq!(gl_primitive(Primitive::TriangleList), glow::TRIANGLES);
        assert_eq!(gl_primitive(Primitive::TriangleStrip), glow::TRIANGLE_STRIP);
        assert_eq!(gl_primitive(Primitive::TriangleFan), glow::TRIANGLE_FAN);
        assert_eq!(gl_primitive(Primitive::Polygon), GL_POLYGON);
        assert_eq!(GL_POLYGON, 0x0009);
    }

    #[test]
    fn primitive_mapping_is_injective() {
        let modes = [
            Primitive::TriangleList,
            Primitive::TriangleStrip,
            Primitive::TriangleFan,
            Primitive::Polygon,
        ];
        for (i, a) in modes.iter().enumerate() {
            for b in &modes[i + 1..] {
                assert_ne!(gl_primitive(*a), gl_primitive(*b));
            }
        }
    }
}
