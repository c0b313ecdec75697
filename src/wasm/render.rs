use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{error, info};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlProgram,
    WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject, Window,
};

use super::glsl;
use crate::effect::{Composition, EffectAdapter, Stage};
use crate::error::{Error, Result};
use crate::geom::Viewport;
use crate::mask::MaskUniforms;
use crate::session::MaskSession;

/// Window size in CSS pixels plus the device pixel ratio.
pub fn viewport(window: &Window) -> std::result::Result<Viewport, JsValue> {
    let w = window.inner_width()?.as_f64().ok_or("inner width is not a number")?;
    let h = window.inner_height()?.as_f64().ok_or("inner height is not a number")?;
    Ok(Viewport::new(w as f32, h as f32, window.device_pixel_ratio() as f32))
}

/// Size the backing store to the device-pixel surface.
pub fn fit_canvas(canvas: &HtmlCanvasElement, viewport: &Viewport) {
    let surface = viewport.surface();
    canvas.set_width(surface.width as u32);
    canvas.set_height(surface.height as u32);
}

pub fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let stage = if kind == GL::VERTEX_SHADER { "vertex" } else { "fragment" };
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| Error::Gl(format!("cannot create {stage} shader")))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(Error::Shader { stage, log })
    }
}

pub fn link_program(gl: &GL, vert: &str, frag: &str) -> Result<WebGlProgram> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vert)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, frag)?;
    let program = gl
        .create_program()
        .ok_or_else(|| Error::Gl("cannot create program".into()))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // The program keeps the compiled stages alive.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(Error::Shader { stage: "link", log })
    }
}

/// Procedural scene drawn into the offscreen target.
struct ScenePass {
    program: WebGlProgram,
    u_resolution: Option<WebGlUniformLocation>,
    u_time: Option<WebGlUniformLocation>,
}

impl ScenePass {
    fn new(gl: &GL) -> Result<Self> {
        let program = link_program(gl, glsl::FULLSCREEN_VERT, glsl::SCENE_FRAG)?;
        Ok(Self {
            u_resolution: gl.get_uniform_location(&program, "u_resolution"),
            u_time: gl.get_uniform_location(&program, "u_time"),
            program,
        })
    }
}

/// The mask program and its uniform locations.
pub struct MaskPass {
    program: WebGlProgram,
    locations: HashMap<&'static str, Option<WebGlUniformLocation>>,
}

impl MaskPass {
    pub fn new(gl: &GL) -> Result<Self> {
        let program = link_program(gl, glsl::FULLSCREEN_VERT, glsl::MASK_FRAG)?;
        let locations = glsl::MASK_UNIFORMS
            .iter()
            .map(|&name| (name, gl.get_uniform_location(&program, name)))
            .collect();
        Ok(Self { program, locations })
    }

    /// Uniform names the linked program does not expose.
    pub fn missing_uniforms(&self) -> Vec<&'static str> {
        glsl::MASK_UNIFORMS
            .iter()
            .copied()
            .filter(|name| self.location(name).is_none())
            .collect()
    }

    fn location(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.locations.get(name).and_then(|l| l.as_ref())
    }

    /// Upload one frame's uniforms; the scene texture is bound to unit 0.
    pub fn upload(&self, gl: &GL, u: &MaskUniforms) {
        gl.use_program(Some(&self.program));
        gl.uniform1i(self.location("u_scene"), 0);
        gl.uniform2f(self.location("u_resolution"), u.resolution[0], u.resolution[1]);
        gl.uniform2f(self.location("u_focus"), u.focus[0], u.focus[1]);
        gl.uniform1f(self.location("u_granularity"), u.granularity);
        gl.uniform1f(self.location("u_circle_radius"), u.circle_radius);
        gl.uniform1f(self.location("u_blur_radius"), u.blur_radius);
        gl.uniform1f(self.location("u_fisheye_strength"), u.fisheye_strength);
        gl.uniform1f(self.location("u_edge_warp_amplitude"), u.edge_warp_amplitude);
        gl.uniform1f(self.location("u_edge_warp_frequency"), u.edge_warp_frequency);
        gl.uniform1f(self.location("u_border_thickness"), u.border_thickness);
        let [r, g, b] = u.border_color;
        gl.uniform3f(self.location("u_border_color"), r, g, b);
        gl.uniform1i(self.location("u_active"), u.active as i32);
    }
}

/// Offscreen color target the mask pass samples.
struct SceneTarget {
    texture: WebGlTexture,
    framebuffer: WebGlFramebuffer,
    width: i32,
    height: i32,
}

impl SceneTarget {
    fn new(gl: &GL, width: i32, height: i32) -> Result<Self> {
        let texture = gl
            .create_texture()
            .ok_or_else(|| Error::Gl("cannot create scene texture".into()))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA8 as i32,
            width,
            height,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        )
        .map_err(|e| Error::Gl(format!("texImage2D: {e:?}")))?;
        // Nearest + clamp, like `Frame::sample`.
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::NEAREST as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::NEAREST as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        let framebuffer = gl
            .create_framebuffer()
            .ok_or_else(|| Error::Gl("cannot create framebuffer".into()))?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        if status != GL::FRAMEBUFFER_COMPLETE {
            gl.delete_framebuffer(Some(&framebuffer));
            gl.delete_texture(Some(&texture));
            return Err(Error::Gl(format!("scene framebuffer incomplete: 0x{status:x}")));
        }

        Ok(Self {
            texture,
            framebuffer,
            width,
            height,
        })
    }

    fn release(self, gl: &GL) {
        gl.delete_framebuffer(Some(&self.framebuffer));
        gl.delete_texture(Some(&self.texture));
    }
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Scene,
    Mask,
}

pub struct Renderer {
    gl: GL,
    vao: WebGlVertexArrayObject,
    scene: ScenePass,
    mask: MaskPass,
    target: Option<SceneTarget>,
    composition: Composition<Pass>,
}

impl Renderer {
    pub fn new(gl: GL) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| Error::Gl("cannot create vertex array".into()))?;
        let scene = ScenePass::new(&gl)?;
        let mask = MaskPass::new(&gl)?;

        let mut composition = Composition::new();
        composition.mount(EffectAdapter::STAGE, Pass::Mask);
        composition.mount(Stage::Scene, Pass::Scene);

        Ok(Self {
            gl,
            vao,
            scene,
            mask,
            target: None,
            composition,
        })
    }

    fn ensure_target(&mut self, width: i32, height: i32) -> Result<()> {
        let fits = self
            .target
            .as_ref()
            .is_some_and(|t| t.width == width && t.height == height);
        if !fits {
            if let Some(old) = self.target.take() {
                old.release(&self.gl);
            }
            self.target = Some(SceneTarget::new(&self.gl, width, height)?);
        }
        Ok(())
    }

    /// Scene into the offscreen target, then the mask onto the canvas.
    pub fn draw(&mut self, uniforms: &MaskUniforms, time: f32) -> Result<()> {
        let width = uniforms.resolution[0] as i32;
        let height = uniforms.resolution[1] as i32;
        if width <= 0 || height <= 0 {
            return Ok(());
        }
        self.ensure_target(width, height)?;
        let Some(target) = self.target.as_ref() else {
            return Ok(());
        };

        let gl = &self.gl;
        gl.bind_vertex_array(Some(&self.vao));
        gl.viewport(0, 0, width, height);

        for pass in self.composition.passes() {
            match pass {
                Pass::Scene => {
                    gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&target.framebuffer));
                    gl.use_program(Some(&self.scene.program));
                    gl.uniform2f(self.scene.u_resolution.as_ref(), width as f32, height as f32);
                    gl.uniform1f(self.scene.u_time.as_ref(), time);
                    gl.draw_arrays(GL::TRIANGLES, 0, 3);
                }
                Pass::Mask => {
                    gl.bind_framebuffer(GL::FRAMEBUFFER, None);
                    gl.active_texture(GL::TEXTURE0);
                    gl.bind_texture(GL::TEXTURE_2D, Some(&target.texture));
                    self.mask.upload(gl, uniforms);
                    gl.draw_arrays(GL::TRIANGLES, 0, 3);
                }
            }
        }
        Ok(())
    }
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> std::result::Result<i32, JsValue> {
    window()
        .ok_or("no window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Start the render loop: each frame takes the session's uniforms and draws.
pub fn start(
    canvas: HtmlCanvasElement,
    session: Rc<RefCell<MaskSession>>,
) -> std::result::Result<(), JsValue> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;
    let mut renderer = Renderer::new(gl)?;
    let performance = window()
        .and_then(|w| w.performance())
        .ok_or("performance timer unavailable")?;
    info!("renderer ready ({}x{})", canvas.width(), canvas.height());

    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let started = performance.now();
    let mut last = started;
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now = performance.now();
        let dt = ((now - last) / 1000.0) as f32;
        last = now;

        let uniforms = session.borrow_mut().frame(dt);
        let time = ((now - started) / 1000.0) as f32;
        if let Err(e) = renderer.draw(&uniforms, time) {
            error!("frame skipped: {e}");
        }

        // schedule next
        if let Some(next) = f.borrow().as_ref() {
            if let Err(e) = request_frame(next) {
                error!("requestAnimationFrame failed: {e:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(first) = g.borrow().as_ref() {
        request_frame(first)?;
    }
    Ok(())
}
