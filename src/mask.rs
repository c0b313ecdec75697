//! CPU rendition of the mask fragment program.
//!
//! [`shade`] mirrors `MASK_FRAG` in `wasm/glsl.rs` line for line; the browser
//! runs the GLSL, the host preview and the tests run this. Both read the same
//! [`MaskUniforms`] block.
//!
//! Per pixel:
//! 1. sample the source at the lower-left texel of the pixel's grid cell;
//! 2. measure the distance to the focus point, optionally perturbed by an
//!    angular sine (edge warp);
//! 3. sample the sharp image, optionally pulled toward the focus (fisheye);
//! 4. pick border, blend or pixelated by distance band.

use crate::geom::{Resolution, Rgb, Vec2};

/// Below this distance the angle and the fisheye direction are undefined.
pub const MIN_DIST: f32 = 1e-4;

/// Frame-constant inputs of the mask program, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskUniforms {
    pub resolution: [f32; 2],
    /// Bottom-up device pixels.
    pub focus: [f32; 2],
    pub granularity: f32,
    pub circle_radius: f32,
    pub blur_radius: f32,
    pub fisheye_strength: f32,
    pub edge_warp_amplitude: f32,
    pub edge_warp_frequency: f32,
    pub border_thickness: f32,
    pub border_color: [f32; 3],
    /// False only for the hover gate without a hover: pixelate everything.
    pub active: bool,
}

impl MaskUniforms {
    pub fn inner_edge(&self) -> f32 {
        self.circle_radius - self.blur_radius
    }

    pub fn outer_edge(&self) -> f32 {
        self.circle_radius + self.blur_radius
    }
}

/// Something the program can sample, addressed by bottom-up UV.
pub trait Source {
    fn resolution(&self) -> Resolution;
    fn sample(&self, uv: Vec2) -> Rgb;
}

/// Packed `0x00RRGGBB` pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; width * height],
        }
    }

    /// Build a frame from a per-pixel function of `(column, row)`.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> u32) -> Self {
        let mut frame = Frame::new(width, height);
        for y in 0..height {
            for x in 0..width {
                frame.pixels[y * width + x] = f(x, y);
            }
        }
        frame
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// `gl_FragCoord` of the pixel at column `x`, row `y` (rows top-down).
    pub fn frag_coord(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(x as f32 + 0.5, (self.height - y) as f32 - 0.5)
    }
}

/// Nearest filtering with clamp-to-edge, like the scene texture in the
/// browser.
impl Source for Frame {
    fn resolution(&self) -> Resolution {
        Resolution::new(self.width as f32, self.height as f32)
    }

    fn sample(&self, uv: Vec2) -> Rgb {
        if self.width == 0 || self.height == 0 {
            return Rgb::default();
        }
        let tx = (uv.x * self.width as f32).floor();
        let ty = (uv.y * self.height as f32).floor();
        let tx = tx.clamp(0.0, (self.width - 1) as f32) as usize;
        let ty = ty.clamp(0.0, (self.height - 1) as f32) as usize;
        Rgb::from_packed(self.get(tx, self.height - 1 - ty))
    }
}

/// Hermite ramp, 0 at `edge0` and 1 at `edge1`. Coincident edges degrade to
/// a step at the edge.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// UV of the texel at the lower-left corner of the cell containing `uv`.
pub fn pixelate_uv(uv: Vec2, granularity: f32, resolution: Resolution) -> Vec2 {
    let res = resolution.as_vec2();
    let cell = Vec2::new(granularity.max(1.0), granularity.max(1.0)) / res;
    let half_texel = Vec2::new(0.5, 0.5) / res;
    (uv / cell).floor() * cell + half_texel
}

/// Distance to the focus with the angular sine added. `delta` is pixel minus
/// focus.
pub fn warped_distance(delta: Vec2, amplitude: f32, frequency: f32) -> f32 {
    let dist = delta.length();
    if amplitude > 0.0 && frequency > 0.0 && dist > MIN_DIST {
        let angle = delta.y.atan2(delta.x);
        dist + (angle * frequency).sin() * amplitude
    } else {
        dist
    }
}

/// Fisheye pull factor at `dist`: `strength` at the focus, 0 at the rim.
pub fn fisheye_pull(dist: f32, radius: f32, strength: f32) -> f32 {
    if strength <= 0.0 || radius <= 0.0 || dist >= radius {
        return 0.0;
    }
    let t = (dist / radius).clamp(0.0, 1.0);
    strength * (1.0 - t * t)
}

/// Sharp-image sampling coordinate, pulled toward `focus_uv`.
pub fn fisheye_uv(uv: Vec2, focus_uv: Vec2, dist: f32, radius: f32, strength: f32) -> Vec2 {
    let s = fisheye_pull(dist, radius, strength);
    if s <= 0.0 || dist <= MIN_DIST {
        return uv;
    }
    focus_uv + (uv - focus_uv) * (1.0 - s)
}

/// Final color of the fragment at `frag` (bottom-up pixel center).
pub fn shade<S: Source + ?Sized>(u: &MaskUniforms, src: &S, frag: Vec2) -> Rgb {
    let resolution = Resolution::new(u.resolution[0], u.resolution[1]);
    let uv = resolution.to_uv(frag);
    let pixelated = src.sample(pixelate_uv(uv, u.granularity, resolution));
    if !u.active {
        return pixelated;
    }

    let focus = Vec2::from(u.focus);
    let delta = frag - focus;
    let raw = delta.length();
    let dist = warped_distance(delta, u.edge_warp_amplitude, u.edge_warp_frequency);

    let sample_uv = fisheye_uv(
        uv,
        resolution.to_uv(focus),
        raw,
        u.circle_radius,
        u.fisheye_strength,
    );
    let sharp = src.sample(sample_uv);

    let outer = u.outer_edge();
    if dist <= outer {
        Rgb::mix(sharp, pixelated, smoothstep(u.inner_edge(), outer, dist))
    } else if dist < outer + u.border_thickness {
        let [r, g, b] = u.border_color;
        Rgb::new(r, g, b)
    } else {
        pixelated
    }
}

/// Run the program over every pixel of `src`.
pub fn apply(u: &MaskUniforms, src: &Frame) -> Frame {
    Frame::from_fn(src.width, src.height, |x, y| {
        shade(u, src, src.frag_coord(x, y)).to_packed()
    })
}
