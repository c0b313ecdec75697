//! Small 2D and color helpers shared by the pointer tracker, the reference
//! shader and the uniform block.
//!
//! Two pixel spaces exist side by side:
//! * top-down device pixels, which is where DOM events land once scaled by
//!   the device pixel ratio;
//! * bottom-up device pixels, which is what `gl_FragCoord` reports.

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    pub fn floor(self) -> Vec2 {
        Vec2::new(self.x.floor(), self.y.floor())
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Vec2::new(v[0], v[1])
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl Mul for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

/// Component-wise division, as GLSL does for `vec2 / vec2`.
impl Div for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x / rhs.x, self.y / rhs.y)
    }
}

/// Size of the render surface in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub width: f32,
    pub height: f32,
}

impl Resolution {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Top-down device pixels to bottom-up (fragment) pixels. The flip is its
    /// own inverse.
    pub fn flip_y(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x, self.height - p.y)
    }

    /// Bottom-up pixel coordinate to normalized texture coordinate.
    pub fn to_uv(self, p: Vec2) -> Vec2 {
        p / self.as_vec2()
    }
}

/// Layout of the canvas in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self { width, height, dpr }
    }

    /// Backing-store size of the canvas, whole device pixels.
    pub fn surface(&self) -> Resolution {
        Resolution::new(
            (self.width * self.dpr).round(),
            (self.height * self.dpr).round(),
        )
    }

    /// Event-relative CSS coordinates to top-down device pixels.
    pub fn to_device(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x * self.dpr, y * self.dpr)
    }
}

/// Linear RGB triple in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const LIGHT_GREY: Rgb = Rgb::new(0.85, 0.85, 0.85);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Unpack `0x00RRGGBB`.
    pub fn from_packed(p: u32) -> Self {
        let r = ((p >> 16) & 0xFF) as f32 / 255.0;
        let g = ((p >> 8) & 0xFF) as f32 / 255.0;
        let b = (p & 0xFF) as f32 / 255.0;
        Rgb::new(r, g, b)
    }

    /// Pack into `0x00RRGGBB`, clamping each channel.
    pub fn to_packed(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// `a * (1 - t) + b * t` with `t` clamped; exact at both ends.
    pub fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let s = 1.0 - t;
        Rgb::new(
            a.r * s + b.r * t,
            a.g * s + b.g * t,
            a.b * s + b.b * t,
        )
    }
}
