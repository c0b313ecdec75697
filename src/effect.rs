//! Post-processing glue between the mask program and the frame loop.

use crate::config::{MaskConfig, MaskGate};
use crate::geom::{Resolution, Vec2};
use crate::mask::MaskUniforms;

/// Position of a pass in the frame. Passes run in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Base scene into the offscreen target.
    Scene,
    /// Full-screen effects reading the scene target.
    Effect,
    /// Final output (tone mapping, presentation).
    Output,
}

/// Ordered list of passes, stable within a stage.
#[derive(Debug, Clone)]
pub struct Composition<P> {
    passes: Vec<(Stage, P)>,
}

impl<P> Default for Composition<P> {
    fn default() -> Self {
        Self { passes: Vec::new() }
    }
}

impl<P> Composition<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every pass of the same or an earlier stage.
    pub fn mount(&mut self, stage: Stage, pass: P) {
        let at = self.passes.partition_point(|(s, _)| *s <= stage);
        self.passes.insert(at, (stage, pass));
    }

    pub fn passes(&self) -> impl Iterator<Item = &P> {
        self.passes.iter().map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Live inputs of the mask program. Stores what it is given and hands it out
/// as a [`MaskUniforms`] block; no smoothing between frames.
#[derive(Debug, Clone)]
pub struct EffectAdapter {
    config: MaskConfig,
    resolution: Resolution,
    focus: Vec2,
    hovered: bool,
}

impl EffectAdapter {
    pub const STAGE: Stage = Stage::Effect;

    pub fn new(config: MaskConfig, resolution: Resolution) -> Self {
        Self {
            config,
            resolution,
            focus: resolution.center(),
            hovered: false,
        }
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MaskConfig) {
        self.config = config;
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    /// Bottom-up device pixels.
    pub fn set_focus(&mut self, focus: Vec2) {
        self.focus = focus;
    }

    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Per-frame hook; the program reads the stored values as they are.
    pub fn update(&mut self, _dt: f32) {}

    pub fn uniforms(&self) -> MaskUniforms {
        let c = &self.config;
        MaskUniforms {
            resolution: [self.resolution.width, self.resolution.height],
            focus: self.focus.to_array(),
            granularity: c.granularity,
            circle_radius: c.circle_radius,
            blur_radius: c.blur_radius,
            fisheye_strength: c.fisheye_strength,
            edge_warp_amplitude: c.edge_warp_amplitude,
            edge_warp_frequency: c.edge_warp_frequency,
            border_thickness: c.border_thickness,
            border_color: c.border_color.to_array(),
            active: match c.gate {
                MaskGate::Always => true,
                MaskGate::Hover => self.hovered,
            },
        }
    }
}
