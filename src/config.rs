//! Mask parameters and the per-device profile they are chosen from.
//!
//! All lengths here are CSS pixels until [`MaskConfig::scaled`] multiplies
//! them by the device pixel ratio; everything downstream of the profile works
//! in device pixels.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::geom::Rgb;
use crate::pointer::InputMode;

/// Whether the mask is always shown or only while the model is hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskGate {
    #[default]
    Always,
    /// Legacy behavior: pixelate everything unless the presenter reports a
    /// hover.
    Hover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaskConfig {
    /// Side of a pixelation cell.
    pub granularity: f32,
    pub circle_radius: f32,
    /// Half-width of the smoothstep band around `circle_radius`.
    pub blur_radius: f32,
    /// 0 disables the fisheye.
    pub fisheye_strength: f32,
    /// 0 disables the edge warp.
    pub edge_warp_amplitude: f32,
    /// Lobes per full turn around the focus point.
    pub edge_warp_frequency: f32,
    pub border_thickness: f32,
    pub border_color: Rgb,
    pub gate: MaskGate,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            granularity: 10.0,
            circle_radius: 125.0,
            blur_radius: 20.0,
            fisheye_strength: 0.25,
            edge_warp_amplitude: 4.0,
            edge_warp_frequency: 6.0,
            border_thickness: 2.0,
            border_color: Rgb::LIGHT_GREY,
            gate: MaskGate::Always,
        }
    }
}

impl MaskConfig {
    /// Touch layout: smaller circle, hard edge, no distortion.
    pub fn mobile() -> Self {
        Self {
            circle_radius: 110.0,
            blur_radius: 0.0,
            fisheye_strength: 0.0,
            edge_warp_amplitude: 0.0,
            edge_warp_frequency: 0.0,
            ..Self::default()
        }
    }

    /// The hover-gated look: hard-edged circle with a white rim.
    pub fn legacy_hover() -> Self {
        Self::default().as_legacy()
    }

    /// Same circle and grid, advanced parameters zeroed, gated on hover.
    pub fn as_legacy(&self) -> Self {
        Self {
            blur_radius: 0.0,
            fisheye_strength: 0.0,
            edge_warp_amplitude: 0.0,
            edge_warp_frequency: 0.0,
            border_thickness: 3.0,
            border_color: Rgb::WHITE,
            gate: MaskGate::Hover,
            ..self.clone()
        }
    }

    /// Multiply every length by the device pixel ratio.
    pub fn scaled(&self, dpr: f32) -> Self {
        Self {
            granularity: self.granularity * dpr,
            circle_radius: self.circle_radius * dpr,
            blur_radius: self.blur_radius * dpr,
            edge_warp_amplitude: self.edge_warp_amplitude * dpr,
            border_thickness: self.border_thickness * dpr,
            ..self.clone()
        }
    }

    pub fn inner_edge(&self) -> f32 {
        self.circle_radius - self.blur_radius
    }

    pub fn outer_edge(&self) -> f32 {
        self.circle_radius + self.blur_radius
    }
}

/// One config per [`InputMode`], in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaskProfile {
    pub desktop: MaskConfig,
    pub mobile: MaskConfig,
}

impl Default for MaskProfile {
    fn default() -> Self {
        Self {
            desktop: MaskConfig::default(),
            mobile: MaskConfig::mobile(),
        }
    }
}

impl MaskProfile {
    /// Parse a JSON profile laid over the default one, so a partial
    /// `mobile` block keeps the mobile defaults for what it leaves out.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        overlay(&mut merged, serde_json::from_str(json)?);
        Ok(serde_json::from_value(merged)?)
    }

    /// Unscaled config for `mode`.
    pub fn get(&self, mode: InputMode) -> &MaskConfig {
        match mode {
            InputMode::Desktop => &self.desktop,
            InputMode::Mobile => &self.mobile,
        }
    }

    /// Device-pixel config for `mode`.
    pub fn for_mode(&self, mode: InputMode, dpr: f32) -> MaskConfig {
        self.get(mode).scaled(dpr)
    }
}

fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                overlay(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}
