//! Focus point tracking for mouse and touch input.
//!
//! Desktop: the mask follows the mouse. Mobile: the mask sits in the middle
//! of the canvas until the user grabs it; a touch only moves the mask if it
//! starts inside the current circle. Once dragged, the mask stays where it
//! was dropped for the rest of the mobile session.

use crate::config::MaskProfile;
use crate::geom::{Resolution, Vec2, Viewport};

/// Viewports at most this wide (CSS pixels) use touch semantics.
pub const MOBILE_MAX_WIDTH: f32 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Desktop,
    Mobile,
}

impl InputMode {
    pub fn from_viewport_width(css_width: f32) -> Self {
        if css_width <= MOBILE_MAX_WIDTH {
            InputMode::Mobile
        } else {
            InputMode::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == InputMode::Mobile
    }
}

#[derive(Debug, Clone)]
pub struct PointerTracker {
    viewport: Viewport,
    mode: InputMode,
    /// Top-down device pixels.
    focus: Vec2,
    desktop_radius: f32,
    mobile_radius: f32,
    dragging: bool,
    has_dragged_once: bool,
}

impl PointerTracker {
    /// Starts centered, in the mode implied by the viewport width.
    pub fn new(viewport: Viewport, profile: &MaskProfile) -> Self {
        let mut tracker = Self {
            viewport,
            mode: InputMode::from_viewport_width(viewport.width),
            focus: viewport.surface().center(),
            desktop_radius: 0.0,
            mobile_radius: 0.0,
            dragging: false,
            has_dragged_once: false,
        };
        tracker.set_profile(profile);
        tracker
    }

    /// Take grab radii from `profile` (CSS pixels).
    pub fn set_profile(&mut self, profile: &MaskProfile) {
        self.desktop_radius = profile.desktop.circle_radius;
        self.mobile_radius = profile.mobile.circle_radius;
    }

    /// Re-evaluate the mode after a layout change. Returns the new mode when it
    /// changed.
    pub fn on_resize(&mut self, viewport: Viewport) -> Option<InputMode> {
        let previous = self.mode;
        self.viewport = viewport;
        self.mode = InputMode::from_viewport_width(viewport.width);

        let changed = previous != self.mode;
        if changed {
            self.dragging = false;
            if self.mode == InputMode::Mobile {
                self.has_dragged_once = false;
            }
        }
        self.recenter();
        changed.then_some(self.mode)
    }

    /// Mouse position relative to the canvas, CSS pixels.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if self.mode == InputMode::Desktop {
            self.focus = self.viewport.to_device(x, y);
        }
    }

    /// Returns whether a drag began.
    pub fn on_touch_start(&mut self, x: f32, y: f32) -> bool {
        if self.mode != InputMode::Mobile {
            return false;
        }
        self.recenter();
        let touch = self.viewport.to_device(x, y);
        if touch.distance(self.focus) > self.grab_radius() {
            return false;
        }
        self.dragging = true;
        self.has_dragged_once = true;
        self.focus = touch;
        true
    }

    pub fn on_touch_move(&mut self, x: f32, y: f32) {
        if self.dragging {
            self.focus = self.viewport.to_device(x, y);
        }
    }

    pub fn on_touch_end(&mut self) {
        self.dragging = false;
        self.recenter();
    }

    /// Pin the focus to the surface center while a fresh mobile session has
    /// not been dragged yet.
    pub fn recenter(&mut self) {
        if self.mode == InputMode::Mobile && !self.dragging && !self.has_dragged_once {
            self.focus = self.viewport.surface().center();
        }
    }

    /// Circle radius of the current mode in device pixels.
    pub fn grab_radius(&self) -> f32 {
        let css = match self.mode {
            InputMode::Desktop => self.desktop_radius,
            InputMode::Mobile => self.mobile_radius,
        };
        css * self.viewport.dpr
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> Resolution {
        self.viewport.surface()
    }

    /// Top-down device pixels.
    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    /// Bottom-up device pixels, as the fragment program expects.
    pub fn shader_focus(&self) -> Vec2 {
        self.surface().flip_y(self.focus)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn has_dragged_once(&self) -> bool {
        self.has_dragged_once
    }
}
