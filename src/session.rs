//! One canvas worth of mask state: the tracker feeding the adapter, and the
//! profile both are configured from.

use log::{debug, info};

use crate::config::{MaskConfig, MaskProfile};
use crate::effect::EffectAdapter;
use crate::geom::Viewport;
use crate::mask::MaskUniforms;
use crate::pointer::{InputMode, PointerTracker};

#[derive(Debug, Clone)]
pub struct MaskSession {
    profile: MaskProfile,
    legacy: bool,
    tracker: PointerTracker,
    adapter: EffectAdapter,
    /// Identifier of the touch holding the mask.
    touch: Option<i32>,
}

impl MaskSession {
    pub fn new(profile: MaskProfile, viewport: Viewport) -> Self {
        let tracker = PointerTracker::new(viewport, &profile);
        let config = profile.for_mode(tracker.mode(), viewport.dpr);
        let mut adapter = EffectAdapter::new(config, viewport.surface());
        adapter.set_focus(tracker.shader_focus());
        Self {
            profile,
            legacy: false,
            tracker,
            adapter,
            touch: None,
        }
    }

    pub fn profile(&self) -> &MaskProfile {
        &self.profile
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn adapter(&self) -> &EffectAdapter {
        &self.adapter
    }

    pub fn mode(&self) -> InputMode {
        self.tracker.mode()
    }

    /// Device-pixel config for the current mode and preset.
    pub fn active_config(&self) -> MaskConfig {
        let viewport = self.tracker.viewport();
        let config = self.profile.for_mode(self.tracker.mode(), viewport.dpr);
        if self.legacy {
            config.as_legacy()
        } else {
            config
        }
    }

    fn sync(&mut self) {
        self.tracker.recenter();
        self.adapter.set_config(self.active_config());
        self.adapter.set_resolution(self.tracker.surface());
        self.adapter.set_focus(self.tracker.shader_focus());
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(mode) = self.tracker.on_resize(viewport) {
            info!("input mode now {mode:?} ({}px wide)", viewport.width);
        }
        if !self.tracker.is_dragging() {
            self.touch = None;
        }
        self.sync();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.tracker.on_pointer_move(x, y);
        self.sync();
    }

    /// Returns whether touch `id` grabbed the mask. While one finger holds
    /// the mask, further fingers are ignored.
    pub fn touch_start(&mut self, id: i32, x: f32, y: f32) -> bool {
        if self.tracker.is_dragging() {
            return false;
        }
        let grabbed = self.tracker.on_touch_start(x, y);
        if grabbed {
            debug!("mask drag started by touch {id} at ({x}, {y})");
            self.touch = Some(id);
        }
        self.sync();
        grabbed
    }

    /// Only the touch holding the mask moves it.
    pub fn touch_move(&mut self, id: i32, x: f32, y: f32) {
        if self.touch != Some(id) {
            return;
        }
        self.tracker.on_touch_move(x, y);
        self.sync();
    }

    /// Lifting another finger leaves the drag alone.
    pub fn touch_end(&mut self, id: i32) {
        if self.touch.is_some_and(|held| held != id) {
            return;
        }
        if self.touch.take().is_some() {
            debug!("mask drag ended");
        }
        self.tracker.on_touch_end();
        self.sync();
    }

    /// Identifier of the touch dragging the mask, if any.
    pub fn active_touch(&self) -> Option<i32> {
        self.touch
    }

    /// Hover report from the model presenter; only the hover gate reads it.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.adapter.set_hovered(hovered);
    }

    /// Switch between the canonical mask and the hover-gated preset.
    pub fn set_legacy(&mut self, legacy: bool) {
        if self.legacy != legacy {
            info!("mask preset: {}", if legacy { "legacy hover" } else { "canonical" });
        }
        self.legacy = legacy;
        self.sync();
    }

    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    pub fn set_profile(&mut self, profile: MaskProfile) {
        self.tracker.set_profile(&profile);
        self.profile = profile;
        self.sync();
    }

    /// True while the user is dragging the mask on a touch device; a
    /// presenter pauses its rotation meanwhile.
    pub fn is_interacting(&self) -> bool {
        self.tracker.mode().is_mobile() && self.tracker.is_dragging()
    }

    /// Uniforms for this frame.
    pub fn frame(&mut self, dt: f32) -> MaskUniforms {
        self.adapter.update(dt);
        self.adapter.uniforms()
    }
}
