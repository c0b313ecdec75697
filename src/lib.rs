//! Pointer-driven pixelation mask for a WebGL2 canvas.
//!
//! The scene is pixelated everywhere except inside a circle around a focus
//! point that follows the mouse (desktop) or can be dragged (touch). The
//! circle edge is a smoothstep blend with a thin border, optionally warped
//! into lobes, and the inside can be magnified with a fisheye.
//!
//! Everything except [`wasm`] is plain Rust and runs on the host as well;
//! [`mask`] is the CPU twin of the fragment program.

pub mod config;
pub mod effect;
pub mod error;
pub mod geom;
pub mod mask;
pub mod pointer;
pub mod session;

pub use config::{MaskConfig, MaskGate, MaskProfile};
pub use effect::{Composition, EffectAdapter, Stage};
pub use error::{Error, Result};
pub use geom::{Resolution, Rgb, Vec2, Viewport};
pub use mask::{Frame, MaskUniforms, Source};
pub use pointer::{InputMode, PointerTracker};
pub use session::MaskSession;

// Browser entry, DOM wiring and WebGL; only built for wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use log::{info, warn};
    use wasm_bindgen::prelude::*;

    use crate::config::MaskProfile;
    use crate::error::Error;
    use crate::session::MaskSession;

    pub mod glsl;
    mod input;
    pub mod render;

    /// Canvas attribute holding an optional JSON `MaskProfile`.
    pub const CONFIG_ATTRIBUTE: &str = "data-mask-config";

    thread_local! {
        static SESSION: RefCell<Option<Rc<RefCell<MaskSession>>>> = const { RefCell::new(None) };
    }

    fn with_session<R>(f: impl FnOnce(&mut MaskSession) -> R) -> Option<R> {
        SESSION.with(|slot| slot.borrow().as_ref().map(|s| f(&mut s.borrow_mut())))
    }

    fn load_profile(canvas: &web_sys::HtmlCanvasElement) -> MaskProfile {
        let Some(json) = canvas.get_attribute(CONFIG_ATTRIBUTE) else {
            return MaskProfile::default();
        };
        MaskProfile::from_json(&json).unwrap_or_else(|e| {
            warn!("{e}; using the built-in profile");
            MaskProfile::default()
        })
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or(Error::Dom("no window".into()))?;
        let document = window.document().ok_or(Error::Dom("no document".into()))?;
        let canvas = document
            .get_element_by_id("c")
            .ok_or(Error::Dom("canvas #c not found".into()))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let viewport = render::viewport(&window)?;
        render::fit_canvas(&canvas, &viewport);
        let session = Rc::new(RefCell::new(MaskSession::new(load_profile(&canvas), viewport)));
        info!(
            "pixel mask starting: {:?} mode, {}x{} css px @{}x",
            session.borrow().mode(),
            viewport.width,
            viewport.height,
            viewport.dpr
        );
        SESSION.with(|slot| *slot.borrow_mut() = Some(session.clone()));

        input::attach(&window, &canvas, session.clone())?;
        render::start(canvas, session)?;
        Ok(())
    }

    /// Hover report from the model presenter. Only the legacy preset is gated
    /// on it.
    #[wasm_bindgen]
    pub fn set_hovered(hovered: bool) {
        with_session(|s| s.set_hovered(hovered));
    }

    /// Whether a touch drag of the mask is in progress.
    #[wasm_bindgen]
    pub fn is_interacting() -> bool {
        with_session(|s| s.is_interacting()).unwrap_or(false)
    }

    /// Whether the viewport currently uses touch semantics.
    #[wasm_bindgen]
    pub fn is_mobile() -> bool {
        with_session(|s| s.mode().is_mobile()).unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn set_legacy_mode(legacy: bool) {
        with_session(|s| s.set_legacy(legacy));
    }

    /// Replace the mask profile with a JSON one; takes effect next frame.
    #[wasm_bindgen]
    pub fn set_mask_config(json: &str) -> Result<(), JsValue> {
        let profile = MaskProfile::from_json(json)?;
        with_session(|s| s.set_profile(profile));
        Ok(())
    }
}
