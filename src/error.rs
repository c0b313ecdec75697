//! Error type for the browser entry and the configuration loader.
//!
//! The shading math and the pointer state machine never fail; only the
//! surfaces that touch JSON, the DOM or WebGL report errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid mask config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{stage} shader failed: {log}")]
    Shader { stage: &'static str, log: String },

    #[error("WebGL error: {0}")]
    Gl(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(e: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
