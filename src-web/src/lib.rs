//! Sniff Tools - Browser entry point
//!
//! Exposes the overlay to JavaScript. The page loads the module once; a
//! launcher (bookmarklet, extension button) then calls `activate`, and calling
//! it again restarts the tool from scratch.
//!
//! # Example Usage (JavaScript)
//!
//! ```javascript
//! import init, { activate, deactivate, initLogging } from './sniff_tools.js';
//!
//! await init();
//! initLogging('info');
//! activate();                                   // default host selectors
//! activate('{"visibility": {"visible": "block"}}'); // restart with overrides
//! deactivate();                                 // restore every profile
//! ```

mod dom;
mod listeners;
mod logging;
mod session;

pub use dom::DomTree;
pub use listeners::{Listener, ListenerSet};

use overlay::OverlayConfig;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Initialize logging with the given level: "trace", "debug", "info",
/// "warn", "error" or "off"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    logging::init(level);
    tracing::info!(level, "Sniff Tools logging initialized");
}

/// Configuration from an optional JSON override
pub fn load_config(json: Option<&str>) -> overlay::Result<OverlayConfig> {
    match json.map(str::trim).filter(|json| !json.is_empty()) {
        Some(json) => OverlayConfig::from_json_str(json),
        None => Ok(OverlayConfig::default()),
    }
}

fn to_js(err: overlay::OverlayError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Start the overlay on the current page. If it is already running it is
/// torn down and started again.
#[wasm_bindgen]
pub fn activate(config: Option<String>) -> Result<(), JsValue> {
    let config = load_config(config.as_deref()).map_err(to_js)?;
    session::activate(config).map_err(to_js)
}

/// Remove the overlay and show every profile again
#[wasm_bindgen]
pub fn deactivate() {
    session::deactivate();
}

#[wasm_bindgen(js_name = isActive)]
pub fn is_active() -> bool {
    session::is_active()
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap(), OverlayConfig::default());
        assert_eq!(load_config(Some("  ")).unwrap(), OverlayConfig::default());

        let config = load_config(Some(r#"{"namespace": "x_"}"#)).unwrap();
        assert_eq!(config.namespace, "x_");

        assert!(load_config(Some("{not json")).is_err());
    }
}
