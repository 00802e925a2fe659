//! WASM bindings for the duopane markdown editor.
//!
//! Exposes [`DuopaneEditor`] to JavaScript:
//!
//! ```js
//! const editor = new DuopaneEditor({ container: "notes", file: { name: "todo" } });
//! editor.load();
//! editor.on("save", function (file) { console.log(file.name, this); });
//! editor.preview();
//! ```

mod editor;
mod events;

pub use editor::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console tracing.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        // Already set when the host page runs its own subscriber.
        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}
