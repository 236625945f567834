// ============================================================================
// QR SCANNER FFI - Foreign Function Interface to JavaScript
// ============================================================================
// Wrappers for the html5-qrcode glue functions - no state, no logic
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = initQrScanner)]
    pub fn init_qr_scanner(
        container_id: &str,
        on_qr_decoded: &js_sys::Function,
        on_error: &js_sys::Function,
    );

    #[wasm_bindgen(js_name = stopQrScanner)]
    pub fn stop_qr_scanner();
}
