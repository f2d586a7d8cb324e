pub mod geometry;
pub mod model;
pub mod sql;

use wasm_bindgen::prelude::*;

use model::Model;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse SQL DDL into a model, returned as JSON.
#[wasm_bindgen(js_name = "importDdl")]
pub fn import_ddl(source: &str) -> Result<String, String> {
    let import = sql::parse_ddl(source).map_err(|e| e.to_string())?;
    serde_json::to_string(&import).map_err(|e| e.to_string())
}

/// Generate SQL DDL from a model given as JSON.
#[wasm_bindgen(js_name = "exportDdl")]
pub fn export_ddl(model_json: &str) -> Result<String, String> {
    let model: Model = serde_json::from_str(model_json).map_err(|e| e.to_string())?;
    let generated_at = js_sys::Date::new_0()
        .to_locale_string("en-US", &JsValue::UNDEFINED)
        .as_string()
        .unwrap_or_default();

    Ok(sql::generate_ddl(&model, &generated_at))
}
