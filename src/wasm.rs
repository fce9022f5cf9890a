use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn render_escp(json: &str) -> Result<Vec<u8>, JsValue> {
    crate::render_json(json)
        .map(|output| output.commands)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn layout_tree(json: &str) -> Result<String, JsValue> {
    crate::layout_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}
