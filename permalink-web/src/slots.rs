use permalink_core::StateSlot;
use wasm_bindgen::prelude::*;

/// Ace's `setValue` cursor argument: -1 puts the cursor at the start.
const CURSOR_TO_START: i32 = -1;

#[wasm_bindgen]
extern "C" {
    /// Code editor exposing `getValue()` and `setValue(text, cursorPos)`.
    pub type Editor;

    #[wasm_bindgen(method, js_name = getValue)]
    fn get_value(this: &Editor) -> String;

    #[wasm_bindgen(method, js_name = setValue)]
    fn set_value_with_cursor(this: &Editor, text: &str, cursor_pos: i32);

    /// Any element with a string `value` property, e.g. `<input>` or `<textarea>`.
    pub type ValueElement;

    #[wasm_bindgen(method, getter = value)]
    fn current_value(this: &ValueElement) -> String;

    #[wasm_bindgen(method, setter = value)]
    fn assign_value(this: &ValueElement, value: &str);
}

pub struct EditorSlot<'a>(pub &'a Editor);

impl StateSlot for EditorSlot<'_> {
    fn value(&self) -> String {
        self.0.get_value()
    }

    fn set_value(&mut self, value: &str) {
        self.0.set_value_with_cursor(value, CURSOR_TO_START);
    }
}

pub struct ElementSlot<'a>(pub &'a ValueElement);

impl StateSlot for ElementSlot<'_> {
    fn value(&self) -> String {
        self.0.current_value()
    }

    fn set_value(&mut self, value: &str) {
        self.0.assign_value(value);
    }
}
