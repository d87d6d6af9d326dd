//! Browser bindings: keeps the editor and canvas in sync with the page URL.
//!
//! JS calls `loadState` once the editor exists, `pollState` from its frame
//! loop, and `onCodeChange` / `onCanvasChange` on user edits.
//!
//! Writing to the editor fires its `change` handler synchronously, which
//! re-enters `onCodeChange`. No `RefCell` borrow is held while a slot is
//! written.

pub mod location;
pub mod logging;
pub mod slots;

use std::cell::RefCell;

use permalink_core::{
    Param, QueryWatcher, StateSlot, StateSync, SyncConfig, UrlStore, UrlStoreError,
};
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::location::LocationUrlStore;
use crate::slots::{Editor, EditorSlot, ElementSlot, ValueElement};

thread_local! {
    static SYNC: RefCell<StateSync> = RefCell::new(StateSync::default());
    static WATCHER: RefCell<QueryWatcher> = RefCell::new(QueryWatcher::new());
}

fn current_sync() -> StateSync {
    SYNC.with(|sync| sync.borrow().clone())
}

fn install_config(config: SyncConfig) {
    info!(
        "Syncing state via ?{} and ?{}",
        config.code_param, config.canvas_param
    );
    SYNC.with(|sync| *sync.borrow_mut() = StateSync::new(config));
}

fn mark_seen<S: UrlStore + ?Sized>(store: &S) {
    WATCHER.with(|watcher| watcher.borrow_mut().mark_seen(store));
}

fn load_into<S: UrlStore + ?Sized>(
    store: &mut S,
    code: &mut impl StateSlot,
    canvas: &mut impl StateSlot,
) {
    current_sync().load(store, code, canvas);
    mark_seen(store);
}

/// The watcher is moved out for the duration of the poll; anything a slot
/// does to it meanwhile is superseded by the post-poll state.
fn poll_into<S: UrlStore + ?Sized>(
    store: &mut S,
    code: &mut impl StateSlot,
    canvas: &mut impl StateSlot,
) -> bool {
    let sync = current_sync();
    let mut watcher = WATCHER.with(RefCell::take);
    let reloaded = watcher.poll(&sync, store, code, canvas).is_some();
    WATCHER.with(|slot| *slot.borrow_mut() = watcher);
    reloaded
}

fn record_change_in<S: UrlStore + ?Sized>(
    store: &mut S,
    param: Param,
    value: Option<&str>,
) -> Result<(), UrlStoreError> {
    current_sync().on_state_change(store, param, value)?;
    mark_seen(store);
    Ok(())
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(filter: Option<String>) {
    logging::configure_logging(filter.as_deref());
}

/// Replace the sync configuration with one parsed from YAML.
#[wasm_bindgen]
pub fn configure(yaml: &str) -> Result<(), JsError> {
    install_config(SyncConfig::from_yaml(yaml)?);
    Ok(())
}

/// Apply the URL's `code` and `canvas` parameters to the page.
///
/// Undecodable parameters are logged and skipped; only a missing `window`
/// is an error.
#[wasm_bindgen(js_name = loadState)]
pub fn load_state(editor: &Editor, canvas: &ValueElement) -> Result<(), JsError> {
    let mut store = LocationUrlStore::new()?;
    load_into(&mut store, &mut EditorSlot(editor), &mut ElementSlot(canvas));
    Ok(())
}

/// Reload state if the URL changed since the last load. Returns whether it did.
#[wasm_bindgen(js_name = pollState)]
pub fn poll_state(editor: &Editor, canvas: &ValueElement) -> Result<bool, JsError> {
    let mut store = LocationUrlStore::new()?;
    Ok(poll_into(
        &mut store,
        &mut EditorSlot(editor),
        &mut ElementSlot(canvas),
    ))
}

/// Set a raw query parameter, or remove it when `value` is null.
#[wasm_bindgen(js_name = updateQueryParam)]
pub fn update_query_param(key: &str, value: Option<String>) -> Result<(), JsError> {
    let mut store = LocationUrlStore::new()?;
    permalink_core::update_query_param(&mut store, key, value.as_deref())?;
    mark_seen(&store);
    Ok(())
}

#[wasm_bindgen(js_name = onCodeChange)]
pub fn on_code_change(text: Option<String>) -> Result<(), JsError> {
    let mut store = LocationUrlStore::new()?;
    record_change_in(&mut store, Param::Code, text.as_deref())?;
    Ok(())
}

#[wasm_bindgen(js_name = onCanvasChange)]
pub fn on_canvas_change(value: Option<String>) -> Result<(), JsError> {
    let mut store = LocationUrlStore::new()?;
    record_change_in(&mut store, Param::Canvas, value.as_deref())?;
    Ok(())
}

/// Encode text into a URL-safe token using the configured compression level.
#[wasm_bindgen]
pub fn pack(text: &str) -> String {
    current_sync().packer().pack(text)
}

/// Decode a token produced by `pack`. Throws when it doesn't decode.
#[wasm_bindgen]
pub fn unpack(token: &str) -> Result<String, JsError> {
    Ok(current_sync().packer().unpack(token)?)
}
