use permalink_core::{UrlStore, UrlStoreError};
use tracing::warn;
use wasm_bindgen::JsValue;

/// [`UrlStore`] backed by `window.location` and `history.replaceState`.
pub struct LocationUrlStore {
    window: web_sys::Window,
}

impl LocationUrlStore {
    pub fn new() -> Result<Self, UrlStoreError> {
        let window = web_sys::window()
            .ok_or_else(|| UrlStoreError::Unavailable("no global window".to_string()))?;
        Ok(Self { window })
    }
}

impl UrlStore for LocationUrlStore {
    fn search(&self) -> String {
        self.window.location().search().unwrap_or_else(|e| {
            warn!("Failed to read location.search: {}", describe(&e));
            String::new()
        })
    }

    fn replace_search(&mut self, search: &str) -> Result<(), UrlStoreError> {
        let location = self.window.location();
        let path = location
            .pathname()
            .map_err(|e| UrlStoreError::Unavailable(describe(&e)))?;
        let hash = location
            .hash()
            .map_err(|e| UrlStoreError::Unavailable(describe(&e)))?;

        let history = self
            .window
            .history()
            .map_err(|e| UrlStoreError::Unavailable(describe(&e)))?;
        history
            .replace_state_with_url(&JsValue::NULL, "", Some(&relative_url(&path, search, &hash)))
            .map_err(|e| UrlStoreError::Rejected(describe(&e)))
    }
}

/// Same-document URL with a new search component; path and fragment are kept.
fn relative_url(path: &str, search: &str, hash: &str) -> String {
    let search = search.strip_prefix('?').unwrap_or(search);
    if search.is_empty() {
        format!("{path}{hash}")
    } else {
        format!("{path}?{search}{hash}")
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_path_and_fragment() {
        assert_eq!(
            relative_url("/editor/", "?code=abc", "#top"),
            "/editor/?code=abc#top"
        );
    }

    #[test]
    fn adds_missing_question_mark() {
        assert_eq!(relative_url("/", "code=abc", ""), "/?code=abc");
    }

    #[test]
    fn empty_search_drops_question_mark() {
        assert_eq!(relative_url("/editor", "", "#x"), "/editor#x");
        assert_eq!(relative_url("/editor", "?", ""), "/editor");
    }
}
