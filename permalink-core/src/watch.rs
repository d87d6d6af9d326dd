use crate::store::UrlStore;
use crate::sync::{LoadReport, StateSlot, StateSync};

/// Re-runs [`StateSync::load`] whenever the URL's search component changes.
///
/// Meant to be polled from a render or event loop, so that back/forward
/// navigation and links opened in the same tab are picked up without a reload.
#[derive(Debug, Default)]
pub struct QueryWatcher {
    last_search: Option<String>,
}

impl QueryWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load state if the search differs from the last one seen.
    ///
    /// The first poll always loads. Returns `None` when nothing changed.
    pub fn poll<S: UrlStore + ?Sized>(
        &mut self,
        sync: &StateSync,
        store: &mut S,
        code: &mut impl StateSlot,
        canvas: &mut impl StateSlot,
    ) -> Option<LoadReport> {
        let search = store.search();
        if self.last_search.as_deref() == Some(search.as_str()) {
            return None;
        }

        let report = sync.load(store, code, canvas);
        // Loading may have rewritten the URL
        self.last_search = Some(store.search());
        Some(report)
    }

    /// Treat the store's current search as already loaded.
    ///
    /// Call after writing state into the URL to skip the redundant reload.
    pub fn mark_seen<S: UrlStore + ?Sized>(&mut self, store: &S) {
        self.last_search = Some(store.search());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::pack;
    use crate::store::MemoryUrlStore;
    use crate::sync::{Param, ParamOutcome};

    #[test]
    fn first_poll_loads() {
        let sync = StateSync::default();
        let mut store = MemoryUrlStore::new(format!("?code={}", pack("a")));
        let mut watcher = QueryWatcher::new();
        let (mut code, mut canvas) = (String::new(), String::new());

        let report = watcher.poll(&sync, &mut store, &mut code, &mut canvas);

        assert!(report.is_some());
        assert_eq!(code, "a");
    }

    #[test]
    fn unchanged_search_is_skipped() {
        let sync = StateSync::default();
        let mut store = MemoryUrlStore::new(format!("?code={}", pack("a")));
        let mut watcher = QueryWatcher::new();
        let (mut code, mut canvas) = (String::new(), String::new());

        watcher.poll(&sync, &mut store, &mut code, &mut canvas);
        code.clear();

        assert!(watcher
            .poll(&sync, &mut store, &mut code, &mut canvas)
            .is_none());
        assert_eq!(code, "");
    }

    #[test]
    fn changed_search_reloads() {
        let sync = StateSync::default();
        let mut store = MemoryUrlStore::new(format!("?code={}", pack("a")));
        let mut watcher = QueryWatcher::new();
        let (mut code, mut canvas) = (String::new(), String::new());

        watcher.poll(&sync, &mut store, &mut code, &mut canvas);
        store
            .replace_search(&format!("?code={}", pack("b")))
            .unwrap();

        let report = watcher
            .poll(&sync, &mut store, &mut code, &mut canvas)
            .unwrap();
        assert!(matches!(report.code, ParamOutcome::Applied));
        assert_eq!(code, "b");
    }

    #[test]
    fn mark_seen_suppresses_reload_after_own_write() {
        let sync = StateSync::default();
        let mut store = MemoryUrlStore::default();
        let mut watcher = QueryWatcher::new();
        let (mut code, mut canvas) = (String::new(), String::new());

        watcher.poll(&sync, &mut store, &mut code, &mut canvas);
        sync.on_state_change(&mut store, Param::Code, Some("typed"))
            .unwrap();
        watcher.mark_seen(&store);

        assert!(watcher
            .poll(&sync, &mut store, &mut code, &mut canvas)
            .is_none());
    }
}
