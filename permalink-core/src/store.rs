use thiserror::Error;

use crate::query::QueryString;

#[derive(Error, Debug)]
pub enum UrlStoreError {
    #[error("URL store unavailable: {0}")]
    Unavailable(String),
    #[error("URL rewrite rejected: {0}")]
    Rejected(String),
}

/// Where the current URL's search component lives.
///
/// Implementations own the location; callers never keep a copy of the query
/// between calls. `replace_search` swaps the current entry in place: no new
/// history entry, no reload.
pub trait UrlStore {
    /// Raw search component, with or without the leading `?`.
    fn search(&self) -> String;

    fn replace_search(&mut self, search: &str) -> Result<(), UrlStoreError>;

    fn read(&self) -> QueryString {
        QueryString::parse_or_empty(&self.search())
    }

    fn replace(&mut self, query: &QueryString) -> Result<(), UrlStoreError> {
        self.replace_search(&query.to_search())
    }
}

/// In-process URL store, for native hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryUrlStore {
    search: String,
    replacements: usize,
}

impl MemoryUrlStore {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replacements: 0,
        }
    }

    /// How many times the search component has been rewritten.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl UrlStore for MemoryUrlStore {
    fn search(&self) -> String {
        self.search.clone()
    }

    fn replace_search(&mut self, search: &str) -> Result<(), UrlStoreError> {
        self.search = search.to_string();
        self.replacements += 1;
        Ok(())
    }
}
