//! Parsing and serializing the search component of a URL.

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
#[error("malformed query string: {0}")]
pub struct QueryError(#[from] serde_urlencoded::de::Error);

/// Ordered `name=value` pairs of a URL search component.
///
/// Order and unrecognized parameters survive a parse/serialize cycle, so
/// rewriting one parameter leaves the rest of the URL alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a form-urlencoded search string. A leading `?` is optional.
    pub fn parse(search: &str) -> Result<Self, QueryError> {
        let search = search.strip_prefix('?').unwrap_or(search);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(search)?;
        Ok(Self { pairs })
    }

    /// Like [`QueryString::parse`], but an unparseable search yields an empty query.
    pub fn parse_or_empty(search: &str) -> Self {
        Self::parse(search).unwrap_or_else(|e| {
            warn!("Ignoring query string {search:?}: {e}");
            Self::default()
        })
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `value`. The first existing occurrence keeps its
    /// position; any further occurrences are dropped.
    pub fn set(&mut self, name: &str, value: &str) {
        let mut found = false;
        self.pairs.retain_mut(|(key, existing)| {
            if key != name {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            *existing = value.to_string();
            true
        });
        if !found {
            self.pairs.push((name.to_string(), value.to_string()));
        }
    }

    /// Remove every occurrence of `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(key, _)| key != name);
        self.pairs.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as a search component: `""` when empty, `?a=b&c=d` otherwise.
    pub fn to_search(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let encoded =
            serde_urlencoded::to_string(&self.pairs).expect("string pairs always serialize");
        format!("?{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_question_mark() {
        let a = QueryString::parse("?code=abc&canvas=def").unwrap();
        let b = QueryString::parse("code=abc&canvas=def").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get("code"), Some("abc"));
        assert_eq!(a.get("canvas"), Some("def"));
    }

    #[test]
    fn empty_search_is_empty_query() {
        assert!(QueryString::parse("").unwrap().is_empty());
        assert!(QueryString::parse("?").unwrap().is_empty());
        assert_eq!(QueryString::new().to_search(), "");
    }

    #[test]
    fn percent_and_plus_decoding() {
        let q = QueryString::parse("?name=a%20b+c&sym=%26%3D").unwrap();
        assert_eq!(q.get("name"), Some("a b c"));
        assert_eq!(q.get("sym"), Some("&="));
    }

    #[test]
    fn get_returns_first_occurrence() {
        let q = QueryString::parse("?a=1&a=2").unwrap();
        assert_eq!(q.get("a"), Some("1"));
    }

    #[test]
    fn set_replaces_in_place_and_drops_duplicates() {
        let mut q = QueryString::parse("?a=1&b=2&a=3").unwrap();
        q.set("a", "x");
        assert_eq!(q.to_search(), "?a=x&b=2");
    }

    #[test]
    fn set_appends_new_parameter() {
        let mut q = QueryString::parse("?theme=dark").unwrap();
        q.set("code", "abc");
        assert_eq!(q.to_search(), "?theme=dark&code=abc");
    }

    #[test]
    fn remove_deletes_all_occurrences() {
        let mut q = QueryString::parse("?a=1&b=2&a=3").unwrap();
        assert!(q.remove("a"));
        assert!(!q.remove("a"));
        assert_eq!(q.to_search(), "?b=2");
    }

    #[test]
    fn removing_last_parameter_clears_search() {
        let mut q = QueryString::parse("?code=abc").unwrap();
        q.remove("code");
        assert_eq!(q.to_search(), "");
    }

    #[test]
    fn serializes_with_escaping() {
        let mut q = QueryString::new();
        q.set("text", "a b&c");
        assert_eq!(q.to_search(), "?text=a+b%26c");
    }

    #[test]
    fn tokens_serialize_verbatim() {
        let mut q = QueryString::new();
        q.set("code", "AbC-_09");
        assert_eq!(q.to_search(), "?code=AbC-_09");
    }

    #[test]
    fn unknown_parameters_survive_roundtrip() {
        let search = "?last_update=1700000000&code=abc&lang=rs";
        assert_eq!(QueryString::parse(search).unwrap().to_search(), search);
    }
}
