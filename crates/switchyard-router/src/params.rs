//! Path parameter and splat storage.
//!
//! Parameters are kept in a small vector to avoid heap allocation for the
//! common case of a handful of parameters per route.

use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Extracted path parameters from a route match.
///
/// Names are stored as `":" + lowercase name`. Lookups accept the name with or
/// without the leading colon, in any case.
///
/// # Example
///
/// ```rust
/// use switchyard_router::Params;
///
/// let mut params = Params::new();
/// params.push(":id", "101");
///
/// assert_eq!(params.get(":id"), Some("101"));
/// assert_eq!(params.get("ID"), Some("101"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

/// Normalizes a parameter name for storage and lookup.
fn normalize(name: &str) -> String {
    let lowered = name.to_lowercase();
    if lowered.starts_with(':') {
        lowered
    } else {
        format!(":{lowered}")
    }
}

impl Params {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter to the set.
    pub fn push(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.inner.push((normalize(name.as_ref()), value.into()));
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = normalize(name);
        self.inner
            .iter()
            .find(|(n, _)| *n == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over `(name, value)` pairs in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

/// Everything a successful pattern match extracts from a path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Captures {
    /// Named parameters.
    pub params: Params,
    /// Splat captures, in pattern order.
    pub splat: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_params_lookup_is_case_insensitive() {
        let mut params = Params::new();
        params.push(":Name", "TheDude");

        assert_eq!(params.get(":name"), Some("TheDude"));
        assert_eq!(params.get("NAME"), Some("TheDude"));
        assert_eq!(params.get("name"), Some("TheDude"));
    }

    #[test]
    fn test_params_iter_keeps_order() {
        let mut params = Params::new();
        params.push("a", "1");
        params.push("b", "2");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![(":a", "1"), (":b", "2")]);
    }

    #[test]
    fn test_params_from_iterator() {
        let pairs = vec![
            ("a".to_string(), "1".to_string()),
            (":B".to_string(), "2".to_string()),
        ];

        let params: Params = pairs.into_iter().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("2"));
    }

    #[test]
    fn test_params_many_params() {
        let mut params = Params::new();
        for i in 0..10 {
            params.push(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get("key5"), Some("value5"));
    }
}
