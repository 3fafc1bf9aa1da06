//! Path pattern compilation.
//!
//! A route template such as `/books/:id/stuff/*` is compiled once, at
//! registration time, into an ordered list of [`Segment`]s. The compiled
//! [`PathPattern`] knows how to match a concrete request path and how to rank
//! itself against other patterns that match the same path.

use std::cmp::Ordering;

use crate::params::Captures;

/// Template that matches every request path.
///
/// Used for filters registered without an explicit path.
pub const ALL_PATHS: &str = "+/*paths";

/// One token of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal text that must equal the request segment exactly (case-sensitive).
    Literal(String),
    /// Named parameter (`:name`). The name is stored lower-cased, without the colon.
    Param(String),
    /// Wildcard (`*`).
    Splat,
}

impl Segment {
    /// Parses a single non-empty template segment.
    fn parse(raw: &str) -> Self {
        if raw == "*" {
            Self::Splat
        } else if let Some(name) = raw.strip_prefix(':') {
            Self::Param(name.to_lowercase())
        } else {
            Self::Literal(raw.to_string())
        }
    }

    /// Precedence of this segment kind: literal > param > splat.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Literal(_) => 2,
            Self::Param(_) => 1,
            Self::Splat => 0,
        }
    }

    /// Returns true for [`Segment::Splat`].
    #[must_use]
    pub const fn is_splat(&self) -> bool {
        matches!(self, Self::Splat)
    }
}

/// Splits a path into its non-empty segments.
///
/// Leading, trailing and repeated slashes are ignored, so `/a//b/` and `a/b`
/// produce the same segments.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A compiled route template.
///
/// # Example
///
/// ```rust
/// use switchyard_router::PathPattern;
///
/// let pattern = PathPattern::compile("/paramandwild/:param/stuff/*");
/// let captures = pattern.matches("/paramandwild/thedude/stuff/andits").unwrap();
///
/// assert_eq!(captures.params.get(":param"), Some("thedude"));
/// assert_eq!(captures.splat, vec!["andits".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
    all_paths: bool,
}

impl PathPattern {
    /// Compiles a template. Never fails: every string is a valid pattern.
    #[must_use]
    pub fn compile(template: impl Into<String>) -> Self {
        let template = template.into();
        if template == ALL_PATHS {
            return Self::all_paths();
        }
        let segments = split_path(&template).map(Segment::parse).collect();
        Self {
            template,
            segments,
            all_paths: false,
        }
    }

    /// The pattern that matches every path.
    #[must_use]
    pub fn all_paths() -> Self {
        Self {
            template: ALL_PATHS.to_string(),
            segments: Vec::new(),
            all_paths: true,
        }
    }

    /// Returns the template this pattern was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if this is the [`ALL_PATHS`] pattern.
    #[must_use]
    pub fn matches_all(&self) -> bool {
        self.all_paths
    }

    fn has_trailing_splat(&self) -> bool {
        self.segments.last().is_some_and(Segment::is_splat)
    }

    /// Matches a concrete request path, extracting params and splats.
    ///
    /// A trailing `*` consumes one or more remaining segments joined with
    /// `/`. A `*` anywhere else stands for exactly one segment.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Captures> {
        if self.all_paths {
            return Some(Captures::default());
        }

        let request: Vec<&str> = split_path(path).collect();
        let fixed = self.segments.len();

        if self.has_trailing_splat() {
            if request.len() < fixed {
                return None;
            }
        } else if request.len() != fixed {
            return None;
        }

        let mut captures = Captures::default();
        for (index, segment) in self.segments.iter().enumerate() {
            let actual = request[index];
            match segment {
                Segment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    captures.params.push(format!(":{name}"), actual);
                }
                Segment::Splat if index + 1 == fixed => {
                    captures.splat.push(request[index..].join("/"));
                }
                Segment::Splat => {
                    captures.splat.push(actual.to_string());
                }
            }
        }

        Some(captures)
    }

    /// Orders two patterns by specificity.
    ///
    /// Segment kinds are compared left to right (literal > param > splat) and
    /// the first difference decides. When one pattern is a prefix of the
    /// other, the longer one is more specific. `Greater` means `self` is
    /// preferred.
    #[must_use]
    pub fn specificity_cmp(&self, other: &Self) -> Ordering {
        let ours = self.segments.iter().map(Segment::rank);
        let theirs = other.segments.iter().map(Segment::rank);
        ours.cmp(theirs)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_segments() {
        let pattern = PathPattern::compile("/books/:ID/stuff/*");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("books".to_string()),
                Segment::Param("id".to_string()),
                Segment::Literal("stuff".to_string()),
                Segment::Splat,
            ]
        );
        assert_eq!(pattern.template(), "/books/:ID/stuff/*");
    }

    #[test]
    fn test_compile_tolerates_slashes() {
        let a = PathPattern::compile("/users/");
        let b = PathPattern::compile("users");
        let c = PathPattern::compile("//users//");
        assert_eq!(a.segments(), b.segments());
        assert_eq!(b.segments(), c.segments());
    }

    #[test]
    fn test_root_and_empty_templates() {
        for template in ["", "/"] {
            let pattern = PathPattern::compile(template);
            assert!(pattern.segments().is_empty());
            assert!(pattern.matches("/").is_some());
            assert!(pattern.matches("").is_some());
            assert!(pattern.matches("/a").is_none());
        }
    }

    #[test]
    fn test_all_paths() {
        let pattern = PathPattern::compile(ALL_PATHS);
        assert!(pattern.matches_all());
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/deep/nested/path").is_some());
    }

    #[test]
    fn test_literal_case_sensitive() {
        let lower = PathPattern::compile("/tworoutes/param/:param");
        let upper = PathPattern::compile("/tworoutes/PARAM/:param");

        assert!(lower.matches("/tworoutes/param/x").is_some());
        assert!(lower.matches("/tworoutes/PARAM/x").is_none());
        assert!(upper.matches("/tworoutes/PARAM/x").is_some());
        assert!(upper.matches("/tworoutes/param/x").is_none());
    }

    #[test]
    fn test_param_value_keeps_case() {
        let pattern = PathPattern::compile("/hello/:Name");
        let captures = pattern.matches("/hello/TheDude").unwrap();
        assert_eq!(captures.params.get(":name"), Some("TheDude"));
    }

    #[test]
    fn test_trailing_splat_needs_one_segment() {
        let pattern = PathPattern::compile("/files/*");
        assert!(pattern.matches("/files").is_none());

        let captures = pattern.matches("/files/a/b/c.txt").unwrap();
        assert_eq!(captures.splat, vec!["a/b/c.txt".to_string()]);
    }

    #[test]
    fn test_inner_splat_matches_single_segment() {
        let pattern = PathPattern::compile("/say/*/to/*");
        let captures = pattern.matches("/say/hello/to/the/world").unwrap();
        assert_eq!(
            captures.splat,
            vec!["hello".to_string(), "the/world".to_string()]
        );
        assert!(pattern.matches("/say/hello/there/to/you").is_none());
    }

    #[test]
    fn test_length_mismatch() {
        let pattern = PathPattern::compile("/users/:id");
        assert!(pattern.matches("/users").is_none());
        assert!(pattern.matches("/users/1/extra").is_none());
    }

    #[test]
    fn test_specificity_first_difference_wins() {
        let literal = PathPattern::compile("/a/b/:c");
        let param = PathPattern::compile("/a/:b/c");
        let splat = PathPattern::compile("/a/*");

        assert_eq!(literal.specificity_cmp(&param), Ordering::Greater);
        assert_eq!(param.specificity_cmp(&literal), Ordering::Less);
        assert_eq!(param.specificity_cmp(&splat), Ordering::Greater);
        assert_eq!(literal.specificity_cmp(&literal.clone()), Ordering::Equal);
    }
}
