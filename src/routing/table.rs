//! Route Table and Router
//!
//! An ordered list of (pattern, view) entries with one catch-all fallback.
//! Non-fallback entries are tried top to bottom and the first match wins;
//! the fallback only applies when none of them match, wherever it was
//! declared.

use std::collections::HashMap;

use super::error::{PatternResult, RouteConfigError};
use super::location::Location;
use super::pattern::{RoutePattern, RouteParams};

/// One entry of the route table
#[derive(Debug, Clone)]
pub struct RouteEntry<V> {
    /// `None` for the fallback entry
    pub pattern: Option<RoutePattern>,
    pub view: V,
}

impl<V> RouteEntry<V> {
    pub fn is_fallback(&self) -> bool {
        self.pattern.is_none()
    }
}

/// Result of resolving a path against the table
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a, V> {
    /// Selected view
    pub view: &'a V,
    /// Captured path parameters (empty for the fallback)
    pub params: RouteParams,
    /// Pattern that matched, `None` when the fallback was selected
    pub pattern: Option<&'a str>,
}

impl<V> RouteMatch<'_, V> {
    pub fn is_fallback(&self) -> bool {
        self.pattern.is_none()
    }
}

/// Ordered route declarations
#[derive(Debug, Clone)]
pub struct RouteTable<V> {
    entries: Vec<RouteEntry<V>>,
}

impl<V> RouteTable<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declare a route; fails if the pattern does not parse
    pub fn route(mut self, pattern: &str, view: V) -> PatternResult<Self> {
        let pattern = RoutePattern::parse(pattern)?;
        self.entries.push(RouteEntry {
            pattern: Some(pattern),
            view,
        });
        Ok(self)
    }

    /// Declare the catch-all entry
    pub fn fallback(mut self, view: V) -> Self {
        self.entries.push(RouteEntry {
            pattern: None,
            view,
        });
        self
    }

    pub fn entries(&self) -> &[RouteEntry<V>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the table for configuration errors
    pub fn validate(&self) -> Result<(), RouteConfigError> {
        let fallbacks = self.entries.iter().filter(|e| e.is_fallback()).count();
        match fallbacks {
            0 => return Err(RouteConfigError::MissingFallback),
            1 => {}
            n => return Err(RouteConfigError::MultipleFallbacks(n)),
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        for pattern in self.entries.iter().filter_map(|e| e.pattern.as_ref()) {
            for form in pattern.canonical_forms() {
                if let Some(first) = seen.insert(form, pattern.as_str()) {
                    return Err(RouteConfigError::AmbiguousRoute {
                        first: first.to_string(),
                        second: pattern.as_str().to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Resolve a pathname.
    ///
    /// Returns `None` only when nothing matches and the table has no fallback.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_, V>> {
        self.match_declared(path).or_else(|| self.fallback_match())
    }

    fn match_declared(&self, path: &str) -> Option<RouteMatch<'_, V>> {
        self.entries.iter().find_map(|entry| {
            let pattern = entry.pattern.as_ref()?;
            pattern.matches(path).map(|params| RouteMatch {
                view: &entry.view,
                params,
                pattern: Some(pattern.as_str()),
            })
        })
    }

    fn fallback_match(&self) -> Option<RouteMatch<'_, V>> {
        self.entries
            .iter()
            .find(|e| e.is_fallback())
            .map(|entry| RouteMatch {
                view: &entry.view,
                params: RouteParams::default(),
                pattern: None,
            })
    }
}

impl<V> Default for RouteTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated route table bound to an optional base path.
///
/// Selection is total: every location resolves to exactly one view.
#[derive(Debug, Clone)]
pub struct Router<V> {
    table: RouteTable<V>,
    fallback: usize,
    base: String,
}

impl<V> Router<V> {
    /// Build a router, rejecting misconfigured tables
    pub fn new(table: RouteTable<V>) -> Result<Self, RouteConfigError> {
        table.validate()?;
        let fallback = table
            .entries
            .iter()
            .position(|e| e.is_fallback())
            .ok_or(RouteConfigError::MissingFallback)?;

        Ok(Self {
            table,
            fallback,
            base: String::new(),
        })
    }

    /// Serve routes beneath `base` (e.g. `/app`)
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn table(&self) -> &RouteTable<V> {
        &self.table
    }

    /// Select the view for a location
    pub fn select(&self, location: &Location) -> RouteMatch<'_, V> {
        let selected = location
            .relative_to(&self.base)
            .and_then(|path| self.table.match_declared(&path));

        match selected {
            Some(m) => {
                tracing::debug!(path = %location.pathname, pattern = ?m.pattern, "route matched");
                m
            }
            None => {
                tracing::debug!(path = %location.pathname, "no route matched, using fallback");
                RouteMatch {
                    view: &self.table.entries[self.fallback].view,
                    params: RouteParams::default(),
                    pattern: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        A,
        B,
        Item,
        Missing,
    }

    fn table() -> RouteTable<View> {
        RouteTable::new()
            .route("/", View::A)
            .unwrap()
            .route("/b", View::B)
            .unwrap()
            .route("/items/:id", View::Item)
            .unwrap()
            .fallback(View::Missing)
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::new()
            .route("/items/new", View::A)
            .unwrap()
            .route("/items/:id", View::Item)
            .unwrap()
            .fallback(View::Missing);

        let m = table.resolve("/items/new").unwrap();
        assert_eq!(*m.view, View::A);
        assert!(m.params.is_empty());

        let m = table.resolve("/items/9").unwrap();
        assert_eq!(*m.view, View::Item);
        assert_eq!(m.params.get("id"), Some("9"));
    }

    #[test]
    fn test_fallback_declared_first_does_not_shadow() {
        let table = RouteTable::new()
            .fallback(View::Missing)
            .route("/", View::A)
            .unwrap()
            .route("/b", View::B)
            .unwrap();

        assert_eq!(*table.resolve("/").unwrap().view, View::A);
        assert_eq!(*table.resolve("/b").unwrap().view, View::B);
        assert!(table.resolve("/c").unwrap().is_fallback());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_no_fallback_yields_none() {
        let table = RouteTable::new().route("/", View::A).unwrap();
        assert!(table.resolve("/nowhere").is_none());
        assert_eq!(table.validate(), Err(RouteConfigError::MissingFallback));
        assert!(Router::new(table).is_err());
    }

    #[test]
    fn test_validate_rejects_extra_fallbacks_and_ambiguity() {
        let two = table().fallback(View::Missing);
        assert_eq!(two.validate(), Err(RouteConfigError::MultipleFallbacks(2)));

        let ambiguous = table().route("/items/:other", View::B).unwrap();
        assert_eq!(
            ambiguous.validate(),
            Err(RouteConfigError::AmbiguousRoute {
                first: "/items/:id".to_string(),
                second: "/items/:other".to_string(),
            })
        );

        let optional = RouteTable::new()
            .route("/b", View::B)
            .unwrap()
            .route("/b/:id?", View::Item)
            .unwrap()
            .fallback(View::Missing);
        assert_eq!(
            optional.validate(),
            Err(RouteConfigError::AmbiguousRoute {
                first: "/b".to_string(),
                second: "/b/:id?".to_string(),
            })
        );

        let optional_root = table().route("/:lang?", View::B).unwrap();
        assert!(matches!(
            optional_root.validate(),
            Err(RouteConfigError::AmbiguousRoute { .. })
        ));

        // Overlap between a literal and a param stays allowed
        let overlap = table().route("/items/new", View::B).unwrap();
        assert!(overlap.validate().is_ok());

        let case = table().route("/B", View::A).unwrap();
        assert!(matches!(
            case.validate(),
            Err(RouteConfigError::AmbiguousRoute { .. })
        ));
    }

    #[test]
    fn test_router_select_is_total() {
        let router = Router::new(table()).unwrap();
        assert_eq!(*router.select(&Location::parse("/b?x=1")).view, View::B);
        assert_eq!(*router.select(&Location::parse("/b/")).view, View::Missing);
        assert_eq!(*router.select(&Location::parse("/zzz")).view, View::Missing);
    }

    #[test]
    fn test_router_with_base() {
        let router = Router::new(table()).unwrap().with_base("/portal/");
        assert_eq!(router.base(), "/portal");
        assert_eq!(*router.select(&Location::parse("/portal")).view, View::A);
        assert_eq!(*router.select(&Location::parse("/portal/b")).view, View::B);
        assert_eq!(*router.select(&Location::parse("/b")).view, View::Missing);
    }
}
