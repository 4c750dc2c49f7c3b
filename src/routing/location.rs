//! Location and in-memory history
//!
//! A [`Location`] is the navigable address the router reads. It only changes
//! through navigation, which outside the browser means [`MemoryHistory`].

use std::fmt;

/// Current navigable address split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Path component, always starting with `/`
    pub pathname: String,
    /// Query string including the leading `?`, or empty
    pub search: String,
    /// Fragment including the leading `#`, or empty
    pub hash: String,
}

impl Location {
    /// Parse an href (`/path?query#hash`, or an absolute URL)
    pub fn parse(href: &str) -> Self {
        let mut rest = href.trim();

        // Absolute URL: drop scheme and authority
        if let Some(after) = strip_origin(rest) {
            rest = match after.find(|c| c == '/' || c == '?' || c == '#') {
                Some(end) => &after[end..],
                None => "",
            };
        }

        let (before_hash, hash) = match rest.find('#') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let (path, search) = match before_hash.find('?') {
            Some(idx) => (&before_hash[..idx], &before_hash[idx..]),
            None => (before_hash, ""),
        };

        let pathname = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self {
            pathname,
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Location for the application root
    pub fn root() -> Self {
        Self::parse("/")
    }

    /// Pathname relative to `base`, or `None` if the location lies outside it.
    ///
    /// The comparison is case-insensitive, matching how patterns match.
    pub fn relative_to(&self, base: &str) -> Option<String> {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return Some(self.pathname.clone());
        }

        let head = self.pathname.get(..base.len())?;
        if !head.eq_ignore_ascii_case(base) {
            return None;
        }

        let tail = &self.pathname[base.len()..];
        if tail.is_empty() {
            Some("/".to_string())
        } else if tail.starts_with('/') {
            Some(tail.to_string())
        } else {
            // `/app` must not claim `/apple`
            None
        }
    }
}

/// Text after `scheme://` when `href` starts with a URL scheme.
///
/// A `://` inside the path, query or fragment does not count.
fn strip_origin(href: &str) -> Option<&str> {
    let (scheme, after) = href.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(after)
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Self {
        Self::parse(href)
    }
}

/// Session history kept in memory
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
}

impl MemoryHistory {
    /// Start a history at `initial`
    pub fn new(initial: impl Into<Location>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// The location currently shown
    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Navigate to a new entry, discarding any forward entries
    pub fn push(&mut self, to: impl Into<Location>) {
        let location = to.into();
        tracing::debug!(to = %location, "history push");
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    /// Replace the current entry
    pub fn replace(&mut self, to: impl Into<Location>) {
        let location = to.into();
        tracing::debug!(to = %location, "history replace");
        self.entries[self.index] = location;
    }

    /// Step back; returns false at the first entry
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward; returns false at the last entry
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Location::root())
    }
}
