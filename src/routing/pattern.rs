//! Route Patterns
//!
//! Path templates compiled to anchored, case-insensitive regular expressions.
//!
//! Supported syntax:
//! - literal segments: `/upload`
//! - named parameters: `/resume/:id`
//! - optional parameters: `/resume/:id?`
//! - trailing wildcard: `/files/*` (captured as `wild`)

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

use super::error::{PatternError, PatternResult};

/// Name under which a trailing `*` is captured
pub const WILDCARD_PARAM: &str = "wild";

/// A single parsed segment of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, optional: bool },
    Wildcard,
}

/// Compiled route pattern
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
    regex: Regex,
}

impl RoutePattern {
    /// Parse and compile a pattern
    pub fn parse(source: &str) -> PatternResult<Self> {
        let rest = source
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(source.to_string()))?;

        let (rest, trailing_slash) = match rest.strip_suffix('/') {
            Some(trimmed) => (trimmed, true),
            None => (rest, false),
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            let raw: Vec<&str> = rest.split('/').collect();
            let last = raw.len() - 1;

            for (i, seg) in raw.iter().enumerate() {
                if seg.is_empty() {
                    return Err(PatternError::EmptySegment(source.to_string()));
                }

                if *seg == "*" {
                    if i != last || trailing_slash {
                        return Err(PatternError::MisplacedWildcard(source.to_string()));
                    }
                    segments.push(Segment::Wildcard);
                } else if let Some(param) = seg.strip_prefix(':') {
                    let (name, optional) = match param.strip_suffix('?') {
                        Some(name) => (name, true),
                        None => (param, false),
                    };
                    if !is_identifier(name) || name == WILDCARD_PARAM {
                        return Err(PatternError::InvalidParamName {
                            pattern: source.to_string(),
                            name: name.to_string(),
                        });
                    }
                    let duplicate = segments.iter().any(|s| {
                        matches!(s, Segment::Param { name: existing, .. } if existing == name)
                    });
                    if duplicate {
                        return Err(PatternError::DuplicateParam {
                            pattern: source.to_string(),
                            name: name.to_string(),
                        });
                    }
                    segments.push(Segment::Param {
                        name: name.to_string(),
                        optional,
                    });
                } else if seg.contains('*') {
                    return Err(PatternError::MisplacedWildcard(source.to_string()));
                } else {
                    segments.push(Segment::Literal(seg.to_string()));
                }
            }
        }

        let regex = compile(source, &segments, trailing_slash)?;

        Ok(Self {
            source: source.to_string(),
            segments,
            trailing_slash,
            regex,
        })
    }

    /// Original pattern text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern has no parameters or wildcard
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Names of the captured parameters, in declaration order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param { name, .. } => Some(name.as_str()),
                Segment::Wildcard => Some(WILDCARD_PARAM),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Shape of the pattern with parameter names erased.
    ///
    /// Two patterns with the same canonical form match exactly the same paths.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Literal(lit) => out.push_str(&lit.to_lowercase()),
                Segment::Param { optional: false, .. } => out.push(':'),
                Segment::Param { optional: true, .. } => out.push_str(":?"),
                Segment::Wildcard => out.push('*'),
            }
        }
        self.close(out)
    }

    /// Canonical shapes of every path form the pattern accepts, with each
    /// optional parameter expanded to present and absent.
    ///
    /// Two patterns sharing any form both match some path.
    pub fn canonical_forms(&self) -> Vec<String> {
        let mut forms = vec![String::new()];
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => {
                    let lit = lit.to_lowercase();
                    for form in &mut forms {
                        form.push('/');
                        form.push_str(&lit);
                    }
                }
                Segment::Param { optional: false, .. } => {
                    forms.iter_mut().for_each(|form| form.push_str("/:"));
                }
                Segment::Param { optional: true, .. } => {
                    let present: Vec<String> = forms.iter().map(|f| format!("{}/:", f)).collect();
                    forms.extend(present);
                }
                Segment::Wildcard => {
                    forms.iter_mut().for_each(|form| form.push_str("/*"));
                }
            }
        }

        let mut forms: Vec<String> = forms.into_iter().map(|f| self.close(f)).collect();
        forms.sort();
        forms.dedup();
        forms
    }

    fn close(&self, mut shape: String) -> String {
        if self.trailing_slash || shape.is_empty() {
            shape.push('/');
        }
        shape
    }

    /// Match a pathname, returning captured parameters on success
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let captures = self.regex.captures(path)?;

        let mut params = RouteParams::default();
        for name in self.param_names() {
            if let Some(value) = captures.name(name) {
                params.insert(name, decode(value.as_str()));
            }
        }
        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RoutePattern {}

/// Parameters captured by a successful match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, name: &str, value: String) {
        self.0.insert(name.to_string(), value);
    }
}

fn compile(source: &str, segments: &[Segment], trailing_slash: bool) -> PatternResult<Regex> {
    let mut body = String::from("(?i)^");

    for segment in segments {
        match segment {
            Segment::Literal(lit) => {
                body.push('/');
                body.push_str(&regex::escape(lit));
            }
            Segment::Param { name, optional: false } => {
                body.push_str(&format!("/(?P<{}>[^/]+)", name));
            }
            Segment::Param { name, optional: true } => {
                body.push_str(&format!("(?:/(?P<{}>[^/]+))?", name));
            }
            Segment::Wildcard => {
                body.push_str(&format!("/(?P<{}>.*)", WILDCARD_PARAM));
            }
        }
    }

    if trailing_slash || segments.is_empty() {
        body.push('/');
    }
    body.push('$');

    Regex::new(&body).map_err(|e| PatternError::Compile {
        pattern: source.to_string(),
        error: e.to_string(),
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_matches_only_root() {
        let pattern = RoutePattern::parse("/").unwrap();
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/resume").is_none());
        assert!(pattern.matches("").is_none());
    }

    #[test]
    fn test_literal_is_strict_about_trailing_slash() {
        let pattern = RoutePattern::parse("/resume").unwrap();
        assert!(pattern.matches("/resume").is_some());
        assert!(pattern.matches("/resume/").is_none());
        assert!(pattern.matches("/resumes").is_none());
    }

    #[test]
    fn test_literal_is_case_insensitive() {
        let pattern = RoutePattern::parse("/sign-in").unwrap();
        assert!(pattern.matches("/Sign-In").is_some());
    }

    #[test]
    fn test_literal_dots_are_escaped() {
        let pattern = RoutePattern::parse("/robots.txt").unwrap();
        assert!(pattern.matches("/robots.txt").is_some());
        assert!(pattern.matches("/robotsXtxt").is_none());
    }

    #[test]
    fn test_named_params_are_captured_and_decoded() {
        let pattern = RoutePattern::parse("/resume/:id/section/:name").unwrap();
        let params = pattern.matches("/resume/42/section/work%20history").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("name"), Some("work history"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_optional_param() {
        let pattern = RoutePattern::parse("/resume/:id?").unwrap();
        assert!(pattern.matches("/resume").unwrap().get("id").is_none());
        assert_eq!(pattern.matches("/resume/7").unwrap().get("id"), Some("7"));
        assert!(pattern.matches("/resume/7/8").is_none());
    }

    #[test]
    fn test_wildcard_captures_rest() {
        let pattern = RoutePattern::parse("/files/*").unwrap();
        let params = pattern.matches("/files/a/b/c.pdf").unwrap();
        assert_eq!(params.get(WILDCARD_PARAM), Some("a/b/c.pdf"));
        assert!(pattern.matches("/files").is_none());
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            RoutePattern::parse("resume"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/a//b"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/*/tail"),
            Err(PatternError::MisplacedWildcard(_))
        ));
        assert!(matches!(
            RoutePattern::parse("/:1st"),
            Err(PatternError::InvalidParamName { .. })
        ));
        assert!(matches!(
            RoutePattern::parse("/:id/:id"),
            Err(PatternError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn test_canonical_erases_param_names() {
        let a = RoutePattern::parse("/users/:id").unwrap();
        let b = RoutePattern::parse("/Users/:uid").unwrap();
        assert_eq!(a.canonical(), b.canonical());
        assert_ne!(
            RoutePattern::parse("/a").unwrap().canonical(),
            RoutePattern::parse("/a/").unwrap().canonical()
        );
        assert_eq!(RoutePattern::parse("/").unwrap().canonical(), "/");
    }

    #[test]
    fn test_canonical_forms_expand_optional_params() {
        let pattern = RoutePattern::parse("/resume/:id?").unwrap();
        assert_eq!(pattern.canonical_forms(), vec!["/resume", "/resume/:"]);

        let pattern = RoutePattern::parse("/:lang?").unwrap();
        assert_eq!(pattern.canonical_forms(), vec!["/", "/:"]);

        let pattern = RoutePattern::parse("/a/:x?/:y?").unwrap();
        assert_eq!(pattern.canonical_forms(), vec!["/a", "/a/:", "/a/:/:"]);

        let pattern = RoutePattern::parse("/Upload").unwrap();
        assert_eq!(pattern.canonical_forms(), vec![pattern.canonical()]);
    }
}
