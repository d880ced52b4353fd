//! Upstream path templates.
//!
//! # Responsibilities
//! - Parse `{name}` placeholders out of a path template
//! - Compile a template into an anchored matcher
//! - Extract placeholder values from a matching request path
//!
//! # Design Decisions
//! - A placeholder matches exactly one path segment
//! - Literal text is regex-escaped, so templates cannot inject patterns
//! - Case-insensitive unless the route asks otherwise
//! - A single trailing slash on the request path is tolerated

use std::fmt;

use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Matches one path segment.
const SEGMENT_PATTERN: &str = "([^/]+)";

/// Errors found while parsing a path template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("template must start with '/'")]
    MissingLeadingSlash,

    #[error("unbalanced brace at position {0}")]
    UnbalancedBrace(usize),

    #[error("empty or malformed placeholder at position {0}")]
    InvalidPlaceholder(usize),

    #[error("placeholder '{{{0}}}' appears more than once")]
    DuplicatePlaceholder(String),

    #[error("template does not compile: {0}")]
    Regex(String),
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal text and placeholders.
pub fn parse_template(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    if template.is_empty() {
        return Err(TemplateError::Empty);
    }
    if !template.starts_with('/') {
        return Err(TemplateError::MissingLeadingSlash);
    }

    let mut segments = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut literal_start = 0;
    let mut open: Option<usize> = None;

    for (i, c) in template.char_indices() {
        match (c, open) {
            ('{', None) => {
                if i > literal_start {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                open = Some(i);
            }
            ('{', Some(_)) => return Err(TemplateError::UnbalancedBrace(i)),
            ('}', None) => return Err(TemplateError::UnbalancedBrace(i)),
            ('}', Some(start)) => {
                let name = &template[start + 1..i];
                if name.is_empty() {
                    return Err(TemplateError::InvalidPlaceholder(start));
                }
                if names.contains(&name) {
                    return Err(TemplateError::DuplicatePlaceholder(name.to_string()));
                }
                names.push(name);
                segments.push(Segment::Placeholder(name));
                open = None;
                literal_start = i + 1;
            }
            ('/', Some(start)) => return Err(TemplateError::InvalidPlaceholder(start)),
            _ => {}
        }
    }

    if let Some(start) = open {
        return Err(TemplateError::UnbalancedBrace(start));
    }
    if literal_start < template.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }

    Ok(segments)
}

/// Placeholder names of a template, in order of appearance.
pub fn placeholder_names(template: &str) -> Result<Vec<String>, TemplateError> {
    Ok(parse_template(template)?
        .into_iter()
        .filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.to_string()),
            Segment::Literal(_) => None,
        })
        .collect())
}

/// A placeholder value captured from a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    pub name: String,
    pub value: String,
}

/// Compiled matcher for an upstream path template.
#[derive(Debug, Clone)]
pub struct UpstreamPathPattern {
    template: String,
    regex: Regex,
    param_names: Vec<String>,
    case_sensitive: bool,
}

impl UpstreamPathPattern {
    /// Compile a template.
    pub fn compile(template: &str, case_sensitive: bool) -> Result<Self, TemplateError> {
        let segments = parse_template(template)?;

        let mut pattern = String::with_capacity(template.len() * 2);
        if !case_sensitive {
            pattern.push_str("(?i)");
        }
        pattern.push('^');

        let mut param_names = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Placeholder(name) => {
                    param_names.push(name.to_string());
                    pattern.push_str(SEGMENT_PATTERN);
                }
            }
        }

        if !template.ends_with('/') {
            pattern.push_str("/?");
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| TemplateError::Regex(e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
            case_sensitive,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The compiled regular expression.
    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns true if the request path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match the path and extract placeholder values.
    pub fn captures(&self, path: &str) -> Option<Vec<PathParam>> {
        let captures = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    captures.get(i + 1).map(|value| PathParam {
                        name: name.clone(),
                        value: value.as_str().to_string(),
                    })
                })
                .collect(),
        )
    }
}

// The regex is derived from (template, case_sensitive), so those two decide equality.
impl PartialEq for UpstreamPathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template && self.case_sensitive == other.case_sensitive
    }
}

impl Eq for UpstreamPathPattern {}

impl fmt::Display for UpstreamPathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

impl Serialize for UpstreamPathPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("UpstreamPathPattern", 3)?;
        state.serialize_field("template", &self.template)?;
        state.serialize_field("pattern", self.regex.as_str())?;
        state.serialize_field("case_sensitive", &self.case_sensitive)?;
        state.end()
    }
}
