//! Paths into a JSON document.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::PathParseError;

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// Location of a value inside a JSON document.
///
/// Rendered and parsed in the notation used by diff reports:
/// `root`, `root['user']`, `root['items'][2]['name']`. Keys containing a quote
/// or backslash are escaped with a backslash.
///
/// ```
/// use assay_diff::JsonPath;
/// use serde_json::json;
///
/// let path: JsonPath = "root['items'][1]".parse().unwrap();
/// let doc = json!({"items": ["a", "b"]});
/// assert_eq!(path.resolve(&doc), Some(&json!("b")));
/// assert_eq!(path.to_string(), "root['items'][1]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    /// The document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended by an object key.
    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.child(Segment::Key(key.into()))
    }

    /// Returns this path extended by an array index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(Segment::Index(index))
    }

    fn child(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// The segments from the root down.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true for the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if `prefix` is this path or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &JsonPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Looks the path up in `document`.
    #[must_use]
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |current, segment| match segment {
                Segment::Key(key) => current.as_object()?.get(key),
                Segment::Index(index) => current.as_array()?.get(*index),
            })
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for segment in &self.segments {
            match segment {
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) => {
                    f.write_str("['")?;
                    for c in key.chars() {
                        if c == '\'' || c == '\\' {
                            f.write_str("\\")?;
                        }
                        write!(f, "{c}")?;
                    }
                    f.write_str("']")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let rest = input
            .strip_prefix("root")
            .ok_or_else(|| PathParseError::new(input, "path must start with `root`"))?;

        let mut segments = Vec::new();
        let mut chars = rest.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '[' {
                return Err(PathParseError::new(input, format!("expected `[`, found `{c}`")));
            }

            match chars.peek().copied() {
                Some(quote @ ('\'' | '"')) => {
                    chars.next();
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('\\') => match chars.next() {
                                Some(escaped) => key.push(escaped),
                                None => return Err(PathParseError::new(input, "dangling escape")),
                            },
                            Some(ch) if ch == quote => break,
                            Some(ch) => key.push(ch),
                            None => return Err(PathParseError::new(input, "unterminated key")),
                        }
                    }
                    if chars.next() != Some(']') {
                        return Err(PathParseError::new(input, "expected `]` after key"));
                    }
                    segments.push(Segment::Key(key));
                }
                Some(_) => {
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(ch) => digits.push(ch),
                            None => return Err(PathParseError::new(input, "unterminated index")),
                        }
                    }
                    let index = digits.trim().parse::<usize>().map_err(|_| {
                        PathParseError::new(input, format!("invalid array index `{digits}`"))
                    })?;
                    segments.push(Segment::Index(index));
                }
                None => return Err(PathParseError::new(input, "unterminated segment")),
            }
        }

        Ok(Self { segments })
    }
}

impl TryFrom<&str> for JsonPath {
    type Error = PathParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
