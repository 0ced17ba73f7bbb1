//! Media type registry.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not one of the registered media types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content type: {0}")]
pub struct ContentTypeError(pub String);

/// Common media type constants.
///
/// The wire values are stable; they are what ends up in `Content-Type`
/// headers and what response assertions look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// `application/xml`
    ApplicationXml,
    /// `application/atom+xml`
    ApplicationAtomXml,
    /// `application/xhtml+xml`
    ApplicationXhtmlXml,
    /// `application/svg+xml`
    ApplicationSvgXml,
    /// `application/json`
    #[default]
    ApplicationJson,
    /// `application/x-www-form-urlencoded`
    ApplicationFormUrlencoded,
    /// `multipart/form-data`
    MultipartFormData,
    /// `application/octet-stream`
    ApplicationOctetStream,
    /// `text/plain`
    TextPlain,
    /// `text/xml`
    TextXml,
    /// `text/html`
    TextHtml,
    /// `video/mpeg4`
    VideoMp4,
}

impl ContentType {
    /// Every registered media type, in declaration order.
    pub const ALL: [ContentType; 12] = [
        Self::ApplicationXml,
        Self::ApplicationAtomXml,
        Self::ApplicationXhtmlXml,
        Self::ApplicationSvgXml,
        Self::ApplicationJson,
        Self::ApplicationFormUrlencoded,
        Self::MultipartFormData,
        Self::ApplicationOctetStream,
        Self::TextPlain,
        Self::TextXml,
        Self::TextHtml,
        Self::VideoMp4,
    ];

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationXml => "application/xml",
            Self::ApplicationAtomXml => "application/atom+xml",
            Self::ApplicationXhtmlXml => "application/xhtml+xml",
            Self::ApplicationSvgXml => "application/svg+xml",
            Self::ApplicationJson => "application/json",
            Self::ApplicationFormUrlencoded => "application/x-www-form-urlencoded",
            Self::MultipartFormData => "multipart/form-data",
            Self::ApplicationOctetStream => "application/octet-stream",
            Self::TextPlain => "text/plain",
            Self::TextXml => "text/xml",
            Self::TextHtml => "text/html",
            Self::VideoMp4 => "video/mpeg4",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|ct| ct.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ContentTypeError(s.to_string()))
    }
}

impl AsRef<str> for ContentType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<ContentType> for String {
    fn from(ct: ContentType) -> Self {
        ct.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(ContentType::ApplicationJson.as_str(), "application/json");
        assert_eq!(
            ContentType::ApplicationFormUrlencoded.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(ContentType::VideoMp4.as_str(), "video/mpeg4");
        assert_eq!(ContentType::TextHtml.to_string(), "text/html");
    }

    #[test]
    fn test_default_is_json() {
        assert_eq!(ContentType::default(), ContentType::ApplicationJson);
    }

    #[test]
    fn test_parse_round_trips_every_variant() {
        for ct in ContentType::ALL {
            assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), ct);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Application/JSON".parse::<ContentType>().unwrap(),
            ContentType::ApplicationJson
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "application/yaml".parse::<ContentType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown content type: application/yaml");
    }
}
