use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// A typed value, or the raw JSON when it does not parse as `T`.
///
/// Article dumps are not curated; a relative link or a date without a time is
/// still worth handing to the generator as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Parsed(T),
    Raw(Value),
}

impl<T> Lenient<T> {
    #[must_use]
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Lenient::Parsed(value) => Some(value),
            Lenient::Raw(_) => None,
        }
    }
}

/// A news article the quiz is generated from.
///
/// Every field is optional. `content` and `text` are accepted for the body,
/// and fields not named here are kept in `extra` so the prompt carries the
/// whole article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "content", alias = "text", skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Lenient<Url>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Lenient<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Lenient<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Publication time, when the article carries a full RFC 3339 timestamp.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_ref().and_then(Lenient::parsed).copied()
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source
            .as_ref()
            .and_then(Lenient::parsed)
            .map(String::as_str)
    }
}
