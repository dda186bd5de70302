//! Directive values as supplied by configuration.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use serde::de::{Deserialize, Deserializer, Error as _, MapAccess, Visitor};
use serde_json::Value;

use crate::config::Capability;
use crate::error::{BoxError, HelmetError};
use crate::middleware::CspNonce;

/// Per-request source resolver. Responses do not exist yet when policies are
/// rendered, so per-request state is shared through request extensions, as
/// [`DirectiveSource::nonce`] does with [`CspNonce`].
type SourceFn = dyn Fn(&HttpRequest) -> Result<String, BoxError> + Send + Sync;

/// One element of a directive's value list.
#[derive(Clone)]
pub enum DirectiveSource {
    Literal(String),
    /// Re-evaluated for every response; never cached.
    Dynamic(Arc<SourceFn>),
}

impl DirectiveSource {
    /// Value computed from the request each time the policy is rendered.
    /// Middleware registered ahead of helmet can leave data for it in the
    /// request extensions.
    pub fn dynamic<F>(source: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        DirectiveSource::Dynamic(Arc::new(source))
    }

    /// `'nonce-<value>'` for the [`CspNonce`] stored on the request by
    /// [`crate::CspNonceMiddleware`].
    pub fn nonce() -> Self {
        DirectiveSource::dynamic(|req| {
            req.extensions()
                .get::<CspNonce>()
                .map(|nonce| format!("'nonce-{nonce}'"))
                .ok_or_else(|| "no CSP nonce was generated for this request".into())
        })
    }

    pub(crate) fn resolve(&self, req: &HttpRequest) -> Result<Cow<'_, str>, BoxError> {
        match self {
            DirectiveSource::Literal(value) => Ok(Cow::Borrowed(value.as_str())),
            DirectiveSource::Dynamic(source) => source(req).map(Cow::Owned),
        }
    }
}

impl fmt::Debug for DirectiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveSource::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DirectiveSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for DirectiveSource {
    fn from(value: &str) -> Self {
        DirectiveSource::Literal(value.to_string())
    }
}

impl From<String> for DirectiveSource {
    fn from(value: String) -> Self {
        DirectiveSource::Literal(value)
    }
}

/// Value of one directive.
#[derive(Debug, Clone)]
pub enum DirectiveValue {
    /// Values emitted after the directive name, space-separated. An empty list
    /// is treated as [`DirectiveValue::NoArgument`].
    Sources(Vec<DirectiveSource>),
    /// Only the directive name is emitted, e.g. `upgrade-insecure-requests`.
    NoArgument,
    /// Drops the directive, including one inherited from the defaults.
    Disabled,
}

impl From<&str> for DirectiveValue {
    fn from(value: &str) -> Self {
        DirectiveValue::Sources(vec![value.into()])
    }
}

impl From<String> for DirectiveValue {
    fn from(value: String) -> Self {
        DirectiveValue::Sources(vec![value.into()])
    }
}

impl From<Vec<&str>> for DirectiveValue {
    fn from(values: Vec<&str>) -> Self {
        DirectiveValue::Sources(values.into_iter().map(DirectiveSource::from).collect())
    }
}

impl From<Vec<DirectiveSource>> for DirectiveValue {
    fn from(sources: Vec<DirectiveSource>) -> Self {
        DirectiveValue::Sources(sources)
    }
}

impl From<DirectiveSource> for DirectiveValue {
    fn from(source: DirectiveSource) -> Self {
        DirectiveValue::Sources(vec![source])
    }
}

impl DirectiveValue {
    /// Converts a JSON value: a string, a list of strings, `[]`/`true` for
    /// a bare directive, or `false` to drop it.
    fn from_json(name: &str, value: Value) -> Result<Self, HelmetError> {
        let invalid = || HelmetError::InvalidDirectiveValue {
            header: Capability::ContentSecurityPolicy.header_name(),
            directive: name.to_string(),
        };

        match value {
            Value::Bool(false) => Ok(DirectiveValue::Disabled),
            Value::Bool(true) => Ok(DirectiveValue::NoArgument),
            Value::String(value) => Ok(value.into()),
            Value::Array(values) if values.is_empty() => Ok(DirectiveValue::NoArgument),
            Value::Array(values) => values
                .into_iter()
                .map(|value| match value {
                    Value::String(value) => Ok(DirectiveSource::Literal(value)),
                    _ => Err(invalid()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DirectiveValue::Sources),
            _ => Err(invalid()),
        }
    }
}

/// Ordered list of directives exactly as configured: names are kept as
/// written and duplicates are only resolved when the policy is compiled.
#[derive(Debug, Clone, Default)]
pub struct Directives(Vec<(String, DirectiveValue)>);

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directive, camelCase or hyphenated.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<DirectiveValue>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<DirectiveValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectiveValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for Directives {
    type Item = (String, DirectiveValue);
    type IntoIter = std::vec::IntoIter<(String, DirectiveValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de> Deserialize<'de> for Directives {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DirectivesVisitor;

        impl<'de> Visitor<'de> for DirectivesVisitor {
            type Value = Directives;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a mapping of directive names to values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut directives = Directives::new();
                while let Some(name) = map.next_key::<String>()? {
                    let value = map.next_value::<Value>()?;
                    let value = DirectiveValue::from_json(&name, value).map_err(A::Error::custom)?;
                    directives.insert(name, value);
                }
                Ok(directives)
            }
        }

        deserializer.deserialize_map(DirectivesVisitor)
    }
}

/// The built-in policy, in canonical order.
pub fn default_directives() -> Directives {
    Directives::new()
        .with("default-src", vec!["'self'"])
        .with("base-uri", vec!["'self'"])
        .with("block-all-mixed-content", DirectiveValue::NoArgument)
        .with("font-src", vec!["'self'", "https:", "data:"])
        .with("frame-ancestors", vec!["'self'"])
        .with("img-src", vec!["'self'", "data:"])
        .with("object-src", vec!["'none'"])
        .with("script-src", vec!["'self'"])
        .with("script-src-attr", vec!["'none'"])
        .with("style-src", vec!["'self'", "https:", "'unsafe-inline'"])
        .with("upgrade-insecure-requests", DirectiveValue::NoArgument)
}

/// How strictly resolved directive values are checked.
///
/// Empty values and control characters are rejected at every level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueValidation {
    /// Rejects the directive separator `;` and the list separator `,`.
    /// Whitespace is allowed only as single spaces between tokens.
    #[default]
    Standard,
    /// Additionally rejects whitespace and anything outside visible ASCII, so
    /// each value must be a single source expression.
    Strict,
}

impl ValueValidation {
    pub fn accepts(self, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }
        if value.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return false;
        }
        match self {
            ValueValidation::Standard => {
                !value.contains([';', ','])
                    && value
                        .split(' ')
                        .all(|token| !token.is_empty() && !token.contains(char::is_whitespace))
            }
            ValueValidation::Strict => value
                .bytes()
                .all(|b| b.is_ascii_graphic() && b != b';' && b != b','),
        }
    }
}
