//! Content-Security-Policy compiler.
//!
//! The directive list is merged and normalized once, when the handler is
//! built. Each request then only resolves dynamic sources, validates the
//! resolved values and joins everything into the header string:
//!
//! ```text
//! default-src 'self';img-src 'self' data:;upgrade-insecure-requests
//! ```

mod directives;

pub use directives::{
    DirectiveSource, DirectiveValue, Directives, ValueValidation, default_directives,
};

use actix_web::{
    HttpRequest,
    http::header::{HeaderName, HeaderValue},
};
use serde::Deserialize;

use crate::config::Capability;
use crate::error::HelmetError;
use crate::headers::{HeaderAction, SecurityHeader};
use crate::utils::dasherize;

const HEADER: &str = Capability::ContentSecurityPolicy.header_name();

/// Options for the Content-Security-Policy header
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ContentSecurityPolicyOptions {
    /// Start from [`default_directives`] and merge `directives` into them
    pub use_defaults: bool,
    pub directives: Directives,
    /// Send `Content-Security-Policy-Report-Only` instead
    pub report_only: bool,
    pub validation: ValueValidation,
}

impl Default for ContentSecurityPolicyOptions {
    fn default() -> Self {
        Self {
            use_defaults: true,
            directives: Directives::new(),
            report_only: false,
            validation: ValueValidation::default(),
        }
    }
}

impl ContentSecurityPolicyOptions {
    pub fn directive(mut self, name: impl Into<String>, value: impl Into<DirectiveValue>) -> Self {
        self.directives.insert(name, value);
        self
    }
}

#[derive(Debug, Clone)]
enum CompiledValue {
    NoArgument,
    Sources(Vec<DirectiveSource>),
}

#[derive(Debug, Clone)]
struct CompiledDirective {
    /// Normalized, lowercase-hyphenated name written to the header
    name: String,
    /// Name as configured, used in error messages
    configured_name: String,
    value: CompiledValue,
}

/// Content-Security-Policy handler.
#[derive(Debug, Clone)]
pub struct ContentSecurityPolicy {
    header: HeaderName,
    directives: Vec<CompiledDirective>,
    validation: ValueValidation,
}

impl ContentSecurityPolicy {
    pub fn new(options: ContentSecurityPolicyOptions) -> Result<Self, HelmetError> {
        let mut compiled: Vec<CompiledDirective> = Vec::new();

        let defaults = if options.use_defaults {
            default_directives()
        } else {
            Directives::new()
        };

        for (configured_name, value) in defaults.into_iter().chain(options.directives) {
            let name = dasherize(&configured_name);
            if !is_valid_directive_name(&name) {
                return Err(HelmetError::InvalidDirectiveName {
                    header: HEADER,
                    name: configured_name,
                });
            }

            let position = compiled.iter().position(|directive| directive.name == name);
            let value = match value {
                DirectiveValue::Disabled => {
                    if let Some(position) = position {
                        compiled.remove(position);
                    }
                    continue;
                }
                DirectiveValue::NoArgument => CompiledValue::NoArgument,
                DirectiveValue::Sources(sources) if sources.is_empty() => CompiledValue::NoArgument,
                DirectiveValue::Sources(sources) => CompiledValue::Sources(sources),
            };

            match position {
                Some(position) => {
                    let directive = &mut compiled[position];
                    directive.configured_name = configured_name;
                    directive.value = value;
                }
                None => compiled.push(CompiledDirective {
                    name,
                    configured_name,
                    value,
                }),
            }
        }

        let header = if options.report_only {
            HeaderName::from_static("content-security-policy-report-only")
        } else {
            HeaderName::from_static("content-security-policy")
        };

        Ok(Self {
            header,
            directives: compiled,
            validation: options.validation,
        })
    }

    /// A policy without directives never sends a header.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header
    }

    /// Normalized directive names, in header order.
    pub fn directive_names(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().map(|directive| directive.name.as_str())
    }

    /// Serializes the policy for one request. Returns `Ok(None)` when the
    /// policy has no directives.
    pub fn render(&self, req: &HttpRequest) -> Result<Option<HeaderValue>, HelmetError> {
        let mut clauses = Vec::with_capacity(self.directives.len());

        for directive in &self.directives {
            let sources = match &directive.value {
                CompiledValue::NoArgument => {
                    clauses.push(directive.name.clone());
                    continue;
                }
                CompiledValue::Sources(sources) => sources,
            };

            let mut clause = directive.name.clone();
            for source in sources {
                let value = source.resolve(req).map_err(|source| HelmetError::DirectiveSource {
                    header: HEADER,
                    directive: directive.configured_name.clone(),
                    source,
                })?;
                if !self.validation.accepts(&value) {
                    return Err(self.invalid_value(directive));
                }
                clause.push(' ');
                clause.push_str(&value);
            }
            clauses.push(clause);
        }

        let Some(last) = self.directives.last() else {
            return Ok(None);
        };

        HeaderValue::try_from(clauses.join(";"))
            .map(Some)
            .map_err(|_| self.invalid_value(last))
    }

    fn invalid_value(&self, directive: &CompiledDirective) -> HelmetError {
        HelmetError::InvalidDirectiveValue {
            header: HEADER,
            directive: directive.configured_name.clone(),
        }
    }
}

impl SecurityHeader for ContentSecurityPolicy {
    fn capability(&self) -> Capability {
        Capability::ContentSecurityPolicy
    }

    fn apply(&self, req: &HttpRequest) -> Result<Option<HeaderAction>, HelmetError> {
        Ok(self
            .render(req)?
            .map(|value| HeaderAction::Set(self.header.clone(), value)))
    }
}

pub fn content_security_policy(
    options: ContentSecurityPolicyOptions,
) -> Result<ContentSecurityPolicy, HelmetError> {
    ContentSecurityPolicy::new(options)
}

/// Lowercase alphanumeric words joined by single hyphens.
fn is_valid_directive_name(name: &str) -> bool {
    name.split('-').all(|word| {
        !word.is_empty()
            && word
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    })
}
