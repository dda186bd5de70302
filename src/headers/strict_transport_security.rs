//! Strict-Transport-Security handler.

use serde::Deserialize;

use crate::config::Capability;
use crate::error::HelmetError;
use crate::headers::{StaticHeader, header_value};

const DEFAULT_MAX_AGE: u64 = 180 * 24 * 60 * 60;

/// Options for the Strict-Transport-Security header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StrictTransportSecurityOptions {
    /// Seconds browsers should remember to only use HTTPS
    pub max_age: u64,
    pub include_sub_domains: bool,
    pub preload: bool,
    /// Common misspelling of `includeSubDomains`, rejected with a hint
    #[serde(rename = "includeSubdomains")]
    #[doc(hidden)]
    pub include_subdomains: Option<bool>,
}

impl Default for StrictTransportSecurityOptions {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            include_sub_domains: true,
            preload: false,
            include_subdomains: None,
        }
    }
}

pub fn strict_transport_security(
    options: StrictTransportSecurityOptions,
) -> Result<StaticHeader, HelmetError> {
    let capability = Capability::StrictTransportSecurity;

    if options.include_subdomains.is_some() {
        return Err(HelmetError::invalid_option(
            capability.header_name(),
            "should use `includeSubDomains` instead of `includeSubdomains`. (The correct one has an uppercase \"D\".)",
        ));
    }

    let mut value = format!("max-age={}", options.max_age);
    if options.include_sub_domains {
        value.push_str("; includeSubDomains");
    }
    if options.preload {
        value.push_str("; preload");
    }

    let value = header_value(capability, value, || "received an invalid value".to_string())?;
    Ok(StaticHeader::set(capability, "strict-transport-security", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderAction;

    fn rendered(options: StrictTransportSecurityOptions) -> String {
        match strict_transport_security(options).unwrap().action() {
            HeaderAction::Set(_, value) => value.to_str().unwrap().to_string(),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_default_value() {
        assert_eq!(
            rendered(StrictTransportSecurityOptions::default()),
            "max-age=15552000; includeSubDomains"
        );
    }

    #[test]
    fn test_all_flags() {
        let options = StrictTransportSecurityOptions {
            max_age: 31536000,
            include_sub_domains: false,
            preload: true,
            ..Default::default()
        };
        assert_eq!(rendered(options), "max-age=31536000; preload");
    }

    #[test]
    fn test_misspelled_include_subdomains_is_rejected() {
        let options: StrictTransportSecurityOptions =
            serde_json::from_str(r#"{"includeSubdomains": true}"#).unwrap();
        let err = strict_transport_security(options).unwrap_err();
        assert!(err.to_string().starts_with(
            "Strict-Transport-Security should use `includeSubDomains` instead of `includeSubdomains`."
        ));
    }
}
