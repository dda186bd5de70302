//! Expect-CT handler.

use serde::Deserialize;

use crate::config::Capability;
use crate::error::HelmetError;
use crate::headers::{StaticHeader, header_value};

/// Options for the Expect-CT header
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ExpectCtOptions {
    pub max_age: u64,
    pub enforce: bool,
    pub report_uri: Option<String>,
}

pub fn expect_ct(options: ExpectCtOptions) -> Result<StaticHeader, HelmetError> {
    let capability = Capability::ExpectCt;

    let mut parts = vec![format!("max-age={}", options.max_age)];
    if options.enforce {
        parts.push("enforce".to_string());
    }
    if let Some(report_uri) = &options.report_uri {
        if report_uri.contains('"') {
            return Err(HelmetError::invalid_option(
                capability.header_name(),
                format!("received an invalid report-uri \"{report_uri}\""),
            ));
        }
        parts.push(format!("report-uri=\"{report_uri}\""));
    }

    let value = header_value(capability, parts.join(", "), || {
        format!(
            "received an invalid report-uri \"{}\"",
            options.report_uri.as_deref().unwrap_or_default()
        )
    })?;
    Ok(StaticHeader::set(capability, "expect-ct", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderAction;

    fn rendered(options: ExpectCtOptions) -> String {
        match expect_ct(options).unwrap().action() {
            HeaderAction::Set(_, value) => value.to_str().unwrap().to_string(),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_default_value() {
        assert_eq!(rendered(ExpectCtOptions::default()), "max-age=0");
    }

    #[test]
    fn test_enforce_and_report_uri() {
        let options = ExpectCtOptions {
            max_age: 86400,
            enforce: true,
            report_uri: Some("https://example.com/report".to_string()),
        };
        assert_eq!(
            rendered(options),
            "max-age=86400, enforce, report-uri=\"https://example.com/report\""
        );
    }

    #[test]
    fn test_report_uri_with_quote_is_rejected() {
        let options = ExpectCtOptions {
            report_uri: Some("https://example.com/\"".to_string()),
            ..Default::default()
        };
        assert!(expect_ct(options).is_err());
    }
}
