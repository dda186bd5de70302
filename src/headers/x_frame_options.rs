//! X-Frame-Options handler.

use actix_web::http::header::HeaderValue;
use serde::Deserialize;

use crate::config::Capability;
use crate::error::HelmetError;
use crate::headers::StaticHeader;

/// Options for the X-Frame-Options header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameOptions {
    /// `deny` or `sameorigin`, case-insensitive
    pub action: String,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            action: "sameorigin".to_string(),
        }
    }
}

pub fn x_frame_options(options: FrameOptions) -> Result<StaticHeader, HelmetError> {
    let capability = Capability::XFrameOptions;

    let value = match options.action.to_ascii_lowercase().as_str() {
        "deny" => "DENY",
        "sameorigin" | "same-origin" => "SAMEORIGIN",
        "allow-from" => {
            return Err(HelmetError::invalid_option(
                capability.header_name(),
                "no longer supports `ALLOW-FROM` due to poor browser support.",
            ));
        }
        _ => {
            return Err(HelmetError::invalid_option(
                capability.header_name(),
                format!("received an invalid action \"{}\"", options.action),
            ));
        }
    };

    Ok(StaticHeader::set(
        capability,
        "x-frame-options",
        HeaderValue::from_static(value),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderAction;

    fn action(action: &str) -> Result<StaticHeader, HelmetError> {
        x_frame_options(FrameOptions {
            action: action.to_string(),
        })
    }

    #[test]
    fn test_actions_are_case_insensitive() {
        for (input, expected) in [
            ("deny", "DENY"),
            ("DENY", "DENY"),
            ("sameorigin", "SAMEORIGIN"),
            ("Same-Origin", "SAMEORIGIN"),
        ] {
            let handler = action(input).unwrap();
            assert!(matches!(handler.action(), HeaderAction::Set(_, value) if value == expected));
        }
    }

    #[test]
    fn test_allow_from_is_rejected() {
        assert_eq!(
            action("ALLOW-FROM").unwrap_err().to_string(),
            "X-Frame-Options no longer supports `ALLOW-FROM` due to poor browser support."
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert_eq!(
            action("nope").unwrap_err().to_string(),
            "X-Frame-Options received an invalid action \"nope\""
        );
    }
}
