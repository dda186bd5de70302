//! Referrer-Policy handler.

use serde::{Deserialize, Deserializer};

use crate::config::Capability;
use crate::error::HelmetError;
use crate::headers::{StaticHeader, header_value};

const ALLOWED_TOKENS: [&str; 8] = [
    "no-referrer",
    "no-referrer-when-downgrade",
    "same-origin",
    "origin",
    "strict-origin",
    "origin-when-cross-origin",
    "strict-origin-when-cross-origin",
    "unsafe-url",
];

/// Options for the Referrer-Policy header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferrerPolicyOptions {
    /// One token or a fallback list of tokens, sent comma-separated
    #[serde(deserialize_with = "one_or_many")]
    pub policy: Vec<String>,
}

impl Default for ReferrerPolicyOptions {
    fn default() -> Self {
        Self {
            policy: vec!["no-referrer".to_string()],
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(token) => vec![token],
        OneOrMany::Many(tokens) => tokens,
    })
}

pub fn referrer_policy(options: ReferrerPolicyOptions) -> Result<StaticHeader, HelmetError> {
    let capability = Capability::ReferrerPolicy;
    let header = capability.header_name();

    if options.policy.is_empty() {
        return Err(HelmetError::invalid_option(header, "received no policy tokens"));
    }

    let mut seen: Vec<&str> = Vec::with_capacity(options.policy.len());
    for token in &options.policy {
        if !ALLOWED_TOKENS.contains(&token.as_str()) {
            return Err(HelmetError::invalid_option(
                header,
                format!("received an unexpected policy token \"{token}\""),
            ));
        }
        if seen.contains(&token.as_str()) {
            return Err(HelmetError::invalid_option(
                header,
                format!("received a duplicate policy token \"{token}\""),
            ));
        }
        seen.push(token);
    }

    let value = header_value(capability, seen.join(","), || {
        "received an invalid policy".to_string()
    })?;
    Ok(StaticHeader::set(capability, "referrer-policy", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderAction;

    fn rendered(policy: &[&str]) -> Result<String, HelmetError> {
        let options = ReferrerPolicyOptions {
            policy: policy.iter().map(|token| token.to_string()).collect(),
        };
        Ok(match referrer_policy(options)?.action() {
            HeaderAction::Set(_, value) => value.to_str().unwrap().to_string(),
            other => panic!("unexpected action {other:?}"),
        })
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(rendered(&["no-referrer"]).unwrap(), "no-referrer");
    }

    #[test]
    fn test_fallback_list() {
        assert_eq!(
            rendered(&["origin", "unsafe-url"]).unwrap(),
            "origin,unsafe-url"
        );
    }

    #[test]
    fn test_string_or_list_deserialization() {
        let one: ReferrerPolicyOptions = serde_json::from_str(r#"{"policy": "origin"}"#).unwrap();
        assert_eq!(one.policy, vec!["origin"]);

        let many: ReferrerPolicyOptions =
            serde_json::from_str(r#"{"policy": ["origin", "same-origin"]}"#).unwrap();
        assert_eq!(many.policy, vec!["origin", "same-origin"]);
    }

    #[test]
    fn test_invalid_policies() {
        assert_eq!(
            rendered(&[]).unwrap_err().to_string(),
            "Referrer-Policy received no policy tokens"
        );
        assert_eq!(
            rendered(&["origin", "origin"]).unwrap_err().to_string(),
            "Referrer-Policy received a duplicate policy token \"origin\""
        );
        assert_eq!(
            rendered(&["foo"]).unwrap_err().to_string(),
            "Referrer-Policy received an unexpected policy token \"foo\""
        );
    }
}
