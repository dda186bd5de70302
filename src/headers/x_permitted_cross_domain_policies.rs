//! X-Permitted-Cross-Domain-Policies handler.

use actix_web::http::header::HeaderValue;
use serde::Deserialize;

use crate::config::Capability;
use crate::error::HelmetError;
use crate::headers::StaticHeader;

const ALLOWED_POLICIES: [&str; 4] = ["none", "master-only", "by-content-type", "all"];

/// Options for the X-Permitted-Cross-Domain-Policies header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PermittedCrossDomainPoliciesOptions {
    pub permitted_policies: String,
}

impl Default for PermittedCrossDomainPoliciesOptions {
    fn default() -> Self {
        Self {
            permitted_policies: "none".to_string(),
        }
    }
}

pub fn x_permitted_cross_domain_policies(
    options: PermittedCrossDomainPoliciesOptions,
) -> Result<StaticHeader, HelmetError> {
    let capability = Capability::XPermittedCrossDomainPolicies;

    let Some(policy) = ALLOWED_POLICIES
        .into_iter()
        .find(|policy| *policy == options.permitted_policies)
    else {
        return Err(HelmetError::invalid_option(
            capability.header_name(),
            format!("does not support \"{}\"", options.permitted_policies),
        ));
    };

    Ok(StaticHeader::set(
        capability,
        "x-permitted-cross-domain-policies",
        HeaderValue::from_static(policy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_allowed_policy_is_accepted() {
        for policy in ALLOWED_POLICIES {
            let options = PermittedCrossDomainPoliciesOptions {
                permitted_policies: policy.to_string(),
            };
            assert!(x_permitted_cross_domain_policies(options).is_ok());
        }
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let options = PermittedCrossDomainPoliciesOptions {
            permitted_policies: "some".to_string(),
        };
        assert_eq!(
            x_permitted_cross_domain_policies(options)
                .unwrap_err()
                .to_string(),
            "X-Permitted-Cross-Domain-Policies does not support \"some\""
        );
    }
}
