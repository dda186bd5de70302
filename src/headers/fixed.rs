//! Handlers with a single fixed value and no options, plus the aliases of
//! capabilities that have been withdrawn.

use std::convert::Infallible;

use actix_web::http::header::HeaderValue;

use crate::config::{Capability, RemovedCapability};
use crate::error::HelmetError;
use crate::headers::StaticHeader;

/// `Cross-Origin-Embedder-Policy: require-corp`
pub fn cross_origin_embedder_policy() -> StaticHeader {
    StaticHeader::set(
        Capability::CrossOriginEmbedderPolicy,
        "cross-origin-embedder-policy",
        HeaderValue::from_static("require-corp"),
    )
}

/// `Origin-Agent-Cluster: ?1`
pub fn origin_agent_cluster() -> StaticHeader {
    StaticHeader::set(
        Capability::OriginAgentCluster,
        "origin-agent-cluster",
        HeaderValue::from_static("?1"),
    )
}

/// `X-Content-Type-Options: nosniff`
pub fn x_content_type_options() -> StaticHeader {
    StaticHeader::set(
        Capability::XContentTypeOptions,
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    )
}

/// `X-Download-Options: noopen`
pub fn x_download_options() -> StaticHeader {
    StaticHeader::set(
        Capability::XDownloadOptions,
        "x-download-options",
        HeaderValue::from_static("noopen"),
    )
}

/// `X-XSS-Protection: 0`, switching the legacy XSS auditor off.
pub fn x_xss_protection() -> StaticHeader {
    StaticHeader::set(
        Capability::XXssProtection,
        "x-xss-protection",
        HeaderValue::from_static("0"),
    )
}

/// Removes `X-Powered-By` from the response.
pub fn x_powered_by() -> StaticHeader {
    StaticHeader::remove(Capability::XPoweredBy, "x-powered-by")
}

pub fn feature_policy() -> Result<Infallible, HelmetError> {
    Err(HelmetError::RemovedCapability(RemovedCapability::FeaturePolicy))
}

pub fn hpkp() -> Result<Infallible, HelmetError> {
    Err(HelmetError::RemovedCapability(RemovedCapability::PublicKeyPins))
}

pub fn no_cache() -> Result<Infallible, HelmetError> {
    Err(HelmetError::RemovedCapability(RemovedCapability::NoCache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{HeaderAction, SecurityHeader};
    use actix_web::test::TestRequest;

    #[test]
    fn test_fixed_values() {
        let req = TestRequest::default().to_http_request();
        let cases = [
            (cross_origin_embedder_policy(), "require-corp"),
            (origin_agent_cluster(), "?1"),
            (x_content_type_options(), "nosniff"),
            (x_download_options(), "noopen"),
            (x_xss_protection(), "0"),
        ];

        for (handler, expected) in cases {
            match handler.apply(&req).unwrap() {
                Some(HeaderAction::Set(_, value)) => assert_eq!(value, expected),
                other => panic!("unexpected action {other:?}"),
            }
        }
    }

    #[test]
    fn test_powered_by_is_removed() {
        assert!(matches!(x_powered_by().action(), HeaderAction::Remove(name) if name == "x-powered-by"));
    }

    #[test]
    fn test_removed_aliases_fail() {
        assert_eq!(
            feature_policy().unwrap_err().to_string(),
            "featurePolicy was removed because the Feature-Policy header is deprecated. If you still need this header, set it with actix-web's DefaultHeaders middleware."
        );
        assert!(hpkp().unwrap_err().to_string().contains("helmetjs/helmet/issues/180"));
        assert!(no_cache().unwrap_err().to_string().starts_with("noCache was removed."));
    }
}
