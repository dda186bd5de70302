//! Security header handlers.
//!
//! Every capability is a [`SecurityHeader`]: given the current request it
//! either produces one [`HeaderAction`] or fails. Most handlers compute their
//! header once at construction and return it unchanged; only the
//! Content-Security-Policy handler resolves anything per request.
//!
//! Each factory is also exported under its legacy option name
//! (`hsts`, `frameguard`, `no_sniff`, ...).

pub mod content_security_policy;
pub mod expect_ct;
pub mod fixed;
pub mod referrer_policy;
pub mod strict_transport_security;
pub mod x_dns_prefetch_control;
pub mod x_frame_options;
pub mod x_permitted_cross_domain_policies;

pub use content_security_policy::{
    ContentSecurityPolicy, ContentSecurityPolicyOptions, DirectiveSource, DirectiveValue,
    Directives, ValueValidation, content_security_policy, default_directives,
};
pub use expect_ct::{ExpectCtOptions, expect_ct};
pub use fixed::{
    cross_origin_embedder_policy, feature_policy, hpkp, no_cache, origin_agent_cluster,
    x_content_type_options, x_download_options, x_powered_by, x_xss_protection,
};
pub use referrer_policy::{ReferrerPolicyOptions, referrer_policy};
pub use strict_transport_security::{StrictTransportSecurityOptions, strict_transport_security};
pub use x_dns_prefetch_control::{DnsPrefetchControlOptions, x_dns_prefetch_control};
pub use x_frame_options::{FrameOptions, x_frame_options};
pub use x_permitted_cross_domain_policies::{
    PermittedCrossDomainPoliciesOptions, x_permitted_cross_domain_policies,
};

pub use fixed::x_content_type_options as no_sniff;
pub use fixed::x_download_options as ie_no_open;
pub use fixed::x_powered_by as hide_powered_by;
pub use fixed::x_xss_protection as xss_filter;
pub use strict_transport_security::strict_transport_security as hsts;
pub use x_dns_prefetch_control::x_dns_prefetch_control as dns_prefetch_control;
pub use x_frame_options::x_frame_options as frameguard;
pub use x_permitted_cross_domain_policies::x_permitted_cross_domain_policies as permitted_cross_domain_policies;

use actix_web::{
    HttpRequest,
    http::header::{HeaderMap, HeaderName, HeaderValue},
};

use crate::config::Capability;
use crate::error::HelmetError;

/// Change a handler makes to the outgoing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAction {
    Set(HeaderName, HeaderValue),
    Remove(HeaderName),
}

impl HeaderAction {
    /// Applies the action. `Set` never replaces a header the route already
    /// wrote; `Remove` always removes.
    pub fn write(&self, headers: &mut HeaderMap) {
        match self {
            HeaderAction::Set(name, value) => {
                if !headers.contains_key(name) {
                    headers.insert(name.clone(), value.clone());
                }
            }
            HeaderAction::Remove(name) => {
                headers.remove(name);
            }
        }
    }
}

/// A handler producing one security header.
pub trait SecurityHeader: Send + Sync {
    fn capability(&self) -> Capability;

    /// Resolve the header for `req`. `Ok(None)` leaves the response untouched.
    fn apply(&self, req: &HttpRequest) -> Result<Option<HeaderAction>, HelmetError>;
}

/// Handler whose action never depends on the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticHeader {
    capability: Capability,
    action: HeaderAction,
}

impl StaticHeader {
    pub(crate) fn set(capability: Capability, name: &'static str, value: HeaderValue) -> Self {
        Self {
            capability,
            action: HeaderAction::Set(HeaderName::from_static(name), value),
        }
    }

    pub(crate) fn remove(capability: Capability, name: &'static str) -> Self {
        Self {
            capability,
            action: HeaderAction::Remove(HeaderName::from_static(name)),
        }
    }

    pub fn action(&self) -> &HeaderAction {
        &self.action
    }
}

impl SecurityHeader for StaticHeader {
    fn capability(&self) -> Capability {
        self.capability
    }

    fn apply(&self, _req: &HttpRequest) -> Result<Option<HeaderAction>, HelmetError> {
        Ok(Some(self.action.clone()))
    }
}

/// Converts a computed header string, failing with `message` if it contains
/// characters a header cannot carry.
pub(crate) fn header_value(
    capability: Capability,
    value: String,
    message: impl FnOnce() -> String,
) -> Result<HeaderValue, HelmetError> {
    HeaderValue::try_from(value)
        .map_err(|_| HelmetError::invalid_option(capability.header_name(), message()))
}
