//! Static table of the capabilities helmet manages.

use std::fmt;

use crate::error::HelmetError;

/// One security-header concern that can be toggled from [`crate::HelmetOptions`].
///
/// [`Capability::ALL`] lists every capability in the order its handler is
/// installed by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ContentSecurityPolicy,
    CrossOriginEmbedderPolicy,
    XDnsPrefetchControl,
    ExpectCt,
    XFrameOptions,
    XPoweredBy,
    StrictTransportSecurity,
    XDownloadOptions,
    XContentTypeOptions,
    OriginAgentCluster,
    XPermittedCrossDomainPolicies,
    ReferrerPolicy,
    XXssProtection,
}

impl Capability {
    pub const ALL: [Capability; 13] = [
        Capability::ContentSecurityPolicy,
        Capability::CrossOriginEmbedderPolicy,
        Capability::XDnsPrefetchControl,
        Capability::ExpectCt,
        Capability::XFrameOptions,
        Capability::XPoweredBy,
        Capability::StrictTransportSecurity,
        Capability::XDownloadOptions,
        Capability::XContentTypeOptions,
        Capability::OriginAgentCluster,
        Capability::XPermittedCrossDomainPolicies,
        Capability::ReferrerPolicy,
        Capability::XXssProtection,
    ];

    /// Name of the option key, as used in configuration mappings and diagnostics.
    pub const fn option_name(self) -> &'static str {
        match self {
            Capability::ContentSecurityPolicy => "contentSecurityPolicy",
            Capability::CrossOriginEmbedderPolicy => "crossOriginEmbedderPolicy",
            Capability::XDnsPrefetchControl => "dnsPrefetchControl",
            Capability::ExpectCt => "expectCt",
            Capability::XFrameOptions => "frameguard",
            Capability::XPoweredBy => "hidePoweredBy",
            Capability::StrictTransportSecurity => "hsts",
            Capability::XDownloadOptions => "ieNoOpen",
            Capability::XContentTypeOptions => "noSniff",
            Capability::OriginAgentCluster => "originAgentCluster",
            Capability::XPermittedCrossDomainPolicies => "permittedCrossDomainPolicies",
            Capability::ReferrerPolicy => "referrerPolicy",
            Capability::XXssProtection => "xssFilter",
        }
    }

    /// Header-style alias, accepted wherever [`Capability::option_name`] is.
    pub const fn alias(self) -> &'static str {
        match self {
            Capability::ContentSecurityPolicy => "contentSecurityPolicy",
            Capability::CrossOriginEmbedderPolicy => "crossOriginEmbedderPolicy",
            Capability::XDnsPrefetchControl => "xDnsPrefetchControl",
            Capability::ExpectCt => "expectCt",
            Capability::XFrameOptions => "xFrameOptions",
            Capability::XPoweredBy => "xPoweredBy",
            Capability::StrictTransportSecurity => "strictTransportSecurity",
            Capability::XDownloadOptions => "xDownloadOptions",
            Capability::XContentTypeOptions => "xContentTypeOptions",
            Capability::OriginAgentCluster => "originAgentCluster",
            Capability::XPermittedCrossDomainPolicies => "xPermittedCrossDomainPolicies",
            Capability::ReferrerPolicy => "referrerPolicy",
            Capability::XXssProtection => "xXssProtection",
        }
    }

    /// Display name of the header this capability writes (or removes).
    pub const fn header_name(self) -> &'static str {
        match self {
            Capability::ContentSecurityPolicy => "Content-Security-Policy",
            Capability::CrossOriginEmbedderPolicy => "Cross-Origin-Embedder-Policy",
            Capability::XDnsPrefetchControl => "X-DNS-Prefetch-Control",
            Capability::ExpectCt => "Expect-CT",
            Capability::XFrameOptions => "X-Frame-Options",
            Capability::XPoweredBy => "X-Powered-By",
            Capability::StrictTransportSecurity => "Strict-Transport-Security",
            Capability::XDownloadOptions => "X-Download-Options",
            Capability::XContentTypeOptions => "X-Content-Type-Options",
            Capability::OriginAgentCluster => "Origin-Agent-Cluster",
            Capability::XPermittedCrossDomainPolicies => "X-Permitted-Cross-Domain-Policies",
            Capability::ReferrerPolicy => "Referrer-Policy",
            Capability::XXssProtection => "X-XSS-Protection",
        }
    }

    /// Opt-in capabilities are only installed when explicitly set to `true`.
    pub const fn default_enabled(self) -> bool {
        !matches!(
            self,
            Capability::CrossOriginEmbedderPolicy | Capability::OriginAgentCluster
        )
    }

    /// Whether the capability has an options type. Capabilities without one
    /// warn and ignore any object passed to them.
    pub const fn takes_options(self) -> bool {
        matches!(
            self,
            Capability::ContentSecurityPolicy
                | Capability::XDnsPrefetchControl
                | Capability::ExpectCt
                | Capability::XFrameOptions
                | Capability::StrictTransportSecurity
                | Capability::XPermittedCrossDomainPolicies
                | Capability::ReferrerPolicy
        )
    }

    /// Deprecation text emitted when an options object is passed to a
    /// capability that has none.
    pub fn ignored_options_warning(self) -> String {
        if self.default_enabled() {
            format!(
                "{} does not take options. Remove the property to silence this warning.",
                self.option_name()
            )
        } else {
            format!(
                "{} does not take options. Set the property to `true` to silence this warning.",
                self.option_name()
            )
        }
    }

    /// Resolves an option key (or its alias) to a capability.
    ///
    /// Keys naming a withdrawn capability fail with its removal message; any
    /// other unrecognized key is rejected so typos cannot silently disable a
    /// protection.
    pub fn from_name(name: &str) -> Result<Self, HelmetError> {
        if let Some(capability) = Capability::ALL
            .into_iter()
            .find(|capability| capability.option_name() == name || capability.alias() == name)
        {
            return Ok(capability);
        }

        match RemovedCapability::from_name(name) {
            Some(removed) => Err(HelmetError::RemovedCapability(removed)),
            None => Err(HelmetError::UnknownCapability(name.to_string())),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// Capabilities that used to exist and now only fail with a pointer to a
/// replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovedCapability {
    FeaturePolicy,
    PublicKeyPins,
    NoCache,
}

impl RemovedCapability {
    pub const ALL: [RemovedCapability; 3] = [
        RemovedCapability::FeaturePolicy,
        RemovedCapability::PublicKeyPins,
        RemovedCapability::NoCache,
    ];

    pub const fn option_name(self) -> &'static str {
        match self {
            RemovedCapability::FeaturePolicy => "featurePolicy",
            RemovedCapability::PublicKeyPins => "hpkp",
            RemovedCapability::NoCache => "noCache",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            RemovedCapability::FeaturePolicy => {
                "featurePolicy was removed because the Feature-Policy header is deprecated. If you still need this header, set it with actix-web's DefaultHeaders middleware."
            }
            RemovedCapability::PublicKeyPins => {
                "hpkp was removed because the header has been deprecated. If you still need this header, set it with actix-web's DefaultHeaders middleware. For more, see https://github.com/helmetjs/helmet/issues/180."
            }
            RemovedCapability::NoCache => {
                "noCache was removed. Set Cache-Control with actix-web's DefaultHeaders middleware instead. For more, see https://github.com/helmetjs/helmet/issues/215."
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        RemovedCapability::ALL
            .into_iter()
            .find(|removed| removed.option_name() == name)
    }
}

impl fmt::Display for RemovedCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_names_and_aliases_resolve() {
        for capability in Capability::ALL {
            assert_eq!(Capability::from_name(capability.option_name()).unwrap(), capability);
            assert_eq!(Capability::from_name(capability.alias()).unwrap(), capability);
        }
    }

    #[test]
    fn test_exactly_two_capabilities_are_opt_in() {
        let opt_in: Vec<_> = Capability::ALL
            .into_iter()
            .filter(|capability| !capability.default_enabled())
            .collect();
        assert_eq!(
            opt_in,
            vec![
                Capability::CrossOriginEmbedderPolicy,
                Capability::OriginAgentCluster
            ]
        );
    }

    #[test]
    fn test_removed_names_report_their_replacement() {
        let err = Capability::from_name("noCache").unwrap_err();
        assert_eq!(
            err.to_string(),
            "noCache was removed. Set Cache-Control with actix-web's DefaultHeaders middleware instead. For more, see https://github.com/helmetjs/helmet/issues/215."
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let err = Capability::from_name("frameGuard").unwrap_err();
        assert_eq!(err.to_string(), "helmet received an unknown option \"frameGuard\"");
    }

    #[test]
    fn test_warning_text_depends_on_default_state() {
        assert_eq!(
            Capability::XContentTypeOptions.ignored_options_warning(),
            "noSniff does not take options. Remove the property to silence this warning."
        );
        assert_eq!(
            Capability::OriginAgentCluster.ignored_options_warning(),
            "originAgentCluster does not take options. Set the property to `true` to silence this warning."
        );
    }
}
