//! Helmet options: the typed form of the top-level configuration mapping.

use std::env;

use serde::{Deserialize, Deserializer, de::DeserializeOwned, de::Error as _};
use serde_json::{Map, Value};

use crate::config::Capability;
use crate::diagnostics::DiagnosticsSink;
use crate::error::HelmetError;
use crate::headers::{
    ContentSecurityPolicyOptions, DnsPrefetchControlOptions, ExpectCtOptions, FrameOptions,
    PermittedCrossDomainPoliciesOptions, ReferrerPolicyOptions, StrictTransportSecurityOptions,
};

/// State of one capability in [`HelmetOptions`].
///
/// `Unset` and `Enabled` differ only for opt-in capabilities: an unset opt-in
/// capability stays off, while an unset opt-out capability is installed with
/// its defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum Toggle<T> {
    Unset,
    Enabled,
    Disabled,
    Configured(T),
}

impl<T> Default for Toggle<T> {
    fn default() -> Self {
        Toggle::Unset
    }
}

impl<T: Default> Toggle<T> {
    /// Options to build the capability's handler with, or `None` when the
    /// handler must not be installed.
    pub fn into_options(self, capability: Capability) -> Option<T> {
        match self {
            Toggle::Unset => capability.default_enabled().then(T::default),
            Toggle::Enabled => Some(T::default()),
            Toggle::Disabled => None,
            Toggle::Configured(options) => Some(options),
        }
    }
}

impl Toggle<IgnoredOptions> {
    /// Whether a capability without options should be installed. Passing it an
    /// options object installs it anyway and emits one diagnostic.
    pub fn into_enabled(self, capability: Capability, diagnostics: &dyn DiagnosticsSink) -> bool {
        match self {
            Toggle::Unset => capability.default_enabled(),
            Toggle::Enabled => true,
            Toggle::Disabled => false,
            Toggle::Configured(_) => {
                diagnostics.warn(&capability.ignored_options_warning());
                true
            }
        }
    }
}

impl<T> From<bool> for Toggle<T> {
    fn from(enabled: bool) -> Self {
        if enabled {
            Toggle::Enabled
        } else {
            Toggle::Disabled
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Toggle<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Toggle::Unset),
            Value::Bool(enabled) => Ok(enabled.into()),
            value @ Value::Object(_) => T::deserialize(value)
                .map(Toggle::Configured)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected `true`, `false` or an options object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Options passed to a capability that has none. Kept only so the value can
/// be reported, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct IgnoredOptions(pub Map<String, Value>);

/// Top-level helmet configuration.
///
/// Each field accepts its option name and a header-style alias when
/// deserialized, e.g. `hsts` and `strictTransportSecurity`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct HelmetOptions {
    pub content_security_policy: Toggle<ContentSecurityPolicyOptions>,
    pub cross_origin_embedder_policy: Toggle<IgnoredOptions>,
    #[serde(alias = "xDnsPrefetchControl")]
    pub dns_prefetch_control: Toggle<DnsPrefetchControlOptions>,
    pub expect_ct: Toggle<ExpectCtOptions>,
    #[serde(alias = "xFrameOptions")]
    pub frameguard: Toggle<FrameOptions>,
    #[serde(alias = "xPoweredBy")]
    pub hide_powered_by: Toggle<IgnoredOptions>,
    #[serde(alias = "strictTransportSecurity")]
    pub hsts: Toggle<StrictTransportSecurityOptions>,
    #[serde(alias = "xDownloadOptions")]
    pub ie_no_open: Toggle<IgnoredOptions>,
    #[serde(alias = "xContentTypeOptions")]
    pub no_sniff: Toggle<IgnoredOptions>,
    pub origin_agent_cluster: Toggle<IgnoredOptions>,
    #[serde(alias = "xPermittedCrossDomainPolicies")]
    pub permitted_cross_domain_policies: Toggle<PermittedCrossDomainPoliciesOptions>,
    pub referrer_policy: Toggle<ReferrerPolicyOptions>,
    #[serde(alias = "xXssProtection")]
    pub xss_filter: Toggle<IgnoredOptions>,
}

impl HelmetOptions {
    /// Builds options from an untyped JSON value.
    ///
    /// `null` means "all defaults". Anything other than a mapping is rejected,
    /// as is a mapping shaped like an HTTP request, which usually means the
    /// request was handed to helmet instead of its options.
    pub fn from_value(value: Value) -> Result<Self, HelmetError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => return Err(HelmetError::NotAMapping(json_kind(&other))),
        };

        if looks_like_request(&map) {
            return Err(HelmetError::Misuse);
        }

        for name in map.keys() {
            Capability::from_name(name)?;
        }

        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Parses options from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, HelmetError> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Load options from the `HELMET_OPTIONS` environment variable (JSON),
    /// falling back to defaults when it is unset or blank
    pub fn from_env() -> Result<Self, HelmetError> {
        match env::var("HELMET_OPTIONS") {
            Ok(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Ok(Self::default()),
        }
    }
}

fn looks_like_request(map: &Map<String, Value>) -> bool {
    map.contains_key("method")
        && ["uri", "url", "headers"]
            .iter()
            .any(|key| map.contains_key(*key))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use serde_json::json;
    use std::sync::Mutex;

    // Mutex to synchronize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_null_and_empty_mapping_are_defaults() {
        let options = HelmetOptions::from_value(Value::Null).unwrap();
        assert_eq!(options.hsts, Toggle::Unset);

        let options = HelmetOptions::from_value(json!({})).unwrap();
        assert_eq!(options.origin_agent_cluster, Toggle::Unset);
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        let err = HelmetOptions::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "helmet options must be a mapping of capability names, got an array"
        );
    }

    #[test]
    fn test_request_shaped_value_is_misuse() {
        let err = HelmetOptions::from_value(json!({
            "method": "GET",
            "uri": "/",
            "headers": {}
        }))
        .unwrap_err();
        assert!(matches!(err, HelmetError::Misuse));
    }

    #[test]
    fn test_aliases_are_accepted() {
        let options = HelmetOptions::from_value(json!({
            "strictTransportSecurity": { "maxAge": 60 },
            "xContentTypeOptions": false
        }))
        .unwrap();
        assert_eq!(
            options.hsts,
            Toggle::Configured(StrictTransportSecurityOptions {
                max_age: 60,
                ..Default::default()
            })
        );
        assert_eq!(options.no_sniff, Toggle::Disabled);
    }

    #[test]
    fn test_unknown_and_removed_names_fail() {
        let err = HelmetOptions::from_value(json!({ "hstss": true })).unwrap_err();
        assert!(matches!(err, HelmetError::UnknownCapability(name) if name == "hstss"));

        let err = HelmetOptions::from_value(json!({ "featurePolicy": {} })).unwrap_err();
        assert!(matches!(err, HelmetError::RemovedCapability(_)));
    }

    #[test]
    fn test_scalar_capability_value_is_rejected() {
        let err = HelmetOptions::from_value(json!({ "frameguard": "deny" })).unwrap_err();
        assert!(err.to_string().contains("expected `true`, `false` or an options object"));
    }

    #[test]
    fn test_ignored_options_warn_once_and_stay_enabled() {
        let diagnostics = MemoryDiagnostics::new();
        let toggle = Toggle::Configured(IgnoredOptions::default());
        assert!(toggle.into_enabled(Capability::XXssProtection, &diagnostics));
        assert_eq!(
            diagnostics.messages(),
            vec!["xssFilter does not take options. Remove the property to silence this warning."]
        );
    }

    #[test]
    fn test_from_env_defaults_when_unset() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::remove_var("HELMET_OPTIONS");
        }

        let options = HelmetOptions::from_env().unwrap();
        assert_eq!(options.frameguard, Toggle::Unset);
    }

    #[test]
    fn test_from_env_parses_json() {
        let _lock = ENV_MUTEX.lock().unwrap();

        unsafe {
            env::set_var(
                "HELMET_OPTIONS",
                r#"{"originAgentCluster": true, "frameguard": {"action": "deny"}}"#,
            );
        }

        let options = HelmetOptions::from_env().unwrap();
        assert_eq!(options.origin_agent_cluster, Toggle::Enabled);
        assert_eq!(
            options.frameguard,
            Toggle::Configured(FrameOptions {
                action: "deny".to_string()
            })
        );

        unsafe {
            env::remove_var("HELMET_OPTIONS");
        }
    }
}
