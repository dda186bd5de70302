//! X-DNS-Prefetch-Control handler.

use actix_web::http::header::HeaderValue;
use serde::Deserialize;

use crate::config::Capability;
use crate::headers::StaticHeader;

/// Options for the X-DNS-Prefetch-Control header
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DnsPrefetchControlOptions {
    /// Sends `on` instead of `off`
    pub allow: bool,
}

pub fn x_dns_prefetch_control(options: DnsPrefetchControlOptions) -> StaticHeader {
    let value = if options.allow { "on" } else { "off" };
    StaticHeader::set(
        Capability::XDnsPrefetchControl,
        "x-dns-prefetch-control",
        HeaderValue::from_static(value),
    )
}
