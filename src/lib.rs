//! Tarnished Helmet - security response headers for Actix Web
//!
//! A single options value is composed into an ordered list of header handlers
//! and installed as one middleware:
//! - Content-Security-Policy, merged from a default policy and user
//!   directives, with values that can be resolved per request
//! - Strict-Transport-Security, X-Frame-Options, Referrer-Policy and the other
//!   single-value headers, each with its own small options type
//! - Removal of `X-Powered-By`
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `config/` - Helmet options, the capability table and environment loading
//! - `headers/` - One handler per security header, including the CSP compiler
//! - `middleware/` - The Actix middleware applying the handlers, and the CSP nonce middleware
//! - `diagnostics` - Sinks for deprecation warnings
//! - `handlers/` and `models/` - Endpoints of the demo server
//! - `utils/` - Name normalization helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::{App, HttpServer};
//! use tarnished_helmet::{Helmet, HelmetOptions};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let helmet = Helmet::new(HelmetOptions::default()).expect("valid helmet options");
//!     HttpServer::new(move || App::new().wrap(helmet.clone()))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

// Core modules
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod handlers;
pub mod headers;
pub mod middleware;
pub mod models;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{Capability, HelmetOptions, IgnoredOptions, RemovedCapability, Toggle};
pub use diagnostics::{DiagnosticsSink, MemoryDiagnostics, TracingDiagnostics};
pub use error::{BoxError, HelmetError};
pub use handlers::{health, index};
pub use headers::{
    ContentSecurityPolicy, ContentSecurityPolicyOptions, DirectiveSource, DirectiveValue,
    Directives, DnsPrefetchControlOptions, ExpectCtOptions, FrameOptions, HeaderAction,
    PermittedCrossDomainPoliciesOptions, ReferrerPolicyOptions, SecurityHeader, StaticHeader,
    StrictTransportSecurityOptions, ValueValidation, content_security_policy,
    cross_origin_embedder_policy, default_directives, dns_prefetch_control, expect_ct,
    feature_policy, frameguard, hide_powered_by, hpkp, hsts, ie_no_open, no_cache, no_sniff,
    origin_agent_cluster, permitted_cross_domain_policies, referrer_policy,
    strict_transport_security, x_content_type_options, x_dns_prefetch_control,
    x_download_options, x_frame_options, x_permitted_cross_domain_policies, x_powered_by,
    x_xss_protection, xss_filter,
};
pub use middleware::{CspNonce, CspNonceMiddleware, Helmet, HelmetMiddleware};
pub use models::HealthResponse;
