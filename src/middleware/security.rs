//! Helmet middleware: composes the configured security header handlers and
//! applies them to every response.

use crate::config::{Capability, HelmetOptions};
use crate::diagnostics::{DiagnosticsSink, TracingDiagnostics};
use crate::error::HelmetError;
use crate::headers::{
    ContentSecurityPolicy, HeaderAction, SecurityHeader, cross_origin_embedder_policy, expect_ct,
    origin_agent_cluster, referrer_policy, strict_transport_security, x_content_type_options,
    x_dns_prefetch_control, x_download_options, x_frame_options,
    x_permitted_cross_domain_policies, x_powered_by, x_xss_protection,
};
use actix_web::{
    Error, ResponseError,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    error::InternalError,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    sync::Arc,
};
use tracing::{debug, warn};

type Handlers = Arc<[Box<dyn SecurityHeader>]>;

/// Security headers middleware factory
///
/// Built once from [`HelmetOptions`]; the handler list is immutable afterwards
/// and shared by every worker.
#[derive(Clone)]
pub struct Helmet {
    handlers: Handlers,
}

impl Helmet {
    /// Compose the middleware, reporting deprecation diagnostics through `tracing`
    pub fn new(options: HelmetOptions) -> Result<Self, HelmetError> {
        Self::with_diagnostics(options, &TracingDiagnostics)
    }

    /// Compose the middleware, reporting deprecation diagnostics to `diagnostics`.
    ///
    /// Any configuration error aborts composition; no partial handler list is
    /// ever produced.
    pub fn with_diagnostics(
        options: HelmetOptions,
        diagnostics: &dyn DiagnosticsSink,
    ) -> Result<Self, HelmetError> {
        let handlers = compose(options, diagnostics)?;

        debug!(
            target: "helmet",
            capabilities = ?handlers.iter().map(|handler| handler.capability()).collect::<Vec<_>>(),
            "Composed security header handlers"
        );

        Ok(Self {
            handlers: handlers.into(),
        })
    }

    /// Compose the middleware from an untyped configuration value
    pub fn from_value(value: serde_json::Value) -> Result<Self, HelmetError> {
        Self::new(HelmetOptions::from_value(value)?)
    }

    /// Compose the middleware from the `HELMET_OPTIONS` environment variable
    pub fn from_env() -> Result<Self, HelmetError> {
        Self::new(HelmetOptions::from_env()?)
    }

    /// Wrap a single handler, e.g. `Helmet::from_handler(frameguard(options)?)`.
    pub fn from_handler(handler: impl SecurityHeader + 'static) -> Self {
        let handlers: Vec<Box<dyn SecurityHeader>> = vec![Box::new(handler)];
        Self {
            handlers: handlers.into(),
        }
    }

    /// Run an explicit handler chain, in the order given.
    pub fn from_handlers(handlers: impl IntoIterator<Item = Box<dyn SecurityHeader>>) -> Self {
        Self {
            handlers: handlers.into_iter().collect(),
        }
    }

    /// Installed capabilities, in the order their handlers run.
    pub fn capabilities(&self) -> Vec<Capability> {
        self.handlers
            .iter()
            .map(|handler| handler.capability())
            .collect()
    }

    pub fn handlers(&self) -> &[Box<dyn SecurityHeader>] {
        &self.handlers
    }
}

impl std::fmt::Debug for Helmet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Helmet")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

fn compose(
    options: HelmetOptions,
    diagnostics: &dyn DiagnosticsSink,
) -> Result<Vec<Box<dyn SecurityHeader>>, HelmetError> {
    let HelmetOptions {
        content_security_policy,
        cross_origin_embedder_policy: coep,
        dns_prefetch_control,
        expect_ct: expect_ct_options,
        frameguard,
        hide_powered_by,
        hsts,
        ie_no_open,
        no_sniff,
        origin_agent_cluster: oac,
        permitted_cross_domain_policies,
        referrer_policy: referrer_policy_options,
        xss_filter,
    } = options;

    let mut handlers: Vec<Box<dyn SecurityHeader>> = Vec::with_capacity(Capability::ALL.len());

    if let Some(options) = content_security_policy.into_options(Capability::ContentSecurityPolicy) {
        let policy = ContentSecurityPolicy::new(options)?;
        if policy.is_empty() {
            debug!(target: "helmet", "Content-Security-Policy has no directives, not installing it");
        } else {
            handlers.push(Box::new(policy));
        }
    }
    if coep.into_enabled(Capability::CrossOriginEmbedderPolicy, diagnostics) {
        handlers.push(Box::new(cross_origin_embedder_policy()));
    }
    if let Some(options) = dns_prefetch_control.into_options(Capability::XDnsPrefetchControl) {
        handlers.push(Box::new(x_dns_prefetch_control(options)));
    }
    if let Some(options) = expect_ct_options.into_options(Capability::ExpectCt) {
        handlers.push(Box::new(expect_ct(options)?));
    }
    if let Some(options) = frameguard.into_options(Capability::XFrameOptions) {
        handlers.push(Box::new(x_frame_options(options)?));
    }
    if hide_powered_by.into_enabled(Capability::XPoweredBy, diagnostics) {
        handlers.push(Box::new(x_powered_by()));
    }
    if let Some(options) = hsts.into_options(Capability::StrictTransportSecurity) {
        handlers.push(Box::new(strict_transport_security(options)?));
    }
    if ie_no_open.into_enabled(Capability::XDownloadOptions, diagnostics) {
        handlers.push(Box::new(x_download_options()));
    }
    if no_sniff.into_enabled(Capability::XContentTypeOptions, diagnostics) {
        handlers.push(Box::new(x_content_type_options()));
    }
    if oac.into_enabled(Capability::OriginAgentCluster, diagnostics) {
        handlers.push(Box::new(origin_agent_cluster()));
    }
    if let Some(options) =
        permitted_cross_domain_policies.into_options(Capability::XPermittedCrossDomainPolicies)
    {
        handlers.push(Box::new(x_permitted_cross_domain_policies(options)?));
    }
    if let Some(options) = referrer_policy_options.into_options(Capability::ReferrerPolicy) {
        handlers.push(Box::new(referrer_policy(options)?));
    }
    if xss_filter.into_enabled(Capability::XXssProtection, diagnostics) {
        handlers.push(Box::new(x_xss_protection()));
    }

    Ok(handlers)
}

impl<S, B> Transform<S, ServiceRequest> for Helmet
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = HelmetMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(HelmetMiddleware {
            service,
            handlers: Arc::clone(&self.handlers),
        }))
    }
}

/// The actual security headers middleware service
pub struct HelmetMiddleware<S> {
    service: S,
    handlers: Handlers,
}

impl<S, B> Service<ServiceRequest> for HelmetMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let mut actions: Vec<HeaderAction> = Vec::with_capacity(self.handlers.len());

        for handler in self.handlers.iter() {
            match handler.apply(req.request()) {
                Ok(Some(action)) => actions.push(action),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        target: "helmet",
                        capability = %handler.capability(),
                        method = %req.method(),
                        path = %req.path(),
                        error = %err,
                        "Security header rejected, forwarding to error handler"
                    );

                    // Headers resolved before the failure stay on the error response.
                    let mut response = err.error_response();
                    for action in &actions {
                        action.write(response.headers_mut());
                    }
                    let error: Error = InternalError::from_response(err, response).into();
                    return Box::pin(async move { Err(error) });
                }
            }
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();
            for action in &actions {
                action.write(headers);
            }
            Ok(res)
        })
    }
}
