//! Per-request CSP nonce middleware.

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::{
    fmt,
    future::{Ready, ready},
};
use uuid::Uuid;

/// Nonce stored in request extensions by [`CspNonceMiddleware`].
///
/// Handlers can extract it with `web::ReqData<CspNonce>`; the policy picks it
/// up through [`crate::DirectiveSource::nonce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspNonce(String);

impl CspNonce {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CspNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CSP nonce middleware factory
///
/// Must run before [`crate::Helmet`], so register it with `wrap` after Helmet.
pub struct CspNonceMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CspNonceMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CspNonceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspNonceService { service }))
    }
}

/// The actual CSP nonce middleware service
pub struct CspNonceService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CspNonceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let nonce = CspNonce::generate();
        tracing::trace!(target: "helmet", path = %req.path(), "Generated CSP nonce");
        req.extensions_mut().insert(nonce);
        self.service.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[::core::prelude::v1::test]
    fn test_nonces_are_unique() {
        let first = CspNonce::generate();
        let second = CspNonce::generate();
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 32);
    }

    #[actix_web::test]
    async fn test_nonce_is_available_to_handlers() {
        let app = test::init_service(App::new().wrap(CspNonceMiddleware).route(
            "/",
            web::get().to(|nonce: web::ReqData<CspNonce>| async move {
                HttpResponse::Ok().body(nonce.to_string())
            }),
        ))
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        assert_eq!(body.len(), 32);
    }
}
