use actix_web::{App, HttpServer, web};
use std::{env, io};
use tarnished_helmet::{
    ContentSecurityPolicyOptions, CspNonceMiddleware, DirectiveSource, Helmet, HelmetOptions,
    Toggle, health, index,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Options from the environment, with the demo page's nonce added to
/// `script-src` unless the policy was configured explicitly.
fn demo_options() -> Result<HelmetOptions, tarnished_helmet::HelmetError> {
    let mut options = HelmetOptions::from_env()?;
    if matches!(
        options.content_security_policy,
        Toggle::Unset | Toggle::Enabled
    ) {
        options.content_security_policy = Toggle::Configured(
            ContentSecurityPolicyOptions::default().directive(
                "scriptSrc",
                vec![DirectiveSource::from("'self'"), DirectiveSource::nonce()],
            ),
        );
    }
    Ok(options)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let helmet = demo_options()
        .and_then(Helmet::new)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let bind = env::var("HELMET_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    info!(bind = %bind, capabilities = ?helmet.capabilities(), "Server starting");

    HttpServer::new(move || {
        App::new()
            .wrap(helmet.clone())
            .wrap(CspNonceMiddleware)
            .route("/", web::get().to(index))
            .route("/api/health", web::get().to(health))
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_index_script_nonce_matches_policy() {
        let helmet = Helmet::new(HelmetOptions {
            content_security_policy: Toggle::Configured(
                ContentSecurityPolicyOptions::default().directive(
                    "scriptSrc",
                    vec![DirectiveSource::from("'self'"), DirectiveSource::nonce()],
                ),
            ),
            ..Default::default()
        })
        .unwrap();
        let app = test::init_service(
            App::new()
                .wrap(helmet)
                .wrap(CspNonceMiddleware)
                .route("/", web::get().to(index)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let policy = resp
            .headers()
            .get("content-security-policy")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();

        let nonce = policy
            .split("'nonce-")
            .nth(1)
            .and_then(|rest| rest.split('\'').next())
            .unwrap();
        assert!(body_str.contains(&format!("nonce=\"{nonce}\"")));
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new()
                .wrap(Helmet::new(HelmetOptions::default()).unwrap())
                .route("/api/health", web::get().to(health)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get("x-frame-options").unwrap(), "SAMEORIGIN");

        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(body_str.contains("healthy"));
    }
}
