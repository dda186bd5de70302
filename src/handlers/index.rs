//! Demo page exercising the per-request CSP nonce.

use crate::middleware::CspNonce;
use actix_web::{HttpResponse, web};

/// Serves a page whose inline script is only allowed through the response's
/// nonce.
pub async fn index(nonce: web::ReqData<CspNonce>) -> HttpResponse {
    let nonce = nonce.into_inner();
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Tarnished Helmet</title>
</head>
<body>
    <h1>Tarnished Helmet</h1>
    <p id="status">Inline scripts are blocked unless they carry the nonce.</p>
    <script nonce="{nonce}">
        document.getElementById('status').textContent = 'Nonce accepted.';
    </script>
</body>
</html>"#
    );

    HttpResponse::Ok().content_type("text/html").body(body)
}
