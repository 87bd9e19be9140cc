//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Content Security Policy for the rendered site.
///
/// Images come from the CMS asset CDN; everything else is same-origin.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     img-src 'self' data: cdn.sanity.io; \
     script-src 'self'; \
     style-src 'self' 'unsafe-inline' fonts.googleapis.com; \
     font-src 'self' fonts.gstatic.com; \
     object-src 'none'; \
     frame-ancestors 'none'; \
     base-uri 'self'; \
     form-action 'self'";

/// Middleware that adds security headers to all responses.
///
/// - **Referrer-Policy: strict-origin-when-cross-origin**: post paths under
///   protected categories never leak to other origins.
/// - **X-Content-Type-Options: nosniff**
/// - **X-Frame-Options: DENY**: the login form cannot be framed.
/// - **Strict-Transport-Security**: 2 years, including subdomains.
/// - **Content-Security-Policy**: see [`CONTENT_SECURITY_POLICY`].
///
/// Caching is left to the access gate, which marks gated responses
/// `private, no-store`; public pages stay cacheable.
///
/// ```rust,no_run
/// use axum::Router;
/// use axum::middleware;
/// use blog_gate::middleware::security_headers;
///
/// let app: Router = Router::new()
///     .layer(middleware::from_fn(security_headers));
/// ```
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    response
}
