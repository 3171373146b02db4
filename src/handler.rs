use crate::constants::{CONTENT_TYPE_HTML, HEADER_CSP};
use crate::core::config::AugmentConfig;
use crate::error::CspError;
use crate::middleware::extensions::RequestId;
use crate::security::baseline::BaselinePolicy;
use crate::security::nonce::RequestNonce;
use actix_web::{
    http::header::HeaderName,
    web::Data,
    HttpMessage, HttpRequest, HttpResponse,
};
use std::sync::Arc;

/// Seam for the opaque rendering collaborator. Implementations receive the
/// request path and the baseline nonce so inline `<script>`/`<style>` tags
/// can carry matching `nonce` attributes.
#[cfg_attr(test, mockall::automock)]
pub trait HtmlRenderer: Send + Sync {
    fn render(&self, path: &str, nonce: &str) -> Result<String, CspError>;
}

/// Bundles the renderer with the upstream baseline policy generator.
pub struct StorefrontService {
    renderer: Arc<dyn HtmlRenderer>,
    baseline: BaselinePolicy,
}

impl StorefrontService {
    #[inline]
    pub fn new(renderer: Arc<dyn HtmlRenderer>) -> Self {
        Self::with_baseline(renderer, BaselinePolicy::new())
    }

    #[inline]
    pub fn with_baseline(renderer: Arc<dyn HtmlRenderer>, baseline: BaselinePolicy) -> Self {
        Self { renderer, baseline }
    }

    #[inline]
    pub fn baseline(&self) -> &BaselinePolicy {
        &self.baseline
    }
}

/// Renders a storefront page: mints the baseline policy for the request,
/// records the nonce for templates, and sets the `Content-Security-Policy`
/// and `Content-Type: text/html` headers on the response. The wrapping
/// middleware augments the header on the way out.
///
/// A renderer failure propagates as HTTP 500.
pub async fn render_storefront(
    req: HttpRequest,
    service: Data<StorefrontService>,
    config: Option<Data<AugmentConfig>>,
) -> Result<HttpResponse, CspError> {
    let policy = {
        let extensions = req.extensions();
        match extensions.get::<RequestId>() {
            Some(id) => service.baseline.generate_for_request(id),
            None => service.baseline.generate(),
        }
    };
    req.extensions_mut()
        .insert(RequestNonce(policy.nonce.clone()));

    match service.renderer.render(req.path(), &policy.nonce) {
        Ok(html) => Ok(HttpResponse::Ok()
            .content_type(CONTENT_TYPE_HTML)
            .insert_header((HeaderName::from_static(HEADER_CSP), policy.header))
            .body(html)),
        Err(err) => {
            if let Some(config) = config {
                config.stats().increment_render_error_count();
            }
            log::error!("render failed for {}: {}", req.path(), err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::extensions::AugmentExtensions;
    use actix_web::{http::StatusCode, test::TestRequest, ResponseError};

    #[actix_web::test]
    async fn sets_baseline_header_and_records_nonce() {
        let mut renderer = MockHtmlRenderer::new();
        renderer
            .expect_render()
            .returning(|_, nonce| Ok(format!("<script nonce=\"{nonce}\"></script>")));

        let service = Data::new(StorefrontService::new(Arc::new(renderer)));
        let req = TestRequest::with_uri("/products/tea").to_http_request();

        let res = render_storefront(req.clone(), service, None).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let header = res
            .headers()
            .get("content-security-policy")
            .unwrap()
            .to_str()
            .unwrap();
        let nonce = req.baseline_nonce().unwrap();
        assert!(header.contains(&format!("'nonce-{nonce}'")));
        assert_eq!(
            res.headers().get("content-type").unwrap(),
            "text/html"
        );
    }

    #[actix_web::test]
    async fn reuses_the_request_scoped_nonce() {
        let mut renderer = MockHtmlRenderer::new();
        renderer.expect_render().returning(|_, _| Ok(String::new()));

        let service = Data::new(StorefrontService::new(Arc::new(renderer)));
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(RequestId("req-42".to_string()));

        render_storefront(req.clone(), service.clone(), None)
            .await
            .unwrap();

        let recorded = req.baseline_nonce().unwrap();
        assert_eq!(service.baseline().request_nonce("req-42"), Some(recorded));
    }

    #[actix_web::test]
    async fn render_failure_maps_to_internal_error() {
        let mut renderer = MockHtmlRenderer::new();
        renderer
            .expect_render()
            .returning(|_, _| Err(CspError::RenderError("template blew up".to_string())));

        let service = Data::new(StorefrontService::new(Arc::new(renderer)));
        let config = Data::new(AugmentConfig::default());
        let req = TestRequest::default().to_http_request();

        let err = render_storefront(req, service, Some(config.clone()))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(config.stats().render_error_count(), 1);
    }
}
