use crate::constants::{CONTENT_TYPE_HTML, HEADER_CSP};
use crate::core::allowlist::AllowList;
use crate::core::config::AugmentConfig;
use crate::middleware::extensions::RequestId;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue, CONTENT_TYPE},
    web::Data,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};
use uuid::Uuid;

/// Response middleware that rewrites the `Content-Security-Policy` header
/// set by the inner handler: allow-listed origins are appended and the
/// baseline nonce token is stripped. Responses without a CSP header pass
/// through untouched.
#[derive(Clone)]
pub struct CspAugmentMiddleware {
    config: Arc<AugmentConfig>,
}

impl CspAugmentMiddleware {
    #[inline]
    pub fn new(config: AugmentConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> Arc<AugmentConfig> {
        self.config.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspAugmentMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CspAugmentService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspAugmentService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct CspAugmentService<S> {
    service: Rc<S>,
    config: Arc<AugmentConfig>,
}

impl<S, B> Service<ServiceRequest> for CspAugmentService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4()
                .hyphenated()
                .encode_lower(&mut Uuid::encode_buffer())
                .to_owned();
            req.extensions_mut().insert(RequestId(request_id.clone()));

            config.stats().increment_request_count();

            let mut res = service.call(req).await?;

            let raw = res
                .headers()
                .get(HeaderName::from_static(HEADER_CSP))
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            if let Some(raw) = raw {
                match config.augment(&raw) {
                    Ok(value) => {
                        let headers = res.headers_mut();
                        headers.insert(HeaderName::from_static(HEADER_CSP), value);
                        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HTML));
                    }
                    Err(err) => {
                        log::warn!(
                            "request {}: CSP header left untouched: {}",
                            request_id,
                            err
                        );
                    }
                }
            }

            Ok(res)
        })
    }
}

#[inline]
pub fn csp_augmenter(allowlist: AllowList) -> CspAugmentMiddleware {
    CspAugmentMiddleware::new(AugmentConfig::new(allowlist))
}

#[inline]
pub fn csp_augmenter_with_config(config: AugmentConfig) -> CspAugmentMiddleware {
    CspAugmentMiddleware::new(config)
}

/// Registers the shared [`AugmentConfig`] as app data so handlers can reach
/// the stats counters and swap the allow-list at runtime.
pub fn configure_augmenter(
    config: AugmentConfig,
) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::new(config.clone()));
        cfg.app_data(Data::new(CspAugmentMiddleware::new(config)));
    }
}
