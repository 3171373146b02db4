use crate::security::nonce::RequestNonce;
use actix_web::HttpMessage;
use std::ops::Deref;

/// Correlation id assigned to each request by the middleware.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl Deref for RequestId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub trait AugmentExtensions {
    fn request_id(&self) -> Option<String>;
    fn baseline_nonce(&self) -> Option<String>;
}

impl<T> AugmentExtensions for T
where
    T: HttpMessage,
{
    fn request_id(&self) -> Option<String> {
        self.extensions().get::<RequestId>().map(|id| id.0.clone())
    }

    fn baseline_nonce(&self) -> Option<String> {
        self.extensions()
            .get::<RequestNonce>()
            .map(|nonce| nonce.0.clone())
    }
}
