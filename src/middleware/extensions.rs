use crate::core::source::Source;
use crate::security::nonce::RequestNonce;
use actix_web::HttpMessage;
use std::borrow::Cow;

pub trait CspExtensions {
    fn get_nonce(&self) -> Option<String>;
    fn nonce_source(&self) -> Option<Source>;
}

impl<T> CspExtensions for T
where
    T: HttpMessage,
{
    fn get_nonce(&self) -> Option<String> {
        self.extensions()
            .get::<RequestNonce>()
            .map(|nonce| nonce.0.clone())
    }

    fn nonce_source(&self) -> Option<Source> {
        self.get_nonce()
            .map(|nonce| Source::Nonce(Cow::Owned(nonce)))
    }
}
