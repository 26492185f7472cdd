use crate::constants::DEFAULT_NONCE_LENGTH;
use crate::error::CspError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use getrandom::getrandom;
use smallvec::{smallvec, SmallVec};
use std::{
    ops::Deref,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Produces base64 encoded random nonces of a fixed byte length.
#[derive(Debug)]
pub struct NonceGenerator {
    length: AtomicUsize,
    generated: AtomicUsize,
}

impl Clone for NonceGenerator {
    fn clone(&self) -> Self {
        Self {
            length: AtomicUsize::new(self.length.load(Ordering::Relaxed)),
            generated: AtomicUsize::new(0),
        }
    }
}

impl NonceGenerator {
    #[inline]
    pub fn new(length: usize) -> Self {
        Self {
            length: AtomicUsize::new(length.max(1)),
            generated: AtomicUsize::new(0),
        }
    }

    pub fn generate(&self) -> Result<String, CspError> {
        let length = self.length.load(Ordering::Relaxed);
        let mut buffer: SmallVec<[u8; 32]> = smallvec![0u8; length];

        getrandom(&mut buffer).map_err(|err| CspError::CryptoError(err.to_string()))?;
        self.generated.fetch_add(1, Ordering::Relaxed);

        Ok(BASE64.encode(&buffer))
    }

    #[inline]
    pub fn set_length(&self, length: usize) {
        self.length.store(length.max(1), Ordering::Relaxed);
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn generated_count(&self) -> usize {
        self.generated.load(Ordering::Relaxed)
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_LENGTH)
    }
}

/// Nonce of the current request, stored in request extensions when the route enables it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestNonce(pub String);

impl RequestNonce {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for RequestNonce {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
