use crate::constants::DEFAULT_NONCE_LENGTH;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use getrandom::getrandom;
use std::{
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicUsize, Ordering},
};

/// Generates cryptographically random, base64url-encoded nonce values for
/// the baseline policy. Length is the raw byte count before encoding.
#[derive(Debug)]
pub struct NonceGenerator {
    length: AtomicUsize,
}

impl Clone for NonceGenerator {
    fn clone(&self) -> Self {
        Self {
            length: AtomicUsize::new(self.length.load(Ordering::Relaxed)),
        }
    }
}

impl NonceGenerator {
    #[inline]
    pub fn new(length: usize) -> Self {
        Self {
            length: AtomicUsize::new(length),
        }
    }

    #[inline]
    pub fn generate(&self) -> String {
        let mut buffer = vec![0u8; self.length.load(Ordering::Relaxed)];
        getrandom(&mut buffer).expect("Failed to generate random bytes");
        BASE64.encode(&buffer)
    }

    #[inline]
    pub fn set_length(&self, length: usize) {
        self.length.store(length, Ordering::Relaxed);
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length.load(Ordering::Relaxed)
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_LENGTH)
    }
}

/// The nonce minted for the current request, stored in request extensions
/// so templates can emit matching `<script nonce="...">` attributes.
#[derive(Debug, Clone)]
pub struct RequestNonce(pub String);

impl Deref for RequestNonce {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RequestNonce {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
