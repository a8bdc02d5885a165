use crate::CodeGenerator;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use snip_core::shortcode::MAX_LENGTH;
use snip_core::ShortCode;

/// Derives a short code from the SHA-256 digest of the long URL.
///
/// The digest is encoded with the URL-safe base64 alphabet without padding
/// (43 characters) and truncated to the first [`MAX_LENGTH`] characters.
/// Truncation keeps 60 bits of the digest, so distinct URLs can collide;
/// storage rejects such a collision as a conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestCodeGenerator;

impl DigestCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for DigestCodeGenerator {
    fn generate(&self, long_url: &str) -> ShortCode {
        let digest = Sha256::digest(long_url.as_bytes());
        let mut encoded = URL_SAFE_NO_PAD.encode(digest);
        encoded.truncate(MAX_LENGTH);
        ShortCode::new_unchecked(encoded)
    }
}
