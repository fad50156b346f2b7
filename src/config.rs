use {
    crate::{constants::ALLOWED_MISMATCH_MINUTES, SignerError},
    chrono::Duration,
    derive_builder::Builder,
    std::fmt::{Debug, Formatter, Result as FmtResult},
};

/// Configuration for a [`Signer`][crate::Signer].
///
/// ```rust
/// use hmac_url_signer::{Signer, SignerConfig};
///
/// let config = SignerConfig::builder()
///     .api_key("api-key")
///     .secret("c2VjcmV0")
///     .allowed_mismatch(chrono::Duration::minutes(2))
///     .build()
///     .unwrap();
/// let signer = Signer::from_config(config).unwrap();
/// assert_eq!(signer.api_key(), "api-key");
/// ```
#[derive(Builder, Clone)]
#[builder(build_fn(error = "SignerError"))]
pub struct SignerConfig {
    /// The API key identifier placed in the `apiKey` query parameter.
    #[builder(setter(into))]
    api_key: String,

    /// The shared secret, base64-encoded.
    #[builder(setter(into))]
    secret: String,

    /// How far the `createdAt` timestamp may drift from the validating server's clock in either
    /// direction. Defaults to 5 minutes.
    #[builder(default = "Duration::minutes(ALLOWED_MISMATCH_MINUTES)")]
    allowed_mismatch: Duration,
}

impl SignerConfig {
    /// Create a builder for `SignerConfig`.
    #[inline(always)]
    pub fn builder() -> SignerConfigBuilder {
        SignerConfigBuilder::default()
    }

    /// Retrieve the API key identifier.
    #[inline(always)]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Retrieve the base64-encoded secret.
    #[inline(always)]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Retrieve the allowed timestamp mismatch.
    #[inline(always)]
    pub fn allowed_mismatch(&self) -> Duration {
        self.allowed_mismatch
    }
}

impl Debug for SignerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SignerConfig")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .field("allowed_mismatch", &self.allowed_mismatch)
            .finish()
    }
}
