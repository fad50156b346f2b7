//! URL signing and validation.

use {
    crate::{
        canonical::CanonicalUri,
        chronoutil::{duration_to_string, parse_epoch_seconds},
        constants::*,
        crypto::hmac_sha256_hex,
        SecretKey, SignatureError, SignerConfig, SignerError,
    },
    chrono::{DateTime, Duration, Utc},
    http::uri::Uri,
    log::{debug, trace},
    qualifier_attr::qualifiers,
    std::{
        fmt::{Debug, Formatter, Result as FmtResult},
        str::FromStr,
    },
    subtle::ConstantTimeEq,
};

/// Signs URLs with a shared secret and validates URLs signed by a peer holding the same secret.
///
/// A signed URL carries three extra query parameters: `createdAt` (seconds since the Unix epoch),
/// `apiKey` (this signer's key identifier) and `mac`, the lowercase hex HMAC-SHA256 of the
/// [canonical form][CanonicalUri] of the URL without `mac`.
///
/// `Signer` is immutable once constructed; `sign` and `validate` take `&self` and can be called
/// from multiple threads at once.
#[derive(Clone)]
pub struct Signer {
    /// The API key identifier placed in the `apiKey` parameter.
    api_key: String,

    /// The decoded shared secret.
    secret: SecretKey,

    /// Allowed difference between `createdAt` and the validating clock, in either direction.
    allowed_mismatch: Duration,
}

impl Signer {
    /// Create a signer from an API key identifier and a base64-encoded secret, with the default
    /// 5 minute validity window.
    pub fn new(api_key: impl Into<String>, base64_secret: &str) -> Result<Self, SignerError> {
        Ok(Self::with_secret_key(api_key, SecretKey::from_base64(base64_secret)?))
    }

    /// Create a signer from an API key identifier and an already decoded secret, with the default
    /// 5 minute validity window.
    pub fn with_secret_key(api_key: impl Into<String>, secret: SecretKey) -> Self {
        Self {
            api_key: api_key.into(),
            secret,
            allowed_mismatch: Duration::minutes(ALLOWED_MISMATCH_MINUTES),
        }
    }

    /// Create a signer from a [`SignerConfig`].
    pub fn from_config(config: SignerConfig) -> Result<Self, SignerError> {
        let allowed_mismatch = config.allowed_mismatch();
        if allowed_mismatch <= Duration::zero() {
            return Err(SignerError::InvalidConfig(format!(
                "Allowed timestamp mismatch must be positive, got {} sec",
                allowed_mismatch.num_seconds()
            )));
        }

        let secret = SecretKey::from_base64(config.secret())?;
        Ok(Self {
            api_key: config.api_key().to_string(),
            secret,
            allowed_mismatch,
        })
    }

    /// Retrieve the API key identifier.
    #[inline(always)]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Retrieve the allowed timestamp mismatch.
    #[inline(always)]
    pub fn allowed_mismatch(&self) -> Duration {
        self.allowed_mismatch
    }

    /// Sign a URI using the current time.
    pub fn sign(&self, uri: &Uri) -> Result<Uri, SignerError> {
        self.sign_at(uri, Utc::now())
    }

    /// Sign a URI as if the current time were `timestamp`.
    ///
    /// `createdAt` and `apiKey` are appended after any existing parameters, the canonical form is
    /// hashed, and the hex digest is appended as `mac`. The input is not modified.
    ///
    /// The MAC covers the form [`Uri`] normalizes to (lowercase `http`/`https` scheme, `/` for an
    /// empty path). Use [`sign_str`][Self::sign_str] to sign the text exactly as written.
    pub fn sign_at(&self, uri: &Uri, timestamp: DateTime<Utc>) -> Result<Uri, SignerError> {
        self.sign_canonical(CanonicalUri::from_uri(uri), timestamp)?.to_uri()
    }

    /// Sign a URI string using the current time, keeping its scheme, authority, and path exactly
    /// as written.
    pub fn sign_str(&self, uri: &str) -> Result<String, SignerError> {
        self.sign_str_at(uri, Utc::now())
    }

    /// Sign a URI string as if the current time were `timestamp`, keeping its scheme, authority,
    /// and path exactly as written.
    pub fn sign_str_at(&self, uri: &str, timestamp: DateTime<Utc>) -> Result<String, SignerError> {
        let canonical = CanonicalUri::from_str(uri)?;
        Ok(self.sign_canonical(canonical, timestamp)?.to_string())
    }

    fn sign_canonical(&self, mut canonical: CanonicalUri, timestamp: DateTime<Utc>) -> Result<CanonicalUri, SignerError> {
        canonical.append(TIME_PARAM, &timestamp.timestamp().to_string());
        canonical.append(API_KEY_PARAM, &self.api_key);

        let mac = self.compute_mac(&canonical)?;
        canonical.append(MAC_PARAM, &mac);
        Ok(canonical)
    }

    /// Indicates whether `uri` carries a valid signature that is within the allowed window of the
    /// current time.
    pub fn validate(&self, uri: &Uri) -> bool {
        self.validate_at(uri, Utc::now())
    }

    /// Indicates whether `uri` carries a valid signature that is within the allowed window of
    /// `server_timestamp`.
    ///
    /// This never fails: missing parameters, a malformed timestamp, a mismatched digest, and an
    /// out-of-window timestamp all produce `false`.
    pub fn validate_at(&self, uri: &Uri, server_timestamp: DateTime<Utc>) -> bool {
        match self.verify_at(uri, server_timestamp) {
            Ok(()) => true,
            Err(e) => {
                debug!("validate: rejected signed request for api key '{}': {}", self.api_key, e);
                false
            }
        }
    }

    /// Indicates whether the URI string parses and carries a valid signature within the allowed
    /// window of the current time.
    pub fn validate_str(&self, uri: &str) -> bool {
        self.validate_str_at(uri, Utc::now())
    }

    /// Indicates whether the URI string parses and carries a valid signature within the allowed
    /// window of `server_timestamp`.
    ///
    /// The MAC is checked against the scheme, authority, and path exactly as written, so a URL
    /// produced by [`sign_str`][Self::sign_str] must be presented with the same text.
    pub fn validate_str_at(&self, uri: &str, server_timestamp: DateTime<Utc>) -> bool {
        let canonical = match CanonicalUri::from_str(uri) {
            Ok(canonical) => canonical,
            Err(e) => {
                debug!("validate: could not parse URI: {}", e);
                return false;
            }
        };

        match self.verify_canonical(&canonical, server_timestamp) {
            Ok(()) => true,
            Err(e) => {
                debug!("validate: rejected signed request for api key '{}': {}", self.api_key, e);
                false
            }
        }
    }

    /// Verify the signature and timestamp of `uri`, reporting which check failed.
    ///
    /// The digest is checked before the timestamp. The window is open at both ends: `createdAt`
    /// must be strictly after `server_timestamp - allowed_mismatch` and strictly before
    /// `server_timestamp + allowed_mismatch`.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn verify_at(&self, uri: &Uri, server_timestamp: DateTime<Utc>) -> Result<(), SignatureError> {
        self.verify_canonical(&CanonicalUri::from_uri(uri), server_timestamp)
    }

    /// Verify the signature and timestamp of an already split URI.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn verify_canonical(&self, canonical: &CanonicalUri, server_timestamp: DateTime<Utc>) -> Result<(), SignatureError> {
        let signature = canonical
            .first(MAC_PARAM)
            .ok_or_else(|| SignatureError::MissingAuthenticationToken(MSG_MISSING_MAC.to_string()))?;

        let origin = canonical.without(MAC_PARAM);
        let expected_signature =
            self.compute_mac(&origin).map_err(|e| SignatureError::InternalFailure(e.to_string()))?;
        let is_equal: bool = signature.as_bytes().ct_eq(expected_signature.as_bytes()).into();
        if !is_equal {
            trace!("verify: signature mismatch: expected '{}', got '{}'", expected_signature, signature);
            return Err(SignatureError::SignatureDoesNotMatch(MSG_REQUEST_SIGNATURE_MISMATCH.to_string()));
        }

        let created_at_str = canonical
            .first(TIME_PARAM)
            .ok_or_else(|| SignatureError::MissingAuthenticationToken(MSG_MISSING_CREATED_AT.to_string()))?;
        let created_at = parse_epoch_seconds(created_at_str).ok_or_else(|| {
            SignatureError::MalformedQueryString(format!(
                "'createdAt' must be an integer number of seconds since the Unix epoch. Got '{}'.",
                created_at_str
            ))
        })?;

        self.check_timestamp(created_at, server_timestamp)
    }

    /// Compute the hex-encoded MAC over the canonical form of `canonical`.
    fn compute_mac(&self, canonical: &CanonicalUri) -> Result<String, SignerError> {
        let payload = canonical.to_string();
        trace!("Canonical request to sign: {}", payload);
        hmac_sha256_hex(self.secret.as_ref(), payload.as_bytes()).map_err(|e| SignerError::InvalidKey(e.to_string()))
    }

    /// Make sure `created_at` lies strictly inside the allowed window around `server_timestamp`.
    fn check_timestamp(&self, created_at: DateTime<Utc>, server_timestamp: DateTime<Utc>) -> Result<(), SignatureError> {
        let min_ts = server_timestamp.checked_sub_signed(self.allowed_mismatch).unwrap_or(server_timestamp);
        let max_ts = server_timestamp.checked_add_signed(self.allowed_mismatch).unwrap_or(server_timestamp);

        if created_at <= min_ts {
            trace!("verify: request timestamp {} is not after minimum timestamp {}", created_at, min_ts);
            return Err(SignatureError::SignatureDoesNotMatch(format!(
                "Signature expired: {} is now earlier than {} ({} - {}.)",
                created_at.format(ISO8601_COMPACT_FORMAT),
                min_ts.format(ISO8601_COMPACT_FORMAT),
                server_timestamp.format(ISO8601_COMPACT_FORMAT),
                duration_to_string(self.allowed_mismatch)
            )));
        }

        if created_at >= max_ts {
            trace!("verify: request timestamp {} is not before maximum timestamp {}", created_at, max_ts);
            return Err(SignatureError::SignatureDoesNotMatch(format!(
                "Signature not yet current: {} is still later than {} ({} + {}.)",
                created_at.format(ISO8601_COMPACT_FORMAT),
                max_ts.format(ISO8601_COMPACT_FORMAT),
                server_timestamp.format(ISO8601_COMPACT_FORMAT),
                duration_to_string(self.allowed_mismatch)
            )));
        }

        Ok(())
    }
}

impl Debug for Signer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Signer")
            .field("api_key", &self.api_key)
            .field("secret", &self.secret)
            .field("allowed_mismatch", &self.allowed_mismatch)
            .finish()
    }
}
