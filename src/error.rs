use {
    crate::constants::*,
    base64::DecodeError,
    derive_builder::UninitializedFieldError,
    http::status::StatusCode,
    scratchstack_errors::ServiceError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Error returned when a signer cannot be constructed or a URI cannot be signed.
///
/// These are configuration or environment faults. They are not expected to be retried.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignerError {
    /// The signer configuration is incomplete or inconsistent (e.g. a negative allowed mismatch).
    InvalidConfig(/* message */ String),

    /// The keyed-hash primitive rejected the secret key.
    InvalidKey(/* message */ String),

    /// The secret could not be decoded as base64.
    InvalidSecret(DecodeError),

    /// The input could not be parsed as a URI, or the signed URI could not be rebuilt.
    InvalidUri(/* message */ String),
}

impl SignerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) | Self::InvalidKey(_) => ERR_CODE_INTERNAL_FAILURE,
            Self::InvalidSecret(_) => ERR_CODE_INVALID_SECRET,
            Self::InvalidUri(_) => ERR_CODE_INVALID_URI,
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidUri(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ServiceError for SignerError {
    fn error_code(&self) -> &'static str {
        SignerError::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        SignerError::http_status(self)
    }
}

impl Display for SignerError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::InvalidConfig(msg) => f.write_str(msg),
            Self::InvalidKey(msg) => write!(f, "{} rejected the secret key: {}", HMAC_SHA256, msg),
            Self::InvalidSecret(ref e) => write!(f, "Secret is not valid base64: {}", e),
            Self::InvalidUri(msg) => f.write_str(msg),
        }
    }
}

impl Error for SignerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSecret(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for SignerError {
    fn from(e: DecodeError) -> SignerError {
        SignerError::InvalidSecret(e)
    }
}

impl From<http::uri::InvalidUri> for SignerError {
    fn from(e: http::uri::InvalidUri) -> SignerError {
        SignerError::InvalidUri(e.to_string())
    }
}

impl From<UninitializedFieldError> for SignerError {
    fn from(e: UninitializedFieldError) -> SignerError {
        SignerError::InvalidConfig(format!("Signer configuration is missing required field '{}'", e.field_name()))
    }
}

/// Reason a signed URI failed validation.
///
/// [`Signer::validate`][crate::Signer::validate] collapses all of these into `false`; the reason
/// is only reported through the `log` facade.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignatureError {
    /// The keyed-hash primitive rejected the secret key.
    InternalFailure(/* message */ String),

    /// The `createdAt` or `apiKey` parameter could not be interpreted, e.g. a non-numeric timestamp.
    MalformedQueryString(/* message */ String),

    /// A required query parameter (`mac`, `createdAt`, or `apiKey`) is absent.
    MissingAuthenticationToken(/* message */ String),

    /// Signature did not match the calculated signature value, or the timestamp is outside the
    /// allowed window. Example messages:
    /// `The request signature we calculated does not match the signature you provided.`
    /// `Signature expired: 20210502T144040Z is now earlier than 20210502T173143Z (20210502T174643Z - 5 min.)`
    /// `Signature not yet current: 20210502T183640Z is still later than 20210502T175140Z (20210502T173640Z + 5 min.)`
    SignatureDoesNotMatch(/* message */ String),

    /// No signer is registered for the `apiKey` presented in the request.
    UnknownApiKey(/* api key */ String),
}

impl SignatureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InternalFailure(_) => ERR_CODE_INTERNAL_FAILURE,
            Self::MalformedQueryString(_) => ERR_CODE_MALFORMED_QUERY_STRING,
            Self::MissingAuthenticationToken(_) => ERR_CODE_MISSING_AUTHENTICATION_TOKEN,
            Self::SignatureDoesNotMatch(_) => ERR_CODE_SIGNATURE_DOES_NOT_MATCH,
            Self::UnknownApiKey(_) => ERR_CODE_INVALID_CLIENT_TOKEN_ID,
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            Self::MalformedQueryString(_) | Self::MissingAuthenticationToken(_) => StatusCode::BAD_REQUEST,
            Self::InternalFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::FORBIDDEN,
        }
    }
}

impl ServiceError for SignatureError {
    fn error_code(&self) -> &'static str {
        SignatureError::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        SignatureError::http_status(self)
    }
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::InternalFailure(msg) => f.write_str(msg),
            Self::MalformedQueryString(msg) => f.write_str(msg),
            Self::MissingAuthenticationToken(msg) => f.write_str(msg),
            Self::SignatureDoesNotMatch(msg) => f.write_str(msg),
            Self::UnknownApiKey(api_key) => write!(f, "The API key provided does not exist in our records: '{}'", api_key),
        }
    }
}

impl Error for SignatureError {}
