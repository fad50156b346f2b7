//! Common constants used throughout the crate.
//!
//! These are the reserved query parameter names, the algorithm name, and the error codes and
//! messages shared by the signer and the keyring. Keeping them in one spot means a misspelled
//! parameter name only has to be fixed once.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically.

/// Default allowed timestamp mismatch in minutes.
pub(crate) const ALLOWED_MISMATCH_MINUTES: i64 = 5;

/// Query parameter carrying the API key identifier.
pub(crate) const API_KEY_PARAM: &str = "apiKey";

/// Error code: `"InternalFailure"`
pub(crate) const ERR_CODE_INTERNAL_FAILURE: &str = "InternalFailure";

/// Error code: `"InvalidClientTokenId"`
pub(crate) const ERR_CODE_INVALID_CLIENT_TOKEN_ID: &str = "InvalidClientTokenId";

/// Error code: `"InvalidSecret"`
pub(crate) const ERR_CODE_INVALID_SECRET: &str = "InvalidSecret";

/// Error code: `"InvalidURI"`
pub(crate) const ERR_CODE_INVALID_URI: &str = "InvalidURI";

/// Error code: `"MalformedQueryString"`
pub(crate) const ERR_CODE_MALFORMED_QUERY_STRING: &str = "MalformedQueryString";

/// Error code: `"MissingAuthenticationToken"`
pub(crate) const ERR_CODE_MISSING_AUTHENTICATION_TOKEN: &str = "MissingAuthenticationToken";

/// Error code: `"SignatureDoesNotMatch"`
pub(crate) const ERR_CODE_SIGNATURE_DOES_NOT_MATCH: &str = "SignatureDoesNotMatch";

/// Name of the keyed-hash algorithm, as reported in log and error messages.
pub(crate) const HMAC_SHA256: &str = "HmacSHA256";

/// Compact ISO8601 format used in timestamp error messages.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Query parameter carrying the hex-encoded signature.
pub(crate) const MAC_PARAM: &str = "mac";

/// Error message: `"Request is missing the 'apiKey' query parameter."`
pub(crate) const MSG_MISSING_API_KEY: &str = "Request is missing the 'apiKey' query parameter.";

/// Error message: `"Request is missing the 'createdAt' query parameter."`
pub(crate) const MSG_MISSING_CREATED_AT: &str = "Request is missing the 'createdAt' query parameter.";

/// Error message: `"Request is missing the 'mac' query parameter."`
pub(crate) const MSG_MISSING_MAC: &str = "Request is missing the 'mac' query parameter.";

/// Error message: `"The request signature we calculated does not match the signature you provided."`
pub(crate) const MSG_REQUEST_SIGNATURE_MISMATCH: &str =
    "The request signature we calculated does not match the signature you provided.";

/// Length of a SHA-256 digest in bytes.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

/// Query parameter carrying the signing time in seconds since the Unix epoch.
pub(crate) const TIME_PARAM: &str = "createdAt";
