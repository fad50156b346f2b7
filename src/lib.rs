//! The `hmac_url_signer` crate signs and validates URLs with a shared secret, so a client and a
//! server can prove that a URL was issued by a holder of the secret and that it was issued
//! recently, without keeping any session state.
//!
//! A signed URL carries three extra query parameters:
//! * `createdAt`: the signing time in seconds since the Unix epoch.
//! * `apiKey`: the signer's key identifier.
//! * `mac`: the lowercase hex HMAC-SHA256 of the canonical URL (scheme, authority, path, and query
//!   parameters, with `mac` itself absent).
//!
//! Validation recomputes the MAC and checks that `createdAt` is within 5 minutes (by default) of
//! the validating clock. It answers only `true` or `false`; callers that want the reason can turn
//! on `debug` logging for this crate.
//!
//! This is not a session or authentication system. There is no revocation and no replay cache; a
//! signed URL can be reused until its window closes.
//!
//! # Workflow
//! 1. Create a [`Signer`] from an API key identifier and a base64-encoded secret, either directly
//!    with [`Signer::new`] or via [`SignerConfig`].
//! 2. Call [`Signer::sign`] on the URL to hand out.
//! 3. On the receiving side, call [`Signer::validate`] with a signer built from the same secret.
//!    Services holding secrets for several clients should use a [`Keyring`], which picks the signer
//!    that matches the URL's `apiKey`.
//!
//! ## Example
//! ```rust
//! use hmac_url_signer::Signer;
//!
//! // base64("secret")
//! let signer = Signer::new("api-key", "c2VjcmV0").unwrap();
//!
//! let url = "https://stg.api.ogq.me/cps/products?creatorId=567890".parse().unwrap();
//! let signed = signer.sign(&url).unwrap();
//! assert!(signed.query().unwrap().starts_with("creatorId=567890&createdAt="));
//! assert!(signer.validate(&signed));
//!
//! // Any change to the signed URL invalidates it.
//! let tampered = signed.to_string().replace("creatorId=567890", "creatorId=567891");
//! assert!(!signer.validate_str(&tampered));
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod canonical;
mod chronoutil;
mod config;
mod constants;
mod crypto;
mod error;
mod keyring;
mod secret_key;
mod signer;

pub use {
    canonical::CanonicalUri,
    config::{SignerConfig, SignerConfigBuilder},
    error::{SignatureError, SignerError},
    keyring::Keyring,
    secret_key::SecretKey,
    signer::Signer,
};
