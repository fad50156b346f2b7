use {
    crate::{
        canonical::{decode_query_element, CanonicalUri},
        constants::{API_KEY_PARAM, MSG_MISSING_API_KEY},
        SignatureError, Signer,
    },
    chrono::{DateTime, Utc},
    http::uri::Uri,
    log::debug,
    qualifier_attr::qualifiers,
    std::{collections::HashMap, str::FromStr},
};

/// A set of [`Signer`]s indexed by API key identifier, for services that accept URLs from more
/// than one client.
///
/// The `apiKey` parameter of an incoming URL is unauthenticated until its MAC has been checked. The
/// keyring uses it only to pick the signer whose secret must have produced the MAC, so a URL signed
/// with one client's secret cannot be presented under another client's key identifier.
#[derive(Clone, Debug, Default)]
pub struct Keyring {
    signers: HashMap<String, Signer>,
}

impl Keyring {
    /// Create an empty keyring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signer under its API key identifier, returning the signer it replaced, if any.
    pub fn insert(&mut self, signer: Signer) -> Option<Signer> {
        self.signers.insert(signer.api_key().to_string(), signer)
    }

    /// Retrieve the signer registered for `api_key`.
    pub fn get(&self, api_key: &str) -> Option<&Signer> {
        self.signers.get(api_key)
    }

    /// Remove the signer registered for `api_key`.
    pub fn remove(&mut self, api_key: &str) -> Option<Signer> {
        self.signers.remove(api_key)
    }

    /// Number of registered signers.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Indicates whether no signers are registered.
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Validate `uri` against the signer registered for its `apiKey`, using the current time.
    pub fn validate(&self, uri: &Uri) -> bool {
        self.validate_at(uri, Utc::now())
    }

    /// Validate `uri` against the signer registered for its `apiKey`, as of `server_timestamp`.
    /// Unknown or missing API keys are rejected.
    pub fn validate_at(&self, uri: &Uri, server_timestamp: DateTime<Utc>) -> bool {
        match self.verify_at(uri, server_timestamp) {
            Ok(()) => true,
            Err(e) => {
                debug!("keyring: rejected signed request: {}", e);
                false
            }
        }
    }

    /// Validate a URI string against the signer registered for its `apiKey`, using the current
    /// time. The scheme, authority, and path are checked exactly as written.
    pub fn validate_str(&self, uri: &str) -> bool {
        self.validate_str_at(uri, Utc::now())
    }

    /// Validate a URI string against the signer registered for its `apiKey`, as of
    /// `server_timestamp`.
    pub fn validate_str_at(&self, uri: &str, server_timestamp: DateTime<Utc>) -> bool {
        let canonical = match CanonicalUri::from_str(uri) {
            Ok(canonical) => canonical,
            Err(e) => {
                debug!("keyring: could not parse URI: {}", e);
                return false;
            }
        };

        match self.verify_canonical(&canonical, server_timestamp) {
            Ok(()) => true,
            Err(e) => {
                debug!("keyring: rejected signed request: {}", e);
                false
            }
        }
    }

    /// Select the signer for the `apiKey` of `uri` and verify with it.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn verify_at(&self, uri: &Uri, server_timestamp: DateTime<Utc>) -> Result<(), SignatureError> {
        self.verify_canonical(&CanonicalUri::from_uri(uri), server_timestamp)
    }

    fn verify_canonical(&self, canonical: &CanonicalUri, server_timestamp: DateTime<Utc>) -> Result<(), SignatureError> {
        let raw_api_key = canonical
            .first(API_KEY_PARAM)
            .ok_or_else(|| SignatureError::MissingAuthenticationToken(MSG_MISSING_API_KEY.to_string()))?;
        let api_key = decode_query_element(raw_api_key).ok_or_else(|| {
            SignatureError::MalformedQueryString(format!("'apiKey' is not a valid percent-encoded value: '{}'", raw_api_key))
        })?;

        match self.signers.get(&api_key) {
            Some(signer) => signer.verify_canonical(canonical, server_timestamp),
            None => Err(SignatureError::UnknownApiKey(api_key)),
        }
    }
}

impl FromIterator<Signer> for Keyring {
    fn from_iter<I: IntoIterator<Item = Signer>>(iter: I) -> Self {
        let mut result = Self::new();
        for signer in iter {
            result.insert(signer);
        }
        result
    }
}

impl Extend<Signer> for Keyring {
    fn extend<I: IntoIterator<Item = Signer>>(&mut self, iter: I) {
        for signer in iter {
            self.insert(signer);
        }
    }
}
