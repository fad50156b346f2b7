use {
    crate::SignerError,
    base64::{
        alphabet,
        engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
        Engine,
    },
    std::{
        fmt::{Debug, Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Base64 engine for configured secrets. Padding is optional and non-canonical trailing bits are
/// accepted so that secrets issued by lenient encoders still decode.
const SECRET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A decoded shared secret.
///
/// The key material is never printed by the `Debug` or `Display` implementations.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    key: Vec<u8>,
}

impl SecretKey {
    /// Decode a secret from its base64 configuration value.
    pub fn from_base64(encoded: &str) -> Result<Self, SignerError> {
        let key = SECRET_ENGINE.decode(encoded.trim())?;
        Ok(Self {
            key,
        })
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
        }
    }

    /// Length of the key in bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Indicates whether the key is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl AsRef<[u8]> for SecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.key
    }
}

impl FromStr for SecretKey {
    type Err = SignerError;

    /// Decode a secret from its base64 configuration value.
    fn from_str(encoded: &str) -> Result<Self, SignerError> {
        Self::from_base64(encoded)
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("SecretKey")
    }
}

impl Display for SecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("SecretKey")
    }
}
