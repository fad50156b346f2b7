use {
    crate::constants::SHA256_OUTPUT_LEN,
    hmac::{digest::InvalidLength, Hmac, Mac},
    sha2::Sha256,
};

type HmacSha256 = Hmac<Sha256>;

/// Wrapper function to form a HMAC-SHA256 operation. A fresh MAC state is created for every call.
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> Result<[u8; SHA256_OUTPUT_LEN], InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(value);
    let tag = mac.finalize().into_bytes();

    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(tag.as_slice());
    Ok(result)
}

/// HMAC-SHA256 of `value`, rendered as 64 lowercase hex characters.
#[inline(always)]
pub(crate) fn hmac_sha256_hex(key: &[u8], value: &[u8]) -> Result<String, InvalidLength> {
    hmac_sha256(key, value).map(hex::encode)
}
