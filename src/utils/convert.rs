use tracing::error;

use crate::ConvertError;
use crate::Result;

/// Borrows `bytes` as UTF-8 text. `field` names the argument in the error.
pub fn bytes_to_str<'a>(
    bytes: &'a [u8],
    field: &'static str,
) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|source| ConvertError::InvalidUtf8 { field, source }.into())
}

/// Encodes a `u64` as decimal text.
///
/// # Examples
/// ```
/// use d_engine_stable_store::convert::encode_u64;
///
/// assert_eq!(encode_u64(100), b"100".to_vec());
/// ```
pub fn encode_u64(num: u64) -> Vec<u8> {
    num.to_string().into_bytes()
}

/// Decodes decimal text produced by [`encode_u64`].
pub fn decode_u64<V: AsRef<[u8]>>(bytes: V) -> Result<u64> {
    let bytes = bytes.as_ref();
    let text = bytes_to_str(bytes, "value")?;

    text.parse::<u64>().map_err(|e| {
        error!(%text, "stored value is not a decimal u64");
        ConvertError::ConversionFailure(format!("{text:?} is not a decimal u64: {e}")).into()
    })
}
