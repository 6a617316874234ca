use crate::error::Error;

/// Checks a candidate variable name: a letter or underscore first, then
/// letters, digits or underscores. ASCII only, no surrounding whitespace.
#[inline]
pub fn is_valid_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    match bytes.first() {
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes[1..]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

pub fn validate_key(key: &str) -> Result<&str, Error> {
    if is_valid_key(key) {
        Ok(key)
    } else {
        Err(Error::InvalidKey { key: key.to_string() })
    }
}
