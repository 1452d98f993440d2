use crate::error::{Error, Result};

fn is_unreserved(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~')
}

/// Percent-encodes an object path, keeping `/` separators.
pub(crate) fn aws_percent_encode_path(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if is_unreserved(b) || b == b'/' {
            out.push(b as char);
            continue;
        }

        out.push('%');
        out.push(hex_upper(b >> 4));
        out.push(hex_upper(b & 0x0F));
    }
    out
}

/// Encoded object path as placed after the `/` that starts the request path.
///
/// The path is kept as given, leading slashes included. `.` and `..` segments
/// are rejected: URL normalization would drop them from the request line while
/// the canonical request still carried them.
pub(crate) fn object_path(raw: &str) -> Result<String> {
    if raw.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(Error::invalid_config(format!(
            "object path must not contain `.` or `..` segments: {raw}"
        )));
    }
    Ok(aws_percent_encode_path(raw))
}

fn hex_upper(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        10..=15 => (b'A' + (nibble - 10)) as char,
        _ => '0',
    }
}
