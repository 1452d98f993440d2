pub(crate) fn redact_value(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return "<redacted>".to_string();
    }

    let head = value.chars().take(4).collect::<String>();
    let tail = value
        .chars()
        .rev()
        .take(4)
        .collect::<String>()
        .chars()
        .rev()
        .collect::<String>();

    if head.len() + tail.len() >= value.len() {
        return "<redacted>".to_string();
    }

    format!("{head}...{tail}")
}

/// Hides the signature part of an `Authorization` value for logs.
#[cfg(feature = "tracing")]
pub(crate) fn redact_authorization(value: &str) -> String {
    match value.split_once("Signature=") {
        Some((head, _)) => format!("{head}Signature=<redacted>"),
        None => "<redacted>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_values_consistently() {
        assert_eq!(redact_value(""), "<redacted>");
        assert_eq!(redact_value("   "), "<redacted>");
        assert_eq!(redact_value("12345678"), "<redacted>");
        assert_eq!(redact_value("123456789"), "1234...6789");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn redacts_signature_only() {
        assert_eq!(
            redact_authorization("AWS4-HMAC-SHA256 Credential=a/b, SignedHeaders=host, Signature=abc"),
            "AWS4-HMAC-SHA256 Credential=a/b, SignedHeaders=host, Signature=<redacted>"
        );
        assert_eq!(redact_authorization("garbage"), "<redacted>");
    }
}
