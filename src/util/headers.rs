use http::{HeaderMap, header::AsHeaderName};

pub(crate) fn header_string<N>(headers: &HeaderMap, name: N) -> Option<String>
where
    N: AsHeaderName,
{
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

pub(crate) fn header_u64<N>(headers: &HeaderMap, name: N) -> Option<u64>
where
    N: AsHeaderName,
{
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_string_and_numeric_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", http::HeaderValue::from_static("42"));
        headers.insert("etag", http::HeaderValue::from_static("\"abc\""));

        assert_eq!(header_u64(&headers, "content-length"), Some(42));
        assert_eq!(header_string(&headers, "etag").as_deref(), Some("\"abc\""));
        assert_eq!(header_u64(&headers, "etag"), None);
        assert_eq!(header_string(&headers, "x-missing"), None);
    }
}
