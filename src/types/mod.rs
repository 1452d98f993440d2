//! Shared request and response types.

use base64::Engine as _;
use bytes::Bytes;
use http::{Method, StatusCode};

use crate::{
    auth::Region,
    error::{Error, Result},
    signing::{Signable, SignedHeaders},
};

/// Disposition hint returned with downloads when the caller names none.
pub const DEFAULT_DISPOSITION: &str = "inline";

/// Object content as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    /// Raw bytes, used as-is.
    Raw(Bytes),
    /// Base64 text, decoded before signing.
    Base64(String),
}

impl Content {
    /// Returns the bytes that will be signed and sent.
    pub fn decode(self) -> Result<Bytes> {
        match self {
            Self::Raw(bytes) => Ok(bytes),
            Self::Base64(text) => decode_base64(&text).map(Bytes::from),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Raw(Bytes::new())
    }
}

impl From<Bytes> for Content {
    fn from(value: Bytes) -> Self {
        Self::Raw(value)
    }
}

impl From<Vec<u8>> for Content {
    fn from(value: Vec<u8>) -> Self {
        Self::Raw(Bytes::from(value))
    }
}

impl From<&'static [u8]> for Content {
    fn from(value: &'static [u8]) -> Self {
        Self::Raw(Bytes::from_static(value))
    }
}

// Line breaks are common in pasted Base64 and carry no data.
fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let compact = text
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::decode("content is not valid base64", Some(Box::new(e))))
}

/// A single object request, ready to be signed.
///
/// The path is stored percent-encoded and without leading slashes, so the
/// request URL and the canonical request always use the same bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    bucket: String,
    region: Option<Region>,
    path: String,
    payload: Bytes,
    headers_to_sign: SignedHeaders,
    content_type: String,
}

impl RequestDescriptor {
    /// Describes an upload, signed with [`SignedHeaders::put`].
    pub fn put(bucket: impl Into<String>, path: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::PUT, bucket, path, SignedHeaders::put())
    }

    /// Describes a download, signed with [`SignedHeaders::get`].
    pub fn get(bucket: impl Into<String>, path: impl AsRef<str>) -> Result<Self> {
        Self::new(Method::GET, bucket, path, SignedHeaders::get())
    }

    /// Builds a descriptor with an explicit header set.
    pub fn new(
        method: Method,
        bucket: impl Into<String>,
        path: impl AsRef<str>,
        headers_to_sign: SignedHeaders,
    ) -> Result<Self> {
        if method != Method::GET && method != Method::PUT {
            return Err(Error::invalid_config("only GET and PUT requests are supported"));
        }
        let bucket = bucket.into();
        if bucket.trim().is_empty() {
            return Err(Error::invalid_config("bucket must not be empty"));
        }

        Ok(Self {
            method,
            bucket,
            region: None,
            path: crate::util::encode::object_path(path.as_ref())?,
            payload: Bytes::new(),
            headers_to_sign,
            content_type: String::new(),
        })
    }

    /// Overrides the configured default region.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_headers_to_sign(mut self, headers: SignedHeaders) -> Self {
        self.headers_to_sign = headers;
        self
    }

    pub(crate) fn payload_bytes(&self) -> &Bytes {
        &self.payload
    }
}

impl Signable for RequestDescriptor {
    fn method(&self) -> &Method {
        &self.method
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn headers_to_sign(&self) -> &SignedHeaders {
        &self.headers_to_sign
    }
}

/// Output from an upload.
#[derive(Debug)]
pub struct UploadOutput {
    /// Status returned by the provider.
    pub status: StatusCode,
    /// Entity tag, if provided.
    pub etag: Option<String>,
}

/// Output from a download.
#[derive(Debug)]
pub struct DownloadOutput {
    /// Status returned by the provider.
    pub status: StatusCode,
    /// Full response body.
    pub body: Bytes,
    /// Content type, if provided.
    pub content_type: Option<String>,
    /// Content length, if provided.
    pub content_length: Option<u64>,
    /// Entity tag, if provided.
    pub etag: Option<String>,
    /// Presentation hint chosen by the caller (`inline` unless overridden).
    pub disposition: String,
}
