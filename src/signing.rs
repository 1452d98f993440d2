//! AWS Signature Version 4 request signing.
//!
//! The signer is a pure function of the request, the configured credentials
//! and one timestamp: it performs no I/O and keeps no state between calls.

use std::{fmt, str::FromStr};

use hmac::{Hmac, Mac as _};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use sha2::{Digest as _, Sha256};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    auth::{Config, Credentials, Region},
    endpoint::Endpoint,
    error::{Error, Result},
};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const TERMINATOR: &str = "aws4_request";
/// `content-disposition` is only ever signed with this value.
const INLINE_DISPOSITION: &str = "inline";

/// A header the signer knows how to derive.
///
/// Variants are declared in lexicographic order of their wire names, which is
/// the order SigV4 requires in the canonical request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignedHeader {
    /// `content-disposition`, always `inline`.
    ContentDisposition,
    /// `content-length`, the payload size in bytes.
    ContentLength,
    /// `content-type`, as supplied by the request.
    ContentType,
    /// `host`, the virtual-hosted bucket host.
    Host,
    /// `x-amz-content-sha256`, the hex payload digest.
    XAmzContentSha256,
    /// `x-amz-date`, the request timestamp.
    XAmzDate,
}

impl SignedHeader {
    /// Every supported header, in signing order.
    pub const ALL: [Self; 6] = [
        Self::ContentDisposition,
        Self::ContentLength,
        Self::ContentType,
        Self::Host,
        Self::XAmzContentSha256,
        Self::XAmzDate,
    ];

    /// Lower-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContentDisposition => "content-disposition",
            Self::ContentLength => "content-length",
            Self::ContentType => "content-type",
            Self::Host => "host",
            Self::XAmzContentSha256 => "x-amz-content-sha256",
            Self::XAmzDate => "x-amz-date",
        }
    }
}

impl fmt::Display for SignedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignedHeader {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::invalid_config(format!("unsupported signed header: {value}")))
    }
}

/// Ordered, duplicate-free set of headers to sign.
///
/// Names are kept in [`SignedHeader::ALL`] order whatever order they were
/// supplied in. That order is lexicographic, so the canonical headers and the
/// `SignedHeaders=` list always come out sorted as SigV4 expects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SignedHeaders(Vec<SignedHeader>);

impl SignedHeaders {
    pub fn new(headers: impl IntoIterator<Item = SignedHeader>) -> Self {
        let mut headers = headers.into_iter().collect::<Vec<_>>();
        headers.sort_unstable();
        headers.dedup();
        Self(headers)
    }

    /// Headers signed on uploads.
    pub fn put() -> Self {
        Self::new([
            SignedHeader::ContentLength,
            SignedHeader::ContentType,
            SignedHeader::Host,
            SignedHeader::XAmzContentSha256,
            SignedHeader::XAmzDate,
        ])
    }

    /// Headers signed on downloads.
    pub fn get() -> Self {
        Self::new([
            SignedHeader::ContentDisposition,
            SignedHeader::Host,
            SignedHeader::XAmzContentSha256,
            SignedHeader::XAmzDate,
        ])
    }

    pub fn contains(&self, header: SignedHeader) -> bool {
        self.0.contains(&header)
    }

    pub fn iter(&self) -> impl Iterator<Item = SignedHeader> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SignedHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, header) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(";")?;
            }
            f.write_str(header.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for SignedHeaders {
    type Err = Error;

    /// Parses the `;`-joined form used in `SignedHeaders=`.
    fn from_str(value: &str) -> Result<Self> {
        let headers = value
            .split(';')
            .filter(|name| !name.trim().is_empty())
            .map(SignedHeader::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(headers))
    }
}

impl FromIterator<SignedHeader> for SignedHeaders {
    fn from_iter<I: IntoIterator<Item = SignedHeader>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Anything that can describe a single signed object request.
pub trait Signable {
    /// HTTP method, `GET` or `PUT`.
    fn method(&self) -> &Method;
    fn bucket(&self) -> &str;
    /// Region override; `None` falls back to the configured default.
    fn region(&self) -> Option<&Region>;
    /// Object path, already percent-encoded. The request path is `/` followed
    /// by this value.
    fn path(&self) -> &str;
    fn payload(&self) -> &[u8];
    fn content_type(&self) -> &str;
    fn headers_to_sign(&self) -> &SignedHeaders;
}

/// Headers produced for one request: the canonical headers followed by
/// `Authorization`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    headers: Vec<(SignedHeader, String)>,
    authorization: String,
}

impl SignedRequest {
    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Looks up a header value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("authorization") {
            return Some(&self.authorization);
        }
        self.headers
            .iter()
            .find(|(header, _)| header.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All headers in signing order, `Authorization` last.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.headers
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_str()))
            .chain(std::iter::once((
                "Authorization",
                self.authorization.as_str(),
            )))
    }

    /// Number of headers including `Authorization`.
    pub fn len(&self) -> usize {
        self.headers.len() + 1
    }

    /// Always false: a signed request carries at least `Authorization`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Converts into a header map for the transport.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.len());
        for (header, value) in &self.headers {
            let value = HeaderValue::from_str(value).map_err(|_| {
                Error::signing(format!("invalid {} header value", header.as_str()))
            })?;
            map.insert(HeaderName::from_static(header.as_str()), value);
        }
        let value = HeaderValue::from_str(&self.authorization)
            .map_err(|_| Error::signing("invalid authorization header value"))?;
        map.insert(http::header::AUTHORIZATION, value);
        Ok(map)
    }
}

/// Produces SigV4 headers for object requests.
#[derive(Clone, Debug)]
pub struct Signer {
    config: Config,
    endpoint: Endpoint,
}

impl Signer {
    /// Signer for the public Spaces endpoint.
    pub fn new(config: Config) -> Self {
        Self::with_endpoint(config, Endpoint::spaces())
    }

    pub fn with_endpoint(config: Config, endpoint: Endpoint) -> Self {
        Self { config, endpoint }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Region the request will be signed for.
    pub fn region_for<'a, R>(&'a self, request: &'a R) -> &'a Region
    where
        R: Signable + ?Sized,
    {
        request.region().unwrap_or_else(|| self.config.region())
    }

    /// Host the request will be signed for and sent to.
    pub fn host_for<R>(&self, request: &R) -> Result<String>
    where
        R: Signable + ?Sized,
    {
        self.endpoint
            .host(request.bucket(), self.region_for(request))
    }

    /// Signs `request` at `now`.
    ///
    /// Fails with [`Error::InvalidConfig`] when credentials are missing or
    /// blank; nothing is hashed in that case.
    pub fn sign<R>(&self, request: &R, now: OffsetDateTime) -> Result<SignedRequest>
    where
        R: Signable + ?Sized,
    {
        let credentials = self.config.signing_credentials()?;
        let region = self.region_for(request);
        let host = self.host_for(request)?;
        let now = now.to_offset(UtcOffset::UTC);

        let payload = request.payload();
        let payload_hash = sha256_hex(payload);
        let amz_date = amz_datetime(now);
        let signed_headers = request.headers_to_sign();

        let headers = signed_headers
            .iter()
            .map(|header| {
                let value = match header {
                    SignedHeader::ContentDisposition => INLINE_DISPOSITION.to_string(),
                    SignedHeader::ContentLength => payload.len().to_string(),
                    SignedHeader::ContentType => request.content_type().to_string(),
                    SignedHeader::Host => host.clone(),
                    SignedHeader::XAmzContentSha256 => payload_hash.clone(),
                    SignedHeader::XAmzDate => amz_date.clone(),
                };
                (header, value)
            })
            .collect::<Vec<_>>();

        let canonical_request = canonical_request(
            request.method(),
            request.path(),
            &canonical_headers(&headers),
            &signed_headers.to_string(),
            &payload_hash,
        );
        let string_to_sign = string_to_sign(region, now, &canonical_request);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %request.method(),
            host = %host,
            signed_headers = %signed_headers,
            amz_date = %amz_date,
            "built canonical request"
        );

        let signature = signature(credentials, region, now, &string_to_sign)?;
        let authorization = format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            credentials.access_key_id,
            credential_scope(region, now),
            signed_headers,
            signature
        );

        Ok(SignedRequest {
            headers,
            authorization,
        })
    }
}

/// Hex SHA-256 of the empty payload.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn canonical_headers(headers: &[(SignedHeader, String)]) -> String {
    let mut out = String::new();
    for (header, value) in headers {
        out.push_str(header.as_str());
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
    out
}

fn canonical_request(
    method: &Method,
    path: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    // The query string line is always empty: no query parameters are signed.
    format!("{method}\n/{path}\n\n{canonical_headers}\n{signed_headers}\n{payload_hash}")
}

fn string_to_sign(region: &Region, now: OffsetDateTime, canonical_request: &str) -> String {
    let amz_date = amz_datetime(now);
    let scope = credential_scope(region, now);
    let hashed = sha256_hex(canonical_request.as_bytes());
    format!("{ALGORITHM}\n{amz_date}\n{scope}\n{hashed}")
}

fn signature(
    credentials: &Credentials,
    region: &Region,
    now: OffsetDateTime,
    string_to_sign: &str,
) -> Result<String> {
    let k_date = hmac_sha256(
        format!("AWS4{}", credentials.secret_access_key).as_bytes(),
        date_stamp(now).as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_str().as_bytes())?;
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes())?;
    let k_signing = hmac_sha256(&k_service, TERMINATOR.as_bytes())?;
    let sig = hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
    Ok(hex::encode(sig))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|_| Error::signing("invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn date_stamp(now: OffsetDateTime) -> String {
    let year = now.year();
    let month = now.month() as u8;
    let day = now.day();
    format!("{year:04}{month:02}{day:02}")
}

fn amz_datetime(now: OffsetDateTime) -> String {
    let hour = now.hour();
    let minute = now.minute();
    let second = now.second();
    format!("{}T{hour:02}{minute:02}{second:02}Z", date_stamp(now))
}

fn credential_scope(region: &Region, now: OffsetDateTime) -> String {
    format!(
        "{}/{}/{SERVICE}/{TERMINATOR}",
        date_stamp(now),
        region.as_str()
    )
}
