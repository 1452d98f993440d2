//! Endpoint and region presets for DigitalOcean Spaces.

use std::net::IpAddr;

use url::Url;

use crate::{Error, Region, Result};

/// Domain under which Spaces serves `{bucket}.{region}` hosts.
pub const SPACES_DOMAIN: &str = "digitaloceanspaces.com";

/// Datacenter regions where Spaces is available.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpacesRegion {
    /// nyc3
    Nyc3,
    /// ams3
    Ams3,
    /// sgp1
    Sgp1,
    /// sfo2
    Sfo2,
    /// sfo3
    Sfo3,
    /// fra1
    Fra1,
    /// syd1
    Syd1,
    /// blr1
    Blr1,
    /// Custom region string.
    Other(String),
}

impl SpacesRegion {
    /// Creates a custom region variant.
    pub fn other(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::invalid_config("region must not be empty"));
        }
        Ok(Self::Other(value))
    }

    /// Returns the region identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Nyc3 => "nyc3",
            Self::Ams3 => "ams3",
            Self::Sgp1 => "sgp1",
            Self::Sfo2 => "sfo2",
            Self::Sfo3 => "sfo3",
            Self::Fra1 => "fra1",
            Self::Syd1 => "syd1",
            Self::Blr1 => "blr1",
            Self::Other(v) => v,
        }
    }

    /// Converts into the signing region.
    pub fn region(&self) -> Result<Region> {
        Region::new(self.as_str())
    }
}

impl std::str::FromStr for SpacesRegion {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::invalid_config("region must not be empty"));
        }
        Ok(match value {
            "nyc3" => Self::Nyc3,
            "ams3" => Self::Ams3,
            "sgp1" => Self::Sgp1,
            "sfo2" => Self::Sfo2,
            "sfo3" => Self::Sfo3,
            "fra1" => Self::Fra1,
            "syd1" => Self::Syd1,
            "blr1" => Self::Blr1,
            other => Self::Other(other.to_string()),
        })
    }
}

/// Where requests are sent: `{scheme}://{bucket}.{region}.{domain}/{path}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    domain: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::spaces()
    }
}

impl Endpoint {
    /// The public Spaces endpoint over HTTPS.
    pub fn spaces() -> Self {
        Self {
            scheme: "https".to_string(),
            domain: SPACES_DOMAIN.to_string(),
        }
    }

    /// A SigV4-compatible service using the same virtual-hosted layout.
    ///
    /// `base` is a scheme and domain such as `https://example.net`; bucket and
    /// region labels are prepended to its host.
    pub fn custom(base: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base.as_ref())
            .map_err(|_| Error::invalid_config("endpoint must be a valid absolute URL"))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::invalid_config(
                "endpoint scheme must be http or https",
            ));
        }
        let Some(host) = url.host_str() else {
            return Err(Error::invalid_config("endpoint must include host"));
        };
        if host.parse::<IpAddr>().is_ok() || host.starts_with('[') {
            return Err(Error::invalid_config(
                "endpoint host must be a domain name",
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::invalid_config(
                "endpoint must not include query or fragment",
            ));
        }
        if url.path() != "/" && !url.path().is_empty() {
            return Err(Error::invalid_config("endpoint must not include a path"));
        }

        let domain = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            domain,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Virtual-hosted host for a bucket in a region.
    pub fn host(&self, bucket: &str, region: &Region) -> Result<String> {
        if !is_dns_compatible_bucket(bucket) {
            return Err(Error::invalid_config(
                "bucket is not DNS compatible for virtual-hosted-style",
            ));
        }
        Ok(format!("{bucket}.{}.{}", region.as_str(), self.domain))
    }

    /// Request URL for an already-encoded object path.
    ///
    /// The URL path is exactly `/` followed by `encoded_path`, the same bytes
    /// the signer puts in the canonical request.
    pub(crate) fn object_url(&self, host: &str, encoded_path: &str) -> Result<Url> {
        let url = Url::parse(&format!("{}://{host}/{encoded_path}", self.scheme))
            .map_err(|_| Error::invalid_config("object URL is not valid"))?;
        if url.path().strip_prefix('/') != Some(encoded_path) {
            return Err(Error::invalid_config(format!(
                "object path would be rewritten in the request URL: /{encoded_path}"
            )));
        }
        Ok(url)
    }
}

fn is_dns_compatible_bucket(bucket: &str) -> bool {
    let bytes = bucket.as_bytes();
    if bytes.len() < 3 || bytes.len() > 63 {
        return false;
    }

    let is_allowed = |b: u8| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.');
    if !bytes.iter().all(|&b| is_allowed(b)) {
        return false;
    }

    let starts_ok = matches!(bytes[0], b'a'..=b'z' | b'0'..=b'9');
    let ends_ok = matches!(bytes[bytes.len() - 1], b'a'..=b'z' | b'0'..=b'9');
    if !starts_ok || !ends_ok {
        return false;
    }

    if bucket.contains("..") {
        return false;
    }

    bucket.parse::<IpAddr>().is_err()
}
