use std::fmt;

use crate::error::Error;

/// Region used when neither the request nor the environment names one.
pub const DEFAULT_REGION: &str = "nyc3";

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    pub fn new(value: impl Into<String>) -> Result<Self, Error> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::invalid_config("region must not be empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Region {
    fn default() -> Self {
        Self(DEFAULT_REGION.to_string())
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Region").field(&self.0).finish()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Region {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Result<Self, Error> {
        let creds = Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        };
        creds.validate()?;
        Ok(creds)
    }

    /// Fields are public, so the signer re-checks them before every use.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.access_key_id.trim().is_empty() {
            return Err(Error::invalid_config("access_key_id must not be empty"));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(Error::invalid_config("secret_access_key must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "access_key_id",
                &crate::util::redact::redact_value(&self.access_key_id),
            )
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Process-wide settings shared by the signer and the client.
///
/// Built once at startup and cloned into whatever needs it; nothing reads
/// configuration from a global.
#[derive(Clone, Debug, Default)]
pub struct Config {
    credentials: Option<Credentials>,
    default_region: Region,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `SPACES_ACCESS_KEY_ID`, `SPACES_SECRET_ACCESS_KEY` and the optional
    /// `SPACES_REGION`.
    pub fn from_env() -> Result<Self, Error> {
        let access_key_id = std::env::var("SPACES_ACCESS_KEY_ID")
            .map_err(|_| Error::invalid_config("missing SPACES_ACCESS_KEY_ID"))?;
        let secret_access_key = std::env::var("SPACES_SECRET_ACCESS_KEY")
            .map_err(|_| Error::invalid_config("missing SPACES_SECRET_ACCESS_KEY"))?;

        let mut config = Self::new().credentials(Credentials::new(
            access_key_id,
            secret_access_key,
        )?);
        if let Ok(region) = std::env::var("SPACES_REGION") {
            config = config.default_region(Region::new(region)?);
        }
        Ok(config)
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn default_region(mut self, region: Region) -> Self {
        self.default_region = region;
        self
    }

    pub fn region(&self) -> &Region {
        &self.default_region
    }

    /// Returns usable credentials or a configuration error.
    pub(crate) fn signing_credentials(&self) -> Result<&Credentials, Error> {
        let creds = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::invalid_config("credentials are not configured"))?;
        creds.validate()?;
        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_nyc3_and_has_no_credentials() {
        let config = Config::default();
        assert_eq!(config.region().as_str(), "nyc3");
        assert!(matches!(
            config.signing_credentials(),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn blank_credentials_are_rejected() {
        assert!(Credentials::new("", "secret").is_err());
        assert!(Credentials::new("AKID", "  ").is_err());

        let config = Config::new().credentials(Credentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: String::new(),
        });
        assert!(config.signing_credentials().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI").unwrap();
        let out = format!("{creds:?}");
        assert!(out.contains("AKID...MPLE"));
        assert!(!out.contains("wJalrXUtnFEMI"));
    }

    #[test]
    fn region_rejects_blank() {
        assert!(Region::new(" ").is_err());
        assert_eq!(Region::try_from("ams3").unwrap().to_string(), "ams3");
    }
}
