//! A lean SigV4-signed object client for DigitalOcean Spaces.
//!
//! ## Quick start
//!
//! ```no_run
//! # fn demo() -> Result<(), spaces::Error> {
//! use spaces::{BlockingClient, Config};
//!
//! let client = BlockingClient::builder(Config::from_env()?).build()?;
//!
//! client
//!     .objects()
//!     .put("my-bucket", "notes/hello.txt")
//!     .content_type("text/plain")
//!     .body_bytes(&b"hello"[..])
//!     .send()?;
//!
//! let obj = client.objects().get("my-bucket", "notes/hello.txt").send()?;
//! println!("{} bytes ({:?})", obj.body.len(), obj.content_type);
//! # Ok(())
//! # }
//! ```
//!
//! ## Signing without sending
//!
//! ```
//! # fn demo() -> Result<(), spaces::Error> {
//! use spaces::{Config, Credentials, RequestDescriptor, Signer};
//!
//! let config = Config::new().credentials(Credentials::new("AKIDEXAMPLE", "secret")?);
//! let request = RequestDescriptor::put("mybucket", "test.txt")?.with_payload(&b"hello"[..]);
//! let signed = Signer::new(config).sign(&request, time::OffsetDateTime::now_utc())?;
//! assert!(signed.authorization().starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

#[cfg(all(
    feature = "rustls",
    feature = "native-tls",
    not(feature = "allow-both-tls")
))]
compile_error!("Enable only one of: rustls, native-tls.");

/// Object operations and request builders.
pub mod api;
/// Endpoint and region presets.
pub mod endpoint;
/// Shared request/response types.
pub mod types;

mod auth;
mod client;
mod error;
mod signing;
mod transport;
mod util;

pub use auth::{Config, Credentials, DEFAULT_REGION, Region};
pub use client::{BlockingClient, BlockingClientBuilder};
pub use endpoint::{Endpoint, SpacesRegion};
pub use error::{Error, Result};
pub use signing::{
    EMPTY_PAYLOAD_SHA256, Signable, SignedHeader, SignedHeaders, SignedRequest, Signer,
};
pub use types::{Content, DownloadOutput, RequestDescriptor, UploadOutput};
