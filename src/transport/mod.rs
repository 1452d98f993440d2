//! Blocking HTTP plumbing. One attempt per request: nothing here retries.

pub(crate) mod blocking;
#[cfg(feature = "rustls")]
pub(crate) mod tls;
