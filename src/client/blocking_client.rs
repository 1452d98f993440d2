use std::{sync::Arc, time::Duration};

use time::OffsetDateTime;

use crate::{
    api,
    auth::Config,
    endpoint::Endpoint,
    error::Result,
    signing::{Signable as _, Signer},
    transport::blocking::{Body, Response, Transport},
    types::RequestDescriptor,
};

/// Blocking Spaces client. Cheap to clone; clones share one connection agent.
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<Inner>,
}

pub struct BlockingClientBuilder {
    config: Config,
    endpoint: Endpoint,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

struct Inner {
    signer: Signer,
    transport: Transport,
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("signer", &self.inner.signer)
            .finish_non_exhaustive()
    }
}

impl BlockingClient {
    pub fn builder(config: Config) -> BlockingClientBuilder {
        BlockingClientBuilder::new(config)
    }

    pub fn objects(&self) -> api::ObjectsService {
        api::ObjectsService::new(self.clone())
    }

    pub fn signer(&self) -> &Signer {
        &self.inner.signer
    }

    /// Signs the descriptor at the current time and performs one request.
    pub(crate) fn execute(&self, descriptor: &RequestDescriptor) -> Result<Response> {
        let signer = &self.inner.signer;
        let host = signer.host_for(descriptor)?;

        #[cfg(feature = "tracing")]
        let _guard = tracing::info_span!(
            "spaces.request",
            method = %descriptor.method(),
            bucket = descriptor.bucket(),
            path = descriptor.path(),
            host = host.as_str(),
        )
        .entered();

        let signed = signer.sign(descriptor, OffsetDateTime::now_utc())?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            authorization = %crate::util::redact::redact_authorization(signed.authorization()),
            "signed request"
        );

        let url = signer.endpoint().object_url(&host, descriptor.path())?;
        let headers = signed.to_header_map()?;

        self.inner.transport.send(
            descriptor.method().clone(),
            url,
            headers,
            Body::from_payload(descriptor.payload_bytes()),
        )
    }
}

impl BlockingClientBuilder {
    fn new(config: Config) -> Self {
        Self {
            config,
            endpoint: Endpoint::spaces(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Sends requests somewhere other than the public Spaces domain.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Global per-request timeout covering connect, send and receive.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<BlockingClient> {
        let transport = Transport::new(self.user_agent, self.timeout)?;

        Ok(BlockingClient {
            inner: Arc::new(Inner {
                signer: Signer::with_endpoint(self.config, self.endpoint),
                transport,
            }),
        })
    }
}
