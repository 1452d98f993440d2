//! Object upload and download.

use bytes::Bytes;
use http::Method;

use crate::{
    auth::Region,
    client::BlockingClient,
    error::{Error, Result},
    signing::{Signable as _, SignedHeaders},
    transport::blocking::{read_body_bytes, read_body_string, response_error},
    types::{Content, DEFAULT_DISPOSITION, DownloadOutput, RequestDescriptor, UploadOutput},
};

/// Object operations service.
#[derive(Clone, Debug)]
pub struct ObjectsService {
    client: BlockingClient,
}

impl ObjectsService {
    pub(crate) fn new(client: BlockingClient) -> Self {
        Self { client }
    }

    /// Starts a request to PUT an object.
    pub fn put(&self, bucket: impl Into<String>, path: impl Into<String>) -> PutObjectRequest {
        PutObjectRequest {
            client: self.client.clone(),
            bucket: bucket.into(),
            path: path.into(),
            region: None,
            content_type: None,
            content: Content::default(),
        }
    }

    /// Starts a request to GET an object.
    pub fn get(&self, bucket: impl Into<String>, path: impl Into<String>) -> GetObjectRequest {
        GetObjectRequest {
            client: self.client.clone(),
            bucket: bucket.into(),
            path: path.into(),
            region: None,
            disposition: None,
            content: Content::default(),
        }
    }

    /// Uploads the descriptor's payload.
    ///
    /// A non-success status is returned as [`Error::Api`] with the provider's
    /// body untouched; failures without a response are [`Error::Transport`].
    pub fn upload(&self, descriptor: &RequestDescriptor) -> Result<UploadOutput> {
        ensure_shape(descriptor, &Method::PUT, &SignedHeaders::put())?;
        let resp = self.client.execute(descriptor)?;

        let (parts, body) = resp.into_parts();
        if !parts.status.is_success() {
            let body = read_body_string(body)?;
            return Err(response_error(parts.status, &parts.headers, body));
        }

        Ok(UploadOutput {
            status: parts.status,
            etag: crate::util::headers::header_string(&parts.headers, http::header::ETAG),
        })
    }

    /// Downloads an object; `disposition` is echoed back for presentation.
    pub fn download(
        &self,
        descriptor: &RequestDescriptor,
        disposition: impl Into<String>,
    ) -> Result<DownloadOutput> {
        ensure_shape(descriptor, &Method::GET, &SignedHeaders::get())?;
        let resp = self.client.execute(descriptor)?;

        let (parts, body) = resp.into_parts();
        if !parts.status.is_success() {
            let body = read_body_string(body)?;
            return Err(response_error(parts.status, &parts.headers, body));
        }

        let headers = &parts.headers;
        Ok(DownloadOutput {
            status: parts.status,
            content_type: crate::util::headers::header_string(headers, http::header::CONTENT_TYPE),
            content_length: crate::util::headers::header_u64(
                headers,
                http::header::CONTENT_LENGTH,
            ),
            etag: crate::util::headers::header_string(headers, http::header::ETAG),
            disposition: disposition.into(),
            body: read_body_bytes(body)?,
        })
    }
}

/// Uploads are PUTs signed with the upload header set, downloads GETs signed
/// with the download set.
fn ensure_shape(
    descriptor: &RequestDescriptor,
    method: &Method,
    headers: &SignedHeaders,
) -> Result<()> {
    if descriptor.method() != method {
        return Err(Error::invalid_config(format!(
            "expected a {method} descriptor, got {}",
            descriptor.method()
        )));
    }
    if descriptor.headers_to_sign() != headers {
        return Err(Error::invalid_config(format!(
            "{method} must sign {headers}, descriptor signs {}",
            descriptor.headers_to_sign()
        )));
    }
    Ok(())
}

/// Request builder for PUT object.
#[derive(Debug)]
pub struct PutObjectRequest {
    client: BlockingClient,
    bucket: String,
    path: String,
    region: Option<String>,
    content_type: Option<String>,
    content: Content,
}

/// Request builder for GET object.
#[derive(Debug)]
pub struct GetObjectRequest {
    client: BlockingClient,
    bucket: String,
    path: String,
    region: Option<String>,
    disposition: Option<String>,
    content: Content,
}

fn resolve_region(region: Option<String>) -> Result<Option<Region>> {
    region.map(Region::new).transpose()
}

impl PutObjectRequest {
    /// Overrides the configured default region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.content_type = Some(value.into());
        self
    }

    /// Sets the request body from bytes.
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.content = Content::Raw(body.into());
        self
    }

    /// Sets the request body from Base64 text, decoded before signing.
    pub fn body_base64(mut self, body: impl Into<String>) -> Self {
        self.content = Content::Base64(body.into());
        self
    }

    /// Sets the request body.
    pub fn body(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    /// Builds the descriptor this request will sign.
    pub fn descriptor(self) -> Result<RequestDescriptor> {
        let (_, descriptor) = self.into_parts()?;
        Ok(descriptor)
    }

    /// Sends the request.
    pub fn send(self) -> Result<UploadOutput> {
        let (client, descriptor) = self.into_parts()?;
        client.objects().upload(&descriptor)
    }

    fn into_parts(self) -> Result<(BlockingClient, RequestDescriptor)> {
        let mut descriptor = RequestDescriptor::put(self.bucket, &self.path)?
            .with_payload(self.content.decode()?)
            .with_content_type(self.content_type.unwrap_or_default());
        if let Some(region) = resolve_region(self.region)? {
            descriptor = descriptor.with_region(region);
        }
        Ok((self.client, descriptor))
    }
}

impl GetObjectRequest {
    /// Overrides the configured default region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Presentation hint returned with the output; defaults to `inline`.
    pub fn disposition(mut self, value: impl Into<String>) -> Self {
        self.disposition = Some(value.into());
        self
    }

    /// Payload signed and sent with the GET.
    pub fn body_bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.content = Content::Raw(body.into());
        self
    }

    /// Payload as Base64 text, decoded before signing.
    pub fn body_base64(mut self, body: impl Into<String>) -> Self {
        self.content = Content::Base64(body.into());
        self
    }

    /// Sends the request.
    pub fn send(self) -> Result<DownloadOutput> {
        let disposition = self
            .disposition
            .unwrap_or_else(|| DEFAULT_DISPOSITION.to_string());
        if disposition.trim().is_empty() {
            return Err(Error::invalid_config("disposition must not be empty"));
        }

        let mut descriptor =
            RequestDescriptor::get(self.bucket, &self.path)?.with_payload(self.content.decode()?);
        if let Some(region) = resolve_region(self.region)? {
            descriptor = descriptor.with_region(region);
        }

        self.client.objects().download(&descriptor, disposition)
    }
}
