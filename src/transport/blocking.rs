use std::{io::Read as _, time::Duration};

#[cfg(feature = "metrics")]
use std::time::Instant;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::{Error, Result};

pub(crate) type Response = ureq::http::Response<ureq::Body>;

pub(crate) enum Body {
    Empty,
    Bytes(Bytes),
}

impl Body {
    pub(crate) fn from_payload(payload: &Bytes) -> Self {
        if payload.is_empty() {
            Self::Empty
        } else {
            Self::Bytes(payload.clone())
        }
    }
}

pub(crate) struct Transport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Transport {
    pub(crate) fn new(user_agent: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        #[cfg(feature = "rustls")]
        crate::transport::tls::ensure_rustls_crypto_provider();

        let config = ureq::Agent::config_builder().http_status_as_error(false);
        #[cfg(all(feature = "native-tls", not(feature = "rustls")))]
        let config = config.tls_config(
            ureq::tls::TlsConfig::builder()
                .provider(ureq::tls::TlsProvider::NativeTls)
                .build(),
        );

        Ok(Self {
            agent: ureq::Agent::new_with_config(config.build()),
            timeout,
            user_agent: user_agent.unwrap_or_else(default_user_agent),
        })
    }

    /// Performs exactly one HTTP exchange.
    ///
    /// Any status, including 4xx/5xx, comes back as `Ok`; only failures that
    /// produced no response are errors.
    pub(crate) fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Body,
    ) -> Result<Response> {
        #[cfg(feature = "metrics")]
        metrics::counter!("spaces_http_requests_total", "method" => method_label(&method))
            .increment(1);
        #[cfg(feature = "tracing")]
        let _guard = tracing::debug_span!(
            "spaces.http",
            method = %method,
            host = url.host_str().unwrap_or(""),
            path = url.path(),
        )
        .entered();
        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let result = match method.as_str() {
            // A GET may carry the signed payload; ureq only sends one when forced.
            "GET" => {
                let req = apply_headers(
                    self.agent.get(url.as_str()),
                    &headers,
                    &self.user_agent,
                    self.timeout,
                );
                match body {
                    Body::Empty => req.call(),
                    Body::Bytes(b) => req.force_send_body().send(b.as_ref()),
                }
            }
            "PUT" => {
                let req = apply_headers(
                    self.agent.put(url.as_str()),
                    &headers,
                    &self.user_agent,
                    self.timeout,
                );
                match body {
                    Body::Empty => req.send_empty(),
                    Body::Bytes(b) => req.send(b.as_ref()),
                }
            }
            _ => return Err(Error::invalid_config("unsupported HTTP method")),
        };

        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                #[cfg(feature = "metrics")]
                metrics::counter!(
                    "spaces_http_errors_total",
                    "method" => method_label(&method),
                    "kind" => failure_kind(&err)
                )
                .increment(1);
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, kind = failure_kind(&err), "request failed");

                return Err(Error::transport(
                    format!(
                        "{} failure: {}",
                        failure_kind(&err),
                        request_context(&method, &url)
                    ),
                    Some(Box::new(err)),
                ));
            }
        };

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(
                "spaces_http_responses_total",
                "method" => method_label(&method),
                "class" => status_class(resp.status()),
            )
            .increment(1);
            metrics::histogram!(
                "spaces_http_request_duration_seconds",
                "method" => method_label(&method),
            )
            .record(start.elapsed().as_secs_f64());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(status = %resp.status(), "response received");

        Ok(resp)
    }
}

pub(crate) fn read_body_bytes(body: ureq::Body) -> Result<Bytes> {
    let mut out = Vec::new();
    body.into_reader()
        .read_to_end(&mut out)
        .map_err(|e| Error::transport("failed to read response body", Some(Box::new(e))))?;
    Ok(Bytes::from(out))
}

pub(crate) fn read_body_string(body: ureq::Body) -> Result<String> {
    let bytes = read_body_bytes(body)?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

/// Turns a non-success response into [`Error::Api`], keeping the body as sent.
pub(crate) fn response_error(status: StatusCode, headers: &HeaderMap, body: String) -> Error {
    let request_id = headers
        .get("x-amz-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let parsed = crate::util::xml::parse_error_xml(&body).unwrap_or_default();

    Error::Api {
        status,
        code: parsed.code,
        message: parsed.message,
        request_id: parsed.request_id.or(request_id),
        host_id: parsed.host_id,
        body,
    }
}

fn failure_kind(err: &ureq::Error) -> &'static str {
    match err {
        ureq::Error::Timeout(_) => "timeout",
        ureq::Error::HostNotFound => "dns",
        ureq::Error::Io(e) if is_resolver_failure(e) => "dns",
        ureq::Error::ConnectionFailed => "connect",
        ureq::Error::Io(_) => "io",
        ureq::Error::Protocol(_) => "protocol",
        _ => "transport",
    }
}

/// Name resolution surfaces from ureq as a plain I/O error carrying the
/// resolver's message.
fn is_resolver_failure(err: &std::io::Error) -> bool {
    // Windows WSAHOST_NOT_FOUND / WSANO_DATA
    if matches!(err.raw_os_error(), Some(11001 | 11004)) && cfg!(windows) {
        return true;
    }
    let message = err.to_string();
    message.contains("failed to lookup address") || message.contains("No such host")
}

fn request_context(method: &Method, url: &Url) -> String {
    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    if authority.is_empty() {
        format!("{method} {}", url.path())
    } else {
        format!("{method} {authority}{}", url.path())
    }
}

#[cfg(feature = "metrics")]
fn status_class(status: StatusCode) -> &'static str {
    if status.is_informational() {
        "1xx"
    } else if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

#[cfg(feature = "metrics")]
fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "PUT" => "PUT",
        _ => "OTHER",
    }
}

fn apply_headers<B>(
    mut req: ureq::RequestBuilder<B>,
    headers: &HeaderMap,
    user_agent: &str,
    timeout: Option<Duration>,
) -> ureq::RequestBuilder<B> {
    req = req.header(http::header::USER_AGENT, user_agent);
    for (name, value) in headers.iter() {
        let Ok(value_str) = value.to_str() else {
            continue;
        };
        req = req.header(name.as_str(), value_str);
    }

    if let Some(timeout) = timeout {
        req = req.config().timeout_global(Some(timeout)).build();
    }

    req
}

fn default_user_agent() -> String {
    format!("spaces/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{ErrorKind, Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread::JoinHandle;
    use std::time::{Duration, Instant};

    /// Serves one canned response and hands back the raw request head.
    pub(crate) fn serve_once(response: &'static [u8]) -> (SocketAddr, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_secs(5);
            let mut request = Vec::new();
            loop {
                match listener.accept() {
                    Ok((mut stream, _)) => {
                        let _ = stream.set_nonblocking(false);
                        let _ = stream.set_read_timeout(Some(Duration::from_secs(1)));
                        let mut buf = [0u8; 1024];
                        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                            match stream.read(&mut buf) {
                                Ok(0) => break,
                                Ok(n) => {
                                    request.extend_from_slice(&buf[..n]);
                                    if request.len() > 64 * 1024 {
                                        break;
                                    }
                                }
                                Err(_) => break,
                            }
                        }
                        let _ = stream.write_all(response);
                        let _ = stream.flush();
                        break;
                    }
                    Err(err) if err.kind() == ErrorKind::WouldBlock => {
                        if Instant::now() >= deadline {
                            break;
                        }
                        std::thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
            request
        });

        (addr, handle)
    }
}
