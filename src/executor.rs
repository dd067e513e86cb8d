//! Request execution with warm-up timeout tiering
//!
//! The executor issues one HTTP request per descriptor against a base URL,
//! strictly sequentially. The first request of a run gets an extended
//! "warm-up" timeout to tolerate a server cold-start or reload; once any
//! response arrives (success or application-level error alike) every
//! subsequent request uses the normal timeout.
//!
//! A transport-level failure on the warm-up request is the single
//! run-aborting condition: if the server is unreachable there is nothing to
//! learn from hammering it once per example. Transport failures after
//! warm-up are per-example failures and the run continues.
//!
//! The HTTP collaborator sits behind the [`Transport`] trait so the state
//! machine can be exercised without a live server.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::types::{Body, Method, RequestDescriptor};

/// Connect timeout for the shared client; per-request timeouts come from the
/// warm-up controller
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A completed HTTP exchange: response received, whatever the status.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Exchange {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failure to complete an exchange.
///
/// `Transport` means the network call itself failed; `Attachment` means the
/// request could not even be assembled because an attached file was
/// unreadable. Only a transport failure can signal an unreachable server.
#[derive(Error, Debug)]
pub enum SendError {
    #[error(transparent)]
    Transport(TransportError),

    #[error("attachment unreadable: {0}")]
    Attachment(String),
}

/// Outcome of driving one descriptor through the warm-up controller.
#[derive(Error, Debug)]
pub enum ExecuteError {
    /// Warm-up transport failure; the whole run aborts
    #[error("warm-up request failed: {0}")]
    Unreachable(TransportError),

    /// Per-example failure; the run continues
    #[error("{0}")]
    Request(SendError),
}

/// HTTP transport collaborator seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request described by `descriptor` against `base_url`.
    ///
    /// Returns an [`Exchange`] for any received response, including non-2xx;
    /// transport-level failures (timeout, connection refused, DNS) surface as
    /// `SendError::Transport`.
    async fn send(
        &self,
        descriptor: &RequestDescriptor,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Exchange, SendError>;
}

/// Warm-up controller state for one run. Explicit enum rather than a boolean
/// so the abort-vs-continue policy stays auditable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmupState {
    /// No request has succeeded this run
    Cold,
    /// The first request is in flight under the extended timeout
    WarmingUp,
    /// At least one response has been received; normal timeouts apply
    Warm,
}

/// Sequences requests for one run, owning the warm-up state machine.
pub struct Executor<T: Transport> {
    transport: T,
    base_url: String,
    warmup_timeout: Duration,
    request_timeout: Duration,
    state: WarmupState,
}

impl<T: Transport> Executor<T> {
    pub fn new(
        transport: T,
        base_url: impl Into<String>,
        warmup_timeout: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            warmup_timeout,
            request_timeout,
            state: WarmupState::Cold,
        }
    }

    #[must_use]
    pub const fn state(&self) -> WarmupState {
        self.state
    }

    /// Execute one request under the current timeout tier.
    pub async fn execute(&mut self, descriptor: &RequestDescriptor) -> Result<Exchange, ExecuteError> {
        match self.state {
            WarmupState::Cold => {
                self.state = WarmupState::WarmingUp;
                debug!(
                    url = %descriptor.url,
                    timeout_secs = self.warmup_timeout.as_secs(),
                    "issuing warm-up request"
                );
                match self
                    .transport
                    .send(descriptor, &self.base_url, self.warmup_timeout)
                    .await
                {
                    Ok(exchange) => {
                        self.state = WarmupState::Warm;
                        Ok(exchange)
                    }
                    Err(SendError::Transport(e)) => {
                        // Server never answered; back to Cold and abort the run
                        self.state = WarmupState::Cold;
                        warn!(error = %e, "warm-up request failed at transport level");
                        Err(ExecuteError::Unreachable(e))
                    }
                    Err(other) => {
                        // The request never reached the wire; no response
                        // means no warm-up, but also no evidence the server
                        // is down
                        self.state = WarmupState::Cold;
                        Err(ExecuteError::Request(other))
                    }
                }
            }
            WarmupState::WarmingUp => {
                // Single-threaded sequencing: execute() is never re-entered
                // while a request is in flight
                unreachable!("overlapping in-flight requests")
            }
            WarmupState::Warm => self
                .transport
                .send(descriptor, &self.base_url, self.request_timeout)
                .await
                .map_err(ExecuteError::Request),
        }
    }
}

/// `reqwest`-backed transport with one shared client per run for connection
/// keep-alive.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    /// Build the shared client.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, crate::error::DocCheckError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| crate::error::DocCheckError::Transport(e.to_string()))?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        descriptor: &RequestDescriptor,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Exchange, SendError> {
        let url = resolve_url(&descriptor.url, base_url);
        let method = match descriptor.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut request = self.client.request(method, &url).timeout(timeout);

        match &descriptor.body {
            Body::None => {}
            Body::Json(value) => request = request.json(value),
            Body::Raw(bytes) => request = request.body(bytes.clone()),
        }

        if descriptor.is_multipart() {
            request = request.multipart(build_form(descriptor).await?);
        }

        // Explicit headers win over anything the body setters implied
        for (name, value) in &descriptor.headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(map_reqwest_error)?
            .to_vec();

        Ok(Exchange {
            status,
            headers,
            body,
        })
    }
}

/// Assemble the multipart form, reading attachment bytes from disk at send
/// time. A missing or unreadable file fails this example only.
async fn build_form(descriptor: &RequestDescriptor) -> Result<reqwest::multipart::Form, SendError> {
    let mut form = reqwest::multipart::Form::new();

    for (name, value) in &descriptor.form_fields {
        form = form.text(name.clone(), value.clone());
    }

    for attachment in &descriptor.attached_files {
        let bytes = tokio::fs::read(&attachment.path).await.map_err(|e| {
            SendError::Attachment(format!("{}: {e}", attachment.path))
        })?;
        let mut part =
            reqwest::multipart::Part::bytes(bytes).file_name(attachment.file_name.clone());
        if let Some(mime) = &attachment.content_type {
            part = part.mime_str(mime).map_err(|e| {
                SendError::Attachment(format!("bad content type '{mime}': {e}"))
            })?;
        }
        form = form.part(attachment.field_name.clone(), part);
    }

    Ok(form)
}

/// Absolute example URLs pass through; relative ones resolve against the
/// configured base URL.
fn resolve_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), url.trim_start_matches('/'))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> SendError {
    let err = if e.is_timeout() {
        TransportError::Timeout {
            // reqwest does not report the configured timeout back; callers
            // log the tier they used
            duration: Duration::ZERO,
        }
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    };
    SendError::Transport(err)
}
