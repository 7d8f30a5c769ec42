use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::instrument;

use super::domain::ValidatedRequest;

/// Where a validated ride request goes to be turned into an email.
#[async_trait]
pub trait MailerGateway: Send + Sync {
    /// Delivers one request and returns the gateway's confirmation text.
    async fn send(&self, request: &ValidatedRequest) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: MailerGateway + ?Sized> MailerGateway for std::sync::Arc<T> {
    async fn send(&self, request: &ValidatedRequest) -> Result<String, TransportError> {
        (**self).send(request).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to reach the mailer gateway")]
    Request(#[from] reqwest::Error),
    #[error("The mailer gateway answered {status}: {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("The mailer gateway answered with a malformed body")]
    MalformedResponse(#[source] serde_json::Error),
}

/// Body of every mailer gateway answer.
#[derive(Debug, Deserialize)]
struct GatewayReply {
    message: String,
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http_client: Client,
    endpoint: Url,
}

impl GatewayClient {
    const MAIL_PATH: &'static str = "api/mail";

    /// `base_url` may carry a path prefix; the endpoint is always nested under it.
    ///
    /// # Errors
    /// If `base_url` is not an absolute URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let endpoint = Url::parse(base_url)
            .and_then(|mut url| {
                if !url.path().ends_with('/') {
                    let path = format!("{}/", url.path());
                    url.set_path(&path);
                }
                url.join(Self::MAIL_PATH)
            })
            .with_context(|| format!("Invalid mailer gateway url: {base_url}"))?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the mailer gateway client")?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MailerGateway for GatewayClient {
    /// # Errors
    ///
    /// Times out after the configured duration. Any non-2xx answer is a
    /// [`TransportError::Rejected`].
    #[instrument(name = "Send ride request to the mailer gateway", skip_all, fields(rider_email = %request.email()))]
    async fn send(&self, request: &ValidatedRequest) -> Result<String, TransportError> {
        use hyper::header::*;

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let reply = serde_json::from_slice::<GatewayReply>(&body);

        if status.is_success() {
            reply
                .map(|reply| reply.message)
                .map_err(TransportError::MalformedResponse)
        } else {
            let message = match reply {
                Ok(reply) => reply.message,
                Err(_) => String::from_utf8_lossy(&body).into_owned(),
            };
            Err(TransportError::Rejected { status, message })
        }
    }
}
