//! HTTP implementation of [`ComputeApi`] for the Compute Engine v1 REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::api::ComputeApi;
use crate::certificate::{Certificate, CertificateList};
use crate::error::ApiError;
use crate::operation::Operation;

/// Default Compute Engine v1 endpoint
pub const DEFAULT_API_URL: &str = "https://compute.googleapis.com/compute/v1/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Compute API client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ComputeClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl std::fmt::Debug for ComputeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ComputeClient`]
#[derive(Clone)]
pub struct ComputeClientBuilder {
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl Default for ComputeClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("managed-certs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ComputeClientBuilder {
    /// Override the API endpoint (emulators, private endpoints, tests)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// OAuth2 bearer token sent with every request
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<ComputeClient, ApiError> {
        let mut base_url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.base_url));
        }
        // Resource paths are appended as segments
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;

        Ok(ComputeClient {
            http,
            base_url,
            access_token: self.access_token,
        })
    }
}

/// Google API error envelope
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl ComputeClient {
    /// Client for the default endpoint authenticating with `access_token`
    pub fn new(access_token: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().access_token(access_token).build()
    }

    pub fn builder() -> ComputeClientBuilder {
        ComputeClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/projects/{project}/global/{segments...}`
    fn global_url(&self, project: &str, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["projects", project, "global"])
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Certificate>,
    ) -> Result<T, ApiError> {
        debug!(%method, %url, "Compute API request");

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        trace!(status = status.as_u16(), len = bytes.len(), "Compute API response");

        if !status.is_success() {
            return Err(error_from_response(status, &bytes));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn error_from_response(status: StatusCode, body: &[u8]) -> ApiError {
    let message = match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        _ => String::from_utf8_lossy(body).into_owned(),
    };

    ApiError::Http {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl ComputeApi for ComputeClient {
    async fn insert_ssl_certificate(
        &self,
        project: &str,
        certificate: &Certificate,
    ) -> Result<Operation, ApiError> {
        let url = self.global_url(project, &["sslCertificates"])?;
        self.send(Method::POST, url, Some(certificate)).await
    }

    async fn delete_ssl_certificate(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Operation, ApiError> {
        let url = self.global_url(project, &["sslCertificates", name])?;
        self.send(Method::DELETE, url, None).await
    }

    async fn get_ssl_certificate(
        &self,
        project: &str,
        name: &str,
    ) -> Result<Certificate, ApiError> {
        let url = self.global_url(project, &["sslCertificates", name])?;
        self.send(Method::GET, url, None).await
    }

    async fn list_ssl_certificates(&self, project: &str) -> Result<CertificateList, ApiError> {
        let mut all = CertificateList::default();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.global_url(project, &["sslCertificates"])?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let page: CertificateList = self.send(Method::GET, url, None).await?;
            all.items.extend(page.items);

            match page.next_page_token {
                Some(token) if token.is_empty() => break,
                Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                    debug!(%token, "Repeated page token, stopping list");
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all)
    }

    async fn get_global_operation(&self, project: &str, name: &str) -> Result<Operation, ApiError> {
        let url = self.global_url(project, &["operations", name])?;
        self.send(Method::GET, url, None).await
    }
}
