use std::ops::Deref;

use http::{
    HeaderMap, HeaderValue, StatusCode,
    header::{ACCEPT, AUTHORIZATION, InvalidHeaderValue, USER_AGENT},
};
use secrecy::ExposeSecret;
use tracing::debug;
use url::Url;

use crate::types::{AzureAccountId, CloudcraftConfig, CloudcraftEndpoint};

const ACCEPT_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct AzureClient {
    pub client: BaseClient,
}

impl AzureClient {
    pub fn init(client: BaseClient) -> Self {
        Self { client }
    }

    pub async fn delete_account(
        &self,
        id: &AzureAccountId,
        ignore_not_found: bool,
    ) -> Result<(), ApiError> {
        let url = self.base_url.join(&format!(
            "providers/azure/account/{}",
            urlencoding::encode(id)
        ))?;
        let request = self.delete(url).build()?;
        self.send(request).await.ignore_not_found(ignore_not_found)?;
        Ok(())
    }
}

impl Deref for AzureClient {
    type Target = BaseClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

#[derive(Debug, Clone)]
pub struct BaseClient {
    http: reqwest::Client,
    pub base_url: Url,
}

impl BaseClient {
    pub fn init(config: &CloudcraftConfig) -> Result<Self, ApiError> {
        let api_key = config.api_key.expose_secret();
        if api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let mut authorization: HeaderValue = format!("Bearer {api_key}").try_into()?;
        authorization.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, authorization);
        default_headers.insert(USER_AGENT, config.user_agent.clone());
        default_headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url(&config.endpoint)?,
        })
    }

    pub fn delete(&self, url: Url) -> reqwest::RequestBuilder {
        self.http.delete(url)
    }

    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, ApiError> {
        let method = request.method().clone();
        let path = request.url().path().to_owned();
        debug!(%method, %path, "sending request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            debug!(%method, %path, %status, "request succeeded");
            return Ok(response);
        }

        let body = response.bytes().await?;
        let err_resp = ApiErrorResponse::from_body(status, &body);
        debug!(%method, %path, %status, message = %err_resp.message, "request failed");
        Err(ApiError::Server(status, err_resp))
    }
}

fn base_url(endpoint: &CloudcraftEndpoint) -> Result<Url, ApiError> {
    Ok(Url::parse(&endpoint.to_string())?)
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiErrorResponse {
    pub message: String,
}

impl ApiErrorResponse {
    /// Prefers the JSON `message`, then JSON `error`, then the raw body, then the status reason.
    fn from_body(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| {
                [body.message, body.error]
                    .into_iter()
                    .flatten()
                    .find(|m| !m.is_empty())
            })
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_owned();
                (!text.is_empty()).then_some(text)
            })
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| status.to_string());
        Self { message }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
    #[error("missing API key")]
    MissingApiKey,
    #[error("{1}")]
    Server(StatusCode, ApiErrorResponse),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::from(err).into()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connect: {0}")]
    Connect(String),
    #[error("timeout")]
    Timeout,
    #[error("{0}")]
    Others(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Others(err.to_string())
        }
    }
}

trait IgnoreNotFound {
    fn ignore_not_found(self, enabled: bool) -> Result<(), ApiError>;
}

impl IgnoreNotFound for Result<reqwest::Response, ApiError> {
    fn ignore_not_found(self, enabled: bool) -> Result<(), ApiError> {
        match self {
            Ok(_) => Ok(()),
            Err(ApiError::Server(StatusCode::NOT_FOUND, _)) if enabled => Ok(()),
            Err(err) => Err(err),
        }
    }
}
