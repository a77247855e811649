//! Types relevant to [`Cloudcraft`](crate::Cloudcraft) and
//! [`CloudcraftAzure`](crate::CloudcraftAzure).
use std::{fmt, ops::Deref, str::FromStr, time::Duration};

use http::{
    header::HeaderValue,
    uri::{Authority, Scheme},
};
use secrecy::SecretString;

use crate::api::ApiError;

const DEFAULT_AUTHORITY: &str = "api.cloudcraft.co";
const DEFAULT_USER_AGENT: &str = concat!("cloudcraft-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
/// Validation error.
pub struct ValidationError(pub String);

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self(message.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Endpoint of the Cloudcraft API.
pub struct CloudcraftEndpoint {
    /// URI scheme.
    ///
    /// Defaults to `https`.
    pub scheme: Scheme,
    /// API authority.
    pub authority: Authority,
    /// Path prefix all API routes are resolved against.
    ///
    /// Always starts and ends with `/`.
    pub base_path: String,
}

impl CloudcraftEndpoint {
    /// Create a new [`CloudcraftEndpoint`] with the given authority.
    pub fn new(authority: Authority) -> Self {
        Self {
            scheme: Scheme::HTTPS,
            authority,
            base_path: "/".to_owned(),
        }
    }

    /// Set the URI scheme.
    pub fn with_scheme(self, scheme: Scheme) -> Self {
        Self { scheme, ..self }
    }

    /// Set the path prefix.
    pub fn with_base_path(self, base_path: impl AsRef<str>) -> Self {
        Self {
            base_path: normalize_base_path(base_path.as_ref()),
            ..self
        }
    }
}

impl Default for CloudcraftEndpoint {
    fn default() -> Self {
        Self::new(Authority::from_static(DEFAULT_AUTHORITY))
    }
}

impl FromStr for CloudcraftEndpoint {
    type Err = ValidationError;

    /// Parse `[scheme://]authority[/path]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = match s.find("://") {
            Some(idx) => {
                let scheme: Scheme = s[..idx]
                    .parse()
                    .map_err(|_| format!("invalid endpoint scheme: {}", &s[..idx]))?;
                if scheme != Scheme::HTTP && scheme != Scheme::HTTPS {
                    return Err(format!("unsupported endpoint scheme: {scheme}").into());
                }
                (scheme, &s[idx + 3..])
            }
            None => (Scheme::HTTPS, s),
        };
        let (authority, base_path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };
        let authority: Authority = authority
            .parse()
            .map_err(|e| format!("invalid endpoint authority: {e}"))?;
        Ok(Self::new(authority)
            .with_scheme(scheme)
            .with_base_path(base_path))
    }
}

impl fmt::Display for CloudcraftEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.base_path)
    }
}

fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
/// Configuration for [`Cloudcraft`](crate::Cloudcraft).
pub struct CloudcraftConfig {
    pub(crate) api_key: SecretString,
    pub(crate) endpoint: CloudcraftEndpoint,
    pub(crate) request_timeout: Option<Duration>,
    pub(crate) user_agent: HeaderValue,
}

impl CloudcraftConfig {
    /// Create a new [`CloudcraftConfig`] with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().into(),
            endpoint: CloudcraftEndpoint::default(),
            request_timeout: None,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
        }
    }

    /// Set the Cloudcraft endpoint to connect to.
    pub fn with_endpoint(self, endpoint: CloudcraftEndpoint) -> Self {
        Self { endpoint, ..self }
    }

    /// Set the timeout for requests.
    ///
    /// No timeout by default.
    pub fn with_request_timeout(self, request_timeout: Duration) -> Self {
        Self {
            request_timeout: Some(request_timeout),
            ..self
        }
    }

    /// Set the user agent sent with every request.
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Result<Self, ValidationError> {
        let user_agent = user_agent
            .into()
            .parse()
            .map_err(|e| ValidationError(format!("invalid user agent: {e}")))?;
        Ok(Self { user_agent, ..self })
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &CloudcraftEndpoint {
        &self.endpoint
    }
}

/// ID of an Azure account registered with Cloudcraft.
///
/// **Note:** It must not be empty, `.` or `..`, since those cannot be addressed
/// as a URL path segment. No other normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AzureAccountId(String);

impl TryFrom<String> for AzureAccountId {
    type Error = ValidationError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        if id.is_empty() {
            return Err("account id must not be empty".into());
        }
        if id == "." || id == ".." {
            return Err(format!("account id must not be a dot segment: {id}").into());
        }
        Ok(Self(id))
    }
}

impl FromStr for AzureAccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.to_owned().try_into()
    }
}

impl Deref for AzureAccountId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for AzureAccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AzureAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AzureAccountId> for String {
    fn from(id: AzureAccountId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Input for [`delete_account`](crate::CloudcraftAzure::delete_account) operation.
pub struct DeleteAzureAccountInput {
    /// Account to delete.
    pub id: AzureAccountId,
    /// Whether to treat a missing account as success.
    ///
    /// Defaults to `false`.
    pub ignore_not_found: bool,
}

impl DeleteAzureAccountInput {
    /// Create a new [`DeleteAzureAccountInput`] with the given account ID.
    pub fn new(id: AzureAccountId) -> Self {
        Self {
            id,
            ignore_not_found: false,
        }
    }

    /// Set whether to ignore a not found error.
    pub fn with_ignore_not_found(self, ignore_not_found: bool) -> Self {
        Self {
            ignore_not_found,
            ..self
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
/// Errors from Cloudcraft operations.
pub enum CloudcraftError {
    #[error("{0}")]
    /// Client-side error, including failure to construct the client.
    Client(String),
    #[error(transparent)]
    /// Validation error.
    Validation(#[from] ValidationError),
    #[error("{0}")]
    /// Server responded with a non-success status.
    Server(ErrorResponse),
}

impl From<ApiError> for CloudcraftError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Server(status, response) => Self::Server(ErrorResponse {
                status: status.as_u16(),
                message: response.message,
            }),
            other => Self::Client(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request failed with status {status}: {message}")]
#[non_exhaustive]
/// Error response from the Cloudcraft API.
pub struct ErrorResponse {
    /// HTTP status code.
    pub status: u16,
    /// Error message.
    pub message: String,
}
