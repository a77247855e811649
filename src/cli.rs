//! Entry point logic for the `delete-azure-account` binary.
//!
//! Everything the process reads from its environment is captured once in an
//! [`Invocation`], and the Cloudcraft client is reached through [`Connect`] and
//! [`AccountDeleter`] so that [`run`] can be driven without a network.
use std::{
    env,
    ffi::{OsStr, OsString},
    fmt,
    future::Future,
    path::Path,
};

use clap::{Arg, Command};
use cloudcraft::{
    Cloudcraft, CloudcraftAzure,
    types::{
        AzureAccountId, CloudcraftConfig, CloudcraftEndpoint, CloudcraftError,
        DeleteAzureAccountInput,
    },
};
use tracing::debug;

/// Environment variable holding the Cloudcraft API key.
pub const API_KEY_ENV: &str = "CLOUDCRAFT_API_KEY";
/// Environment variable overriding the Cloudcraft endpoint.
pub const ENDPOINT_ENV: &str = "CLOUDCRAFT_ENDPOINT";

const DEFAULT_PROGRAM: &str = "delete-azure-account";

/// Inputs of a single run, captured from the process environment.
///
/// Values are kept as the OS handed them over; [`run`] decides what is valid.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// API key, if set.
    pub api_key: Option<OsString>,
    /// Endpoint override, if set.
    pub endpoint: Option<OsString>,
    /// Command-line arguments, including the program name.
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Create a new [`Invocation`] with the given API key and arguments.
    pub fn new<I, T>(api_key: Option<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            api_key,
            endpoint: None,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Set the endpoint override.
    pub fn with_endpoint(self, endpoint: impl Into<OsString>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..self
        }
    }

    /// Capture the current process environment and arguments.
    pub fn from_env() -> Self {
        let invocation = Self::new(env::var_os(API_KEY_ENV), env::args_os());
        match env::var_os(ENDPOINT_ENV) {
            Some(endpoint) => invocation.with_endpoint(endpoint),
            None => invocation,
        }
    }

    fn program(&self) -> String {
        self.args
            .first()
            .and_then(|arg0| Path::new(arg0).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_owned())
    }

    /// The single positional argument, taken verbatim.
    ///
    /// Nothing is treated as an option, so `--` counts like any other argument.
    fn account_id(&self) -> Option<AzureAccountId> {
        match self.args.get(1..)? {
            [id] => id.to_str()?.parse().ok(),
            _ => None,
        }
    }
}

/// Something that can delete an Azure account by ID.
pub trait AccountDeleter {
    type Error: fmt::Display;

    fn delete(&self, id: &AzureAccountId) -> impl Future<Output = Result<(), Self::Error>>;
}

impl AccountDeleter for CloudcraftAzure {
    type Error = CloudcraftError;

    async fn delete(&self, id: &AzureAccountId) -> Result<(), CloudcraftError> {
        self.delete_account(DeleteAzureAccountInput::new(id.clone()))
            .await
    }
}

/// Builds an [`AccountDeleter`] from a configuration.
pub trait Connect {
    type Deleter: AccountDeleter;
    type Error: fmt::Display;

    fn connect(&self, config: CloudcraftConfig) -> Result<Self::Deleter, Self::Error>;
}

/// Connects to the Cloudcraft API.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudcraftConnector;

impl Connect for CloudcraftConnector {
    type Deleter = CloudcraftAzure;
    type Error = CloudcraftError;

    fn connect(&self, config: CloudcraftConfig) -> Result<CloudcraftAzure, CloudcraftError> {
        Ok(Cloudcraft::new(config)?.azure())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Errors that end a run.
pub enum CliError {
    #[error("missing env var: {}", API_KEY_ENV)]
    /// API key is not set.
    MissingApiKey,
    #[error("env var is not valid unicode: {0}")]
    /// An environment variable could not be read as text.
    NotUnicode(&'static str),
    #[error("{0}")]
    /// Wrong arguments. Contains the usage line.
    Usage(String),
    #[error("{0}")]
    /// Client could not be constructed.
    Client(String),
    #[error("{0}")]
    /// Delete request failed.
    Remote(String),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            Self::MissingApiKey | Self::NotUnicode(_) | Self::Client(_) | Self::Remote(_) => 1,
        }
    }
}

/// Delete the Azure account named by the single positional argument.
pub async fn run<C: Connect>(invocation: Invocation, connector: &C) -> Result<(), CliError> {
    let api_key = text(
        invocation.api_key.as_deref().ok_or(CliError::MissingApiKey)?,
        API_KEY_ENV,
    )?;

    let Some(account_id) = invocation.account_id() else {
        debug!(count = invocation.args.len().saturating_sub(1), "invalid arguments");
        return Err(CliError::Usage(usage(&invocation.program())));
    };

    let mut config = CloudcraftConfig::new(api_key);
    if let Some(endpoint) = invocation.endpoint.as_deref() {
        let endpoint = text(endpoint, ENDPOINT_ENV)?
            .parse::<CloudcraftEndpoint>()
            .map_err(|err| CliError::Client(err.to_string()))?;
        config = config.with_endpoint(endpoint);
    }

    let deleter = connector
        .connect(config)
        .map_err(|err| CliError::Client(err.to_string()))?;

    debug!(%account_id, "deleting azure account");
    deleter
        .delete(&account_id)
        .await
        .map_err(|err| CliError::Remote(err.to_string()))
}

fn text<'a>(value: &'a OsStr, name: &'static str) -> Result<&'a str, CliError> {
    value.to_str().ok_or(CliError::NotUnicode(name))
}

fn usage(program: &str) -> String {
    Command::new(DEFAULT_PROGRAM)
        .bin_name(program.to_owned())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("account_id")
                .value_name("account-id")
                .help("Azure account to delete")
                .required(true),
        )
        .render_usage()
        .to_string()
        .trim_end()
        .to_owned()
}
