//! [`Auth`] and [`Chat`] configurations.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::{de::DeserializeOwned, Deserialize};
use smart_default::SmartDefault;

/// Loads a configuration by:
/// - loading it from the provided `path` (if any);
/// - merging it with the environment variables (if any);
/// - using default values for missing fields.
fn load<T: DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    ConfigBuilder::<DefaultState>::default()
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("CONF").separator("."))
        .build()?
        .try_deserialize()
}

/// Configuration of the issuing `auth` service.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Auth {
    /// REST server configuration.
    pub server: Server,

    /// RPC server configuration.
    pub rpc: Rpc,

    /// [JWT] configuration.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    pub jwt: Jwt,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Shutdown configuration.
    pub shutdown: Shutdown,

    /// Log configuration.
    pub log: Log,
}

impl Auth {
    /// Creates a new [`Auth`] configuration out of the file at the provided
    /// `path` and the `CONF.`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        load(path.as_ref())
    }
}

/// Configuration of the consuming `chat` service.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Chat {
    /// REST server configuration.
    #[default(Server { port: 8081, ..Server::default() })]
    pub server: Server,

    /// Configuration of the client of the `auth` service.
    pub auth: AuthClient,

    /// Postgres configuration.
    pub postgres: Postgres,

    /// Shutdown configuration.
    pub shutdown: Shutdown,

    /// Log configuration.
    pub log: Log,
}

impl Chat {
    /// Creates a new [`Chat`] configuration out of the file at the provided
    /// `path` and the `CONF.`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        load(path.as_ref())
    }
}

/// REST server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// Maximum duration of a single request.
    #[default(time::Duration::from_secs(4))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// RPC server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Rpc {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(50051)]
    pub port: u16,
}

/// [JWT] configuration.
///
/// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Jwt {
    /// Secret shared by all the `auth` service instances to sign tokens.
    #[default("secret".to_owned())]
    pub secret: String,
}

/// Configuration of the client of the `auth` service.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct AuthClient {
    /// Host of the `auth` service RPC server.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port of the `auth` service RPC server.
    #[default(50051)]
    pub port: u16,

    /// Maximum duration of establishing a connection.
    #[default(service::infra::auth::Grpc::DEFAULT_CONNECT_TIMEOUT)]
    #[serde(with = "humantime_serde")]
    pub connect_timeout: time::Duration,
}

impl AuthClient {
    /// Returns the URI of the `auth` service RPC server.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Postgres configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database name to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,

    /// Number of connections established on startup.
    #[default(5)]
    pub min_connections: usize,

    /// Maximum number of live connections.
    #[default(10)]
    pub max_connections: usize,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
            min_connections: _,
            max_connections,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            pool: Some(service::infra::postgres::PoolConfig::new(
                max_connections,
            )),
            ..Self::default()
        }
    }
}

/// Shutdown configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Shutdown {
    /// Grace period given to in-flight requests once shutdown is requested.
    #[default(time::Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
