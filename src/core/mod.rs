//! Connection handling, command construction and the bundled client.
//!
//! - [`connection`] - Single connection management
//! - [`multiplexed`] - Multiplexed connection for concurrent requests
//! - [`command`] - Command builders
//! - [`reply`] - Reply frame conversions
//! - [`builder`] - Client builder

use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, instrument};

pub use crate::proto::error::{Error, Result};

/// Client builder configuration.
pub mod builder;
mod client;
/// Command construction helpers.
pub mod command;
/// Low-level connection management.
pub mod connection;
/// Multiplexing logic.
pub mod multiplexed;
pub mod reply;

pub use client::CommandClient;

cfg_if::cfg_if! {
    if #[cfg(feature = "tls")] {
        mod tls;
        pub use tls::TlsConnectorInner;
    }
}

use crate::proto::frame::Frame;
use command::Cmd;

const DEFAULT_PORT: u16 = 6379;
pub(crate) const DEFAULT_QUEUE_SIZE: usize = 1024;

/// Where and how to connect, after the address and builder options merge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConnectionInfo {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) tls: bool,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) database: Option<u8>,
    pub(crate) client_name: Option<String>,
    pub(crate) connection_timeout: Option<Duration>,
    pub(crate) read_timeout: Option<Duration>,
    pub(crate) write_timeout: Option<Duration>,
    pub(crate) queue_size: usize,
}

impl ConnectionInfo {
    /// Parses `redis://[user[:password]@]host[:port][/db]` (or `rediss://`).
    pub(crate) fn parse(address: &str) -> Result<Self> {
        let parsed_url = url::Url::parse(address).map_err(|_| Error::InvalidArgument {
            message: "invalid address format".to_string(),
        })?;

        let tls = match parsed_url.scheme() {
            "redis" => false,
            "rediss" => true,
            _ => {
                return Err(Error::InvalidArgument {
                    message: "invalid scheme, expected redis:// or rediss://".to_string(),
                })
            }
        };

        let host = parsed_url
            .host_str()
            .ok_or_else(|| Error::InvalidArgument {
                message: "missing host in address".to_string(),
            })?
            .to_string();

        let username = Some(parsed_url.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let password = parsed_url.password().map(str::to_string);

        let database = match parsed_url.path().trim_start_matches('/') {
            "" => None,
            db => Some(db.parse::<u8>().map_err(|_| Error::InvalidArgument {
                message: format!("invalid database index: {db}"),
            })?),
        };

        Ok(Self {
            host,
            port: parsed_url.port().unwrap_or(DEFAULT_PORT),
            tls,
            username,
            password,
            database,
            client_name: None,
            connection_timeout: None,
            read_timeout: None,
            write_timeout: None,
            queue_size: DEFAULT_QUEUE_SIZE,
        })
    }
}

/// Async Redis client over one multiplexed connection.
///
/// Cloning is cheap; every clone shares the same connection. The client
/// never reconnects: once the connection drops, every call fails with
/// [`Error::Io`].
///
/// # Example
///
/// ```no_run
/// use redkey::{command, Client};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::connect("redis://localhost:6379").await?;
///     client.ping().await?;
///     let reply = client.execute(command::get("key")).await?;
///     println!("{reply:?}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    connection: multiplexed::MultiplexedConnection,
}

impl Client {
    pub(crate) async fn connect_inner(info: ConnectionInfo) -> Result<Self> {
        let addr = format!("{}:{}", info.host, info.port);
        let connect = TcpStream::connect(&addr);
        let stream = match info.connection_timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::TimedOut, "connection timed out")
            })??,
            None => connect.await?,
        };
        stream.set_nodelay(true)?;

        let connection = if info.tls {
            connect_tls(stream, &info).await?
        } else {
            establish(stream, &info).await?
        };

        debug!(%addr, tls = info.tls, "connected");
        Ok(Self { connection })
    }

    /// Connects to a Redis server.
    ///
    /// The address is `redis://[user[:password]@]host[:port][/db]`, or
    /// `rediss://...` for TLS. Credentials and database in the URL are
    /// applied during the handshake.
    pub async fn connect<T: AsRef<str>>(addr: T) -> Result<Self> {
        Self::connect_inner(ConnectionInfo::parse(addr.as_ref())?).await
    }

    /// Returns a [`ClientBuilder`](builder::ClientBuilder) for finer control.
    pub fn builder() -> builder::ClientBuilder {
        builder::ClientBuilder::new()
    }

    /// Sends a PING command; resolves to the server's reply text.
    pub async fn ping(&self) -> Result<String> {
        let frame = self.execute(command::ping()).await?;
        reply::frame_to_string(frame)
    }

    /// Keys matching a glob-style `pattern`.
    ///
    /// KEYS walks the whole keyspace on the server; avoid it on large
    /// production databases.
    pub async fn keys(&self, pattern: impl Into<Bytes>) -> Result<Vec<Bytes>> {
        reply::frame_to_vec_bytes(self.execute(command::keys(pattern)).await?)
    }

    /// A random key, `None` when the database is empty.
    pub async fn randomkey(&self) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.execute(command::randomkey()).await?)
    }

    /// Values of several string keys, `None` for each missing one.
    pub async fn mget<I, T>(&self, keys: I) -> Result<Vec<Option<Bytes>>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_vec_opt_bytes(self.execute(command::mget(keys)).await?)
    }

    /// Sets several string keys in one command.
    pub async fn mset<I, K, V>(&self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        reply::frame_to_unit(self.execute(command::mset(pairs)).await?)
    }

    /// The server's INFO report, optionally limited to one section.
    pub async fn info(&self, section: Option<&str>) -> Result<String> {
        reply::frame_to_string(self.execute(command::info(section)).await?)
    }

    /// Sends one command and returns its reply frame.
    ///
    /// An error reply comes back as [`Error::Server`].
    #[instrument(skip(self, cmd), fields(command = %String::from_utf8_lossy(cmd.name())), level = "debug")]
    pub async fn execute(&self, cmd: Cmd) -> Result<Frame> {
        let frame = self.connection.send_command(cmd.into_frame()).await?;
        reply::parse_frame_response(frame)
    }
}

impl CommandClient for Client {
    fn execute(&self, cmd: Cmd) -> impl std::future::Future<Output = Result<Frame>> + Send {
        Client::execute(self, cmd)
    }
}

#[cfg(feature = "tls")]
async fn connect_tls(
    stream: TcpStream,
    info: &ConnectionInfo,
) -> Result<multiplexed::MultiplexedConnection> {
    let stream = TlsConnectorInner::new()?.connect(&info.host, stream).await?;
    establish(stream, info).await
}

#[cfg(not(feature = "tls"))]
async fn connect_tls(
    _stream: TcpStream,
    _info: &ConnectionInfo,
) -> Result<multiplexed::MultiplexedConnection> {
    Err(Error::InvalidArgument {
        message: "rediss:// requires the `tls` feature".to_string(),
    })
}

/// Runs the handshake on a fresh stream and hands it to the multiplexer.
async fn establish<S>(stream: S, info: &ConnectionInfo) -> Result<multiplexed::MultiplexedConnection>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let mut connection =
        connection::Connection::new(stream).with_timeouts(info.read_timeout, info.write_timeout);

    if let Some(password) = &info.password {
        let auth_cmd = match &info.username {
            Some(username) => command::auth_with_username(username.clone(), password.clone()),
            None => command::auth(password.clone()),
        };
        if connection.request(&auth_cmd.into_frame()).await?.is_error() {
            return Err(Error::Auth);
        }
    }

    if let Some(db) = info.database {
        let resp = connection.request(&command::select(db).into_frame()).await?;
        reply::frame_to_unit(resp)?;
    }

    if let Some(name) = &info.client_name {
        let resp = connection
            .request(&command::client_setname(name.clone()).into_frame())
            .await?;
        reply::frame_to_unit(resp)?;
    }

    Ok(multiplexed::MultiplexedConnection::new(
        connection,
        info.queue_size,
    ))
}
