use std::time::Duration;

use crate::core::ConnectionInfo;
use crate::{Client, Error};

/// Builder for configuring and creating a [`Client`] connection.
///
/// Values set on the builder take precedence over credentials and database
/// embedded in the address.
///
/// # Example
///
/// ```no_run
/// use redkey::ClientBuilder;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ClientBuilder::new()
///     .address("redis://localhost:6379")
///     .password("secret")
///     .database(0)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    address: Option<String>,
    password: Option<String>,
    username: Option<String>,
    database: Option<u8>,
    client_name: Option<String>,
    connection_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    tls: bool,
    queue_size: Option<usize>,
}

impl ClientBuilder {
    /// Creates a new [`ClientBuilder`] instance.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Redis server address, `redis://host:port` or
    /// `rediss://host:port` for TLS.
    #[inline]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the password for authentication.
    #[inline]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the username for ACL authentication. Only sent along with a
    /// password.
    #[inline]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the logical database to SELECT after connecting.
    #[inline]
    pub fn database(mut self, database: u8) -> Self {
        self.database = Some(database);
        self
    }

    /// Sets the client connection name shown by `CLIENT LIST`.
    #[inline]
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Bounds the time spent establishing the TCP connection.
    #[inline]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// Sets the socket read timeout. `None` means no timeout.
    #[inline]
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the socket write timeout. `None` means no timeout.
    #[inline]
    pub fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Forces TLS even for a `redis://` address.
    #[inline]
    pub fn tls(mut self, enabled: bool) -> Self {
        self.tls = enabled;
        self
    }

    /// Sets the maximum number of requests waiting to be written
    /// (default: 1024).
    #[inline]
    pub fn queue_size(mut self, size: usize) -> Self {
        self.queue_size = Some(size);
        self
    }

    fn into_info(self) -> Result<ConnectionInfo, Error> {
        let address = self.address.ok_or_else(|| Error::InvalidArgument {
            message: "address is required".to_string(),
        })?;
        if self.queue_size == Some(0) {
            return Err(Error::InvalidArgument {
                message: "queue size must be positive".to_string(),
            });
        }

        let mut info = ConnectionInfo::parse(&address)?;
        info.tls |= self.tls;
        info.username = self.username.or(info.username);
        info.password = self.password.or(info.password);
        info.database = self.database.or(info.database);
        info.client_name = self.client_name;
        info.connection_timeout = self.connection_timeout;
        info.read_timeout = self.read_timeout;
        info.write_timeout = self.write_timeout;
        if let Some(size) = self.queue_size {
            info.queue_size = size;
        }
        Ok(info)
    }

    /// Connects and returns the [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a missing or malformed address,
    /// [`Error::Io`] if the connection fails and [`Error::Auth`] if the
    /// server rejects the credentials.
    #[inline]
    pub async fn build(self) -> Result<Client, Error> {
        Client::connect_inner(self.into_info()?).await
    }
}
