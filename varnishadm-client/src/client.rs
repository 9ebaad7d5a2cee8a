use tracing::{debug, info, warn};
use varnishadm_rs_protocol::{Command, ProtocolVersion, ResponseFrame, StatusCode, auth, response};

use crate::connection::Connection;
use crate::error::{AdminError, Result};
use crate::state::{ClientConfig, ServerAddress};

/// Async client for the varnishd management port.
///
/// One command is in flight at a time; the protocol forbids pipelining,
/// and `&mut self` on every operation enforces it structurally.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> varnishadm_rs_client::Result<()> {
/// use varnishadm_rs_client::VarnishAdminClient;
///
/// let mut client = VarnishAdminClient::new("127.0.0.1", 6082, "4.0")?;
/// client.set_secret("s3cr3t\n");
/// let banner = client.connect().await?;
/// println!("{banner}");
///
/// client.purge_url("^/images/").await?;
/// if !client.status().await {
///     client.start().await?;
/// }
/// client.quit().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VarnishAdminClient {
    addr: ServerAddress,
    version: ProtocolVersion,
    secret: Option<String>,
    config: ClientConfig,
    connection: Option<Connection>,
}

impl VarnishAdminClient {
    /// Create a disconnected client with default configuration.
    ///
    /// `version_str` selects the command vocabulary from its leading major
    /// number (`"3"`, `"3.0.5"`, `"4.1"`); an empty string selects V3.
    /// Versions other than 3 and 4 are rejected. An empty `host` creates a
    /// placeholder client whose commands are no-ops.
    pub fn new(host: impl Into<String>, port: u16, version_str: &str) -> Result<Self> {
        Self::with_config(host, port, version_str, ClientConfig::default())
    }

    /// Create a disconnected client with custom [`ClientConfig`].
    pub fn with_config(
        host: impl Into<String>,
        port: u16,
        version_str: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let version = ProtocolVersion::from_version_str(version_str)?;
        Ok(Self {
            addr: ServerAddress::new(host, port),
            version,
            secret: None,
            config,
            connection: None,
        })
    }

    /// Configure the authentication secret, used when the server issues a
    /// 107 challenge on connect. For a `-S secretfile` setup, pass the file
    /// contents verbatim (including any trailing newline).
    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.secret = Some(secret.into());
    }

    // -- Accessors --

    pub fn server_address(&self) -> &ServerAddress {
        &self.addr
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    // -- Connection lifecycle --

    /// Connect to the admin port and run the handshake.
    ///
    /// Reads the banner frame; on a 107 challenge, answers it with the
    /// configured secret ([`AuthRequired`](AdminError::AuthRequired) if none
    /// is set, [`AuthFailed`](AdminError::AuthFailed) if the exchange fails
    /// for any reason). The final frame must be 200, else
    /// [`BadBanner`](AdminError::BadBanner). Returns the banner body.
    ///
    /// Connecting while already connected replaces the previous session;
    /// callers should [`close`](Self::close) first.
    pub async fn connect(&mut self) -> Result<String> {
        info!(addr = %self.addr, "connecting");
        let mut connection = Connection::connect(
            &self.addr.to_string(),
            self.config.connect_timeout,
            self.config.read_timeout,
        )
        .await?;

        let mut banner = connection.read_frame().await?;

        if banner.status == StatusCode::AUTH {
            let Some(secret) = self.secret.clone() else {
                return Err(AdminError::AuthRequired);
            };
            banner = match self.authenticate(&mut connection, &banner.body, &secret).await {
                Ok(frame) => frame,
                Err(err) => {
                    // cause intentionally collapsed; operators match on the
                    // terse message
                    debug!(%err, "authentication exchange failed");
                    return Err(AdminError::AuthFailed);
                }
            };
        }

        if banner.status != StatusCode::OK {
            return Err(AdminError::BadBanner {
                addr: self.addr.to_string(),
                status: banner.status,
            });
        }

        info!(version = ?self.version, "connected");
        self.connection = Some(connection);
        Ok(banner.body)
    }

    async fn authenticate(
        &self,
        connection: &mut Connection,
        banner_body: &str,
        secret: &str,
    ) -> Result<ResponseFrame> {
        let challenge = auth::challenge_from_banner(banner_body)?;
        let cmd = Command::Auth {
            response: auth::auth_response(challenge, secret),
        };
        debug!("answering auth challenge");
        connection.send_command(&cmd, self.version).await?;

        let frame = connection.read_frame().await?;
        if frame.status != StatusCode::OK {
            return Err(AdminError::CommandFailed {
                command: cmd.name().to_owned(),
                status: frame.status,
                body: response::indent_body(&frame.body),
            });
        }
        Ok(frame)
    }

    /// Send `quit` (expected close code 500), then release the connection.
    ///
    /// Best effort: a failure of the quit command itself is logged and
    /// discarded, and the connection is closed regardless.
    pub async fn quit(&mut self) {
        if let Err(err) = self.command(&Command::Quit).await {
            debug!(%err, "quit command failed");
        }
        self.close().await;
    }

    /// Release the connection without saying goodbye. Idempotent.
    pub async fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.shutdown().await.ok();
            debug!("connection closed");
        }
    }

    // -- Administrative operations --

    /// Invalidate cached objects matching a ban expression
    /// (`field operator arg [&& ...]`), passed through verbatim.
    pub async fn purge(&mut self, expression: &str) -> Result<String> {
        debug!(expression, "ban");
        let cmd = Command::Ban {
            expression: expression.to_owned(),
        };
        Ok(self.command(&cmd).await?.unwrap_or_default())
    }

    /// Invalidate cached objects by URL.
    ///
    /// Sends `ban.url` on V3 and the `ban req.url ~` equivalent on V4.
    pub async fn purge_url(&mut self, url: &str) -> Result<String> {
        debug!(url, "ban url");
        let cmd = Command::BanUrl {
            url: url.to_owned(),
        };
        Ok(self.command(&cmd).await?.unwrap_or_default())
    }

    /// True when the cache child process is running.
    ///
    /// Never fails: any command error (including not being connected) is
    /// logged and reported as `false`.
    pub async fn status(&mut self) -> bool {
        match self.command(&Command::Status).await {
            Ok(Some(body)) => response::parse_child_state(&body) == Some("running"),
            Ok(None) => false,
            Err(err) => {
                debug!(%err, "status check failed");
                false
            }
        }
    }

    /// Start the cache child process.
    ///
    /// When [`status`](Self::status) already reports running, nothing is
    /// sent; a warning is emitted and the call reports success. The check
    /// races with external state changes — the protocol has no
    /// check-and-set — so the command may still be rejected by a concurrent
    /// administrator.
    pub async fn start(&mut self) -> Result<bool> {
        if self.status().await {
            warn!("varnish already started");
            return Ok(true);
        }
        self.command(&Command::Start).await?;
        Ok(true)
    }

    /// Stop the cache child process. Symmetric to [`start`](Self::start).
    pub async fn stop(&mut self) -> Result<bool> {
        if !self.status().await {
            warn!("varnish already stopped");
            return Ok(true);
        }
        self.command(&Command::Stop).await?;
        Ok(true)
    }

    // -- Private helpers --

    /// One command/response round trip, the primitive under every public
    /// operation.
    ///
    /// Placeholder clients (no host configured) return `Ok(None)` without
    /// touching the transport. A response status other than the command's
    /// expected code becomes [`CommandFailed`](AdminError::CommandFailed);
    /// the session stays usable afterwards.
    async fn command(&mut self, cmd: &Command) -> Result<Option<String>> {
        if self.addr.is_unset() {
            debug!(command = cmd.name(), "no host configured, skipping");
            return Ok(None);
        }

        let connection = self.connection.as_mut().ok_or(AdminError::NotConnected)?;
        connection.send_command(cmd, self.version).await?;
        let frame = connection.read_frame().await?;

        if frame.status != cmd.expected_status() {
            return Err(AdminError::CommandFailed {
                command: cmd.format_line(self.version),
                status: frame.status,
                body: response::indent_body(&frame.body),
            });
        }
        Ok(Some(frame.body))
    }
}
