//! In-process mock varnishd admin endpoint for tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;
use varnishadm_rs_protocol::auth;

pub const BANNER: &str = "-----------------------------\n\
Varnish Cache CLI 1.0\n\
-----------------------------\n\
varnish-3.0.5 revision 1a89b1f\n\
\n\
Type 'help' for command list.\n\
Type 'quit' to close CLI session.";

pub struct MockConfig {
    /// When set, the mock issues a 107 challenge banner and verifies
    /// `auth` responses against this secret.
    pub secret: Option<String>,
    /// Challenge nonce placed at the start of the 107 banner body.
    pub challenge: String,
    /// Initial cache child state reported by `status`.
    pub child_state: String,
    /// Status code of the (post-auth) banner frame.
    pub banner_status: u16,
    pub banner_body: String,
}

impl MockConfig {
    /// Open admin port: 200 banner, child running.
    pub fn open() -> Self {
        Self {
            secret: None,
            challenge: "ixslvvxrgkjptxmcgnnsdxsvdmvfympg".to_owned(),
            child_state: "running".to_owned(),
            banner_status: 200,
            banner_body: BANNER.to_owned(),
        }
    }

    /// Secret-protected admin port: 107 challenge banner first.
    pub fn authenticated(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Self::open()
        }
    }
}

pub struct MockServer {
    addr: SocketAddr,
    commands: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    pub async fn start(config: MockConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let commands = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&commands);
        tokio::spawn(async move {
            Self::handle_connections(listener, config, log).await;
        });

        Self { addr, commands }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Every command line received so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    async fn handle_connections(
        listener: TcpListener,
        config: MockConfig,
        commands: Arc<Mutex<Vec<String>>>,
    ) {
        let config = Arc::new(config);
        let child_state = Arc::new(Mutex::new(config.child_state.clone()));

        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let config = Arc::clone(&config);
            let commands = Arc::clone(&commands);
            let child_state = Arc::clone(&child_state);
            tokio::spawn(async move {
                Self::handle_session(stream, config, commands, child_state).await;
            });
        }
    }

    async fn handle_session(
        stream: tokio::net::TcpStream,
        config: Arc<MockConfig>,
        commands: Arc<Mutex<Vec<String>>>,
        child_state: Arc<Mutex<String>>,
    ) {
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let mut line = String::new();

        let challenge_body = format!("{}\n\nAuthentication required.\n", config.challenge);

        // varnishd speaks first: challenge or banner
        let sent = if config.secret.is_some() {
            write_frame(&mut write_half, 107, &challenge_body).await
        } else {
            write_frame(&mut write_half, config.banner_status, &config.banner_body).await
        };
        if !sent {
            return;
        }

        loop {
            line.clear();
            let n = match reader.read_line(&mut line).await {
                Ok(n) => n,
                Err(_) => break,
            };
            if n == 0 {
                break;
            }

            let trimmed = line.trim().to_owned();
            commands.lock().unwrap().push(trimmed.clone());

            if let Some(response) = trimmed.strip_prefix("auth ") {
                let ok = config
                    .secret
                    .as_deref()
                    .is_some_and(|s| auth::auth_response(&config.challenge, s) == response);
                let sent = if ok {
                    write_frame(&mut write_half, config.banner_status, &config.banner_body).await
                } else {
                    // varnishd re-issues the challenge on a bad response
                    write_frame(&mut write_half, 107, &challenge_body).await
                };
                if !sent {
                    break;
                }
            } else if trimmed == "status" {
                let body = format!("Child in state {}", child_state.lock().unwrap());
                if !write_frame(&mut write_half, 200, &body).await {
                    break;
                }
            } else if trimmed == "start" {
                *child_state.lock().unwrap() = "running".to_owned();
                if !write_frame(&mut write_half, 200, "").await {
                    break;
                }
            } else if trimmed == "stop" {
                *child_state.lock().unwrap() = "stopped".to_owned();
                if !write_frame(&mut write_half, 200, "").await {
                    break;
                }
            } else if trimmed.starts_with("ban.url ") || trimmed.starts_with("ban ") {
                if !write_frame(&mut write_half, 200, "").await {
                    break;
                }
            } else if trimmed == "quit" {
                let _ = write_frame(&mut write_half, 500, "Closing CLI connection").await;
                let _ = write_half.shutdown().await;
                break;
            } else {
                let body = "Unknown request.\nType 'help' for more info.";
                if !write_frame(&mut write_half, 101, body).await {
                    break;
                }
            }
        }
    }
}

/// Write one frame in the CLI wire format: `%-3d %-8d\n<body>\n`.
async fn write_frame(write_half: &mut OwnedWriteHalf, status: u16, body: &str) -> bool {
    let frame = format!("{status:<3} {:<8}\n{body}\n", body.len());
    if write_half.write_all(frame.as_bytes()).await.is_err() {
        return false;
    }
    write_half.flush().await.is_ok()
}
