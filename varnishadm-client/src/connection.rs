use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, trace, warn};
use varnishadm_rs_protocol::{Command, ProtocolVersion, ResponseFrame, response};

use crate::error::{AdminError, Result};

#[derive(Debug)]
pub struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    read_timeout: Duration,
}

impl Connection {
    pub async fn connect(
        addr: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self> {
        debug!(addr, "TCP connecting");
        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| AdminError::Timeout(connect_timeout))?
            .map_err(AdminError::Io)?;

        stream.set_nodelay(true).ok();

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            read_timeout,
        })
    }

    pub async fn send_command(&mut self, cmd: &Command, version: ProtocolVersion) -> Result<()> {
        trace!(?cmd, "sending");
        let bytes = cmd.to_bytes(version);
        self.send_raw(&bytes).await
    }

    pub async fn send_raw(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data).await.map_err(AdminError::Io)?;
        self.writer.flush().await.map_err(AdminError::Io)?;
        Ok(())
    }

    /// Read one response frame: the status line, the length-delimited body,
    /// and the trailing newline.
    pub async fn read_frame(&mut self) -> Result<ResponseFrame> {
        let line = self.read_line().await?;
        let (status, length) = response::parse_header(&line)?;

        let mut body = vec![0u8; length];
        self.read_exact(&mut body).await?;

        // body is followed by a single '\n'
        let mut terminator = [0u8; 1];
        self.read_exact(&mut terminator).await?;

        let frame = ResponseFrame::new(status, String::from_utf8_lossy(&body).into_owned());
        trace!(status = %frame.status, len = length, "frame received");
        Ok(frame)
    }

    pub async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = tokio::time::timeout(self.read_timeout, self.reader.read_line(&mut line))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.read_timeout, "read timeout");
                AdminError::Timeout(self.read_timeout)
            })?
            .map_err(AdminError::Io)?;
        if n == 0 {
            return Err(AdminError::Disconnected);
        }
        Ok(line)
    }

    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        tokio::time::timeout(self.read_timeout, self.reader.read_exact(buf))
            .await
            .map_err(|_| AdminError::Timeout(self.read_timeout))?
            .map_err(AdminError::Io)?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await.map_err(AdminError::Io)?;
        Ok(())
    }
}
