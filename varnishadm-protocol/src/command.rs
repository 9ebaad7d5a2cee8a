use crate::status::StatusCode;
use crate::version::ProtocolVersion;

/// Administrative commands understood by the varnishd management port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Challenge response: `auth <sha256-hex>`.
    Auth { response: String },
    /// Invalidate objects matching a ban expression.
    Ban { expression: String },
    /// Invalidate objects by URL. The only literal that differs by version.
    BanUrl { url: String },
    Status,
    Start,
    Stop,
    Quit,
}

impl Command {
    /// Serialize to wire bytes: a single ASCII line terminated by `\n`.
    pub fn to_bytes(&self, version: ProtocolVersion) -> Vec<u8> {
        let line = self.format_line(version);
        format!("{line}\n").into_bytes()
    }

    /// The status code the server is expected to reply with.
    ///
    /// Everything answers 200 except `quit`, which is acknowledged with
    /// the 500 close code before the server drops the connection.
    pub fn expected_status(&self) -> StatusCode {
        match self {
            Self::Quit => StatusCode::CLOSE,
            _ => StatusCode::OK,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth",
            Self::Ban { .. } => "ban",
            Self::BanUrl { .. } => "ban.url",
            Self::Status => "status",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Quit => "quit",
        }
    }

    pub fn format_line(&self, version: ProtocolVersion) -> String {
        match self {
            Self::Auth { response } => format!("auth {response}"),
            Self::Ban { expression } => format!("ban {expression}"),
            // v4 dropped ban.url; the equivalent is a regex ban on req.url
            Self::BanUrl { url } => match version {
                ProtocolVersion::V3 => format!("ban.url {url}"),
                ProtocolVersion::V4 => format!("ban req.url ~ {url}"),
            },
            Self::Status => "status".into(),
            Self::Start => "start".into(),
            Self::Stop => "stop".into(),
            Self::Quit => "quit".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ban_same_on_both_versions() {
        let cmd = Command::Ban {
            expression: "req.http.host == example.com && req.url ~ ^/images".into(),
        };
        let line = "ban req.http.host == example.com && req.url ~ ^/images";
        assert_eq!(cmd.format_line(ProtocolVersion::V3), line);
        assert_eq!(cmd.format_line(ProtocolVersion::V4), line);
    }

    #[test]
    fn ban_url_v3() {
        let cmd = Command::BanUrl {
            url: "http://x".into(),
        };
        assert_eq!(cmd.to_bytes(ProtocolVersion::V3), b"ban.url http://x\n");
    }

    #[test]
    fn ban_url_v4() {
        let cmd = Command::BanUrl {
            url: "http://x".into(),
        };
        assert_eq!(
            cmd.to_bytes(ProtocolVersion::V4),
            b"ban req.url ~ http://x\n"
        );
    }

    #[test]
    fn auth_line() {
        let cmd = Command::Auth {
            response: "deadbeef".into(),
        };
        assert_eq!(cmd.to_bytes(ProtocolVersion::V3), b"auth deadbeef\n");
    }

    #[test]
    fn bare_literals_identical_across_versions() {
        for cmd in [Command::Status, Command::Start, Command::Stop, Command::Quit] {
            assert_eq!(
                cmd.format_line(ProtocolVersion::V3),
                cmd.format_line(ProtocolVersion::V4),
            );
            assert_eq!(cmd.format_line(ProtocolVersion::V3), cmd.name());
        }
    }

    #[test]
    fn quit_expects_close() {
        assert_eq!(Command::Quit.expected_status(), StatusCode::CLOSE);
        assert_eq!(Command::Status.expected_status(), StatusCode::OK);
        assert_eq!(
            Command::Ban {
                expression: "obj.http.x ~ .".into()
            }
            .expected_status(),
            StatusCode::OK
        );
    }
}
