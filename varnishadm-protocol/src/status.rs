use std::fmt;

/// Three-digit CLIS status code prefixed to every response frame.
///
/// Unknown codes are carried verbatim; [`reason`](Self::reason) names the
/// documented ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const SYNTAX: Self = Self(100);
    pub const UNKNOWN: Self = Self(101);
    pub const UNIMPL: Self = Self(102);
    pub const TOO_FEW: Self = Self(104);
    pub const TOO_MANY: Self = Self(105);
    pub const PARAM: Self = Self(106);
    /// Authentication challenge; only valid as the first frame after connect.
    pub const AUTH: Self = Self(107);
    pub const OK: Self = Self(200);
    pub const TRUNCATED: Self = Self(201);
    pub const CANT: Self = Self(300);
    pub const COMMS: Self = Self(400);
    /// Sent in reply to `quit` before the server closes the connection.
    pub const CLOSE: Self = Self(500);

    pub fn value(self) -> u16 {
        self.0
    }

    /// Documented name for this code, if any.
    pub fn reason(self) -> Option<&'static str> {
        match self {
            Self::SYNTAX => Some("syntax error"),
            Self::UNKNOWN => Some("unknown request"),
            Self::UNIMPL => Some("unimplemented"),
            Self::TOO_FEW => Some("too few parameters"),
            Self::TOO_MANY => Some("too many parameters"),
            Self::PARAM => Some("parameter error"),
            Self::AUTH => Some("authentication required"),
            Self::OK => Some("ok"),
            Self::TRUNCATED => Some("response truncated"),
            Self::CANT => Some("cannot perform operation"),
            Self::COMMS => Some("communication error"),
            Self::CLOSE => Some("closing connection"),
            _ => None,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
