use std::{convert::Infallible, fmt, str::FromStr};

/// The file transfer protocol the client used to connect to the gateway.
///
/// The textual form doubles as the prefix of protocol specific credential fields, e.g.
/// `SFTPPassword` overrides `Password` for SFTP logins. Protocols we don't know are kept verbatim
/// so that their prefixed fields still resolve.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Plain FTP
    Ftp,
    /// FTP over TLS
    Ftps,
    /// SSH file transfer
    Sftp,
    /// Applicability Statement 2
    As2,
    /// Anything else the gateway may send
    Other(String),
}

impl Protocol {
    /// The protocol name as sent by the gateway, which is also the field prefix.
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Ftp => "FTP",
            Protocol::Ftps => "FTPS",
            Protocol::Sftp => "SFTP",
            Protocol::As2 => "AS2",
            Protocol::Other(s) => s,
        }
    }

    /// FTP and FTPS have no key based login, so an empty password can never be valid for them.
    ///
    /// Unlike the field prefix this ignores case, so a lower case `ftp` is held to the same rule.
    pub fn requires_password(&self) -> bool {
        match self {
            Protocol::Ftp | Protocol::Ftps => true,
            Protocol::Other(s) => s.eq_ignore_ascii_case("FTP") || s.eq_ignore_ascii_case("FTPS"),
            _ => false,
        }
    }
}

impl FromStr for Protocol {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Protocol::from(s))
    }
}

impl From<&str> for Protocol {
    // Exact names only. Any other spelling stays verbatim since it is used as the field prefix.
    fn from(s: &str) -> Self {
        match s {
            "FTP" => Protocol::Ftp,
            "FTPS" => Protocol::Ftps,
            "SFTP" => Protocol::Sftp,
            "AS2" => Protocol::As2,
            _ => Protocol::Other(s.to_string()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
