use bytes::Bytes;
use std::fmt;

/// A password as presented by the client. Never shows up in logs.
#[derive(PartialEq, Eq, Clone, Default)]
pub struct Password {
    bytes: Bytes,
}

impl Password {
    /// Wraps the given password bytes
    pub fn new(bytes: Bytes) -> Self {
        Password { bytes }
    }

    /// Clients using key based logins don't send a password.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Exact, case sensitive comparison with a stored clear text password.
    // TODO: compare in constant time once stored passwords move away from clear text.
    pub fn matches(&self, stored: &str) -> bool {
        self.bytes.as_ref() == stored.as_bytes()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*******")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password {{ bytes: ******* }}")
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s.into())
    }
}

impl AsRef<[u8]> for Password {
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECRET: &str = "supersecret";

    #[test]
    fn password_obscures_display() {
        assert_eq!("*******", format!("{}", password()));
    }

    #[test]
    fn password_obscures_debug() {
        assert_eq!("Password { bytes: ******* }", format!("{:?}", password()));
    }

    #[test]
    fn password_retrievable_as_ref() {
        assert_eq!(SECRET.as_bytes(), password().as_ref())
    }

    #[test]
    fn matching_is_exact() {
        assert!(password().matches("supersecret"));
        assert!(!password().matches("SuperSecret"));
        assert!(!password().matches("supersecret "));
    }

    #[test]
    fn default_is_empty() {
        assert!(Password::default().is_empty());
        assert!(!password().is_empty());
    }

    fn password() -> Password {
        Password::from(SECRET)
    }
}
