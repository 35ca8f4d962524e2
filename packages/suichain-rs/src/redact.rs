//! Account-key redaction.
//!
//! [`Redacted`] seals a secret (usually a `suiprivkey1...` string) so that
//! formatting it for logs or JSON never shows the value. Code that actually
//! needs the key, such as [`SuiKeypair::from_encoded`](crate::SuiKeypair::from_encoded),
//! asks for it explicitly with [`Redacted::expose`].

use std::fmt;

const MASK: &str = "<redacted>";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
    pub fn new(secret: T) -> Self {
        Self(secret)
    }

    /// Borrow the secret
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Redacted<String> {
    /// Trimmed key, or `None` for a blank value
    pub fn from_non_empty(value: &str) -> Option<Self> {
        let value = value.trim();
        (!value.is_empty()).then(|| Self(value.to_string()))
    }
}

impl<T> From<T> for Redacted<T> {
    fn from(secret: T) -> Self {
        Self(secret)
    }
}

impl<T> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> fmt::Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> serde::Serialize for Redacted<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_prints_inner_value() {
        let key = Redacted::new("suiprivkey1qqqq");
        assert_eq!(format!("{}", key), "<redacted>");
        assert_eq!(format!("{:?}", Some(&key)), "Some(<redacted>)");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"<redacted>\"");
        assert_eq!(*key.expose(), "suiprivkey1qqqq");
    }

    #[test]
    fn test_from_non_empty() {
        assert!(Redacted::from_non_empty("   ").is_none());
        let key = Redacted::from_non_empty(" suiprivkey1abc\n").unwrap();
        assert_eq!(key.into_inner(), "suiprivkey1abc");
    }
}
