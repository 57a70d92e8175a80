//! Credential wrappers built on the secrecy crate
//!
//! Passwords and bearer tokens live in [`SecretString`] values: memory is
//! zeroed on drop, `Debug` output is redacted, and reading the value needs an
//! explicit `expose_secret()` call.
//!
//! ```rust
//! use eln_export::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("3f9a".to_string());
//! assert_eq!(token.expose_secret().as_ref(), "3f9a");
//! assert!(!format!("{token:?}").contains("3f9a"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload of a secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    /// Whether the secret holds an empty string
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A password or token held in zeroizing, redacted storage
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional plain string as an optional [`SecretString`]
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_round_trip() {
        let secret = secret_string("hunter2".to_string());
        assert_eq!(secret.expose_secret(), "hunter2");
        assert!(!secret.expose_secret().is_empty());
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(None).is_none());
        let some = secret_string_opt(Some("tok".to_string())).unwrap();
        assert_eq!(some.expose_secret().as_ref(), "tok");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("lab-password".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("lab-password"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Credentials {
            token: SecretString,
        }

        let creds: Credentials = toml::from_str("token = \"abc\"").unwrap();
        assert_eq!(creds.token.expose_secret(), "abc");
    }
}
