//! Common types used throughout DualPass.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

/// One of the two password positions a ciphertext is sealed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Short label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Slot::A => "A",
            Slot::B => "B",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.label())
    }
}

/// Password text that zeroizes on drop.
///
/// The password is only ever handed to key derivation; it is never stored
/// in any output and its `Debug` form is redacted.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Password(String);

impl Password {
    /// Wrap password text.
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Get the UTF-8 bytes fed to key derivation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self::new(password)
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self(password)
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Password {}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::A.to_string(), "slot A");
        assert_eq!(Slot::B.label(), "B");
    }

    #[test]
    fn test_slot_serde() {
        let json = serde_json::to_string(&Slot::B).unwrap();
        let slot: Slot = serde_json::from_str(&json).unwrap();
        assert_eq!(slot, Slot::B);
    }

    #[test]
    fn test_password_debug_redacted() {
        let password = Password::from("hunter2");
        let debug = format!("{:?}", password);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_password_bytes_are_utf8() {
        let password = Password::from("pässwörd");
        assert_eq!(password.as_bytes(), "pässwörd".as_bytes());
        assert!(!password.is_empty());
        assert!(Password::from("").is_empty());
    }
}
