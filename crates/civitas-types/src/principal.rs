//! The authorization subject of every registry call.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An opaque caller identity.
///
/// Principals are compared by exact string equality. The registries never
/// interpret the contents; an address, a user name, or a role name are all
/// equally valid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct Principal(String);

impl Principal {
    /// Wrap an identity string.
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Borrow the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(identity: &str) -> Self {
        Self(identity.to_owned())
    }
}

impl From<String> for Principal {
    fn from(identity: String) -> Self {
        Self(identity)
    }
}

impl PartialEq<str> for Principal {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Principal {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_exact() {
        let owner = Principal::from("CONTRACT_OWNER");
        assert_eq!(owner, "CONTRACT_OWNER");
        assert_ne!(owner, Principal::from("contract_owner"));
        assert_ne!(owner, Principal::from("CONTRACT_OWNER "));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Principal::new("user1")).ok();
        assert_eq!(json.as_deref(), Some("\"user1\""));
    }
}
