//! Newtype IDs for type-safe identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(LineId);
define_id!(PackageId);
define_id!(UserId);

impl LineId {
    /// Generate an id for one add-to-cart invocation.
    ///
    /// The same configuration added twice gets two ids, so it lands as two
    /// lines: `"{prefix}-{unix_millis}-{sequence}"`.
    pub fn for_invocation(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static SEQUENCE: AtomicU64 = AtomicU64::new(0);

        let millis = chrono::Utc::now().timestamp_millis();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}-{}-{}", prefix, millis, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = PackageId::new("car-premium");
        assert_eq!(id.as_str(), "car-premium");
    }

    #[test]
    fn test_invocation_ids_are_unique() {
        let a = LineId::for_invocation("car-premium");
        let b = LineId::for_invocation("car-premium");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("car-premium-"));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = LineId::new("line-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""line-1""#);
    }

    #[test]
    fn test_id_from_str() {
        let id: UserId = "user-7".into();
        assert_eq!(format!("{}", id), "user-7");
    }
}
