//! Strongly-typed identifier value objects.
//!
//! Marketplace identifiers are issued by the REST backend and arrive as
//! opaque strings (`"ORD-1042"`, `"rider-7"`), so they wrap `String` rather
//! than a UUID. Only [`ConnectionId`] is generated locally.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, rejecting blank values.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a customer order.
    OrderId,
    "order_id"
);

string_id!(
    /// Identifier of a notification shown in the admin/store bell.
    NotificationId,
    "notification_id"
);

string_id!(
    /// Identifier of a tracked entity (rider, driver, vehicle).
    EntityId,
    "entity_id"
);

/// Identifier of a single transport attempt.
///
/// Generated each time the channel opens the transport so log lines from one
/// connection can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Creates a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_rejects_blank() {
        assert!(OrderId::new("   ").is_err());
        assert!(OrderId::new("").is_err());
    }

    #[test]
    fn order_id_keeps_value() {
        let id = OrderId::new("ORD-1042").unwrap();
        assert_eq!(id.as_str(), "ORD-1042");
        assert_eq!(id.to_string(), "ORD-1042");
    }

    #[test]
    fn entity_id_serializes_transparently() {
        let id = EntityId::new("rider-7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""rider-7""#);

        let parsed: EntityId = serde_json::from_str(r#""rider-7""#).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn deserialization_rejects_blank_ids() {
        let err = serde_json::from_str::<OrderId>(r#""""#).unwrap_err();
        assert!(err.to_string().contains("order_id"));
        assert!(serde_json::from_str::<EntityId>(r#""  ""#).is_err());
        assert!(serde_json::from_str::<NotificationId>(r#""""#).is_err());
    }

    #[test]
    fn connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }
}
