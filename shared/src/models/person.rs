//! Person Model (admins, delivery boys, customer logins)

use crate::util::utc_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    DeliveryBoy,
    Customer,
}

/// Roster status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PersonStatus {
    #[default]
    Active,
    Inactive,
}

/// User account (without password)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    /// Not every account carries a mobile number
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub status: PersonStatus,
    #[serde(
        default,
        with = "utc_timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Person {
    pub fn is_delivery_boy(&self) -> bool {
        self.role == Role::DeliveryBoy
    }

    pub fn is_active(&self) -> bool {
        self.status == PersonStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_user() {
        let json = r#"{"id":"b1","username":"delivery_boy1","role":"delivery_boy","name":"John Delivery","created_at":"2024-01-01T00:00:00"}"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert!(person.is_delivery_boy());
        assert!(person.is_active());
        assert_eq!(person.mobile, "");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"id":"x","username":"x","role":"driver","name":"X"}"#;
        assert!(serde_json::from_str::<Person>(json).is_err());
    }
}
