//! Guest DTOs
//!
//! Request and response types for guest endpoints.

use chrono::{DateTime, Utc};
use guesthouse_core::models::Guest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Guest creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuestCreateRequest {
    /// Full name
    #[validate(
        length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    /// Identity document number
    #[validate(length(max = 40))]
    pub document: Option<String>,

    /// Contact telephone
    #[validate(length(max = 40))]
    pub telephone: Option<String>,
}

impl GuestCreateRequest {
    /// Convert to Guest entity
    pub fn to_guest(&self) -> Guest {
        Guest {
            name: self.name.trim().to_string(),
            document: non_blank(&self.document),
            telephone: non_blank(&self.telephone),
            ..Default::default()
        }
    }
}

/// Guest update request; absent fields keep their value
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuestUpdateRequest {
    #[validate(
        length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 40))]
    pub document: Option<String>,

    #[validate(length(max = 40))]
    pub telephone: Option<String>,
}

impl GuestUpdateRequest {
    /// Apply the present fields to `guest`
    pub fn apply(&self, guest: &mut Guest) {
        if let Some(name) = &self.name {
            guest.name = name.trim().to_string();
        }
        if self.document.is_some() {
            guest.document = non_blank(&self.document);
        }
        if self.telephone.is_some() {
            guest.telephone = non_blank(&self.telephone);
        }
    }
}

/// Names are stored trimmed, so whitespace alone is not a name
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Guest response
#[derive(Debug, Clone, Serialize)]
pub struct GuestResponse {
    pub id: i64,
    pub name: String,
    pub document: Option<String>,
    pub telephone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Guest> for GuestResponse {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            name: guest.name,
            document: guest.document,
            telephone: guest.telephone,
            created_at: guest.created_at,
            updated_at: guest.updated_at,
        }
    }
}

/// Amount owed by a guest
#[derive(Debug, Clone, Serialize)]
pub struct AmountResponse {
    pub guest_id: i64,

    /// `None` when the guest has no check-in yet
    pub amount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let req = GuestCreateRequest {
            name: "Maria Oliveira".to_string(),
            document: Some("12345678900".to_string()),
            telephone: None,
        };
        assert!(req.validate().is_ok());

        let empty = GuestCreateRequest {
            name: String::new(),
            ..req.clone()
        };
        assert!(empty.validate().is_err());

        let too_long = GuestCreateRequest {
            name: "x".repeat(121),
            ..req
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_whitespace_name_is_rejected() {
        let create = GuestCreateRequest {
            name: "   ".to_string(),
            document: None,
            telephone: None,
        };
        assert!(create.validate().is_err());

        let update = GuestUpdateRequest {
            name: Some(" \t ".to_string()),
            document: None,
            telephone: None,
        };
        assert!(update.validate().is_err());

        let keep_name = GuestUpdateRequest {
            name: None,
            document: Some("123".to_string()),
            telephone: None,
        };
        assert!(keep_name.validate().is_ok());
    }

    #[test]
    fn test_blank_contact_fields_are_dropped() {
        let req = GuestCreateRequest {
            name: "  Maria Oliveira ".to_string(),
            document: Some("   ".to_string()),
            telephone: Some(" 11 5555-0101 ".to_string()),
        };
        let guest = req.to_guest();

        assert_eq!(guest.name, "Maria Oliveira");
        assert_eq!(guest.document, None);
        assert_eq!(guest.telephone.as_deref(), Some("11 5555-0101"));
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut guest = Guest {
            id: 3,
            name: "Joao".to_string(),
            document: Some("999".to_string()),
            telephone: Some("555".to_string()),
            ..Default::default()
        };
        let req = GuestUpdateRequest {
            name: None,
            document: Some(String::new()),
            telephone: None,
        };
        req.apply(&mut guest);

        assert_eq!(guest.name, "Joao");
        assert_eq!(guest.document, None);
        assert_eq!(guest.telephone.as_deref(), Some("555"));
    }
}
