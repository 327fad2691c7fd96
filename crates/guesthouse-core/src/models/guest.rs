//! Guest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Guest entity
///
/// A person registered at the front desk. Guests are looked up by exact
/// name, identity document or telephone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    /// Unique identifier
    pub id: i64,

    /// Full name
    pub name: String,

    /// Identity document number
    pub document: Option<String>,

    /// Contact telephone
    pub telephone: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    /// Check whether `data` equals the name, document or telephone
    pub fn matches(&self, data: &str) -> bool {
        self.name == data
            || self.document.as_deref() == Some(data)
            || self.telephone.as_deref() == Some(data)
    }
}

impl Default for Guest {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            document: None,
            telephone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_any_lookup_field() {
        let guest = Guest {
            name: "Maria Souza".to_string(),
            document: Some("123.456.789-00".to_string()),
            telephone: Some("+55 31 99999-0000".to_string()),
            ..Default::default()
        };

        assert!(guest.matches("Maria Souza"));
        assert!(guest.matches("123.456.789-00"));
        assert!(guest.matches("+55 31 99999-0000"));
        assert!(!guest.matches("Maria"));
    }

    #[test]
    fn test_matches_ignores_absent_fields() {
        let guest = Guest {
            name: "Joao".to_string(),
            ..Default::default()
        };

        assert!(!guest.matches(""));
    }
}
