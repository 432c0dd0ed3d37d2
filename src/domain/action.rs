use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::domain::error::{AppError, Result};

/// Engagement counters and petition signatures, persisted as one document
/// Keys missing from a stored document take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionData {
    pub supporters: u64,
    pub signatures: u64,
    pub actions_taken: u64,
    pub petition_goal: u64,
    pub petition_signatures: Vec<Signature>,
}

impl Default for ActionData {
    fn default() -> Self {
        Self {
            supporters: 2847,
            signatures: 1923,
            actions_taken: 547,
            petition_goal: 3000,
            petition_signatures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub postal_code: String,
    /// RFC 3339 timestamp
    pub signed_at: String,
    #[serde(default)]
    pub subscribed: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignPetitionRequest {
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Checkbox value; forms send booleans, "on", or numbers
    #[serde(default)]
    pub newsletter: Option<serde_json::Value>,
}

impl SignPetitionRequest {
    const REQUIRED: [&'static str; 3] = ["first_name", "last_name", "email"];

    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| missing_fields_error(&errors, &Self::REQUIRED))
    }

    pub fn wants_newsletter(&self) -> bool {
        self.newsletter.as_ref().is_some_and(is_truthy)
    }

    /// Build the stored signature. Call after `check`.
    pub fn to_signature(&self, signed_at: String) -> Signature {
        Signature {
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            postal_code: self.postal_code.clone().unwrap_or_default(),
            signed_at,
            subscribed: self.wants_newsletter(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactCouncilRequest {
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub council_members: Vec<String>,
}

impl ContactCouncilRequest {
    const REQUIRED: [&'static str; 2] = ["name", "email"];

    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| missing_fields_error(&errors, &Self::REQUIRED))
    }
}

/// Names the failed fields in declaration order
fn missing_fields_error(errors: &ValidationErrors, declared: &[&str]) -> AppError {
    let failed = errors.field_errors();
    let missing: Vec<&str> = declared
        .iter()
        .copied()
        .filter(|field| failed.contains_key(*field))
        .collect();
    AppError::ValidationError(format!("Missing required fields: {}", missing.join(", ")))
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn petition(body: serde_json::Value) -> SignPetitionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_default_document() {
        let data = ActionData::default();
        assert_eq!(data.supporters, 2847);
        assert_eq!(data.signatures, 1923);
        assert_eq!(data.actions_taken, 547);
        assert_eq!(data.petition_goal, 3000);
        assert!(data.petition_signatures.is_empty());
    }

    #[test]
    fn test_petition_requires_name_and_email() {
        let ok = petition(json!({"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"}));
        assert!(ok.check().is_ok());

        let missing = petition(json!({"first_name": "Ada", "last_name": "Lovelace"}));
        let err = missing.check().unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Validation error: Missing required fields: email");
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let req = petition(json!({"first_name": "", "last_name": "L", "email": ""}));
        let err = req.check().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required fields: first_name, email"
        );
    }

    #[test]
    fn test_newsletter_truthiness() {
        assert!(petition(json!({"newsletter": true})).wants_newsletter());
        assert!(petition(json!({"newsletter": "on"})).wants_newsletter());
        assert!(petition(json!({"newsletter": 1})).wants_newsletter());
        assert!(!petition(json!({"newsletter": false})).wants_newsletter());
        assert!(!petition(json!({"newsletter": ""})).wants_newsletter());
        assert!(!petition(json!({})).wants_newsletter());
    }

    #[test]
    fn test_to_signature_defaults_postal_code() {
        let req = petition(json!({"first_name": "A", "last_name": "B", "email": "c@d.e"}));
        let sig = req.to_signature("2024-01-01T00:00:00+00:00".into());
        assert_eq!(sig.postal_code, "");
        assert!(!sig.subscribed);
        assert_eq!(sig.signed_at, "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_contact_requires_name_and_email() {
        let req: ContactCouncilRequest =
            serde_json::from_value(json!({"email": "x@y.z", "council_members": ["Ward 2"]})).unwrap();
        let err = req.check().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Missing required fields: name");
        assert_eq!(req.council_members, vec!["Ward 2".to_string()]);
    }
}
