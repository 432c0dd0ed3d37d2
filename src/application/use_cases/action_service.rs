//! Petition signing and council contact.
//!
//! All mutations go through one lock: the document is changed on a copy,
//! saved, and only then committed in memory. Concurrent submissions are
//! serialized and a failed save leaves memory and disk in agreement.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::info;

use crate::domain::action::{ActionData, ContactCouncilRequest, SignPetitionRequest};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::storage::ActionStore;

pub struct ActionService {
    store: ActionStore,
    data: Mutex<ActionData>,
}

impl ActionService {
    /// Load the current document from `store`
    pub fn new(store: ActionStore) -> Self {
        let data = store.load();
        info!(
            path = %store.path().display(),
            supporters = data.supporters,
            signatures = data.signatures,
            "Action data loaded"
        );
        Self {
            store,
            data: Mutex::new(data),
        }
    }

    pub fn snapshot(&self) -> Result<ActionData> {
        Ok(self.lock()?.clone())
    }

    /// Record a signature. Returns the new signature total.
    pub fn sign_petition(&self, request: &SignPetitionRequest) -> Result<u64> {
        request.check()?;

        let total = self.mutate(|data| {
            data.petition_signatures
                .push(request.to_signature(Utc::now().to_rfc3339()));
            data.signatures += 1;
            data.supporters += 1;
            data.signatures
        })?;

        info!(total_signatures = total, subscribed = request.wants_newsletter(), "Petition signed");
        Ok(total)
    }

    /// Count a council contact. Only the counters are stored. Returns the new
    /// actions total.
    pub fn contact_council(&self, request: &ContactCouncilRequest) -> Result<u64> {
        request.check()?;

        let total = self.mutate(|data| {
            data.actions_taken += 1;
            data.supporters += 1;
            data.actions_taken
        })?;

        info!(
            total_actions = total,
            council_members = request.council_members.len(),
            has_message = request.message.as_deref().is_some_and(|m| !m.trim().is_empty()),
            "Council contacted"
        );
        Ok(total)
    }

    fn mutate<T>(&self, change: impl FnOnce(&mut ActionData) -> T) -> Result<T> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let output = change(&mut next);
        self.store.save(&next)?;
        *guard = next;
        Ok(output)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ActionData>> {
        self.data
            .lock()
            .map_err(|_| AppError::Internal("Action data lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn temp_service() -> (ActionService, PathBuf) {
        let dir = std::env::temp_dir().join(format!("action-service-{}", uuid::Uuid::new_v4()));
        let service = ActionService::new(ActionStore::new(dir.join("action_data.json")));
        (service, dir)
    }

    fn petition(body: serde_json::Value) -> SignPetitionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_sign_petition_increments_and_persists() {
        let (service, dir) = temp_service();
        let before = service.snapshot().unwrap();

        let total = service
            .sign_petition(&petition(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "postal_code": "L7R 1A1",
                "newsletter": true
            })))
            .unwrap();

        let after = service.snapshot().unwrap();
        assert_eq!(total, before.signatures + 1);
        assert_eq!(after.signatures, before.signatures + 1);
        assert_eq!(after.supporters, before.supporters + 1);
        assert_eq!(after.actions_taken, before.actions_taken);
        assert_eq!(after.petition_signatures.len(), 1);

        let signature = &after.petition_signatures[0];
        assert!(!signature.signed_at.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&signature.signed_at).is_ok());
        assert!(signature.subscribed);

        // Persisted document matches memory
        assert_eq!(ActionStore::new(dir.join("action_data.json")).load(), after);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_petition_does_not_mutate() {
        let (service, dir) = temp_service();
        let before = service.snapshot().unwrap();

        let err = service
            .sign_petition(&petition(json!({"first_name": "Ada", "last_name": "Lovelace"})))
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(service.snapshot().unwrap(), before);
        assert!(!dir.join("action_data.json").exists());
    }

    #[test]
    fn test_contact_council_counts_only() {
        let (service, dir) = temp_service();
        let before = service.snapshot().unwrap();
        let request: ContactCouncilRequest = serde_json::from_value(json!({
            "name": "Grace",
            "email": "grace@example.com",
            "message": "Please legalize fourplexes",
            "council_members": ["Ward 1", "Ward 2"]
        }))
        .unwrap();

        let total = service.contact_council(&request).unwrap();

        let after = service.snapshot().unwrap();
        assert_eq!(total, before.actions_taken + 1);
        assert_eq!(after.supporters, before.supporters + 1);
        assert_eq!(after.signatures, before.signatures);
        assert!(after.petition_signatures.is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_save_leaves_memory_unchanged() {
        // Parent "directory" is a regular file, so the save cannot succeed
        let blocker = std::env::temp_dir().join(format!("action-blocker-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, "").unwrap();
        let service = ActionService::new(ActionStore::new(blocker.join("action_data.json")));
        let before = service.snapshot().unwrap();

        let request: ContactCouncilRequest =
            serde_json::from_value(json!({"name": "Grace", "email": "g@example.com"})).unwrap();
        let err = service.contact_council(&request).unwrap_err();

        assert!(!err.is_client_error());
        assert_eq!(service.snapshot().unwrap(), before);
        std::fs::remove_file(&blocker).ok();
    }

    #[test]
    fn test_concurrent_signatures_are_not_lost() {
        let (service, dir) = temp_service();
        let service = Arc::new(service);
        let before = service.snapshot().unwrap().signatures;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                std::thread::spawn(move || {
                    service
                        .sign_petition(&petition(json!({
                            "first_name": format!("Signer{}", i),
                            "last_name": "Test",
                            "email": format!("signer{}@example.com", i)
                        })))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let after = service.snapshot().unwrap();
        assert_eq!(after.signatures, before + 8);
        assert_eq!(after.petition_signatures.len(), 8);
        assert_eq!(ActionStore::new(dir.join("action_data.json")).load(), after);
        std::fs::remove_dir_all(&dir).ok();
    }
}
