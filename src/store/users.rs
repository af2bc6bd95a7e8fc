use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::User;
use crate::store::StoreError;

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, User>,
    /// Index on the case-insensitive email key (spec.md §3 uniqueness rule).
    by_email: HashMap<String, Uuid>,
}

#[derive(Clone, Default)]
pub struct UserTable {
    inner: Arc<RwLock<Inner>>,
}

impl UserTable {
    pub fn create(&self, user: User) -> Result<User, StoreError> {
        let key = User::email_key(&user.email);
        let mut inner = self.inner.write();
        if inner.by_email.contains_key(&key) {
            return Err(StoreError::Conflict(
                "an account with this email already exists".into(),
            ));
        }
        inner.by_email.insert(key, user.id);
        inner.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get(&self, id: Uuid) -> Result<User, StoreError> {
        self.inner
            .read()
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read();
        let key = User::email_key(email);
        inner.by_email.get(&key).and_then(|id| inner.by_id.get(id)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hash".into(),
            locale: "en-US".into(),
            created_at_utc: Utc::now(),
        }
    }

    #[test]
    fn email_uniqueness_is_case_insensitive() {
        let table = UserTable::default();
        table.create(user("Person@Example.com")).unwrap();
        let err = table.create(user("person@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn find_by_email_is_case_insensitive() {
        let table = UserTable::default();
        let u = table.create(user("Person@Example.com")).unwrap();
        let found = table.find_by_email("PERSON@EXAMPLE.COM").unwrap();
        assert_eq!(found.id, u.id);
    }
}
