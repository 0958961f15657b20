//! User domain model and repository.
//!
//! The repository owns the SQL statements and the row mapping; resolvers call
//! it and never see the gateway's loosely-typed rows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HubError, StorageError};
use crate::gateway::{Predicate, Row, StorageGateway};

/// Event topics, stable for the process lifetime.
pub mod topics {
    /// A user row was committed by `createUser`.
    pub const USER_ADDED: &str = "user_added";
}

/// A user as held by resolvers: a transient copy, never cached. The id is
/// opaque and assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    fn from_row(mut row: Row) -> Result<Self, HubError> {
        let mut take = |column: &str| -> Result<String, HubError> {
            match row.remove(column) {
                Some(Value::String(s)) => Ok(s),
                Some(Value::Number(n)) => Ok(n.to_string()),
                other => Err(StorageError::Decode(format!(
                    "users.{column}: expected text, got {other:?}"
                ))
                .into()),
            }
        };
        Ok(Self {
            id: take("id")?,
            name: take("name")?,
            email: take("email")?,
        })
    }
}

const TABLE: &str = "users";
const SELECT_BY_ID: &str = "SELECT id, name, email FROM users WHERE id = $1";
const SELECT_ALL: &str = "SELECT id, name, email FROM users ORDER BY created_at, id";

/// Create/read/delete for users through the storage gateway.
#[derive(Clone)]
pub struct UserRepo {
    gateway: Arc<dyn StorageGateway>,
}

impl UserRepo {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    pub async fn find(&self, id: &str) -> Result<Option<User>, HubError> {
        let rows = self
            .gateway
            .query(SELECT_BY_ID, &[Value::from(id)])
            .await?;
        rows.into_iter().next().map(User::from_row).transpose()
    }

    pub async fn all(&self) -> Result<Vec<User>, HubError> {
        let rows = self.gateway.query(SELECT_ALL, &[]).await?;
        rows.into_iter().map(User::from_row).collect()
    }

    /// Insert a user and return it with the store-assigned id.
    /// Input is validated before any store call.
    pub async fn create(&self, name: &str, email: &str) -> Result<User, HubError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(HubError::Validation("name must not be empty".into()));
        }
        if email.is_empty() {
            return Err(HubError::Validation("email must not be empty".into()));
        }

        let mut record = Row::new();
        record.insert("name".to_string(), Value::from(name));
        record.insert("email".to_string(), Value::from(email));
        let id = self.gateway.insert(TABLE, record).await?;

        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Delete a user. Zero affected rows means the id was absent.
    pub async fn remove(&self, id: &str) -> Result<(), HubError> {
        let affected = self
            .gateway
            .delete(TABLE, Predicate::eq("id", id))
            .await?;
        if affected == 0 {
            return Err(HubError::NotFound(format!("user {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryGateway;

    fn repo() -> UserRepo {
        UserRepo::new(Arc::new(MemoryGateway::new()))
    }

    #[tokio::test]
    async fn create_assigns_id_and_roundtrips() {
        let repo = UserRepo::new(Arc::new(MemoryGateway::starting_at(7)));

        let created = repo.create("Ana", "ana@example.com").await.unwrap();
        assert_eq!(
            created,
            User {
                id: "7".into(),
                name: "Ana".into(),
                email: "ana@example.com".into(),
            }
        );

        let found = repo.find("7").await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn create_rejects_empty_input_before_any_store_call() {
        let gateway = Arc::new(MemoryGateway::new());
        let repo = UserRepo::new(gateway.clone());

        assert!(matches!(
            repo.create("", "ana@example.com").await,
            Err(HubError::Validation(_))
        ));
        assert!(matches!(
            repo.create("Ana", "   ").await,
            Err(HubError::Validation(_))
        ));
        assert!(gateway.rows("users").is_empty());
    }

    #[tokio::test]
    async fn remove_missing_user_is_not_found() {
        let err = repo().remove("42").await.unwrap_err();
        assert!(matches!(err, HubError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_then_find_returns_none() {
        let repo = repo();
        let user = repo.create("Ana", "ana@example.com").await.unwrap();

        repo.remove(&user.id).await.unwrap();
        assert_eq!(repo.find(&user.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn all_on_empty_store_is_empty() {
        assert!(repo().all().await.unwrap().is_empty());
    }
}
