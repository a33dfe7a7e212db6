//! User lookup and registration.

use finrep_shared::{AppError, AppResult};
use serde_json::json;

use crate::dao::{DaoSettings, DocumentDao};
use crate::models::User;
use crate::store::{DocumentStore, Filter};

/// User use cases.
#[derive(Debug)]
pub struct UserManager {
    users: DocumentDao<User>,
}

impl UserManager {
    /// Creates a manager over `store`.
    pub fn new<S>(store: &S, settings: &DaoSettings) -> AppResult<Self>
    where
        S: DocumentStore + ?Sized,
    {
        Ok(Self {
            users: DocumentDao::for_model(store, settings)?,
        })
    }

    /// Registers a user. Usernames are unique.
    pub async fn create_user(&self, user: User) -> AppResult<User> {
        if self.find(&user.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username {} is taken",
                user.username
            )));
        }

        Ok(self.users.create(user).await?)
    }

    /// Returns the user with the given name or `NotFound`.
    pub async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.find(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user named {username}")))
    }

    /// Returns the user whose name and password hash both match.
    ///
    /// Either mismatch yields the same `NotFound`.
    pub async fn get_by_credentials(&self, username: &str, password_hash: &str) -> AppResult<User> {
        let mut filter = Filter::new();
        filter.insert("username".to_string(), json!(username));
        filter.insert("password_hash".to_string(), json!(password_hash));

        self.users
            .get(&filter, false)
            .await?
            .map(|user| (*user).clone())
            .ok_or_else(|| AppError::NotFound("Invalid username or password".to_string()))
    }

    async fn find(&self, username: &str) -> AppResult<Option<User>> {
        let mut filter = Filter::new();
        filter.insert("username".to_string(), json!(username));

        Ok(self
            .users
            .get(&filter, false)
            .await?
            .map(|user| (*user).clone()))
    }
}
