use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{AccessToken, HealthCheckStatus, NewUser, ServiceState, User};
use crate::selector::{Operation, Selector};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a validated user under the next sequential id
    async fn persist_user(&self, user: NewUser) -> UserResult<User>;

    /// Look a user up through one of the indices
    async fn fetch_user(&self, selector: Selector, value: &str) -> UserResult<User>;

    /// Replace the record found through `selector`, keeping its id
    async fn update_user(&self, selector: Selector, value: &str, user: NewUser)
    -> UserResult<User>;

    /// Remove the record found through `selector` from every index
    async fn delete_user(&self, selector: Selector, value: &str) -> UserResult<()>;

    /// Save the token for `username`, replacing any previous one
    async fn store_access_token(&self, username: &str, token: AccessToken) -> UserResult<()>;

    async fn fetch_access_token(&self, username: &str) -> UserResult<AccessToken>;

    async fn health_check(&self) -> HealthCheckStatus;
}

/// Name under which the in-memory store reports its health
pub const IN_MEMORY_SERVICE_NAME: &str = "InMemoryUserRepository";

/// Tokens are keyed by user name; names are alphanumeric, so this can never clash.
const HEALTH_PROBE_KEY: &str = "__health_probe__";

/// Records plus the secondary indices that point at them.
///
/// `names` and `emails` map to ids in `ids`; `tokens` is keyed by name.
/// Every mutation goes through [`Store::index`] / [`Store::unindex`] so the
/// three lookups never disagree.
#[derive(Debug, Default)]
struct Store {
    ids: HashMap<String, User>,
    names: HashMap<String, String>,
    emails: HashMap<String, String>,
    tokens: HashMap<String, AccessToken>,
    next_id: u64,
}

impl Store {
    fn locate(&self, selector: Selector, value: &str) -> Option<String> {
        match selector {
            Selector::Id => self.ids.contains_key(value).then(|| value.to_string()),
            Selector::Name => self.names.get(value).cloned(),
            Selector::Email => self.emails.get(value).cloned(),
        }
    }

    fn locate_user(
        &self,
        selector: Selector,
        value: &str,
        operation: Operation,
    ) -> UserResult<User> {
        self.locate(selector, value)
            .and_then(|id| self.ids.get(&id).cloned())
            .ok_or_else(|| UserError::NotFound {
                selector,
                value: value.to_string(),
                operation,
            })
    }

    /// Fails if `name` or `email` already belongs to a record other than `owner`.
    fn ensure_unique(&self, user: &NewUser, owner: Option<&str>) -> UserResult<()> {
        let taken_by_other = |id: &String| owner != Some(id.as_str());

        if self.names.get(&user.name).is_some_and(taken_by_other) {
            return Err(UserError::DuplicateName(user.name.clone()));
        }
        if let Some(email) = &user.email {
            if self.emails.get(email).is_some_and(taken_by_other) {
                return Err(UserError::DuplicateEmail(email.clone()));
            }
        }
        Ok(())
    }

    fn index(&mut self, user: User) {
        self.names.insert(user.name.clone(), user.id.clone());
        if let Some(email) = &user.email {
            self.emails.insert(email.clone(), user.id.clone());
        }
        self.ids.insert(user.id.clone(), user);
    }

    fn unindex(&mut self, user: &User) {
        self.ids.remove(&user.id);
        self.names.remove(&user.name);
        if let Some(email) = &user.email {
            self.emails.remove(email);
        }
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn persist_user(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        store.ensure_unique(&user, None)?;

        let id = store.next_id.to_string();
        store.next_id += 1;

        let persisted = User::from_new(id, user);
        store.index(persisted.clone());

        tracing::info!(
            user_id = %persisted.id,
            name = %persisted.name,
            role = %persisted.role,
            "Created user"
        );
        Ok(persisted)
    }

    async fn fetch_user(&self, selector: Selector, value: &str) -> UserResult<User> {
        let store = self.store.read().await;
        store.locate_user(selector, value, Operation::Fetch)
    }

    async fn update_user(
        &self,
        selector: Selector,
        value: &str,
        user: NewUser,
    ) -> UserResult<User> {
        let mut store = self.store.write().await;

        let current = store.locate_user(selector, value, Operation::Update)?;
        store.ensure_unique(&user, Some(&current.id))?;

        store.unindex(&current);
        let updated = User::from_new(current.id.clone(), user);
        store.index(updated.clone());

        if current.name != updated.name {
            if let Some(token) = store.tokens.remove(&current.name) {
                store.tokens.insert(updated.name.clone(), token);
            }
        }

        tracing::info!(user_id = %updated.id, %selector, "Updated user");
        Ok(updated)
    }

    async fn delete_user(&self, selector: Selector, value: &str) -> UserResult<()> {
        let mut store = self.store.write().await;

        let current = store.locate_user(selector, value, Operation::Delete)?;
        store.unindex(&current);
        store.tokens.remove(&current.name);

        tracing::info!(user_id = %current.id, %selector, "Deleted user");
        Ok(())
    }

    async fn store_access_token(&self, username: &str, token: AccessToken) -> UserResult<()> {
        let mut store = self.store.write().await;
        store.tokens.insert(username.to_string(), token);
        Ok(())
    }

    async fn fetch_access_token(&self, username: &str) -> UserResult<AccessToken> {
        let store = self.store.read().await;
        store
            .tokens
            .get(username)
            .cloned()
            .ok_or_else(|| UserError::MissingAccessToken(username.to_string()))
    }

    async fn health_check(&self) -> HealthCheckStatus {
        let mut store = self.store.write().await;

        let probe = AccessToken {
            token: "probe".to_string(),
        };
        store.tokens.insert(HEALTH_PROBE_KEY.to_string(), probe.clone());
        let readable = store.tokens.get(HEALTH_PROBE_KEY) == Some(&probe);
        let removed = store.tokens.remove(HEALTH_PROBE_KEY).is_some();

        let state = if readable && removed {
            ServiceState::Healthy
        } else {
            ServiceState::Unhealthy
        };

        HealthCheckStatus {
            service_name: IN_MEMORY_SERVICE_NAME,
            state,
        }
    }
}
