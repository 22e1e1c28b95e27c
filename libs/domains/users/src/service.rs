use std::sync::Arc;

use crate::auth::authorize;
use crate::error::{UserError, UserResult};
use crate::models::{AccessToken, CreateUser, HealthCheckStatus, NewUser, Role, User};
use crate::repository::UserRepository;
use crate::selector::{Operation, Selector};
use crate::token::TokenIssuer;
use crate::validation;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    tokens: TokenIssuer,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, tokens: TokenIssuer) -> Self {
        Self {
            repository: Arc::new(repository),
            tokens,
        }
    }

    /// Register a new user with the `USER` role
    pub async fn add_user(&self, input: CreateUser) -> UserResult<User> {
        self.add_with_role(input, Role::User).await
    }

    /// Register an administrator; used at startup
    pub async fn seed_admin(&self, input: CreateUser) -> UserResult<User> {
        self.add_with_role(input, Role::Admin).await
    }

    async fn add_with_role(&self, input: CreateUser, role: Role) -> UserResult<User> {
        let user = to_new_user(input, role)?;
        self.repository.persist_user(user).await
    }

    pub async fn fetch_user(&self, selector: &str, value: &str) -> UserResult<User> {
        self.fetch_checked(None, selector, value).await
    }

    /// Replace the record found through `selector`, without a caller check.
    ///
    /// The replacement is validated before the lookup; the target keeps its
    /// id and role.
    pub async fn update_user(
        &self,
        selector: &str,
        value: &str,
        input: CreateUser,
    ) -> UserResult<User> {
        self.update_checked(None, selector, value, input).await
    }

    /// Remove the record found through `selector`, without a caller check.
    pub async fn delete_user(&self, selector: &str, value: &str) -> UserResult<()> {
        self.delete_checked(None, selector, value).await
    }

    /// [`Self::fetch_user`] on behalf of `caller`
    pub async fn fetch_user_as(
        &self,
        caller: &User,
        selector: &str,
        value: &str,
    ) -> UserResult<User> {
        self.fetch_checked(Some(caller), selector, value).await
    }

    /// [`Self::update_user`] on behalf of `caller`
    pub async fn update_user_as(
        &self,
        caller: &User,
        selector: &str,
        value: &str,
        input: CreateUser,
    ) -> UserResult<User> {
        self.update_checked(Some(caller), selector, value, input).await
    }

    /// [`Self::delete_user`] on behalf of `caller`
    pub async fn delete_user_as(
        &self,
        caller: &User,
        selector: &str,
        value: &str,
    ) -> UserResult<()> {
        self.delete_checked(Some(caller), selector, value).await
    }

    /// Log a user in, replacing any token issued before
    pub async fn add_access_token(
        &self,
        username: &str,
        password: &str,
    ) -> UserResult<AccessToken> {
        let user = self.repository.fetch_user(Selector::Name, username).await?;

        if user.password != password {
            tracing::debug!(name = %username, "Login rejected");
            return Err(UserError::InvalidPassword(username.to_string()));
        }

        let token = self.tokens.issue(&user.name)?;
        self.repository
            .store_access_token(&user.name, token.clone())
            .await?;

        tracing::info!(user_id = %user.id, "Issued access token");
        Ok(token)
    }

    pub async fn fetch_access_token(&self, username: &str) -> UserResult<AccessToken> {
        self.repository.fetch_access_token(username).await
    }

    /// Check a presented token and load the caller's record
    pub async fn authenticate(&self, username: &str, token: &str) -> UserResult<User> {
        let stored = self.repository.fetch_access_token(username).await?;

        if stored.token != token {
            tracing::debug!(name = %username, "Access token mismatch");
            return Err(UserError::InvalidAccessToken(username.to_string()));
        }

        self.repository
            .fetch_user(Selector::Name, username)
            .await
            .map_err(|_| UserError::UnknownCaller(username.to_string()))
    }

    pub async fn health_check(&self) -> HealthCheckStatus {
        self.repository.health_check().await
    }

    async fn fetch_checked(
        &self,
        caller: Option<&User>,
        selector: &str,
        value: &str,
    ) -> UserResult<User> {
        self.resolve(caller, Operation::Fetch, selector, value).await
    }

    async fn update_checked(
        &self,
        caller: Option<&User>,
        selector: &str,
        value: &str,
        input: CreateUser,
    ) -> UserResult<User> {
        Selector::parse_for(Operation::Update, selector)?;
        let mut replacement = to_new_user(input, Role::User)?;
        let target = self
            .resolve(caller, Operation::Update, selector, value)
            .await?;

        // Write by id: the selector may have been rebound since the lookup.
        replacement.role = target.role;
        self.repository
            .update_user(Selector::Id, &target.id, replacement)
            .await
    }

    async fn delete_checked(
        &self,
        caller: Option<&User>,
        selector: &str,
        value: &str,
    ) -> UserResult<()> {
        let target = self
            .resolve(caller, Operation::Delete, selector, value)
            .await?;
        self.repository.delete_user(Selector::Id, &target.id).await
    }

    /// Parses the selector, loads the target and, for a caller, checks access.
    async fn resolve(
        &self,
        caller: Option<&User>,
        operation: Operation,
        selector: &str,
        value: &str,
    ) -> UserResult<User> {
        let selector = Selector::parse_for(operation, selector)?;
        let target = self
            .repository
            .fetch_user(selector, value)
            .await
            .map_err(|e| e.for_operation(operation))?;

        if let Some(caller) = caller {
            authorize(caller, &target)?;
        }
        Ok(target)
    }
}

fn to_new_user(input: CreateUser, role: Role) -> UserResult<NewUser> {
    validation::create_user(
        &input.name,
        input.age,
        &input.password,
        input.email.as_deref(),
        role,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceState;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use crate::token::TokenConfig;
    use async_trait::async_trait;
    use mockall::predicate::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn service(repo: MockUserRepository) -> UserService<MockUserRepository> {
        UserService::new(repo, TokenIssuer::new(&TokenConfig::new("test-secret")))
    }

    fn input(name: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            age: 30,
            email: None,
            password: "Str0ngPassword".to_string(),
        }
    }

    fn user(id: &str, name: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            age: 30,
            email: None,
            password: "Str0ngPassword".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn add_user_assigns_user_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_persist_user()
            .withf(|u| u.role == Role::User && u.name == "alice")
            .times(1)
            .returning(|u| Ok(User::from_new("0".into(), u)));

        let created = service(repo).add_user(input("alice")).await.unwrap();
        assert_eq!(created.role, Role::User);
    }

    #[tokio::test]
    async fn seed_admin_assigns_admin_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_persist_user()
            .withf(|u| u.role == Role::Admin)
            .times(1)
            .returning(|u| Ok(User::from_new("0".into(), u)));

        let admin = service(repo).seed_admin(input("root")).await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_persist_user().never();

        let mut weak = input("alice");
        weak.password = "weakpass".into();

        let err = service(repo).add_user(weak).await.unwrap_err();
        assert_eq!(err.to_string(), "password should be stronger.");
    }

    #[tokio::test]
    async fn unsupported_selector_is_rejected_before_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user().never();
        let service = service(repo);

        let err = service.fetch_user("age", "30").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Fetch selector should be within this list ['id', 'name', 'email']"
        );

        let err = service.delete_user("phone", "1").await.unwrap_err();
        assert_eq!(
            err,
            UserError::UnsupportedSelector {
                operation: Operation::Delete
            }
        );
    }

    #[tokio::test]
    async fn update_keeps_the_target_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user()
            .with(eq(Selector::Name), eq("root"))
            .returning(|_, _| Ok(user("0", "root", Role::Admin)));
        repo.expect_update_user()
            .withf(|selector, value, u| {
                *selector == Selector::Id && value == "0" && u.role == Role::Admin
            })
            .times(1)
            .returning(|_, _, u| Ok(User::from_new("0".into(), u)));

        let updated = service(repo)
            .update_user("name", "root", input("rooted"))
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.name, "rooted");
    }

    #[tokio::test]
    async fn update_of_missing_user_says_updated() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user().returning(|selector, value| {
            Err(UserError::NotFound {
                selector,
                value: value.to_string(),
                operation: Operation::Fetch,
            })
        });
        repo.expect_update_user().never();

        let err = service(repo)
            .update_user("id", "7", input("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "There is no user with id 7 to be updated");
    }

    #[tokio::test]
    async fn login_stores_a_fresh_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user()
            .with(eq(Selector::Name), eq("alice"))
            .returning(|_, _| Ok(user("0", "alice", Role::User)));
        repo.expect_store_access_token()
            .withf(|name, token| name == "alice" && !token.token.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let token = service(repo)
            .add_access_token("alice", "Str0ngPassword")
            .await
            .unwrap();
        assert_eq!(token.token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn login_with_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user()
            .returning(|_, _| Ok(user("0", "alice", Role::User)));
        repo.expect_store_access_token().never();

        let err = service(repo)
            .add_access_token("alice", "WrongPassw0rd")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid password for user alice");
    }

    #[tokio::test]
    async fn authenticate_compares_tokens_exactly() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_access_token().returning(|_| {
            Ok(AccessToken {
                token: "abc".into(),
            })
        });
        repo.expect_fetch_user()
            .returning(|_, _| Ok(user("0", "alice", Role::User)));
        let service = service(repo);

        assert_eq!(service.authenticate("alice", "abc").await.unwrap().id, "0");

        let err = service.authenticate("alice", "abcd").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid access token for the user alice");
    }

    #[tokio::test]
    async fn authenticate_without_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_access_token()
            .returning(|name| Err(UserError::MissingAccessToken(name.to_string())));

        let err = service(repo).authenticate("bob", "x").await.unwrap_err();
        assert_eq!(err.to_string(), "There is no access token for user bob");
    }

    #[tokio::test]
    async fn user_cannot_delete_someone_else() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user()
            .returning(|_, _| Ok(user("1", "bob", Role::User)));
        repo.expect_delete_user().never();

        let caller = user("0", "alice", Role::User);
        let err = service(repo)
            .delete_user_as(&caller, "name", "bob")
            .await
            .unwrap_err();
        assert_eq!(err, UserError::PermissionDenied);
    }

    #[tokio::test]
    async fn admin_can_delete_anyone() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user()
            .returning(|_, _| Ok(user("1", "bob", Role::User)));
        repo.expect_delete_user()
            .with(eq(Selector::Id), eq("1"))
            .times(1)
            .returning(|_, _| Ok(()));

        let caller = user("0", "root", Role::Admin);
        service(repo)
            .delete_user_as(&caller, "name", "bob")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn user_can_fetch_self_by_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_fetch_user()
            .with(eq(Selector::Email), eq("alice@test.com"))
            .returning(|_, _| Ok(user("0", "alice", Role::User)));

        let caller = user("0", "alice", Role::User);
        let fetched = service(repo)
            .fetch_user_as(&caller, "email", "alice@test.com")
            .await
            .unwrap();
        assert_eq!(fetched, caller);
    }

    #[tokio::test]
    async fn health_check_is_delegated() {
        let mut repo = MockUserRepository::new();
        repo.expect_health_check().returning(|| HealthCheckStatus {
            service_name: "InMemoryUserRepository",
            state: ServiceState::Healthy,
        });

        let status = service(repo).health_check().await;
        assert_eq!(status.state, ServiceState::Healthy);
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            age: 30,
            email: None,
            password: "Str0ngPassword".to_string(),
            role: Role::User,
        }
    }

    /// Right after the first lookup, renames alice (id 0) to "zed" and
    /// bob (id 1) to "alice", as concurrent requests could.
    struct RebindingRepository {
        inner: InMemoryUserRepository,
        rebound: AtomicBool,
    }

    #[async_trait]
    impl UserRepository for RebindingRepository {
        async fn persist_user(&self, user: NewUser) -> UserResult<User> {
            self.inner.persist_user(user).await
        }

        async fn fetch_user(&self, selector: Selector, value: &str) -> UserResult<User> {
            let found = self.inner.fetch_user(selector, value).await;
            if !self.rebound.swap(true, Ordering::SeqCst) {
                self.inner
                    .update_user(Selector::Id, "0", new_user("zed"))
                    .await
                    .unwrap();
                self.inner
                    .update_user(Selector::Id, "1", new_user("alice"))
                    .await
                    .unwrap();
            }
            found
        }

        async fn update_user(
            &self,
            selector: Selector,
            value: &str,
            user: NewUser,
        ) -> UserResult<User> {
            self.inner.update_user(selector, value, user).await
        }

        async fn delete_user(&self, selector: Selector, value: &str) -> UserResult<()> {
            self.inner.delete_user(selector, value).await
        }

        async fn store_access_token(&self, username: &str, token: AccessToken) -> UserResult<()> {
            self.inner.store_access_token(username, token).await
        }

        async fn fetch_access_token(&self, username: &str) -> UserResult<AccessToken> {
            self.inner.fetch_access_token(username).await
        }

        async fn health_check(&self) -> HealthCheckStatus {
            self.inner.health_check().await
        }
    }

    async fn rebinding_service() -> (
        UserService<RebindingRepository>,
        InMemoryUserRepository,
        User,
    ) {
        let inner = InMemoryUserRepository::new();
        let alice = inner.persist_user(new_user("alice")).await.unwrap();
        inner.persist_user(new_user("bob")).await.unwrap();

        let repo = RebindingRepository {
            inner: inner.clone(),
            rebound: AtomicBool::new(false),
        };
        let service = UserService::new(repo, TokenIssuer::new(&TokenConfig::new("test-secret")));
        (service, inner, alice)
    }

    #[tokio::test]
    async fn delete_hits_the_authorized_record_after_a_rename() {
        let (service, store, alice) = rebinding_service().await;

        service
            .delete_user_as(&alice, "name", "alice")
            .await
            .unwrap();

        assert!(store.fetch_user(Selector::Id, "0").await.is_err());
        let bob = store.fetch_user(Selector::Id, "1").await.unwrap();
        assert_eq!(bob.name, "alice");
    }

    #[tokio::test]
    async fn update_hits_the_authorized_record_after_a_rename() {
        let (service, store, alice) = rebinding_service().await;

        let updated = service
            .update_user_as(&alice, "name", "alice", input("alicia"))
            .await
            .unwrap();

        assert_eq!(updated.id, "0");
        assert_eq!(
            store.fetch_user(Selector::Id, "0").await.unwrap().name,
            "alicia"
        );
        assert_eq!(
            store.fetch_user(Selector::Id, "1").await.unwrap().name,
            "alice"
        );
    }
}
