use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::{oneshot, watch};
use tracing_futures::Instrument;

use crate::auth::{Authenticator, UserService};
use crate::common::{error, info};
use crate::core::middleware::{Dispatcher, MiddlewareChain};
use crate::core::uow::{Credential, Response};
use crate::core::{AppUser, Config, SessionState, UnitOfWork};
use crate::protocol::AccessToken;
use crate::storage::TokenStore;
use crate::{AdminkitError, Result};

pub struct Builder {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    users: Arc<dyn UserService>,
    tokens: TokenStore,
}

impl Builder {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        users: Arc<dyn UserService>,
        tokens: TokenStore,
    ) -> Self {
        Self {
            config: Config::default(),
            authenticator,
            users,
            tokens,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> (Session, SessionHandle) {
        let (send, recv) = mpsc::channel(self.config.request_channel_buffer());
        let (state_send, state_recv) = watch::channel(SessionState::Uninitialized);

        let dispatcher = Dispatcher::new(
            self.authenticator,
            self.users,
            self.tokens,
            self.config.fallback_admin(),
            state_send,
        );
        let middlewares = MiddlewareChain::new(state_recv.clone(), dispatcher);

        let session = Session {
            request_recv: recv,
            middlewares,
        };
        let handle = SessionHandle {
            request_send: send,
            state: state_recv,
        };
        (session, handle)
    }

    // Build and run the session on the current runtime.
    pub fn spawn(self) -> SessionHandle {
        let (session, handle) = self.build();
        tokio::spawn(session.run().instrument(tracing::info_span!("session")));
        handle
    }
}

pub struct Session {
    request_recv: Receiver<UnitOfWork>,
    middlewares: MiddlewareChain,
}

impl Session {
    // Run until every handle is dropped.
    pub async fn run(mut self) {
        info!("Session running");

        while let Some(uow) = self.request_recv.recv().await {
            if let Err(err) = self.middlewares.apply(uow).await {
                error!("Handle uow {}", err);
            }
        }

        info!("Session closed");
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    request_send: Sender<UnitOfWork>,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Restore the session from persisted tokens.
    pub async fn initialize(&self) -> Result<SessionState> {
        self.request(UnitOfWork::new_initialize(())).await
    }

    /// Authenticate and resolve the identity.
    /// Returns `None` when the session was terminated during resolution.
    pub async fn login<S1, S2>(&self, username: S1, password: S2) -> Result<Option<AppUser>>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let credential = Credential {
            username: username.into(),
            password: password.into(),
        };
        self.request(UnitOfWork::new_login(credential)).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.request(UnitOfWork::new_logout(())).await
    }

    pub async fn refresh(&self) -> Result<AccessToken> {
        self.request(UnitOfWork::new_refresh(())).await
    }

    /// Resolve the identity for the current access token if not done yet.
    pub async fn resolve_identity(&self) -> Result<Option<AppUser>> {
        self.request(UnitOfWork::new_resolve_identity(())).await
    }

    pub async fn identity(&self) -> Result<Option<AppUser>> {
        self.request(UnitOfWork::new_identity(())).await
    }

    pub async fn view_state(&self, view: impl Into<String>) -> Result<Option<serde_json::Value>> {
        self.request(UnitOfWork::new_get_view(view.into())).await
    }

    pub async fn set_view_state(
        &self,
        view: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        self.request(UnitOfWork::new_set_view((view.into(), value)))
            .await
    }

    pub async fn remove_view_state(
        &self,
        view: impl Into<String>,
    ) -> Result<Option<serde_json::Value>> {
        self.request(UnitOfWork::new_remove_view(view.into()))
            .await
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    async fn request<T>(&self, (uow, rx): (UnitOfWork, oneshot::Receiver<Response<T>>)) -> Result<T> {
        self.request_send
            .send(uow)
            .await
            .map_err(|_| AdminkitError::SessionClosed)?;

        rx.await.map_err(|_| AdminkitError::SessionClosed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::UserProfile;
    use crate::storage::{key, LocalStorage, MemoryStorage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeAuthenticator {
        tokens: Option<TokenStore>,
        reject_login: bool,
        reject_server_logout: bool,
        logouts: AtomicUsize,
        server_logouts: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for FakeAuthenticator {
        async fn login(&self, _username: &str, password: &str) -> Result<AccessToken> {
            if self.reject_login || password == "bad" {
                return Err(AdminkitError::authentication("bad credentials"));
            }
            Ok(AccessToken::new(format!("access-{}", password), "refresh-1"))
        }

        async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken> {
            Ok(AccessToken::new("access-2", format!("{}-next", refresh_token)))
        }

        async fn logout(&self) -> Result<()> {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            if !self.reject_server_logout {
                self.server_logouts.fetch_add(1, Ordering::SeqCst);
            }
            match &self.tokens {
                Some(tokens) => tokens.clear().await,
                None => Ok(()),
            }
        }
    }

    enum Lookup {
        Profile(UserProfile),
        Status(u16),
        Unreachable,
    }

    struct FakeUsers {
        lookup: Lookup,
        calls: AtomicUsize,
        tokens_seen: Mutex<Vec<String>>,
    }

    impl FakeUsers {
        fn new(lookup: Lookup) -> Arc<Self> {
            Arc::new(Self {
                lookup,
                calls: AtomicUsize::new(0),
                tokens_seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserService for FakeUsers {
        async fn user_by_email(&self, access_token: &str, email: &str) -> Result<UserProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tokens_seen
                .lock()
                .unwrap()
                .push(access_token.to_owned());
            match &self.lookup {
                Lookup::Profile(profile) => Ok(UserProfile {
                    email: email.to_owned(),
                    ..profile.clone()
                }),
                Lookup::Status(status) => Err(AdminkitError::Status {
                    status: *status,
                    message: "denied".into(),
                }),
                Lookup::Unreachable => Err(AdminkitError::Io(std::io::Error::from(
                    std::io::ErrorKind::ConnectionRefused,
                ))),
            }
        }
    }

    struct Fixture {
        handle: SessionHandle,
        storage: Arc<MemoryStorage>,
        auth: Arc<FakeAuthenticator>,
        users: Arc<FakeUsers>,
    }

    fn fixture(lookup: Lookup, auth: FakeAuthenticator) -> Fixture {
        let storage = Arc::new(MemoryStorage::new());
        let tokens = TokenStore::new(storage.clone());
        let auth = Arc::new(FakeAuthenticator {
            tokens: Some(tokens.clone()),
            ..auth
        });
        let users = FakeUsers::new(lookup);

        let handle = Builder::new(auth.clone(), users.clone(), tokens).spawn();

        Fixture {
            handle,
            storage,
            auth,
            users,
        }
    }

    fn profile(is_administrator: bool, account_deactivated: bool) -> UserProfile {
        UserProfile {
            id: "u-1".into(),
            name: "Jane Doe".into(),
            email: String::new(),
            avatar: None,
            is_administrator,
            account_deactivated,
        }
    }

    #[test]
    fn resolves_identity_once_per_token() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(false, false)), Default::default());

            let user = f.handle.login("jane.doe@example.com", "pw").await.unwrap();
            assert!(user.is_some());
            assert_eq!(f.handle.state(), SessionState::Ready);

            for _ in 0..3 {
                let again = f.handle.resolve_identity().await.unwrap();
                assert_eq!(again, user);
            }
            assert_eq!(f.users.calls(), 1);
            assert_eq!(
                f.users.tokens_seen.lock().unwrap().as_slice(),
                &["access-pw".to_owned()]
            );
        })
    }

    #[test]
    fn profile_flags_map_to_identity() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(true, true)), Default::default());

            let user = f
                .handle
                .login("jane.doe@example.com", "pw")
                .await
                .unwrap()
                .unwrap();

            assert!(user.is_admin);
            assert!(!user.is_active);
            assert_eq!(user.display_name, "Jane Doe");
        })
    }

    #[test]
    fn unreachable_profile_service_falls_back() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Unreachable, Default::default());

            let user = f
                .handle
                .login("jane.doe@example.com", "pw")
                .await
                .unwrap()
                .unwrap();

            assert_eq!(user.display_name, "jane.doe");
            assert_eq!(user.email, "jane.doe@example.com");
            assert!(user.is_admin);
            assert!(user.is_active);
            assert_eq!(f.handle.state(), SessionState::Ready);
            assert_eq!(f.auth.logouts.load(Ordering::SeqCst), 0);
        })
    }

    #[test]
    fn fallback_admin_can_be_disabled() {
        tokio_test::block_on(async move {
            let storage = Arc::new(MemoryStorage::new());
            let tokens = TokenStore::new(storage.clone());
            let auth = Arc::new(FakeAuthenticator::default());
            let users = FakeUsers::new(Lookup::Unreachable);
            let mut config = Config::default();
            config.set_fallback_admin(Some(false));

            let handle = Builder::new(auth, users, tokens).config(config).spawn();
            let user = handle
                .login("jane.doe@example.com", "pw")
                .await
                .unwrap()
                .unwrap();

            assert!(!user.is_admin);
        })
    }

    #[test]
    fn unauthorized_lookup_forces_logout() {
        for status in [401, 403] {
            tokio_test::block_on(async move {
                let f = fixture(Lookup::Status(status), Default::default());

                let user = f.handle.login("jane.doe@example.com", "pw").await.unwrap();

                assert_eq!(user, None);
                assert_eq!(f.handle.state(), SessionState::Unauthenticated);
                assert_eq!(f.handle.identity().await.unwrap(), None);
                assert_eq!(f.auth.logouts.load(Ordering::SeqCst), 1);
                assert_eq!(f.storage.get_item(key::ACCESS_TOKEN).await.unwrap(), None);
                assert_eq!(f.storage.get_item(key::USER).await.unwrap(), None);
            })
        }
    }

    #[test]
    fn other_status_falls_back() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Status(503), Default::default());

            let user = f.handle.login("jane.doe@example.com", "pw").await.unwrap();

            assert_eq!(user.map(|u| u.display_name), Some("jane.doe".to_owned()));
            assert_eq!(f.auth.logouts.load(Ordering::SeqCst), 0);
        })
    }

    #[test]
    fn logout_clears_session_when_server_rejects() {
        tokio_test::block_on(async move {
            let auth = FakeAuthenticator {
                reject_server_logout: true,
                ..Default::default()
            };
            let f = fixture(Lookup::Profile(profile(false, false)), auth);

            f.handle.login("jane.doe@example.com", "pw").await.unwrap();
            f.handle
                .set_view_state("users", serde_json::json!({"page": 2}))
                .await
                .unwrap();

            f.handle.logout().await.unwrap();

            assert_eq!(f.auth.server_logouts.load(Ordering::SeqCst), 0);
            assert_eq!(f.storage.get_item(key::ACCESS_TOKEN).await.unwrap(), None);
            assert_eq!(f.storage.get_item(key::REFRESH_TOKEN).await.unwrap(), None);
            assert_eq!(f.handle.state(), SessionState::Unauthenticated);
            assert!(matches!(
                f.handle.view_state("users").await,
                Err(AdminkitError::Unauthenticated)
            ));

            // Login again resolves the identity again.
            f.handle.login("jane.doe@example.com", "pw").await.unwrap();
            assert_eq!(f.users.calls(), 2);
            assert_eq!(f.handle.view_state("users").await.unwrap(), None);
        })
    }

    #[test]
    fn failed_login_is_unauthenticated() {
        tokio_test::block_on(async move {
            let auth = FakeAuthenticator {
                reject_login: true,
                ..Default::default()
            };
            let f = fixture(Lookup::Profile(profile(false, false)), auth);

            let err = f.handle.login("jane.doe@example.com", "bad").await.unwrap_err();

            assert!(matches!(err, AdminkitError::Authentication { .. }));
            assert_eq!(f.handle.state(), SessionState::Unauthenticated);
            assert_eq!(f.users.calls(), 0);
        })
    }

    #[test]
    fn failed_relogin_keeps_session() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(false, false)), Default::default());
            let user = f.handle.login("jane.doe@example.com", "pw").await.unwrap();
            f.handle
                .set_view_state("users", serde_json::json!({"page": 2}))
                .await
                .unwrap();

            let err = f.handle.login("john@example.com", "bad").await.unwrap_err();

            assert!(matches!(err, AdminkitError::Authentication { .. }));
            assert_eq!(f.handle.state(), SessionState::Ready);
            assert_eq!(f.handle.identity().await.unwrap(), user);
            assert_eq!(f.handle.resolve_identity().await.unwrap(), user);
            assert_eq!(
                f.storage.get_item(key::ACCESS_TOKEN).await.unwrap().as_deref(),
                Some("access-pw")
            );
            assert_eq!(
                f.storage.get_item(key::USER).await.unwrap().as_deref(),
                Some("jane.doe@example.com")
            );
            assert_eq!(
                f.handle.view_state("users").await.unwrap(),
                Some(serde_json::json!({"page": 2}))
            );
            assert_eq!(f.users.calls(), 1);
        })
    }

    #[test]
    fn initialize_restores_persisted_session() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(false, false)), Default::default());
            f.storage.set_item(key::ACCESS_TOKEN, "a0").await.unwrap();
            f.storage.set_item(key::REFRESH_TOKEN, "r0").await.unwrap();
            f.storage
                .set_item(key::USER, "jane.doe@example.com")
                .await
                .unwrap();

            assert_eq!(f.handle.initialize().await.unwrap(), SessionState::Ready);
            assert_eq!(f.handle.initialize().await.unwrap(), SessionState::Ready);
            assert_eq!(f.users.calls(), 1);
        })
    }

    #[test]
    fn initialize_without_username_logs_out() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(false, false)), Default::default());
            f.storage.set_item(key::ACCESS_TOKEN, "a0").await.unwrap();

            let state = f.handle.initialize().await.unwrap();

            assert_eq!(state, SessionState::Unauthenticated);
            assert_eq!(f.users.calls(), 0);
            assert_eq!(f.auth.logouts.load(Ordering::SeqCst), 1);
        })
    }

    #[test]
    fn initialize_without_tokens() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(false, false)), Default::default());

            let state = f.handle.initialize().await.unwrap();

            assert_eq!(state, SessionState::Unauthenticated);
            assert!(matches!(
                f.handle.refresh().await,
                Err(AdminkitError::Unauthenticated)
            ));
        })
    }

    #[test]
    fn refresh_keeps_identity() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(false, false)), Default::default());
            f.handle.login("jane.doe@example.com", "pw").await.unwrap();

            let token = f.handle.refresh().await.unwrap();
            assert_eq!(token.access_token, "access-2");
            assert_eq!(
                f.storage.get_item(key::REFRESH_TOKEN).await.unwrap().as_deref(),
                Some("refresh-1-next")
            );

            f.handle.resolve_identity().await.unwrap();
            assert_eq!(f.users.calls(), 1);
        })
    }

    #[test]
    fn view_state_round() {
        tokio_test::block_on(async move {
            let f = fixture(Lookup::Profile(profile(false, false)), Default::default());
            f.handle.login("jane.doe@example.com", "pw").await.unwrap();

            let old = f
                .handle
                .set_view_state("users", serde_json::json!({"filter": "active"}))
                .await
                .unwrap();
            assert_eq!(old, None);
            assert_eq!(
                f.handle.view_state("users").await.unwrap(),
                Some(serde_json::json!({"filter": "active"}))
            );
            assert_eq!(
                f.handle.remove_view_state("users").await.unwrap(),
                Some(serde_json::json!({"filter": "active"}))
            );
        })
    }
}
