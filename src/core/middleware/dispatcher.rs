use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::auth::{Authenticator, UserService};
use crate::common::{debug, info, warn, Result};
use crate::core::middleware::Middleware;
use crate::core::state::ResolutionGuard;
use crate::core::uow::{Credential, Response};
use crate::core::view_store::ViewStore;
use crate::core::{AppUser, SessionState, UnitOfWork};
use crate::protocol::AccessToken;
use crate::storage::TokenStore;
use crate::AdminkitError;

// Owns the session state machine. Runs every unit of work to completion
// before the next one, so guards are only touched by one writer.
pub(crate) struct Dispatcher {
    authenticator: Arc<dyn Authenticator>,
    users: Arc<dyn UserService>,
    tokens: TokenStore,
    fallback_admin: bool,
    state: watch::Sender<SessionState>,
    guard: ResolutionGuard,
    username: Option<String>,
    user: Option<AppUser>,
    views: ViewStore,
}

impl Dispatcher {
    pub(crate) fn new(
        authenticator: Arc<dyn Authenticator>,
        users: Arc<dyn UserService>,
        tokens: TokenStore,
        fallback_admin: bool,
        state: watch::Sender<SessionState>,
    ) -> Self {
        Self {
            authenticator,
            users,
            tokens,
            fallback_admin,
            state,
            guard: ResolutionGuard::default(),
            username: None,
            user: None,
            views: ViewStore::default(),
        }
    }

    fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    async fn initialize(&mut self) -> Response<SessionState> {
        if self.state() != SessionState::Uninitialized {
            return Ok(self.state());
        }

        self.username = self.tokens.username().await?;
        if self.tokens.access_token().await?.is_some() {
            info!(user=?self.username, "Restore persisted session");
            self.resolve_identity().await?;
        } else {
            self.set_state(SessionState::Unauthenticated);
        }
        Ok(self.state())
    }

    async fn login(&mut self, credential: Credential) -> Response<Option<AppUser>> {
        let Credential { username, password } = credential;
        let previous = self.state();
        self.set_state(SessionState::Authenticating);

        let token = match self.authenticator.login(&username, &password).await {
            Ok(token) => token,
            Err(err) => {
                warn!(user=%username, %err, "Login failed");
                // An established session survives a failed login.
                let restored = if previous.is_authenticated() {
                    previous
                } else {
                    SessionState::Unauthenticated
                };
                self.set_state(restored);
                return Err(err);
            }
        };
        self.tokens.save(&token).await?;
        self.tokens.save_username(&username).await?;
        self.username = Some(username);

        // New acquisition, identity must be resolved again.
        self.guard.reset();
        self.user = None;

        self.resolve_identity().await
    }

    // Trigger identity resolution for the current access token.
    // No-op when a resolution is running or already done.
    async fn resolve_identity(&mut self) -> Response<Option<AppUser>> {
        let access_token = match self.tokens.access_token().await? {
            Some(access_token) => access_token,
            None => {
                self.set_state(SessionState::Unauthenticated);
                return Ok(None);
            }
        };

        if !self.guard.try_begin() {
            debug!(loaded = self.guard.is_loaded(), "Identity resolution skipped");
            return Ok(self.user.clone());
        }
        self.set_state(SessionState::ResolvingIdentity);

        let username = match self.username.clone().filter(|u| !u.trim().is_empty()) {
            Some(username) => username,
            None => {
                warn!("No username for access token, logout");
                self.logout().await?;
                return Ok(None);
            }
        };

        let user = match self.users.user_by_email(&access_token, &username).await {
            Ok(profile) => AppUser::from_profile(profile),
            Err(err) if err.is_authorization_failure() => {
                warn!(user=%username, %err, "Profile lookup not authorized, logout");
                self.logout().await?;
                return Ok(None);
            }
            Err(err) => {
                warn!(
                    user=%username,
                    %err,
                    grant_admin=self.fallback_admin,
                    "Profile lookup failed, use fallback identity"
                );
                AppUser::fallback(&username, self.fallback_admin)
            }
        };

        self.guard.complete();
        self.user = Some(user.clone());
        self.set_state(SessionState::Ready);
        info!(user=%user.email, admin=user.is_admin, "Identity resolved");

        Ok(Some(user))
    }

    async fn logout(&mut self) -> Response<()> {
        self.views.reset();
        self.guard.reset();
        self.user = None;

        let result = self.authenticator.logout().await;

        self.username = None;
        self.set_state(SessionState::Unauthenticated);
        self.tokens.clear_username().await?;
        result
    }

    async fn refresh(&mut self) -> Response<AccessToken> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .await?
            .ok_or(AdminkitError::Unauthenticated)?;

        let token = self.authenticator.refresh_token(&refresh_token).await?;
        self.tokens.save(&token).await?;
        Ok(token)
    }
}

#[async_trait]
impl Middleware for Dispatcher {
    async fn apply(&mut self, uow: UnitOfWork) -> Result<()> {
        match uow {
            UnitOfWork::Initialize(mut work) => {
                let response = self.initialize().await;
                work.send_response(response)
            }
            UnitOfWork::Login(mut work) => {
                let credential = std::mem::take(&mut work.request);
                let response = self.login(credential).await;
                work.send_response(response)
            }
            UnitOfWork::Logout(mut work) => {
                let response = self.logout().await;
                work.send_response(response)
            }
            UnitOfWork::Refresh(mut work) => {
                let response = self.refresh().await;
                work.send_response(response)
            }
            UnitOfWork::ResolveIdentity(mut work) => {
                let response = self.resolve_identity().await;
                work.send_response(response)
            }
            UnitOfWork::Identity(mut work) => work.send_response(Ok(self.user.clone())),
            UnitOfWork::GetView(mut work) => {
                let value = self.views.get(&work.request);
                work.send_response(Ok(value))
            }
            UnitOfWork::SetView(mut work) => {
                let (view, value) = std::mem::take(&mut work.request);
                let old = self.views.set(view, value);
                debug!(views = self.views.len(), "View state set");
                work.send_response(Ok(old))
            }
            UnitOfWork::RemoveView(mut work) => {
                let old = self.views.remove(&work.request);
                work.send_response(Ok(old))
            }
        }
    }
}
