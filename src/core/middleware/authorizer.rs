use async_trait::async_trait;
use tokio::sync::watch;

use crate::common::{debug, Result};
use crate::core::middleware::Middleware;
use crate::core::{SessionState, UnitOfWork};
use crate::AdminkitError;

// Reject work that needs a session while none is established.
pub(crate) struct Authorizer<MW> {
    state: watch::Receiver<SessionState>,
    next: MW,
}

impl<MW> Authorizer<MW> {
    pub(crate) fn new(state: watch::Receiver<SessionState>, next: MW) -> Self {
        Self { state, next }
    }
}

#[async_trait]
impl<MW> Middleware for Authorizer<MW>
where
    MW: Middleware + Send + 'static,
{
    async fn apply(&mut self, uow: UnitOfWork) -> Result<()> {
        let state = *self.state.borrow();
        if uow.requires_session() && !state.is_authenticated() {
            debug!(uow=%uow.name(), %state, "Reject unauthenticated work");
            return uow.reject(AdminkitError::Unauthenticated);
        }
        self.next.apply(uow).await
    }
}
