use async_trait::async_trait;
use tokio::sync::watch;

use crate::common::{debug, info};
use crate::common::Result;
use crate::core::middleware::Middleware;
use crate::core::{SessionState, UnitOfWork};

pub(crate) struct Logger<MW> {
    state: watch::Receiver<SessionState>,
    next: MW,
}

impl<MW> Logger<MW> {
    pub(crate) fn new(state: watch::Receiver<SessionState>, next: MW) -> Self {
        Self { state, next }
    }
}

#[async_trait]
impl<MW> Middleware for Logger<MW>
where
    MW: Middleware + Send + 'static,
{
    async fn apply(&mut self, uow: UnitOfWork) -> Result<()> {
        let start = tokio::time::Instant::now();
        let log = format!("{:?}", uow);
        let before = *self.state.borrow();

        let result = self.next.apply(uow).await;

        let after = *self.state.borrow();
        if before != after {
            debug!(from=%before, to=%after, "Session state changed");
        }
        info!(uow=%log, elapsed=?start.elapsed(), state=%after, ?result, "Uow done");

        result
    }
}
